use approx::assert_relative_eq;
use tether::*;

fn small_cloth() -> Cloth {
    Cloth::new(vec2(0.0, 0.0), vec2(20.0, 20.0), 3, 1.0, 1.0, 1.0).expect("cloth")
}

#[test]
fn nearest_particle_resolves_ties_row_major() {
    let cloth = small_cloth();
    assert_eq!(cloth.nearest_particle(vec2(5.0, 5.0)), GridIndex::new(0, 0));
    assert_eq!(cloth.nearest_particle(vec2(15.0, 5.0)), GridIndex::new(0, 1));
    assert_eq!(cloth.nearest_particle(vec2(15.0, 15.0)), GridIndex::new(1, 1));
    assert_eq!(cloth.nearest_particle(vec2(100.0, 100.0)), GridIndex::new(2, 2));
}

#[test]
fn rope_nearest_particle_prefers_lower_index() {
    let rope = Rope::new(vec2(0.0, 0.0), vec2(30.0, 0.0), 4, 1.0, 1.0, 1.0).expect("rope");
    assert_eq!(rope.nearest_particle(vec2(5.0, 2.0)), 0);
    assert_eq!(rope.nearest_particle(vec2(16.0, -3.0)), 2);
}

#[test]
fn out_of_range_edits_leave_state_untouched() {
    let mut cloth = small_cloth();
    let mut rope = Rope::new(vec2(0.0, 0.0), vec2(30.0, 0.0), 4, 1.0, 1.0, 1.0).expect("rope");
    let cloth_before = cloth.positions();
    let rope_before = rope.positions();

    cloth.toggle_pinned(GridIndex::new(3, 3));
    cloth.set_position(GridIndex::new(0, 3), vec2(1.0, 1.0));
    rope.toggle_pinned(4);
    rope.set_position(usize::MAX, vec2(1.0, 1.0));

    assert_eq!(cloth.positions(), cloth_before);
    assert_eq!(rope.positions(), rope_before);
    assert!(cloth.pinned_indices().is_empty());
    assert!(rope.pinned_indices().is_empty());
}

#[test]
fn pinned_particles_only_move_when_set() {
    let mut rope = Rope::new(vec2(0.0, 0.0), vec2(40.0, 0.0), 5, 1.0, 1.0, 1.0).expect("rope");
    rope.toggle_pinned(4);
    for _ in 0..20 {
        rope.step(0.01).expect("step");
    }
    assert_eq!(rope.positions()[4], vec2(40.0, 0.0));
    rope.set_position(4, vec2(60.0, 10.0));
    rope.step(0.01).expect("step");
    assert_eq!(rope.positions()[4], vec2(60.0, 10.0));
}

#[test]
fn pinned_curtain_sags_by_one_tick_of_gravity() {
    let mut cloth = Cloth::new(vec2(100.0, 100.0), vec2(200.0, 200.0), 5, 5.0, 5.0, 1.0).expect("cloth");
    cloth.pin_top_row();
    let report = cloth.step(0.01).expect("step");
    for col in 0..5 {
        let bottom = cloth.particle(GridIndex::new(4, col)).expect("particle");
        assert_relative_eq!(bottom.position.y, 200.085, epsilon = 0.01);
    }
    assert_eq!(report.relaxation.degenerate_skips, 0);
}

#[test]
fn world_advances_in_fixed_ticks() {
    let mut world = PhysicsWorld::new(0.01);
    let cloth = small_cloth();
    world.set_scene(Scene::Cloth(cloth));
    let ticks = world.advance(0.1).expect("advance");
    assert!((9..=10).contains(&ticks));
    assert_eq!(world.ticks(), ticks as u64);

    let positions = world.scene().expect("scene").positions();
    assert!(positions.iter().all(|p| p.y > 0.0));
    world.clear();
    assert!(world.scene().is_none());
}

#[test]
fn invalid_steps_are_rejected() {
    let mut rope = Rope::new(vec2(0.0, 0.0), vec2(30.0, 0.0), 4, 1.0, 1.0, 1.0).expect("rope");
    assert!(matches!(rope.step(0.0), Err(SimError::InvalidConfiguration(_))));
    assert!(rope.step(-0.01).is_err());
    assert!(rope.step(Real::INFINITY).is_err());
    assert!(Cloth::new(vec2(0.0, 0.0), vec2(0.0, 20.0), 3, 1.0, 1.0, 1.0).is_err());
    assert!(Rope::new(vec2(0.0, 0.0), vec2(30.0, 0.0), 4, 1.0, 1.0, 0.0).is_err());
}
