use tether::*;

#[test]
fn cloth_session_drag_workflow() {
    let config = SimulationConfig {
        point_count: 4,
        ..Default::default()
    };
    let mut session = Session::new(SceneKind::Cloth, config).expect("session");
    session.adjust_point_count(-1);
    session.place_point(vec2(200.0, 150.0)).expect("corner");
    session.place_point(vec2(100.0, 50.0)).expect("corner");
    assert!(session.confirm().expect("confirm"));

    // pin the top row through the click path
    for x in [100.0, 150.0, 200.0] {
        session.place_point(vec2(x, 50.0)).expect("pin");
    }
    session.toggle_pause();

    let grabbed = session.begin_drag(vec2(149.0, 101.0)).expect("grab");
    assert_eq!(grabbed, 4);
    session.drag_to(vec2(150.0, 180.0));
    for _ in 0..5 {
        session.tick().expect("tick");
    }
    session.end_drag();

    let Some(Scene::Cloth(cloth)) = session.world().scene() else {
        panic!("expected a cloth scene");
    };
    assert_eq!(cloth.rows(), 3);
    assert_eq!(cloth.pinned_indices().len(), 3);
    assert!(!cloth.is_pinned(GridIndex::new(1, 1)));
    assert_eq!(cloth.particle(GridIndex::new(1, 1)).expect("particle").position, vec2(150.0, 180.0));
}

#[test]
fn planet_session_runs_demo() {
    let mut session = Session::new(SceneKind::Planets, SimulationConfig::default()).expect("session");
    session.load_demo().expect("demo");
    for _ in 0..10 {
        assert!(session.tick().expect("tick").is_some());
    }
    session.toggle_pause();
    assert!(session.tick().expect("tick").is_none());
    assert_eq!(session.world().ticks(), 10);
}

#[test]
fn invalid_config_is_rejected() {
    let config = SimulationConfig {
        stiffness: 1.5,
        ..Default::default()
    };
    assert!(Session::new(SceneKind::Rope, config).is_err());
}
