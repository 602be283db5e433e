use tether::*;

fn main() -> Result<()> {
    let config = SimulationConfig {
        point_count: 15,
        ..Default::default()
    };
    let mut session = Session::new(SceneKind::Cloth, config)?;
    session.place_point(vec2(150.0, 100.0))?;
    session.place_point(vec2(450.0, 400.0))?;
    session.confirm()?;
    if let Some(Scene::Cloth(cloth)) = session.world_mut().scene_mut() {
        cloth.pin_top_row();
        cloth.set_parallel_enabled(true);
    }
    session.toggle_pause();

    for _ in 0..200 {
        session.tick()?;
    }

    if let Some(Scene::Cloth(cloth)) = session.world().scene() {
        let bottom = cloth.rows() - 1;
        for col in (0..cloth.cols()).step_by(7) {
            if let Some(p) = cloth.particle(GridIndex::new(bottom, col)) {
                println!("bottom[{col}] at ({:.1}, {:.1})", p.position.x, p.position.y);
            }
        }
    }
    Ok(())
}
