use tether::*;

fn main() -> Result<()> {
    for integrator in [Integrator::Euler, Integrator::Verlet] {
        let mut system = PlanetSystem::two_body_demo()?.with_integrator(integrator);
        let initial = system.total_energy();
        for _ in 0..1000 {
            system.step(0.01)?;
        }
        let drift = system.total_energy() - initial;
        println!("{:<8} energy drift after 1000 ticks: {drift:.1}", integrator.label());
    }
    Ok(())
}
