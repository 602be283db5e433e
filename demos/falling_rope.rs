use tether::*;

fn main() -> Result<()> {
    let mut rope = Rope::new(vec2(100.0, 100.0), vec2(400.0, 100.0), 20, 5.0, 5.0, 1.0)?;
    rope.toggle_pinned(0);

    for tick in 0..=300 {
        let report = rope.step(0.01)?;
        if tick % 100 == 0 {
            let tip = rope.positions()[rope.len() - 1];
            println!(
                "tick {tick}: tip at ({:.1}, {:.1}), max stretch {:.4}",
                tip.x, tip.y, report.relaxation.max_stretch
            );
        }
    }
    Ok(())
}
