use pmdiff_core::{integrate_scalar, Scheme, TimeGrid};
use pmdiff_models::{ClosedForm, DecayingForcing};

fn main() -> anyhow::Result<()> {
    // ds/dt = exp(-t), s(0) = -1, exact s(t) = -exp(-t)
    let problem = DecayingForcing;
    let (t0, t_end, h, s0) = (0.0, 2.0, 0.1, -1.0);
    let grid = TimeGrid::span(t0, t_end, h)?;

    println!("ds/dt = exp(-t) on [{}, {}], h = {}, s0 = {}", t0, t_end, h, s0);
    println!();

    let runs = Scheme::ALL
        .iter()
        .map(|&scheme| {
            let trajectory = integrate_scalar(scheme, &problem, &grid, s0)?;
            Ok::<_, anyhow::Error>((scheme, trajectory))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    print!("{:>5} {:>12}", "t", "exact");
    for (scheme, _) in &runs {
        print!(" {:>12}", scheme.name());
    }
    println!();

    for (i, &t) in grid.points().iter().enumerate() {
        print!("{:>5.2} {:>12.8}", t, problem.exact(t0, s0, t));
        for (_, trajectory) in &runs {
            print!(" {:>12.8}", trajectory.values[i]);
        }
        println!();
    }

    println!();
    for (scheme, trajectory) in &runs {
        println!(
            "{:<45} max error {:.3e}",
            scheme.description(),
            trajectory.max_abs_error(|t| problem.exact(t0, s0, t))
        );
    }
    Ok(())
}
