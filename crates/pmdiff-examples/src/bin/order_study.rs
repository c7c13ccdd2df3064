use pmdiff_core::{integrate_scalar, Scheme, TimeGrid};
use pmdiff_models::{ClosedForm, ExponentialDecay};

fn main() -> anyhow::Result<()> {
    let problem = ExponentialDecay::unit();
    let (t_end, s0) = (2.0, 1.0);
    let steps = [0.2, 0.1, 0.05, 0.025];

    println!("Observed order on ds/dt = -s, T = {}", t_end);
    println!();
    println!("{:<8} {:>8} {:>12} {:>8}", "scheme", "h", "end error", "order");

    for scheme in Scheme::ALL {
        let mut previous: Option<(f64, f64)> = None;
        for &h in &steps {
            let grid = TimeGrid::span(0.0, t_end, h)?;
            let trajectory = integrate_scalar(scheme, &problem, &grid, s0)?;
            let error = trajectory
                .error_at_end(|t| problem.exact(0.0, s0, t))
                .unwrap_or(f64::NAN);

            let order = previous
                .map(|(h_prev, e_prev)| (e_prev / error).ln() / (h_prev / h).ln())
                .map(|p| format!("{:.2}", p))
                .unwrap_or_else(|| "-".to_string());
            println!("{:<8} {:>8} {:>12.3e} {:>8}", scheme.name(), h, error, order);
            previous = Some((h, error));
        }
        println!("{:<8} expected order {}", "", scheme.order());
        println!();
    }
    Ok(())
}
