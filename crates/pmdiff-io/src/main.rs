use clap::Parser;
use pmdiff_io::cli::{run_ode_command, run_smooth_command, Cli, Commands};
use pmdiff_io::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match cli.command {
        Commands::Ode(args) => run_ode_command(args).await?,
        Commands::Smooth(args) => run_smooth_command(args).await?,
    }

    Ok(())
}
