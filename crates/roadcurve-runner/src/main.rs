use clap::Parser;
use roadcurve_runner::{install_abort_handler, run, Cli};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = cli.resolve_config().and_then(|config| {
        let abort = install_abort_handler()?;
        run(&config, &abort)
    });

    match result {
        Ok(summary) => {
            info!(
                "{} roads read, {} processed, {} skipped",
                summary.roads_read, summary.processed, summary.skipped
            );
            if summary.aborted {
                std::process::exit(130);
            }
        }
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
    }
}
