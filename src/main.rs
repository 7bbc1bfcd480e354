use clap::Parser;
use log::error;
use panaderia_tienda::app::run_app;
use panaderia_tienda::cli::Cli;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run_app(cli) {
        error!("Application error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
