mod cli;
mod dataset;
mod error;
mod fmt;
mod models;
mod parse;
mod reconciler;
mod settings;

use clap::Parser;
use tracing::{debug, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use cli::reconcile::ReconcileArgs;
use cli::{Cli, Commands};
use reconciler::Reconciler;

fn main() {
    let cli = Cli::parse();
    init_logger(cli.log_level);
    trace!("{cli:?}");

    let mut settings = settings::load_settings();
    debug!("Using prices {:?}", settings.prices);
    let mut reconciler = Reconciler::new(settings.prices);

    let result = match cli.command {
        Commands::Columns { file } => cli::columns::run(&mut reconciler, &file),
        Commands::Reconcile {
            file,
            from_date,
            to_date,
            date_column,
            amount_column,
            soda,
            beer,
            energy,
        } => cli::reconcile::run(
            &mut reconciler,
            &settings,
            ReconcileArgs {
                file,
                from_date,
                to_date,
                date_column,
                amount_column,
                soda,
                beer,
                energy,
            },
        ),
        Commands::Session => cli::session::run(&mut reconciler, &mut settings),
        Commands::Prices => cli::prices::run(reconciler.prices()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
