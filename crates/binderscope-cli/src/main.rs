mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod predictor;
mod report;
mod store;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use crate::store::SessionStore;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!(
        "🚀 BinderScope CLI v{} starting up.",
        env!("CARGO_PKG_VERSION")
    );
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let store = SessionStore::new(cli.sessions_dir.as_deref())?;
    let command_result = match cli.command {
        Commands::New { name } => commands::session::new(&store, &name),
        Commands::List => commands::session::list(&store),
        Commands::Show { session } => commands::session::show(&store, &session),
        Commands::Target(args) => commands::inputs::run_target(&store, args),
        Commands::Binder(args) => commands::inputs::run_binder(&store, args),
        Commands::Predict(args) => commands::predict::run(&store, args),
        Commands::Analyze(args) => commands::analyze::run(&store, args),
        Commands::Advance { session } => commands::session::advance(&store, &session),
        Commands::Retreat { session, stage } => {
            commands::session::retreat(&store, &session, stage)
        }
        Commands::Notes { session, text } => commands::session::notes(&store, &session, &text),
        Commands::Evaluate(args) => commands::evaluate::run(args),
        Commands::Validate(args) => commands::validate::run(args),
    };

    match &command_result {
        Ok(_) => {
            info!("✅ Command completed successfully.");
            println!("✅ Command completed successfully.");
        }
        Err(e) => {
            error!("❌ Command failed: {}", e);
            eprintln!("❌ Command failed: {}", e);
        }
    }
    command_result
}
