use super::analyze::write_exports;
use crate::cli::EvaluateArgs;
use crate::config::builder::build_analysis_settings;
use crate::error::Result;
use crate::report::interface_report;
use crate::utils::input::load_structure;
use crate::utils::progress::CliProgressHandler;
use binderscope::core::validation::{parse_residue_selection, validate_binding_site};
use binderscope::engine::interface::analyze_with;
use binderscope::engine::progress::ProgressReporter;
use binderscope::engine::scoring::score;
use tracing::info;

/// Analyzes and scores a target/binder pair without touching any session.
pub fn run(args: EvaluateArgs) -> Result<()> {
    let settings = build_analysis_settings(&args.options)?;

    info!("Loading target from {:?}", &args.target);
    let target = load_structure(&args.target)?;
    info!("Loading binder from {:?}", &args.binder);
    let binder = load_structure(&args.binder)?;
    let binding_site = match args.binding_site.as_deref() {
        Some(text) => parse_residue_selection(text)?,
        None => Vec::new(),
    };
    validate_binding_site(&binding_site, target.max_residue_number())?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Evaluating binder '{}' against target '{}'...",
        binder.name(),
        target.name()
    );
    let result = reporter.phase("Interface Analysis", || {
        analyze_with(&target, &binder, &settings.analysis)
    })?;
    let quality = reporter.phase("Scoring", || score(&result));

    println!();
    print!("{}", interface_report(&result, &quality, settings.hotspots, &binding_site));
    write_exports(&args.options, &result, &target, &binder)?;
    Ok(())
}
