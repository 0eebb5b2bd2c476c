use crate::cli::{AnalysisOptions, AnalyzeArgs};
use crate::config::builder::build_analysis_settings;
use crate::error::{CliError, Result};
use crate::report::interface_report;
use crate::store::SessionStore;
use crate::utils::progress::CliProgressHandler;
use binderscope::core::io::pdb::PdbFile;
use binderscope::core::models::side::Side;
use binderscope::core::models::structure::Structure;
use binderscope::engine::contact_map::write_contacts_csv_to_path;
use binderscope::engine::interface::InterfaceResult;
use binderscope::engine::progress::ProgressReporter;
use binderscope::workflows::stage::WorkflowStage;
use binderscope::workflows::{analysis, persistence};
use std::fs::File;
use std::io::BufWriter;
use tracing::info;

const COMPLEX_TARGET_CHAIN: char = 'A';
const COMPLEX_BINDER_CHAIN: char = 'B';

/// Writes the optional contact CSV and complex PDB requested in `options`.
pub(crate) fn write_exports(
    options: &AnalysisOptions,
    result: &InterfaceResult,
    target: &Structure,
    binder: &Structure,
) -> Result<()> {
    if let Some(path) = &options.contacts_csv {
        write_contacts_csv_to_path(result, path)?;
        info!("Contact map written to {:?}", path);
        println!("Contact map written to: {}", path.display());
    }
    if let Some(path) = &options.complex_pdb {
        let mut writer = BufWriter::new(File::create(path)?);
        PdbFile::write_complex(
            target,
            binder,
            COMPLEX_TARGET_CHAIN,
            COMPLEX_BINDER_CHAIN,
            &mut writer,
        )?;
        info!("Complex written to {:?}", path);
        println!("Complex structure written to: {}", path.display());
    }
    Ok(())
}

pub fn run(store: &SessionStore, args: AnalyzeArgs) -> Result<()> {
    let settings = build_analysis_settings(&args.options)?;
    let (mut session, path) = store.load(&args.session)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Analyzing session '{}'...", session.project_name());
    let quality = analysis::run(&mut session, &settings.analysis, &reporter)?;
    persistence::save_to_path(&session, &path)?;

    let interface = session
        .interface()
        .and_then(|artifact| artifact.current())
        .ok_or_else(|| CliError::Store("analysis result was not stored".to_string()))?;
    println!();
    print!("{}", interface_report(
        interface,
        &quality,
        settings.hotspots,
        session.binding_site(),
    ));

    if let (Some(target), Some(binder)) = (
        session.current_structure(Side::Target),
        session.current_structure(Side::Binder),
    ) {
        write_exports(&args.options, interface, target, binder)?;
    }
    println!(
        "Run `binderscope advance {}` to move on to {}.",
        session.id(),
        WorkflowStage::Results.title()
    );
    Ok(())
}
