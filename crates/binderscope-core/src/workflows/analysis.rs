use super::error::WorkflowError;
use super::session::WorkflowSession;
use super::stage::WorkflowStage;
use crate::core::models::side::Side;
use crate::engine::config::AnalysisConfig;
use crate::engine::interface::analyze_with;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::scoring::{QualityScore, score};
use tracing::{info, instrument};

/// Analyzes the session's current target and binder structures and stores the interface
/// result together with its quality score.
///
/// Nothing is written unless both computations succeed, and the session's stage never
/// changes here; call [`WorkflowSession::advance`] afterwards.
#[instrument(skip_all, name = "complex_analysis_workflow")]
pub fn run(
    session: &mut WorkflowSession,
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> Result<QualityScore, WorkflowError> {
    session.ensure_writable(WorkflowStage::ComplexAnalysis)?;

    let (interface, quality) = {
        let [target, binder] = [Side::Target, Side::Binder].map(|side| {
            session
                .current_structure(side)
                .ok_or_else(|| WorkflowError::StageNotReady {
                    stage: WorkflowStage::ComplexAnalysis,
                    reason: format!("the {} structure is missing or stale", side),
                })
        });
        let (target, binder) = (target?, binder?);
        info!(
            target_name = target.name(),
            binder_name = binder.name(),
            cutoff = config.cutoff,
            "Starting complex analysis."
        );

        let interface = reporter.phase("Interface Analysis", || {
            analyze_with(target, binder, config)
        })?;
        reporter.report(Progress::Message(format!(
            "{} contacts between {} target and {} binder residues",
            interface.contact_count(),
            interface.target_residues().len(),
            interface.binder_residues().len()
        )));
        let quality = reporter.phase("Scoring", || score(&interface));
        (interface, quality)
    };

    session.store_analysis(interface, quality.clone())?;
    info!(
        "Analysis complete: score {} (grade {}).",
        quality.total, quality.grade
    );
    Ok(quality)
}
