use binderscope::core::models::side::Side;
use binderscope::engine::binding_site::binding_site_overlap;
use binderscope::engine::contact_map::hotspots;
use binderscope::engine::interface::InterfaceResult;
use binderscope::engine::scoring::QualityScore;
use binderscope::workflows::session::{Artifact, WorkflowSession};
use binderscope::workflows::stage::{StageStatus, WorkflowStage};
use std::fmt::Write;

fn stale_marker<T>(artifact: &Artifact<T>) -> &'static str {
    if artifact.is_stale() { " [stale]" } else { "" }
}

fn fmt_distance(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |d| format!("{:.2} Å", d))
}

/// Collapses ascending residue numbers into ranges, e.g. `4, 10-12`.
fn format_residues(residues: &[isize]) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut iter = residues.iter().copied().peekable();
    while let Some(start) = iter.next() {
        let mut end = start;
        while iter.peek() == Some(&(end + 1)) {
            end += 1;
            iter.next();
        }
        parts.push(if start == end {
            start.to_string()
        } else {
            format!("{}-{}", start, end)
        });
    }
    parts.join(", ")
}

/// Multi-line description of an interface result and its score.
///
/// A non-empty `binding_site` adds how many of its residues the binder reaches.
pub fn interface_report(
    result: &InterfaceResult,
    quality: &QualityScore,
    hotspot_limit: usize,
    binding_site: &[isize],
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Interface (cutoff {:.1} Å)", result.cutoff());
    let _ = writeln!(
        out,
        "  Contacts:          {} ({} target / {} binder residues)",
        result.contact_count(),
        result.target_residues().len(),
        result.binder_residues().len()
    );
    let _ = writeln!(out, "  Minimum distance:  {}", fmt_distance(result.min_distance()));
    let _ = writeln!(out, "  Mean distance:     {}", fmt_distance(result.mean_distance()));
    let _ = writeln!(out, "  Maximum distance:  {}", fmt_distance(result.max_distance()));
    let _ = writeln!(
        out,
        "  Buried surface:    ~{:.0} Å²",
        result.buried_surface_estimate()
    );
    let _ = writeln!(
        out,
        "  Steric clash:      {}",
        if result.has_clash() { "yes" } else { "no" }
    );

    for side in [Side::Target, Side::Binder] {
        let spots = hotspots(result, side, hotspot_limit);
        if spots.is_empty() {
            continue;
        }
        let listed: Vec<String> = spots
            .iter()
            .map(|h| format!("{} {} ({})", h.name, h.residue, h.contacts))
            .collect();
        let _ = writeln!(out, "  {} hotspots: {}", side, listed.join(", "));
    }

    if let Some(overlap) = binding_site_overlap(result, binding_site) {
        let _ = writeln!(
            out,
            "  Binding site:      {}/{} residues in contact ({:.0}%)",
            overlap.covered.len(),
            overlap.site_size(),
            overlap.coverage() * 100.0
        );
        if !overlap.missed.is_empty() {
            let _ = writeln!(out, "  Site not reached:  {}", format_residues(&overlap.missed));
        }
        if !overlap.off_site.is_empty() {
            let _ = writeln!(
                out,
                "  Off-site contacts: {} target residues",
                overlap.off_site.len()
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Quality score: {}/100 (grade {} - {})",
        quality.total,
        quality.grade,
        quality.grade.label()
    );
    let _ = writeln!(
        out,
        "  Contacts {}/40, distance {}/40, clash {}/20",
        quality.breakdown.contact_component,
        quality.breakdown.distance_component,
        quality.breakdown.clash_component
    );
    let _ = writeln!(out, "  {}", quality.verdict());
    for hint in &quality.recommendations {
        let _ = writeln!(out, "  - {}", hint);
    }
    out
}

fn status_symbol(status: StageStatus) -> &'static str {
    match status {
        StageStatus::NotStarted => " ",
        StageStatus::InProgress => ">",
        StageStatus::Completed => "✓",
        StageStatus::Invalidated => "!",
    }
}

/// Multi-line overview of a session for `binderscope show`.
pub fn session_report(session: &WorkflowSession, hotspot_limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Project:  {}", session.project_name());
    let _ = writeln!(out, "Session:  {}", session.id());
    let _ = writeln!(
        out,
        "Created:  {}   Updated: {}",
        session.created_at().format("%Y-%m-%d %H:%M:%S UTC"),
        session.last_updated().format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(
        out,
        "Stage:    {} ({:.0}% complete)",
        session.current_stage().title(),
        session.progress() * 100.0
    );
    let _ = writeln!(out);

    for stage in WorkflowStage::ALL {
        let status = session.stage_status(stage);
        let _ = write!(out, "  [{}] {:<28} {}", status_symbol(status), stage.title(), status);
        if stage == session.current_stage() && !stage.is_terminal() {
            if let Err(reason) = session.stage_readiness(stage) {
                let _ = write!(out, " (waiting: {})", reason);
            }
        }
        let _ = writeln!(out);
    }
    let _ = writeln!(out);

    if let Some(input) = session.target_input() {
        let _ = writeln!(out, "Target input:     {}", input.value().describe());
    }
    if !session.binding_site().is_empty() {
        let _ = writeln!(out, "Binding site:     {}", format_residues(session.binding_site()));
    }
    if let Some(input) = session.binder_input() {
        let _ = writeln!(out, "Binder input:     {}", input.value().describe());
    }
    for side in [Side::Target, Side::Binder] {
        if let Some(artifact) = session.structure(side) {
            let structure = artifact.value();
            let confidence = structure
                .mean_confidence()
                .map(|c| format!(", mean confidence {:.1}", c))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "{} structure: {} residues, {} atoms, {}{}{}",
                if side == Side::Target { "Target" } else { "Binder" },
                structure.residue_count(),
                structure.atom_count(),
                structure.source(),
                confidence,
                stale_marker(artifact)
            );
        }
    }

    if let (Some(interface), Some(quality)) = (session.interface(), session.quality()) {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Analysis run {}",
            interface.produced_at().format("%Y-%m-%d %H:%M:%S UTC")
        );
        if interface.is_stale() || quality.is_stale() {
            let _ = writeln!(out, "Analysis results are stale; re-run `binderscope analyze`.");
        }
        out.push_str(&interface_report(
            interface.value(),
            quality.value(),
            hotspot_limit,
            session.binding_site(),
        ));
    }

    if !session.notes().is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Notes: {}", session.notes());
    }
    out
}
