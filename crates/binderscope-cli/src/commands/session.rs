use crate::config::defaults::DefaultsConfig;
use crate::error::Result;
use crate::report::session_report;
use crate::store::SessionStore;
use binderscope::workflows::persistence;
use binderscope::workflows::session::WorkflowSession;
use binderscope::workflows::stage::WorkflowStage;
use tracing::info;

pub fn new(store: &SessionStore, name: &str) -> Result<()> {
    let session = WorkflowSession::new(name);
    let path = store.save(&session)?;
    info!("Created session {} at {:?}", session.id(), &path);
    println!("Created session '{}'", session.project_name());
    println!("  id:   {}", session.id());
    println!("  file: {}", path.display());
    Ok(())
}

pub fn list(store: &SessionStore) -> Result<()> {
    let summaries = store.list()?;
    if summaries.is_empty() {
        println!("No sessions in {}", store.path().display());
        return Ok(());
    }
    println!(
        "{:<10} {:<28} {:<24} {:>5}  {}",
        "ID", "PROJECT", "STAGE", "DONE", "UPDATED"
    );
    for summary in summaries {
        println!(
            "{:<10} {:<28} {:<24} {:>4.0}%  {}",
            summary.id.get(..8).unwrap_or(&summary.id),
            summary.project_name,
            summary.stage.title(),
            summary.progress * 100.0,
            summary.last_updated.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

pub fn show(store: &SessionStore, reference: &str) -> Result<()> {
    let (session, _) = store.load(reference)?;
    print!(
        "{}",
        session_report(&session, DefaultsConfig::default().hotspot_count)
    );
    Ok(())
}

pub fn advance(store: &SessionStore, reference: &str) -> Result<()> {
    let (mut session, path) = store.load(reference)?;
    let stage = session.advance()?;
    persistence::save_to_path(&session, &path)?;
    println!(
        "Session '{}' is now at {} ({:.0}% complete)",
        session.project_name(),
        stage.title(),
        session.progress() * 100.0
    );
    Ok(())
}

pub fn retreat(store: &SessionStore, reference: &str, stage: WorkflowStage) -> Result<()> {
    let (mut session, path) = store.load(reference)?;
    session.retreat(stage)?;
    persistence::save_to_path(&session, &path)?;
    println!(
        "Session '{}' is back at {}",
        session.project_name(),
        stage.title()
    );
    Ok(())
}

pub fn notes(store: &SessionStore, reference: &str, text: &str) -> Result<()> {
    let (mut session, path) = store.load(reference)?;
    session.set_notes(text);
    persistence::save_to_path(&session, &path)?;
    info!("Updated notes of session {}", session.id());
    Ok(())
}
