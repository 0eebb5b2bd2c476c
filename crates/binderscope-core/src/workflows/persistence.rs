use super::error::WorkflowError;
use super::session::WorkflowSession;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Version of the session document layout written by [`serialize`].
pub const FORMAT_VERSION: u64 = 1;

#[derive(Serialize)]
struct DocumentRef<'a> {
    format_version: u64,
    session: &'a WorkflowSession,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Document {
    #[allow(dead_code)]
    format_version: u64,
    session: WorkflowSession,
}

/// Encodes a session as a versioned, pretty-printed JSON document.
pub fn serialize(session: &WorkflowSession) -> Result<String, WorkflowError> {
    let document = DocumentRef {
        format_version: FORMAT_VERSION,
        session,
    };
    serde_json::to_string_pretty(&document).map_err(WorkflowError::Encode)
}

/// Decodes a document written by [`serialize`].
///
/// Anything that is not a well-formed document of the current version describing a
/// consistent session is rejected as [`WorkflowError::CorruptSession`]: invalid JSON,
/// unknown or missing fields, unknown stage values, or state the session could never have
/// reached, such as RESULTS without a score.
pub fn deserialize(text: &str) -> Result<WorkflowSession, WorkflowError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| WorkflowError::CorruptSession(format!("not a JSON document: {}", e)))?;

    match value.get("format_version").and_then(Value::as_u64) {
        Some(FORMAT_VERSION) => {}
        Some(other) => {
            return Err(WorkflowError::CorruptSession(format!(
                "unsupported format version {} (expected {})",
                other, FORMAT_VERSION
            )));
        }
        None => {
            return Err(WorkflowError::CorruptSession(
                "missing format_version".to_string(),
            ));
        }
    }

    let document: Document = serde_json::from_value(value)
        .map_err(|e| WorkflowError::CorruptSession(e.to_string()))?;
    document
        .session
        .check_consistency()
        .map_err(WorkflowError::CorruptSession)?;
    debug!(session = %document.session.id(), "Session document decoded.");
    Ok(document.session)
}

/// The file name sessions are stored under by default.
pub fn default_file_name(session: &WorkflowSession) -> String {
    format!("workflow_{}.json", session.id())
}

pub fn save_to_path(session: &WorkflowSession, path: &Path) -> Result<(), WorkflowError> {
    let text = serialize(session)?;
    fs::write(path, text).map_err(|source| WorkflowError::Io {
        path: path.to_string_lossy().to_string(),
        source,
    })
}

pub fn load_from_path(path: &Path) -> Result<WorkflowSession, WorkflowError> {
    let text = fs::read_to_string(path).map_err(|source| WorkflowError::Io {
        path: path.to_string_lossy().to_string(),
        source,
    })?;
    deserialize(&text)
}
