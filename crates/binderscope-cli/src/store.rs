use crate::error::{CliError, Result};
use binderscope::workflows::persistence;
use binderscope::workflows::session::WorkflowSession;
use binderscope::workflows::stage::WorkflowStage;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One line of `binderscope list`.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub id: String,
    pub project_name: String,
    pub stage: WorkflowStage,
    pub progress: f64,
    pub last_updated: DateTime<Utc>,
}

/// Saved sessions, one JSON document per file.
#[derive(Debug)]
pub struct SessionStore {
    base_path: PathBuf,
}

impl SessionStore {
    pub fn new(custom_path: Option<&Path>) -> Result<Self> {
        let base_path = match custom_path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };
        debug!("SessionStore initialized with path: {:?}", &base_path);
        Ok(Self { base_path })
    }

    pub fn path(&self) -> &Path {
        &self.base_path
    }

    pub fn path_for(&self, session: &WorkflowSession) -> PathBuf {
        self.base_path.join(persistence::default_file_name(session))
    }

    pub fn save(&self, session: &WorkflowSession) -> Result<PathBuf> {
        fs::create_dir_all(&self.base_path)?;
        let path = self.path_for(session);
        persistence::save_to_path(session, &path)?;
        debug!("Saved session {} to {:?}", session.id(), &path);
        Ok(path)
    }

    /// Loads a session by file path, full id, or unique id prefix.
    ///
    /// Returns the path the session was loaded from so it can be written back in place.
    pub fn load(&self, reference: &str) -> Result<(WorkflowSession, PathBuf)> {
        let as_path = Path::new(reference);
        if as_path.is_file() {
            return Ok((persistence::load_from_path(as_path)?, as_path.to_path_buf()));
        }

        let matches: Vec<PathBuf> = self
            .session_files()?
            .into_iter()
            .filter(|path| {
                session_id_of(path).is_some_and(|id| id.starts_with(&reference.to_lowercase()))
            })
            .collect();
        match matches.as_slice() {
            [path] => Ok((persistence::load_from_path(path)?, path.clone())),
            [] => Err(CliError::Store(format!(
                "No session matches '{}' in {}",
                reference,
                self.base_path.display()
            ))),
            _ => Err(CliError::Store(format!(
                "'{}' matches {} sessions; use a longer id prefix",
                reference,
                matches.len()
            ))),
        }
    }

    /// Summaries of every readable session, most recently updated first.
    ///
    /// Files that fail to load are skipped with a warning.
    pub fn list(&self) -> Result<Vec<SessionSummary>> {
        let mut summaries = Vec::new();
        for path in self.session_files()? {
            match persistence::load_from_path(&path) {
                Ok(session) => summaries.push(SessionSummary {
                    id: session.id().to_string(),
                    project_name: session.project_name().to_string(),
                    stage: session.current_stage(),
                    progress: session.progress(),
                    last_updated: session.last_updated(),
                }),
                Err(e) => warn!("Skipping unreadable session file {:?}: {}", path, e),
            }
        }
        summaries.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
        Ok(summaries)
    }

    fn session_files(&self) -> Result<Vec<PathBuf>> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            if path.is_file() && session_id_of(&path).is_some() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn default_path() -> Result<PathBuf> {
        ProjectDirs::from("org", "binderscope", "binderscope")
            .map(|dirs| dirs.data_dir().join("sessions"))
            .ok_or_else(|| {
                CliError::Store("Could not determine default session directory.".to_string())
            })
    }
}

fn session_id_of(path: &Path) -> Option<&str> {
    path.file_name()?
        .to_str()?
        .strip_prefix("workflow_")?
        .strip_suffix(".json")
}
