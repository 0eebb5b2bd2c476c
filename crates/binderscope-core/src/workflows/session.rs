use super::error::WorkflowError;
use super::inputs::{BinderInput, TargetInput};
use super::prediction::PredictionOutput;
use super::stage::{StageStatus, WorkflowStage};
use crate::core::io::parse_structure;
use crate::core::models::side::Side;
use crate::core::models::structure::{Structure, StructureSource};
use crate::core::validation::{ValidationError, validate_binding_site};
use crate::engine::interface::InterfaceResult;
use crate::engine::scoring::QualityScore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};
use uuid::Uuid;

/// A value stored on a session, with the time it was produced and a staleness marker.
///
/// An artifact goes stale when something it was computed from is replaced. Stale
/// artifacts are kept for display but never satisfy a stage predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Artifact<T> {
    value: T,
    produced_at: DateTime<Utc>,
    stale: bool,
}

impl<T> Artifact<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            value,
            produced_at: Utc::now(),
            stale: false,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn produced_at(&self) -> DateTime<Utc> {
        self.produced_at
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// The value, unless it has gone stale.
    pub fn current(&self) -> Option<&T> {
        (!self.stale).then_some(&self.value)
    }

    /// Returns `true` if the artifact was current before the call.
    fn mark_stale(&mut self) -> bool {
        !std::mem::replace(&mut self.stale, true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionOutcome {
    Created,
    Advanced,
    Retreated,
}

/// One entry of the stage-transition history: the stage entered and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionRecord {
    pub stage: WorkflowStage,
    pub at: DateTime<Utc>,
    pub outcome: TransitionOutcome,
}

/// A binder design project and every artifact produced for it.
///
/// The session owns its artifacts outright; callers read them through accessors and change
/// them only through the methods below. Each of those methods checks all of its
/// preconditions first, so an `Err` always means the session was left untouched.
///
/// Artifacts belong to the stage that produces them. Once the session has moved past a
/// stage, that stage's artifacts are locked until [`retreat`](Self::retreat) brings the
/// session back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowSession {
    id: Uuid,
    project_name: String,
    created_at: DateTime<Utc>,
    last_updated: DateTime<Utc>,
    current_stage: WorkflowStage,
    stage_statuses: BTreeMap<WorkflowStage, StageStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_input: Option<Artifact<TargetInput>>,
    /// Target residue numbers the binder is meant to engage; empty for the whole interface.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    binding_site: Vec<isize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_structure: Option<Artifact<Structure>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    binder_input: Option<Artifact<BinderInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    binder_structure: Option<Artifact<Structure>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    interface: Option<Artifact<InterfaceResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quality: Option<Artifact<QualityScore>>,
    #[serde(default)]
    notes: String,
    history: Vec<TransitionRecord>,
}

impl WorkflowSession {
    pub fn new(project_name: &str) -> Self {
        let now = Utc::now();
        let stage_statuses = WorkflowStage::ALL
            .iter()
            .map(|&stage| {
                let status = if stage == WorkflowStage::TargetInput {
                    StageStatus::InProgress
                } else {
                    StageStatus::NotStarted
                };
                (stage, status)
            })
            .collect();
        Self {
            id: Uuid::new_v4(),
            project_name: project_name.to_string(),
            created_at: now,
            last_updated: now,
            current_stage: WorkflowStage::TargetInput,
            stage_statuses,
            target_input: None,
            binding_site: Vec::new(),
            target_structure: None,
            binder_input: None,
            binder_structure: None,
            interface: None,
            quality: None,
            notes: String::new(),
            history: vec![TransitionRecord {
                stage: WorkflowStage::TargetInput,
                at: now,
                outcome: TransitionOutcome::Created,
            }],
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    pub fn current_stage(&self) -> WorkflowStage {
        self.current_stage
    }

    pub fn stage_status(&self, stage: WorkflowStage) -> StageStatus {
        self.stage_statuses
            .get(&stage)
            .copied()
            .unwrap_or(StageStatus::NotStarted)
    }

    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Replaces the free-form project notes. Notes are never locked.
    pub fn set_notes(&mut self, notes: &str) {
        self.notes = notes.to_string();
        self.touch();
    }

    pub fn target_input(&self) -> Option<&Artifact<TargetInput>> {
        self.target_input.as_ref()
    }

    pub fn binding_site(&self) -> &[isize] {
        &self.binding_site
    }

    pub fn binder_input(&self) -> Option<&Artifact<BinderInput>> {
        self.binder_input.as_ref()
    }

    pub fn structure(&self, side: Side) -> Option<&Artifact<Structure>> {
        match side {
            Side::Target => self.target_structure.as_ref(),
            Side::Binder => self.binder_structure.as_ref(),
        }
    }

    pub fn current_structure(&self, side: Side) -> Option<&Structure> {
        self.structure(side).and_then(Artifact::current)
    }

    pub fn interface(&self) -> Option<&Artifact<InterfaceResult>> {
        self.interface.as_ref()
    }

    pub fn quality(&self) -> Option<&Artifact<QualityScore>> {
        self.quality.as_ref()
    }

    /// Fraction of the six stages marked completed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let completed = self
            .stage_statuses
            .values()
            .filter(|&&status| status == StageStatus::Completed)
            .count();
        completed as f64 / WorkflowStage::ALL.len() as f64
    }

    /// The stage that owns the structure for `side`.
    pub fn prediction_stage(side: Side) -> WorkflowStage {
        match side {
            Side::Target => WorkflowStage::TargetPrediction,
            Side::Binder => WorkflowStage::BinderPrediction,
        }
    }

    /// The sequence of the input for `side`, or `None` when that input is a structure.
    pub fn input_sequence(&self, side: Side) -> Result<Option<&str>, WorkflowError> {
        let sequence = match side {
            Side::Target => self.target_input.as_ref().map(|a| a.value().sequence()),
            Side::Binder => self.binder_input.as_ref().map(|a| a.value().sequence()),
        };
        sequence.ok_or(WorkflowError::MissingInput { side })
    }

    pub(crate) fn ensure_writable(&self, stage: WorkflowStage) -> Result<(), WorkflowError> {
        if self.current_stage > stage {
            return Err(WorkflowError::StageLocked {
                stage,
                current: self.current_stage,
            });
        }
        Ok(())
    }

    /// Stores the target input.
    ///
    /// A structure-bearing input also becomes the current target structure; a sequence
    /// input marks any existing target structure stale. Analysis results go stale either
    /// way.
    pub fn set_target_input(&mut self, input: TargetInput) -> Result<(), WorkflowError> {
        self.ensure_writable(WorkflowStage::TargetInput)?;
        let structure = input.structure().cloned().map(|s| {
            let source = match &input {
                TargetInput::FetchedById { id, .. } => StructureSource::FetchedById { id: id.clone() },
                _ => StructureSource::Uploaded,
            };
            s.with_source(source)
        });
        info!(input = %input.describe(), "Target input set.");
        if !self.binding_site.is_empty() {
            info!("Cleared the binding site of the previous target.");
            self.binding_site.clear();
        }
        self.target_input = Some(Artifact::new(input));
        self.invalidate(WorkflowStage::TargetInput);
        self.replace_structure(Side::Target, structure);
        self.touch();
        Ok(())
    }

    /// Annotates the target with the residues the binder should engage.
    ///
    /// Numbers must lie in `1..=n`, where `n` comes from
    /// [`TargetInput::max_residue_number`]. They are stored ascending and without repeats;
    /// an empty list clears the annotation. Setting a new target input clears it too.
    pub fn set_binding_site(&mut self, mut residues: Vec<isize>) -> Result<(), WorkflowError> {
        self.ensure_writable(WorkflowStage::TargetInput)?;
        let input = self
            .target_input
            .as_ref()
            .ok_or(WorkflowError::MissingInput { side: Side::Target })?;
        if !residues.is_empty() {
            let max = match input.value() {
                TargetInput::FetchedById { id, structure: None } => {
                    return Err(ValidationError::MissingFetchedStructure(id.clone()).into());
                }
                other => other.max_residue_number().unwrap_or(0),
            };
            validate_binding_site(&residues, max)?;
        }
        residues.sort_unstable();
        residues.dedup();
        info!(residues = residues.len(), "Binding site set.");
        self.binding_site = residues;
        self.touch();
        Ok(())
    }

    /// Stores the binder input, with the same downstream effects as
    /// [`set_target_input`](Self::set_target_input).
    pub fn set_binder_input(&mut self, input: BinderInput) -> Result<(), WorkflowError> {
        self.ensure_writable(WorkflowStage::BinderDesign)?;
        let structure = input
            .structure()
            .cloned()
            .map(|s| s.with_source(StructureSource::Uploaded));
        info!(input = %input.describe(), "Binder input set.");
        self.binder_input = Some(Artifact::new(input));
        self.invalidate(WorkflowStage::BinderDesign);
        self.replace_structure(Side::Binder, structure);
        self.touch();
        Ok(())
    }

    /// Validates a finished prediction for `side` and stores it as the current structure.
    ///
    /// Raw text is parsed; a separately reported confidence array takes precedence over
    /// B-factor values. The structure is tagged as sequence-derived (with `model`) when
    /// the input was a sequence, otherwise it keeps the input's source.
    pub fn accept_prediction(
        &mut self,
        side: Side,
        output: PredictionOutput,
        model: Option<&str>,
    ) -> Result<(), WorkflowError> {
        let stage = Self::prediction_stage(side);
        self.ensure_writable(stage)?;
        let source = self.prediction_source(side, model)?;

        let structure = match output {
            PredictionOutput::Parsed(structure) => structure,
            PredictionOutput::Raw { text, confidence } => {
                let structure = parse_structure(&text)?;
                match confidence {
                    Some(values) => structure.with_confidence(values)?,
                    None => structure,
                }
            }
        };
        if structure.is_empty() {
            return Err(ValidationError::NoAtoms.into());
        }
        let structure = structure.with_source(source);

        debug!(
            residues = structure.residue_count(),
            mean_confidence = ?structure.mean_confidence(),
            "Accepted {} prediction.",
            side
        );
        self.replace_structure(side, Some(structure));
        self.touch();
        Ok(())
    }

    /// Stores an interface result and its score together.
    pub(crate) fn store_analysis(
        &mut self,
        interface: InterfaceResult,
        quality: QualityScore,
    ) -> Result<(), WorkflowError> {
        self.ensure_writable(WorkflowStage::ComplexAnalysis)?;
        for side in [Side::Target, Side::Binder] {
            if self.current_structure(side).is_none() {
                return Err(WorkflowError::StageNotReady {
                    stage: WorkflowStage::ComplexAnalysis,
                    reason: format!("the {} structure is missing or stale", side),
                });
            }
        }
        self.interface = Some(Artifact::new(interface));
        self.quality = Some(Artifact::new(quality));
        self.invalidate(WorkflowStage::ComplexAnalysis);
        self.touch();
        Ok(())
    }

    /// Checks the predicate that must hold before the session can leave `stage`.
    ///
    /// The error string explains what is missing.
    pub fn stage_readiness(&self, stage: WorkflowStage) -> Result<(), String> {
        match stage {
            WorkflowStage::TargetInput => match &self.target_input {
                Some(input) => input.value().validate().map_err(|e| e.to_string()),
                None => Err("no target input has been provided".to_string()),
            },
            WorkflowStage::TargetPrediction => {
                let structure = self.require_structure(Side::Target)?;
                if structure.confidence().is_none() {
                    return Err("the target structure carries no per-residue confidence".to_string());
                }
                Ok(())
            }
            WorkflowStage::BinderDesign => match &self.binder_input {
                Some(input) => input.value().validate().map_err(|e| e.to_string()),
                None => Err("no binder input has been provided".to_string()),
            },
            WorkflowStage::BinderPrediction => self.require_structure(Side::Binder).map(|_| ()),
            WorkflowStage::ComplexAnalysis => {
                self.require_structure(Side::Target)?;
                self.require_structure(Side::Binder)?;
                if self.interface.as_ref().and_then(Artifact::current).is_none() {
                    return Err("no current interface analysis for this target and binder".to_string());
                }
                if self.quality.as_ref().and_then(Artifact::current).is_none() {
                    return Err("no current quality score for this target and binder".to_string());
                }
                Ok(())
            }
            WorkflowStage::Results => Err("RESULTS is the final stage".to_string()),
        }
    }

    /// Moves to the next stage if the current stage's predicate holds.
    pub fn advance(&mut self) -> Result<WorkflowStage, WorkflowError> {
        let stage = self.current_stage;
        self.stage_readiness(stage)
            .map_err(|reason| WorkflowError::StageNotReady { stage, reason })?;
        let Some(next) = stage.next() else {
            return Err(WorkflowError::StageNotReady {
                stage,
                reason: "RESULTS is the final stage".to_string(),
            });
        };

        self.stage_statuses.insert(stage, StageStatus::Completed);
        let next_status = if next.is_terminal() {
            StageStatus::Completed
        } else {
            StageStatus::InProgress
        };
        self.stage_statuses.insert(next, next_status);
        self.current_stage = next;
        self.record(next, TransitionOutcome::Advanced);
        info!("Advanced from {} to {}.", stage, next);
        Ok(next)
    }

    /// Moves back to an earlier stage. Artifacts are kept.
    pub fn retreat(&mut self, to: WorkflowStage) -> Result<(), WorkflowError> {
        let from = self.current_stage;
        if to >= from {
            return Err(WorkflowError::InvalidRetreat { from, to });
        }
        for (&stage, status) in self.stage_statuses.range_mut(to..) {
            if stage > to && (*status == StageStatus::InProgress || stage.is_terminal()) {
                *status = StageStatus::NotStarted;
            }
        }
        self.stage_statuses.insert(to, StageStatus::InProgress);
        self.current_stage = to;
        self.record(to, TransitionOutcome::Retreated);
        info!("Retreated from {} to {}.", from, to);
        Ok(())
    }

    /// Verifies the invariants a session maintains between operations.
    pub(crate) fn check_consistency(&self) -> Result<(), String> {
        let last = self
            .history
            .last()
            .ok_or_else(|| "the transition history is empty".to_string())?;
        if last.stage != self.current_stage {
            return Err(format!(
                "the history ends at {} but the current stage is {}",
                last.stage, self.current_stage
            ));
        }
        if self.last_updated < self.created_at {
            return Err("last update precedes creation".to_string());
        }
        for &stage in WorkflowStage::ALL.iter() {
            let Some(&status) = self.stage_statuses.get(&stage) else {
                return Err(format!("no status recorded for stage {}", stage));
            };
            if stage < self.current_stage {
                if status != StageStatus::Completed {
                    return Err(format!("stage {} precedes the current stage but is {}", stage, status));
                }
                self.stage_readiness(stage)
                    .map_err(|reason| format!("stage {} was passed but {}", stage, reason))?;
            }
        }
        let expected = if self.current_stage.is_terminal() {
            StageStatus::Completed
        } else {
            StageStatus::InProgress
        };
        let actual = self.stage_status(self.current_stage);
        if actual != expected {
            return Err(format!(
                "the current stage {} is {} instead of {}",
                self.current_stage, actual, expected
            ));
        }

        if !self.binding_site.is_empty() {
            let max = self
                .target_input
                .as_ref()
                .and_then(|input| input.value().max_residue_number())
                .ok_or_else(|| "a binding site is set without a target to hold it".to_string())?;
            validate_binding_site(&self.binding_site, max).map_err(|e| e.to_string())?;
            if self.binding_site.windows(2).any(|w| w[0] >= w[1]) {
                return Err("binding-site residues are not in ascending order".to_string());
            }
        }

        let stored = [
            ("target structure", self.target_structure.as_ref().map(Artifact::value)),
            ("binder structure", self.binder_structure.as_ref().map(Artifact::value)),
            (
                "target input",
                self.target_input.as_ref().and_then(|a| a.value().structure()),
            ),
            (
                "binder input",
                self.binder_input.as_ref().and_then(|a| a.value().structure()),
            ),
        ];
        for (label, structure) in stored {
            if let Some(structure) = structure {
                structure
                    .check_invariants()
                    .map_err(|reason| format!("the {} is malformed: {}", label, reason))?;
            }
        }
        Ok(())
    }

    fn require_structure(&self, side: Side) -> Result<&Structure, String> {
        let structure = self
            .current_structure(side)
            .ok_or_else(|| format!("the {} structure is missing or stale", side))?;
        if structure.atom_count() == 0 {
            return Err(format!("the {} structure has no atoms", side));
        }
        Ok(structure)
    }

    fn prediction_source(
        &self,
        side: Side,
        model: Option<&str>,
    ) -> Result<StructureSource, WorkflowError> {
        let predicted = || StructureSource::SequenceDerived {
            model: model.map(str::to_string),
        };
        match side {
            Side::Target => match self.target_input.as_ref().map(Artifact::value) {
                None => Err(WorkflowError::MissingInput { side }),
                Some(TargetInput::Sequence { .. }) => Ok(predicted()),
                Some(TargetInput::UploadedStructure { .. }) => Ok(StructureSource::Uploaded),
                Some(TargetInput::FetchedById { id, .. }) => {
                    Ok(StructureSource::FetchedById { id: id.clone() })
                }
            },
            Side::Binder => match self.binder_input.as_ref().map(Artifact::value) {
                None => Err(WorkflowError::MissingInput { side }),
                Some(BinderInput::Sequence { .. }) => Ok(predicted()),
                Some(BinderInput::UploadedStructure { .. }) => Ok(StructureSource::Uploaded),
            },
        }
    }

    /// Installs a new structure for `side`, or marks the old one stale when there is none.
    fn replace_structure(&mut self, side: Side, structure: Option<Structure>) {
        let slot = match side {
            Side::Target => &mut self.target_structure,
            Side::Binder => &mut self.binder_structure,
        };
        let changed = match structure {
            Some(structure) => {
                let structure = if structure.confidence().is_none() {
                    structure.with_b_factor_confidence()
                } else {
                    structure
                };
                *slot = Some(Artifact::new(structure));
                true
            }
            None => slot.as_mut().is_some_and(Artifact::mark_stale),
        };
        if changed {
            self.invalidate(Self::prediction_stage(side));
        }
        self.stale_analysis();
    }

    fn stale_analysis(&mut self) {
        let interface = self.interface.as_mut().is_some_and(Artifact::mark_stale);
        let quality = self.quality.as_mut().is_some_and(Artifact::mark_stale);
        if interface || quality {
            debug!("Interface analysis and score marked stale.");
            self.invalidate(WorkflowStage::ComplexAnalysis);
        }
    }

    /// A completed stage whose artifacts change is no longer completed.
    fn invalidate(&mut self, stage: WorkflowStage) {
        if let Some(status) = self.stage_statuses.get_mut(&stage) {
            if *status == StageStatus::Completed {
                *status = StageStatus::Invalidated;
            }
        }
    }

    fn record(&mut self, stage: WorkflowStage, outcome: TransitionOutcome) {
        let at = Utc::now();
        self.history.push(TransitionRecord { stage, at, outcome });
        self.last_updated = at;
    }

    fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}
