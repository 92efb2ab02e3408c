use crate::expand::{expand_category, expand_percentual};
use crate::naming::name_generic_tasks;
use crate::task::{CategorySelection, ExpandedTask, GenericTask, SubmissionPayload, TaskSelection};
use crate::validation::{ValidationError, validate_multiplicador, validate_percentual};
use crate::workload::{DEFAULT_HOURS_PER_PERSON, distribute_daily};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Pendencia,
    TasksGenericas,
    Wbs,
    Review,
}

impl WizardStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::Pendencia => "pendencia",
            WizardStep::TasksGenericas => "tasks_genericas",
            WizardStep::Wbs => "wbs",
            WizardStep::Review => "review",
        }
    }

    fn previous(self) -> Self {
        match self {
            WizardStep::Pendencia | WizardStep::TasksGenericas => WizardStep::Pendencia,
            WizardStep::Wbs => WizardStep::TasksGenericas,
            WizardStep::Review => WizardStep::Wbs,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("action requires step '{expected}' but the wizard is at '{actual}'")]
    WrongStep {
        expected: WizardStep,
        actual: WizardStep,
    },
    #[error("fill in the pending item first")]
    MissingPendencia,
    #[error("invalid pending item: {0}")]
    InvalidPendencia(String),
    #[error("the date range has no weekday to schedule")]
    NoGenericTasks,
    #[error("choose a WBS template first")]
    MissingSelection,
    #[error("WBS code and project are required")]
    MissingWbsIdentity,
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// The pending item the generic tasks are generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pendencia {
    pub pending_id: String,
    pub os: String,
    pub subconjunto: String,
    pub data_inicio: NaiveDate,
    pub prazo_limite: NaiveDate,
    pub colaboradores: u32,
}

impl Pendencia {
    fn validate(&self) -> Result<(), WizardError> {
        if self.pending_id.trim().is_empty() {
            return Err(WizardError::InvalidPendencia("pending_id is empty".into()));
        }
        if self.os.trim().is_empty() {
            return Err(WizardError::InvalidPendencia("os is empty".into()));
        }
        if self.data_inicio > self.prazo_limite {
            return Err(WizardError::InvalidPendencia(format!(
                "start date {} is after deadline {}",
                self.data_inicio, self.prazo_limite
            )));
        }
        if self.colaboradores == 0 {
            return Err(WizardError::InvalidPendencia(
                "at least one collaborator is required".into(),
            ));
        }
        Ok(())
    }
}

/// The template-driven part of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tipo_logica", rename_all = "lowercase")]
pub enum WbsSelection {
    Percentual {
        wbs_type: String,
        code: String,
        project: String,
        selections: Vec<TaskSelection>,
    },
    Multiplicador {
        wbs_type: String,
        code: String,
        project: String,
        category: CategorySelection,
    },
}

impl WbsSelection {
    pub fn wbs_type(&self) -> &str {
        match self {
            WbsSelection::Percentual { wbs_type, .. } | WbsSelection::Multiplicador { wbs_type, .. } => {
                wbs_type
            }
        }
    }

    /// Runs the matching validator, then the matching expander.
    pub fn expand(&self) -> Result<Vec<ExpandedTask>, WizardError> {
        match self {
            WbsSelection::Percentual {
                wbs_type,
                code,
                project,
                selections,
            } => {
                require_identity(code, project)?;
                validate_percentual(selections)?;
                Ok(expand_percentual(code, project, wbs_type, selections))
            }
            WbsSelection::Multiplicador {
                wbs_type,
                code,
                project,
                category,
            } => {
                require_identity(code, project)?;
                validate_multiplicador(&category.itens)?;
                Ok(expand_category(code, project, wbs_type, category))
            }
        }
    }
}

fn require_identity(code: &str, project: &str) -> Result<(), WizardError> {
    if code.trim().is_empty() || project.trim().is_empty() {
        return Err(WizardError::MissingWbsIdentity);
    }
    Ok(())
}

/// Explicit state for the pending item -> generic tasks -> WBS -> review flow.
///
/// The step only advances on a `confirm_*` call; `back` keeps everything
/// entered so far.
#[derive(Debug, Clone)]
pub struct Wizard {
    step: WizardStep,
    hours_per_person: f64,
    pendencia: Option<Pendencia>,
    tasks_genericas: Vec<GenericTask>,
    wbs_selection: Option<WbsSelection>,
    wbs_tasks: Vec<ExpandedTask>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new(DEFAULT_HOURS_PER_PERSON)
    }
}

impl Wizard {
    pub fn new(hours_per_person: f64) -> Self {
        Self {
            step: WizardStep::Pendencia,
            hours_per_person,
            pendencia: None,
            tasks_genericas: Vec::new(),
            wbs_selection: None,
            wbs_tasks: Vec::new(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn pendencia(&self) -> Option<&Pendencia> {
        self.pendencia.as_ref()
    }

    pub fn tasks_genericas(&self) -> &[GenericTask] {
        &self.tasks_genericas
    }

    pub fn wbs_selection(&self) -> Option<&WbsSelection> {
        self.wbs_selection.as_ref()
    }

    pub fn wbs_tasks(&self) -> &[ExpandedTask] {
        &self.wbs_tasks
    }

    fn expect_step(&self, expected: WizardStep) -> Result<(), WizardError> {
        if self.step != expected {
            return Err(WizardError::WrongStep {
                expected,
                actual: self.step,
            });
        }
        Ok(())
    }

    pub fn set_pendencia(&mut self, pendencia: Pendencia) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Pendencia)?;
        self.pendencia = Some(pendencia);
        Ok(())
    }

    /// Validates the pending item and generates its named daily tasks.
    pub fn confirm_pendencia(&mut self) -> Result<&[GenericTask], WizardError> {
        self.expect_step(WizardStep::Pendencia)?;
        let pendencia = self.pendencia.as_ref().ok_or(WizardError::MissingPendencia)?;
        pendencia.validate()?;

        let records = distribute_daily(
            pendencia.data_inicio,
            pendencia.prazo_limite,
            pendencia.colaboradores,
            self.hours_per_person,
        );
        if records.is_empty() {
            return Err(WizardError::NoGenericTasks);
        }
        self.tasks_genericas = name_generic_tasks(&pendencia.os, &pendencia.subconjunto, &records);
        debug!(
            pending_id = %pendencia.pending_id,
            tasks = self.tasks_genericas.len(),
            "pendencia confirmed"
        );
        self.step = WizardStep::TasksGenericas;
        Ok(&self.tasks_genericas)
    }

    pub fn confirm_tasks_genericas(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::TasksGenericas)?;
        if self.tasks_genericas.is_empty() {
            return Err(WizardError::NoGenericTasks);
        }
        self.step = WizardStep::Wbs;
        Ok(())
    }

    pub fn set_wbs_selection(&mut self, selection: WbsSelection) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Wbs)?;
        self.wbs_selection = Some(selection);
        Ok(())
    }

    /// Validates and expands the WBS selection, then moves to review.
    pub fn confirm_wbs(&mut self) -> Result<&[ExpandedTask], WizardError> {
        self.expect_step(WizardStep::Wbs)?;
        let selection = self.wbs_selection.as_ref().ok_or(WizardError::MissingSelection)?;
        self.wbs_tasks = selection.expand()?;
        debug!(
            wbs_type = selection.wbs_type(),
            tasks = self.wbs_tasks.len(),
            "wbs confirmed"
        );
        self.step = WizardStep::Review;
        Ok(&self.wbs_tasks)
    }

    pub fn back(&mut self) -> WizardStep {
        self.step = self.step.previous();
        self.step
    }

    pub fn payload(&self) -> Result<SubmissionPayload, WizardError> {
        self.expect_step(WizardStep::Review)?;
        let pendencia = self.pendencia.as_ref().ok_or(WizardError::MissingPendencia)?;
        Ok(SubmissionPayload {
            pending_id: pendencia.pending_id.clone(),
            os: pendencia.os.clone(),
            subconjunto: pendencia.subconjunto.clone(),
            tasks_genericas: self.tasks_genericas.clone(),
            wbs: self.wbs_tasks.clone(),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.hours_per_person);
    }
}
