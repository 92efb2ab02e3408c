use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Status carried by every generated generic task.
pub const PLANNED_STATUS: &str = "planejada";

/// Largest day count the wizard accepts for a single template task.
pub const MAX_DAYS: i32 = 30;

/// A template task picked by the user in percentual mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskSelection {
    pub id: u32,
    pub nome: String,
    /// Signed so a non-positive count reaches the validator instead of failing to parse.
    pub dias: i32,
}

impl TaskSelection {
    pub fn new(id: u32, nome: impl Into<String>, dias: i32) -> Self {
        Self {
            id,
            nome: nome.into(),
            dias,
        }
    }
}

/// A category with user-entered items in multiplicador mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategorySelection {
    pub categoria_nome: String,
    /// Duplicates are kept; each produces its own task set.
    pub itens: Vec<String>,
    pub tarefas_fixas: Vec<String>,
}

/// One rendered WBS task, the unit handed to the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedTask {
    pub tarefa: String,
    pub projeto: String,
    pub wbs_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
}

/// One distributed work slot produced by the daily or weekly distributors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTaskRecord {
    pub data: NaiveDate,
    pub horas_previstas: f64,
    pub percentual_pendencia: f64,
    pub status: String,
    /// UI annotation only; dropped before a record is sent.
    pub ajustada_feriado: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dono_idx: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dono_total: Option<u32>,
}

/// A distributed record with its rendered name, as sent and journaled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericTask {
    pub nome: String,
    pub data: NaiveDate,
    pub horas_previstas: f64,
    pub percentual_pendencia: f64,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dono_idx: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dono_total: Option<u32>,
}

/// The combined object posted for one confirmed wizard run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub pending_id: String,
    pub os: String,
    pub subconjunto: String,
    pub tasks_genericas: Vec<GenericTask>,
    pub wbs: Vec<ExpandedTask>,
}
