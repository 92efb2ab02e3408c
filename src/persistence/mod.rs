use crate::task::SubmissionPayload;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Outcome tag journaled next to a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalStatus {
    Ok,
    ErroTasks,
}

impl JournalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JournalStatus::Ok => "ok",
            JournalStatus::ErroTasks => "erro_tasks",
        }
    }
}

impl fmt::Display for JournalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for JournalStatus {
    type Err = PersistenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ok" => Ok(JournalStatus::Ok),
            "erro_tasks" => Ok(JournalStatus::ErroTasks),
            other => Err(PersistenceError::InvalidData(format!(
                "unknown journal status '{other}'"
            ))),
        }
    }
}

/// A journaled submission as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPlan {
    pub id: i64,
    pub pending_id: String,
    pub os: String,
    pub subconjunto: String,
    pub payload: SubmissionPayload,
    pub status: JournalStatus,
    pub erro_msg: Option<String>,
}

/// Audit/retry journal for submitted payloads.
pub trait PlanStore {
    fn save_plan(
        &self,
        payload: &SubmissionPayload,
        status: JournalStatus,
        erro_msg: Option<&str>,
    ) -> PersistenceResult<i64>;
    fn load_plan(&self, id: i64) -> PersistenceResult<Option<StoredPlan>>;
    fn list_plans(&self) -> PersistenceResult<Vec<StoredPlan>>;
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    load_payload_from_json, save_payload_to_json, save_records_to_csv, save_tasks_to_csv,
};
