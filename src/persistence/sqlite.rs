use super::{JournalStatus, PersistenceResult, PlanStore, StoredPlan};
use crate::task::SubmissionPayload;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::sync::Mutex;
use tracing::info;

pub struct SqlitePlanStore {
    connection: Mutex<Connection>,
}

impl SqlitePlanStore {
    /// Opens (or creates) the journal at `path`, creating parent directories.
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS planejamentos (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                pending_id   TEXT,
                os           TEXT,
                subconjunto  TEXT,
                payload_json TEXT,
                status       TEXT DEFAULT 'ok',
                erro_msg     TEXT,
                criado_em    TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS tasks_genericas (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                planejamento_id INTEGER,
                pending_id      TEXT,
                nome            TEXT,
                data            DATE,
                horas_previstas REAL,
                percentual      REAL,
                status          TEXT DEFAULT 'planejada',
                FOREIGN KEY (planejamento_id) REFERENCES planejamentos(id)
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    /// Number of journaled generic-task rows for a plan.
    pub fn count_generic_tasks(&self, plan_id: i64) -> PersistenceResult<i64> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");
        let count = conn.query_row(
            "SELECT COUNT(*) FROM tasks_genericas WHERE planejamento_id = ?1",
            params![plan_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn plan_from_row(row: &Row<'_>) -> rusqlite::Result<PlanRow> {
        Ok(PlanRow {
            id: row.get(0)?,
            pending_id: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            os: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            subconjunto: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            payload_json: row.get(4)?,
            status: row
                .get::<_, Option<String>>(5)?
                .unwrap_or_else(|| JournalStatus::Ok.as_str().to_string()),
            erro_msg: row.get(6)?,
        })
    }
}

/// Raw `planejamentos` row before the payload blob is decoded.
struct PlanRow {
    id: i64,
    pending_id: String,
    os: String,
    subconjunto: String,
    payload_json: String,
    status: String,
    erro_msg: Option<String>,
}

impl PlanRow {
    fn into_stored(self) -> PersistenceResult<StoredPlan> {
        let payload: SubmissionPayload = serde_json::from_str(&self.payload_json)?;
        Ok(StoredPlan {
            id: self.id,
            pending_id: self.pending_id,
            os: self.os,
            subconjunto: self.subconjunto,
            payload,
            status: self.status.parse()?,
            erro_msg: self.erro_msg,
        })
    }
}

const SELECT_PLAN: &str =
    "SELECT id, pending_id, os, subconjunto, payload_json, status, erro_msg FROM planejamentos";

impl PlanStore for SqlitePlanStore {
    fn save_plan(
        &self,
        payload: &SubmissionPayload,
        status: JournalStatus,
        erro_msg: Option<&str>,
    ) -> PersistenceResult<i64> {
        let payload_json = serde_json::to_string(payload)?;
        let mut conn = self.connection.lock().expect("sqlite mutex poisoned");
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO planejamentos (pending_id, os, subconjunto, payload_json, status, erro_msg)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                payload.pending_id,
                payload.os,
                payload.subconjunto,
                payload_json,
                status.as_str(),
                erro_msg
            ],
        )?;
        let plan_id = tx.last_insert_rowid();

        if !payload.pending_id.is_empty() {
            let mut stmt = tx.prepare(
                "INSERT INTO tasks_genericas
                 (planejamento_id, pending_id, nome, data, horas_previstas, percentual, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for task in &payload.tasks_genericas {
                stmt.execute(params![
                    plan_id,
                    payload.pending_id,
                    task.nome,
                    task.data.format("%Y-%m-%d").to_string(),
                    task.horas_previstas,
                    task.percentual_pendencia,
                    task.status
                ])?;
            }
        }
        tx.commit()?;
        info!(
            plan_id,
            pending_id = %payload.pending_id,
            status = status.as_str(),
            tasks = payload.tasks_genericas.len(),
            "journaled plan"
        );
        Ok(plan_id)
    }

    fn load_plan(&self, id: i64) -> PersistenceResult<Option<StoredPlan>> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");
        let mut stmt = conn.prepare(&format!("{SELECT_PLAN} WHERE id = ?1"))?;
        let row = stmt.query_row(params![id], Self::plan_from_row).optional()?;
        row.map(PlanRow::into_stored).transpose()
    }

    fn list_plans(&self) -> PersistenceResult<Vec<StoredPlan>> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");
        let mut stmt = conn.prepare(&format!("{SELECT_PLAN} ORDER BY id ASC"))?;
        let rows = stmt.query_map([], Self::plan_from_row)?;

        let mut plans = Vec::new();
        for row in rows {
            plans.push(row?.into_stored()?);
        }
        Ok(plans)
    }
}
