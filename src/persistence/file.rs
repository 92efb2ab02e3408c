use super::{PersistenceError, PersistenceResult};
use crate::task::{DailyTaskRecord, ExpandedTask, SubmissionPayload};
use serde::Serialize;
use std::fs::File;
use std::path::Path;

pub fn save_payload_to_json<P: AsRef<Path>>(
    payload: &SubmissionPayload,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, payload)?;
    Ok(())
}

pub fn load_payload_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<SubmissionPayload> {
    let file = File::open(path)?;
    let payload: SubmissionPayload = serde_json::from_reader(file)?;
    if payload.pending_id.trim().is_empty() {
        return Err(PersistenceError::InvalidData(
            "payload has an empty pending_id".into(),
        ));
    }
    Ok(payload)
}

#[derive(Serialize)]
struct TaskCsvRecord<'a> {
    tarefa: &'a str,
    projeto: &'a str,
    wbs_type: &'a str,
    categoria: &'a str,
}

impl<'a> From<&'a ExpandedTask> for TaskCsvRecord<'a> {
    fn from(task: &'a ExpandedTask) -> Self {
        Self {
            tarefa: &task.tarefa,
            projeto: &task.projeto,
            wbs_type: &task.wbs_type,
            categoria: task.categoria.as_deref().unwrap_or_default(),
        }
    }
}

const TASK_CSV_HEADER: [&str; 4] = ["tarefa", "projeto", "wbs_type", "categoria"];

const RECORD_CSV_HEADER: [&str; 7] = [
    "data",
    "horas_previstas",
    "percentual_pendencia",
    "status",
    "ajustada_feriado",
    "dono_idx",
    "dono_total",
];

/// An empty list still produces the header row.
pub fn save_tasks_to_csv<P: AsRef<Path>>(tasks: &[ExpandedTask], path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    if tasks.is_empty() {
        writer.write_record(TASK_CSV_HEADER)?;
    }
    for task in tasks {
        writer.serialize(TaskCsvRecord::from(task))?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct RecordCsvRow {
    data: String,
    horas_previstas: f64,
    percentual_pendencia: f64,
    status: String,
    ajustada_feriado: bool,
    dono_idx: String,
    dono_total: String,
}

impl From<&DailyTaskRecord> for RecordCsvRow {
    fn from(record: &DailyTaskRecord) -> Self {
        Self {
            data: record.data.format("%Y-%m-%d").to_string(),
            horas_previstas: record.horas_previstas,
            percentual_pendencia: record.percentual_pendencia,
            status: record.status.clone(),
            ajustada_feriado: record.ajustada_feriado,
            dono_idx: format_option_u32(record.dono_idx),
            dono_total: format_option_u32(record.dono_total),
        }
    }
}

pub fn save_records_to_csv<P: AsRef<Path>>(
    records: &[DailyTaskRecord],
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    if records.is_empty() {
        writer.write_record(RECORD_CSV_HEADER)?;
    }
    for record in records {
        writer.serialize(RecordCsvRow::from(record))?;
    }
    writer.flush()?;
    Ok(())
}

fn format_option_u32(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
