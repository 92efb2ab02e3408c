use crate::task::{DailyTaskRecord, ExpandedTask, GenericTask};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const WHOLE_EPSILON: f64 = 1e-9;

/// Renders a percentage without decimals when it is whole (`50%`) and with
/// one decimal otherwise (`33.3%`).
pub fn format_percent(value: f64) -> String {
    if (value - value.round()).abs() < WHOLE_EPSILON {
        format!("{value:.0}%")
    } else {
        format!("{value:.1}%")
    }
}

/// `"{code} - {subconjunto} - {percent} | Dia {dd/mm}"`
pub fn format_generic_task_name(
    code: &str,
    subconjunto: &str,
    percentual: f64,
    date: NaiveDate,
) -> String {
    format!(
        "{code} - {subconjunto} - {} | Dia {}",
        format_percent(percentual),
        date.format("%d/%m")
    )
}

/// Attaches the rendered name to each distributed record and drops the
/// UI-only holiday flag.
pub fn name_generic_tasks(
    code: &str,
    subconjunto: &str,
    records: &[DailyTaskRecord],
) -> Vec<GenericTask> {
    records
        .iter()
        .map(|record| GenericTask {
            nome: format_generic_task_name(
                code,
                subconjunto,
                record.percentual_pendencia,
                record.data,
            ),
            data: record.data,
            horas_previstas: record.horas_previstas,
            percentual_pendencia: record.percentual_pendencia,
            status: record.status.clone(),
            dono_idx: record.dono_idx,
            dono_total: record.dono_total,
        })
        .collect()
}

/// Preview of what will be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub total_items: usize,
    pub tarefas: Vec<String>,
}

pub fn summarize(tasks: &[ExpandedTask]) -> TaskSummary {
    TaskSummary {
        total_items: tasks.len(),
        tarefas: tasks.iter().map(|t| t.tarefa.clone()).collect(),
    }
}
