use crate::task::{ExpandedTask, TaskSelection};
use tracing::debug;

/// Progressive completion milestones for a task spread over `dias` days.
///
/// Every milestone is `100 / dias * i` rounded half-to-even, and the last one
/// is forced to exactly 100 so the series always closes even when 100 does
/// not divide evenly (`3 -> [33, 67, 100]`).
pub fn progressive_percentages(dias: i32) -> Vec<u32> {
    if dias <= 0 {
        return Vec::new();
    }
    if dias == 1 {
        return vec![100];
    }

    let increment = 100.0 / f64::from(dias);
    (1..=dias)
        .map(|i| {
            if i == dias {
                100
            } else {
                let value = (increment * f64::from(i)).round_ties_even() as u32;
                value.min(100)
            }
        })
        .collect()
}

/// Expands each selection into one task per milestone, labelled
/// `"{code} - {id}. {name} - {percent}%"`.
///
/// Callers run `validate_percentual` first; a non-positive day count simply
/// contributes nothing here.
pub fn expand_percentual(
    code: &str,
    project: &str,
    wbs_type: &str,
    selections: &[TaskSelection],
) -> Vec<ExpandedTask> {
    let mut expanded = Vec::new();
    for selection in selections {
        for percent in progressive_percentages(selection.dias) {
            expanded.push(ExpandedTask {
                tarefa: format!("{code} - {}. {} - {percent}%", selection.id, selection.nome),
                projeto: project.to_string(),
                wbs_type: wbs_type.to_string(),
                categoria: None,
            });
        }
    }
    debug!(
        wbs_type,
        selections = selections.len(),
        tasks = expanded.len(),
        "expanded percentual selection"
    );
    expanded
}
