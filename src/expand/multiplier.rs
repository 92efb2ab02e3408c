use crate::task::{CategorySelection, ExpandedTask};
use tracing::debug;

/// Cross product of items and fixed tasks, labelled `"{code} - <{item}> - {task}"`.
///
/// Items are trimmed and blanks skipped; duplicates are kept. Outer loop runs
/// over items, inner loop over fixed tasks.
pub fn expand_multiplicador<S, T>(
    code: &str,
    project: &str,
    wbs_type: &str,
    category_name: &str,
    items: &[S],
    fixed_tasks: &[T],
) -> Vec<ExpandedTask>
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    let mut expanded = Vec::new();
    for item in items {
        let item = item.as_ref().trim();
        if item.is_empty() {
            continue;
        }
        for fixed in fixed_tasks {
            expanded.push(ExpandedTask {
                tarefa: format!("{code} - <{item}> - {}", fixed.as_ref()),
                projeto: project.to_string(),
                wbs_type: wbs_type.to_string(),
                categoria: Some(category_name.to_string()),
            });
        }
    }
    debug!(
        wbs_type,
        category = category_name,
        tasks = expanded.len(),
        "expanded multiplicador selection"
    );
    expanded
}

pub fn expand_category(
    code: &str,
    project: &str,
    wbs_type: &str,
    selection: &CategorySelection,
) -> Vec<ExpandedTask> {
    expand_multiplicador(
        code,
        project,
        wbs_type,
        &selection.categoria_nome,
        &selection.itens,
        &selection.tarefas_fixas,
    )
}
