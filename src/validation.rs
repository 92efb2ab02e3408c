use crate::task::{MAX_DAYS, TaskSelection};
use thiserror::Error;

/// Rejections raised before any expansion runs. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("select at least one task")]
    EmptySelection,
    #[error("task '{task}' needs at least 1 day (got {dias})")]
    InvalidDays { task: String, dias: i32 },
    #[error("task '{task}' allows at most {max} days (got {dias})", max = MAX_DAYS)]
    TooManyDays { task: String, dias: i32 },
    #[error("enter at least one item")]
    EmptyItems,
}

pub fn validate_selection(selection: &TaskSelection) -> Result<(), ValidationError> {
    if selection.dias <= 0 {
        return Err(ValidationError::InvalidDays {
            task: selection.nome.clone(),
            dias: selection.dias,
        });
    }
    if selection.dias > MAX_DAYS {
        return Err(ValidationError::TooManyDays {
            task: selection.nome.clone(),
            dias: selection.dias,
        });
    }
    Ok(())
}

/// Guards `expand_percentual`: stops at the first offending selection.
pub fn validate_percentual(selections: &[TaskSelection]) -> Result<(), ValidationError> {
    if selections.is_empty() {
        return Err(ValidationError::EmptySelection);
    }
    for selection in selections {
        validate_selection(selection)?;
    }
    Ok(())
}

/// Guards `expand_multiplicador`: at least one item must survive trimming.
pub fn validate_multiplicador<S: AsRef<str>>(items: &[S]) -> Result<(), ValidationError> {
    if items.iter().all(|item| item.as_ref().trim().is_empty()) {
        return Err(ValidationError::EmptyItems);
    }
    Ok(())
}
