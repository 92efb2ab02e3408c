use wbs_hub::{TaskSelection, ValidationError, validate_multiplicador, validate_percentual};

#[test]
fn empty_selection_is_rejected_with_message() {
    let err = validate_percentual(&[]).unwrap_err();
    assert_eq!(err, ValidationError::EmptySelection);
    assert!(!err.to_string().is_empty());
}

#[test]
fn zero_days_names_the_task() {
    let err = validate_percentual(&[TaskSelection::new(1, "X", 0)]).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidDays { ref task, dias: 0 } if task == "X"));
    assert!(err.to_string().contains("X"));
}

#[test]
fn first_offending_selection_is_reported() {
    let selections = vec![
        TaskSelection::new(1, "Ok", 2),
        TaskSelection::new(2, "Negativa", -1),
        TaskSelection::new(3, "Zero", 0),
    ];
    let err = validate_percentual(&selections).unwrap_err();
    assert!(err.to_string().contains("Negativa"));
}

#[test]
fn more_than_thirty_days_is_rejected() {
    let err = validate_percentual(&[TaskSelection::new(1, "Longa", 31)]).unwrap_err();
    assert!(matches!(err, ValidationError::TooManyDays { dias: 31, .. }));
    assert!(err.to_string().contains("Longa"));
}

#[test]
fn valid_selection_passes() {
    let selections = vec![TaskSelection::new(1, "A", 1), TaskSelection::new(2, "B", 30)];
    assert!(validate_percentual(&selections).is_ok());
}

#[test]
fn multiplicador_requires_a_non_blank_item() {
    let blank = ["", "   ", "\t"];
    assert_eq!(validate_multiplicador(&blank), Err(ValidationError::EmptyItems));
    let none: [&str; 0] = [];
    assert_eq!(validate_multiplicador(&none), Err(ValidationError::EmptyItems));
    assert!(validate_multiplicador(&[" ", "Motor A"]).is_ok());
}
