pub mod calendar;
pub mod config;
pub mod distribution;
pub mod expand;
pub mod naming;
pub mod persistence;
pub mod task;
pub mod template;
pub mod validation;
#[cfg(feature = "webhook")]
pub mod webhook;
pub mod wizard;
pub mod workload;

pub use calendar::{HolidayCalendar, next_friday_on_or_after, weekdays_in_range};
pub use config::{ConfigError, HubConfig};
pub use distribution::{distribute_even, round_to};
pub use expand::{expand_category, expand_multiplicador, expand_percentual, progressive_percentages};
pub use naming::{TaskSummary, format_generic_task_name, name_generic_tasks, summarize};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqlitePlanStore;
pub use persistence::{
    JournalStatus, PersistenceError, PlanStore, StoredPlan, load_payload_from_json,
    save_payload_to_json, save_records_to_csv, save_tasks_to_csv,
};
pub use task::{
    CategorySelection, DailyTaskRecord, ExpandedTask, GenericTask, SubmissionPayload,
    TaskSelection,
};
pub use template::{Category, LogicKind, TemplateTask, WbsTemplate, load_templates, parse_items};
pub use validation::{ValidationError, validate_multiplicador, validate_percentual};
#[cfg(feature = "webhook")]
pub use webhook::{DeliveryReport, DeliveryResult, WebhookClient, WebhookError};
pub use wizard::{Pendencia, WbsSelection, Wizard, WizardError, WizardStep};
pub use workload::{
    DEFAULT_HOURS_PER_PERSON, distribute_daily, distribute_friday_anchored, distribute_weekly,
};
