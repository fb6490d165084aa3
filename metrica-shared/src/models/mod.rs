/// Database models
///
/// One module per table group:
///
/// - `user`: users, roles, and the user_roles association
/// - `task`: tasks, role_tasks, and user_task_logs
/// - `metrics`: productivity, sales, and reports

pub mod metrics;
pub mod task;
pub mod user;
