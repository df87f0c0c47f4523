use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "assignment_status", rename_all = "snake_case")]
pub enum AssignmentStatus {
    Assigned,
    Completed,
}

/// reward_points is copied from the task at assignment time so the payout
/// is stable even if the task is later re-priced.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct TaskAssignment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub task_id: Uuid,
    pub status: AssignmentStatus,
    pub reward_points: i64,
    pub completed_at: Option<DateTime<Utc>>,
    pub reward_claimed: bool,
    pub created_at: Option<DateTime<Utc>>,
}
