// db/taskdb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::taskmodel::TaskAssignment;

#[async_trait]
pub trait TaskExt {
    /// Completed, unclaimed assignments whose completion is at or before the
    /// cutoff. The conversion batch claims exactly these.
    async fn get_convertible_assignments(
        &self,
        user_id: Uuid,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<TaskAssignment>, sqlx::Error>;

    async fn mark_rewards_claimed(
        &self,
        assignment_ids: &[Uuid],
    ) -> Result<u64, sqlx::Error>;
}

#[async_trait]
impl TaskExt for DBClient {
    async fn get_convertible_assignments(
        &self,
        user_id: Uuid,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<TaskAssignment>, sqlx::Error> {
        sqlx::query_as::<_, TaskAssignment>(
            r#"
            SELECT
                id,
                user_id,
                task_id,
                status,
                reward_points,
                completed_at,
                reward_claimed,
                created_at
            FROM task_assignments
            WHERE user_id = $1
              AND status = 'completed'
              AND reward_claimed = false
              AND completed_at IS NOT NULL
              AND completed_at <= $2
            ORDER BY completed_at
            "#,
        )
        .bind(user_id)
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
    }

    async fn mark_rewards_claimed(&self, assignment_ids: &[Uuid]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE task_assignments SET reward_claimed = true WHERE id = ANY($1)",
        )
        .bind(assignment_ids)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
