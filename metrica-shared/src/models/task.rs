/// Task, role-task, and task-log models
///
/// These tables are populated exclusively through bulk CSV ingestion.
/// Each bulk insert is a single multi-row statement, so a batch either
/// inserts completely or not at all.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id INTEGER PRIMARY KEY,
///     name TEXT NOT NULL,
///     description TEXT NOT NULL
/// );
///
/// CREATE TABLE role_tasks (
///     role_id INTEGER NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
///     task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     PRIMARY KEY (role_id, task_id)
/// );
///
/// CREATE TABLE user_task_logs (
///     id SERIAL PRIMARY KEY,
///     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     date DATE NOT NULL,
///     quantity NUMERIC NOT NULL DEFAULT 1
/// );
/// ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Task model
///
/// Task ids come from the uploaded file rather than a sequence.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: i32,
    pub name: String,
    pub description: String,
}

/// Association between a role and a task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RoleTask {
    pub role_id: i32,
    pub task_id: i32,
}

/// Input row for a user-task log entry
///
/// `quantity` defaults to 1 when the uploaded cell is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTaskLog {
    pub user_id: i32,
    pub task_id: i32,
    pub date: NaiveDate,
    pub quantity: Decimal,
}

impl Task {
    /// Bulk-inserts task rows, returning the inserted count
    pub async fn insert_many(pool: &PgPool, rows: &[Task]) -> Result<u64, sqlx::Error> {
        if rows.is_empty() {
            return Ok(0);
        }

        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let names: Vec<String> = rows.iter().map(|r| r.name.clone()).collect();
        let descriptions: Vec<String> = rows.iter().map(|r| r.description.clone()).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO tasks (id, name, description)
            SELECT * FROM UNNEST($1::int4[], $2::text[], $3::text[])
            "#,
        )
        .bind(&ids)
        .bind(&names)
        .bind(&descriptions)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}

impl RoleTask {
    /// Bulk-inserts role-task association rows, returning the inserted count
    pub async fn insert_many(pool: &PgPool, rows: &[RoleTask]) -> Result<u64, sqlx::Error> {
        if rows.is_empty() {
            return Ok(0);
        }

        let role_ids: Vec<i32> = rows.iter().map(|r| r.role_id).collect();
        let task_ids: Vec<i32> = rows.iter().map(|r| r.task_id).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO role_tasks (role_id, task_id)
            SELECT * FROM UNNEST($1::int4[], $2::int4[])
            "#,
        )
        .bind(&role_ids)
        .bind(&task_ids)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}

impl NewTaskLog {
    /// Bulk-inserts task-log rows, returning the inserted count
    pub async fn insert_many(pool: &PgPool, rows: &[NewTaskLog]) -> Result<u64, sqlx::Error> {
        if rows.is_empty() {
            return Ok(0);
        }

        let user_ids: Vec<i32> = rows.iter().map(|r| r.user_id).collect();
        let task_ids: Vec<i32> = rows.iter().map(|r| r.task_id).collect();
        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        let quantities: Vec<Decimal> = rows.iter().map(|r| r.quantity).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO user_task_logs (user_id, task_id, date, quantity)
            SELECT * FROM UNNEST($1::int4[], $2::int4[], $3::date[], $4::numeric[])
            "#,
        )
        .bind(&user_ids)
        .bind(&task_ids)
        .bind(&dates)
        .bind(&quantities)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_serialization() {
        let task = Task {
            id: 3,
            name: "review".to_string(),
            description: "weekly review".to_string(),
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["description"], "weekly review");
    }

    // Integration tests for bulk inserts are in metrica-api/tests
}
