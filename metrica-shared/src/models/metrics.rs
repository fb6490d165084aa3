/// Productivity, sale, and report models
///
/// Metric rows belong to a user (cascade-deleted with them) and are
/// created either through bulk CSV ingestion or read back unfiltered by
/// the data endpoints. There is no update path.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE productivity (
///     id SERIAL PRIMARY KEY,
///     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     date DATE NOT NULL,
///     value DOUBLE PRECISION NOT NULL
/// );
///
/// CREATE TABLE sales (
///     id SERIAL PRIMARY KEY,
///     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     date DATE NOT NULL,
///     amount DOUBLE PRECISION NOT NULL
/// );
///
/// CREATE TABLE reports (
///     id SERIAL PRIMARY KEY,
///     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL,
///     type VARCHAR(100) NOT NULL
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A productivity measurement for a user on a date
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Productivity {
    pub id: i32,
    pub user_id: i32,
    pub date: NaiveDate,
    pub value: f64,
}

/// A sale recorded for a user on a date
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sale {
    pub id: i32,
    pub user_id: i32,
    pub date: NaiveDate,
    pub amount: f64,
}

/// A report generated for a user at a timezone-aware instant
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Report {
    pub id: i32,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,

    /// Report type label (`type` in the schema and on the wire)
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

/// Input row for a productivity measurement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProductivity {
    pub user_id: i32,
    pub date: NaiveDate,
    pub value: f64,
}

/// Input row for a sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSale {
    pub user_id: i32,
    pub date: NaiveDate,
    pub amount: f64,
}

/// Input row for a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReport {
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Productivity {
    /// Returns every productivity row, in insertion order
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Productivity>(
            r#"
            SELECT id, user_id, date, value
            FROM productivity
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Bulk-inserts productivity rows, returning the inserted count
    pub async fn insert_many(pool: &PgPool, rows: &[NewProductivity]) -> Result<u64, sqlx::Error> {
        if rows.is_empty() {
            return Ok(0);
        }

        let user_ids: Vec<i32> = rows.iter().map(|r| r.user_id).collect();
        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        let values: Vec<f64> = rows.iter().map(|r| r.value).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO productivity (user_id, date, value)
            SELECT * FROM UNNEST($1::int4[], $2::date[], $3::float8[])
            "#,
        )
        .bind(&user_ids)
        .bind(&dates)
        .bind(&values)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}

impl Sale {
    /// Returns every sale row, in insertion order
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, user_id, date, amount
            FROM sales
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Bulk-inserts sale rows, returning the inserted count
    pub async fn insert_many(pool: &PgPool, rows: &[NewSale]) -> Result<u64, sqlx::Error> {
        if rows.is_empty() {
            return Ok(0);
        }

        let user_ids: Vec<i32> = rows.iter().map(|r| r.user_id).collect();
        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        let amounts: Vec<f64> = rows.iter().map(|r| r.amount).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO sales (user_id, date, amount)
            SELECT * FROM UNNEST($1::int4[], $2::date[], $3::float8[])
            "#,
        )
        .bind(&user_ids)
        .bind(&dates)
        .bind(&amounts)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}

impl Report {
    /// Returns every report row, in insertion order
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Report>(
            r#"
            SELECT id, user_id, created_at, type
            FROM reports
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Bulk-inserts report rows, returning the inserted count
    pub async fn insert_many(pool: &PgPool, rows: &[NewReport]) -> Result<u64, sqlx::Error> {
        if rows.is_empty() {
            return Ok(0);
        }

        let user_ids: Vec<i32> = rows.iter().map(|r| r.user_id).collect();
        let created_ats: Vec<DateTime<Utc>> = rows.iter().map(|r| r.created_at).collect();
        let kinds: Vec<String> = rows.iter().map(|r| r.kind.clone()).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO reports (user_id, created_at, type)
            SELECT * FROM UNNEST($1::int4[], $2::timestamptz[], $3::text[])
            "#,
        )
        .bind(&user_ids)
        .bind(&created_ats)
        .bind(&kinds)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_productivity_date_serializes_as_calendar_date() {
        let row = Productivity {
            id: 1,
            user_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            value: 3.5,
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["value"], 3.5);
    }

    #[test]
    fn test_report_kind_serializes_as_type() {
        let row = Report {
            id: 1,
            user_id: 2,
            created_at: "2024-06-01T12:00:00Z".parse().unwrap(),
            kind: "weekly".to_string(),
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["type"], "weekly");
        assert!(json.get("kind").is_none());
    }
}
