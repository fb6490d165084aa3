/// Bulk CSV ingestion endpoints
///
/// Each endpoint accepts a multipart upload containing one CSV file,
/// validates the filename and required columns for its record kind, and
/// inserts every parsed row in a single bulk statement. Partial success
/// is not supported: either all rows insert or the request fails.
///
/// # Endpoints
///
/// - `POST /tasks/tasks` (columns: id, name, description)
/// - `POST /tasks/role-tasks` (columns: role_id, task_id)
/// - `POST /tasks/task-logs` (columns: user_id, task_id, date, quantity)
/// - `POST /tasks/productivity` (columns: user_id, date, value)
/// - `POST /tasks/sales` (columns: user_id, date, amount)
/// - `POST /tasks/reports` (columns: user_id, created_at, type)
///
/// # Response
///
/// ```json
/// {"inserted": 42}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: not a `.csv` file, or no file in the body
/// - `422 Unprocessable Entity`: missing required columns or a
///   malformed cell value

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use metrica_shared::ingest::{self, CsvTable};
use metrica_shared::models::{
    metrics::{Productivity, Report, Sale},
    task::{NewTaskLog, RoleTask, Task},
};
use serde::{Deserialize, Serialize};

/// Ingestion response
#[derive(Debug, Serialize, Deserialize)]
pub struct InsertedResponse {
    /// Number of rows inserted
    pub inserted: u64,
}

/// Pulls the uploaded file out of a multipart body
///
/// Returns the filename and raw bytes of the first field carrying a
/// filename.
async fn read_csv_upload(mut multipart: Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;

        return Ok((filename, data.to_vec()));
    }

    Err(ApiError::BadRequest("Missing file upload".to_string()))
}

/// Parses an upload into a validated CSV table
fn parse_upload(filename: &str, data: &[u8]) -> Result<CsvTable, ApiError> {
    ingest::check_csv_filename(filename)?;
    Ok(CsvTable::parse(data)?)
}

fn created(inserted: u64) -> (StatusCode, Json<InsertedResponse>) {
    (StatusCode::CREATED, Json(InsertedResponse { inserted }))
}

/// Uploads a tasks CSV
pub async fn upload_tasks(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<InsertedResponse>)> {
    let (filename, data) = read_csv_upload(multipart).await?;
    let table = parse_upload(&filename, &data)?;

    let rows = ingest::parse_tasks(&table)?;
    let inserted = Task::insert_many(&state.db, &rows).await?;

    Ok(created(inserted))
}

/// Uploads a role-tasks CSV
pub async fn upload_role_tasks(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<InsertedResponse>)> {
    let (filename, data) = read_csv_upload(multipart).await?;
    let table = parse_upload(&filename, &data)?;

    let rows = ingest::parse_role_tasks(&table)?;
    let inserted = RoleTask::insert_many(&state.db, &rows).await?;

    Ok(created(inserted))
}

/// Uploads a task-logs CSV
pub async fn upload_task_logs(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<InsertedResponse>)> {
    let (filename, data) = read_csv_upload(multipart).await?;
    let table = parse_upload(&filename, &data)?;

    let rows = ingest::parse_task_logs(&table)?;
    let inserted = NewTaskLog::insert_many(&state.db, &rows).await?;

    Ok(created(inserted))
}

/// Uploads a productivity CSV
pub async fn upload_productivity(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<InsertedResponse>)> {
    let (filename, data) = read_csv_upload(multipart).await?;
    let table = parse_upload(&filename, &data)?;

    let rows = ingest::parse_productivity(&table)?;
    let inserted = Productivity::insert_many(&state.db, &rows).await?;

    Ok(created(inserted))
}

/// Uploads a sales CSV
pub async fn upload_sales(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<InsertedResponse>)> {
    let (filename, data) = read_csv_upload(multipart).await?;
    let table = parse_upload(&filename, &data)?;

    let rows = ingest::parse_sales(&table)?;
    let inserted = Sale::insert_many(&state.db, &rows).await?;

    Ok(created(inserted))
}

/// Uploads a reports CSV
pub async fn upload_reports(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<InsertedResponse>)> {
    let (filename, data) = read_csv_upload(multipart).await?;
    let table = parse_upload(&filename, &data)?;

    let rows = ingest::parse_reports(&table)?;
    let inserted = Report::insert_many(&state.db, &rows).await?;

    Ok(created(inserted))
}
