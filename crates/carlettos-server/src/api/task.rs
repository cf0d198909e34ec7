//! Todo list endpoints

use actix_web::{HttpResponse, delete, get, patch, post, web};
use carlettos_persistence::TaskPersistence;
use tracing::{debug, info};

use crate::{
    error::{AppError, CarlettosError},
    metrics,
    model::AppState,
};

const LOG_TARGET: &str = "carlettos_server::api";

#[post("/task/{title}")]
pub async fn create_task(
    data: web::Data<AppState>,
    title: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let title = title.into_inner();
    if title.trim().is_empty() {
        return Err(CarlettosError::illegal_argument("task title must not be blank").into());
    }

    let task = data.persistence().task_create(&title).await.inspect_err(|_| {
        metrics::record_storage_error("task_create");
    })?;
    metrics::record_task_operation("create");
    info!(target: LOG_TARGET, id = %task.id, "task created");

    Ok(HttpResponse::Ok().json(task))
}

#[get("/task/{id}")]
pub async fn get_task(
    data: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    let task = data
        .persistence()
        .task_find(&id)
        .await?
        .ok_or_else(|| CarlettosError::not_found(format!("task:{}", id)))?;

    Ok(HttpResponse::Ok().json(task))
}

#[get("/tasks")]
pub async fn list_tasks(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let tasks = data.persistence().task_find_all().await?;
    debug!(target: LOG_TARGET, count = tasks.len(), "tasks listed");

    Ok(HttpResponse::Ok().json(tasks))
}

/// Flips the completed flag
#[patch("/task/{id}")]
pub async fn toggle_task(
    data: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    let affected = data.persistence().task_toggle(&id).await?;
    metrics::record_task_operation("toggle");
    info!(target: LOG_TARGET, id = %id, "task toggled");

    Ok(HttpResponse::Ok().json(affected))
}

#[delete("/task/{id}")]
pub async fn delete_task(
    data: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    let affected = data.persistence().task_delete(&id).await.inspect_err(|_| {
        metrics::record_storage_error("task_delete");
    })?;
    metrics::record_task_operation("delete");
    info!(target: LOG_TARGET, id = %id, "task deleted");

    Ok(HttpResponse::Ok().json(affected))
}
