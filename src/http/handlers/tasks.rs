//! Handlers for task scheduling, completion, and removal.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use mockable::Clock;

use super::parse_id;
use crate::http::dto::{Envelope, TaskPayload, TaskResponse};
use crate::http::error::ApiError;
use crate::http::state::AppState;
use crate::project::{domain::ProjectId, ports::ProjectRepository};
use crate::task::{domain::TaskId, ports::TaskRepository, services::TaskFilter};

type TaskEnvelope = Json<Envelope<TaskResponse>>;
type TaskListEnvelope = Json<Envelope<Vec<TaskResponse>>>;

/// `POST /projects/{projectId}/tasks`
pub async fn create_task<P, T, C>(
    State(state): State<AppState<P, T, C>>,
    Path(raw_project_id): Path<String>,
    payload: Result<Json<TaskPayload>, JsonRejection>,
) -> Result<(StatusCode, TaskEnvelope), ApiError>
where
    P: ProjectRepository + 'static,
    T: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let project_id: ProjectId = parse_id("project", &raw_project_id)?;
    let Json(body) = payload?;
    let task = state
        .tasks
        .create_task(body.into_create_request(project_id)?)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::new("Success create new task", task.into())),
    ))
}

/// `GET /projects/{projectId}/tasks`
pub async fn list_tasks<P, T, C>(
    State(state): State<AppState<P, T, C>>,
    Path(raw_project_id): Path<String>,
) -> Result<TaskListEnvelope, ApiError>
where
    P: ProjectRepository + 'static,
    T: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    list_filtered(&state, &raw_project_id, TaskFilter::All, "tasks").await
}

/// `GET /projects/{projectId}/completedtasks`
pub async fn list_completed_tasks<P, T, C>(
    State(state): State<AppState<P, T, C>>,
    Path(raw_project_id): Path<String>,
) -> Result<TaskListEnvelope, ApiError>
where
    P: ProjectRepository + 'static,
    T: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    list_filtered(
        &state,
        &raw_project_id,
        TaskFilter::Completed,
        "completed tasks",
    )
    .await
}

/// `GET /projects/{projectId}/uncompletedtasks`
pub async fn list_uncompleted_tasks<P, T, C>(
    State(state): State<AppState<P, T, C>>,
    Path(raw_project_id): Path<String>,
) -> Result<TaskListEnvelope, ApiError>
where
    P: ProjectRepository + 'static,
    T: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    list_filtered(
        &state,
        &raw_project_id,
        TaskFilter::Incomplete,
        "uncompleted tasks",
    )
    .await
}

async fn list_filtered<P, T, C>(
    state: &AppState<P, T, C>,
    raw_project_id: &str,
    filter: TaskFilter,
    label: &str,
) -> Result<TaskListEnvelope, ApiError>
where
    P: ProjectRepository + 'static,
    T: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let project_id: ProjectId = parse_id("project", raw_project_id)?;
    let tasks = state.tasks.list_tasks(project_id, filter).await?;
    Ok(Json(Envelope::new(
        format!("Success get {label} of project {project_id}"),
        tasks.into_iter().map(TaskResponse::from).collect(),
    )))
}

/// `PUT /tasks/{id}`
pub async fn update_task<P, T, C>(
    State(state): State<AppState<P, T, C>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<TaskPayload>, JsonRejection>,
) -> Result<TaskEnvelope, ApiError>
where
    P: ProjectRepository + 'static,
    T: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let id: TaskId = parse_id("task", &raw_id)?;
    let Json(body) = payload?;
    let task = state
        .tasks
        .update_task(id, body.into_update_request()?)
        .await?;
    Ok(Json(Envelope::new(
        format!("Success update task {id}"),
        task.into(),
    )))
}

/// `PUT /completedtasks/{id}`
pub async fn complete_task<P, T, C>(
    State(state): State<AppState<P, T, C>>,
    Path(raw_id): Path<String>,
) -> Result<TaskEnvelope, ApiError>
where
    P: ProjectRepository + 'static,
    T: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let id: TaskId = parse_id("task", &raw_id)?;
    let task = state.tasks.complete_task(id).await?;
    Ok(Json(Envelope::new(
        format!("Task {id} marked as completed"),
        task.into(),
    )))
}

/// `DELETE /tasks/{id}`
pub async fn delete_task<P, T, C>(
    State(state): State<AppState<P, T, C>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Envelope<()>>, ApiError>
where
    P: ProjectRepository + 'static,
    T: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let id: TaskId = parse_id("task", &raw_id)?;
    state.tasks.delete_task(id).await?;
    Ok(Json(Envelope::new(format!("Task {id} was deleted"), ())))
}
