//! Handlers for the `/projects` resource.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use mockable::Clock;

use super::parse_id;
use crate::http::dto::{Envelope, ProjectPayload, ProjectResponse};
use crate::http::error::ApiError;
use crate::http::state::AppState;
use crate::project::{domain::ProjectId, ports::ProjectRepository};
use crate::task::ports::TaskRepository;

type ProjectEnvelope = Json<Envelope<ProjectResponse>>;

/// `POST /projects`
pub async fn create_project<P, T, C>(
    State(state): State<AppState<P, T, C>>,
    payload: Result<Json<ProjectPayload>, JsonRejection>,
) -> Result<(StatusCode, ProjectEnvelope), ApiError>
where
    P: ProjectRepository + 'static,
    T: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Json(body) = payload?;
    let project = state.projects.create_project(body.into_request()?).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::new("Success create new project", project.into())),
    ))
}

/// `GET /projects`
pub async fn list_projects<P, T, C>(
    State(state): State<AppState<P, T, C>>,
) -> Result<Json<Envelope<Vec<ProjectResponse>>>, ApiError>
where
    P: ProjectRepository + 'static,
    T: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let projects = state.projects.list_projects().await?;
    Ok(Json(Envelope::new(
        "Success get all projects",
        projects.into_iter().map(ProjectResponse::from).collect(),
    )))
}

/// `GET /projects/{id}`
pub async fn get_project<P, T, C>(
    State(state): State<AppState<P, T, C>>,
    Path(raw_id): Path<String>,
) -> Result<ProjectEnvelope, ApiError>
where
    P: ProjectRepository + 'static,
    T: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let id: ProjectId = parse_id("project", &raw_id)?;
    let project = state
        .projects
        .find_project(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Project {id} not found")))?;
    Ok(Json(Envelope::new(
        format!("Success get detail project {id}"),
        project.into(),
    )))
}

/// `PUT /projects/{id}`
pub async fn update_project<P, T, C>(
    State(state): State<AppState<P, T, C>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<ProjectPayload>, JsonRejection>,
) -> Result<ProjectEnvelope, ApiError>
where
    P: ProjectRepository + 'static,
    T: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let id: ProjectId = parse_id("project", &raw_id)?;
    let Json(body) = payload?;
    let project = state
        .projects
        .update_project(id, body.into_request()?)
        .await?;
    Ok(Json(Envelope::new(
        format!("Success update project {id}"),
        project.into(),
    )))
}

/// `DELETE /projects/{id}`
pub async fn delete_project<P, T, C>(
    State(state): State<AppState<P, T, C>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Envelope<()>>, ApiError>
where
    P: ProjectRepository + 'static,
    T: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let id: ProjectId = parse_id("project", &raw_id)?;
    state.projects.delete_project(id).await?;
    Ok(Json(Envelope::new(format!("Project {id} was deleted"), ())))
}
