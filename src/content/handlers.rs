use axum::{extract::State, Json};
use tracing::instrument;

use super::dto::{ProjectSummary, StatsResponse};
use super::repo::{Course, Project};
use crate::auth::repo::User;
use crate::error::ApiError;
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<Course>>, ApiError> {
    let courses = Course::list(&state.db).await?;
    Ok(Json(courses))
}

#[instrument(skip(state))]
pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectSummary>>, ApiError> {
    let projects = Project::list(&state.db).await?;
    Ok(Json(projects.into_iter().map(ProjectSummary::from).collect()))
}

#[instrument(skip(state))]
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let (courses, projects, users) = tokio::try_join!(
        Course::count(&state.db),
        Project::count(&state.db),
        User::count(&state.db),
    )?;
    Ok(Json(StatsResponse {
        courses,
        projects,
        users,
    }))
}
