use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, models::task::Task};

#[derive(Deserialize)]
pub struct NewTask {
    description: String,
}

#[derive(Serialize)]
pub struct TaskList {
    tasks: Vec<Task>,
}

/// GET /tasks
pub async fn list(State(state): State<AppState>) -> Json<TaskList> {
    Json(TaskList {
        tasks: state.tasks.list(),
    })
}

/// POST /tasks
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewTask>,
) -> (StatusCode, Json<Task>) {
    let task = state.tasks.create(payload.description);
    (StatusCode::CREATED, Json(task))
}

/// PUT /tasks/:task_id — the path wins over whatever id the body claims.
pub async fn update(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(mut task): Json<Task>,
) -> Result<Json<Task>, StatusCode> {
    task.id = task_id;
    state.tasks.update(task).map(Json).ok_or(StatusCode::NOT_FOUND)
}
