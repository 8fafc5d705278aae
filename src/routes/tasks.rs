use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{authorize_roles, CurrentUser},
    error::AppError,
    models::{
        task::{TaskInput, TaskQuery, TaskUpdate},
        user::Role,
    },
    notify::ChangeFeed,
    store::tasks::TaskStore,
};

/// Create a task. ADMIN and MANAGER only; new tasks start at TODO.
#[post("")]
pub async fn create_task(
    store: web::Data<TaskStore>,
    feed: web::Data<ChangeFeed>,
    user: CurrentUser,
    payload: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    authorize_roles(user.0.role, &[Role::Admin, Role::Manager])?;
    payload.validate()?;

    let task = store.insert(&payload, user.0.id).await?;
    feed.tasks_changed();

    Ok(HttpResponse::Created().json(task))
}

/// Paged task listing. A USER sees only tasks assigned to them; ADMIN and
/// MANAGER see everything and may filter by assignee.
#[get("")]
pub async fn get_tasks(
    store: web::Data<TaskStore>,
    user: CurrentUser,
    query: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let page = store.page(&user.0, &query).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Update a task. Open to every role, but a USER may only touch a task
/// assigned to them. Absent fields keep their stored values.
#[put("/{id}")]
pub async fn update_task(
    store: web::Data<TaskStore>,
    feed: web::Data<ChangeFeed>,
    user: CurrentUser,
    task_id: web::Path<Uuid>,
    payload: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    authorize_roles(user.0.role, &[Role::Admin, Role::Manager, Role::User])?;
    payload.validate()?;

    let task_id = task_id.into_inner();
    let task = match store.find_active_by_id(task_id).await? {
        Some(task) => task,
        None => return Err(AppError::NotFound("Task not found".into())),
    };

    if user.0.role == Role::User && task.assigned_to != Some(user.0.id) {
        return Err(AppError::Forbidden("Access denied".into()));
    }

    let updated = store.update(task_id, &payload).await?;
    feed.tasks_changed();

    Ok(HttpResponse::Ok().json(updated))
}

/// Soft-delete a task. ADMIN only. The row is kept; it simply disappears
/// from every read.
#[delete("/{id}")]
pub async fn delete_task(
    store: web::Data<TaskStore>,
    feed: web::Data<ChangeFeed>,
    user: CurrentUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    authorize_roles(user.0.role, &[Role::Admin])?;

    store.soft_delete(task_id.into_inner()).await?;
    feed.tasks_changed();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Task soft deleted successfully"
    })))
}
