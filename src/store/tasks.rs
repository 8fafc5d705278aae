use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::task::{Task, TaskInput, TaskPage, TaskQuery, TaskStatus, TaskUpdate};
use crate::models::user::{Role, User};

const TASK_COLUMNS: &str =
    "id, title, description, status, assigned_to, created_by, created_at, updated_at";

/// Task store. Deletion is always soft: rows keep their data and drop out of
/// every read via the explicit `deleted_at IS NULL` predicate.
#[derive(Clone)]
pub struct TaskStore {
    pool: PgPool,
}

impl TaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a task. New tasks always start at TODO.
    pub async fn insert(&self, input: &TaskInput, created_by: i32) -> Result<Task, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (id, title, description, status, assigned_to, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&input.title)
        .bind(&input.description)
        .bind(TaskStatus::Todo)
        .bind(input.assigned_to)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn find_active_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 AND deleted_at IS NULL",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// Role-aware page of the task listing, newest first.
    ///
    /// A USER viewer is always scoped to their own assignments; other roles
    /// may filter by assignee. Status filter and page/limit apply to
    /// everyone.
    pub async fn page(&self, viewer: &User, query: &TaskQuery) -> Result<TaskPage, AppError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(10).clamp(1, 100);
        let offset = (page - 1) * limit;

        let assigned_to = if viewer.role == Role::User {
            Some(viewer.id)
        } else {
            query.assigned_to
        };

        // Conditions are appended to both the page query and the count query
        // so the two always agree.
        let mut sql = format!(
            "SELECT {} FROM tasks WHERE deleted_at IS NULL",
            TASK_COLUMNS
        );
        let mut count_sql = String::from("SELECT COUNT(*) FROM tasks WHERE deleted_at IS NULL");
        let mut param = 1;

        if query.status.is_some() {
            let condition = format!(" AND status = ${}", param);
            sql.push_str(&condition);
            count_sql.push_str(&condition);
            param += 1;
        }
        if assigned_to.is_some() {
            let condition = format!(" AND assigned_to = ${}", param);
            sql.push_str(&condition);
            count_sql.push_str(&condition);
            param += 1;
        }

        sql.push_str(" ORDER BY created_at DESC");
        sql.push_str(&format!(" LIMIT ${} OFFSET ${}", param, param + 1));

        let mut rows = sqlx::query_as::<_, Task>(&sql);
        let mut count = sqlx::query_scalar::<_, i64>(&count_sql);

        if let Some(status) = query.status {
            rows = rows.bind(status);
            count = count.bind(status);
        }
        if let Some(assignee) = assigned_to {
            rows = rows.bind(assignee);
            count = count.bind(assignee);
        }

        let tasks = rows.bind(limit).bind(offset).fetch_all(&self.pool).await?;
        let total = count.fetch_one(&self.pool).await?;

        Ok(TaskPage {
            page,
            total_pages: (total + limit - 1) / limit,
            total,
            tasks,
        })
    }

    /// Partial update; absent fields keep their stored values.
    pub async fn update(&self, id: Uuid, changes: &TaskUpdate) -> Result<Task, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET
                 title = COALESCE($1, title),
                 description = COALESCE($2, description),
                 status = COALESCE($3, status),
                 assigned_to = COALESCE($4, assigned_to),
                 updated_at = now()
             WHERE id = $5 AND deleted_at IS NULL
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.status)
        .bind(changes.assigned_to)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        task.ok_or_else(|| AppError::NotFound("Task not found".into()))
    }

    /// Soft delete: the row stays, every active read stops seeing it.
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE tasks SET deleted_at = now(), updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Task not found".into()));
        }

        Ok(())
    }
}
