pub mod auth;
pub mod events;
pub mod health;
pub mod tasks;

use actix_web::{web, HttpResponse};
use serde_json::json;

/// Routes mounted under the `/api` scope. The scope is wrapped with
/// `AuthMiddleware`, which skips the four public auth endpoints.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::login)
            .service(auth::refresh)
            .service(auth::logout)
            .service(auth::me)
            .service(auth::list_users),
    )
    .service(
        web::scope("/tasks")
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}

/// Fallback for unknown routes.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "message": "Route not found"
    }))
}
