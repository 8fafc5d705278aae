use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;

use taskboard::auth::{AuthMiddleware, TokenIssuer};
use taskboard::config::Config;
use taskboard::models::user::Role;
use taskboard::notify::ChangeFeed;
use taskboard::routes;
use taskboard::store::{self, TaskStore, UserStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let issuer = TokenIssuer::from_config(&config);

    let pool = store::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    log::info!("Database connected");

    let users = UserStore::new(pool.clone());
    let tasks = TaskStore::new(pool.clone());
    let feed = ChangeFeed::new();

    seed_default_accounts(&users).await;

    let users_data = web::Data::new(users);
    let tasks_data = web::Data::new(tasks);
    let issuer_data = web::Data::new(issuer);
    let feed_data = web::Data::new(feed);
    let client_origin = config.client_origin.clone();

    log::info!(
        "Server running on {}:{}",
        config.server_host,
        config.server_port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(users_data.clone())
            .app_data(tasks_data.clone())
            .app_data(issuer_data.clone())
            .app_data(feed_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&client_origin)
                    .allow_any_method()
                    .allow_any_header()
                    .supports_credentials()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(routes::events::events)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
            .default_service(web::route().to(routes::not_found))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await?;

    // The server has drained its workers by now
    pool.close().await;
    log::info!("Database pool closed");

    Ok(())
}

/// Seeds the default ADMIN and MANAGER accounts on first start. A seeding
/// failure is logged but does not keep the server from coming up.
async fn seed_default_accounts(users: &UserStore) {
    let seeds = [
        (Role::Admin, "Super Admin", "admin@taskmanager.com", "admin123"),
        (
            Role::Manager,
            "Project Manager",
            "manager@taskmanager.com",
            "manager123",
        ),
    ];

    for (role, name, email, password) in seeds {
        if let Err(err) = users.seed_role_account(name, email, password, role).await {
            log::error!("Failed to seed default account {}: {}", email, err);
        }
    }
}
