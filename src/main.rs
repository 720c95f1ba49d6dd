use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpResponse, HttpServer, Responder, get};
use anyhow::Context;
use dotenvy::dotenv;
use std::str::FromStr;

use hrms_lite::config::Config;
use hrms_lite::db::init_store;
use hrms_lite::docs::ApiDoc;
use hrms_lite::routes;
use hrms_lite::service::{AttendanceService, EmployeeService};

use serde_json::json;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "HRMS Lite API"
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "healthy" }))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let max_level =
        tracing::Level::from_str(&config.log_level).unwrap_or(tracing::Level::INFO);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(max_level)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .init();

    info!("Server starting...");

    let store = init_store(&config)
        .await
        .context("failed to initialize storage backend")?;

    // Explicit dependency wiring: services are built once here and
    // handed to the app, no global singletons.
    let employee_service = EmployeeService::new(store.clone());
    let attendance_service = AttendanceService::new(store, employee_service.clone());

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(employee_service.clone()))
            .app_data(Data::new(attendance_service.clone()))
            .service(index)
            .service(health)
            .configure(|cfg| routes::configure(cfg, &config_data))
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
