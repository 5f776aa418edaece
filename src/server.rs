//! HTTP surface: `POST /api/generate` and `GET /api/models`.

use actix_web::{http::StatusCode, web, App, HttpResponse, HttpServer, ResponseError};
use uuid::Uuid;

use crate::{
    config::Config,
    error::DreamError,
    generate::DreamGenerator,
    logger,
    models::{supported_models, ErrorResponse, GenerateRequest, MISSING_FIELDS},
};

pub struct AppState {
    pub generator: DreamGenerator,
}

impl ResponseError for DreamError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(DreamError::status_code(self))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(ResponseError::status_code(self))
            .json(ErrorResponse::new(self.to_string()))
    }
}

async fn generate(
    state: web::Data<AppState>,
    body: Result<web::Bytes, actix_web::Error>,
) -> Result<HttpResponse, DreamError> {
    let request_id = Uuid::new_v4();
    let body = body.map_err(|e| body_error(request_id, e))?;
    let request: GenerateRequest = serde_json::from_slice(&body).map_err(|e| {
        log::warn!("[req:{}] Unreadable body: {}", request_id, e);
        DreamError::InvalidRequest(MISSING_FIELDS.into())
    })?;
    log::info!(
        "[req:{}] Generate request for model {}",
        request_id,
        request.model.as_deref().unwrap_or(state.generator.default_model().key())
    );

    match state.generator.generate(request).await {
        Ok(response) => {
            log::info!("[req:{}] Done: {}", request_id, response.image_url);
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            log::error!("[req:{}] Generation error: {}", request_id, e);
            Err(e)
        }
    }
}

/// Maps extractor failures onto the JSON error shape.
fn body_error(request_id: Uuid, err: actix_web::Error) -> DreamError {
    log::warn!("[req:{}] Body rejected: {}", request_id, err);
    if err.as_response_error().status_code() == StatusCode::PAYLOAD_TOO_LARGE {
        DreamError::PayloadTooLarge
    } else {
        DreamError::InvalidRequest(MISSING_FIELDS.into())
    }
}

async fn models() -> HttpResponse {
    HttpResponse::Ok().json(supported_models())
}

async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(ErrorResponse::new("Method not allowed"))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("Not found"))
}

/// Registers the API routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/generate")
            .route(web::post().to(generate))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/api/models")
            .route(web::get().to(models))
            .default_service(web::to(method_not_allowed)),
    );
}

/// Full app setup: shared state, body limit, routes and the 404 fallback.
pub fn configure_app(
    state: web::Data<AppState>,
    payload_limit: usize,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(state)
            .app_data(web::PayloadConfig::new(payload_limit))
            .default_service(web::to(not_found));
        configure(cfg);
    }
}

pub async fn run(config: Config) -> std::io::Result<()> {
    let host = config.host.clone();
    let port = config.port();
    let payload_limit = config.max_payload_bytes();

    let generator = DreamGenerator::from_config(&config);
    if !generator.is_ready() {
        log::warn!("📝 Make sure to set your FAL_KEY in .env.local");
    }
    let state = web::Data::new(AppState { generator });

    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &host, port);

    HttpServer::new(move || App::new().configure(configure_app(state.clone(), payload_limit)))
        .bind((host.as_str(), port))?
        .run()
        .await
}
