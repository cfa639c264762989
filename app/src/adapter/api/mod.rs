use actix_web::{HttpResponse, ResponseError, web};
use derive_more::derive::{Display, Error};
use serde::Deserialize;

use crate::control::{RoomError, RoomRegistry};
use crate::core::unit::{DegreeCelsius, ValvePosition};
use crate::home::{HvacMode, TrvId};

pub fn new_routes(registry: RoomRegistry) -> actix_web::Scope {
    web::scope("/api/rooms")
        .app_data(web::Data::new(registry))
        .route("", web::get().to(list_rooms))
        .route("/{room}", web::get().to(room_status))
        .route("/{room}/target", web::put().to(set_target))
        .route("/{room}/hvac_mode", web::put().to(set_hvac_mode))
        .route("/{room}/validation", web::get().to(validate))
        .route("/{room}/reset_stats", web::post().to(reset_stats))
        .route("/{room}/trvs/{trv}/position", web::put().to(set_valve_position))
        .route("/{room}/trvs/{trv}/thresholds", web::put().to(set_thresholds))
}

type ApiResponse = Result<HttpResponse, ApiError>;

#[derive(Debug, Display, Error)]
enum ApiError {
    #[display("Room not found")]
    RoomNotFound,

    #[display("{_0}")]
    Room(RoomError),
}

impl From<RoomError> for ApiError {
    fn from(e: RoomError) -> Self {
        ApiError::Room(e)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            ApiError::RoomNotFound => StatusCode::NOT_FOUND,
            ApiError::Room(RoomError::UnknownValve { .. }) => StatusCode::NOT_FOUND,
            ApiError::Room(RoomError::WindowOpen) => StatusCode::CONFLICT,
            ApiError::Room(RoomError::InvalidThresholds { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Room(RoomError::Unavailable) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}

fn room<'a>(registry: &'a RoomRegistry, name: &str) -> Result<&'a crate::control::RoomHandle, ApiError> {
    registry.get(name).ok_or(ApiError::RoomNotFound)
}

async fn list_rooms(registry: web::Data<RoomRegistry>) -> HttpResponse {
    HttpResponse::Ok().json(registry.names())
}

async fn room_status(registry: web::Data<RoomRegistry>, path: web::Path<String>) -> ApiResponse {
    let report = room(&registry, &path)?.status().await?;
    Ok(HttpResponse::Ok().json(report))
}

#[derive(Debug, Deserialize)]
struct SetTargetRequest {
    target: f64,
}

async fn set_target(
    registry: web::Data<RoomRegistry>,
    path: web::Path<String>,
    body: web::Json<SetTargetRequest>,
) -> ApiResponse {
    room(&registry, &path)?
        .set_target_temperature(DegreeCelsius(body.target))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[derive(Debug, Deserialize)]
struct SetHvacModeRequest {
    mode: HvacMode,
}

async fn set_hvac_mode(
    registry: web::Data<RoomRegistry>,
    path: web::Path<String>,
    body: web::Json<SetHvacModeRequest>,
) -> ApiResponse {
    room(&registry, &path)?.set_hvac_mode(body.mode).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn validate(registry: web::Data<RoomRegistry>, path: web::Path<String>) -> ApiResponse {
    let summary = room(&registry, &path)?.validate().await?;
    Ok(HttpResponse::Ok().json(summary))
}

async fn reset_stats(registry: web::Data<RoomRegistry>, path: web::Path<String>) -> ApiResponse {
    room(&registry, &path)?.reset_performance_stats().await?;
    Ok(HttpResponse::NoContent().finish())
}

#[derive(Debug, Deserialize)]
struct SetPositionRequest {
    position: u8,
}

async fn set_valve_position(
    registry: web::Data<RoomRegistry>,
    path: web::Path<(String, String)>,
    body: web::Json<SetPositionRequest>,
) -> ApiResponse {
    let (room_name, trv) = path.into_inner();
    room(&registry, &room_name)?
        .set_valve_position(TrvId::from(trv), ValvePosition::new(body.position))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[derive(Debug, Deserialize)]
struct SetThresholdsRequest {
    close_threshold: Option<f64>,
    open_threshold: Option<f64>,
    max_valve_position: Option<u8>,
}

async fn set_thresholds(
    registry: web::Data<RoomRegistry>,
    path: web::Path<(String, String)>,
    body: web::Json<SetThresholdsRequest>,
) -> ApiResponse {
    let (room_name, trv) = path.into_inner();
    room(&registry, &room_name)?
        .set_thresholds(
            TrvId::from(trv),
            body.close_threshold,
            body.open_threshold,
            body.max_valve_position,
        )
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
