//! HTTP API.
//!
//! | Route                    | Handler            |
//! |--------------------------|--------------------|
//! | `POST /api/surveys`      | [`create_survey`]  |
//! | `GET /api/surveys`       | [`list_surveys`]   |
//! | `GET /api/surveys/{id}`  | [`get_survey`]     |
//! | `GET /api/analysis`      | [`analysis`]       |
//! | `GET /api/export-csv`    | [`export_csv`]     |

mod error;

pub use error::ApiError;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, dev::Server, get, http::header, post, web};
use tracing::{error, info};

use crate::export::{CSV_CONTENT_TYPE, CSV_FILENAME};
use crate::parser::parse_submission;
use crate::services::SurveyService;

#[post("/surveys")]
#[tracing::instrument(skip_all, fields(bytes = body.len()))]
pub async fn create_survey(
    service: web::Data<SurveyService>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let submission = parse_submission(&body).map_err(|e| {
        info!(error = %format!("{e:#}"), "Rejected survey submission");
        ApiError::bad_request(e)
    })?;

    let record = service.submit(submission).await.map_err(|e| {
        error!(error = %format!("{e:#}"), "Failed to store survey");
        ApiError::internal(e)
    })?;

    Ok(HttpResponse::Created().json(record))
}

#[get("/surveys")]
pub async fn list_surveys(service: web::Data<SurveyService>) -> Result<HttpResponse, ApiError> {
    let records = service.list().await.map_err(|e| {
        error!(error = %format!("{e:#}"), "Failed to list surveys");
        ApiError::internal(e)
    })?;
    Ok(HttpResponse::Ok().json(records))
}

#[get("/surveys/{id}")]
#[tracing::instrument(skip(service))]
pub async fn get_survey(
    service: web::Data<SurveyService>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    match service.get(&id).await {
        Ok(Some(record)) => Ok(HttpResponse::Ok().json(record)),
        Ok(None) => Err(ApiError::NotFound("Survey not found".to_string())),
        Err(e) => {
            error!(error = %format!("{e:#}"), "Failed to load survey");
            Err(ApiError::internal(e))
        }
    }
}

#[get("/analysis")]
pub async fn analysis(service: web::Data<SurveyService>) -> Result<HttpResponse, ApiError> {
    let tabulation = service.analysis().await.map_err(|e| {
        error!(error = %format!("{e:#}"), "Failed to generate analysis");
        ApiError::internal(e)
    })?;
    Ok(HttpResponse::Ok().json(tabulation))
}

#[get("/export-csv")]
pub async fn export_csv(service: web::Data<SurveyService>) -> Result<HttpResponse, ApiError> {
    let csv = service.export_csv().await.map_err(|e| {
        error!(error = %format!("{e:#}"), "CSV export failed");
        ApiError::Internal("Failed to export CSV".to_string())
    })?;

    Ok(HttpResponse::Ok()
        .content_type(CSV_CONTENT_TYPE)
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={CSV_FILENAME}"),
        ))
        .body(csv))
}

/// Registers every survey route under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(create_survey)
            .service(list_surveys)
            .service(get_survey)
            .service(analysis)
            .service(export_csv),
    );
}

/// Binds the HTTP server. The returned [`Server`] runs once awaited.
pub fn start_server(service: SurveyService, host: &str, port: u16) -> std::io::Result<Server> {
    let data = web::Data::new(service);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(data.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run();

    info!(host, port, "Survey API listening");
    Ok(server)
}
