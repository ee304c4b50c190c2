use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::{
    errors::AppError,
    models::dto::request::{ValidateCreationRequest, ValidateRevisionRequest},
    services::{parse_creation_response, parse_revision_response},
};

/// Checks pasted generation output. Never persists anything.
#[post("/api/validations/creation")]
pub async fn validate_creation(
    request: web::Json<ValidateCreationRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let report = parse_creation_response(&request.raw_json, request.correct_answers);
    Ok(HttpResponse::Ok().json(report))
}

#[post("/api/validations/revision")]
pub async fn validate_revision(
    request: web::Json<ValidateRevisionRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let report = parse_revision_response(&request.raw_json, &request.selection);
    Ok(HttpResponse::Ok().json(report))
}
