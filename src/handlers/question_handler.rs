use std::sync::Arc;

use actix_web::{delete, get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::{AppError, AppResult},
    models::{
        domain::{CreationReport, Question, RevisionReport},
        dto::{
            request::{SaveGeneratedRequest, SaveRevisionsRequest},
            response::{
                CategoriesResponse, DeleteQuestionResponse, QuestionListResponse,
                SaveGeneratedResponse, SaveRevisionsResponse,
            },
        },
    },
    services::{parse_creation_response, parse_revision_response, SaveTarget, ToastCollector},
};

#[get("/api/exams/{exam_code}/categories")]
pub async fn list_categories(
    state: web::Data<AppState>,
    exam_code: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let exam_code = exam_code.into_inner();
    let categories = state.categories.list_categories(&exam_code).await?;
    Ok(HttpResponse::Ok().json(CategoriesResponse {
        exam_code,
        categories,
    }))
}

#[get("/api/exams/{exam_code}/questions")]
pub async fn list_questions(
    state: web::Data<AppState>,
    exam_code: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let exam_code = exam_code.into_inner();
    let questions = state.questions.list_by_exam_code(&exam_code).await?;
    Ok(HttpResponse::Ok().json(QuestionListResponse {
        exam_code,
        total: questions.len(),
        questions,
    }))
}

#[delete("/api/questions/{id}")]
pub async fn delete_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    state.questions.delete_question(&id).await?;
    Ok(HttpResponse::Ok().json(DeleteQuestionResponse {
        message: format!("Question '{}' deleted", id),
    }))
}

/// Re-validates the pasted output and saves the valid candidates in order.
#[post("/api/questions/generated")]
pub async fn save_generated(
    state: web::Data<AppState>,
    request: web::Json<SaveGeneratedRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let exam = state
        .exams
        .find_by_code(&request.exam_code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Exam '{}' not found", request.exam_code)))?;

    let report = parse_creation_response(&request.raw_json, request.correct_answers);
    let toasts = Arc::new(ToastCollector::new());
    let service = state.creation_service(toasts.clone());

    let target = SaveTarget::new(exam, request.category);
    let candidates = service
        .save_all_valid(report.candidates, &target, request.indices.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(SaveGeneratedResponse {
        report: CreationReport {
            sanitized: report.sanitized,
            candidates,
        },
        notifications: toasts.take(),
    }))
}

/// Swaps each client snapshot for the stored record with the same id. Only the
/// ids and their order are taken from the client. A snapshot whose record is
/// gone is kept so its save fails with not found.
async fn stored_selection(
    state: &AppState,
    snapshots: Vec<Question>,
) -> AppResult<Vec<Question>> {
    let ids: Vec<String> = snapshots.iter().map(|q| q.id.clone()).collect();
    let stored = state.questions.find_by_ids(&ids).await?;

    Ok(snapshots
        .into_iter()
        .map(|snapshot| match stored.iter().find(|q| q.id == snapshot.id) {
            Some(record) => {
                if record.exam_code != snapshot.exam_code
                    || record.level != snapshot.level
                    || record.answers != snapshot.answers
                {
                    log::warn!(
                        "Selection snapshot for '{}' differs from the stored record",
                        snapshot.id
                    );
                }
                record.clone()
            }
            None => snapshot,
        })
        .collect())
}

/// Re-validates against the stored selection, drops discarded revisions and
/// saves the rest in order.
#[post("/api/questions/revisions")]
pub async fn save_revisions(
    state: web::Data<AppState>,
    request: web::Json<SaveRevisionsRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let selection = stored_selection(&state, request.selection).await?;
    let report = parse_revision_response(&request.raw_json, &selection);
    let toasts = Arc::new(ToastCollector::new());
    let service = state.revision_service(toasts.clone());

    let mut revisions = report.revisions;
    for index in &request.discarded {
        revisions = service.discard(&revisions, *index)?;
    }
    let revisions = service
        .save_all_valid(revisions, &request.category, request.indices.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(SaveRevisionsResponse {
        report: RevisionReport {
            sanitized: report.sanitized,
            revisions,
        },
        notifications: toasts.take(),
    }))
}
