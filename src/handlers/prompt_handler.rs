use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{CreationPromptRequest, RevisionPromptRequest},
        response::{PromptResponse, RevisionPromptResponse},
    },
    services::{build_creation_prompt, build_revision_prompt},
};

#[post("/api/prompts/creation")]
pub async fn creation_prompt(
    state: web::Data<AppState>,
    request: web::Json<CreationPromptRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let params = request.parameters;
    let exam_code = params.exam_code.trim();
    let exam = if exam_code.is_empty() {
        None
    } else {
        state.exams.find_by_code(exam_code).await?
    };

    let prompt = build_creation_prompt(&params, exam.as_ref());
    Ok(HttpResponse::Ok().json(PromptResponse {
        prompt,
        ready: exam.is_some(),
    }))
}

#[post("/api/prompts/revision")]
pub async fn revision_prompt(
    state: web::Data<AppState>,
    request: web::Json<RevisionPromptRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let selection = state.questions.find_by_ids(&request.question_ids).await?;
    let missing_ids: Vec<String> = request
        .question_ids
        .into_iter()
        .filter(|id| !selection.iter().any(|q| &q.id == id))
        .collect();
    if !missing_ids.is_empty() {
        log::warn!("Review selection references unknown questions: {:?}", missing_ids);
    }

    let prompt = build_revision_prompt(&selection, &request.context);
    Ok(HttpResponse::Ok().json(RevisionPromptResponse {
        prompt,
        ready: !selection.is_empty(),
        selection,
        missing_ids,
    }))
}
