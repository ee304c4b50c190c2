use actix_web::web;

pub mod health_handler;
pub mod prompt_handler;
pub mod question_handler;
pub mod validation_handler;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_handler::health_check)
        .service(health_handler::health_check_ready)
        .service(prompt_handler::creation_prompt)
        .service(prompt_handler::revision_prompt)
        .service(validation_handler::validate_creation)
        .service(validation_handler::validate_revision)
        .service(question_handler::list_categories)
        .service(question_handler::list_questions)
        .service(question_handler::delete_question)
        .service(question_handler::save_generated)
        .service(question_handler::save_revisions);
}
