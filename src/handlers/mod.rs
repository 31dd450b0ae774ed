use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;

use crate::app_state::AppState;

pub mod attempt_handler;
pub mod question_handler;
pub mod test_handler;

pub use attempt_handler::{
    get_attempt, get_available_tests, get_my_results, start_attempt, submit_attempt,
};
pub use question_handler::{
    create_answer, create_question, delete_answer, delete_question, get_questions, update_answer,
    update_question,
};
pub use test_handler::{
    copy_test, create_test, delete_test, get_test, get_test_results, list_tests, update_test,
    update_test_groups,
};

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    match state.db.health_check().await {
        Ok(()) => HttpResponse::Ok().json(json!({ "status": "ok" })),
        Err(e) => {
            log::warn!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({ "status": "degraded" }))
        }
    }
}
