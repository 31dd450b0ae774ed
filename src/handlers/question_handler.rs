use actix_web::{delete, get, patch, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{require_admin, AuthenticatedUser},
    errors::AppError,
    models::dto::request::{
        CreateAnswerRequest, CreateQuestionRequest, UpdateAnswerRequest, UpdateQuestionRequest,
    },
    models::dto::response::{ApiResponse, MessageResponse},
};

#[post("/api/tests/{test_id}/questions")]
async fn create_question(
    state: web::Data<AppState>,
    test_id: web::Path<String>,
    request: web::Json<CreateQuestionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;
    request.validate()?;

    let question = state
        .question_service
        .create_question(&test_id, request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::new(question, "Question created successfully")))
}

#[get("/api/tests/{test_id}/questions")]
async fn get_questions(
    state: web::Data<AppState>,
    test_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let questions = state.question_service.get_questions(&test_id).await?;
    Ok(HttpResponse::Ok().json(questions))
}

#[patch("/api/tests/{test_id}/questions/{question_id}")]
async fn update_question(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    request: web::Json<UpdateQuestionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;
    request.validate()?;

    let (test_id, question_id) = path.into_inner();
    let question = state
        .question_service
        .update_question(&test_id, &question_id, request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(question, "Question updated successfully")))
}

#[delete("/api/tests/{test_id}/questions/{question_id}")]
async fn delete_question(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let (test_id, question_id) = path.into_inner();
    state
        .question_service
        .delete_question(&test_id, &question_id)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Question deleted successfully")))
}

#[post("/api/tests/{test_id}/questions/{question_id}/answers")]
async fn create_answer(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    request: web::Json<CreateAnswerRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;
    request.validate()?;

    let (test_id, question_id) = path.into_inner();
    let question = state
        .question_service
        .add_answer(&test_id, &question_id, request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::new(
        question.answers,
        "Answer created successfully",
    )))
}

#[patch("/api/tests/{test_id}/questions/{question_id}/answers/{answer_id}")]
async fn update_answer(
    state: web::Data<AppState>,
    path: web::Path<(String, String, String)>,
    request: web::Json<UpdateAnswerRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;
    request.validate()?;

    let (test_id, question_id, answer_id) = path.into_inner();
    let question = state
        .question_service
        .update_answer(&test_id, &question_id, &answer_id, request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(
        question.answers,
        "Answer updated successfully",
    )))
}

#[delete("/api/tests/{test_id}/questions/{question_id}/answers/{answer_id}")]
async fn delete_answer(
    state: web::Data<AppState>,
    path: web::Path<(String, String, String)>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let (test_id, question_id, answer_id) = path.into_inner();
    let question = state
        .question_service
        .delete_answer(&test_id, &question_id, &answer_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(
        question.answers,
        "Answer deleted successfully",
    )))
}
