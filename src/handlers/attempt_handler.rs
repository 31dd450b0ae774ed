use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::SubmitAttemptRequest,
    models::dto::response::ApiResponse,
};

#[post("/api/tests/{test_id}/attempts")]
async fn start_attempt(
    state: web::Data<AppState>,
    test_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state
        .attempt_service
        .start_attempt(&auth.0.sub, &test_id)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::new(response, "Attempt started")))
}

#[post("/api/attempts/{attempt_id}/submit")]
async fn submit_attempt(
    state: web::Data<AppState>,
    attempt_id: web::Path<String>,
    request: web::Json<SubmitAttemptRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let result = state
        .attempt_service
        .submit_attempt(&attempt_id, &auth.0.sub, &request.answers)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(result, "Attempt submitted")))
}

#[get("/api/attempts/{attempt_id}")]
async fn get_attempt(
    state: web::Data<AppState>,
    attempt_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let attempt = state
        .attempt_service
        .get_attempt(&attempt_id, &auth.0.sub)
        .await?;

    Ok(HttpResponse::Ok().json(attempt))
}

#[get("/api/available-tests")]
async fn get_available_tests(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let tests = state.attempt_service.available_tests(&auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(tests))
}

#[get("/api/my-results")]
async fn get_my_results(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let results = state.attempt_service.user_results(&auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(results))
}
