use actix_web::{delete, get, patch, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{require_admin, AuthenticatedUser},
    errors::AppError,
    models::dto::request::{CreateTestRequest, UpdateTestGroupsRequest, UpdateTestRequest},
    models::dto::response::{ApiResponse, MessageResponse},
};

#[post("/api/tests")]
async fn create_test(
    state: web::Data<AppState>,
    request: web::Json<CreateTestRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;
    request.validate()?;

    let test = state
        .test_service
        .create_test(&auth.0.sub, request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::new(test, "Test created successfully")))
}

#[get("/api/tests")]
async fn list_tests(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let tests = state.test_service.list_tests_by_author(&auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(tests))
}

#[get("/api/tests/{test_id}")]
async fn get_test(
    state: web::Data<AppState>,
    test_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let test = state.test_service.get_test(&test_id).await?;
    Ok(HttpResponse::Ok().json(test))
}

#[patch("/api/tests/{test_id}")]
async fn update_test(
    state: web::Data<AppState>,
    test_id: web::Path<String>,
    request: web::Json<UpdateTestRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;
    request.validate()?;

    let test = state
        .test_service
        .update_test(&test_id, request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(test, "Test updated successfully")))
}

#[delete("/api/tests/{test_id}")]
async fn delete_test(
    state: web::Data<AppState>,
    test_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    state.test_service.delete_test(&test_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Test deleted successfully")))
}

#[post("/api/tests/{test_id}/copy")]
async fn copy_test(
    state: web::Data<AppState>,
    test_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let copy = state.test_service.copy_test(&test_id).await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(copy, "Test copied successfully")))
}

#[patch("/api/tests/{test_id}/groups")]
async fn update_test_groups(
    state: web::Data<AppState>,
    test_id: web::Path<String>,
    request: web::Json<UpdateTestGroupsRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;
    request.validate()?;

    let test = state
        .test_service
        .update_test_groups(&test_id, request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(test, "Test groups updated successfully")))
}

#[get("/api/tests/{test_id}/results")]
async fn get_test_results(
    state: web::Data<AppState>,
    test_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let overview = state.test_service.test_results_overview(&test_id).await?;
    Ok(HttpResponse::Ok().json(overview))
}
