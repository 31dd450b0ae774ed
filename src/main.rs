use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use examina_server::{
    app_state::AppState,
    auth::{AuthMiddleware, JwtService},
    config::Config,
    handlers,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();

    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        config.validate_for_production();
    }

    let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);

    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    let state = AppState::new(config)
        .await
        .unwrap_or_else(|e| panic!("Failed to initialize application state: {}", e));

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(jwt_service.clone()))
            .wrap(Logger::default())
            .wrap(cors)
            .service(handlers::health_check)
            .service(
                web::scope("")
                    .wrap(AuthMiddleware)
                    .service(handlers::start_attempt)
                    .service(handlers::submit_attempt)
                    .service(handlers::get_attempt)
                    .service(handlers::get_available_tests)
                    .service(handlers::get_my_results)
                    .service(handlers::create_test)
                    .service(handlers::list_tests)
                    .service(handlers::get_test)
                    .service(handlers::update_test)
                    .service(handlers::delete_test)
                    .service(handlers::copy_test)
                    .service(handlers::update_test_groups)
                    .service(handlers::get_test_results)
                    .service(handlers::create_question)
                    .service(handlers::get_questions)
                    .service(handlers::update_question)
                    .service(handlers::delete_question)
                    .service(handlers::create_answer)
                    .service(handlers::update_answer)
                    .service(handlers::delete_answer),
            )
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
