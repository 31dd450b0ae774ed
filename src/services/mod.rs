pub mod attempt_service;
pub mod locks;
pub mod question_service;
pub mod scoring;
pub mod test_service;

pub use attempt_service::AttemptService;
pub use question_service::QuestionService;
pub use test_service::TestService;
