pub mod group_repository;
pub mod question_repository;
pub mod test_attempt_repository;
pub mod test_repository;
pub mod test_result_repository;
pub mod user_repository;

pub use group_repository::{GroupRepository, MongoGroupRepository};
pub use question_repository::{MongoQuestionRepository, QuestionRepository};
pub use test_attempt_repository::{MongoTestAttemptRepository, TestAttemptRepository};
pub use test_repository::{MongoTestRepository, TestRepository};
pub use test_result_repository::{MongoTestResultRepository, TestResultRepository};
pub use user_repository::{MongoUserRepository, UserRepository};
