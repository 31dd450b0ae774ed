pub mod question;
pub mod test_attempt;
pub mod test_result;
pub mod user;

pub use question::{Answer, Question, QuestionType};
pub use test::{GradeThreshold, Test, TestStatus};
pub use test_attempt::{AnswerValue, AttemptAnswer, TestAttempt};
pub use test_result::TestResult;
pub use user::{Group, User, UserRole};
