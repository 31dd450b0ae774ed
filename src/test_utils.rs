use crate::models::domain::question::{Answer, Question, QuestionType};
use crate::models::domain::test::Test;
use crate::models::domain::user::{Group, User, UserRole};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    /// A member user already assigned to the given group.
    pub fn member_of(group: &Group) -> User {
        let mut user = User::new("taker", "Test Taker", "taker@example.com", UserRole::Member);
        user.group_id = Some(group.id.clone());
        user
    }

    pub fn group_named(name: &str) -> Group {
        Group::new(name)
    }

    /// A test open to the given group with a 10-minute limit.
    pub fn test_for_group(group: &Group) -> Test {
        Test::new(
            "Sample Test",
            "A sample test",
            "author-1",
            10,
            vec![group.id.clone()],
            None,
        )
    }

    /// Single-choice question with one correct option worth `score`.
    pub fn single_choice_question(test_id: &str, score: f64) -> Question {
        let mut question =
            Question::new_with_defaults(test_id, "Pick the right one", QuestionType::SingleChoice);
        question.answers = vec![
            Answer::new("Right", score),
            Answer::new("Wrong", 0.0),
            Answer::new("Also wrong", 0.0),
        ];
        question
    }

    /// Multiple-choice question with two correct options worth 1 each.
    pub fn multiple_choice_question(test_id: &str) -> Question {
        let mut question =
            Question::new_with_defaults(test_id, "Pick all that apply", QuestionType::MultipleChoice);
        question.answers = vec![
            Answer::new("First right", 1.0),
            Answer::new("Second right", 1.0),
            Answer::new("Wrong", 0.0),
        ];
        question
    }

    pub fn number_question(test_id: &str, value: &str, score: f64) -> Question {
        let mut question =
            Question::new_with_defaults(test_id, "How many?", QuestionType::NumberInput);
        question.answers = vec![Answer::new(value, score)];
        question
    }

    pub fn text_question(test_id: &str, text: &str, tolerance: f64) -> Question {
        let mut question = Question::new_with_defaults(test_id, "Name it", QuestionType::TextInput);
        question.answers = vec![Answer::new(text, 1.0)];
        question.percentage_error = Some(tolerance);
        question
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn fixtures_are_structurally_valid() {
        let group = group_named("Group A");
        let test = test_for_group(&group);

        assert!(single_choice_question(&test.id, 2.0).validate().is_ok());
        assert!(multiple_choice_question(&test.id).validate().is_ok());
        assert!(number_question(&test.id, "42", 1.0).validate().is_ok());
        assert!(text_question(&test.id, "rust", 0.0).validate().is_ok());
    }

    #[test]
    fn member_fixture_is_in_the_group() {
        let group = group_named("Group A");
        let user = member_of(&group);

        assert_eq!(user.group_id.as_deref(), Some(group.id.as_str()));
    }
}
