use std::collections::BTreeSet;

use crate::errors::{AppError, AppResult};
use crate::models::domain::question::{Question, QuestionType};
use crate::models::domain::test::GradeThreshold;
use crate::models::domain::test_attempt::AnswerValue;

/// Outcome of evaluating one submitted answer against one question.
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluatedAnswer {
    pub is_correct: bool,
    pub score: f64,
}

impl EvaluatedAnswer {
    fn incorrect() -> Self {
        EvaluatedAnswer {
            is_correct: false,
            score: 0.0,
        }
    }
}

/// Scores one submitted answer against a question's answer set. Pure and
/// total: wrong, missing, or malformed submissions produce a zero result,
/// never an error. A question with no correct-flagged answer is unscoreable
/// and also produces a zero result.
pub fn evaluate_answer(question: &Question, submitted: Option<&AnswerValue>) -> EvaluatedAnswer {
    let Some(value) = submitted else {
        return EvaluatedAnswer::incorrect();
    };

    let correct: Vec<_> = question.correct_answers().collect();
    if correct.is_empty() {
        return EvaluatedAnswer::incorrect();
    }

    match question.question_type {
        QuestionType::SingleChoice => {
            let AnswerValue::Selection(ids) = value else {
                return EvaluatedAnswer::incorrect();
            };
            let Some(selected) = ids.first() else {
                return EvaluatedAnswer::incorrect();
            };

            match correct.iter().find(|a| &a.id == selected) {
                Some(answer) => EvaluatedAnswer {
                    is_correct: true,
                    score: answer.score,
                },
                None => EvaluatedAnswer::incorrect(),
            }
        }
        QuestionType::MultipleChoice => {
            let AnswerValue::Selection(ids) = value else {
                return EvaluatedAnswer::incorrect();
            };

            let selected: BTreeSet<&str> = ids.iter().map(String::as_str).collect();
            let correct_ids: BTreeSet<&str> = correct.iter().map(|a| a.id.as_str()).collect();

            let score = correct
                .iter()
                .filter(|a| selected.contains(a.id.as_str()))
                .map(|a| a.score)
                .sum();

            EvaluatedAnswer {
                is_correct: selected == correct_ids,
                score,
            }
        }
        QuestionType::NumberInput => {
            let submitted_value = match value {
                AnswerValue::Number(n) => Some(*n),
                AnswerValue::Text(s) => s.trim().parse::<f64>().ok(),
                AnswerValue::Selection(_) => None,
            };
            let expected = correct[0].text.trim().parse::<f64>().ok();

            match (submitted_value, expected) {
                (Some(given), Some(expected)) if given == expected => EvaluatedAnswer {
                    is_correct: true,
                    score: correct[0].score,
                },
                _ => EvaluatedAnswer::incorrect(),
            }
        }
        QuestionType::TextInput => {
            let AnswerValue::Text(text) = value else {
                return EvaluatedAnswer::incorrect();
            };

            let similarity = text_similarity(text, &correct[0].text);
            let tolerance = question.percentage_error.unwrap_or(0.0);

            if similarity >= 1.0 - tolerance / 100.0 {
                EvaluatedAnswer {
                    is_correct: true,
                    score: correct[0].score,
                }
            } else {
                EvaluatedAnswer::incorrect()
            }
        }
    }
}

/// Normalized Sorensen-Dice bigram similarity in [0, 1].
pub fn text_similarity(input: &str, expected: &str) -> f64 {
    strsim::sorensen_dice(
        &input.trim().to_lowercase(),
        &expected.trim().to_lowercase(),
    )
}

/// Percentage of achievable marks earned. A non-positive maximum means the
/// test has no scoreable answers; that resolves to 0%, never an error.
pub fn percentage_score(total_score: f64, maximum_marks: f64) -> f64 {
    if maximum_marks <= 0.0 {
        return 0.0;
    }
    total_score / maximum_marks * 100.0
}

/// Maps a score to a grade label via the ordered threshold table: highest
/// qualifying threshold wins, ties resolve by insertion order (stable sort),
/// and a percentage below every threshold falls back to the lowest one.
pub fn calculate_grade(
    total_score: f64,
    maximum_marks: f64,
    thresholds: &[GradeThreshold],
) -> AppResult<String> {
    if thresholds.is_empty() {
        return Err(AppError::ValidationError(
            "No grade thresholds defined.".to_string(),
        ));
    }

    let percentage = percentage_score(total_score, maximum_marks);

    let mut ordered: Vec<&GradeThreshold> = thresholds.iter().collect();
    ordered.sort_by(|a, b| b.min_percent.total_cmp(&a.min_percent));

    for threshold in &ordered {
        if percentage >= threshold.min_percent {
            return Ok(threshold.grade.clone());
        }
    }

    // Non-empty checked above; the last entry carries the lowest threshold.
    Ok(ordered[ordered.len() - 1].grade.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::question::{Answer, Question, QuestionType};
    use chrono::Utc;

    fn question(question_type: QuestionType, answers: Vec<Answer>) -> Question {
        Question {
            id: "q-1".to_string(),
            test_id: "test-1".to_string(),
            question_text: "A question".to_string(),
            image_url: None,
            question_type,
            answers,
            percentage_error: None,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    fn answer(id: &str, text: &str, score: f64) -> Answer {
        Answer {
            id: id.to_string(),
            text: text.to_string(),
            score,
        }
    }

    fn selection(ids: &[&str]) -> AnswerValue {
        AnswerValue::Selection(ids.iter().map(|s| s.to_string()).collect())
    }

    mod single_choice {
        use super::*;

        fn sample() -> Question {
            question(
                QuestionType::SingleChoice,
                vec![
                    answer("a", "Paris", 3.0),
                    answer("b", "London", 0.0),
                    answer("c", "Berlin", 0.0),
                ],
            )
        }

        #[test]
        fn correct_option_earns_its_score() {
            let result = evaluate_answer(&sample(), Some(&selection(&["a"])));
            assert_eq!(
                result,
                EvaluatedAnswer {
                    is_correct: true,
                    score: 3.0
                }
            );
        }

        #[test]
        fn wrong_option_earns_zero() {
            let result = evaluate_answer(&sample(), Some(&selection(&["b"])));
            assert_eq!(result, EvaluatedAnswer::incorrect());
        }

        #[test]
        fn unknown_id_empty_selection_and_wrong_shape_earn_zero() {
            assert_eq!(
                evaluate_answer(&sample(), Some(&selection(&["nope"]))),
                EvaluatedAnswer::incorrect()
            );
            assert_eq!(
                evaluate_answer(&sample(), Some(&selection(&[]))),
                EvaluatedAnswer::incorrect()
            );
            assert_eq!(
                evaluate_answer(&sample(), Some(&AnswerValue::Text("Paris".into()))),
                EvaluatedAnswer::incorrect()
            );
            assert_eq!(
                evaluate_answer(&sample(), None),
                EvaluatedAnswer::incorrect()
            );
        }
    }

    mod multiple_choice {
        use super::*;

        fn sample() -> Question {
            question(
                QuestionType::MultipleChoice,
                vec![
                    answer("a", "2", 1.0),
                    answer("b", "3", 1.0),
                    answer("c", "4", 0.0),
                    answer("d", "9", 0.0),
                ],
            )
        }

        #[test]
        fn exact_correct_set_is_fully_correct() {
            let result = evaluate_answer(&sample(), Some(&selection(&["a", "b"])));
            assert_eq!(
                result,
                EvaluatedAnswer {
                    is_correct: true,
                    score: 2.0
                }
            );
        }

        #[test]
        fn strict_subset_earns_partial_score_but_not_correct() {
            let result = evaluate_answer(&sample(), Some(&selection(&["a"])));
            assert_eq!(
                result,
                EvaluatedAnswer {
                    is_correct: false,
                    score: 1.0
                }
            );
        }

        #[test]
        fn wrong_ids_are_not_penalized_but_break_exactness() {
            let result = evaluate_answer(&sample(), Some(&selection(&["a", "b", "c"])));
            assert_eq!(
                result,
                EvaluatedAnswer {
                    is_correct: false,
                    score: 2.0
                }
            );
        }

        #[test]
        fn duplicates_collapse_before_scoring() {
            let result = evaluate_answer(&sample(), Some(&selection(&["a", "a", "b"])));
            assert_eq!(
                result,
                EvaluatedAnswer {
                    is_correct: true,
                    score: 2.0
                }
            );
        }

        #[test]
        fn empty_selection_earns_zero() {
            let result = evaluate_answer(&sample(), Some(&selection(&[])));
            assert_eq!(result, EvaluatedAnswer::incorrect());
        }
    }

    mod number_input {
        use super::*;

        fn sample() -> Question {
            question(QuestionType::NumberInput, vec![answer("a", "42.5", 2.0)])
        }

        #[test]
        fn exact_number_earns_full_score() {
            let result = evaluate_answer(&sample(), Some(&AnswerValue::Number(42.5)));
            assert_eq!(
                result,
                EvaluatedAnswer {
                    is_correct: true,
                    score: 2.0
                }
            );
        }

        #[test]
        fn numeric_string_is_accepted() {
            let result = evaluate_answer(&sample(), Some(&AnswerValue::Text(" 42.5 ".into())));
            assert_eq!(
                result,
                EvaluatedAnswer {
                    is_correct: true,
                    score: 2.0
                }
            );
        }

        #[test]
        fn near_miss_earns_zero() {
            let result = evaluate_answer(&sample(), Some(&AnswerValue::Number(42.4999)));
            assert_eq!(result, EvaluatedAnswer::incorrect());
        }

        #[test]
        fn non_numeric_input_earns_zero_without_panicking() {
            let result = evaluate_answer(&sample(), Some(&AnswerValue::Text("forty-two".into())));
            assert_eq!(result, EvaluatedAnswer::incorrect());
        }

        #[test]
        fn unparseable_canonical_text_is_unscoreable() {
            let q = question(QuestionType::NumberInput, vec![answer("a", "not a number", 2.0)]);
            let result = evaluate_answer(&q, Some(&AnswerValue::Number(0.0)));
            assert_eq!(result, EvaluatedAnswer::incorrect());
        }
    }

    mod text_input {
        use super::*;

        fn sample(percentage_error: f64) -> Question {
            let mut q = question(QuestionType::TextInput, vec![answer("a", "Photosynthesis", 5.0)]);
            q.percentage_error = Some(percentage_error);
            q
        }

        #[test]
        fn zero_tolerance_requires_normalized_exact_match() {
            let q = sample(0.0);

            let exact = evaluate_answer(&q, Some(&AnswerValue::Text("  photosynthesis ".into())));
            assert_eq!(
                exact,
                EvaluatedAnswer {
                    is_correct: true,
                    score: 5.0
                }
            );

            let near = evaluate_answer(&q, Some(&AnswerValue::Text("photosinthesis".into())));
            assert_eq!(near, EvaluatedAnswer::incorrect());
        }

        #[test]
        fn full_tolerance_accepts_anything() {
            let q = sample(100.0);
            let result = evaluate_answer(&q, Some(&AnswerValue::Text("zzz".into())));
            assert!(result.is_correct);
            assert_eq!(result.score, 5.0);
        }

        #[test]
        fn acceptance_boundary_is_inclusive() {
            // "ab" vs "abcd": one shared bigram of four total, Dice = 0.5.
            // A 50% tolerance puts the cut-off exactly at that similarity,
            // and the comparison is >=, not >.
            let mut q = question(QuestionType::TextInput, vec![answer("a", "abcd", 1.0)]);
            q.percentage_error = Some(50.0);

            let result = evaluate_answer(&q, Some(&AnswerValue::Text("ab".into())));
            assert!(result.is_correct);

            q.percentage_error = Some(40.0);
            let result = evaluate_answer(&q, Some(&AnswerValue::Text("ab".into())));
            assert!(!result.is_correct);
        }

        #[test]
        fn missing_tolerance_means_exact_match() {
            let mut q = question(QuestionType::TextInput, vec![answer("a", "rust", 1.0)]);
            q.percentage_error = None;

            assert!(evaluate_answer(&q, Some(&AnswerValue::Text("rust".into()))).is_correct);
            assert!(!evaluate_answer(&q, Some(&AnswerValue::Text("rusty".into()))).is_correct);
        }

        #[test]
        fn wrong_shape_earns_zero() {
            let q = sample(50.0);
            let result = evaluate_answer(&q, Some(&AnswerValue::Number(1.0)));
            assert_eq!(result, EvaluatedAnswer::incorrect());
        }
    }

    #[test]
    fn question_without_correct_answers_is_unscoreable() {
        let q = question(
            QuestionType::SingleChoice,
            vec![answer("a", "Paris", 0.0), answer("b", "London", 0.0)],
        );

        let result = evaluate_answer(&q, Some(&selection(&["a"])));
        assert_eq!(result, EvaluatedAnswer::incorrect());
    }

    mod grading {
        use super::*;

        fn thresholds() -> Vec<GradeThreshold> {
            vec![
                GradeThreshold::new("A", 90.0),
                GradeThreshold::new("B", 70.0),
                GradeThreshold::new("C", 0.0),
            ]
        }

        #[test]
        fn exact_threshold_earns_the_higher_grade() {
            let grade = calculate_grade(70.0, 100.0, &thresholds()).unwrap();
            assert_eq!(grade, "B");
        }

        #[test]
        fn just_below_threshold_earns_the_lower_grade() {
            let grade = calculate_grade(69.999, 100.0, &thresholds()).unwrap();
            assert_eq!(grade, "C");
        }

        #[test]
        fn top_grade_at_full_score() {
            let grade = calculate_grade(100.0, 100.0, &thresholds()).unwrap();
            assert_eq!(grade, "A");
        }

        #[test]
        fn zero_maximum_marks_resolves_to_zero_percent() {
            let grade = calculate_grade(10.0, 0.0, &thresholds()).unwrap();
            assert_eq!(grade, "C");
        }

        #[test]
        fn unordered_table_is_sorted_before_matching() {
            let shuffled = vec![
                GradeThreshold::new("C", 0.0),
                GradeThreshold::new("A", 90.0),
                GradeThreshold::new("B", 70.0),
            ];

            let grade = calculate_grade(95.0, 100.0, &shuffled).unwrap();
            assert_eq!(grade, "A");
        }

        #[test]
        fn duplicate_thresholds_resolve_by_insertion_order() {
            let table = vec![
                GradeThreshold::new("pass", 50.0),
                GradeThreshold::new("ok", 50.0),
                GradeThreshold::new("fail", 0.0),
            ];

            let grade = calculate_grade(60.0, 100.0, &table).unwrap();
            assert_eq!(grade, "pass");
        }

        #[test]
        fn percentage_below_all_thresholds_falls_back_to_lowest() {
            let table = vec![
                GradeThreshold::new("A", 90.0),
                GradeThreshold::new("B", 50.0),
            ];

            let grade = calculate_grade(10.0, 100.0, &table).unwrap();
            assert_eq!(grade, "B");
        }

        #[test]
        fn empty_table_is_an_error() {
            let result = calculate_grade(50.0, 100.0, &[]);
            assert!(matches!(result, Err(AppError::ValidationError(_))));
        }
    }

    #[test]
    fn percentage_guard_handles_non_positive_maximum() {
        assert_eq!(percentage_score(5.0, 0.0), 0.0);
        assert_eq!(percentage_score(5.0, -1.0), 0.0);
        assert_eq!(percentage_score(5.0, 10.0), 50.0);
    }
}
