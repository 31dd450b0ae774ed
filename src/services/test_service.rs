use std::sync::Arc;

use chrono::Utc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::Test,
        dto::{
            request::{CreateTestRequest, GroupAction, UpdateTestGroupsRequest, UpdateTestRequest},
            response::{GroupResultsDto, ParticipantResultDto, TestResultsOverviewResponse},
        },
    },
    repositories::{
        GroupRepository, QuestionRepository, TestRepository, TestResultRepository, UserRepository,
    },
    services::locks::KeyedLocks,
};

pub struct TestService {
    tests: Arc<dyn TestRepository>,
    questions: Arc<dyn QuestionRepository>,
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
    results: Arc<dyn TestResultRepository>,
    recompute_locks: KeyedLocks,
}

impl TestService {
    pub fn new(
        tests: Arc<dyn TestRepository>,
        questions: Arc<dyn QuestionRepository>,
        groups: Arc<dyn GroupRepository>,
        users: Arc<dyn UserRepository>,
        results: Arc<dyn TestResultRepository>,
    ) -> Self {
        Self {
            tests,
            questions,
            groups,
            users,
            results,
            recompute_locks: KeyedLocks::new(),
        }
    }

    pub async fn create_test(&self, author_id: &str, request: CreateTestRequest) -> AppResult<Test> {
        let groups = self
            .groups
            .find_by_ids(&request.available_for_groups)
            .await?;
        if groups.len() != request.available_for_groups.len() {
            return Err(AppError::ValidationError(
                "One or more groups are invalid".to_string(),
            ));
        }

        if matches!(&request.minimum_scores, Some(scores) if scores.is_empty()) {
            return Err(AppError::ValidationError(
                "No grade thresholds defined.".to_string(),
            ));
        }

        let mut test = Test::new(
            &request.title,
            &request.description,
            author_id,
            request.time_limit,
            request.available_for_groups,
            request.minimum_scores,
        );
        if let Some(status) = request.status {
            test.status = status;
        }

        log::info!("Creating test '{}' by author {}", test.title, author_id);
        self.tests.create(test).await
    }

    pub async fn get_test(&self, id: &str) -> AppResult<Test> {
        self.tests
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test with id '{}' not found", id)))
    }

    pub async fn list_tests_by_author(&self, author_id: &str) -> AppResult<Vec<Test>> {
        self.tests.find_by_author(author_id).await
    }

    pub async fn update_test(&self, id: &str, request: UpdateTestRequest) -> AppResult<Test> {
        let mut test = self.get_test(id).await?;

        if let Some(title) = request.title {
            test.title = title;
        }
        if let Some(description) = request.description {
            test.description = description;
        }
        if let Some(time_limit) = request.time_limit {
            test.time_limit = time_limit;
        }
        if let Some(group_ids) = request.available_for_groups {
            let groups = self.groups.find_by_ids(&group_ids).await?;
            if groups.len() != group_ids.len() {
                return Err(AppError::ValidationError(
                    "One or more groups are invalid".to_string(),
                ));
            }
            test.available_for_groups = group_ids;
        }
        if let Some(status) = request.status {
            test.status = status;
        }
        if let Some(minimum_scores) = request.minimum_scores {
            if minimum_scores.is_empty() {
                return Err(AppError::ValidationError(
                    "No grade thresholds defined.".to_string(),
                ));
            }
            test.minimum_scores = minimum_scores;
        }
        test.modified_at = Some(Utc::now());

        self.tests.update(test).await
    }

    pub async fn update_test_groups(
        &self,
        id: &str,
        request: UpdateTestGroupsRequest,
    ) -> AppResult<Test> {
        let mut test = self.get_test(id).await?;

        match request.action {
            GroupAction::Add => {
                self.groups
                    .find_by_id(&request.group_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!("Group with id '{}' not found", request.group_id))
                    })?;

                if !test.available_for_groups.contains(&request.group_id) {
                    test.available_for_groups.push(request.group_id);
                }
            }
            GroupAction::Remove => {
                test.available_for_groups.retain(|id| id != &request.group_id);
            }
        }
        test.modified_at = Some(Utc::now());

        self.tests.update(test).await
    }

    pub async fn delete_test(&self, id: &str) -> AppResult<()> {
        self.get_test(id).await?;
        log::info!("Deleting test {}", id);
        self.tests.delete(id).await
    }

    pub async fn copy_test(&self, id: &str) -> AppResult<Test> {
        let test = self.get_test(id).await?;
        self.tests.create(test.copy()).await
    }

    /// Recomputes the test's maximum marks from the current question set: the
    /// sum of every positive-scored answer across all questions. Always a
    /// full recompute, serialized per test; concurrent triggers settle on the
    /// same value.
    pub async fn recompute_maximum_marks(&self, test_id: &str) -> AppResult<f64> {
        let _guard = self.recompute_locks.acquire(test_id).await;

        self.get_test(test_id).await?;

        let questions = self.questions.find_by_test(test_id).await?;
        let maximum_marks: f64 = questions
            .iter()
            .flat_map(|q| q.answers.iter())
            .filter(|a| a.is_correct())
            .map(|a| a.score)
            .sum();

        self.tests.set_maximum_marks(test_id, maximum_marks).await?;
        log::debug!("Recomputed maximum marks for test {}: {}", test_id, maximum_marks);

        Ok(maximum_marks)
    }

    /// Author-facing overview: for every group the test is open to, a row per
    /// member with their result, or a placeholder if they have none.
    pub async fn test_results_overview(
        &self,
        test_id: &str,
    ) -> AppResult<TestResultsOverviewResponse> {
        let test = self.get_test(test_id).await?;

        let author_name = self
            .users
            .find_by_id(&test.author_id)
            .await?
            .map(|u| u.name)
            .unwrap_or_else(|| test.author_id.clone());

        let groups = self.groups.find_by_ids(&test.available_for_groups).await?;
        let results = self.results.find_by_test(test_id).await?;

        let member_ids: Vec<String> = groups
            .iter()
            .flat_map(|g| g.member_ids.iter().cloned())
            .collect();
        let members = self.users.find_by_ids(&member_ids).await?;

        let group_rows = groups
            .iter()
            .map(|group| {
                let participants = group
                    .member_ids
                    .iter()
                    .map(|member_id| {
                        let name = members
                            .iter()
                            .find(|u| &u.id == member_id)
                            .map(|u| u.name.as_str())
                            .unwrap_or(member_id.as_str());

                        match results.iter().find(|r| &r.user_id == member_id) {
                            Some(result) => ParticipantResultDto::from_result(result, name),
                            None => ParticipantResultDto::not_completed(
                                member_id,
                                name,
                                test.maximum_marks,
                            ),
                        }
                    })
                    .collect();

                GroupResultsDto {
                    group_name: group.name.clone(),
                    participants,
                }
            })
            .collect();

        Ok(TestResultsOverviewResponse {
            test_name: test.title,
            test_author: author_name,
            groups: group_rows,
        })
    }
}
