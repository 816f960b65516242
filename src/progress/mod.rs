// src/progress/mod.rs

//! Application-state core: the quest record a client session carries, with the
//! stage-progression state machine (score-gated unlock vector plus the quiz
//! prerequisite) and its per-stage submission data.

pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::STAGE_PASS_THRESHOLD;
use crate::models::problem::Problem;
use crate::models::score::{InsightNote, ThemeNote};

pub const STAGE_COUNT: usize = 5;

/// The five fixed phases of the design-thinking workflow, strictly linear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Empathize,
    Define,
    Ideate,
    Prototype,
    Test,
}

impl Stage {
    pub const ALL: [Stage; STAGE_COUNT] = [
        Stage::Empathize,
        Stage::Define,
        Stage::Ideate,
        Stage::Prototype,
        Stage::Test,
    ];

    pub fn index(self) -> usize {
        match self {
            Stage::Empathize => 0,
            Stage::Define => 1,
            Stage::Ideate => 2,
            Stage::Prototype => 3,
            Stage::Test => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Stage> {
        Stage::ALL.get(index).copied()
    }

    /// The stage unlocked by passing this one; `None` after Test.
    pub fn next(self) -> Option<Stage> {
        Stage::from_index(self.index() + 1)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Empathize => "Empathize",
            Stage::Define => "Define",
            Stage::Ideate => "Ideate",
            Stage::Prototype => "Prototype",
            Stage::Test => "Test",
        };
        write!(f, "{name}")
    }
}

/// The signed-in user as carried in client state. The auth token is never
/// written out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing)]
    pub auth_token: String,
    #[serde(default)]
    pub quiz_completed: bool,
    #[serde(default)]
    pub quiz_score: i64,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmpathyMap {
    pub says: Vec<String>,
    pub thinks: Vec<String>,
    pub does: Vec<String>,
    pub feels: Vec<String>,
}

/// A note on the Empathize Kanban board.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostIt {
    pub id: String,
    pub text: String,
    /// 'post-its', 'themes' or 'insights'.
    pub column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KanbanBoard {
    pub post_its: Vec<PostIt>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmpathyData {
    /// Interview transcripts keyed by persona id.
    pub interviews: BTreeMap<i64, Vec<String>>,
    pub empathy_map: EmpathyMap,
    pub kanban_board: KanbanBoard,
    pub empathy_insights: Vec<InsightNote>,
    pub empathy_themes: Vec<ThemeNote>,
    pub score: Option<f64>,
    pub reflection: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DefineData {
    pub hmw_statement: String,
    pub added_hmw_questions: Vec<String>,
    pub score: Option<f64>,
    pub reflection: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdeateData {
    pub ideas: Vec<String>,
    pub top3: Vec<String>,
    pub rationale: Option<String>,
    pub hmw_questions: Vec<String>,
    pub selected_hmw: Option<String>,
    pub score: Option<f64>,
    pub reflection: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrototypeChecklists {
    pub functionality: bool,
    pub design: bool,
    pub feedback: bool,
}

/// Metadata of an uploaded prototype visual; the bytes themselves are not
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMeta {
    pub name: String,
    pub r#type: String,
    pub size: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrototypeData {
    pub selected_idea: Option<String>,
    pub poster_notes: BTreeMap<String, Vec<String>>,
    pub timeline_notes: BTreeMap<String, Vec<String>>,
    pub checklists: PrototypeChecklists,
    pub uploads: Vec<UploadMeta>,
    pub score: Option<f64>,
    pub reflection: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestFeedback {
    pub ease: i32,
    pub notes: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestData {
    pub iterations: u32,
    pub feedback: Vec<TestFeedback>,
    pub score: Option<f64>,
    pub reflection: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StageData {
    pub empathy: EmpathyData,
    pub define: DefineData,
    pub ideate: IdeateData,
    pub prototype: PrototypeData,
    pub test: TestData,
}

impl StageData {
    pub fn score(&self, stage: Stage) -> Option<f64> {
        match stage {
            Stage::Empathize => self.empathy.score,
            Stage::Define => self.define.score,
            Stage::Ideate => self.ideate.score,
            Stage::Prototype => self.prototype.score,
            Stage::Test => self.test.score,
        }
    }

    fn set_score(&mut self, stage: Stage, score: f64) {
        match stage {
            Stage::Empathize => self.empathy.score = Some(score),
            Stage::Define => self.define.score = Some(score),
            Stage::Ideate => self.ideate.score = Some(score),
            Stage::Prototype => self.prototype.score = Some(score),
            Stage::Test => self.test.score = Some(score),
        }
    }
}

/// One-time assessment progress. `passed` flips on completion (or explicit
/// skip) regardless of the score; it is the prerequisite the stage routes
/// check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuizProgress {
    pub current: usize,
    pub answers: BTreeMap<u32, String>,
    pub passed: bool,
    pub score: i64,
}

/// The full client-state record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestState {
    pub user: Option<UserProfile>,
    pub selected_problem: Option<Problem>,
    pub stages_unlocked: [bool; STAGE_COUNT],
    pub tokens: i64,
    pub stars: i64,
    pub stage_data: StageData,
    pub avatar_url: String,
    pub quiz: QuizProgress,
}

impl Default for QuestState {
    fn default() -> Self {
        Self {
            user: None,
            selected_problem: None,
            stages_unlocked: [true, false, false, false, false],
            tokens: 0,
            stars: 0,
            stage_data: StageData::default(),
            avatar_url: String::new(),
            quiz: QuizProgress::default(),
        }
    }
}

impl QuestState {
    /// Unlock a stage by index. Out-of-range indices are ignored; already
    /// unlocked stages stay unlocked (the vector is monotonic).
    pub fn unlock_stage(&mut self, index: usize) {
        if index < STAGE_COUNT {
            self.stages_unlocked[index] = true;
        }
    }

    pub fn stage_unlocked(&self, stage: Stage) -> bool {
        self.stages_unlocked[stage.index()]
    }

    /// A stage route is reachable once the quiz prerequisite is met and the
    /// stage itself is unlocked.
    pub fn can_enter(&self, stage: Stage) -> bool {
        self.quiz.passed && self.stage_unlocked(stage)
    }

    /// Record the relay's score for a stage. Reaching the pass threshold
    /// unlocks the following stage; a lower score only stores the result so
    /// the feedback can be surfaced for revision. Returns whether the next
    /// stage got unlocked by this call.
    pub fn record_stage_score(&mut self, stage: Stage, score: f64) -> bool {
        self.stage_data.set_score(stage, score);

        if score >= STAGE_PASS_THRESHOLD {
            if let Some(next) = stage.next() {
                self.unlock_stage(next.index());
                return true;
            }
        }
        false
    }

    /// Aggregate score across all five stages, unsubmitted stages counting 0.
    pub fn total_score(&self) -> f64 {
        Stage::ALL
            .iter()
            .filter_map(|&s| self.stage_data.score(s))
            .sum()
    }

    /// Grade a quiz paper against the catalog and record completion in one
    /// step.
    pub fn submit_quiz(&mut self, answers: BTreeMap<u32, String>) -> crate::catalog::QuizResult {
        let result = crate::catalog::evaluate_quiz(&answers);
        self.complete_quiz(answers, result.score);
        result
    }

    /// Mark the quiz finished. Completion is what gates the stage routes, so
    /// `passed` is set regardless of the score reached.
    pub fn complete_quiz(&mut self, answers: BTreeMap<u32, String>, score: i64) {
        self.quiz.answers = answers;
        self.quiz.score = score;
        self.quiz.passed = true;
        if let Some(user) = &mut self.user {
            user.quiz_completed = true;
            user.quiz_score = score;
        }
    }

    pub fn select_problem(&mut self, problem: Problem) {
        self.selected_problem = Some(problem);
    }

    pub fn set_avatar_url(&mut self, url: impl Into<String>) {
        self.avatar_url = url.into();
    }

    pub fn add_tokens(&mut self, amount: i64) {
        self.tokens += amount;
    }

    pub fn add_stars(&mut self, amount: i64) {
        self.stars += amount;
    }

    /// Fixed completion rewards: a token per 10 points and a star per 100.
    /// Returns (tokens, stars) awarded.
    pub fn award_quest_rewards(&mut self) -> (i64, i64) {
        let total = self.total_score();
        let tokens = (total / 10.0).round() as i64;
        let stars = (total / 100.0).floor() as i64;
        self.add_tokens(tokens);
        self.add_stars(stars);
        (tokens, stars)
    }

    /// Restart the quest: problem selection, unlock vector and stage data go
    /// back to their initial values. User identity, rewards and quiz state
    /// survive.
    pub fn reset_quest(&mut self) {
        self.selected_problem = None;
        self.stages_unlocked = [true, false, false, false, false];
        self.stage_data = StageData::default();
    }

    /// Sign out: everything resets, quiz state included.
    pub fn logout(&mut self) {
        *self = QuestState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_strictly_linear() {
        assert_eq!(Stage::Empathize.next(), Some(Stage::Define));
        assert_eq!(Stage::Test.next(), None);
        assert_eq!(Stage::from_index(2), Some(Stage::Ideate));
        assert_eq!(Stage::from_index(5), None);
    }

    #[test]
    fn only_first_stage_starts_unlocked() {
        let state = QuestState::default();
        assert_eq!(state.stages_unlocked, [true, false, false, false, false]);
    }

    #[test]
    fn passing_score_unlocks_next_stage() {
        let mut state = QuestState::default();

        let unlocked = state.record_stage_score(Stage::Define, 82.0);
        assert!(unlocked);
        assert!(state.stage_unlocked(Stage::Ideate));
        assert_eq!(state.stage_data.define.score, Some(82.0));
    }

    #[test]
    fn failing_score_leaves_vector_unchanged() {
        let mut state = QuestState::default();

        let unlocked = state.record_stage_score(Stage::Define, 55.0);
        assert!(!unlocked);
        assert!(!state.stage_unlocked(Stage::Ideate));
        // The feedback score is still surfaced for revision.
        assert_eq!(state.stage_data.define.score, Some(55.0));
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut state = QuestState::default();
        assert!(state.record_stage_score(Stage::Empathize, 70.0));
        assert!(state.stage_unlocked(Stage::Define));
    }

    #[test]
    fn unlocks_are_monotonic_across_resubmission() {
        let mut state = QuestState::default();
        state.record_stage_score(Stage::Empathize, 90.0);
        assert!(state.stage_unlocked(Stage::Define));

        // A worse resubmission never re-locks what is already open.
        state.record_stage_score(Stage::Empathize, 10.0);
        assert!(state.stage_unlocked(Stage::Define));
        assert_eq!(state.stage_data.empathy.score, Some(10.0));
    }

    #[test]
    fn passing_test_stage_unlocks_nothing() {
        let mut state = QuestState::default();
        assert!(!state.record_stage_score(Stage::Test, 95.0));
    }

    #[test]
    fn quiz_gates_stage_routes() {
        let mut state = QuestState::default();
        assert!(!state.can_enter(Stage::Empathize));

        state.complete_quiz(BTreeMap::new(), 40);
        assert!(state.can_enter(Stage::Empathize));
        assert!(state.quiz.passed, "completion counts even below a pass mark");
        assert!(!state.can_enter(Stage::Define), "still locked by the vector");
    }

    #[test]
    fn submitting_the_quiz_opens_the_stage_routes() {
        let mut state = QuestState::default();

        let answers: BTreeMap<u32, String> = crate::catalog::quiz()
            .iter()
            .map(|q| (q.id, q.correct_answer.to_string()))
            .collect();
        let result = state.submit_quiz(answers);

        assert_eq!(result.score, 100);
        assert_eq!(state.quiz.score, 100);
        assert!(state.can_enter(Stage::Empathize));
    }

    #[test]
    fn rewards_follow_total_score() {
        let mut state = QuestState::default();
        state.complete_quiz(BTreeMap::new(), 80);
        for stage in Stage::ALL {
            state.record_stage_score(stage, 83.0);
        }
        assert_eq!(state.total_score(), 415.0);

        let (tokens, stars) = state.award_quest_rewards();
        assert_eq!(tokens, 42);
        assert_eq!(stars, 4);
        assert_eq!(state.tokens, 42);
        assert_eq!(state.stars, 4);
    }

    #[test]
    fn reset_quest_keeps_identity_and_rewards() {
        let mut state = QuestState::default();
        state.complete_quiz(BTreeMap::new(), 80);
        state.add_tokens(30);
        state.record_stage_score(Stage::Empathize, 88.0);

        state.reset_quest();
        assert_eq!(state.stages_unlocked, [true, false, false, false, false]);
        assert_eq!(state.stage_data.empathy.score, None);
        assert_eq!(state.tokens, 30);
        assert!(state.quiz.passed);

        state.logout();
        assert!(!state.quiz.passed);
        assert_eq!(state.tokens, 0);
    }
}
