// src/progress/store.rs

//! File-backed persistence for [`QuestState`]: a versioned JSON envelope
//! written on every mutation, with a migration step for records saved by
//! older schema versions.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;

use super::QuestState;

/// Bump when the persisted schema changes; `migrate` must then learn to fill
/// the new fields.
pub const STORAGE_VERSION: u32 = 3;

/// Record key the front-end historically stored this state under.
pub const STORAGE_KEY: &str = "thinkquest-storage";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access progress file: {0}")]
    Io(#[from] std::io::Error),

    #[error("progress file is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("progress schema version {0} is newer than supported version {STORAGE_VERSION}")]
    UnknownVersion(u32),
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    state: Value,
    version: u32,
}

/// Owns the state record and its backing file.
#[derive(Debug)]
pub struct ProgressStore {
    path: PathBuf,
    state: QuestState,
}

impl ProgressStore {
    /// Load the record at `path`, migrating older schema versions. A missing
    /// file yields a fresh default state.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if !path.exists() {
            return Ok(Self {
                path,
                state: QuestState::default(),
            });
        }

        let raw = fs::read_to_string(&path)?;
        let envelope: Envelope = serde_json::from_str(&raw)?;

        if envelope.version > STORAGE_VERSION {
            return Err(StoreError::UnknownVersion(envelope.version));
        }

        let migrated = migrate(envelope.state, envelope.version);
        let state: QuestState = serde_json::from_value(migrated)?;

        Ok(Self { path, state })
    }

    pub fn state(&self) -> &QuestState {
        &self.state
    }

    /// Apply a mutation and persist the result immediately.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut QuestState) -> R) -> Result<R, StoreError> {
        let result = f(&mut self.state);
        self.save()?;
        Ok(result)
    }

    /// Write the current state out. The auth token is skipped by the profile's
    /// serialization rules, so secrets never reach disk.
    pub fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let envelope = Envelope {
            state: serde_json::to_value(&self.state)?,
            version: STORAGE_VERSION,
        };
        fs::write(&self.path, serde_json::to_string_pretty(&envelope)?)?;
        Ok(())
    }
}

/// Upgrade a persisted state value from `version` to the current schema by
/// filling the fields later versions introduced with their defaults.
fn migrate(mut state: Value, version: u32) -> Value {
    if version == 0 {
        let defaults = [
            ("/stageData/empathy/empathyInsights", json!([])),
            ("/stageData/empathy/empathyThemes", json!([])),
            ("/stageData/define/addedHmwQuestions", json!([])),
            ("/stageData/ideate/hmwQuestions", json!([])),
            ("/stageData/ideate/selectedHmw", Value::Null),
        ];
        for (pointer, default) in defaults {
            fill_default(&mut state, pointer, default);
        }
    }
    state
}

/// Set the value at a JSON pointer if it is absent or null, creating
/// intermediate objects as needed.
fn fill_default(state: &mut Value, pointer: &str, default: Value) {
    let mut current = state;
    let mut segments = pointer.trim_start_matches('/').split('/').peekable();

    while let Some(segment) = segments.next() {
        if !current.is_object() {
            *current = json!({});
        }
        let Some(map) = current.as_object_mut() else {
            return;
        };

        if segments.peek().is_none() {
            let slot = map.entry(segment.to_string()).or_insert(Value::Null);
            if slot.is_null() {
                *slot = default;
            }
            return;
        }
        current = map.entry(segment.to_string()).or_insert_with(|| json!({}));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{Stage, UserProfile};
    use std::collections::BTreeMap;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tq-store-{tag}-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn missing_file_starts_fresh() {
        let store = ProgressStore::open(temp_path("fresh")).unwrap();
        assert_eq!(store.state().stages_unlocked, [true, false, false, false, false]);
    }

    #[test]
    fn roundtrips_through_disk() {
        let path = temp_path("roundtrip");

        let mut store = ProgressStore::open(&path).unwrap();
        store
            .update(|state| {
                state.complete_quiz(BTreeMap::new(), 80);
                state.record_stage_score(Stage::Empathize, 91.0);
            })
            .unwrap();

        let reloaded = ProgressStore::open(&path).unwrap();
        assert!(reloaded.state().quiz.passed);
        assert!(reloaded.state().stage_unlocked(Stage::Define));
        assert_eq!(reloaded.state().stage_data.empathy.score, Some(91.0));

        fs::remove_file(&path).ok();
    }

    #[test]
    fn auth_token_never_reaches_disk() {
        let path = temp_path("token");

        let mut store = ProgressStore::open(&path).unwrap();
        store
            .update(|state| {
                state.user = Some(UserProfile {
                    id: "u1".into(),
                    full_name: "Lerato M".into(),
                    email: "lerato@example.com".into(),
                    grade: None,
                    school_name: None,
                    avatar_url: None,
                    auth_token: "super-secret".into(),
                    quiz_completed: false,
                    quiz_score: 0,
                    last_login: None,
                });
            })
            .unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("super-secret"));
        assert!(raw.contains("lerato@example.com"));

        fs::remove_file(&path).ok();
    }

    #[test]
    fn migrates_version_zero_records() {
        let path = temp_path("migrate");

        // A version-0 record predating the Kanban and HMW fields.
        let old = json!({
            "version": 0,
            "state": {
                "user": null,
                "selectedProblem": null,
                "stagesUnlocked": [true, true, false, false, false],
                "tokens": 12,
                "stars": 1,
                "avatarUrl": "",
                "quiz": {"current": 0, "answers": {}, "passed": true, "score": 70},
                "stageData": {
                    "empathy": {"interviews": {}, "score": 75.0},
                    "define": {"hmwStatement": "How might we help?"},
                    "ideate": {"ideas": ["solar"], "top3": []},
                    "prototype": {},
                    "test": {"iterations": 0, "feedback": [], "reflection": ""}
                }
            }
        });
        fs::write(&path, serde_json::to_string(&old).unwrap()).unwrap();

        let store = ProgressStore::open(&path).unwrap();
        let state = store.state();
        assert!(state.stage_unlocked(Stage::Define));
        assert_eq!(state.tokens, 12);
        assert_eq!(state.stage_data.empathy.score, Some(75.0));
        assert!(state.stage_data.empathy.empathy_insights.is_empty());
        assert!(state.stage_data.ideate.hmw_questions.is_empty());
        assert_eq!(state.stage_data.define.hmw_statement, "How might we help?");

        fs::remove_file(&path).ok();
    }

    #[test]
    fn rejects_newer_schema_versions() {
        let path = temp_path("newer");
        fs::write(&path, r#"{"state": {}, "version": 9}"#).unwrap();

        match ProgressStore::open(&path) {
            Err(StoreError::UnknownVersion(9)) => {}
            other => panic!("expected UnknownVersion, got {other:?}"),
        }

        fs::remove_file(&path).ok();
    }
}
