// src/models/score.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A processed Kanban insight from the Empathize stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightNote {
    pub persona: String,
    pub activity: String,
    pub because: String,
    pub but: String,
}

/// A titled theme clustered out of raw empathy notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeNote {
    pub title: String,
    pub description: String,
}

/// The problem a submission is scored against. Only the title and context are
/// embedded into prompts; extra keys on the wire are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemRef {
    pub title: String,
    pub context: String,
}

/// Empathize-stage scoring fields. All fields are optional on the wire so the
/// handler can answer a 400 listing what is missing instead of a decode error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmpathyFields {
    pub empathy_map_input: Option<String>,
    pub reflection: Option<String>,
    pub insights: Option<Vec<InsightNote>>,
    pub themes: Option<Vec<String>>,
    pub selected_problem: Option<ProblemRef>,
}

/// Define-stage scoring fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefineFields {
    pub hmw_list: Option<Vec<String>>,
    pub selected_problem: Option<ProblemRef>,
    pub themes: Option<Vec<ThemeNote>>,
    pub reflection: Option<String>,
}

/// Ideate-stage scoring fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeateFields {
    pub hmw: Option<String>,
    pub selected_top3_ideas: Option<Vec<String>>,
    pub rationale_map: Option<BTreeMap<String, String>>,
    pub reflection: Option<String>,
    pub selected_problem: Option<ProblemRef>,
}

/// Prototype scoring request: concept-poster text plus optional uploaded
/// visuals forwarded as inline data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrototypeScoreRequest {
    pub selected_idea: Option<String>,
    pub poster: Option<String>,
    #[serde(default)]
    pub uploads: Vec<PosterUpload>,
}

/// An uploaded prototype visual. `base64` is a data URL; the payload after the
/// comma is what gets forwarded.
#[derive(Debug, Clone, Deserialize)]
pub struct PosterUpload {
    pub name: String,
    pub base64: String,
    pub r#type: String,
}

#[derive(Debug, Deserialize)]
pub struct PersonaRef {
    pub name: String,
    pub role: String,
}

/// Prototype notes handed to a persona for in-character feedback.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrototypeNotes {
    pub selected_idea: String,
    #[serde(default)]
    pub poster_notes: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub timeline_notes: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaFeedbackRequest {
    pub persona: Option<PersonaRef>,
    pub prototype_data: Option<PrototypeNotes>,
    pub problem_title: Option<String>,
}
