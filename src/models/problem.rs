// src/models/problem.rs

use serde::{Deserialize, Serialize};

/// A catalog problem statement: read-only reference data, never mutated at
/// runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: i64,
    pub title: String,
    pub context: String,
    #[serde(default)]
    pub key_challenges: Vec<String>,
    pub category: String,
    pub difficulty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// An interview persona users question during the Empathize stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub avatar: String,
    pub backstory: String,
}
