// src/ai/extract.rs

//! Shared extraction of a JSON feedback object from a model's free-text reply.
//!
//! Extraction policy, in order: a fenced ```json block, then the substring
//! between the first '{' and the last '}', then the raw text itself. The
//! decoded object is validated against the per-endpoint required keys; a
//! miss yields a fixed fallback payload instead of the partial object.

use regex::Regex;
use serde_json::{Value, json};
use std::sync::LazyLock;

static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\n([\s\S]*?)\n```").unwrap());

/// Which feedback shape the caller expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    /// Empathy/Define/Ideate scoring: score, strengths, improvements,
    /// suggestions, overallComment.
    Stage,
    /// Prototype scoring: the stage keys plus addressesProblem and
    /// visualFeedback.
    Prototype,
}

#[derive(Debug)]
pub enum FeedbackError {
    /// No JSON object could be parsed out of the reply; carries the raw text
    /// for diagnostics.
    Parse { raw: String },
    /// An object was parsed but required keys are missing or mistyped.
    Shape,
}

/// Locate and parse a JSON object inside `text`.
pub fn extract_json(text: &str) -> Result<Value, FeedbackError> {
    let candidate = if let Some(caps) = FENCED_JSON.captures(text) {
        caps[1].to_string()
    } else {
        match (text.find('{'), text.rfind('}')) {
            (Some(first), Some(last)) if last > first => text[first..=last].to_string(),
            _ => text.to_string(),
        }
    };

    serde_json::from_str(&candidate).map_err(|_| FeedbackError::Parse {
        raw: text.to_string(),
    })
}

fn has_score_shape(value: &Value) -> bool {
    value.get("score").is_some_and(Value::is_number)
        && value.get("strengths").is_some_and(Value::is_string)
        && value.get("improvements").is_some_and(Value::is_string)
        && value.get("suggestions").is_some_and(Value::is_array)
        && value.get("overallComment").is_some_and(Value::is_string)
}

fn has_prototype_shape(value: &Value) -> bool {
    has_score_shape(value)
        && value.get("addressesProblem").is_some_and(Value::is_boolean)
        && value.get("visualFeedback").is_some_and(Value::is_array)
}

/// Extract and validate a feedback object of the given kind.
///
/// On success the full decoded object is returned verbatim, extra keys
/// included, so richer model replies pass through untouched.
pub fn feedback(kind: FeedbackKind, text: &str) -> Result<Value, FeedbackError> {
    let value = extract_json(text)?;
    let ok = match kind {
        FeedbackKind::Stage => has_score_shape(&value),
        FeedbackKind::Prototype => has_prototype_shape(&value),
    };
    if ok { Ok(value) } else { Err(FeedbackError::Shape) }
}

/// Fixed payload substituted when the reply parsed but failed shape validation.
pub fn shape_fallback(kind: FeedbackKind) -> Value {
    let mut value = json!({
        "error": "AI response in unexpected format. Providing fallback score.",
        "score": 50,
        "strengths": "N/A",
        "improvements": "Could not parse detailed feedback.",
        "suggestions": ["Ensure your input is clear and concise."],
        "overallComment": "Please try again."
    });
    if kind == FeedbackKind::Prototype {
        value["addressesProblem"] = json!(false);
        value["visualFeedback"] = json!([]);
    }
    value
}

/// Fixed payload substituted when the upstream model call itself failed.
pub fn upstream_fallback(kind: FeedbackKind, details: &str) -> Value {
    let mut value = json!({
        "error": "Failed to get score from AI. Please try again later.",
        "details": details,
        "score": 50,
        "strengths": "N/A",
        "improvements": "Failed to connect to AI service.",
        "suggestions": ["Check your internet connection or try again later."],
        "overallComment": "An error occurred."
    });
    if kind == FeedbackKind::Prototype {
        value["addressesProblem"] = json!(false);
        value["visualFeedback"] = json!([]);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{"score": 82, "strengths": "good", "improvements": "more depth",
        "suggestions": ["interview more users"], "overallComment": "solid"}"#;

    #[test]
    fn takes_fenced_json_block() {
        let reply = format!("Here is my assessment:\n```json\n{VALID}\n```\nGood luck!");
        let value = extract_json(&reply).unwrap();
        assert_eq!(value["score"], 82);
        // The fenced contents win even with braces in surrounding prose.
        let decoy = format!("{{\"score\": 1}} nope\n```json\n{VALID}\n```");
        assert_eq!(extract_json(&decoy).unwrap()["score"], 82);
    }

    #[test]
    fn falls_back_to_brace_substring() {
        let reply = format!("Sure! {VALID} Hope that helps.");
        let value = extract_json(&reply).unwrap();
        assert_eq!(value["strengths"], "good");
    }

    #[test]
    fn brace_substring_spans_first_to_last() {
        let reply = r#"note {"a": {"b": 1}} trailing"#;
        let value = extract_json(reply).unwrap();
        assert_eq!(value["a"]["b"], 1);
    }

    #[test]
    fn parses_raw_json_directly() {
        let value = extract_json("[1, 2, 3]").unwrap();
        assert!(value.is_array());
    }

    #[test]
    fn parse_failure_carries_raw_text() {
        let err = extract_json("the model refused to answer").unwrap_err();
        match err {
            FeedbackError::Parse { raw } => assert_eq!(raw, "the model refused to answer"),
            FeedbackError::Shape => panic!("expected parse error"),
        }
    }

    #[test]
    fn stage_shape_requires_all_keys() {
        assert!(feedback(FeedbackKind::Stage, VALID).is_ok());

        let missing = r#"{"score": 82, "strengths": "good"}"#;
        assert!(matches!(
            feedback(FeedbackKind::Stage, missing),
            Err(FeedbackError::Shape)
        ));

        // Mistyped score is treated the same as a missing one.
        let mistyped = VALID.replace("82", "\"82\"");
        assert!(matches!(
            feedback(FeedbackKind::Stage, &mistyped),
            Err(FeedbackError::Shape)
        ));
    }

    #[test]
    fn prototype_shape_requires_flags() {
        assert!(matches!(
            feedback(FeedbackKind::Prototype, VALID),
            Err(FeedbackError::Shape)
        ));

        let full = r#"{"score": 90, "strengths": "s", "improvements": "i",
            "suggestions": [], "overallComment": "o", "addressesProblem": true,
            "visualFeedback": [{"quote": "clear flow", "sentiment": "positive"}]}"#;
        let value = feedback(FeedbackKind::Prototype, full).unwrap();
        assert_eq!(value["visualFeedback"][0]["sentiment"], "positive");
    }

    #[test]
    fn extra_keys_pass_through() {
        let reply = VALID.replace('}', ", \"bonus\": \"kept\"}");
        let value = feedback(FeedbackKind::Stage, &reply).unwrap();
        assert_eq!(value["bonus"], "kept");
    }

    #[test]
    fn fallback_payloads_are_fixed() {
        let value = shape_fallback(FeedbackKind::Stage);
        assert_eq!(value["score"], 50);
        assert_eq!(value["strengths"], "N/A");
        assert_eq!(value["improvements"], "Could not parse detailed feedback.");
        assert_eq!(value["suggestions"][0], "Ensure your input is clear and concise.");
        assert_eq!(value["overallComment"], "Please try again.");
        assert!(value.get("addressesProblem").is_none());

        let proto = shape_fallback(FeedbackKind::Prototype);
        assert_eq!(proto["addressesProblem"], false);
        assert_eq!(proto["visualFeedback"], json!([]));

        let upstream = upstream_fallback(FeedbackKind::Stage, "quota exceeded");
        assert_eq!(upstream["score"], 50);
        assert_eq!(upstream["details"], "quota exceeded");
        assert_eq!(upstream["improvements"], "Failed to connect to AI service.");
    }
}
