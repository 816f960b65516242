// src/ai/prompt.rs

//! Prompt assembly for the relay endpoints. User-entered fields are embedded
//! verbatim; each scoring prompt ends with the instruction pinning the JSON
//! reply shape the extractor expects.

use std::collections::BTreeMap;

use crate::models::score::{
    DefineFields, EmpathyFields, IdeateFields, InsightNote, ProblemRef, ThemeNote,
};

const JSON_SHAPE_INSTRUCTION: &str = "Your feedback MUST include: 1) Specific strengths, \
2) Areas for improvement with examples, 3) Actionable suggestions, and 4) An overall comment. \
Your response MUST be a JSON object with the following properties: 'score' (number), \
'strengths' (string), 'improvements' (string), 'suggestions' (array of strings), \
and 'overallComment' (string).";

pub fn persona_chat(name: &str, role: &str, backstory: &str, question: &str) -> String {
    format!(
        "Respond as {name} ({role}) with backstory: {backstory} to this question: {question}. \
         Please ensure your response is in B1 (Intermediate) level English: simple, clear, \
         using basic grammar and vocabulary, avoiding idioms, and limited to 2-3 sentences. \
         keep it concise"
    )
}

/// `insights` rendered one per line, `themes` joined with newlines. Handlers
/// validate presence first and pass the checked problem reference in.
pub fn empathy(fields: &EmpathyFields, problem: &ProblemRef) -> String {
    let insights = insight_lines(fields.insights.as_deref().unwrap_or_default());
    let themes = fields
        .themes
        .as_deref()
        .unwrap_or_default()
        .join("\n");

    format!(
        "Analyze the following user inputs for the Empathize stage in design thinking, \
         specifically for the problem: \"{title}\" (Context: \"{context}\").\n\n\
         Empathy Map Input: \"{map}\"\n\
         Reflection: \"{reflection}\"\n\
         Kanban Themes: \"{themes}\"\n\
         Kanban Insights (focus on these for depth, relevance, and Sci-Bono criteria - \
         true to user, surprising/revealing, helpful for defining problems):\n\
         {insights}\n\n\
         Provide a score out of 100 for accuracy, clarity, completeness, and adherence to \
         Sci-Bono criteria. Impose stricter scoring: scores below 50 should be given for \
         incomplete, vague, or generic notes/insights. Deduct points for unprocessed data \
         or lack of detailed emotional insights and problem connections. {shape}",
        title = problem.title,
        context = problem.context,
        map = fields.empathy_map_input.as_deref().unwrap_or_default(),
        reflection = fields.reflection.as_deref().unwrap_or_default(),
        themes = themes,
        insights = insights,
        shape = JSON_SHAPE_INSTRUCTION,
    )
}

pub fn define(fields: &DefineFields, problem: &ProblemRef) -> String {
    let hmw_list = bullet_lines(fields.hmw_list.as_deref().unwrap_or_default());
    let themes = theme_lines(fields.themes.as_deref().unwrap_or_default());

    format!(
        "Analyze the following Define stage submission for the design thinking process.\n\
         The selected problem statement the user is trying to solve is: \"{title}\" \
         (Context: \"{context}\").\n\n\
         User's How Might We (HMW) Questions:\n{hmw_list}\n\n\
         Empathy Themes from previous stage:\n{themes}\n\n\
         User's Reflection: \"{reflection}\"\n\n\
         Provide a score out of 100 for the quality of the HMW questions (specificity, \
         actionability, breadth), their relevance to the selected problem and empathy \
         themes, and the insightfulness of the reflection. Penalize <60 if HMWs are too \
         broad/narrow, not actionable, or the reflection is superficial.\n{shape}",
        title = problem.title,
        context = problem.context,
        hmw_list = hmw_list,
        themes = themes,
        reflection = fields.reflection.as_deref().unwrap_or_default(),
        shape = JSON_SHAPE_INSTRUCTION,
    )
}

pub fn ideate(fields: &IdeateFields, problem: &ProblemRef) -> String {
    let empty = BTreeMap::new();
    let rationale_map = fields.rationale_map.as_ref().unwrap_or(&empty);
    let ideas = fields
        .selected_top3_ideas
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|idea| {
            let rationale = rationale_map
                .get(idea)
                .map(String::as_str)
                .unwrap_or("No rationale provided.");
            format!("- Idea: \"{idea}\"\n  Rationale: \"{rationale}\"")
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze the following Ideate stage submission for the design thinking process.\n\
         The selected problem statement the user is trying to solve is: \"{title}\" \
         (Context: \"{context}\").\n\
         The How-Might-We (HMW) question addressed is: \"{hmw}\".\n\n\
         User's Top 3 Ideas and their Rationales:\n{ideas}\n\n\
         User's Reflection: \"{reflection}\"\n\n\
         Score this Ideate stage (0-100). Penalize <60 if ideas are generic, rationales \
         weak, or reflection missing problem links to the original problem or the selected \
         HMW.\n\
         Consider the creativity, feasibility, and relevance of the ideas to the HMW and \
         the problem. Evaluate the strength and clarity of the rationales. Assess if the \
         reflection effectively connects the ideas back to the HMW and the original \
         problem.\n{shape}",
        title = problem.title,
        context = problem.context,
        hmw = fields.hmw.as_deref().unwrap_or_default(),
        ideas = ideas,
        reflection = fields.reflection.as_deref().unwrap_or_default(),
        shape = JSON_SHAPE_INSTRUCTION,
    )
}

pub fn prototype(selected_idea: &str, poster: &str, upload_count: usize) -> String {
    let uploads_line = if upload_count > 0 {
        format!(
            "The user has also provided {upload_count} uploaded files (images/PDFs) \
             as part of their prototype.\n"
        )
    } else {
        String::new()
    };

    format!(
        "You are a Design Thinking expert. Analyze this Concept Poster (text provided) \
         and the attached wireframes/prototype visuals.\n\
         The selected idea is: \"{selected_idea}\"\n\
         The concept poster content is:\n{poster}\n\
         {uploads_line}\n\
         Now analyze these prototype visuals:\n\
         Give specific feedback for each visual, indicating whether it's a strength \
         (positive) or an area for improvement (negative).\n\
         For example:\n\
         \"visualFeedback\": [\n\
         {{ \"quote\": \"The mobile app flow is intuitive with clear navigation.\", \"sentiment\": \"positive\" }},\n\
         {{ \"quote\": \"The physical cart design needs clearer labeling on buttons.\", \"sentiment\": \"negative\" }}\n\
         ]\n\n\
         Score 0-100. Check the following criteria:\n\
         1. Does it clearly address the selected problem and HMW questions?\n\
         2. Is the solution feasible and creative?\n\
         3. Are visuals clear and relevant? Penalize if no uploads for software solutions.\n\n\
         Give honest, strict feedback - only award 90+ if the prototype is excellent and \
         clearly solves the problem.\n\n\
         Your response MUST be a JSON object with the following properties: 'score' \
         (number), 'strengths' (string), 'improvements' (string), 'suggestions' (array of \
         strings), 'overallComment' (string), 'addressesProblem' (boolean), and \
         'visualFeedback' (array of objects with 'quote' and 'sentiment' properties)."
    )
}

pub fn persona_feedback(
    persona_name: &str,
    persona_role: &str,
    poster_notes: &BTreeMap<String, Vec<String>>,
    timeline_notes: &BTreeMap<String, Vec<String>>,
    problem_title: &str,
) -> String {
    format!(
        "You are {persona_name}, a {persona_role} in SA. This prototype tries to solve \
         {problem_title}. Here are the notes:\n{poster}\n{timeline}\n\
         Reply in 4-7 simple B1 sentences: what you like, one worry, one idea.",
        poster = notes_block(poster_notes),
        timeline = notes_block(timeline_notes),
    )
}

fn notes_block(notes: &BTreeMap<String, Vec<String>>) -> String {
    notes
        .iter()
        .map(|(key, values)| format!("  {key}: {}", values.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

fn bullet_lines(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn theme_lines(themes: &[ThemeNote]) -> String {
    themes
        .iter()
        .map(|t| format!("- {}: {}", t.title, t.description))
        .collect::<Vec<_>>()
        .join("\n")
}

fn insight_lines(insights: &[InsightNote]) -> String {
    insights
        .iter()
        .map(|i| {
            format!(
                "Persona: {}, Activity: {}, Because: {}, But: {}",
                i.persona, i.activity, i.because, i.but
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ideate_falls_back_when_rationale_missing() {
        let problem = ProblemRef {
            title: "t".into(),
            context: "c".into(),
        };
        let fields = IdeateFields {
            hmw: Some("How might we light up evening study?".into()),
            selected_top3_ideas: Some(vec!["Solar lamp kits".into()]),
            rationale_map: Some(BTreeMap::new()),
            reflection: Some("r".into()),
            selected_problem: Some(problem.clone()),
        };
        let prompt = ideate(&fields, &problem);
        assert!(prompt.contains("No rationale provided."));
        assert!(prompt.contains("Solar lamp kits"));
    }

    #[test]
    fn prototype_mentions_uploads_only_when_present() {
        assert!(prototype("idea", "poster", 2).contains("2 uploaded files"));
        assert!(!prototype("idea", "poster", 0).contains("uploaded files"));
    }
}
