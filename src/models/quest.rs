// src/models/quest.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog;
use crate::config::DEFAULT_AVATAR_URL;

/// A finished quest as held in the in-memory leaderboard list. Not durable:
/// the list lives for the server process only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedQuest {
    pub user_id: String,
    pub problem_id: String,
    pub total_score: f64,
    pub solution: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// DTO for posting a finished quest.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteQuestRequest {
    pub user_id: Option<String>,
    /// Clients send numbers or strings here; both are accepted and compared
    /// by their string form.
    pub problem_id: Option<Value>,
    pub total_score: Option<f64>,
    pub solution: Option<String>,
}

/// One row of the leaderboard response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub username: String,
    pub avatar: String,
    pub problem_title: String,
    pub solution: String,
    pub total_score: f64,
    pub rank: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardParams {
    pub problem_id: Option<String>,
}

/// Normalize a wire problem id (number or string) to its string form.
pub fn problem_id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Build the leaderboard for one problem: filter, sort descending by total
/// score, then assign 1-based ranks.
pub fn rank_entries(quests: &[CompletedQuest], problem_id: &str) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = quests
        .iter()
        .filter(|q| q.problem_id == problem_id)
        .map(|q| LeaderboardEntry {
            user_id: q.user_id.clone(),
            // No account lookup here; the user id doubles as display name.
            username: q.user_id.clone(),
            avatar: DEFAULT_AVATAR_URL.to_string(),
            problem_title: q
                .problem_id
                .parse::<i64>()
                .ok()
                .and_then(catalog::problem_title)
                .unwrap_or_else(|| format!("Problem {}", q.problem_id)),
            solution: q.solution.clone(),
            total_score: q.total_score,
            rank: 0,
        })
        .collect();

    entries.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index + 1;
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quest(user: &str, problem: &str, score: f64) -> CompletedQuest {
        CompletedQuest {
            user_id: user.to_string(),
            problem_id: problem.to_string(),
            total_score: score,
            solution: format!("{user}'s solution"),
            timestamp: chrono::Utc::now(),
        }
    }

    #[test]
    fn ranks_descending_by_total_score() {
        let quests = vec![
            quest("amahle", "7", 310.0),
            quest("bongani", "7", 455.0),
            quest("thandi", "7", 455.5),
        ];

        let entries = rank_entries(&quests, "7");
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].user_id, "thandi");
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[1].user_id, "bongani");
        assert_eq!(entries[1].rank, 2);
        assert_eq!(entries[2].user_id, "amahle");
        assert_eq!(entries[2].rank, 3);
    }

    #[test]
    fn filters_by_problem_id() {
        let quests = vec![quest("amahle", "7", 310.0), quest("bongani", "8", 455.0)];
        let entries = rank_entries(&quests, "8");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user_id, "bongani");
    }

    #[test]
    fn known_problem_ids_resolve_titles() {
        let quests = vec![quest("amahle", "1", 310.0), quest("bongani", "999", 200.0)];
        let entries = rank_entries(&quests, "1");
        assert_ne!(entries[0].problem_title, "Problem 1");

        let entries = rank_entries(&quests, "999");
        assert_eq!(entries[0].problem_title, "Problem 999");
    }

    #[test]
    fn normalizes_numeric_and_string_ids() {
        assert_eq!(problem_id_string(&serde_json::json!(7)), Some("7".into()));
        assert_eq!(problem_id_string(&serde_json::json!("7")), Some("7".into()));
        assert_eq!(problem_id_string(&serde_json::json!([7])), None);
    }
}
