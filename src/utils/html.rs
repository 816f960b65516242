use ammonia;

/// Clean HTML content using the ammonia library.
///
/// This employs a whitelist-based sanitization strategy: it preserves safe tags
/// (like <b>, <p>) while stripping dangerous tags (like <script>, <iframe>)
/// and malicious attributes (like onclick).
///
/// Note:
/// 1. This will remove the <script> tag and its entire content.
/// 2. Leaderboard solutions are user-entered text re-served to every visitor
///    of the same problem, so they pass through here before being stored.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_tags() {
        let cleaned = clean_html("A solar lamp <script>alert('x')</script>library");
        assert!(!cleaned.contains("script"));
        assert!(cleaned.contains("A solar lamp"));
    }
}
