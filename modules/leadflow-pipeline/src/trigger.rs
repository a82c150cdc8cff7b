use std::sync::LazyLock;

use regex::Regex;

use crate::types::PipelineTrigger;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>|"']+"#).expect("valid regex"));

/// True for links to a single LinkedIn post.
pub fn is_post_url(url: &str) -> bool {
    url.contains("linkedin.com") && (url.contains("/posts/") || url.contains("/feed/update/"))
}

/// Find the first LinkedIn post link in free-form chat text.
///
/// Slack wraps links as `<https://...>` or `<https://...|label>`; the pattern
/// stops at `<`, `>` and `|` so both forms yield the bare URL.
pub fn parse_trigger(text: &str) -> Option<PipelineTrigger> {
    URL_RE
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ')', ';']))
        .find(|url| is_post_url(url))
        .map(|url| PipelineTrigger {
            post_url: url.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_post_url_in_plain_text() {
        let text = "please run https://www.linkedin.com/posts/foo-activity-123 thanks";
        let trigger = parse_trigger(text).unwrap();
        assert_eq!(trigger.post_url, "https://www.linkedin.com/posts/foo-activity-123");
    }

    #[test]
    fn unwraps_slack_link_markup() {
        let trigger = parse_trigger(
            "<https://www.linkedin.com/feed/update/urn:li:activity:7100/|LinkedIn post>",
        )
        .unwrap();
        assert_eq!(
            trigger.post_url,
            "https://www.linkedin.com/feed/update/urn:li:activity:7100/"
        );
    }

    #[test]
    fn skips_profiles_and_other_sites() {
        assert!(parse_trigger("see https://www.linkedin.com/in/someone").is_none());
        assert!(parse_trigger("see https://example.com/posts/123").is_none());
        assert!(parse_trigger("no links here").is_none());
    }

    #[test]
    fn picks_first_post_after_non_post_links() {
        let text =
            "profile https://www.linkedin.com/in/a and post https://linkedin.com/posts/b-activity-9.";
        assert_eq!(
            parse_trigger(text).unwrap().post_url,
            "https://linkedin.com/posts/b-activity-9"
        );
    }
}
