use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The classified purpose of a free-text question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentTag {
    Bugs,
    MyItems,
    Sprint,
    PullRequests,
    Builds,
    Critical,
    UserStories,
    Completed,
    All,
}

impl IntentTag {
    pub fn as_str(self) -> &'static str {
        match self {
            IntentTag::Bugs => "bugs",
            IntentTag::MyItems => "my_items",
            IntentTag::Sprint => "sprint",
            IntentTag::PullRequests => "pull_requests",
            IntentTag::Builds => "builds",
            IntentTag::Critical => "critical",
            IntentTag::UserStories => "user_stories",
            IntentTag::Completed => "completed",
            IntentTag::All => "all",
        }
    }

    /// Subject used in the "Failed to query ..." message.
    pub fn subject(self) -> &'static str {
        match self {
            IntentTag::Bugs => "bugs",
            IntentTag::MyItems => "your items",
            IntentTag::Sprint => "sprint status",
            IntentTag::PullRequests => "pull requests",
            IntentTag::Builds => "builds",
            IntentTag::Critical => "critical items",
            IntentTag::UserStories => "user stories",
            IntentTag::Completed => "completed items",
            IntentTag::All => "work items",
        }
    }
}

impl fmt::Display for IntentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword rules in priority order; the first rule with a matching keyword wins.
pub const KEYWORD_RULES: &[(&[&str], IntentTag)] = &[
    (&["bug"], IntentTag::Bugs),
    (&["assigned to me", "my items", "my work"], IntentTag::MyItems),
    (&["sprint"], IntentTag::Sprint),
    (&["pull request", " pr "], IntentTag::PullRequests),
    (&["build", "pipeline"], IntentTag::Builds),
    (&["critical", "high priority"], IntentTag::Critical),
    (&["user stor"], IntentTag::UserStories),
    (&["closed", "completed"], IntentTag::Completed),
];

/// Maps a question to exactly one intent. Never fails: unmatched text is `All`.
pub fn classify(text: &str) -> IntentTag {
    let lowered = text.to_lowercase();
    KEYWORD_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, tag)| *tag)
        .unwrap_or(IntentTag::All)
}

pub trait IntentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> IntentTag;
}

/// Deterministic classifier backed by [`KEYWORD_RULES`].
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

impl IntentClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> IntentTag {
        classify(text)
    }
}

/// An optional source of intent suggestions, e.g. a language model.
pub trait IntentEnricher: Send + Sync {
    fn is_available(&self) -> bool;

    /// Returns `None` when the enricher has no confident answer.
    fn suggest(&self, text: &str) -> Option<IntentTag>;
}

/// Consults an enricher first and falls back to the keyword rules whenever it
/// is unavailable or declines.
pub struct EnrichedClassifier {
    enricher: Arc<dyn IntentEnricher>,
    fallback: KeywordClassifier,
}

impl EnrichedClassifier {
    pub fn new(enricher: Arc<dyn IntentEnricher>) -> Self {
        Self {
            enricher,
            fallback: KeywordClassifier,
        }
    }

    pub fn enrichment_available(&self) -> bool {
        self.enricher.is_available()
    }
}

impl IntentClassifier for EnrichedClassifier {
    fn classify(&self, text: &str) -> IntentTag {
        if self.enricher.is_available()
            && let Some(tag) = self.enricher.suggest(text)
        {
            log::debug!("Enricher classified query as {}", tag);
            return tag;
        }
        self.fallback.classify(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_rule_has_its_tag() {
        let cases = [
            ("Show me all bugs", IntentTag::Bugs),
            ("what is assigned to me?", IntentTag::MyItems),
            ("list my items", IntentTag::MyItems),
            ("my work please", IntentTag::MyItems),
            ("Sprint status", IntentTag::Sprint),
            ("open pull requests", IntentTag::PullRequests),
            ("any pr to review", IntentTag::PullRequests),
            ("latest builds", IntentTag::Builds),
            ("is the pipeline green", IntentTag::Builds),
            ("critical items", IntentTag::Critical),
            ("high priority work", IntentTag::Critical),
            ("user stories in progress", IntentTag::UserStories),
            ("what got closed", IntentTag::Completed),
            ("completed this month", IntentTag::Completed),
        ];
        for (text, expected) in cases {
            assert_eq!(classify(text), expected, "query: {text}");
        }
    }

    #[test]
    fn priority_conflicts_resolve_to_earlier_rule() {
        // Every pair of keywords from different rules must resolve to the earlier rule.
        for (i, (earlier, expected)) in KEYWORD_RULES.iter().enumerate() {
            for (later, _) in &KEYWORD_RULES[i + 1..] {
                for a in *earlier {
                    for b in *later {
                        let forward = format!("x {a} y {b} z");
                        let backward = format!("x {b} y {a} z");
                        assert_eq!(classify(&forward), *expected, "query: {forward}");
                        assert_eq!(classify(&backward), *expected, "query: {backward}");
                    }
                }
            }
        }
    }

    #[test]
    fn bug_wins_over_everything() {
        assert_eq!(classify("bugs in the current sprint"), IntentTag::Bugs);
        assert_eq!(classify("critical BUG in pipeline"), IntentTag::Bugs);
        assert_eq!(classify("debugging builds"), IntentTag::Bugs);
    }

    #[test]
    fn unmatched_text_falls_back_to_all() {
        for text in ["", "hello", "what's going on?", "PRs", "prepare release"] {
            assert_eq!(classify(text), IntentTag::All, "query: {text}");
        }
    }

    #[test]
    fn pr_token_needs_surrounding_spaces() {
        assert_eq!(classify("show pr"), IntentTag::All);
        assert_eq!(classify("show pr now"), IntentTag::PullRequests);
    }

    #[test]
    fn tags_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&IntentTag::UserStories).unwrap(),
            "\"user_stories\""
        );
        assert_eq!(IntentTag::PullRequests.to_string(), "pull_requests");
    }

    struct FixedEnricher {
        available: bool,
        answer: Option<IntentTag>,
    }

    impl IntentEnricher for FixedEnricher {
        fn is_available(&self) -> bool {
            self.available
        }

        fn suggest(&self, _text: &str) -> Option<IntentTag> {
            self.answer
        }
    }

    #[test]
    fn enricher_answer_is_used_when_available() {
        let classifier = EnrichedClassifier::new(Arc::new(FixedEnricher {
            available: true,
            answer: Some(IntentTag::Sprint),
        }));
        assert!(classifier.enrichment_available());
        assert_eq!(classifier.classify("hello"), IntentTag::Sprint);
    }

    #[test]
    fn unavailable_or_silent_enricher_falls_back_to_keywords() {
        let offline = EnrichedClassifier::new(Arc::new(FixedEnricher {
            available: false,
            answer: Some(IntentTag::Sprint),
        }));
        assert_eq!(offline.classify("open bugs"), IntentTag::Bugs);

        let silent = EnrichedClassifier::new(Arc::new(FixedEnricher {
            available: true,
            answer: None,
        }));
        assert_eq!(silent.classify("open bugs"), IntentTag::Bugs);
    }
}
