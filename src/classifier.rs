//! Commit classifier
//!
//! Attributes commits to AI coding assistants using the ordered pattern registry.
//! Email and co-author trailer hits are high confidence, keyword hits are medium,
//! and a fuzzy substring hint with no registered agent is low.

use crate::patterns::{PatternRegistry, FUZZY_AI_KEYWORDS};
use crate::types::{
    Agent, AgentCount, AgentTally, ClassificationResult, ClassifiedCommit, CommitRecord,
    Confidence,
};
use chrono::{DateTime, FixedOffset};

/// Classify a commit against the built-in registry.
///
/// The timestamp is accepted for interface stability; no current rule is time-dependent.
pub fn classify(
    message: &str,
    author_name: &str,
    author_email: &str,
    timestamp: DateTime<FixedOffset>,
) -> ClassificationResult {
    classify_with(
        PatternRegistry::builtin(),
        message,
        author_name,
        author_email,
        timestamp,
    )
}

/// Classify a commit against a specific registry
pub fn classify_with(
    registry: &PatternRegistry,
    message: &str,
    author_name: &str,
    author_email: &str,
    _timestamp: DateTime<FixedOffset>,
) -> ClassificationResult {
    for rule in registry.rules() {
        if rule.matches_email(author_email) {
            return ClassificationResult::assisted(rule.agent(), Confidence::High);
        }
        if rule.matches_co_author(message) {
            return ClassificationResult::assisted(rule.agent(), Confidence::High);
        }
        if rule.matches_keyword(message) {
            return ClassificationResult::assisted(rule.agent(), Confidence::Medium);
        }
    }

    let full_text = format!("{message} {author_name} {author_email}").to_lowercase();
    if FUZZY_AI_KEYWORDS.iter().any(|kw| full_text.contains(kw)) {
        return ClassificationResult::assisted(Agent::Unknown, Confidence::Low);
    }

    ClassificationResult::solo()
}

/// Classify a full commit record
pub fn classify_commit(registry: &PatternRegistry, commit: &CommitRecord) -> ClassificationResult {
    classify_with(
        registry,
        &commit.message,
        &commit.author_name,
        &commit.author_email,
        commit.timestamp,
    )
}

/// Classify every record, keeping input order
pub fn classify_all(registry: &PatternRegistry, commits: &[CommitRecord]) -> Vec<ClassifiedCommit> {
    commits
        .iter()
        .map(|record| ClassifiedCommit {
            classification: classify_commit(registry, record),
            record: record.clone(),
        })
        .collect()
}

/// Count classified commits per agent.
///
/// Agents are ordered by count descending; equal counts keep first-seen order.
pub fn categorize(commits: &[ClassifiedCommit]) -> AgentTally {
    let mut tally = AgentTally::default();
    let mut by_agent: Vec<AgentCount> = Vec::new();

    for commit in commits {
        let classification = &commit.classification;
        if !classification.is_ai_assisted {
            tally.solo += 1;
            continue;
        }

        let agent = classification.agent.unwrap_or(Agent::Unknown);
        match by_agent.iter_mut().find(|c| c.agent == agent) {
            Some(entry) => entry.count += 1,
            None => by_agent.push(AgentCount { agent, count: 1 }),
        }
    }

    // sort_by is stable, so ties stay in first-seen order
    by_agent.sort_by(|a, b| b.count.cmp(&a.count));
    tally.by_agent = by_agent;
    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::AgentRuleSpec;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn ts() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 4, 10, 0, 0)
            .unwrap()
    }

    fn record(sha: &str, message: &str, email: &str) -> CommitRecord {
        CommitRecord {
            sha: sha.to_string(),
            timestamp: ts(),
            message: message.to_string(),
            author_name: "Dev".to_string(),
            author_email: email.to_string(),
            additions: 0,
            deletions: 0,
            files: 0,
            repo: None,
        }
    }

    #[test]
    fn test_claude_co_author_trailer() {
        let message = "Add parser\n\nCo-Authored-By: Claude <noreply@anthropic.com>";
        let result = classify(message, "Dev", "dev@example.com", ts());
        assert_eq!(
            result,
            ClassificationResult::assisted(Agent::Claude, Confidence::High)
        );
    }

    #[test]
    fn test_copilot_email() {
        let result = classify("Refactor module", "Copilot", "copilot@github.com", ts());
        assert_eq!(
            result,
            ClassificationResult::assisted(Agent::Copilot, Confidence::High)
        );
    }

    #[test]
    fn test_fuzzy_hint_is_low_confidence() {
        let result = classify("this was llm generated", "Dev", "dev@example.com", ts());
        assert_eq!(
            result,
            ClassificationResult::assisted(Agent::Unknown, Confidence::Low)
        );
    }

    #[test]
    fn test_ordinary_commit_is_solo() {
        let result = classify("Fix off-by-one in pager", "Dev", "dev@example.com", ts());
        assert!(!result.is_ai_assisted);
        assert_eq!(result.agent, None);
    }

    #[test]
    fn test_keyword_is_medium_confidence() {
        let result = classify("Generated with Cursor", "Dev", "dev@example.com", ts());
        assert_eq!(
            result,
            ClassificationResult::assisted(Agent::Cursor, Confidence::Medium)
        );

        let result = classify("feat: AI-generated fixtures", "Dev", "dev@example.com", ts());
        assert_eq!(
            result,
            ClassificationResult::assisted(Agent::Jetbrains, Confidence::Medium)
        );
    }

    #[test]
    fn test_earlier_agent_wins_keyword_tie() {
        // Both claude and copilot keywords appear; claude is registered first
        let message = "Generated with Copilot and Generated with Claude";
        let result = classify(message, "Dev", "dev@example.com", ts());
        assert_eq!(result.agent, Some(Agent::Claude));
        assert_eq!(result.confidence, Confidence::Medium);
    }

    #[test]
    fn test_earlier_agent_keyword_beats_later_email() {
        // Claude's keyword is checked before copilot's email rule
        let result = classify("Generated with Claude", "Bot", "copilot@github.com", ts());
        assert_eq!(
            result,
            ClassificationResult::assisted(Agent::Claude, Confidence::Medium)
        );
    }

    #[test]
    fn test_fuzzy_scan_includes_author_fields() {
        let result = classify("Update docs", "gpt-bot", "bot@example.com", ts());
        assert_eq!(result.agent, Some(Agent::Unknown));
    }

    #[test]
    fn test_empty_and_odd_inputs_never_panic() {
        assert!(!classify("", "", "", ts()).is_ai_assisted);
        let odd = "\u{0}\u{7}\t\r\n ünïcödé 🤖 \u{202e}";
        let result = classify(odd, odd, odd, ts());
        assert!(!result.is_ai_assisted);
    }

    #[test]
    fn test_deterministic() {
        let message = "Co-Authored-By: Aider <aider@example.com>";
        let first = classify(message, "Dev", "dev@example.com", ts());
        for _ in 0..10 {
            assert_eq!(classify(message, "Dev", "dev@example.com", ts()), first);
        }
    }

    #[test]
    fn test_custom_registry() {
        let registry = PatternRegistry::from_specs(&[AgentRuleSpec {
            agent: Agent::Codex,
            emails: vec![],
            co_authored: vec![],
            keywords: vec![r"\[codex\]".to_string()],
        }])
        .unwrap();

        let hit = classify_with(&registry, "[CODEX] bump deps", "Dev", "dev@example.com", ts());
        assert_eq!(hit, ClassificationResult::assisted(Agent::Codex, Confidence::Medium));

        // The built-in claude rules are not part of this registry
        let miss = classify_with(&registry, "Generated with Claude", "Dev", "d@e.com", ts());
        assert!(!miss.is_ai_assisted);
    }

    #[test]
    fn test_categorize() {
        let registry = PatternRegistry::builtin();
        let commits = classify_all(
            registry,
            &[
                record("a", "Generated with Cline", "dev@example.com"),
                record("b", "plain change", "dev@example.com"),
                record("c", "Generated with Aider", "dev@example.com"),
                record("d", "Co-Authored-By: Aider", "dev@example.com"),
                record("e", "Generated with Cline", "dev@example.com"),
                record("f", "gpt suggestion", "dev@example.com"),
            ],
        );

        let tally = categorize(&commits);
        assert_eq!(tally.solo, 1);
        assert_eq!(
            tally.by_agent,
            vec![
                AgentCount { agent: Agent::Cline, count: 2 },
                AgentCount { agent: Agent::Aider, count: 2 },
                AgentCount { agent: Agent::Unknown, count: 1 },
            ]
        );
    }
}
