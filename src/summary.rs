//! Commit summary
//!
//! Volume, cadence and AI-adoption aggregates over a classified commit set.

use crate::classifier::categorize;
use crate::temporal::{distinct_dates, streaks};
use crate::types::{
    AiBreakdown, ClassifiedCommit, CommitDistribution, CommitSummary, RepoActivity, RepoBreakdown,
};
use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use std::collections::BTreeMap;

impl CommitSummary {
    /// Summarize a classified commit set (any order)
    pub fn from_commits(commits: &[ClassifiedCommit]) -> Self {
        if commits.is_empty() {
            return Self::default();
        }

        let total_commits = commits.len() as u32;
        let total_additions: u64 = commits.iter().map(|c| c.record.additions).sum();
        let total_deletions: u64 = commits.iter().map(|c| c.record.deletions).sum();
        let files_touched: u64 = commits.iter().map(|c| c.record.files as u64).sum();

        let timestamps: Vec<DateTime<FixedOffset>> =
            commits.iter().map(|c| c.record.timestamp).collect();
        let dates = distinct_dates(&timestamps);
        let coding_days = dates.len() as u32;
        let longest_streak = streaks(&dates).longest_streak;

        let ai_breakdown = ai_breakdown(commits);
        let ai_commits = ai_breakdown.total;
        let primary_ai_agent = ai_breakdown.by_agent.first().map(|a| a.agent);

        Self {
            total_commits,
            total_additions,
            total_deletions,
            net_lines: total_additions as i64 - total_deletions as i64,
            files_touched,
            coding_days,
            longest_streak,
            commits_per_day: total_commits as f64 / coding_days.max(1) as f64,
            ai_commits,
            ai_ratio: ai_commits as f64 / total_commits as f64,
            primary_ai_agent,
            ai_breakdown,
            repos: repo_breakdown(commits),
            distribution: commit_distribution(commits),
        }
    }
}

/// AI-assisted commits per agent and per local calendar month
pub fn ai_breakdown(commits: &[ClassifiedCommit]) -> AiBreakdown {
    let tally = categorize(commits);

    let mut by_month: BTreeMap<String, u32> = BTreeMap::new();
    for commit in commits.iter().filter(|c| c.classification.is_ai_assisted) {
        let month = commit.record.timestamp.format("%Y-%m").to_string();
        *by_month.entry(month).or_insert(0) += 1;
    }

    AiBreakdown {
        total: tally.by_agent.iter().map(|a| a.count).sum(),
        by_agent: tally.by_agent,
        by_month,
    }
}

/// Per-repository commits, net lines and AI ratio, most commits first.
///
/// Ties keep first-seen order. Commits without a repository are only counted
/// in `unattributed_commits`.
pub fn repo_breakdown(commits: &[ClassifiedCommit]) -> RepoBreakdown {
    let mut by_repo: Vec<RepoActivity> = Vec::new();
    let mut unattributed_commits = 0;

    for commit in commits {
        let Some(repo) = commit.record.repo.as_deref() else {
            unattributed_commits += 1;
            continue;
        };

        let index = match by_repo.iter().position(|r| r.repo == repo) {
            Some(index) => index,
            None => {
                by_repo.push(RepoActivity {
                    repo: repo.to_string(),
                    commits: 0,
                    net_lines: 0,
                    ai_commits: 0,
                    ai_ratio: 0.0,
                });
                by_repo.len() - 1
            }
        };

        let entry = &mut by_repo[index];
        entry.commits += 1;
        entry.net_lines += commit.record.additions as i64 - commit.record.deletions as i64;
        if commit.classification.is_ai_assisted {
            entry.ai_commits += 1;
        }
    }

    for entry in &mut by_repo {
        entry.ai_ratio = entry.ai_commits as f64 / entry.commits.max(1) as f64;
    }
    by_repo.sort_by(|a, b| b.commits.cmp(&a.commits));

    RepoBreakdown {
        repos_active: by_repo.len() as u32,
        most_active_repo: by_repo.first().map(|r| r.repo.clone()),
        by_repo,
        unattributed_commits,
    }
}

/// Commit counts by date, ISO week, month, weekday and hour in local time
pub fn commit_distribution(commits: &[ClassifiedCommit]) -> CommitDistribution {
    let mut distribution = CommitDistribution::default();

    for commit in commits {
        let ts = commit.record.timestamp;
        *distribution
            .by_date
            .entry(ts.format("%Y-%m-%d").to_string())
            .or_insert(0) += 1;
        *distribution
            .by_week
            .entry(ts.format("%G-W%V").to_string())
            .or_insert(0) += 1;
        *distribution
            .by_month
            .entry(ts.format("%Y-%m").to_string())
            .or_insert(0) += 1;
        distribution.by_weekday[ts.weekday().num_days_from_monday() as usize] += 1;
        distribution.by_hour[ts.hour() as usize] += 1;
    }

    distribution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Agent, AgentCount, ClassificationResult, CommitRecord, Confidence};
    use pretty_assertions::assert_eq;

    fn classified(
        sha: &str,
        timestamp: &str,
        additions: u64,
        deletions: u64,
        agent: Option<Agent>,
    ) -> ClassifiedCommit {
        ClassifiedCommit {
            record: CommitRecord {
                sha: sha.to_string(),
                timestamp: DateTime::parse_from_rfc3339(timestamp).unwrap(),
                message: "change".to_string(),
                author_name: "Dev".to_string(),
                author_email: "dev@example.com".to_string(),
                additions,
                deletions,
                files: 2,
                repo: None,
            },
            classification: match agent {
                Some(agent) => ClassificationResult::assisted(agent, Confidence::High),
                None => ClassificationResult::solo(),
            },
        }
    }

    fn in_repo(repo: &str, mut commit: ClassifiedCommit) -> ClassifiedCommit {
        commit.record.repo = Some(repo.to_string());
        commit
    }

    fn sample() -> Vec<ClassifiedCommit> {
        vec![
            classified("a", "2025-01-30T10:00:00Z", 100, 10, Some(Agent::Copilot)),
            classified("b", "2025-01-31T11:00:00Z", 50, 80, Some(Agent::Claude)),
            classified("c", "2025-01-31T15:00:00Z", 5, 0, None),
            classified("d", "2025-02-01T09:00:00Z", 20, 5, Some(Agent::Claude)),
            classified("e", "2025-02-05T09:00:00Z", 1, 1, None),
        ]
    }

    #[test]
    fn test_empty_summary() {
        let summary = CommitSummary::from_commits(&[]);
        assert_eq!(summary, CommitSummary::default());
        assert_eq!(summary.primary_ai_agent, None);
        assert_eq!(summary.ai_ratio, 0.0);
    }

    #[test]
    fn test_volume_and_cadence() {
        let summary = CommitSummary::from_commits(&sample());

        assert_eq!(summary.total_commits, 5);
        assert_eq!(summary.total_additions, 176);
        assert_eq!(summary.total_deletions, 96);
        assert_eq!(summary.net_lines, 80);
        assert_eq!(summary.files_touched, 10);
        assert_eq!(summary.coding_days, 4);
        assert_eq!(summary.longest_streak, 3);
        assert!((summary.commits_per_day - 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_ai_adoption() {
        let summary = CommitSummary::from_commits(&sample());

        assert_eq!(summary.ai_commits, 3);
        assert!((summary.ai_ratio - 0.6).abs() < 1e-9);
        assert_eq!(summary.primary_ai_agent, Some(Agent::Claude));
        assert_eq!(
            summary.ai_breakdown.by_agent,
            vec![
                AgentCount {
                    agent: Agent::Claude,
                    count: 2
                },
                AgentCount {
                    agent: Agent::Copilot,
                    count: 1
                },
            ]
        );

        let months: Vec<(&str, u32)> = summary
            .ai_breakdown
            .by_month
            .iter()
            .map(|(m, c)| (m.as_str(), *c))
            .collect();
        assert_eq!(months, vec![("2025-01", 2), ("2025-02", 1)]);
    }

    #[test]
    fn test_primary_agent_tie_keeps_first_seen() {
        let commits = vec![
            classified("a", "2025-01-01T10:00:00Z", 0, 0, Some(Agent::Aider)),
            classified("b", "2025-01-02T10:00:00Z", 0, 0, Some(Agent::Cursor)),
        ];
        let summary = CommitSummary::from_commits(&commits);
        assert_eq!(summary.primary_ai_agent, Some(Agent::Aider));
    }

    #[test]
    fn test_month_uses_local_offset() {
        // 23:30 at -05:00 is already February in UTC
        let commits = vec![classified(
            "a",
            "2025-01-31T23:30:00-05:00",
            0,
            0,
            Some(Agent::Codex),
        )];
        let breakdown = ai_breakdown(&commits);
        assert_eq!(breakdown.by_month.get("2025-01"), Some(&1));
    }

    #[test]
    fn test_all_solo() {
        let commits = vec![classified("a", "2025-01-01T10:00:00Z", 3, 7, None)];
        let summary = CommitSummary::from_commits(&commits);

        assert_eq!(summary.ai_commits, 0);
        assert_eq!(summary.primary_ai_agent, None);
        assert_eq!(summary.net_lines, -4);
        assert!(summary.ai_breakdown.by_month.is_empty());
    }

    #[test]
    fn test_repo_breakdown_ranks_by_commits() {
        let commits = vec![
            in_repo(
                "acme/web",
                classified("a", "2025-01-01T10:00:00Z", 10, 2, None),
            ),
            in_repo(
                "acme/api",
                classified("b", "2025-01-01T11:00:00Z", 40, 0, Some(Agent::Claude)),
            ),
            in_repo(
                "acme/api",
                classified("c", "2025-01-02T11:00:00Z", 5, 25, None),
            ),
            classified("d", "2025-01-02T12:00:00Z", 1, 0, None),
            in_repo(
                "acme/api",
                classified("e", "2025-01-03T11:00:00Z", 0, 0, Some(Agent::Aider)),
            ),
        ];

        let repos = repo_breakdown(&commits);
        assert_eq!(repos.repos_active, 2);
        assert_eq!(repos.most_active_repo.as_deref(), Some("acme/api"));
        assert_eq!(repos.unattributed_commits, 1);
        assert_eq!(
            repos.by_repo,
            vec![
                RepoActivity {
                    repo: "acme/api".to_string(),
                    commits: 3,
                    net_lines: 20,
                    ai_commits: 2,
                    ai_ratio: 2.0 / 3.0,
                },
                RepoActivity {
                    repo: "acme/web".to_string(),
                    commits: 1,
                    net_lines: 8,
                    ai_commits: 0,
                    ai_ratio: 0.0,
                },
            ]
        );
    }

    #[test]
    fn test_repo_breakdown_without_repos() {
        let repos = repo_breakdown(&sample());
        assert_eq!(repos.repos_active, 0);
        assert_eq!(repos.most_active_repo, None);
        assert!(repos.by_repo.is_empty());
        assert_eq!(repos.unattributed_commits, 5);
    }

    #[test]
    fn test_commit_distribution() {
        let distribution = commit_distribution(&sample());

        let dates: Vec<(&str, u32)> = distribution
            .by_date
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(
            dates,
            vec![
                ("2025-01-30", 1),
                ("2025-01-31", 2),
                ("2025-02-01", 1),
                ("2025-02-05", 1),
            ]
        );

        // Thu 30 Jan .. Sat 1 Feb fall in ISO week 5, Wed 5 Feb in week 6
        assert_eq!(distribution.by_week.get("2025-W05"), Some(&4));
        assert_eq!(distribution.by_week.get("2025-W06"), Some(&1));
        assert_eq!(distribution.by_month.get("2025-01"), Some(&3));
        assert_eq!(distribution.by_month.get("2025-02"), Some(&2));

        assert_eq!(distribution.by_weekday, [0, 0, 1, 1, 2, 1, 0]);
        assert_eq!(distribution.by_hour[9], 2);
        assert_eq!(distribution.by_hour[10], 1);
        assert_eq!(distribution.by_hour.iter().sum::<u32>(), 5);
    }

    #[test]
    fn test_iso_week_crosses_year() {
        // Monday 2024-12-30 belongs to ISO week 1 of 2025
        let commits = vec![classified("a", "2024-12-30T10:00:00Z", 0, 0, None)];
        let distribution = commit_distribution(&commits);
        assert_eq!(distribution.by_week.get("2025-W01"), Some(&1));
        assert_eq!(distribution.by_month.get("2024-12"), Some(&1));
    }

    #[test]
    fn test_summary_carries_breakdowns() {
        let commits = vec![in_repo(
            "acme/api",
            classified("a", "2025-01-01T10:00:00Z", 3, 1, Some(Agent::Copilot)),
        )];
        let summary = CommitSummary::from_commits(&commits);

        assert_eq!(summary.repos.most_active_repo.as_deref(), Some("acme/api"));
        assert_eq!(summary.distribution.by_hour[10], 1);
        assert_eq!(summary.distribution.by_weekday[2], 1);
    }
}
