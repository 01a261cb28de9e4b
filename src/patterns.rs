//! Agent pattern registry
//!
//! An ordered table of per-agent rules. Evaluation order is load-bearing: when
//! several agents could match the same commit, the earlier agent wins.

use crate::error::ComputeError;
use crate::types::Agent;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Substrings that hint at AI assistance without naming an agent
pub const FUZZY_AI_KEYWORDS: &[&str] = &["ai-assisted", "ai generated", "llm", "gpt"];

struct BuiltinRule {
    agent: Agent,
    emails: &'static [&'static str],
    co_authored: &'static [&'static str],
    keywords: &'static [&'static str],
}

const BUILTIN_RULES: &[BuiltinRule] = &[
    BuiltinRule {
        agent: Agent::Claude,
        emails: &[
            r"claude@anthropic\.com",
            r"noreply@anthropic\.com",
            r"ai@anthropic\.com",
        ],
        co_authored: &[
            r"Co-Authored-By:\s*Claude\s*<[^>]*anthropic\.com>",
            r"Co-Authored-By:\s*Claude\s*<[^>]*>",
        ],
        keywords: &[
            r"Generated with (Claude Code|Claude)",
            r"🤖 Generated with",
            r"Co-Authored-By:\s*Claude",
        ],
    },
    BuiltinRule {
        agent: Agent::Copilot,
        emails: &[r"copilot@github\.com", r"ai@github\.com"],
        co_authored: &[
            r"Co-Authored-By:\s*GitHub Copilot",
            r"Co-Authored-By:\s*Copilot",
        ],
        keywords: &[r"Generated with Copilot", r"Azure OpenAI"],
    },
    BuiltinRule {
        agent: Agent::Codex,
        emails: &[r"codex@openai\.com", r"codex@github\.com"],
        co_authored: &[r"Co-Authored-By:\s*Codex"],
        keywords: &[r"Generated with Codex"],
    },
    BuiltinRule {
        agent: Agent::Cursor,
        emails: &[],
        co_authored: &[r"Co-Authored-By:\s*Cursor"],
        keywords: &[r"Generated with Cursor"],
    },
    BuiltinRule {
        agent: Agent::Aider,
        emails: &[],
        co_authored: &[r"Co-Authored-By:\s*Aider"],
        keywords: &[r"Generated with Aider"],
    },
    BuiltinRule {
        agent: Agent::Cline,
        emails: &[],
        co_authored: &[r"Co-Authored-By:\s*Cline"],
        keywords: &[r"Generated with Cline"],
    },
    BuiltinRule {
        agent: Agent::Jetbrains,
        emails: &[r"ai@jetbrains\.com"],
        co_authored: &[],
        keywords: &[r"AI-generated"],
    },
];

static BUILTIN_REGISTRY: LazyLock<PatternRegistry> = LazyLock::new(PatternRegistry::compile_builtin);

/// Uncompiled rule definition, as loaded from configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRuleSpec {
    pub agent: Agent,
    /// Patterns matched against the author email
    #[serde(default)]
    pub emails: Vec<String>,
    /// Co-authorship trailer patterns matched against the message
    #[serde(default)]
    pub co_authored: Vec<String>,
    /// Keyword patterns matched against the message
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Compiled, case-insensitive rules for one agent
#[derive(Debug, Clone)]
pub struct AgentRule {
    agent: Agent,
    emails: Vec<Regex>,
    co_authored: Vec<Regex>,
    keywords: Vec<Regex>,
}

impl AgentRule {
    pub fn agent(&self) -> Agent {
        self.agent
    }

    pub fn emails(&self) -> &[Regex] {
        &self.emails
    }

    pub fn co_authored(&self) -> &[Regex] {
        &self.co_authored
    }

    pub fn keywords(&self) -> &[Regex] {
        &self.keywords
    }

    /// True if any email rule matches the author email
    pub fn matches_email(&self, author_email: &str) -> bool {
        self.emails.iter().any(|re| re.is_match(author_email))
    }

    /// True if any co-authorship trailer rule matches the message
    pub fn matches_co_author(&self, message: &str) -> bool {
        self.co_authored.iter().any(|re| re.is_match(message))
    }

    /// True if any keyword rule matches the message
    pub fn matches_keyword(&self, message: &str) -> bool {
        self.keywords.iter().any(|re| re.is_match(message))
    }

    /// Back to the uncompiled form
    pub fn to_spec(&self) -> AgentRuleSpec {
        let sources = |patterns: &[Regex]| -> Vec<String> {
            patterns.iter().map(|re| re.as_str().to_string()).collect()
        };
        AgentRuleSpec {
            agent: self.agent,
            emails: sources(&self.emails),
            co_authored: sources(&self.co_authored),
            keywords: sources(&self.keywords),
        }
    }
}

/// Ordered, read-only sequence of agent rules
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    rules: Vec<AgentRule>,
}

impl PatternRegistry {
    /// The built-in registry, compiled on first use
    pub fn builtin() -> &'static PatternRegistry {
        &BUILTIN_REGISTRY
    }

    /// Build a registry from rule specs, preserving their order.
    ///
    /// Fails on the first pattern that does not compile.
    pub fn from_specs(specs: &[AgentRuleSpec]) -> Result<Self, ComputeError> {
        let mut rules = Vec::with_capacity(specs.len());
        for spec in specs {
            let compile_all = |patterns: &[String]| -> Result<Vec<Regex>, ComputeError> {
                patterns
                    .iter()
                    .map(|p| {
                        compile(p).map_err(|e| ComputeError::InvalidPattern {
                            agent: spec.agent.to_string(),
                            message: e.to_string(),
                        })
                    })
                    .collect()
            };

            rules.push(AgentRule {
                agent: spec.agent,
                emails: compile_all(&spec.emails)?,
                co_authored: compile_all(&spec.co_authored)?,
                keywords: compile_all(&spec.keywords)?,
            });
        }
        Ok(Self { rules })
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[AgentRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Uncompiled form of every rule, in evaluation order
    pub fn to_specs(&self) -> Vec<AgentRuleSpec> {
        self.rules.iter().map(AgentRule::to_spec).collect()
    }

    fn compile_builtin() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|rule| AgentRule {
                agent: rule.agent,
                emails: compile_lenient(rule.agent, rule.emails),
                co_authored: compile_lenient(rule.agent, rule.co_authored),
                keywords: compile_lenient(rule.agent, rule.keywords),
            })
            .collect();
        Self { rules }
    }
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Built-in patterns that fail to compile are dropped rather than aborting startup
fn compile_lenient(agent: Agent, patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|p| match compile(p) {
            Ok(re) => Some(re),
            Err(e) => {
                log::warn!("Skipping built-in {} pattern {:?}: {}", agent, p, e);
                None
            }
        })
        .collect()
}
