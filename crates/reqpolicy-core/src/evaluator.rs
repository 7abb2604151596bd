//! Permit-overrides evaluation over a compiled [`RuleSet`].
//!
//! Order of evaluation:
//! 1. whitelist, first match allows
//! 2. blacklist, first match denies
//! 3. nothing matched, allow

use crate::error::Result;
use crate::rule::{Rule, RuleList, RuleSet, RulesConfig};

/// Outcome for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allow(self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Deny => "deny",
        }
    }
}

/// Position of the rule that decided a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedRule {
    pub list: RuleList,
    pub index: usize,
}

/// Decision plus the rule that produced it (`None` => fail-open default).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub decision: Decision,
    pub matched: Option<MatchedRule>,
}

/// Immutable request evaluator.
/// Construct once at startup, then share via Arc.
#[derive(Debug, Clone)]
pub struct PolicyEvaluator {
    rules: RuleSet,
}

impl PolicyEvaluator {
    /// Compile both rule lists. Fails as a whole on the first invalid pattern.
    pub fn build(cfg: &RulesConfig) -> Result<Self> {
        let rules = RuleSet::compile(cfg)?;
        tracing::debug!(
            whitelist = rules.whitelist().len(),
            blacklist = rules.blacklist().len(),
            "request policy compiled"
        );
        Ok(Self { rules })
    }

    pub fn from_rule_set(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn decide(&self, path: &str, raw_query: &str) -> Decision {
        self.evaluate(path, raw_query).decision
    }

    pub fn evaluate(&self, path: &str, raw_query: &str) -> Evaluation {
        if let Some(index) = first_match(self.rules.whitelist(), path, raw_query) {
            return Evaluation {
                decision: Decision::Allow,
                matched: Some(MatchedRule {
                    list: RuleList::Whitelist,
                    index,
                }),
            };
        }

        if let Some(index) = first_match(self.rules.blacklist(), path, raw_query) {
            return Evaluation {
                decision: Decision::Deny,
                matched: Some(MatchedRule {
                    list: RuleList::Blacklist,
                    index,
                }),
            };
        }

        Evaluation {
            decision: Decision::Allow,
            matched: None,
        }
    }
}

fn first_match(rules: &[Rule], path: &str, raw_query: &str) -> Option<usize> {
    rules.iter().position(|r| r.matches(path, raw_query))
}
