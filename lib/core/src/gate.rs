//! Query gatekeeper.
//!
//! Best-effort filtering of queries that look like prompt-injection or
//! attempts at unauthorized access. A case-insensitive substring match is
//! easy to evade and will also catch innocent words ("shack" contains
//! "hack"); it is a coarse first filter, not a security boundary.

/// Terms rejected when no deny-list is configured
pub const DEFAULT_DENY_TERMS: &[&str] = &[
    "jailbreak",
    "hack",
    "exploit",
    "bypass",
    "override",
    "system prompt",
    "ignore instructions",
    "root access",
    "admin",
    "malicious",
    "code injection",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    /// Rejected because the query contains `term`
    Reject { term: String },
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

#[derive(Debug, Clone)]
pub struct Gatekeeper {
    deny_terms: Vec<String>,
}

impl Default for Gatekeeper {
    fn default() -> Self {
        Self::new(DEFAULT_DENY_TERMS.iter().copied())
    }
}

impl Gatekeeper {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let deny_terms = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { deny_terms }
    }

    pub fn deny_terms(&self) -> &[String] {
        &self.deny_terms
    }

    pub fn check(&self, query: &str) -> Verdict {
        let normalized = query.to_lowercase();
        match self.deny_terms.iter().find(|term| normalized.contains(term.as_str())) {
            Some(term) => Verdict::Reject { term: term.clone() },
            None => Verdict::Pass,
        }
    }
}
