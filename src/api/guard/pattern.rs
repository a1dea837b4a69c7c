//! Protected path patterns.
//!
//! A rule is either an exact path (`/dashboard`) or a prefix with a trailing
//! wildcard (`/dashboard/*`). Wildcards are only allowed as the final
//! segment; anything else fails at parse time so a bad configuration aborts
//! startup instead of misrouting requests.
//!
//! Matching is case-sensitive and segment-aware: `/dashboard/*` covers
//! `/dashboard` and `/dashboard/a/b`, but never `/dashboard2/x`.

use anyhow::{Result, bail};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Exact(String),
    /// Prefix rule from a trailing `/*`; the stored value has no wildcard.
    Prefix(String),
}

impl PathPattern {
    /// Parse a single pattern.
    ///
    /// # Errors
    /// Returns an error for empty patterns, patterns not starting with `/`,
    /// or wildcards anywhere but a trailing `/*`.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();

        if raw.is_empty() {
            bail!("empty path pattern");
        }

        if !raw.starts_with('/') {
            bail!("path pattern must start with '/': {raw}");
        }

        if let Some(prefix) = raw.strip_suffix("/*") {
            if prefix.contains('*') {
                bail!("wildcard is only allowed as a trailing '/*': {raw}");
            }
            return Ok(Self::Prefix(prefix.to_string()));
        }

        if raw.contains('*') {
            bail!("wildcard is only allowed as a trailing '/*': {raw}");
        }

        Ok(Self::Exact(raw.to_string()))
    }

    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(rule) => path == rule,
            Self::Prefix(prefix) => {
                path == prefix
                    || path
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(rule) => write!(f, "{rule}"),
            Self::Prefix(prefix) => write!(f, "{prefix}/*"),
        }
    }
}

/// Ordered list of protected path rules. Immutable after startup; a request
/// is subject to the guard iff it matches at least one rule.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    rules: Vec<PathPattern>,
}

impl PatternSet {
    /// Parse every pattern; the first malformed one fails the whole set.
    ///
    /// # Errors
    /// Returns the parse error of the first invalid pattern.
    pub fn parse<I, S>(raw: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = raw
            .into_iter()
            .map(|pattern| PathPattern::parse(pattern.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(path))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

impl fmt::Display for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for rule in &self.rules {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{rule}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn prefix_matches_root_and_subpaths() -> Result<()> {
        let pattern = PathPattern::parse("/dashboard/*")?;
        assert!(pattern.matches("/dashboard"));
        assert!(pattern.matches("/dashboard/overview"));
        assert!(pattern.matches("/dashboard/a/b"));
        Ok(())
    }

    #[test]
    fn prefix_is_segment_aware() -> Result<()> {
        let pattern = PathPattern::parse("/dashboard/*")?;
        assert!(!pattern.matches("/dashboard2/x"));
        assert!(!pattern.matches("/dashboardx"));
        Ok(())
    }

    #[test]
    fn matching_is_case_sensitive() -> Result<()> {
        let pattern = PathPattern::parse("/dashboard/*")?;
        assert!(!pattern.matches("/Dashboard/overview"));
        Ok(())
    }

    #[test]
    fn exact_matches_only_itself() -> Result<()> {
        let pattern = PathPattern::parse("/health")?;
        assert!(pattern.matches("/health"));
        assert!(!pattern.matches("/health/db"));
        assert!(!pattern.matches("/healthz"));
        Ok(())
    }

    #[test]
    fn parse_rejects_malformed_patterns() {
        assert!(PathPattern::parse("").is_err());
        assert!(PathPattern::parse("   ").is_err());
        assert!(PathPattern::parse("dashboard/*").is_err());
        assert!(PathPattern::parse("/a/*/b").is_err());
        assert!(PathPattern::parse("/a*").is_err());
        assert!(PathPattern::parse("/*x/*").is_err());
    }

    #[test]
    fn set_matches_any_rule() -> Result<()> {
        let set = PatternSet::parse(["/dashboard/*", "/transacoes/*", "/perfil"])?;
        assert!(set.matches("/dashboard/overview"));
        assert!(set.matches("/transacoes"));
        assert!(set.matches("/perfil"));
        assert!(!set.matches("/public/info"));
        assert!(!set.matches("/perfil/editar"));
        Ok(())
    }

    #[test]
    fn set_parse_fails_on_first_bad_pattern() {
        let result = PatternSet::parse(["/dashboard/*", "broken"]);
        assert!(result.is_err());
    }

    #[test]
    fn empty_set_matches_nothing() {
        let set = PatternSet::default();
        assert!(set.is_empty());
        assert!(!set.matches("/dashboard"));
    }

    #[test]
    fn display_round_trips() -> Result<()> {
        let set = PatternSet::parse(["/dashboard/*", "/perfil"])?;
        assert_eq!(set.to_string(), "/dashboard/*,/perfil");
        assert_eq!(set.len(), 2);
        Ok(())
    }
}
