//! Provider pattern registry.
//!
//! Maps a stock provider name to the ordered list of rules that identify
//! its media. The registry is the built-in provider table, optionally
//! extended with external contributions:
//!
//! - Contributions can add providers, but a built-in provider's rule list
//!   always wins over a contribution with the same name.
//! - Contributed providers are tried first, in contribution order. A
//!   contribution that collides with a built-in keeps its position but
//!   uses the built-in rules. The remaining built-ins follow in table order.
//!
//! ```
//! use stockscan_core::registry::PatternRegistry;
//!
//! # fn example() -> stockscan_core::Result<()> {
//! let registry = PatternRegistry::builder()
//!     .contribute("House Archive", ["archive_\\d+"])
//!     .build()?;
//!
//! assert_eq!(registry.rules().names().next(), Some("House Archive"));
//! # Ok(())
//! # }
//! ```

mod defaults;

use std::fmt;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::error::{Result, ScanError};
use crate::protocol::ProviderSummary;
use defaults::BUILTIN_PROVIDERS;

/// PCRE modifier letters accepted after a closing delimiter.
const DELIMITER_FLAGS: &str = "imsxuUADSXJ";

static BUILTIN_RULES: LazyLock<ProviderRuleSet> = LazyLock::new(|| ProviderRuleSet {
    providers: BUILTIN_PROVIDERS
        .iter()
        .map(|(name, patterns)| ProviderRules {
            name: (*name).to_string(),
            rules: patterns
                .iter()
                .map(|p| MatchRule::new(p).expect("built-in pattern must compile"))
                .collect(),
        })
        .collect(),
});

/// A single case-insensitive pattern.
#[derive(Debug, Clone)]
pub struct MatchRule {
    regex: Regex,
}

impl MatchRule {
    /// Compile a rule from a bare expression or from `/expr/flags` notation.
    ///
    /// Matching is always case-insensitive regardless of the flags given.
    pub fn new(pattern: &str) -> std::result::Result<Self, regex::Error> {
        let regex = RegexBuilder::new(strip_delimiters(pattern))
            .case_insensitive(true)
            .build()?;
        Ok(Self { regex })
    }

    /// The compiled expression (delimiters removed).
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether the pattern occurs anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

fn strip_delimiters(pattern: &str) -> &str {
    if let Some(rest) = pattern.strip_prefix('/') {
        if let Some(end) = rest.rfind('/') {
            let flags = &rest[end + 1..];
            if end > 0 && flags.chars().all(|c| DELIMITER_FLAGS.contains(c)) {
                return &rest[..end];
            }
        }
    }
    pattern
}

/// One provider and its rules, in match order.
#[derive(Debug, Clone)]
pub struct ProviderRules {
    name: String,
    rules: Vec<MatchRule>,
}

impl ProviderRules {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[MatchRule] {
        &self.rules
    }
}

/// Ordered provider → rules table. Provider names are unique.
#[derive(Debug, Clone, Default)]
pub struct ProviderRuleSet {
    providers: Vec<ProviderRules>,
}

impl ProviderRuleSet {
    /// Build a rule set from `(provider, patterns)` pairs, in order.
    ///
    /// A repeated provider name replaces the earlier rule list in place.
    pub fn from_patterns<N, I, P>(entries: impl IntoIterator<Item = (N, I)>) -> Result<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let mut set = Self::default();
        for (name, patterns) in entries {
            let name = name.into();
            let rules = compile_rules(&name, patterns)?;
            set.upsert(name, rules);
        }
        Ok(set)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProviderRules> {
        self.providers.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|p| p.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&ProviderRules> {
        self.providers.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn summaries(&self) -> Vec<ProviderSummary> {
        self.providers
            .iter()
            .map(|p| ProviderSummary {
                name: p.name.clone(),
                rule_count: p.rules.len(),
            })
            .collect()
    }

    fn upsert(&mut self, name: String, rules: Vec<MatchRule>) {
        match self.providers.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.rules = rules,
            None => self.providers.push(ProviderRules { name, rules }),
        }
    }
}

fn compile_rules<P: AsRef<str>>(
    provider: &str,
    patterns: impl IntoIterator<Item = P>,
) -> Result<Vec<MatchRule>> {
    if provider.trim().is_empty() {
        return Err(ScanError::InvalidConfig(
            "provider name must not be empty".to_string(),
        ));
    }

    patterns
        .into_iter()
        .map(|pattern| {
            MatchRule::new(pattern.as_ref()).map_err(|e| ScanError::InvalidPattern {
                provider: provider.to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}

/// Provider attribution rules in effect for a scan.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    rules: ProviderRuleSet,
}

impl PatternRegistry {
    /// Registry holding only the built-in provider table.
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN_RULES.clone(),
        }
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn rules(&self) -> &ProviderRuleSet {
        &self.rules
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Collects external contributions and merges them with the built-in table.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    contributions: Vec<(String, Vec<String>)>,
}

impl RegistryBuilder {
    /// Add a provider contribution.
    pub fn contribute<P: Into<String>>(
        mut self,
        provider: impl Into<String>,
        patterns: impl IntoIterator<Item = P>,
    ) -> Self {
        self.contributions.push((
            provider.into(),
            patterns.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Add contributions from a JSON object of `{"Provider": ["pattern", ...]}`.
    ///
    /// Providers keep their document order.
    pub fn contribute_json(mut self, json: &str) -> Result<Self> {
        let patterns: ExternalPatterns = serde_json::from_str(json)
            .map_err(|e| ScanError::InvalidConfig(format!("Invalid pattern file: {e}")))?;
        self.contributions.extend(patterns.0);
        Ok(self)
    }

    pub fn contribution_count(&self) -> usize {
        self.contributions.len()
    }

    /// Merge contributions with the built-in table.
    pub fn build(self) -> Result<PatternRegistry> {
        let builtin = &*BUILTIN_RULES;
        let mut merged = ProviderRuleSet {
            providers: Vec::with_capacity(builtin.len() + self.contributions.len()),
        };

        for (name, patterns) in self.contributions {
            let rules = match builtin.get(&name) {
                Some(existing) => {
                    tracing::debug!(
                        provider = %name,
                        "Contribution shadows a built-in provider, keeping built-in rules"
                    );
                    existing.rules.clone()
                }
                None => compile_rules(&name, &patterns)?,
            };
            if rules.is_empty() {
                tracing::warn!(provider = %name, "Provider contributed without rules");
            }
            merged.upsert(name, rules);
        }

        for provider in builtin.iter() {
            if merged.get(&provider.name).is_none() {
                merged.providers.push(provider.clone());
            }
        }

        tracing::debug!(providers = merged.len(), "Pattern registry built");

        Ok(PatternRegistry { rules: merged })
    }
}

/// Ordered provider → patterns map as read from a pattern file.
#[derive(Debug, Default)]
struct ExternalPatterns(Vec<(String, Vec<String>)>);

impl<'de> Deserialize<'de> for ExternalPatterns {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(ExternalPatternsVisitor)
    }
}

struct ExternalPatternsVisitor;

impl<'de> Visitor<'de> for ExternalPatternsVisitor {
    type Value = ExternalPatterns;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of provider names to pattern lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(entry) = map.next_entry::<String, Vec<String>>()? {
            entries.push(entry);
        }
        Ok(ExternalPatterns(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let registry = PatternRegistry::builtin();
        let rules = registry.rules();

        assert_eq!(rules.len(), 50);
        assert_eq!(rules.names().next(), Some("Getty Images"));
        assert_eq!(rules.names().last(), Some("Good Stock Photos"));
        assert_eq!(rules.get("Dreamstime").unwrap().rules().len(), 3);
    }

    #[test]
    fn test_empty_contribution_is_builtin() {
        let registry = PatternRegistry::builder().build().unwrap();
        let builtin = PatternRegistry::builtin();

        assert!(registry.rules().names().eq(builtin.rules().names()));
    }

    #[test]
    fn test_contribution_added_before_builtins() {
        let registry = PatternRegistry::builder()
            .contribute("House Archive", ["archive_\\d+"])
            .build()
            .unwrap();
        let names: Vec<_> = registry.rules().names().collect();

        assert_eq!(names.len(), 51);
        assert_eq!(names[0], "House Archive");
        assert_eq!(names[1], "Getty Images");
    }

    #[test]
    fn test_builtin_wins_name_collision() {
        let registry = PatternRegistry::builder()
            .contribute("Pexels", ["anything"])
            .build()
            .unwrap();
        let pexels = registry.rules().get("Pexels").unwrap();

        assert_eq!(registry.rules().len(), 50);
        assert_eq!(registry.rules().names().next(), Some("Pexels"));
        assert_eq!(pexels.rules().len(), 2);
        assert!(!pexels.rules().iter().any(|r| r.is_match("anything")));
    }

    #[test]
    fn test_invalid_contributed_pattern() {
        let err = PatternRegistry::builder()
            .contribute("Broken", ["(unclosed"])
            .build()
            .unwrap_err();

        match err {
            ScanError::InvalidPattern { provider, .. } => assert_eq!(provider, "Broken"),
            other => panic!("Expected InvalidPattern, got: {:?}", other),
        }
    }

    #[test]
    fn test_empty_provider_name_rejected() {
        let err = PatternRegistry::builder()
            .contribute("  ", ["x"])
            .build()
            .unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig(_)));
    }

    #[test]
    fn test_contribute_json_keeps_document_order() {
        let registry = PatternRegistry::builder()
            .contribute_json(r#"{"Zeta Stock": ["zeta_\\d+"], "Alpha Stock": ["/alpha/i"]}"#)
            .unwrap()
            .build()
            .unwrap();
        let names: Vec<_> = registry.rules().names().take(2).collect();

        assert_eq!(names, ["Zeta Stock", "Alpha Stock"]);
        assert_eq!(
            registry.rules().get("Alpha Stock").unwrap().rules()[0].as_str(),
            "alpha"
        );
    }

    #[test]
    fn test_contribute_json_rejects_malformed() {
        let err = PatternRegistry::builder()
            .contribute_json(r#"["not", "a", "map"]"#)
            .unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig(_)));
    }

    #[test]
    fn test_match_rule_case_insensitive() {
        let rule = MatchRule::new(r"shutterstock_\d+").unwrap();
        assert!(rule.is_match("SHUTTERSTOCK_991.JPG"));
        assert!(rule.is_match("img-shutterstock_1-edit.png"));
        assert!(!rule.is_match("shutterstock.png"));
    }

    #[test]
    fn test_strip_delimiters() {
        assert_eq!(strip_delimiters("/gettyimages/i"), "gettyimages");
        assert_eq!(strip_delimiters("/gi-\\d+/"), "gi-\\d+");
        assert_eq!(strip_delimiters("plain"), "plain");
        assert_eq!(strip_delimiters("/uploads/stock"), "/uploads/stock");
        assert_eq!(strip_delimiters("//"), "//");
    }

    #[test]
    fn test_rule_set_from_patterns() {
        let set = ProviderRuleSet::from_patterns([
            ("A", vec!["a"]),
            ("B", vec!["b"]),
            ("A", vec!["x", "y"]),
        ])
        .unwrap();

        assert!(set.names().eq(["A", "B"]));
        assert_eq!(set.get("A").unwrap().rules().len(), 2);
        assert_eq!(set.summaries()[1].rule_count, 1);
    }
}
