//! Rule sets and their shared, swappable handle.
//!
//! A [`RuleSet`] is an immutable snapshot. Changing a setting builds a new
//! snapshot and swaps it into [`SharedRules`]; readers clone the current
//! `Arc` per call and never observe a half-updated rule set.

use std::sync::Arc;

use compact_str::CompactString;
use parking_lot::RwLock;
use rustc_hash::FxHashSet;

use crate::config::Settings;
use crate::transform::is_regex_space;

// =============================================================================
// CommandNames
// =============================================================================

/// Set of command names (without the leading backslash) to mark.
///
/// Entries are never empty and never contain whitespace in the regex `\s` sense.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandNames(FxHashSet<CompactString>);

impl CommandNames {
    /// Parse a comma-separated list such as `"frac, binom, , "`.
    ///
    /// Parsing is total: all whitespace is removed and empty segments are
    /// dropped, so any input yields a valid set.
    pub fn parse(raw: &str) -> Self {
        let stripped: String = raw.chars().filter(|&c| !is_regex_space(c)).collect();
        Self(
            stripped
                .split(',')
                .filter(|name| !name.is_empty())
                .map(CompactString::from)
                .collect(),
        )
    }

    /// Whether no command is marked.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if a name is in the set.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Iterate over names in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(CompactString::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for CommandNames {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut joined = String::new();
        for name in iter {
            joined.push_str(name.as_ref());
            joined.push(',');
        }
        Self::parse(&joined)
    }
}

// =============================================================================
// RuleSet
// =============================================================================

/// Immutable snapshot of the enabled rewrite rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    prepend_front: bool,
    mark_superscripts: bool,
    mark_subscripts: bool,
    marked_commands: CommandNames,
}

impl RuleSet {
    /// A rule set with every rule disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the front marker.
    pub fn with_front(mut self, enabled: bool) -> Self {
        self.prepend_front = enabled;
        self
    }

    /// Enable or disable superscript marking.
    pub fn with_superscripts(mut self, enabled: bool) -> Self {
        self.mark_superscripts = enabled;
        self
    }

    /// Enable or disable subscript marking.
    pub fn with_subscripts(mut self, enabled: bool) -> Self {
        self.mark_subscripts = enabled;
        self
    }

    /// Set the commands to mark.
    pub fn with_commands(mut self, commands: CommandNames) -> Self {
        self.marked_commands = commands;
        self
    }

    /// Whether the whole snippet is prefixed with `\displaystyle`.
    #[inline]
    pub fn prepend_front(&self) -> bool {
        self.prepend_front
    }

    /// Whether superscript arguments are marked.
    #[inline]
    pub fn mark_superscripts(&self) -> bool {
        self.mark_superscripts
    }

    /// Whether subscript arguments are marked.
    #[inline]
    pub fn mark_subscripts(&self) -> bool {
        self.mark_subscripts
    }

    /// Commands to prefix with `\displaystyle`.
    #[inline]
    pub fn marked_commands(&self) -> &CommandNames {
        &self.marked_commands
    }

    /// Whether at least one rule can change a snippet.
    pub fn is_active(&self) -> bool {
        self.prepend_front
            || self.mark_superscripts
            || self.mark_subscripts
            || !self.marked_commands.is_empty()
    }
}

impl From<&Settings> for RuleSet {
    fn from(settings: &Settings) -> Self {
        Self::new()
            .with_front(settings.front)
            .with_superscripts(settings.superscript)
            .with_subscripts(settings.subscript)
            .with_commands(CommandNames::parse(&settings.additional_function_names))
    }
}

// =============================================================================
// SharedRules
// =============================================================================

/// Process-wide handle to the current [`RuleSet`].
///
/// Uses `parking_lot::RwLock` around an `Arc` so that replacing the rules is
/// a single pointer swap.
#[derive(Debug, Clone, Default)]
pub struct SharedRules {
    inner: Arc<RwLock<Arc<RuleSet>>>,
}

impl SharedRules {
    /// Create a handle holding `rules`.
    pub fn new(rules: RuleSet) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(rules))),
        }
    }

    /// The latest snapshot.
    pub fn snapshot(&self) -> Arc<RuleSet> {
        Arc::clone(&self.inner.read())
    }

    /// Replace the rule set wholesale, returning the previous snapshot.
    pub fn replace(&self, rules: RuleSet) -> Arc<RuleSet> {
        std::mem::replace(&mut *self.inner.write(), Arc::new(rules))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(SharedRules: Send, Sync);

    #[test]
    fn test_parse_drops_empty_segments() {
        let names = CommandNames::parse("frac, binom, , ");
        assert_eq!(names.len(), 2);
        assert!(names.contains("frac"));
        assert!(names.contains("binom"));
    }

    #[test]
    fn test_parse_is_total() {
        assert!(CommandNames::parse("").is_empty());
        assert!(CommandNames::parse(" , ,,\t\n").is_empty());

        let names = CommandNames::parse(",frac,,frac ,  frac");
        assert_eq!(names.len(), 1);
        assert!(names.iter().all(|n| !n.is_empty() && n.trim() == n));
    }

    #[test]
    fn test_parse_strips_regex_whitespace() {
        let names = CommandNames::parse("\u{FEFF}frac,\u{3000}binom");
        assert!(names.contains("frac"));
        assert!(names.contains("binom"));

        let names = CommandNames::parse("frac\u{85}");
        assert!(names.contains("frac\u{85}"));
        assert!(!names.contains("frac"));
    }

    #[test]
    fn test_from_iter() {
        let names: CommandNames = ["frac", " binom ", ""].into_iter().collect();
        assert_eq!(names, CommandNames::parse("frac,binom"));
    }

    #[test]
    fn test_rule_set_from_settings() {
        let settings = Settings {
            front: false,
            superscript: true,
            subscript: false,
            additional_function_names: "sum,".to_string(),
        };
        let rules = RuleSet::from(&settings);
        assert!(!rules.prepend_front());
        assert!(rules.mark_superscripts());
        assert!(!rules.mark_subscripts());
        assert!(rules.marked_commands().contains("sum"));
        assert!(rules.is_active());
    }

    #[test]
    fn test_inactive_rule_set() {
        assert!(!RuleSet::new().is_active());
        assert!(!RuleSet::new().with_commands(CommandNames::parse(" , ")).is_active());
    }

    #[test]
    fn test_shared_rules_replace() {
        let shared = SharedRules::new(RuleSet::new());
        let reader = shared.clone();

        let held = reader.snapshot();
        let old = shared.replace(RuleSet::new().with_front(true));

        assert!(!old.prepend_front());
        // A held snapshot is unaffected, the next read sees the swap.
        assert!(!held.prepend_front());
        assert!(reader.snapshot().prepend_front());
    }
}
