//! The rule engine entry point.

use std::borrow::Cow;

use super::{CommandMarker, FrontMarker, Pipeline, ScriptMarker};
use crate::rules::RuleSet;

/// How the host is about to typeset a snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// `display` was present and `false`.
    Inline,
    /// `display` was present and `true`.
    Display,
    /// `display` was absent.
    ///
    /// Some hosts typeset these as display math anyway, so they are left alone.
    Unspecified,
}

impl RenderMode {
    /// Classify the host's optional `display` flag.
    pub fn from_flag(display: Option<bool>) -> Self {
        match display {
            Some(false) => Self::Inline,
            Some(true) => Self::Display,
            None => Self::Unspecified,
        }
    }

    /// Only explicitly inline snippets are rewritten.
    #[inline]
    pub fn is_inline(self) -> bool {
        self == Self::Inline
    }
}

impl From<Option<bool>> for RenderMode {
    fn from(display: Option<bool>) -> Self {
        Self::from_flag(display)
    }
}

/// Rewrite `source` according to `rules`.
///
/// Passes run in a fixed order: front marker, superscripts, subscripts,
/// commands. Snippets not flagged inline are returned as-is. The result is
/// not idempotent, so call this once per render.
pub fn transform<'a>(source: &'a str, mode: impl Into<RenderMode>, rules: &RuleSet) -> Cow<'a, str> {
    if !mode.into().is_inline() || !rules.is_active() {
        return Cow::Borrowed(source);
    }

    let rewritten = Pipeline::new(source)
        .pipe_if(rules.prepend_front(), FrontMarker)
        .pipe_if(rules.mark_superscripts(), ScriptMarker::SUPERSCRIPT)
        .pipe_if(rules.mark_subscripts(), ScriptMarker::SUBSCRIPT)
        .pipe_if(
            !rules.marked_commands().is_empty(),
            CommandMarker::new(rules.marked_commands()),
        )
        .into_inner();

    tracing::trace!(source, %rewritten, "rewrote inline math");
    Cow::Owned(rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::CommandNames;

    fn all_rules() -> RuleSet {
        RuleSet::new()
            .with_front(true)
            .with_superscripts(true)
            .with_subscripts(true)
            .with_commands(CommandNames::parse("frac"))
    }

    #[test]
    fn test_display_mode_passes_through() {
        for source in ["x^2", r"\frac{1}{2}", "", "n_{a_{k+1}}"] {
            assert_eq!(transform(source, Some(true), &all_rules()), source);
        }
    }

    #[test]
    fn test_absent_flag_passes_through() {
        for source in ["x^2", r"\frac{1}{2}", ""] {
            let out = transform(source, None, &all_rules());
            assert!(matches!(out, Cow::Borrowed(_)));
            assert_eq!(out, source);
        }
    }

    #[test]
    fn test_superscript_only() {
        let rules = RuleSet::new().with_superscripts(true);
        assert_eq!(transform("x^2", Some(false), &rules), r"x^{\displaystyle 2}");
    }

    #[test]
    fn test_subscript_nested() {
        let rules = RuleSet::new().with_subscripts(true);
        assert_eq!(
            transform("n_{a_{k+1}}", Some(false), &rules),
            r"n_{\displaystyle a_{\displaystyle k+1}}"
        );
    }

    #[test]
    fn test_front_marker_default_settings() {
        let rules = RuleSet::from(&crate::config::Settings::default());
        assert_eq!(
            transform(r"\sum_{i=1}^{N} i^{2}", Some(false), &rules),
            r"\displaystyle \sum_{i=1}^{N} i^{2}"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(transform("", Some(false), &RuleSet::new().with_superscripts(true)), "");
        assert_eq!(transform("", Some(false), &RuleSet::new().with_front(true)), r"\displaystyle ");
    }

    #[test]
    fn test_commands() {
        let rules = RuleSet::new().with_commands(CommandNames::parse("frac, binom"));
        assert_eq!(
            transform(r"\frac{2 + \binom{n}{i}}{1 + \frac{3}{4}}", Some(false), &rules),
            r"\displaystyle \frac{2 + \displaystyle \binom{n}{i}}{1 + \displaystyle \frac{3}{4}}"
        );
    }

    #[test]
    fn test_fixed_pass_order() {
        // A script argument is one character, even a backslash.
        assert_eq!(
            transform(r"e^\frac", Some(false), &all_rules()),
            r"\displaystyle e^{\displaystyle \}frac"
        );
        assert_eq!(
            transform(r"x^2_i + \frac{a}{b}", Some(false), &all_rules()),
            r"\displaystyle x^{\displaystyle 2}_{\displaystyle i} + \displaystyle \frac{a}{b}"
        );
    }

    #[test]
    fn test_not_idempotent() {
        let rules = RuleSet::new().with_superscripts(true);
        let once = transform("x^2", Some(false), &rules).into_owned();
        let twice = transform(&once, Some(false), &rules).into_owned();
        assert_ne!(once, twice);
        assert_eq!(twice, r"x^{\displaystyle \displaystyle 2}");
    }

    #[test]
    fn test_deterministic() {
        let rules = all_rules();
        let a = transform(r"a^{b^c}_\frac", Some(false), &rules);
        let b = transform(r"a^{b^c}_\frac", Some(false), &rules);
        assert_eq!(a, b);
    }

    #[test]
    fn test_inactive_rules_borrow() {
        assert!(matches!(transform("x^2", Some(false), &RuleSet::new()), Cow::Borrowed("x^2")));
    }
}
