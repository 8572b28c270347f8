//! The rewrite passes.
//!
//! Every pass is a flat scan over the whole snippet. Nothing recurses into
//! brace groups: a nested `a^{b^c}` is marked at both levels because each
//! operator occurrence is matched on its own.

use smallvec::SmallVec;

use super::{DISPLAY_STYLE, Rewrite, is_regex_space};
use crate::rules::CommandNames;

// =============================================================================
// FrontMarker
// =============================================================================

/// Prepends `\displaystyle ` to the snippet.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontMarker;

impl Rewrite for FrontMarker {
    fn rewrite(self, source: String) -> String {
        let mut out = String::with_capacity(DISPLAY_STYLE.len() + 1 + source.len());
        push_marker(&mut out);
        out.push_str(&source);
        out
    }
}

// =============================================================================
// ScriptMarker
// =============================================================================

/// Marks the argument of every superscript or subscript operator.
///
/// Runs in two sweeps:
/// 1. `^{...}` (whitespace allowed before the brace) becomes
///    `^{\displaystyle ...}`.
/// 2. `^c` for any single non-brace character `c` becomes
///    `^{\displaystyle c}`. Whitespace between the operator and `c` is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptMarker {
    operator: char,
}

impl ScriptMarker {
    /// Marks `^` arguments.
    pub const SUPERSCRIPT: Self = Self { operator: '^' };
    /// Marks `_` arguments.
    pub const SUBSCRIPT: Self = Self { operator: '_' };

    /// The operator this pass looks for.
    pub fn operator(&self) -> char {
        self.operator
    }

    fn mark_groups(&self, chars: &[char]) -> String {
        let mut out = String::with_capacity(chars.len() + 16);
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c == self.operator {
                let j = skip_whitespace(chars, i + 1);
                if chars.get(j) == Some(&'{') {
                    out.push(c);
                    out.push('{');
                    push_marker(&mut out);
                    i = j + 1;
                    continue;
                }
            }
            out.push(c);
            i += 1;
        }
        out
    }

    fn mark_tokens(&self, chars: &[char]) -> String {
        let mut out = String::with_capacity(chars.len() + 16);
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c == self.operator {
                let j = skip_whitespace(chars, i + 1);
                let token = match chars.get(j) {
                    Some(&t) if t != '{' => Some((t, j + 1)),
                    // Nothing usable after the whitespace run: its last
                    // character becomes the argument.
                    _ if j > i + 1 => Some((chars[j - 1], j)),
                    _ => None,
                };
                if let Some((token, next)) = token {
                    out.push(c);
                    out.push('{');
                    push_marker(&mut out);
                    out.push(token);
                    out.push('}');
                    i = next;
                    continue;
                }
            }
            out.push(c);
            i += 1;
        }
        out
    }
}

impl Rewrite for ScriptMarker {
    fn rewrite(self, source: String) -> String {
        let chars: Vec<char> = source.chars().collect();
        let grouped = self.mark_groups(&chars);
        let chars: Vec<char> = grouped.chars().collect();
        self.mark_tokens(&chars)
    }
}

fn skip_whitespace(chars: &[char], mut i: usize) -> usize {
    while chars.get(i).copied().is_some_and(is_regex_space) {
        i += 1;
    }
    i
}

// =============================================================================
// CommandMarker
// =============================================================================

/// Inserts `\displaystyle ` before every invocation of a listed command.
///
/// A name matches only at a word boundary, so `frac` leaves `\fraction`
/// alone. Arguments are not touched.
#[derive(Debug, Clone)]
pub struct CommandMarker<'a> {
    /// Longest first, so the choice between overlapping names is stable.
    names: SmallVec<[&'a str; 8]>,
}

impl<'a> CommandMarker<'a> {
    /// Create a marker for the given command names.
    pub fn new(commands: &'a CommandNames) -> Self {
        let mut names: SmallVec<[&'a str; 8]> = commands.iter().collect();
        names.sort_unstable_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Self { names }
    }

    /// Length of the listed name starting right after a backslash, if any.
    fn match_at(&self, after_escape: &str) -> Option<usize> {
        self.names
            .iter()
            .find(|name| {
                after_escape.starts_with(**name) && at_word_boundary(name, &after_escape[name.len()..])
            })
            .map(|name| name.len())
    }
}

impl Rewrite for CommandMarker<'_> {
    fn rewrite(self, source: String) -> String {
        if self.names.is_empty() {
            return source;
        }

        let mut out = String::with_capacity(source.len() + 16);
        let mut rest = source.as_str();
        while let Some(pos) = rest.find('\\') {
            let (before, tail) = rest.split_at(pos);
            out.push_str(before);
            match self.match_at(&tail[1..]) {
                Some(len) => {
                    push_marker(&mut out);
                    out.push_str(&tail[..1 + len]);
                    rest = &tail[1 + len..];
                }
                None => {
                    out.push('\\');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// ASCII word characters, as a regex `\b` sees them.
fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn at_word_boundary(name: &str, rest: &str) -> bool {
    let last = name.chars().next_back().is_some_and(is_word);
    let next = rest.chars().next().is_some_and(is_word);
    last != next
}

fn push_marker(out: &mut String) {
    out.push_str(DISPLAY_STYLE);
    out.push(' ');
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sup(s: &str) -> String {
        ScriptMarker::SUPERSCRIPT.rewrite(s.to_string())
    }

    fn sub(s: &str) -> String {
        ScriptMarker::SUBSCRIPT.rewrite(s.to_string())
    }

    fn commands(names: &str, s: &str) -> String {
        let names = CommandNames::parse(names);
        CommandMarker::new(&names).rewrite(s.to_string())
    }

    #[test]
    fn test_front_marker() {
        assert_eq!(FrontMarker.rewrite("x".into()), r"\displaystyle x");
        assert_eq!(FrontMarker.rewrite(String::new()), r"\displaystyle ");
    }

    #[test]
    fn test_superscript_single_token() {
        assert_eq!(sup("x^2"), r"x^{\displaystyle 2}");
        assert_eq!(sup("x^  2"), r"x^{\displaystyle 2}");
        assert_eq!(sup("a^b + c^d"), r"a^{\displaystyle b} + c^{\displaystyle d}");
    }

    #[test]
    fn test_superscript_group() {
        assert_eq!(sup("x^{10}"), r"x^{\displaystyle 10}");
        assert_eq!(sup("x^ {10}"), r"x^{\displaystyle 10}");
    }

    #[test]
    fn test_superscript_nested() {
        assert_eq!(sup("2^{3^4}"), r"2^{\displaystyle 3^{\displaystyle 4}}");
        assert_eq!(sup("a^{b^{c}}"), r"a^{\displaystyle b^{\displaystyle c}}");
    }

    #[test]
    fn test_superscript_ignores_subscripts() {
        assert_eq!(sup("x_1"), "x_1");
        assert_eq!(sup(""), "");
    }

    #[test]
    fn test_operator_at_end() {
        assert_eq!(sup("x^"), "x^");
        // Trailing whitespace is taken as the argument.
        assert_eq!(sup("x^ "), "x^{\\displaystyle  }");
    }

    #[test]
    fn test_whitespace_matches_regex_class() {
        // U+FEFF is skipped like a space; U+0085 is an ordinary argument.
        assert_eq!(sup("x^\u{FEFF}2"), r"x^{\displaystyle 2}");
        assert_eq!(sup("x^\u{FEFF}{2}"), r"x^{\displaystyle 2}");
        assert_eq!(sup("x^\u{85}2"), "x^{\\displaystyle \u{85}}2");
    }

    #[test]
    fn test_single_character_token_only() {
        assert_eq!(sup("e^xy"), r"e^{\displaystyle x}y");
        assert_eq!(sup("e^é"), r"e^{\displaystyle é}");
    }

    #[test]
    fn test_subscript_nested() {
        assert_eq!(sub("n_{a_{k+1}}"), r"n_{\displaystyle a_{\displaystyle k+1}}");
        assert_eq!(sub("x_i^2"), r"x_{\displaystyle i}^2");
    }

    #[test]
    fn test_command_marker() {
        assert_eq!(
            commands("frac, binom", r"\frac{2 + \binom{n}{i}}{1 + \frac{3}{4}}"),
            r"\displaystyle \frac{2 + \displaystyle \binom{n}{i}}{1 + \displaystyle \frac{3}{4}}"
        );
    }

    #[test]
    fn test_command_word_boundary() {
        assert_eq!(commands("frac", r"\fraction + \frac12"), r"\fraction + \frac12");
        assert_eq!(commands("frac", r"\frac{a}{b}\frac"), r"\displaystyle \frac{a}{b}\displaystyle \frac");
        assert_eq!(commands("frac", r"\frac_1"), r"\frac_1");
        assert_eq!(commands("frac", r"\frac 1 2"), r"\displaystyle \frac 1 2");
    }

    #[test]
    fn test_command_longest_name_wins() {
        assert_eq!(commands("sum, summa", r"\summa"), r"\displaystyle \summa");
        assert_eq!(commands("sum, summa", r"\sum"), r"\displaystyle \sum");
    }

    #[test]
    fn test_command_requires_escape() {
        assert_eq!(commands("frac", "frac{1}{2}"), "frac{1}{2}");
        assert_eq!(commands("frac", r"\\"), r"\\");
    }

    #[test]
    fn test_command_marker_empty_is_identity() {
        assert_eq!(commands(" , ", r"\frac{1}{2}"), r"\frac{1}{2}");
    }
}
