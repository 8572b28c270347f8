//! Core rewrite trait.

/// The literal marker inserted by every rewrite pass.
pub const DISPLAY_STYLE: &str = r"\displaystyle";

/// Whitespace as matched by a regex `\s` class.
///
/// Differs from [`char::is_whitespace`]: U+FEFF counts, U+0085 does not.
pub(crate) fn is_regex_space(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Rewrite a math snippet into a new one.
///
/// Each pass is total: it scans the whole string once, left to right, and a
/// snippet with no matches comes back unchanged.
pub trait Rewrite: Sized {
    /// Rewrite the snippet.
    fn rewrite(self, source: String) -> String;
}

// =============================================================================
// IdentityRewrite
// =============================================================================

/// Rewrite that returns the snippet unchanged.
///
/// Stands in for a disabled pass.
///
/// # Example
///
/// ```ignore
/// Pipeline::new(source)
///     .pipe(if enabled { FrontMarker } else { IdentityRewrite })
///     .into_inner()
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityRewrite;

impl Rewrite for IdentityRewrite {
    #[inline]
    fn rewrite(self, source: String) -> String {
        source
    }
}
