//! Snippet rewrite pipeline.

use super::{IdentityRewrite, Rewrite};

/// Synchronous pipeline over a math snippet.
///
/// Wraps the snippet and feeds it through rewrite passes in the order they
/// are piped.
///
/// # Example
///
/// ```ignore
/// use auto_displaystyle::transform::{Pipeline, FrontMarker, ScriptMarker};
///
/// let rewritten = Pipeline::new("x^2")
///     .pipe(FrontMarker)
///     .pipe_if(true, ScriptMarker::SUPERSCRIPT)
///     .into_inner();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    source: String,
}

impl Pipeline {
    /// Create a new pipeline from a snippet.
    #[inline]
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into() }
    }

    /// Apply a rewrite pass.
    #[inline]
    pub fn pipe<R: Rewrite>(self, pass: R) -> Self {
        Self {
            source: pass.rewrite(self.source),
        }
    }

    /// Conditionally apply a rewrite pass.
    ///
    /// Only applies the pass if `condition` is true.
    #[inline]
    pub fn pipe_if<R: Rewrite>(self, condition: bool, pass: R) -> Self {
        if condition {
            self.pipe(pass)
        } else {
            self.pipe(IdentityRewrite)
        }
    }

    /// Inspect the intermediate snippet without consuming the pipeline.
    ///
    /// Useful for logging or debugging a single pass.
    #[inline]
    pub fn inspect<F>(self, f: F) -> Self
    where
        F: FnOnce(&str),
    {
        f(&self.source);
        self
    }

    /// Consume the pipeline and return the snippet.
    #[inline]
    pub fn into_inner(self) -> String {
        self.source
    }
}

impl From<Pipeline> for String {
    #[inline]
    fn from(pipeline: Pipeline) -> Self {
        pipeline.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Append(&'static str);

    impl Rewrite for Append {
        fn rewrite(self, mut source: String) -> String {
            source.push_str(self.0);
            source
        }
    }

    #[test]
    fn test_passes_run_in_order() {
        let out = Pipeline::new("a").pipe(Append("b")).pipe(Append("c")).into_inner();
        assert_eq!(out, "abc");
    }

    #[test]
    fn test_pipe_if_skips_disabled_pass() {
        let out = Pipeline::new("a")
            .pipe_if(false, Append("b"))
            .pipe_if(true, Append("c"))
            .into_inner();
        assert_eq!(out, "ac");
    }

    #[test]
    fn test_inspect_sees_intermediate() {
        let mut seen = String::new();
        let out = Pipeline::new("a")
            .pipe(Append("b"))
            .inspect(|s| seen = s.to_string())
            .pipe(Append("c"));
        assert_eq!(seen, "ab");
        assert_eq!(String::from(out), "abc");
    }
}
