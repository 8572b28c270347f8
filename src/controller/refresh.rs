//! Forcing open views to re-render.
//!
//! Each view is refreshed on its own; a failing view is recorded in the
//! [`RefreshReport`] and never stops the others.

use std::future::Future;

use futures_util::future::join_all;

use crate::error::{StyleError, StyleResult};

/// Display mode of a document view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Editable source.
    Source,
    /// Rendered reading view.
    Preview,
}

/// An open document view, as exposed by the host.
pub trait MarkdownView: Send + Sync {
    /// Cursor and scroll position.
    type Ephemeral: Send;

    /// Label used in logs and errors.
    fn label(&self) -> String;

    /// Current display mode.
    fn mode(&self) -> ViewMode;

    /// Switch the display mode without recording history.
    fn set_mode(&self, mode: ViewMode) -> impl Future<Output = StyleResult<()>> + Send;

    /// Discard and recompute the rendered output.
    fn rerender(&self) -> StyleResult<()>;

    /// Capture cursor and scroll position.
    fn ephemeral_state(&self) -> Self::Ephemeral;

    /// Restore cursor and scroll position.
    fn set_ephemeral_state(&self, state: Self::Ephemeral);
}

/// Enumerates the open document views.
pub trait Workspace: Send + Sync {
    /// Handle to one view.
    type View: MarkdownView;

    /// Every open document view.
    fn markdown_views(&self) -> Vec<Self::View>;
}

/// Refresh a single view.
///
/// A preview is cycled through source mode and back so that caches keyed on
/// the mode are dropped. Cursor and scroll position are restored afterwards,
/// even when a step fails.
pub async fn refresh_view<V: MarkdownView>(view: &V) -> StyleResult<()> {
    let ephemeral = view.ephemeral_state();

    let result = async {
        view.rerender()?;
        if view.mode() == ViewMode::Preview {
            view.set_mode(ViewMode::Source).await?;
            view.set_mode(ViewMode::Preview).await?;
        }
        Ok::<(), StyleError>(())
    }
    .await;

    view.set_ephemeral_state(ephemeral);
    result
}

/// Refresh every open view concurrently.
pub async fn refresh_all<W: Workspace>(workspace: &W) -> RefreshReport {
    let views = workspace.markdown_views();
    let results = join_all(views.iter().map(refresh_view)).await;

    let mut report = RefreshReport::default();
    for (view, result) in views.iter().zip(results) {
        match result {
            Ok(()) => report.refreshed += 1,
            Err(err) => {
                tracing::warn!(view = %view.label(), error = %err, "view refresh failed");
                report.errors.push(err);
            }
        }
    }

    tracing::debug!(
        refreshed = report.refreshed,
        failed = report.errors.len(),
        "refreshed views"
    );
    report
}

// =============================================================================
// RefreshReport
// =============================================================================

/// Outcome of one refresh pass over all views.
#[derive(Debug, Default)]
pub struct RefreshReport {
    /// Views refreshed successfully.
    pub refreshed: usize,
    /// Views that failed.
    pub errors: RefreshErrors,
}

impl RefreshReport {
    /// Whether every view refreshed.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of views visited.
    pub fn visited(&self) -> usize {
        self.refreshed + self.errors.len()
    }
}

/// Errors collected from failed views.
#[derive(Debug, Default, thiserror::Error)]
#[error("{} view(s) failed to refresh:\n{}", self.errors.len(), format_errors(&self.errors))]
pub struct RefreshErrors {
    /// Individual view errors.
    pub errors: Vec<StyleError>,
}

fn format_errors(errors: &[StyleError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

impl RefreshErrors {
    /// Check if there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Add an error.
    pub fn push(&mut self, error: StyleError) {
        self.errors.push(error);
    }

    /// Iterate over errors.
    pub fn iter(&self) -> impl Iterator<Item = &StyleError> {
        self.errors.iter()
    }
}

impl IntoIterator for RefreshErrors {
    type Item = StyleError;
    type IntoIter = std::vec::IntoIter<StyleError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

// =============================================================================
// Tests
// =============================================================================
