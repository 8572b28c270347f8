//! Render port: the host's math entry point and the wrapper installed over it.
//!
//! The host exposes its entry point as a swappable function reference.
//! [`install`] replaces it with a wrapper that rewrites inline snippets before
//! delegating, and hands back an [`Uninstaller`] that puts the original back.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::error::{StyleError, StyleResult};
use crate::rules::SharedRules;
use crate::transform::transform;

/// A math render entry point: `(source, options) -> output`.
pub type EntryPoint<O, T> = Arc<dyn Fn(&str, &O) -> T + Send + Sync>;

// =============================================================================
// RenderOptions
// =============================================================================

/// Options passed alongside each snippet.
///
/// Only the `display` flag is inspected; everything else is forwarded as-is.
pub trait RenderOptions {
    /// The `display` flag, or `None` if the caller did not set one.
    fn display(&self) -> Option<bool>;
}

impl RenderOptions for Option<bool> {
    #[inline]
    fn display(&self) -> Option<bool> {
        *self
    }
}

/// JSON-style option objects, e.g. `{"display": false, "em": 16}`.
///
/// A non-boolean `display` value counts as absent.
impl RenderOptions for Map<String, Value> {
    fn display(&self) -> Option<bool> {
        self.get("display").and_then(Value::as_bool)
    }
}

// =============================================================================
// MathHost
// =============================================================================

/// Host adapter owning the math render entry point.
pub trait MathHost: Send + Sync + 'static {
    /// Options accepted by the entry point.
    type Options: RenderOptions + 'static;
    /// Whatever the entry point renders to.
    type Output: 'static;

    /// The current entry point, or `None` if the math engine is not loaded.
    fn entry_point(&self) -> Option<EntryPoint<Self::Options, Self::Output>>;

    /// Replace the entry point.
    fn set_entry_point(&self, entry: EntryPoint<Self::Options, Self::Output>);
}

/// A ready-made [`MathHost`]: one swappable entry point slot.
pub struct EntrySlot<O, T> {
    entry: RwLock<Option<EntryPoint<O, T>>>,
}

impl<O, T> EntrySlot<O, T> {
    /// Create a slot holding `entry`.
    pub fn new(entry: EntryPoint<O, T>) -> Self {
        Self {
            entry: RwLock::new(Some(entry)),
        }
    }

    /// Create a slot holding a closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str, &O) -> T + Send + Sync + 'static,
    {
        Self::new(Arc::new(f))
    }

    /// Create a slot with no entry point loaded yet.
    pub fn empty() -> Self {
        Self { entry: RwLock::new(None) }
    }

    /// Whether an entry point is loaded.
    pub fn is_loaded(&self) -> bool {
        self.entry.read().is_some()
    }

    /// Call whatever entry point is currently installed.
    pub fn render(&self, source: &str, options: &O) -> StyleResult<T> {
        let entry = self.entry.read().clone().ok_or(StyleError::EntryPointUnavailable)?;
        Ok(entry(source, options))
    }
}

impl<O, T> Default for EntrySlot<O, T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<O, T> MathHost for EntrySlot<O, T>
where
    O: RenderOptions + 'static,
    T: 'static,
{
    type Options = O;
    type Output = T;

    fn entry_point(&self) -> Option<EntryPoint<O, T>> {
        self.entry.read().clone()
    }

    fn set_entry_point(&self, entry: EntryPoint<O, T>) {
        *self.entry.write() = Some(entry);
    }
}

// =============================================================================
// Install / Uninstall
// =============================================================================

/// Wrap the host's entry point so every snippet passes through [`transform`].
///
/// The wrapper reads the latest rule set from `rules` on every call, forwards
/// the options untouched and returns the original output unchanged.
///
/// # Errors
///
/// Returns [`StyleError::EntryPointUnavailable`] if the host has no entry
/// point; the host is left untouched.
pub fn install<H: MathHost>(host: &Arc<H>, rules: &SharedRules) -> StyleResult<Uninstaller<H>> {
    let original = host.entry_point().ok_or(StyleError::EntryPointUnavailable)?;

    let inner = Arc::clone(&original);
    let rules = rules.clone();
    let wrapper: EntryPoint<H::Options, H::Output> =
        Arc::new(move |source: &str, options: &H::Options| {
            let snapshot = rules.snapshot();
            let source = transform(source, options.display(), &snapshot);
            inner(&*source, options)
        });

    host.set_entry_point(wrapper);
    Ok(Uninstaller {
        host: Arc::clone(host),
        original,
    })
}

/// Handle restoring the original entry point.
///
/// [`uninstall`](Self::uninstall) consumes the handle, so it can run at most
/// once. Dropping the handle without calling it leaves the wrapper in place.
#[must_use = "dropping an Uninstaller leaves the wrapper installed"]
pub struct Uninstaller<H: MathHost> {
    host: Arc<H>,
    original: EntryPoint<H::Options, H::Output>,
}

impl<H: MathHost> Uninstaller<H> {
    /// The unwrapped entry point.
    pub fn original(&self) -> &EntryPoint<H::Options, H::Output> {
        &self.original
    }

    /// Restore the original entry point.
    pub fn uninstall(self) {
        self.host.set_entry_point(self.original);
    }
}

impl<H: MathHost> std::fmt::Debug for Uninstaller<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Uninstaller").finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
