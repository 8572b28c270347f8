//! auto-displaystyle - Display-style rewriting for inline math
//!
//! Inline math is typeset compactly: fractions shrink, sums put their limits
//! to the side. This crate rewrites inline LaTeX snippets just before they are
//! rendered so chosen parts typeset with `\displaystyle`.
//!
//! ## Core Concepts
//!
//! **Rule engine**: [`transform`] applies a [`RuleSet`] to one snippet as a
//! fixed sequence of flat rewrite passes. It is pure and synchronous.
//!
//! **Controller**: [`Controller`] wraps the host's math entry point through a
//! render port, keeps the current rule set in a swappable handle, and forces
//! open views to re-render whenever the rules or the wrapper change.
//!
//! ## Modules
//! - `rules`: `RuleSet`, `CommandNames`, `SharedRules`
//! - `transform`: Rewrite passes and the engine entry point
//! - `controller`: Render port, view refresh, commands, state machine
//! - `config`: Persisted settings
//! - `error`: Error types
//!
//! ## Usage
//!
//! ```ignore
//! use auto_displaystyle::{transform, CommandNames, RuleSet};
//!
//! let rules = RuleSet::new()
//!     .with_front(true)
//!     .with_commands(CommandNames::parse("frac, binom"));
//!
//! let out = transform(r"\frac{1}{2}", Some(false), &rules);
//! assert_eq!(out, r"\displaystyle \displaystyle \frac{1}{2}");
//!
//! // Display math and snippets without a display flag are left alone.
//! assert_eq!(transform(r"\frac{1}{2}", None, &rules), r"\frac{1}{2}");
//! ```

/// Rule sets and the shared rule handle
pub mod rules;

/// Rewrite passes and the engine entry point
pub mod transform;

/// Render port, view refresh and the controller
pub mod controller;

/// Persisted settings
pub mod config;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Rules
pub use rules::{CommandNames, RuleSet, SharedRules};

// Engine
pub use transform::{DISPLAY_STYLE, RenderMode, transform};

// Controller
pub use controller::{
    Command, Controller, ControllerState, EntryPoint, EntrySlot, MarkdownView, MathHost,
    RefreshReport, RenderOptions, ViewMode, Workspace,
};

// Settings
pub use config::{JsonFileStore, Settings, SettingsStore};

// Error types
pub use error::{StyleError, StyleResult};
