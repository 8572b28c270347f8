//! Prelude module for common imports.
//!
//! ```ignore
//! use auto_displaystyle::prelude::*;
//! ```

// Rules
pub use crate::rules::{CommandNames, RuleSet, SharedRules};

// Engine
pub use crate::transform::{
    CommandMarker, DISPLAY_STYLE, FrontMarker, IdentityRewrite, Pipeline, RenderMode, Rewrite,
    ScriptMarker, transform,
};

// Controller
pub use crate::controller::{
    Command, Controller, ControllerState, EntryPoint, EntrySlot, MarkdownView, MathHost,
    RefreshErrors, RefreshReport, RenderOptions, Uninstaller, ViewMode, Workspace, install,
    refresh_all, refresh_view,
};

// Settings
pub use crate::config::{JsonFileStore, Settings, SettingsStore};

// Error
pub use crate::error::{StyleError, StyleResult};
