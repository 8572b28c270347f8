//! Interception and refresh controller.
//!
//! # Module Structure
//!
//! - `MathHost` / `EntrySlot` - Render port over the host's math entry point
//! - `install` / `Uninstaller` - Wrap and unwrap the entry point
//! - `MarkdownView` / `Workspace` - Host views to refresh
//! - `Command` - The enable/disable actions
//! - `Controller` - Two-state machine tying it all together
//!
//! # Example
//!
//! ```ignore
//! let mut controller = Controller::load(host, workspace, JsonFileStore::new("data.json"))?;
//! controller.start().await?;
//!
//! controller.update_settings(|s| s.superscript = true).await?;
//!
//! controller.shutdown().await;
//! ```

mod command;
mod port;
mod refresh;

use std::sync::Arc;

pub use command::Command;
pub use port::{EntryPoint, EntrySlot, MathHost, RenderOptions, Uninstaller, install};
pub use refresh::{
    MarkdownView, RefreshErrors, RefreshReport, ViewMode, Workspace, refresh_all, refresh_view,
};

use crate::config::{Settings, SettingsStore};
use crate::error::{StyleError, StyleResult};
use crate::rules::{RuleSet, SharedRules};
use crate::transform::{RenderMode, transform};

/// Whether the wrapper is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Wrapper installed; inline snippets are rewritten.
    Active,
    /// No wrapper; the host renders untouched.
    Inactive,
}

/// Owns the wrapper's lifecycle, the current rule set and the settings.
///
/// At most one wrapper is installed at a time: enabling while active and
/// disabling while inactive are no-ops that return `None`.
pub struct Controller<H: MathHost, W: Workspace> {
    host: Arc<H>,
    workspace: W,
    store: Box<dyn SettingsStore>,
    settings: Settings,
    rules: SharedRules,
    uninstaller: Option<Uninstaller<H>>,
}

impl<H: MathHost, W: Workspace> Controller<H, W> {
    /// Create an inactive controller with the given settings.
    pub fn new(host: Arc<H>, workspace: W, store: impl SettingsStore + 'static, settings: Settings) -> Self {
        let rules = SharedRules::new(RuleSet::from(&settings));
        Self {
            host,
            workspace,
            store: Box::new(store),
            settings,
            rules,
            uninstaller: None,
        }
    }

    /// Create an inactive controller with settings read from `store`.
    ///
    /// Falls back to defaults if nothing was stored yet.
    pub fn load(host: Arc<H>, workspace: W, store: impl SettingsStore + 'static) -> StyleResult<Self> {
        let settings = store.load()?.unwrap_or_default();
        tracing::debug!(?settings, "loaded settings");
        Ok(Self::new(host, workspace, store, settings))
    }

    /// Current state.
    pub fn state(&self) -> ControllerState {
        if self.uninstaller.is_some() {
            ControllerState::Active
        } else {
            ControllerState::Inactive
        }
    }

    /// Whether the wrapper is installed.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state() == ControllerState::Active
    }

    /// Current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Snapshot of the current rule set.
    pub fn rules(&self) -> Arc<RuleSet> {
        self.rules.snapshot()
    }

    /// Handle read by the installed wrapper.
    pub fn shared_rules(&self) -> &SharedRules {
        &self.rules
    }

    /// The host whose entry point is wrapped.
    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    /// The views refreshed on every state or rule change.
    pub fn workspace(&self) -> &W {
        &self.workspace
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Startup: install the wrapper and refresh every view.
    ///
    /// # Errors
    ///
    /// Fails if the host has no entry point; the controller stays inactive
    /// and nothing is refreshed.
    pub async fn start(&mut self) -> StyleResult<RefreshReport> {
        if !self.is_active() {
            self.install()?;
            tracing::info!("display style interception started");
        }
        Ok(self.refresh().await)
    }

    /// Install the wrapper, then refresh. No-op if already active.
    pub async fn enable(&mut self) -> StyleResult<Option<RefreshReport>> {
        if self.is_active() {
            tracing::debug!("enable ignored: already active");
            return Ok(None);
        }
        self.install()?;
        tracing::info!("display style interception enabled");
        Ok(Some(self.refresh().await))
    }

    /// Restore the original entry point, then refresh. No-op if inactive.
    pub async fn disable(&mut self) -> Option<RefreshReport> {
        let Some(uninstaller) = self.uninstaller.take() else {
            tracing::debug!("disable ignored: already inactive");
            return None;
        };
        uninstaller.uninstall();
        tracing::info!("display style interception disabled");
        Some(self.refresh().await)
    }

    /// Shutdown: restore the original entry point if needed, then refresh once.
    ///
    /// Consumes the controller, so the host is never left wrapped.
    pub async fn shutdown(mut self) -> RefreshReport {
        if let Some(uninstaller) = self.uninstaller.take() {
            uninstaller.uninstall();
        }
        tracing::info!("display style interception shut down");
        self.refresh().await
    }

    /// Re-render every open view.
    pub async fn refresh(&self) -> RefreshReport {
        refresh_all(&self.workspace).await
    }

    fn install(&mut self) -> StyleResult<()> {
        match install(&self.host, &self.rules) {
            Ok(uninstaller) => {
                self.uninstaller = Some(uninstaller);
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "could not wrap the math entry point");
                Err(err)
            }
        }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Whether `command` can run in the current state.
    pub fn is_available(&self, command: Command) -> bool {
        match command {
            Command::Enable => !self.is_active(),
            Command::Disable => self.is_active(),
        }
    }

    /// Run `command`. Returns `None` when it was unavailable.
    pub async fn run(&mut self, command: Command) -> StyleResult<Option<RefreshReport>> {
        match command {
            Command::Enable => self.enable().await,
            Command::Disable => Ok(self.disable().await),
        }
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Change settings, swap in the new rule set, persist, and refresh.
    ///
    /// # Errors
    ///
    /// Returns the store's error if persisting fails. The new rules are in
    /// effect and the views are refreshed either way.
    pub async fn update_settings(&mut self, f: impl FnOnce(&mut Settings)) -> StyleResult<RefreshReport> {
        let saved = self.stage_settings(f);
        let report = self.refresh().await;
        saved.map(|()| report)
    }

    /// Like [`update_settings`](Self::update_settings) without the refresh.
    ///
    /// Meant for edits still in progress, such as the command list while it
    /// is being typed; call [`refresh`](Self::refresh) once the edit is done.
    pub fn stage_settings(&mut self, f: impl FnOnce(&mut Settings)) -> StyleResult<()> {
        let mut settings = self.settings.clone();
        f(&mut settings);

        self.rules.replace(RuleSet::from(&settings));
        self.settings = settings;
        tracing::debug!(settings = ?self.settings, "rule set replaced");

        self.store.save(&self.settings)
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Render through whatever entry point is installed.
    pub fn render(&self, source: &str, options: &H::Options) -> StyleResult<H::Output> {
        let entry = self.host.entry_point().ok_or(StyleError::EntryPointUnavailable)?;
        Ok(entry(source, options))
    }

    /// Render with the original entry point, bypassing the wrapper.
    pub fn render_unstyled(&self, source: &str, options: &H::Options) -> StyleResult<H::Output> {
        let entry = match &self.uninstaller {
            Some(uninstaller) => Arc::clone(uninstaller.original()),
            None => self.host.entry_point().ok_or(StyleError::EntryPointUnavailable)?,
        };
        Ok(entry(source, options))
    }

    /// The rewrite the current rules would apply to an inline snippet.
    pub fn preview(&self, source: &str) -> String {
        transform(source, RenderMode::Inline, &self.rules.snapshot()).into_owned()
    }
}

/// Restores the original entry point if the controller goes away while active.
impl<H: MathHost, W: Workspace> Drop for Controller<H, W> {
    fn drop(&mut self) {
        if let Some(uninstaller) = self.uninstaller.take() {
            uninstaller.uninstall();
            tracing::debug!("wrapper removed on drop");
        }
    }
}

impl<H: MathHost, W: Workspace + std::fmt::Debug> std::fmt::Debug for Controller<H, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("state", &self.state())
            .field("settings", &self.settings)
            .field("workspace", &self.workspace)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
