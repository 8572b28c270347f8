//! Math snippet rewrite engine.
//!
//! # Module Structure
//!
//! - `Rewrite` - Core trait for a single rewrite pass
//! - `Pipeline` - Feeds a snippet through passes in order
//! - `FrontMarker` / `ScriptMarker` / `CommandMarker` - The passes
//! - `transform` - Applies an entire [`RuleSet`](crate::RuleSet) to one snippet
//!
//! # Example
//!
//! ```ignore
//! use auto_displaystyle::{transform, RuleSet};
//!
//! let rules = RuleSet::new().with_superscripts(true);
//! assert_eq!(transform("x^2", Some(false), &rules), r"x^{\displaystyle 2}");
//! ```

mod core;
mod engine;
mod passes;
mod pipeline;

pub(crate) use self::core::is_regex_space;
pub use self::core::{DISPLAY_STYLE, IdentityRewrite, Rewrite};
pub use engine::{RenderMode, transform};
pub use passes::{CommandMarker, FrontMarker, ScriptMarker};
pub use pipeline::Pipeline;
