//! The rendering-engine boundary.
//!
//! The engine itself (layout, painting, script execution) is an external
//! collaborator. The bridge only consumes this narrow interface, injected
//! at surface construction, and exposes three entry points back to the
//! engine on [`crate::surface::Surface`]: `on_inbound_command`,
//! `on_navigation_requested` and `on_console_message`.

use aerie_common::Result;

/// Callback invoked with the decoded JSON result of a script evaluation.
///
/// Fires at most once, and possibly never: a callback still queued (or in
/// flight) when the surface is torn down or a new document load is issued
/// is dropped without being called.
pub type ScriptCallback = Box<dyn FnOnce(serde_json::Value)>;

/// Operations the bridge issues against the rendering engine.
///
/// All engine callbacks are expected to be delivered on the host's single
/// control thread; engines without that guarantee must marshal them onto
/// the owning thread before calling back into the surface.
pub trait RenderEngine {
    /// Navigate the surface to `url`.
    fn load_url(&self, url: &str) -> Result<()>;

    /// Evaluate a script in the content context, discarding the result.
    fn evaluate_script(&self, js: &str) -> Result<()>;

    /// Evaluate a script and deliver its decoded result to `callback`.
    fn evaluate_script_with_callback(&self, js: &str, callback: ScriptCallback) -> Result<()>;

    /// Install the one-time input-focus observer on the surface's focus
    /// target. A hook for click-to-paste UX, not a correctness requirement.
    fn install_focus_observer(&self) {}
}
