//! Command bridge for embedded web content surfaces.
//!
//! Mediates all interaction between host-side logic and a rendered
//! HTML/JS document, treating the rendering engine as a black box:
//! - Readiness tracking per loaded document (the content signals it
//!   finished bootstrapping via a sentinel command)
//! - FIFO action queue for host-issued operations, gated on readiness
//! - Bidirectional command channel (content -> host strings,
//!   host -> content JSON results)
//! - Navigation interception (internal route / subframe / inline-data
//!   handling, external link delegation)
//! - Stale-event suppression after teardown or session loss

pub mod bridge;
pub mod console;
pub mod content;
pub mod engine;
pub mod hooks;
pub mod lifecycle;
pub mod navigation;
pub mod queue;
pub mod surface;

pub use bridge::{compose_bootstrap_script, load_bootstrap_script, CommandHandler, READY_SENTINEL};
pub use console::ConsoleLevel;
pub use content::{ContentStore, PageContent};
pub use engine::{RenderEngine, ScriptCallback};
pub use hooks::HookBus;
pub use lifecycle::{HostContext, LifecycleGuard, LinkOpener, SessionFlag};
pub use navigation::{NavigationDecision, NavigationPolicy};
pub use queue::{ActionQueue, LoadTarget, PendingAction, ReadinessState};
pub use surface::Surface;
