//! The surface orchestrator.
//!
//! One `Surface` per embedded content area: it owns the action queue, the
//! lifecycle guard, the hook bus and the registered command handler, and
//! exposes the three entry points the rendering engine calls back into
//! (`on_inbound_command`, `on_navigation_requested`, `on_console_message`).
//!
//! All host-facing operations are fire-and-continue; work that cannot run
//! yet sits in the queue until the document's bootstrap sentinel arrives.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use aerie_common::{Result, SurfaceId};

use crate::bridge::{CommandHandler, READY_SENTINEL};
use crate::console::{format_console_message, ConsoleLevel};
use crate::content::{build_document, page_data_url, PageContent};
use crate::engine::RenderEngine;
use crate::hooks::HookBus;
use crate::lifecycle::{HostContext, LifecycleGuard};
use crate::navigation::{NavigationDecision, NavigationPolicy};
use crate::queue::{ActionQueue, LoadTarget, PendingAction};

pub struct Surface<E: RenderEngine> {
    id: SurfaceId,
    title: String,
    engine: E,
    ctx: HostContext,
    guard: Arc<LifecycleGuard>,
    queue: ActionQueue,
    hooks: HookBus,
    policy: NavigationPolicy,
    handler: Option<CommandHandler>,
    focus_observed: bool,
}

impl<E: RenderEngine> Surface<E> {
    pub fn new(engine: E, ctx: HostContext) -> Self {
        let guard = Arc::new(LifecycleGuard::new(ctx.session().clone()));
        Self {
            id: SurfaceId::new(),
            title: "default".into(),
            engine,
            ctx,
            guard,
            queue: ActionQueue::new(),
            hooks: HookBus::new(),
            policy: NavigationPolicy::new(),
            handler: None,
            focus_observed: false,
        }
    }

    pub fn id(&self) -> &SurfaceId {
        &self.id
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn guard(&self) -> Arc<LifecycleGuard> {
        Arc::clone(&self.guard)
    }

    pub fn hooks_mut(&mut self) -> &mut HookBus {
        &mut self.hooks
    }

    pub fn set_open_links_externally(&mut self, enable: bool) {
        self.policy.set_open_links_externally(enable);
    }

    /// Opt out of the session dependency (e.g. surfaces shown while the
    /// user's profile is closed).
    pub fn set_requires_session(&mut self, requires: bool) {
        self.guard.set_requires_session(requires);
    }

    // ---------------------------------------------------------------------
    // Host-issued operations
    // ---------------------------------------------------------------------

    /// Navigate to a URL. Discards everything queued against the previous
    /// document; scripts queued after this run only once the new document
    /// signals ready.
    pub fn load_url(&mut self, url: impl Into<String>) {
        self.queue.reset_for_new_content();
        self.enqueue(PendingAction::LoadContent(LoadTarget::Url(url.into())));
    }

    /// Replace the document with generated HTML, transported through the
    /// content store rather than injected inline.
    pub fn set_html(&mut self, html: impl Into<String>) {
        self.queue.reset_for_new_content();
        self.policy.set_open_links_externally(true);
        self.enqueue(PendingAction::LoadContent(LoadTarget::Html(html.into())));
    }

    /// Compose and load a standard page, giving content-will-set hook
    /// subscribers a chance to amend it first.
    pub fn set_standard_page(&mut self, mut content: PageContent) {
        self.hooks.notify_content_will_set(&mut content);
        let html = build_document(&self.title, &content, self.ctx.base_url());
        self.set_html(html);
    }

    /// Evaluate a script once the current document is ready.
    pub fn eval(&mut self, js: impl Into<String>) {
        self.enqueue(PendingAction::EvalScript {
            js: js.into(),
            callback: None,
        });
    }

    /// Evaluate a script and deliver its decoded result to `callback`.
    /// The callback never fires if the action is dropped by a new load or
    /// the surface goes stale before the result arrives.
    pub fn eval_with_callback(
        &mut self,
        js: impl Into<String>,
        callback: impl FnOnce(Value) + 'static,
    ) {
        self.enqueue(PendingAction::EvalScript {
            js: js.into(),
            callback: Some(Box::new(callback)),
        });
    }

    /// Register the fallback handler for inbound commands.
    pub fn set_command_handler(
        &mut self,
        handler: impl FnMut(&str) -> Result<Value> + 'static,
    ) {
        self.handler = Some(Box::new(handler));
    }

    pub fn reset_handler(&mut self) {
        self.handler = None;
    }

    pub fn notify_style_injected(&mut self) {
        self.hooks.notify_style_injected();
    }

    pub fn notify_theme_changed(&mut self) {
        self.hooks.notify_theme_changed();
    }

    /// Release backing resources: subsequent events are stale and the
    /// surface's page blob is removed from the store. Idempotent.
    pub fn teardown(&mut self) {
        if !self.guard.mark_torn_down() {
            return;
        }
        self.queue.reset_for_new_content();
        self.ctx.store().remove(&self.id);
        debug!(surface = %self.id, "surface torn down");
    }

    // ---------------------------------------------------------------------
    // Queue pump
    // ---------------------------------------------------------------------

    fn enqueue(&mut self, action: PendingAction) {
        self.queue.enqueue(action);
        self.pump();
    }

    fn pump(&mut self) {
        while let Some(action) = self.queue.pop_runnable() {
            if let Err(err) = self.execute(action) {
                warn!(surface = %self.id, %err, "queued action failed");
            }
        }
    }

    fn execute(&mut self, action: PendingAction) -> Result<()> {
        match action {
            PendingAction::LoadContent(target) => {
                self.queue.begin_load();
                let url = match target {
                    LoadTarget::Url(url) => url,
                    LoadTarget::Html(html) => {
                        self.ctx.store().put(self.id.clone(), html.into_bytes());
                        page_data_url(self.ctx.base_url(), &self.id)
                    }
                };
                self.engine.load_url(&url)
            }
            PendingAction::EvalScript { js, callback } => match callback {
                None => self.engine.evaluate_script(&js),
                Some(cb) => {
                    let guard = Arc::clone(&self.guard);
                    self.engine.evaluate_script_with_callback(
                        &js,
                        Box::new(move |value| {
                            if guard.is_stale() {
                                debug!("ignored late script callback");
                                return;
                            }
                            cb(value)
                        }),
                    )
                }
            },
        }
    }

    // ---------------------------------------------------------------------
    // Engine entry points
    // ---------------------------------------------------------------------

    /// Inbound command from content. Returns the JSON text handed back
    /// into the engine's callback mechanism; always well-formed, `"null"`
    /// when there is no result.
    pub fn on_inbound_command(&mut self, raw: &str) -> String {
        match self.dispatch_command(raw) {
            Some(value) => serde_json::to_string(&value).unwrap_or_else(|err| {
                warn!(surface = %self.id, %err, "result not serializable");
                "null".into()
            }),
            None => "null".into(),
        }
    }

    fn dispatch_command(&mut self, raw: &str) -> Option<Value> {
        if self.guard.is_stale() {
            debug!(surface = %self.id, cmd = raw, "ignored late bridge command");
            return None;
        }

        if !self.focus_observed {
            self.engine.install_focus_observer();
            self.focus_observed = true;
        }

        if raw == READY_SENTINEL {
            self.queue.mark_ready();
            self.pump();
            return None;
        }

        if let Some(result) = self.hooks.dispatch_command(raw) {
            return Some(result);
        }

        match &mut self.handler {
            Some(handler) => match handler(raw) {
                Ok(value) => Some(value),
                Err(err) => {
                    warn!(surface = %self.id, cmd = raw, %err, "command handler failed");
                    None
                }
            },
            None => {
                debug!(cmd = raw, "unhandled bridge command");
                None
            }
        }
    }

    /// Navigation attempt from the engine. Returns whether the engine
    /// should perform the transition itself.
    pub fn on_navigation_requested(&mut self, url: &str, is_main_frame: bool) -> bool {
        match self.policy.decide(url, is_main_frame, self.ctx.base_url()) {
            NavigationDecision::Allow => true,
            NavigationDecision::Suppress => false,
            NavigationDecision::Delegate => {
                self.ctx.open_external(url);
                false
            }
        }
    }

    /// Console output from content, routed to the host's log.
    pub fn on_console_message(&self, level: ConsoleLevel, msg: &str, line: u32, src_id: &str) {
        let Some(text) = format_console_message(level, msg, line, src_id) else {
            return;
        };
        match level {
            ConsoleLevel::Error => error!(surface = %self.id, "{text}"),
            ConsoleLevel::Warning => warn!(surface = %self.id, "{text}"),
            _ => info!(surface = %self.id, "{text}"),
        }
    }
}
