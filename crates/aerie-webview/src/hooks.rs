//! Hook bus: lifecycle notifications and inbound-command filters.
//!
//! External subscribers (extensions, embedding application code) get first
//! refusal on inbound commands before the surface's registered handler,
//! and are notified of content/style/theme lifecycle moments.

use serde_json::Value;

use crate::content::PageContent;

type CommandFilter = Box<dyn FnMut(&str) -> Option<Value>>;
type ContentHook = Box<dyn FnMut(&mut PageContent)>;
type NotifyHook = Box<dyn FnMut()>;

/// Per-surface subscriber registry.
#[derive(Default)]
pub struct HookBus {
    command_filters: Vec<CommandFilter>,
    content_will_set: Vec<ContentHook>,
    style_injected: Vec<NotifyHook>,
    theme_changed: Vec<NotifyHook>,
}

impl HookBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a command filter. Returning `Some` claims the command.
    pub fn on_command(&mut self, filter: impl FnMut(&str) -> Option<Value> + 'static) {
        self.command_filters.push(Box::new(filter));
    }

    /// Subscribe to content-about-to-be-set; the page content is mutable.
    pub fn on_content_will_set(&mut self, hook: impl FnMut(&mut PageContent) + 'static) {
        self.content_will_set.push(Box::new(hook));
    }

    pub fn on_style_injected(&mut self, hook: impl FnMut() + 'static) {
        self.style_injected.push(Box::new(hook));
    }

    pub fn on_theme_changed(&mut self, hook: impl FnMut() + 'static) {
        self.theme_changed.push(Box::new(hook));
    }

    /// Offer a command to filters in subscription order; the first `Some`
    /// wins and later filters are not consulted.
    pub fn dispatch_command(&mut self, cmd: &str) -> Option<Value> {
        for filter in &mut self.command_filters {
            if let Some(result) = filter(cmd) {
                return Some(result);
            }
        }
        None
    }

    pub fn notify_content_will_set(&mut self, content: &mut PageContent) {
        for hook in &mut self.content_will_set {
            hook(content);
        }
    }

    pub fn notify_style_injected(&mut self) {
        for hook in &mut self.style_injected {
            hook();
        }
    }

    pub fn notify_theme_changed(&mut self) {
        for hook in &mut self.theme_changed {
            hook();
        }
    }
}
