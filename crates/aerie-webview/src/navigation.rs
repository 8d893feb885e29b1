//! Navigation interception policy.
//!
//! Every requested page transition is classified per attempt, nothing is
//! persisted: the surface either lets the engine handle it, swallows it,
//! or swallows it and delegates the URL to the external link opener.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::content::{PAGES_PREFIX, PAGE_DATA_PATH};

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationDecision {
    /// Let the engine perform the transition.
    Allow,
    /// Swallow the transition; nothing else happens.
    Suppress,
    /// Swallow the in-surface transition and open the URL externally.
    Delegate,
}

/// Per-surface navigation policy.
#[derive(Debug, Clone)]
pub struct NavigationPolicy {
    open_links_externally: bool,
}

impl NavigationPolicy {
    pub fn new() -> Self {
        Self {
            open_links_externally: true,
        }
    }

    /// When disabled, all navigation stays in-surface (engine default
    /// handling), used by pages that navigate between internal routes.
    pub fn set_open_links_externally(&mut self, enable: bool) {
        self.open_links_externally = enable;
    }

    pub fn open_links_externally(&self) -> bool {
        self.open_links_externally
    }

    /// Classify one navigation attempt.
    pub fn decide(&self, target: &str, is_main_frame: bool, own_origin: &Url) -> NavigationDecision {
        let parsed = Url::parse(target).ok();

        // Internal routes and in-page mode use the engine's own handling.
        if !self.open_links_externally || is_internal_route(parsed.as_ref()) {
            return NavigationDecision::Allow;
        }

        // Subframe navigations (internal iframes) are never delegated.
        if !is_main_frame {
            return NavigationDecision::Allow;
        }

        let Some(target_url) = parsed else {
            debug!(target, "unparsable navigation target, delegating");
            return NavigationDecision::Delegate;
        };

        // Inline-generated documents produced by the engine itself.
        if target_url.scheme() == "data" {
            return NavigationDecision::Allow;
        }

        // A full same-origin navigation here means a local anchor's onclick
        // handler forgot to return false; swallow it rather than reloading.
        if same_origin(&target_url, own_origin) {
            warn!(target, "suppressed same-origin navigation from content");
            return NavigationDecision::Suppress;
        }

        NavigationDecision::Delegate
    }
}

impl Default for NavigationPolicy {
    fn default() -> Self {
        Self::new()
    }
}

fn is_internal_route(target: Option<&Url>) -> bool {
    let Some(url) = target else {
        return false;
    };
    url.path().contains(PAGES_PREFIX) || url.path() == PAGE_DATA_PATH
}

/// Scheme, host and port must match exactly; fragment and path are ignored.
fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host() == b.host()
        && a.port_or_known_default() == b.port_or_known_default()
}
