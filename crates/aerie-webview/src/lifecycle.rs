//! Lifecycle guard and explicit host context.
//!
//! Content-originated events are delivered asynchronously and can race a
//! teardown initiated by the host between request and delivery. Every
//! inbound bridge event and every outstanding script callback consults the
//! guard before touching state; stale events are logged and discarded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use url::Url;

use crate::content::ContentStore;

/// Opens a URL outside the surface (e.g. the system browser).
/// Fire-and-forget.
pub trait LinkOpener {
    fn open(&self, url: &str);
}

impl<F: Fn(&str)> LinkOpener for F {
    fn open(&self, url: &str) {
        self(url)
    }
}

/// Shared flag tracking whether the host-side session object is present.
///
/// Surfaces that declare a session dependency become stale as soon as the
/// host flips this off (e.g. while the user's profile is closed).
#[derive(Clone, Default)]
pub struct SessionFlag(Arc<AtomicBool>);

impl SessionFlag {
    pub fn new(active: bool) -> Self {
        Self(Arc::new(AtomicBool::new(active)))
    }

    pub fn set_active(&self, active: bool) {
        self.0.store(active, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Capabilities the bridge needs from the host, passed in at construction
/// instead of reached for through ambient globals.
pub struct HostContext {
    base_url: Url,
    session: SessionFlag,
    opener: Arc<dyn LinkOpener>,
    store: Arc<ContentStore>,
}

impl HostContext {
    pub fn new(
        base_url: Url,
        session: SessionFlag,
        opener: Arc<dyn LinkOpener>,
        store: Arc<ContentStore>,
    ) -> Self {
        Self {
            base_url,
            session,
            opener,
            store,
        }
    }

    /// Origin the host serves content from.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &SessionFlag {
        &self.session
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Hand a URL to the external link opener.
    pub fn open_external(&self, url: &str) {
        self.opener.open(url);
    }
}

/// Detects late events arriving after the surface's backing resources are
/// gone or its required session context disappeared.
///
/// Shared with in-flight script callbacks via `Arc`, so all fields are
/// atomics.
pub struct LifecycleGuard {
    torn_down: AtomicBool,
    requires_session: AtomicBool,
    session: SessionFlag,
}

impl LifecycleGuard {
    /// Surfaces depend on the session by default; callers that outlive it
    /// opt out via [`set_requires_session`].
    ///
    /// [`set_requires_session`]: LifecycleGuard::set_requires_session
    pub fn new(session: SessionFlag) -> Self {
        Self {
            torn_down: AtomicBool::new(false),
            requires_session: AtomicBool::new(true),
            session,
        }
    }

    /// True once teardown ran, or the surface needs a session that is gone.
    pub fn is_stale(&self) -> bool {
        if self.torn_down.load(Ordering::SeqCst) {
            return true;
        }
        self.requires_session.load(Ordering::SeqCst) && !self.session.is_active()
    }

    /// Mark the surface torn down. Returns true only for the first call,
    /// so teardown side effects run exactly once.
    pub fn mark_torn_down(&self) -> bool {
        !self.torn_down.swap(true, Ordering::SeqCst)
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    pub fn set_requires_session(&self, requires: bool) {
        self.requires_session.store(requires, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_guard_with_active_session_is_not_stale() {
        let guard = LifecycleGuard::new(SessionFlag::new(true));
        assert!(!guard.is_stale());
    }

    #[test]
    fn missing_session_makes_guard_stale() {
        let session = SessionFlag::new(true);
        let guard = LifecycleGuard::new(session.clone());
        session.set_active(false);
        assert!(guard.is_stale());
        session.set_active(true);
        assert!(!guard.is_stale(), "staleness from session loss is reversible");
    }

    #[test]
    fn session_independent_surface_survives_session_loss() {
        let session = SessionFlag::new(false);
        let guard = LifecycleGuard::new(session);
        guard.set_requires_session(false);
        assert!(!guard.is_stale());
    }

    #[test]
    fn teardown_is_sticky() {
        let guard = LifecycleGuard::new(SessionFlag::new(true));
        assert!(guard.mark_torn_down());
        assert!(guard.is_stale());
        assert!(guard.is_torn_down());
    }

    #[test]
    fn mark_torn_down_reports_first_call_only() {
        let guard = LifecycleGuard::new(SessionFlag::new(true));
        assert!(guard.mark_torn_down());
        assert!(!guard.mark_torn_down());
    }

    #[test]
    fn closure_acts_as_link_opener() {
        use std::cell::RefCell;
        let opened = RefCell::new(Vec::new());
        let opener = |url: &str| opened.borrow_mut().push(url.to_string());
        opener.open("https://example.com/manual");
        assert_eq!(*opened.borrow(), ["https://example.com/manual"]);
    }
}
