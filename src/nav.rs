use crate::query::is_gallery_route;
use std::cell::RefCell;
use std::collections::HashMap;

const CURRENT_ROUTE_KEY: &str = "minidoge:currentRoute";
const PREVIOUS_ROUTE_KEY: &str = "minidoge:previousRoute";
const LAST_GALLERY_URL_KEY: &str = "minidoge:lastGalleryUrl";
const DOC_ID_KEY: &str = "minidoge:docId";

/// A session-lifetime key/value store. The browser implementation wraps
/// sessionStorage; tests use [`MemoryStore`]. A store that is unavailable
/// (no browsing context) simply returns `None` and drops writes.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

/// In-memory store for tests and non-browser hosts
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
    }
    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// sessionStorage-backed store. All failures (storage disabled, quota)
/// degrade to no-ops, matching the tracker's never-throw contract.
#[cfg(target_arch = "wasm32")]
pub struct WebSessionStore {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl WebSessionStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.session_storage().ok().flatten());
        WebSessionStore { storage }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for WebSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl SessionStore for WebSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }
    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            let _ = storage.set_item(key, value);
        }
    }
    fn remove(&self, key: &str) {
        if let Some(storage) = &self.storage {
            let _ = storage.remove_item(key);
        }
    }
}

/// Session identity of the current document. sessionStorage outlives a
/// reload, so routes tracked before the reload must not leak into the new
/// document's back behavior; `performance.timeOrigin` changes per document
/// and serves as the boundary marker.
#[cfg(target_arch = "wasm32")]
pub fn browser_session_id() -> String {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.time_origin().to_string())
        .unwrap_or_default()
}

/// What the "back to gallery" affordance should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackAction {
    /// Native history back: the previous route is a gallery view and the
    /// history stack is deep enough to land on it
    HistoryBack,
    /// Push the given route instead
    Navigate(String),
}

/// Three session-scoped slots (current, previous, last gallery route)
/// behind a single staleness-guarded entry point.
pub struct NavigationHistory<S: SessionStore> {
    store: S,
    session_id: String,
}

impl<S: SessionStore> NavigationHistory<S> {
    pub fn new(store: S, session_id: impl Into<String>) -> Self {
        NavigationHistory { store, session_id: session_id.into() }
    }

    /// Every accessor funnels through here: a marker mismatch means the
    /// stored routes belong to a previous document, so current/previous
    /// are cleared. The last gallery route survives on purpose, so a
    /// reloaded detail page can still offer a way back.
    fn ensure_session(&self) {
        if self.store.get(DOC_ID_KEY).as_deref() != Some(self.session_id.as_str()) {
            self.store.set(DOC_ID_KEY, &self.session_id);
            self.store.remove(CURRENT_ROUTE_KEY);
            self.store.remove(PREVIOUS_ROUTE_KEY);
        }
    }

    /// Record a route observation: promote a differing current route to
    /// previous, store the new current, and remember gallery routes.
    pub fn track_route(&self, route: &str) {
        self.ensure_session();

        if let Some(current) = self.store.get(CURRENT_ROUTE_KEY) {
            if current != route {
                self.store.set(PREVIOUS_ROUTE_KEY, &current);
            }
        }
        self.store.set(CURRENT_ROUTE_KEY, route);

        if is_gallery_route(route) {
            self.store.set(LAST_GALLERY_URL_KEY, route);
        }
    }

    pub fn previous_route(&self) -> Option<String> {
        self.ensure_session();
        self.store.get(PREVIOUS_ROUTE_KEY)
    }

    pub fn last_gallery_route(&self) -> Option<String> {
        self.ensure_session();
        self.store.get(LAST_GALLERY_URL_KEY)
    }

    /// Back policy: native back only when the previous route is a gallery
    /// route and the history stack has somewhere to go; otherwise the last
    /// recorded gallery route; otherwise the root. Handles direct entry to
    /// a detail page, post-reload sessions (depth 1), and a previous route
    /// that is itself a detail page.
    pub fn resolve_back(&self, history_len: u32) -> BackAction {
        let previous_is_gallery = self
            .previous_route()
            .map(|route| is_gallery_route(&route))
            .unwrap_or(false);

        if history_len > 1 && previous_is_gallery {
            return BackAction::HistoryBack;
        }

        let fallback = self.last_gallery_route().unwrap_or_else(|| "/".to_string());
        BackAction::Navigate(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(session: &str) -> NavigationHistory<MemoryStore> {
        NavigationHistory::new(MemoryStore::default(), session)
    }

    #[test]
    fn test_gallery_then_detail_uses_native_back() {
        let nav = tracker("s1");
        nav.track_route("/");
        nav.track_route("/doge/5");
        assert_eq!(nav.resolve_back(2), BackAction::HistoryBack);
    }

    #[test]
    fn test_direct_detail_entry_falls_back_to_root() {
        let nav = tracker("s1");
        nav.track_route("/doge/5");
        assert_eq!(nav.resolve_back(1), BackAction::Navigate("/".to_string()));
    }

    #[test]
    fn test_depth_one_skips_native_back() {
        // Previous route is a gallery route but the history stack was
        // reset (reload), so native back would leave the site.
        let nav = tracker("s1");
        nav.track_route("/?bg=Blue");
        nav.track_route("/doge/5");
        assert_eq!(
            nav.resolve_back(1),
            BackAction::Navigate("/?bg=Blue".to_string())
        );
    }

    #[test]
    fn test_detail_to_detail_prefers_last_gallery() {
        let nav = tracker("s1");
        nav.track_route("/?sort=rarity&page=3");
        nav.track_route("/doge/5");
        nav.track_route("/doge/6");
        // Previous route is another detail page: skip native back even
        // though the stack is deep, and restore the saved gallery view.
        assert_eq!(
            nav.resolve_back(3),
            BackAction::Navigate("/?sort=rarity&page=3".to_string())
        );
    }

    #[test]
    fn test_same_route_does_not_become_previous() {
        let nav = tracker("s1");
        nav.track_route("/doge/5");
        nav.track_route("/doge/5");
        assert_eq!(nav.previous_route(), None);
    }

    #[test]
    fn test_tracks_last_gallery_with_query() {
        let nav = tracker("s1");
        nav.track_route("/?bg=Blue&page=2");
        nav.track_route("/doge/1");
        assert_eq!(nav.last_gallery_route().as_deref(), Some("/?bg=Blue&page=2"));
    }

    #[test]
    fn test_stale_session_clears_routes_but_keeps_gallery() {
        let store = MemoryStore::default();
        {
            let nav = NavigationHistory::new(&store, "s1");
            nav.track_route("/?page=4");
            nav.track_route("/doge/9");
        }
        let nav = NavigationHistory::new(&store, "s2");
        assert_eq!(nav.previous_route(), None);
        assert_eq!(nav.last_gallery_route().as_deref(), Some("/?page=4"));
        // New document, depth 1: must fall back to the saved gallery view
        assert_eq!(
            nav.resolve_back(1),
            BackAction::Navigate("/?page=4".to_string())
        );
    }

    #[test]
    fn test_fresh_tracker_resolves_to_root() {
        let nav = tracker("s1");
        assert_eq!(nav.resolve_back(1), BackAction::Navigate("/".to_string()));
    }
}
