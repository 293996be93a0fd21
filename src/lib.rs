use std::cell::RefCell;
use wasm_bindgen::prelude::*;

pub mod build;
pub mod detail;
pub mod gallery;
pub mod nav;
pub mod query;
pub mod rarity;
pub mod types;

use gallery::GalleryView;
use query::{StateUpdate, ViewState};
use types::{DogeIndexEntry, TraitCategory};

/// Gallery engine state: the two build-time artifacts, loaded once and
/// queried in memory on every interaction
pub struct GalleryEngine {
    index: Vec<DogeIndexEntry>,
    traits: Vec<TraitCategory>,
}

impl GalleryEngine {
    /// Create an engine from the deserialized artifacts
    pub fn from_artifacts(index: Vec<DogeIndexEntry>, traits: Vec<TraitCategory>) -> Self {
        GalleryEngine { index, traits }
    }

    pub fn item_count(&self) -> usize {
        self.index.len()
    }

    pub fn trait_categories(&self) -> &[TraitCategory] {
        &self.traits
    }

    /// Compute the view for a location's query string. The query string is
    /// the only source of view state, so a reloaded or shared URL yields
    /// the identical page.
    pub fn view(&self, query: &str) -> GalleryView {
        let state = ViewState::from_query(query);
        gallery::view(&self.index, &state)
    }
}

// Use thread_local with RefCell for lazy initialization from JS
thread_local! {
    static ENGINE: RefCell<Option<GalleryEngine>> = const { RefCell::new(None) };
}

fn with_engine<T>(f: impl FnOnce(&GalleryEngine) -> T) -> Result<T, JsError> {
    ENGINE.with(|engine| {
        let engine_ref = engine.borrow();
        match engine_ref.as_ref() {
            Some(eng) => Ok(f(eng)),
            None => Err(JsError::new(
                "Engine not initialized. Call init_engine(index_json, traits_json) first.",
            )),
        }
    })
}

/// Initialize the gallery engine from the two artifact JSON strings
/// (doges-index.json and trait-values.json contents)
#[wasm_bindgen]
pub fn init_engine(index_json: &str, traits_json: &str) -> Result<(), JsError> {
    let index: Vec<DogeIndexEntry> = serde_json::from_str(index_json)
        .map_err(|e| JsError::new(&format!("Failed to parse index: {}", e)))?;

    let traits: Vec<TraitCategory> = serde_json::from_str(traits_json)
        .map_err(|e| JsError::new(&format!("Failed to parse trait summary: {}", e)))?;

    ENGINE.with(|engine| {
        *engine.borrow_mut() = Some(GalleryEngine::from_artifacts(index, traits));
    });

    Ok(())
}

/// Check if the engine has been initialized
#[wasm_bindgen]
pub fn is_engine_ready() -> bool {
    ENGINE.with(|engine| engine.borrow().is_some())
}

/// Total number of items in the collection
#[wasm_bindgen]
pub fn item_count() -> Result<usize, JsError> {
    with_engine(|eng| eng.item_count())
}

/// Compute the gallery view for a query string and return it as JSON
/// (entries of the requested page, total, clamped page, totalPages)
#[wasm_bindgen]
pub fn query_gallery(query: &str) -> Result<String, JsError> {
    #[cfg(target_arch = "wasm32")]
    let start = js_sys::Date::now();

    let result = with_engine(|eng| {
        let view = eng.view(query);
        #[cfg(target_arch = "wasm32")]
        web_sys::console::log_1(
            &format!(
                "[perf] query='{}' matched={} page={}/{} | {:.1}ms",
                query,
                view.total,
                view.page,
                view.total_pages,
                js_sys::Date::now() - start
            )
            .into(),
        );
        serde_json::to_string(&view).unwrap_or_else(|_| "{}".to_string())
    })?;

    Ok(result)
}

/// The trait filter option lists as JSON
#[wasm_bindgen]
pub fn trait_categories() -> Result<String, JsError> {
    with_engine(|eng| {
        serde_json::to_string(eng.trait_categories()).unwrap_or_else(|_| "[]".to_string())
    })
}

/// Apply one interaction (JSON StateUpdate, e.g.
/// `{"op":"setFilter","key":"bg","values":["Blue"]}`) to the current query
/// string and return the gallery route to navigate to.
#[wasm_bindgen]
pub fn apply_gallery_update(query: &str, update_json: &str) -> Result<String, JsError> {
    let update: StateUpdate = serde_json::from_str(update_json)
        .map_err(|e| JsError::new(&format!("Failed to parse update: {}", e)))?;
    Ok(query::gallery_route(&query::apply_update(query, update)))
}

/// Prev/next item ids for a detail page, as JSON (`null` when the id is
/// outside the collection)
#[wasm_bindgen]
pub fn detail_neighbors(id: u32) -> Result<String, JsError> {
    with_engine(|eng| {
        let neighbors = detail::neighbors(id, eng.item_count() as u32);
        serde_json::to_string(&neighbors).unwrap_or_else(|_| "null".to_string())
    })
}

/// Record a route observation in the session-scoped navigation history
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn track_route(route: &str) {
    let history = nav::NavigationHistory::new(nav::WebSessionStore::new(), nav::browser_session_id());
    history.track_route(route);
}

/// Resolve the "back to gallery" action. Returns `None` when the shell
/// should call history.back(), otherwise the route to push.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn resolve_back(history_length: u32) -> Option<String> {
    let history = nav::NavigationHistory::new(nav::WebSessionStore::new(), nav::browser_session_id());
    match history.resolve_back(history_length) {
        nav::BackAction::HistoryBack => None,
        nav::BackAction::Navigate(route) => Some(route),
    }
}
