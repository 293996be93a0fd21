use crate::types::FILTER_KEYS;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::form_urlencoded;

/// Gallery sort order. Identifier order is the default and is omitted from
/// the encoded query; rarity sorts by ascending rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Id,
    Rarity,
}

/// The complete gallery view state. The canonical representation is the
/// location's query string; this struct is always derived from it and
/// encoded back, never stored independently.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    /// Selected values per filter short key; absent key = no constraint
    pub filters: HashMap<String, Vec<String>>,
    pub search: String,
    pub sort: SortMode,
    /// 1-based; clamped against the filtered total at render time
    pub page: u32,
}

/// One user interaction, expressed as a state transformation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum StateUpdate {
    SetFilter { key: String, values: Vec<String> },
    SetSearch { term: String },
    SetSort { sort: SortMode },
    SetPage { page: u32 },
    ClearAll,
}

impl ViewState {
    /// Decode a query string (no leading '?'). Unknown parameters are
    /// ignored; an unparseable or zero `page` silently becomes 1.
    pub fn from_query(query: &str) -> ViewState {
        let mut state = ViewState { page: 1, ..ViewState::default() };

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if FILTER_KEYS.contains(&key.as_ref()) {
                let values: Vec<String> = value
                    .split(',')
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect();
                if !values.is_empty() {
                    state.filters.insert(key.into_owned(), values);
                }
            } else if key == "search" {
                state.search = value.into_owned();
            } else if key == "sort" {
                state.sort = if value == "rarity" { SortMode::Rarity } else { SortMode::Id };
            } else if key == "page" {
                state.page = value.parse().ok().filter(|&p| p >= 1).unwrap_or(1);
            }
        }

        state
    }

    /// Encode back to a query string, omitting every default (empty
    /// filters/search, id sort, page 1). Filter keys appear in canonical
    /// order so equal states encode identically.
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        for key in FILTER_KEYS {
            if let Some(values) = self.filters.get(key) {
                if !values.is_empty() {
                    serializer.append_pair(key, &values.join(","));
                }
            }
        }
        if !self.search.is_empty() {
            serializer.append_pair("search", &self.search);
        }
        if self.sort == SortMode::Rarity {
            serializer.append_pair("sort", "rarity");
        }
        if self.page > 1 {
            serializer.append_pair("page", &self.page.to_string());
        }

        serializer.finish()
    }

    /// Apply one interaction. Everything except an explicit page change
    /// resets the page; clearing removes every recognized parameter.
    pub fn apply(&self, update: StateUpdate) -> ViewState {
        let mut next = self.clone();
        match update {
            StateUpdate::SetFilter { key, values } => {
                if values.is_empty() {
                    next.filters.remove(&key);
                } else {
                    next.filters.insert(key, values);
                }
                next.page = 1;
            }
            StateUpdate::SetSearch { term } => {
                next.search = term;
                next.page = 1;
            }
            StateUpdate::SetSort { sort } => {
                next.sort = sort;
                next.page = 1;
            }
            StateUpdate::SetPage { page } => {
                next.page = page.max(1);
            }
            StateUpdate::ClearAll => {
                next = ViewState { page: 1, ..ViewState::default() };
            }
        }
        next
    }
}

/// Transform a query string by one interaction, returning the new query string
pub fn apply_update(query: &str, update: StateUpdate) -> String {
    ViewState::from_query(query).apply(update).to_query()
}

/// Gallery route for a query string: "/" when empty, "/?{query}" otherwise
pub fn gallery_route(query: &str) -> String {
    if query.is_empty() {
        "/".to_string()
    } else {
        format!("/?{}", query)
    }
}

/// A route is a gallery route iff its path is the root, any query allowed
pub fn is_gallery_route(route: &str) -> bool {
    route == "/" || route.starts_with("/?")
}
