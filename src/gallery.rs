use crate::query::{SortMode, ViewState};
use crate::types::DogeIndexEntry;
use serde::Serialize;

/// Fixed page size for the gallery grid
pub const PER_PAGE: usize = 60;

/// One computed gallery page: the visible slice plus the numbers the
/// pagination controls need.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryView {
    pub entries: Vec<DogeIndexEntry>,
    /// Filtered count before pagination
    pub total: usize,
    /// The page actually shown, after clamping into [1, total_pages]
    pub page: u32,
    pub total_pages: u32,
}

/// Search predicate: exact id match when the term parses as an integer,
/// plus substring matching over the decimal forms of the id and the
/// inscription number. The substring arms apply even for non-numeric
/// terms, so those degrade to substring-only matching instead of erroring.
fn matches_search(entry: &DogeIndexEntry, term: &str) -> bool {
    if let Ok(id) = term.parse::<u32>() {
        if entry.id == id {
            return true;
        }
    }
    entry.id.to_string().contains(term) || entry.inscription_number.to_string().contains(term)
}

/// Filter the index: the search predicate (if any) AND, per category with
/// selections, membership of the entry's value in the selected set.
pub fn filter_entries<'a>(index: &'a [DogeIndexEntry], state: &ViewState) -> Vec<&'a DogeIndexEntry> {
    index
        .iter()
        .filter(|entry| {
            if !state.search.is_empty() && !matches_search(entry, &state.search) {
                return false;
            }
            state.filters.iter().all(|(key, values)| {
                values.iter().any(|v| v == entry.attribute(key))
            })
        })
        .collect()
}

/// Compute the full view for a state: filter, sort, clamp, slice
pub fn view(index: &[DogeIndexEntry], state: &ViewState) -> GalleryView {
    let mut filtered = filter_entries(index, state);

    if state.sort == SortMode::Rarity {
        filtered.sort_by_key(|entry| entry.rank);
    }

    let total = filtered.len();
    let total_pages = (total.div_ceil(PER_PAGE)).max(1) as u32;
    let page = state.page.clamp(1, total_pages);

    let start = (page as usize - 1) * PER_PAGE;
    let entries = filtered
        .into_iter()
        .skip(start)
        .take(PER_PAGE)
        .cloned()
        .collect();

    GalleryView { entries, total, page, total_pages }
}
