use crate::types::DogeDetail;
use serde::Serialize;
use std::collections::HashMap;

/// Adjacent item ids for the detail page's prev/next links, clamped at the
/// collection boundaries (no wraparound)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Neighbors {
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

/// Prev/next ids for `id` in a collection of `total` items. Ids outside
/// [1, total] are rejected; the page-generation shell turns that into its
/// own not-found handling.
pub fn neighbors(id: u32, total: u32) -> Option<Neighbors> {
    if id < 1 || id > total {
        return None;
    }
    Some(Neighbors {
        prev: (id > 1).then(|| id - 1),
        next: (id < total).then(|| id + 1),
    })
}

/// Look up one item's detail record. Absent ids are a not-found condition,
/// not an error.
pub fn find_detail(details: &HashMap<u32, DogeDetail>, id: u32) -> Option<&DogeDetail> {
    details.get(&id)
}
