use crate::rarity::{rarity_score, round1};
use crate::types::{DogeIndexEntry, RawCollection, RawItem, TraitCategory, TraitValue};
use crate::types::ATTRIBUTE_CATEGORIES;
use std::collections::HashMap;
use std::path::Path;

#[cfg(feature = "native")]
use rayon::prelude::*;

/// Frequency bucket for items missing a category. Internal to rarity
/// computation; the persisted index stores absent attributes as "".
const NONE_VALUE: &str = "None";

/// Build-time failures are fatal: no partial artifacts are ever written.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("itemId {raw:?} is not a decimal integer")]
    InvalidItemId { raw: String },
    #[error("metadata declares {declared} items but contains {actual}")]
    TotalMismatch { declared: u64, actual: usize },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-category value frequencies: category display name -> value -> count.
/// A missing attribute counts toward the synthetic "None" value.
pub fn attribute_frequencies(items: &[RawItem]) -> HashMap<&'static str, HashMap<String, u32>> {
    let mut freqs: HashMap<&'static str, HashMap<String, u32>> = HashMap::new();

    for (name, _) in ATTRIBUTE_CATEGORIES {
        let counts = freqs.entry(name).or_default();
        for item in items {
            let value = item.attributes.get(name).map(String::as_str).unwrap_or(NONE_VALUE);
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }
    }

    freqs
}

/// The seven display attribute values of one raw item, empty string when absent
fn display_values(item: &RawItem) -> [String; 7] {
    ATTRIBUTE_CATEGORIES
        .map(|(name, _)| item.attributes.get(name).cloned().unwrap_or_default())
}

fn parse_item_id(item: &RawItem) -> Result<u32, BuildError> {
    item.item_id.parse().map_err(|_| BuildError::InvalidItemId {
        raw: item.item_id.clone(),
    })
}

/// Build the gallery index: rarity-score every item at full precision,
/// assign ranks by stable descending sort (ties keep input order), round
/// scores to one decimal only after ranking, and return the entries
/// ordered by ascending id for default display.
pub fn build_index(raw: &RawCollection) -> Result<Vec<DogeIndexEntry>, BuildError> {
    if raw.total as usize != raw.data.len() {
        return Err(BuildError::TotalMismatch {
            declared: raw.total,
            actual: raw.data.len(),
        });
    }

    let freqs = attribute_frequencies(&raw.data);
    let total = raw.data.len() as u32;

    let score_item = |item: &RawItem| -> Result<(DogeIndexEntry, f64), BuildError> {
        let id = parse_item_id(item)?;
        let category_freqs: Vec<u32> = ATTRIBUTE_CATEGORIES
            .iter()
            .map(|(name, _)| {
                let value = item.attributes.get(*name).map(String::as_str).unwrap_or(NONE_VALUE);
                freqs[name][value]
            })
            .collect();
        let raw_score = rarity_score(total, &category_freqs);

        let [bg, fur, eyes, mouth, head, body, mouth_acc] = display_values(item);
        let entry = DogeIndexEntry {
            id,
            inscription_number: item.inscription_number,
            score: 0.0, // filled in after ranking
            rank: 0,
            bg,
            fur,
            eyes,
            mouth,
            head,
            body,
            mouth_acc,
        };
        Ok((entry, raw_score))
    };

    #[cfg(feature = "native")]
    let mut scored: Vec<(DogeIndexEntry, f64)> =
        raw.data.par_iter().map(score_item).collect::<Result<_, _>>()?;
    #[cfg(not(feature = "native"))]
    let mut scored: Vec<(DogeIndexEntry, f64)> =
        raw.data.iter().map(score_item).collect::<Result<_, _>>()?;

    // Stable sort keeps input order among equal scores; that tie-break is
    // part of the rank contract.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut index: Vec<DogeIndexEntry> = scored
        .into_iter()
        .enumerate()
        .map(|(pos, (mut entry, raw_score))| {
            entry.rank = pos as u32 + 1;
            entry.score = round1(raw_score);
            entry
        })
        .collect();

    index.sort_by_key(|entry| entry.id);
    Ok(index)
}

/// Per-category (value, count) lists over the display values of the built
/// index. Empty strings (absent attributes) are excluded here, unlike the
/// "None" bucket used for rarity. Sorted by descending count, ties in
/// first-encounter order.
pub fn trait_summary(index: &[DogeIndexEntry]) -> Vec<TraitCategory> {
    ATTRIBUTE_CATEGORIES
        .iter()
        .map(|(name, key)| {
            let mut order: Vec<String> = Vec::new();
            let mut counts: HashMap<String, u32> = HashMap::new();
            for entry in index {
                let value = entry.attribute(key);
                if value.is_empty() {
                    continue;
                }
                if !counts.contains_key(value) {
                    order.push(value.to_string());
                }
                *counts.entry(value.to_string()).or_insert(0) += 1;
            }

            let mut values: Vec<TraitValue> = order
                .into_iter()
                .map(|value| {
                    let count = counts[&value];
                    TraitValue { value, count }
                })
                .collect();
            values.sort_by(|a, b| b.count.cmp(&a.count));

            TraitCategory {
                name: name.to_string(),
                key: key.to_string(),
                values,
            }
        })
        .collect()
}

/// Write the two artifacts: the index compact, the trait summary
/// human-readable. Fails before writing anything if serialization fails.
pub fn write_artifacts(
    out_dir: &Path,
    index: &[DogeIndexEntry],
    categories: &[TraitCategory],
) -> Result<(), BuildError> {
    let index_json = serde_json::to_string(index)?;
    let traits_json = serde_json::to_string_pretty(categories)?;
    std::fs::create_dir_all(out_dir)?;
    std::fs::write(out_dir.join("doges-index.json"), index_json)?;
    std::fs::write(out_dir.join("trait-values.json"), traits_json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn item(id: u32, inscription_number: i64, attrs: &[(&str, &str)]) -> RawItem {
        RawItem {
            item_id: id.to_string(),
            inscription_id: format!("insc{}i0", id),
            inscription_number,
            attributes: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn collection(items: Vec<RawItem>) -> RawCollection {
        RawCollection {
            total: items.len() as u64,
            data: items,
        }
    }

    #[test]
    fn test_frequencies_count_missing_as_none() {
        let items = vec![
            item(1, 10, &[("Background", "Blue")]),
            item(2, 11, &[("Background", "Blue")]),
            item(3, 12, &[]),
        ];
        let freqs = attribute_frequencies(&items);
        assert_eq!(freqs["Background"]["Blue"], 2);
        assert_eq!(freqs["Background"]["None"], 1);
        assert_eq!(freqs["Fur"]["None"], 3);
    }

    #[test]
    fn test_rank_is_permutation_and_order_by_id() {
        let items = vec![
            item(3, 30, &[("Background", "A"), ("Fur", "X")]),
            item(1, 10, &[("Background", "A")]),
            item(2, 20, &[("Background", "B")]),
        ];
        let index = build_index(&collection(items)).unwrap();

        let ids: Vec<u32> = index.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let mut ranks: Vec<u32> = index.iter().map(|e| e.rank).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_rarest_item_ranks_first() {
        // Item 2 is the only one with Background B; every other category
        // is uniformly absent, so B alone decides the top rank.
        let items = vec![
            item(1, 10, &[("Background", "A")]),
            item(2, 20, &[("Background", "B")]),
            item(3, 30, &[("Background", "A")]),
        ];
        let index = build_index(&collection(items)).unwrap();
        let by_id: HashMap<u32, &DogeIndexEntry> = index.iter().map(|e| (e.id, e)).collect();
        assert_eq!(by_id[&2].rank, 1);
        assert!(by_id[&2].score > by_id[&1].score);
    }

    #[test]
    fn test_tied_scores_keep_input_order() {
        // Items 1 and 3 have identical attribute profiles, so equal raw
        // scores; item 1 appears first in the input and must rank higher.
        let items = vec![
            item(1, 10, &[("Background", "A")]),
            item(2, 20, &[("Background", "B")]),
            item(3, 30, &[("Background", "A")]),
        ];
        let index = build_index(&collection(items)).unwrap();
        let by_id: HashMap<u32, &DogeIndexEntry> = index.iter().map(|e| (e.id, e)).collect();
        assert!(by_id[&1].rank < by_id[&3].rank);
    }

    #[test]
    fn test_scores_rounded_to_one_decimal() {
        let items = vec![
            item(1, 10, &[("Background", "A")]),
            item(2, 20, &[("Background", "A")]),
            item(3, 30, &[("Background", "B")]),
        ];
        let index = build_index(&collection(items)).unwrap();
        for entry in &index {
            let rescaled = entry.score * 10.0;
            assert!((rescaled - rescaled.round()).abs() < 1e-9, "score {} not rounded", entry.score);
        }
    }

    #[test]
    fn test_absent_attribute_persisted_as_empty_string() {
        let items = vec![item(1, 10, &[("Background", "A")])];
        let index = build_index(&collection(items)).unwrap();
        assert_eq!(index[0].bg, "A");
        assert_eq!(index[0].fur, "");
        assert_eq!(index[0].mouth_acc, "");
    }

    #[test]
    fn test_bad_item_id_is_fatal() {
        let mut bad = item(1, 10, &[]);
        bad.item_id = "one".to_string();
        let err = build_index(&collection(vec![bad])).unwrap_err();
        assert!(matches!(err, BuildError::InvalidItemId { .. }));
    }

    #[test]
    fn test_total_mismatch_is_fatal() {
        let mut raw = collection(vec![item(1, 10, &[])]);
        raw.total = 2;
        let err = build_index(&raw).unwrap_err();
        assert!(matches!(err, BuildError::TotalMismatch { .. }));
    }

    #[test]
    fn test_trait_summary_counts_and_order() {
        let items = vec![
            item(1, 10, &[("Background", "A"), ("Fur", "X")]),
            item(2, 20, &[("Background", "A")]),
            item(3, 30, &[("Background", "B")]),
        ];
        let index = build_index(&collection(items)).unwrap();
        let summary = trait_summary(&index);

        let bg = summary.iter().find(|c| c.key == "bg").unwrap();
        assert_eq!(bg.name, "Background");
        assert_eq!(
            bg.values,
            vec![
                TraitValue { value: "A".into(), count: 2 },
                TraitValue { value: "B".into(), count: 1 },
            ]
        );

        // Absent attributes never show up as a filter option
        let fur = summary.iter().find(|c| c.key == "fur").unwrap();
        assert_eq!(fur.values.len(), 1);
        assert_eq!(fur.values[0].value, "X");
    }

    #[test]
    fn test_trait_summary_tie_keeps_encounter_order() {
        let items = vec![
            item(1, 10, &[("Background", "B")]),
            item(2, 20, &[("Background", "A")]),
            item(3, 30, &[("Background", "B")]),
            item(4, 40, &[("Background", "A")]),
        ];
        let index = build_index(&collection(items)).unwrap();
        let bg = trait_summary(&index).into_iter().find(|c| c.key == "bg").unwrap();
        // Equal counts: "A" was encountered first in the id-ordered index
        // only if id 1 carries it; here id 1 has "B", so "B" leads.
        assert_eq!(bg.values[0].value, "B");
        assert_eq!(bg.values[1].value, "A");
    }
}
