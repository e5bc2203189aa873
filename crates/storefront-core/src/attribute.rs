//! # Attribute Matcher
//!
//! Decides whether two attribute selections describe the same purchasable
//! configuration.
//!
//! ## Keyed vs Positional
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  KEYED (every entry names its group)                                    │
//! │    [Size=XL, Color=red]  ≡  [Color=red, Size=XL]    order-independent   │
//! │                                                                         │
//! │  POSITIONAL (legacy entries without a group id)                         │
//! │    [XL, red]  ≡  [XL, red]                                              │
//! │    [XL, red]  ≢  [red, XL]                          index by index      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A selection is keyed when every entry carries a non-empty group id and no
//! group id repeats. Two keyed selections compare as maps. As soon as either
//! side is not keyed, comparison falls back to chosen values by index, which
//! requires both selections to come from the same attribute-group ordering.
//!
//! An empty selection only matches another empty selection.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use ts_rs::TS;

/// One chosen option: which group, and which value inside it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SelectedAttribute {
    /// Attribute group id. Empty for positional (legacy) entries.
    #[serde(default, alias = "attributeId", alias = "id")]
    pub group_id: String,

    /// Value of the chosen item within the group.
    #[serde(default)]
    pub value: String,
}

impl SelectedAttribute {
    /// A keyed selection entry.
    pub fn new(group_id: impl Into<String>, value: impl Into<String>) -> Self {
        SelectedAttribute {
            group_id: group_id.into(),
            value: value.into(),
        }
    }

    /// An entry identified only by its position in the selection.
    pub fn positional(value: impl Into<String>) -> Self {
        SelectedAttribute {
            group_id: String::new(),
            value: value.into(),
        }
    }
}

/// Ordered selection, one entry per attribute group.
pub type AttributeSelection = Vec<SelectedAttribute>;

/// Whether every entry is addressable by a unique group id.
pub fn is_keyed(selection: &[SelectedAttribute]) -> bool {
    if selection.is_empty() {
        return false;
    }
    let mut seen = HashSet::with_capacity(selection.len());
    selection
        .iter()
        .all(|entry| !entry.group_id.is_empty() && seen.insert(entry.group_id.as_str()))
}

fn keyed_view(selection: &[SelectedAttribute]) -> BTreeMap<&str, &str> {
    selection
        .iter()
        .map(|entry| (entry.group_id.as_str(), entry.value.as_str()))
        .collect()
}

/// Returns `true` when `a` and `b` select the same configuration.
///
/// ```rust
/// use storefront_core::attribute::{selections_equivalent, SelectedAttribute};
///
/// let a = vec![SelectedAttribute::new("Size", "XL"), SelectedAttribute::new("Color", "red")];
/// let b = vec![SelectedAttribute::new("Color", "red"), SelectedAttribute::new("Size", "XL")];
/// assert!(selections_equivalent(&a, &b));
/// assert!(selections_equivalent(&[], &[]));
/// assert!(!selections_equivalent(&a, &[]));
/// ```
pub fn selections_equivalent(a: &[SelectedAttribute], b: &[SelectedAttribute]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    if is_keyed(a) && is_keyed(b) {
        return keyed_view(a) == keyed_view(b);
    }
    a.iter().zip(b).all(|(left, right)| left.value == right.value)
}

/// Entries in canonical order: sorted by group id when keyed, as given otherwise.
///
/// Equivalent selections always produce equal canonical sequences.
pub fn canonical_entries(selection: &[SelectedAttribute]) -> Vec<&SelectedAttribute> {
    let mut entries: Vec<&SelectedAttribute> = selection.iter().collect();
    if is_keyed(selection) {
        entries.sort_by(|a, b| a.group_id.cmp(&b.group_id));
    }
    entries
}

/// The value chosen for the group at `index` with id `group_id`.
///
/// Keyed selections are looked up by id, positional ones by index.
pub fn chosen_value<'a>(
    selection: &'a [SelectedAttribute],
    index: usize,
    group_id: &str,
) -> Option<&'a str> {
    if is_keyed(selection) {
        selection
            .iter()
            .find(|entry| entry.group_id == group_id)
            .map(|entry| entry.value.as_str())
    } else {
        selection.get(index).map(|entry| entry.value.as_str())
    }
}
