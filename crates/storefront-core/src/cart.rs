//! # Cart
//!
//! Cart lines, the identity index that deduplicates them, and the add/remove
//! mutator.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Mutations                                  │
//! │                                                                         │
//! │  add_item(product, selection)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  find_line(product.id, selection) ── same id + equivalent selection     │
//! │       │                                                                 │
//! │       ├── found ─────► quantity += 1   (no upper bound)                 │
//! │       └── not found ─► snapshot product, mark selected items,           │
//! │                        push line with quantity 1                        │
//! │                                                                         │
//! │  remove_item(product_id, selection)                                     │
//! │       │                                                                 │
//! │       ├── not found ──────► no-op                                       │
//! │       ├── quantity > 1 ───► quantity -= 1                               │
//! │       └── quantity == 1 ──► line removed                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - No two lines share a `line_identity`
//! - Every line has `quantity >= 1`
//! - Insertion order is display order

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::attribute::{
    canonical_entries, chosen_value, is_keyed, selections_equivalent, AttributeSelection,
    SelectedAttribute,
};
use crate::error::CoreResult;
use crate::money::Money;
use crate::price::{resolve_price, ResolvedPrice};
use crate::types::{AttributeGroup, AttributeItem, Product};

/// Stands in for an empty chosen value inside a line identity.
const EMPTY_VALUE: &str = "~";

// =============================================================================
// Line Identity
// =============================================================================

fn push_escaped(key: &mut String, component: &str) {
    if component.is_empty() {
        key.push_str(EMPTY_VALUE);
        return;
    }
    for ch in component.chars() {
        if matches!(ch, '\\' | '|' | '=' | '~') {
            key.push('\\');
        }
        key.push(ch);
    }
}

/// Builds the composite identity of a (product, selection) pair.
///
/// - keyed selections: `id|Color=red|Size=XL` (sorted by group id)
/// - positional selections: `id|XL|red`
///
/// Separators inside ids and values are escaped, so two different
/// selections can never produce the same key.
///
/// ```rust
/// use storefront_core::cart::line_identity;
/// use storefront_core::SelectedAttribute;
///
/// let sel = vec![SelectedAttribute::new("Size", "XL"), SelectedAttribute::new("Color", "red")];
/// assert_eq!(line_identity("hoodie", &sel), "hoodie|Color=red|Size=XL");
/// assert_eq!(line_identity("mug", &[]), "mug");
/// ```
pub fn line_identity(product_id: &str, selection: &[SelectedAttribute]) -> String {
    let keyed = is_keyed(selection);
    let mut key = String::with_capacity(product_id.len() + selection.len() * 8);
    push_escaped(&mut key, product_id);

    for entry in canonical_entries(selection) {
        key.push('|');
        if keyed {
            push_escaped(&mut key, &entry.group_id);
            key.push('=');
        }
        push_escaped(&mut key, &entry.value);
    }
    key
}

// =============================================================================
// Cart Line
// =============================================================================

/// One purchasable configuration in the cart.
///
/// ## Snapshot
/// `product` is a copy taken when the line was created. Later catalog
/// changes never alter what is already in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    pub product: Product,

    #[serde(default)]
    pub attribute_selection: AttributeSelection,

    pub quantity: u32,

    /// Derived from `product.id` and `attribute_selection`; rebuilt on load.
    #[serde(default)]
    pub line_identity: String,

    #[serde(default = "Utc::now")]
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a fresh line with quantity 1.
    pub fn new(product: &Product, selection: &[SelectedAttribute]) -> Self {
        CartLine {
            product: snapshot_with_selection(product, selection),
            attribute_selection: selection.to_vec(),
            quantity: 1,
            line_identity: line_identity(&product.id, selection),
            added_at: Utc::now(),
        }
    }

    /// Product id of the snapshot.
    #[inline]
    pub fn product_id(&self) -> &str {
        &self.product.id
    }

    /// Whether this line represents `product_id` with `selection`.
    pub fn matches(&self, product_id: &str, selection: &[SelectedAttribute]) -> bool {
        self.product.id == product_id
            && selections_equivalent(&self.attribute_selection, selection)
    }

    /// Unit price of the snapshot in `currency_symbol`.
    pub fn unit_price(&self, currency_symbol: &str) -> ResolvedPrice {
        resolve_price(&self.product, currency_symbol)
    }

    /// Unrounded unit price × quantity, in micros.
    pub fn line_micros(&self, currency_symbol: &str) -> i128 {
        Money::decimal_to_micros(self.unit_price(currency_symbol).exact_amount)
            .saturating_mul(self.quantity as i128)
    }

    /// Unit price × quantity, rounded to the cent.
    pub fn line_total(&self, currency_symbol: &str) -> Money {
        Money::from_micros(self.line_micros(currency_symbol))
    }
}

/// Copies `product` field by field, flagging the chosen item in each group.
fn snapshot_with_selection(product: &Product, selection: &[SelectedAttribute]) -> Product {
    let attributes = product
        .attributes
        .iter()
        .enumerate()
        .map(|(index, group)| {
            let chosen = chosen_value(selection, index, &group.id);
            AttributeGroup {
                id: group.id.clone(),
                name: group.name.clone(),
                kind: group.kind.clone(),
                items: group
                    .items
                    .iter()
                    .map(|item| AttributeItem {
                        id: item.id.clone(),
                        value: item.value.clone(),
                        display_value: item.display_value.clone(),
                        is_selected: chosen == Some(item.value.as_str()),
                    })
                    .collect(),
            }
        })
        .collect();

    Product {
        id: product.id.clone(),
        name: product.name.clone(),
        brand: product.brand.clone(),
        category: product.category.clone(),
        description: product.description.clone(),
        in_stock: product.in_stock,
        gallery: product.gallery.clone(),
        image: product.image.clone(),
        attributes,
        prices: product.prices.clone(),
        price: product.price,
    }
}

// =============================================================================
// Remove Outcome
// =============================================================================

/// What [`Cart::remove_item`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// No matching line; the cart is unchanged.
    NotFound,
    /// The line stays with the given quantity.
    Decremented { remaining: u32 },
    /// The line had quantity 1 and is gone.
    Removed,
}

impl RemoveOutcome {
    /// Whether the cart changed.
    #[inline]
    pub fn changed(&self) -> bool {
        !matches!(self, RemoveOutcome::NotFound)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart: an ordered list of lines.
///
/// Serializes as a bare JSON list of [`CartLine`], which is also the
/// persisted format.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Rebuilds a cart from untrusted lines.
    ///
    /// - lines with quantity 0 are dropped
    /// - identities are recomputed from product id and selection
    /// - lines sharing an identity are merged into the first one, quantities summed
    pub fn rehydrate(lines: Vec<CartLine>) -> Self {
        let mut cart = Cart::new();
        for mut line in lines {
            if line.quantity == 0 {
                continue;
            }
            line.line_identity = line_identity(&line.product.id, &line.attribute_selection);

            match cart
                .lines
                .iter_mut()
                .find(|existing| existing.line_identity == line.line_identity)
            {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity)
                }
                None => cart.lines.push(line),
            }
        }
        cart
    }

    /// Decodes a persisted cart and sanitises it with [`Cart::rehydrate`].
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let lines: Vec<CartLine> = serde_json::from_str(json)?;
        Ok(Cart::rehydrate(lines))
    }

    /// Encodes the cart in its persisted format.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(&self.lines)?)
    }

    /// Lines in display order.
    #[inline]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|line| line.quantity as u64).sum()
    }

    /// Index of the first line for `product_id` with an equivalent selection.
    pub fn position(&self, product_id: &str, selection: &[SelectedAttribute]) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.matches(product_id, selection))
    }

    /// The first line for `product_id` with an equivalent selection.
    pub fn find_line(&self, product_id: &str, selection: &[SelectedAttribute]) -> Option<&CartLine> {
        self.position(product_id, selection).map(|i| &self.lines[i])
    }

    /// Adds one unit of `product` configured with `selection`.
    ///
    /// Returns the line that now holds the unit.
    pub fn add_item(&mut self, product: &Product, selection: &[SelectedAttribute]) -> &CartLine {
        let index = match self.position(&product.id, selection) {
            Some(index) => {
                let line = &mut self.lines[index];
                line.quantity = line.quantity.saturating_add(1);
                index
            }
            None => {
                self.lines.push(CartLine::new(product, selection));
                self.lines.len() - 1
            }
        };
        &self.lines[index]
    }

    /// Removes one unit of `product_id` configured with `selection`.
    pub fn remove_item(&mut self, product_id: &str, selection: &[SelectedAttribute]) -> RemoveOutcome {
        let Some(index) = self.position(product_id, selection) else {
            return RemoveOutcome::NotFound;
        };

        let line = &mut self.lines[index];
        if line.quantity > 1 {
            line.quantity -= 1;
            RemoveOutcome::Decremented {
                remaining: line.quantity,
            }
        } else {
            self.lines.remove(index);
            RemoveOutcome::Removed
        }
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
