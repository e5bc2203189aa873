//! # Domain Types
//!
//! Catalog records as the storefront receives them, plus the tax rate type.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog Types                                   │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐     │
//! │  │     Product      │   │  AttributeGroup  │   │  AttributeItem   │     │
//! │  │  ──────────────  │   │  ──────────────  │   │  ──────────────  │     │
//! │  │  id, name, brand │──►│  id, name, type  │──►│  value           │     │
//! │  │  gallery, image  │   │  items[]         │   │  displayValue    │     │
//! │  │  attributes[]    │   └──────────────────┘   │  isSelected      │     │
//! │  │  prices[] | price│                          └──────────────────┘     │
//! │  └────────┬─────────┘                                                   │
//! │           ▼                                                             │
//! │  ┌──────────────────┐   ┌──────────────────┐                           │
//! │  │    PriceEntry    │──►│     Currency     │                           │
//! │  │  amount          │   │  label, symbol   │                           │
//! │  └──────────────────┘   └──────────────────┘                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Price Shapes
//! Two catalog backends coexist. One ships a `prices` list with one entry per
//! currency; the other ships a single numeric `price`. Both deserialize into
//! the same [`Product`]; the [`crate::price`] resolver decides which one wins.
//!
//! ## Tolerant Decoding
//! Catalog data is not trusted to be well-formed. Every field falls back to
//! its default on its own, so one bad field never discards a record:
//! - strings accept numbers (`"id": 7` reads as `"7"`)
//! - amounts accept a JSON number or a numeric string
//! - lists keep the elements that decode and drop the rest
//! - `null` and other wrong-typed values read as absent

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::{ALL_CATEGORIES, FALLBACK_BRAND, PLACEHOLDER_IMAGE};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%; 2100 bps = 21%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for configuration input).
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return TaxRate(0);
        }
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate(crate::STANDARD_TAX_RATE_BPS)
    }
}

// =============================================================================
// Currency
// =============================================================================

/// A currency the catalog can price in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Currency {
    /// ISO-ish label, e.g. `USD`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: String,

    /// Display symbol, e.g. `$`. This is what the shopper selects.
    #[serde(default, deserialize_with = "lenient_string")]
    pub symbol: String,
}

impl Currency {
    pub fn new(label: impl Into<String>, symbol: impl Into<String>) -> Self {
        Currency {
            label: label.into(),
            symbol: symbol.into(),
        }
    }
}

// =============================================================================
// Price Entry
// =============================================================================

/// One entry of a product's multi-currency price list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PriceEntry {
    /// Amount in major units. Malformed values decode as `0`.
    #[serde(default, deserialize_with = "lenient_amount_or_zero")]
    pub amount: f64,

    #[serde(default, deserialize_with = "lenient_or_default")]
    pub currency: Currency,
}

impl PriceEntry {
    pub fn new(amount: f64, label: impl Into<String>, symbol: impl Into<String>) -> Self {
        PriceEntry {
            amount,
            currency: Currency::new(label, symbol),
        }
    }

    /// Symbol this entry is priced in.
    #[inline]
    pub fn currency_symbol(&self) -> &str {
        &self.currency.symbol
    }
}

// =============================================================================
// Attributes
// =============================================================================

/// A selectable option inside an attribute group (a size, a colour, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AttributeItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    /// Value used for identity, e.g. `#FF0000` or `XL`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: String,

    /// Human-readable label, e.g. `Red`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub display_value: String,

    /// Set on cart snapshots for the item the shopper picked.
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub is_selected: bool,
}

impl AttributeItem {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        AttributeItem {
            id: value.clone(),
            display_value: value.clone(),
            value,
            is_selected: false,
        }
    }
}

/// An ordered group of mutually exclusive options.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AttributeGroup {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    /// Rendering hint (`text`, `swatch`).
    #[serde(default, rename = "type", deserialize_with = "lenient_opt_string")]
    pub kind: Option<String>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub items: Vec<AttributeItem>,
}

impl AttributeGroup {
    pub fn new(id: impl Into<String>, values: &[&str]) -> Self {
        let id = id.into();
        AttributeGroup {
            name: id.clone(),
            id,
            kind: None,
            items: values.iter().map(|v| AttributeItem::new(*v)).collect(),
        }
    }

    /// The item currently flagged as selected, if any.
    pub fn selected_item(&self) -> Option<&AttributeItem> {
        self.items.iter().find(|item| item.is_selected)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product. Read-only to the cart except for snapshots.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub brand: Option<String>,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub category: Option<String>,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub description: Option<String>,

    /// `None` means "not stated", which counts as in stock.
    #[serde(default, deserialize_with = "lenient_opt_bool")]
    pub in_stock: Option<bool>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub gallery: Vec<String>,

    /// Single-image field used by the simpler catalog backend.
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub image: Option<String>,

    #[serde(default, alias = "attributeGroups", deserialize_with = "lenient_list")]
    pub attributes: Vec<AttributeGroup>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub prices: Vec<PriceEntry>,

    /// Single-price fallback with an implicit currency.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub price: Option<f64>,
}

impl Product {
    /// Creates a bare product with no prices or attributes.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            ..Product::default()
        }
    }

    /// Brand for display, falling back to a generic label.
    pub fn display_brand(&self) -> &str {
        match self.brand.as_deref() {
            Some(brand) if !brand.trim().is_empty() => brand,
            _ => FALLBACK_BRAND,
        }
    }

    /// First gallery image, else the single image, else a placeholder.
    pub fn primary_image(&self) -> &str {
        self.image_or(PLACEHOLDER_IMAGE)
    }

    /// Like [`Product::primary_image`] with a caller-chosen placeholder.
    pub fn image_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.gallery
            .iter()
            .map(String::as_str)
            .find(|src| !src.is_empty())
            .or_else(|| self.image.as_deref().filter(|src| !src.is_empty()))
            .unwrap_or(placeholder)
    }

    /// In stock unless the record explicitly says otherwise.
    #[inline]
    pub fn is_in_stock(&self) -> bool {
        self.in_stock != Some(false)
    }

    /// Whether the product is listed under `category` (`all` matches everything).
    pub fn belongs_to(&self, category: &str) -> bool {
        let category = category.trim();
        if category.is_empty() || category.eq_ignore_ascii_case(ALL_CATEGORIES) {
            return true;
        }
        self.category
            .as_deref()
            .is_some_and(|own| own.eq_ignore_ascii_case(category))
    }
}

// =============================================================================
// Lenient Decoders
// =============================================================================

/// Reads a JSON number or numeric string as an amount.
fn amount_from_value(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    amount.filter(|a| a.is_finite())
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(amount_from_value))
}

fn lenient_amount_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_amount(deserializer)?.unwrap_or(0.0))
}

/// Strings and numbers as text. Anything else is absent.
fn text_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_from_value(Value::deserialize(deserializer)?))
}

/// Accepts `true`/`false` and their string spellings.
fn lenient_opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        Value::String(s) => s.trim().parse::<bool>().ok(),
        _ => None,
    })
}

/// Falls back to `T::default()` when the value does not decode.
fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Keeps the elements that decode. A non-list value is an empty list.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_default_is_standard() {
        assert_eq!(TaxRate::default().bps(), 2100);
        assert!((TaxRate::default().percentage() - 21.0).abs() < 0.001);
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        assert_eq!(TaxRate::from_percentage(21.0).bps(), 2100);
        assert_eq!(TaxRate::from_percentage(8.25).bps(), 825);
        assert_eq!(TaxRate::from_percentage(-3.0).bps(), 0);
        assert_eq!(TaxRate::from_percentage(f64::NAN).bps(), 0);
    }

    #[test]
    fn test_decode_price_list_product() {
        let json = r#"{
            "id": "jacket-canada-goosee",
            "name": "Jacket",
            "brand": "Canada Goose",
            "gallery": ["https://img/1.png"],
            "attributes": [
                {"id": "Size", "name": "Size", "type": "text",
                 "items": [{"id": "S", "value": "S", "displayValue": "Small"}]}
            ],
            "prices": [
                {"amount": 518.47, "currency": {"label": "USD", "symbol": "$"}},
                {"amount": "402.79", "currency": {"label": "GBP", "symbol": "£"}}
            ]
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.prices.len(), 2);
        assert_eq!(product.prices[1].amount, 402.79);
        assert_eq!(product.prices[1].currency_symbol(), "£");
        assert_eq!(product.attributes[0].kind.as_deref(), Some("text"));
        assert_eq!(product.attributes[0].items[0].display_value, "Small");
        assert!(product.price.is_none());
    }

    #[test]
    fn test_decode_single_price_product() {
        let json = r#"{"id": "p1", "name": "Mug", "price": "12.5", "image": "mug.png"}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.price, Some(12.5));
        assert!(product.prices.is_empty());
        assert_eq!(product.primary_image(), "mug.png");
    }

    #[test]
    fn test_decode_tolerates_garbage_fields() {
        let json = r#"{
            "id": "p2",
            "price": {"nested": true},
            "prices": null,
            "gallery": null,
            "attributeGroups": [{"id": "Color", "items": null}]
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert!(product.price.is_none());
        assert!(product.prices.is_empty());
        assert!(product.gallery.is_empty());
        assert_eq!(product.attributes.len(), 1);
        assert!(product.attributes[0].items.is_empty());
    }

    #[test]
    fn test_decode_wrong_typed_scalars_fall_back_per_field() {
        let json = r#"{
            "id": 7,
            "name": null,
            "brand": ["not", "text"],
            "category": "tech",
            "inStock": "false",
            "image": {"src": "x.png"},
            "price": 12
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id, "7");
        assert_eq!(product.name, "");
        assert!(product.brand.is_none());
        assert_eq!(product.category.as_deref(), Some("tech"));
        assert_eq!(product.in_stock, Some(false));
        assert!(product.image.is_none());
        assert_eq!(product.price, Some(12.0));
    }

    #[test]
    fn test_decode_keeps_well_formed_list_elements() {
        let json = r#"{
            "id": "p3",
            "gallery": ["a.png", 4, "b.png"],
            "prices": [
                "garbage",
                {"amount": 3.5, "currency": "USD"},
                {"amount": 2.5, "currency": {"label": "GBP", "symbol": "£"}}
            ],
            "attributes": {"Size": ["S"]}
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.gallery, vec!["a.png", "b.png"]);
        assert_eq!(product.prices.len(), 2);
        assert_eq!(product.prices[0].amount, 3.5);
        assert_eq!(product.prices[0].currency, Currency::default());
        assert_eq!(product.prices[1].currency_symbol(), "£");
        assert!(product.attributes.is_empty());
    }

    #[test]
    fn test_malformed_price_amount_is_zero() {
        let json = r#"{"amount": "abc", "currency": {"label": "USD", "symbol": "$"}}"#;
        let entry: PriceEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.amount, 0.0);
    }

    #[test]
    fn test_display_fallbacks() {
        let product = Product::new("p", "Plain");
        assert_eq!(product.display_brand(), FALLBACK_BRAND);
        assert_eq!(product.primary_image(), PLACEHOLDER_IMAGE);
        assert_eq!(product.image_or("none.png"), "none.png");
        assert!(product.is_in_stock());

        let mut sold_out = Product::new("q", "Gone");
        sold_out.in_stock = Some(false);
        assert!(!sold_out.is_in_stock());
    }

    #[test]
    fn test_belongs_to_category() {
        let mut product = Product::new("p", "Shirt");
        product.category = Some("clothes".to_string());

        assert!(product.belongs_to("all"));
        assert!(product.belongs_to(""));
        assert!(product.belongs_to("Clothes"));
        assert!(!product.belongs_to("tech"));
        assert!(!Product::new("x", "Bare").belongs_to("tech"));
    }
}
