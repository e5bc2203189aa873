//! End-to-end session flows against the in-memory collaborators.

use async_trait::async_trait;
use storefront_core::{AttributeGroup, Cart, Currency, Money, PriceEntry, Product, SelectedAttribute};
use storefront_session::state::{
    ACTIVE_CATEGORY_KEY, CART_ITEMS_KEY, PRODUCTS_QUANTITY_KEY, SELECTED_CURRENCY_KEY,
};
use storefront_session::{
    CatalogError, CatalogSource, ConfigState, MemoryStore, StaticCatalog, Storefront,
};
use tokio::sync::watch;

// =============================================================================
// Fixtures
// =============================================================================

fn priced(id: &str, category: &str, usd: f64, gbp: f64) -> Product {
    let mut product = Product::new(id, id.to_uppercase());
    product.category = Some(category.to_string());
    product.prices = vec![
        PriceEntry::new(usd, "USD", "$"),
        PriceEntry::new(gbp, "GBP", "£"),
    ];
    product
}

fn shirt() -> Product {
    let mut product = priced("shirt", "clothes", 20.0, 16.0);
    product.attributes = vec![
        AttributeGroup::new("Size", &["S", "M", "L"]),
        AttributeGroup::new("Color", &["Red", "Blue"]),
    ];
    product
}

fn catalog() -> StaticCatalog {
    StaticCatalog::new(
        vec![
            priced("a", "tech", 10.0, 8.0),
            priced("b", "tech", 5.5, 4.4),
            shirt(),
        ],
        vec![Currency::new("USD", "$"), Currency::new("GBP", "£")],
    )
}

async fn open(store: &MemoryStore, catalog: &StaticCatalog) -> Storefront<MemoryStore, StaticCatalog> {
    Storefront::open(store.clone(), catalog.clone(), ConfigState::default()).await
}

fn color(value: &str) -> Vec<SelectedAttribute> {
    vec![SelectedAttribute::new("Color", value)]
}

/// Catalog whose fetches stay pending until the gate opens.
#[derive(Clone)]
struct GatedCatalog {
    inner: StaticCatalog,
    open: watch::Receiver<bool>,
}

impl GatedCatalog {
    async fn wait(&self) -> Result<(), CatalogError> {
        let mut open = self.open.clone();
        open.wait_for(|open| *open)
            .await
            .map(|_| ())
            .map_err(|e| CatalogError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl CatalogSource for GatedCatalog {
    async fn fetch_all_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.wait().await?;
        self.inner.fetch_all_products().await
    }

    async fn fetch_all_currencies(&self) -> Result<Vec<Currency>, CatalogError> {
        self.wait().await?;
        self.inner.fetch_all_currencies().await
    }
}

// =============================================================================
// Cart behaviour
// =============================================================================

#[tokio::test]
async fn mixed_cart_totals_in_dollars() {
    let store = MemoryStore::new();
    let mut shop = open(&store, &catalog()).await;

    shop.add_item(&priced("a", "tech", 10.0, 8.0), &[]).await;
    shop.add_item(&priced("a", "tech", 10.0, 8.0), &[]).await;
    let summary = shop.add_item(&priced("b", "tech", 5.5, 4.4), &[]).await;

    assert_eq!(summary.line_count, 2);
    assert_eq!(summary.total_quantity, 3);
    assert_eq!(summary.totals.payable, Money::from_cents(2550));
    assert_eq!(summary.totals.tax_amount, Money::from_cents(536));
    assert_eq!(shop.format_amount(summary.totals.tax_amount), "$5.36");
}

#[tokio::test]
async fn totals_are_idempotent() {
    let store = MemoryStore::new();
    let mut shop = open(&store, &catalog()).await;
    shop.add_item(&shirt(), &color("Red")).await;

    let first = shop.compute_totals();
    let second = shop.compute_totals();
    assert_eq!(first, second);
}

#[tokio::test]
async fn different_colors_make_two_lines() {
    let store = MemoryStore::new();
    let mut shop = open(&store, &catalog()).await;

    shop.add_item(&shirt(), &color("Red")).await;
    let summary = shop.add_item(&shirt(), &color("Blue")).await;

    let quantities: Vec<u32> = shop.cart().lines().iter().map(|l| l.quantity).collect();
    assert_eq!(quantities, vec![1, 1]);
    assert_eq!(summary.total_quantity, 2);
}

#[tokio::test]
async fn keyed_selection_order_does_not_matter() {
    let store = MemoryStore::new();
    let mut shop = open(&store, &catalog()).await;

    let size_then_color = vec![
        SelectedAttribute::new("Size", "M"),
        SelectedAttribute::new("Color", "Red"),
    ];
    let color_then_size = vec![
        SelectedAttribute::new("Color", "Red"),
        SelectedAttribute::new("Size", "M"),
    ];

    shop.add_item(&shirt(), &size_then_color).await;
    shop.add_item(&shirt(), &color_then_size).await;

    assert_eq!(shop.cart().len(), 1);
    assert_eq!(shop.cart().lines()[0].quantity, 2);
}

#[tokio::test]
async fn added_snapshot_marks_selected_items() {
    let store = MemoryStore::new();
    let mut shop = open(&store, &catalog()).await;

    shop.add_item(&shirt(), &color("Blue")).await;

    let line = &shop.cart().lines()[0];
    let colors = &line.product.attributes[1];
    let selected: Vec<&str> = colors
        .items
        .iter()
        .filter(|item| item.is_selected)
        .map(|item| item.value.as_str())
        .collect();
    assert_eq!(selected, vec!["Blue"]);
}

#[tokio::test]
async fn removing_last_unit_drops_the_line() {
    let store = MemoryStore::new();
    let mut shop = open(&store, &catalog()).await;

    shop.add_item(&priced("a", "tech", 10.0, 8.0), &[]).await;
    shop.add_item(&priced("b", "tech", 5.5, 4.4), &[]).await;

    let summary = shop.remove_item("b", &[]).await;
    assert_eq!(summary.line_count, 1);
    assert_eq!(summary.total_quantity, 1);
    assert_eq!(store.raw(PRODUCTS_QUANTITY_KEY).as_deref(), Some("1"));
}

#[tokio::test]
async fn removing_missing_line_is_a_no_op() {
    let store = MemoryStore::new();
    let mut shop = open(&store, &catalog()).await;
    shop.add_item(&shirt(), &color("Red")).await;

    let before = shop.cart().clone();
    shop.remove_item("shirt", &color("Green")).await;
    shop.remove_item("ghost", &[]).await;

    assert_eq!(shop.cart(), &before);
    assert_eq!(shop.total_quantity(), 1);
}

#[tokio::test]
async fn single_price_and_unpriced_products() {
    let store = MemoryStore::new();
    let mut shop = open(&store, &catalog()).await;

    let mut airpods = Product::new("airpods", "AirPods");
    airpods.price = Some(300.23);
    let freebie = Product::new("sticker", "Sticker");

    shop.add_item(&airpods, &[]).await;
    shop.add_item(&freebie, &[]).await;

    let totals = shop.change_currency("£").await.unwrap();
    assert_eq!(totals.payable, Money::from_cents(30023));
    assert_eq!(shop.total_quantity(), 2);
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn corrupted_persisted_cart_starts_empty() {
    let store = MemoryStore::with_entries([
        (CART_ITEMS_KEY, "[{\"product\": 42"),
        (PRODUCTS_QUANTITY_KEY, "5"),
    ]);
    let shop = open(&store, &catalog()).await;

    assert!(shop.cart().is_empty());
    assert_eq!(shop.total_quantity(), 0);
    assert_eq!(shop.totals().payable, Money::zero());
}

#[tokio::test]
async fn session_survives_reopen() {
    let store = MemoryStore::new();
    let catalog = catalog();
    {
        let mut shop = open(&store, &catalog).await;
        shop.add_item(&shirt(), &color("Red")).await;
        shop.add_item(&shirt(), &color("Red")).await;
        shop.change_currency("£").await.unwrap();
        shop.change_category("clothes").await.unwrap();
    }

    assert_eq!(store.raw(SELECTED_CURRENCY_KEY).as_deref(), Some("\"£\""));
    assert_eq!(store.raw(ACTIVE_CATEGORY_KEY).as_deref(), Some("\"clothes\""));

    let mut shop = open(&store, &catalog).await;
    assert_eq!(shop.currency(), "£");
    assert_eq!(shop.category(), "clothes");
    assert_eq!(shop.total_quantity(), 2);
    assert_eq!(shop.totals().payable, Money::from_cents(3200));

    let visible = shop.load_catalog().await;
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, "shirt");
}

#[tokio::test]
async fn persisted_duplicate_lines_are_merged() {
    let mut cart = Cart::new();
    cart.add_item(&priced("a", "tech", 10.0, 8.0), &[]);
    let json = cart.to_json().unwrap();
    let line = &json[1..json.len() - 1];
    let duplicated = format!("[{line},{line}]");

    let store = MemoryStore::with_entries([(CART_ITEMS_KEY.to_string(), duplicated)]);
    let shop = open(&store, &catalog()).await;

    assert_eq!(shop.cart().len(), 1);
    assert_eq!(shop.total_quantity(), 2);
}

#[tokio::test]
async fn clear_cart_removes_both_keys() {
    let store = MemoryStore::new();
    let mut shop = open(&store, &catalog()).await;
    shop.add_item(&shirt(), &color("Red")).await;
    assert!(store.contains(CART_ITEMS_KEY));

    let summary = shop.clear_cart().await;
    assert_eq!(summary.total_quantity, 0);
    assert!(!store.contains(CART_ITEMS_KEY));
    assert!(!store.contains(PRODUCTS_QUANTITY_KEY));
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn failed_catalog_fetch_yields_empty_and_retries() {
    let store = MemoryStore::new();
    let catalog = catalog();
    catalog.set_failing(true);
    let mut shop = open(&store, &catalog).await;

    assert!(shop.load_catalog().await.is_empty());
    assert!(shop.currencies().is_empty());

    // the cart still works while the catalog is down
    shop.add_item(&shirt(), &color("Red")).await;
    assert_eq!(shop.total_quantity(), 1);

    catalog.set_failing(false);
    assert_eq!(shop.load_catalog().await.len(), 3);
    assert_eq!(shop.currencies().len(), 2);
}

#[tokio::test]
async fn catalog_is_fetched_once() {
    let store = MemoryStore::new();
    let catalog = catalog();
    let mut shop = open(&store, &catalog).await;

    shop.load_catalog().await;
    shop.load_catalog().await;
    shop.change_category("tech").await.unwrap();

    assert_eq!(catalog.fetch_count(), 2);
    assert_eq!(shop.products().len(), 2);
    assert!(shop.product("shirt").is_some());
}

#[tokio::test]
async fn cart_intents_go_through_while_catalog_is_pending() {
    let (gate, open) = watch::channel(false);
    let catalog = GatedCatalog {
        inner: catalog(),
        open,
    };
    let store = MemoryStore::new();
    let mut shop = Storefront::open(store.clone(), catalog, ConfigState::default()).await;

    let fetch = shop.catalog_fetch().run();
    let intents = async {
        shop.add_item(&shirt(), &color("Red")).await;
        shop.add_item(&priced("a", "tech", 10.0, 8.0), &[]).await;
        let summary = shop.remove_item("shirt", &color("Red")).await;
        // only now may the catalog answer
        gate.send_replace(true);
        summary
    };
    let (snapshot, summary) = tokio::join!(fetch, intents);

    assert_eq!(summary.total_quantity, 1);
    assert_eq!(summary.totals.payable, Money::from_cents(1000));
    assert_eq!(store.raw(PRODUCTS_QUANTITY_KEY).as_deref(), Some("1"));

    assert_eq!(shop.apply_catalog(snapshot).len(), 3);
    assert_eq!(shop.currencies().len(), 2);
    assert_eq!(shop.total_quantity(), 1);
    assert!(shop.catalog_fetch().is_empty());
}

#[tokio::test]
async fn invalid_category_is_rejected() {
    let store = MemoryStore::new();
    let mut shop = open(&store, &catalog()).await;

    let err = shop.change_category("").await.unwrap_err();
    assert_eq!(serde_json::to_value(&err).unwrap()["code"], "VALIDATION_ERROR");
    assert_eq!(shop.category(), "all");
    assert!(!store.contains(ACTIVE_CATEGORY_KEY));
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn complete_order_snapshots_and_clears() {
    let store = MemoryStore::new();
    let mut shop = open(&store, &catalog()).await;

    assert!(shop.complete_order().await.is_none());

    shop.add_item(&priced("a", "tech", 10.0, 8.0), &[]).await;
    shop.add_item(&priced("b", "tech", 5.5, 4.4), &[]).await;

    let order = shop.complete_order().await.unwrap();
    assert_eq!(order.lines.len(), 2);
    assert_eq!(order.total_quantity, 2);
    assert_eq!(order.totals.payable, Money::from_cents(1550));
    assert_eq!(order.currency, "$");

    assert!(shop.cart().is_empty());
    assert!(!store.contains(CART_ITEMS_KEY));
}
