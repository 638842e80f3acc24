//! Catalog listing handlers.
//!
//! Thin wrappers over the pure query engine in [`crate::catalog::query`].
//! Changing a filter between requests is the client's concern; these
//! handlers serve whatever page is asked of them, and a page past the end
//! of the result set is an empty list, not an error.

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use avkn_gifts_core::Price;

use crate::catalog::Item;
use crate::catalog::query::{ItemFilters, SortKey, filter_and_sort, paginate, total_pages};
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ItemsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub sort: Option<String>,
    pub page: Option<usize>,
}

/// One listing page.
#[derive(Debug, Serialize)]
pub struct ItemsPage {
    pub items: Vec<Item>,
    /// Matching items across all pages.
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    /// The sort key actually applied (unknown values fall back to `name`).
    pub sort: &'static str,
}

/// Facet query parameters.
#[derive(Debug, Deserialize)]
pub struct FacetsQuery {
    pub category: Option<String>,
}

/// Catalog facets for the filter UI.
#[derive(Debug, Serialize)]
pub struct Facets {
    pub categories: Vec<String>,
    pub subcategories: Vec<String>,
    /// Price-slider upper bound (max released price, rounded up to 1,000).
    pub max_price: Price,
}

/// Serve a filtered, sorted, paginated catalog listing.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>, Query(query): Query<ItemsQuery>) -> Json<ItemsPage> {
    let price_range = match (query.min_price, query.max_price) {
        (None, None) => None,
        (min, max) => Some((
            Price::new(min.unwrap_or(0)),
            Price::new(max.unwrap_or(u64::MAX)),
        )),
    };

    let filters = ItemFilters {
        search: query.search,
        category: query.category,
        subcategory: query.subcategory,
        price_range,
    };
    let sort = query.sort.as_deref().map(SortKey::parse).unwrap_or_default();
    let page = query.page.unwrap_or(1).max(1);
    let page_size = state.page_size();

    let filtered = filter_and_sort(state.catalog().items(), &filters, sort);
    let total = filtered.len();
    let items = paginate(&filtered, page, page_size)
        .iter()
        .map(|item| (*item).clone())
        .collect();

    Json(ItemsPage {
        items,
        total,
        page,
        page_size,
        total_pages: total_pages(total, page_size),
        sort: sort.as_str(),
    })
}

/// Serve catalog facets, optionally narrowed to one category.
#[instrument(skip(state))]
pub async fn facets(State(state): State<AppState>, Query(query): Query<FacetsQuery>) -> Json<Facets> {
    let catalog = state.catalog();
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.is_empty() && *c != "all");

    Json(Facets {
        categories: catalog.categories(),
        subcategories: catalog.subcategories(category),
        max_price: catalog.max_price(),
    })
}
