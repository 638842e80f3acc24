//! Pure filtering, sorting, and pagination over the catalog.
//!
//! Everything here is a function of its inputs; pagination reset on filter
//! changes is the caller's policy, not the query engine's.

use core::cmp::Ordering;

use chrono::NaiveDate;

use avkn_gifts_core::Price;

use super::Item;

/// Default number of items per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Filter state for a catalog listing.
///
/// `category`/`subcategory` of `None` mean "all". The price range is an
/// inclusive bound test and is skipped entirely when uninitialized.
#[derive(Debug, Default, Clone)]
pub struct ItemFilters {
    pub search: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub price_range: Option<(Price, Price)>,
}

/// Sort order for a catalog listing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Name, case-insensitive ascending.
    #[default]
    NameAsc,
    /// Name, case-insensitive descending.
    NameDesc,
    /// Price ascending.
    PriceAsc,
    /// Price descending.
    PriceDesc,
    /// Release date, newest first. Items whose release date does not parse
    /// sort after every dated item.
    ReleaseDateDesc,
}

impl SortKey {
    /// Parse from a URL parameter value. Unknown values fall back to the
    /// default name sort.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "name-desc" => Self::NameDesc,
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            "date" => Self::ReleaseDateDesc,
            _ => Self::NameAsc,
        }
    }

    /// Convert to the URL parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NameAsc => "name",
            Self::NameDesc => "name-desc",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::ReleaseDateDesc => "date",
        }
    }
}

/// Filter and sort the catalog.
///
/// Unreleased items are always excluded, regardless of filter values. The
/// free-text search is a case-insensitive substring test ORed across name,
/// category, subcategory, and brand. Sorting is stable, so equal keys keep
/// catalog order.
#[must_use]
pub fn filter_and_sort<'a>(items: &'a [Item], filters: &ItemFilters, sort: SortKey) -> Vec<&'a Item> {
    let needle = filters
        .search
        .as_deref()
        .map(str::to_lowercase)
        .filter(|s| !s.is_empty());

    let mut filtered: Vec<&Item> = items
        .iter()
        .filter(|item| !item.unreleased && matches(item, filters, needle.as_deref()))
        .collect();

    match sort {
        SortKey::NameAsc => filtered.sort_by_cached_key(|i| i.name.to_lowercase()),
        SortKey::NameDesc => {
            filtered.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase()));
        }
        SortKey::PriceAsc => filtered.sort_by_key(|i| i.price),
        SortKey::PriceDesc => filtered.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::ReleaseDateDesc => filtered.sort_by(|a, b| {
            match (
                parse_release_date(&a.release_date),
                parse_release_date(&b.release_date),
            ) {
                (Some(da), Some(db)) => db.cmp(&da),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }),
    }

    filtered
}

fn matches(item: &Item, filters: &ItemFilters, needle: Option<&str>) -> bool {
    if let Some(needle) = needle {
        let hit = [&item.name, &item.category, &item.subcategory, &item.brand]
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle));
        if !hit {
            return false;
        }
    }

    if let Some(category) = facet(filters.category.as_deref())
        && item.category != category
    {
        return false;
    }

    if let Some(subcategory) = facet(filters.subcategory.as_deref())
        && item.subcategory != subcategory
    {
        return false;
    }

    if let Some((min, max)) = filters.price_range
        && !(min <= item.price && item.price <= max)
    {
        return false;
    }

    true
}

/// Treat `"all"` and empty strings as "no filter".
fn facet(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != "all")
}

/// Parse the leading `DD/MM/YYYY` token of a release-date string.
fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let token = raw.split_whitespace().next()?;
    NaiveDate::parse_from_str(token, "%d/%m/%Y").ok()
}

/// Slice one 1-based page out of a result set.
///
/// A page index past the end yields an empty slice rather than clamping to
/// the last page.
#[must_use]
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    items.get(start..end).unwrap_or(&[])
}

/// Number of pages a result set spans (at least one).
#[must_use]
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::tests::sample_items;
    use super::*;

    fn ids<'a>(results: &'a [&'a Item]) -> Vec<&'a str> {
        results.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_unreleased_never_listed() {
        let items = sample_items();
        let results = filter_and_sort(&items, &ItemFilters::default(), SortKey::NameAsc);
        assert!(results.iter().all(|i| !i.unreleased));

        // Not even when a search targets it directly.
        let filters = ItemFilters {
            search: Some("Phantom".to_owned()),
            ..ItemFilters::default()
        };
        let results = filter_and_sort(&items, &filters, SortKey::NameAsc);
        assert!(results.is_empty());
    }

    #[test]
    fn test_search_matches_any_field() {
        let items = sample_items();
        // Brand match, case-insensitive.
        let filters = ItemFilters {
            search: Some("nova".to_owned()),
            ..ItemFilters::default()
        };
        let results = filter_and_sort(&items, &filters, SortKey::NameAsc);
        assert_eq!(ids(&results), vec!["sofa_02", "hat_02"]);

        // Subcategory match.
        let filters = ItemFilters {
            search: Some("VESTIDOS".to_owned()),
            ..ItemFilters::default()
        };
        let results = filter_and_sort(&items, &filters, SortKey::NameAsc);
        assert_eq!(ids(&results), vec!["dress_01"]);
    }

    #[test]
    fn test_category_all_means_no_filter() {
        let items = sample_items();
        let filters = ItemFilters {
            category: Some("all".to_owned()),
            ..ItemFilters::default()
        };
        assert_eq!(
            filter_and_sort(&items, &filters, SortKey::NameAsc).len(),
            5
        );

        let filters = ItemFilters {
            category: Some("moveis".to_owned()),
            ..ItemFilters::default()
        };
        assert_eq!(
            ids(&filter_and_sort(&items, &filters, SortKey::NameAsc)),
            vec!["sofa_02", "sofa_01"]
        );
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let items = sample_items();
        let filters = ItemFilters {
            price_range: Some((Price::new(900), Price::new(1_200))),
            ..ItemFilters::default()
        };
        let results = filter_and_sort(&items, &filters, SortKey::PriceAsc);
        assert_eq!(ids(&results), vec!["hat_02", "hat_01"]);
    }

    #[test]
    fn test_price_sort_monotonic() {
        let items = sample_items();
        let asc = filter_and_sort(&items, &ItemFilters::default(), SortKey::PriceAsc);
        assert!(asc.windows(2).all(|w| w[0].price <= w[1].price));

        let desc = filter_and_sort(&items, &ItemFilters::default(), SortKey::PriceDesc);
        assert!(desc.windows(2).all(|w| w[0].price >= w[1].price));
    }

    #[test]
    fn test_name_sort_case_insensitive() {
        let items = sample_items();
        let results = filter_and_sort(&items, &ItemFilters::default(), SortKey::NameAsc);
        assert_eq!(
            ids(&results),
            vec!["dress_01", "sofa_02", "hat_01", "hat_02", "sofa_01"]
        );
    }

    #[test]
    fn test_date_sort_puts_unparseable_last() {
        let mut items = sample_items();
        for item in &mut items {
            match item.id.as_str() {
                "hat_01" => item.release_date = "15/03/2025 10:00".to_owned(),
                "hat_02" => item.release_date = "not a date".to_owned(),
                _ => {}
            }
        }
        let results = filter_and_sort(&items, &ItemFilters::default(), SortKey::ReleaseDateDesc);
        assert_eq!(results.first().unwrap().id.as_str(), "hat_01");
        assert_eq!(results.last().unwrap().id.as_str(), "hat_02");
    }

    #[test]
    fn test_paginate_past_end_is_empty() {
        let values: Vec<u32> = (0..30).collect();
        assert_eq!(paginate(&values, 1, 25).len(), 25);
        assert_eq!(paginate(&values, 2, 25).len(), 5);
        assert!(paginate(&values, 3, 25).is_empty());
        assert!(paginate(&values, 0, 25).is_empty());
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 25), 1);
        assert_eq!(total_pages(25, 25), 1);
        assert_eq!(total_pages(26, 25), 2);
    }
}
