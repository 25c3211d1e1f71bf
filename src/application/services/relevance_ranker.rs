use std::cmp::Reverse;

use crate::domain::CatalogItem;

use super::text_scan;

/// Orders candidates by descending relevance to the request. The sort is
/// stable, so items with equal scores keep their catalog-query order.
pub fn rank(mut items: Vec<CatalogItem>, request: &str) -> Vec<CatalogItem> {
    items.sort_by_cached_key(|item| Reverse(score(item, request)));
    items
}

/// Additive relevance score of one item against a free-text request.
pub fn score(item: &CatalogItem, request: &str) -> i32 {
    let request_lower = request.trim().to_lowercase();
    let title_lower = item.title.to_lowercase();
    let subcategory_lower = item.subcategory.to_lowercase();

    let mut score = 0;

    if !request_lower.is_empty() && title_lower.contains(&request_lower) {
        score += 10;
    }

    for word in text_scan::words(&request_lower) {
        if word.chars().count() <= 2 {
            continue;
        }
        if title_lower.contains(&word) {
            score += 3;
        }
        if subcategory_lower.contains(&word) {
            score += 2;
        }
    }

    for tag in &item.tags {
        if request_lower.contains(&tag.to_lowercase()) {
            score += 2;
        }
    }

    score += if item.rating > 4.5 {
        3
    } else if item.rating > 4.0 {
        2
    } else if item.rating > 3.5 {
        1
    } else {
        0
    };

    score += if item.total_orders > 50 {
        2
    } else if item.total_orders > 20 {
        1
    } else {
        0
    };

    if item.review_count > 10 {
        score += 1;
    }
    if item.is_active {
        score += 1;
    }

    score
}
