//! Page-number pagination for article listings.
//!
//! Listing endpoints take a 1-based `page` and a `per_page` size. The
//! response carries [`PaginationControls`] so the renderer can draw a
//! compact page strip: first and last page, the neighbours of the current
//! page, and ellipsis markers over the gaps.

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default number of articles per page.
pub const DEFAULT_PER_PAGE: i64 = 12;

/// Maximum number of articles per page.
pub const MAX_PER_PAGE: i64 = 100;

/// Page counts up to this value list every page without ellipsis.
const FULL_WINDOW_MAX_PAGES: u32 = 5;

// ---------------------------------------------------------------------------
// Limit / offset clamping
// ---------------------------------------------------------------------------

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Clamp a user-provided 1-based page number; missing or non-positive is page 1.
pub fn clamp_page(page: Option<i64>) -> u32 {
    page.unwrap_or(1).clamp(1, i64::from(u32::MAX)) as u32
}

/// Number of pages needed for `total_items` at `per_page` items each.
pub fn total_pages(total_items: i64, per_page: i64) -> u32 {
    if total_items <= 0 || per_page <= 0 {
        return 0;
    }
    let pages = (total_items + per_page - 1) / per_page;
    pages.min(i64::from(u32::MAX)) as u32
}

/// Row offset of the first item on a 1-based page.
pub fn page_offset(page: u32, per_page: i64) -> i64 {
    i64::from(page.saturating_sub(1)) * per_page
}

// ---------------------------------------------------------------------------
// Page window
// ---------------------------------------------------------------------------

/// One entry of the rendered page strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Page(u32),
    Ellipsis,
}

/// Pages serialize as numbers and the gap marker as `"..."`.
impl Serialize for PageToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Page(n) => serializer.serialize_u32(*n),
            Self::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Compute the page strip for `current` out of `total` pages.
///
/// - `total <= 1`: nothing to render.
/// - `total <= 5`: every page.
/// - otherwise: first, last, and `current ± 1`; a gap of more than one page
///   collapses into a single [`PageToken::Ellipsis`], a gap of exactly one
///   page shows that page.
///
/// `current` is clamped into `1..=total`.
///
/// # Examples
///
/// ```
/// use newsdesk_core::pagination::{page_window, PageToken::*};
///
/// assert_eq!(
///     page_window(5, 10),
///     vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
/// );
/// assert!(page_window(1, 1).is_empty());
/// ```
pub fn page_window(current: u32, total: u32) -> Vec<PageToken> {
    if total <= 1 {
        return Vec::new();
    }
    if total <= FULL_WINDOW_MAX_PAGES {
        return (1..=total).map(PageToken::Page).collect();
    }

    let current = current.clamp(1, total);
    let start = current.saturating_sub(1).max(2);
    let end = (current + 1).min(total - 1);

    let mut tokens = vec![PageToken::Page(1)];

    match start {
        3 => tokens.push(PageToken::Page(2)),
        s if s > 3 => tokens.push(PageToken::Ellipsis),
        _ => {}
    }

    tokens.extend((start..=end).map(PageToken::Page));

    match total - end {
        2 => tokens.push(PageToken::Page(total - 1)),
        gap if gap > 2 => tokens.push(PageToken::Ellipsis),
        _ => {}
    }

    tokens.push(PageToken::Page(total));
    tokens
}

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

/// Everything the renderer needs to draw previous / next and the page strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationControls {
    pub current_page: u32,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
    pub window: Vec<PageToken>,
}

impl PaginationControls {
    /// `current_page` is clamped into `1..=total_pages` (page 1 when there
    /// are no pages), so a request past the end lands on the last page.
    pub fn new(current_page: u32, total_pages: u32) -> Self {
        let current_page = current_page.clamp(1, total_pages.max(1));
        Self {
            current_page,
            total_pages,
            has_previous: current_page > 1,
            has_next: current_page < total_pages,
            window: page_window(current_page, total_pages),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::PageToken::{Ellipsis, Page};
    use super::*;

    fn numbers(tokens: &[PageToken]) -> Vec<u32> {
        tokens
            .iter()
            .filter_map(|t| match t {
                Page(n) => Some(*n),
                Ellipsis => None,
            })
            .collect()
    }

    // -- page_window --

    #[test]
    fn middle_page_of_ten() {
        assert_eq!(
            page_window(5, 10),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn five_pages_list_everything() {
        assert_eq!(
            page_window(1, 5),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5)]
        );
    }

    #[test]
    fn single_page_renders_nothing() {
        assert!(page_window(1, 1).is_empty());
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn first_page_of_ten() {
        assert_eq!(page_window(1, 10), vec![Page(1), Page(2), Ellipsis, Page(10)]);
    }

    #[test]
    fn last_page_of_ten() {
        assert_eq!(page_window(10, 10), vec![Page(1), Ellipsis, Page(9), Page(10)]);
    }

    #[test]
    fn single_page_gap_is_filled_not_collapsed() {
        assert_eq!(
            page_window(4, 10),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(10)]
        );
        assert_eq!(
            page_window(7, 10),
            vec![Page(1), Ellipsis, Page(6), Page(7), Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn out_of_range_current_is_clamped() {
        assert_eq!(page_window(0, 10), page_window(1, 10));
        assert_eq!(page_window(99, 10), page_window(10, 10));
    }

    #[test]
    fn windows_are_strictly_increasing_with_at_most_two_ellipses() {
        for total in 0..=30 {
            for current in 1..=total.max(1) {
                let tokens = page_window(current, total);
                let pages = numbers(&tokens);
                assert!(pages.windows(2).all(|w| w[0] < w[1]), "{tokens:?}");
                let ellipses = tokens.iter().filter(|t| **t == Ellipsis).count();
                assert!(ellipses <= 2, "{tokens:?}");
                assert!(
                    tokens.windows(2).all(|w| !(w[0] == Ellipsis && w[1] == Ellipsis)),
                    "{tokens:?}"
                );
                if total > 1 {
                    assert_eq!(pages.first(), Some(&1));
                    assert_eq!(pages.last(), Some(&total));
                    assert!(pages.contains(&current));
                }
            }
        }
    }

    #[test]
    fn tokens_serialize_as_numbers_and_marker() {
        let json = serde_json::to_string(&page_window(5, 10)).unwrap();
        assert_eq!(json, r#"[1,"...",4,5,6,"...",10]"#);
    }

    // -- controls --

    #[test]
    fn previous_disabled_on_first_page() {
        let controls = PaginationControls::new(1, 3);
        assert!(!controls.has_previous);
        assert!(controls.has_next);
    }

    #[test]
    fn next_disabled_on_last_page() {
        let controls = PaginationControls::new(3, 3);
        assert!(controls.has_previous);
        assert!(!controls.has_next);
    }

    #[test]
    fn page_past_the_end_lands_on_last_page() {
        let controls = PaginationControls::new(99, 3);
        assert_eq!(controls.current_page, 3);
        assert!(controls.has_previous);
        assert!(!controls.has_next);
        assert!(controls.window.contains(&Page(controls.current_page)));
    }

    #[test]
    fn empty_listing_stays_on_first_page() {
        let controls = PaginationControls::new(4, 0);
        assert_eq!(controls.current_page, 1);
        assert!(!controls.has_previous);
        assert!(!controls.has_next);
        assert!(controls.window.is_empty());
    }

    // -- arithmetic --

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 12), 0);
        assert_eq!(total_pages(12, 12), 1);
        assert_eq!(total_pages(13, 12), 2);
    }

    #[test]
    fn page_offset_is_zero_based() {
        assert_eq!(page_offset(1, 12), 0);
        assert_eq!(page_offset(3, 12), 24);
        assert_eq!(page_offset(0, 12), 0);
    }

    #[test]
    fn clamp_page_defaults_to_first() {
        assert_eq!(clamp_page(None), 1);
        assert_eq!(clamp_page(Some(-4)), 1);
        assert_eq!(clamp_page(Some(7)), 7);
    }

    #[test]
    fn clamp_limit_respects_bounds() {
        assert_eq!(clamp_limit(None, 12, 100), 12);
        assert_eq!(clamp_limit(Some(500), 12, 100), 100);
        assert_eq!(clamp_limit(Some(0), 12, 100), 1);
    }

    #[test]
    fn clamp_offset_floors_at_zero() {
        assert_eq!(clamp_offset(Some(-3)), 0);
        assert_eq!(clamp_offset(Some(40)), 40);
    }
}
