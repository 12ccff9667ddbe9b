//! Page-number pagination for the CDR plan listing.
//!
//! Pages are 1-based. The server reports `meta.totalPages` on every page; we
//! stop once the page just fetched is the last one. A provider with no plans
//! reports `totalPages: 0` on page 1.

/// Returns the page to request after `current_page`, or `None` when
/// `current_page` was the last page.
#[must_use]
pub fn next_page(current_page: u32, total_pages: u32) -> Option<u32> {
    if current_page >= total_pages {
        None
    } else {
        current_page.checked_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_while_pages_remain() {
        assert_eq!(next_page(1, 3), Some(2));
        assert_eq!(next_page(2, 3), Some(3));
    }

    #[test]
    fn stops_on_last_page() {
        assert_eq!(next_page(3, 3), None);
    }

    #[test]
    fn stops_on_empty_catalog() {
        assert_eq!(next_page(1, 0), None);
    }

    #[test]
    fn stops_when_total_shrinks_below_current() {
        // The server dropped plans between our requests.
        assert_eq!(next_page(4, 2), None);
    }

    #[test]
    fn does_not_overflow() {
        assert_eq!(next_page(u32::MAX - 1, u32::MAX), Some(u32::MAX));
        assert_eq!(next_page(u32::MAX, u32::MAX), None);
    }
}
