//! Shared helpers for paging long listings.

/// Defaults applied when a request does not specify paging parameters.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to use when not specified in a request.
    pub default_page: u64,
    /// The number of rows to display per page when not specified in a request.
    pub default_page_size: u64,
    /// The maximum number of numbered links to show in the page indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 20,
            max_pages: 5,
        }
    }
}

/// A single element of the page indicator rendered below a listing.
#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    /// A link to `page`.
    Page(u64),
    /// The page currently displayed, rendered without a link.
    CurrPage(u64),
    /// A gap between the windowed page links and the first/last page.
    Ellipsis,
    /// A link to the next page.
    NextButton(u64),
    /// A link to the previous page.
    BackButton(u64),
}

/// Build the page indicator for `curr_page` out of `page_count` pages,
/// windowed so that at most `max_pages` numbered links are shown around the
/// current page.
pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let half_window = max_pages / 2;

    let (first, last) = if page_count <= max_pages {
        (1, page_count)
    } else if curr_page <= half_window {
        (1, max_pages)
    } else if curr_page > page_count - half_window {
        (page_count - max_pages + 1, page_count)
    } else {
        (curr_page - half_window, curr_page + half_window)
    };

    let mut indicators: Vec<PaginationIndicator> = (first..=last)
        .map(|page| {
            if page == curr_page {
                PaginationIndicator::CurrPage(page)
            } else {
                PaginationIndicator::Page(page)
            }
        })
        .collect();

    if first > 1 {
        indicators.insert(0, PaginationIndicator::Page(1));
        indicators.insert(1, PaginationIndicator::Ellipsis);
    }

    if last < page_count {
        indicators.push(PaginationIndicator::Ellipsis);
        indicators.push(PaginationIndicator::Page(page_count));
    }

    if curr_page > 1 {
        indicators.insert(0, PaginationIndicator::BackButton(curr_page - 1));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}
