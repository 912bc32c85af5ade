//! Page type and continuation rules for paginated listings.

use std::future::Future;

use crate::error::Error;

/// Page size the API uses when it does not report one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Upper bound on pages fetched for a single listing.
pub const MAX_PAGES: u32 = 500;

/// One page of a paginated listing.
///
/// Page numbers are 1-based, matching the API's `page` query parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    number: u32,
    items: Vec<T>,
    /// Explicit continuation signal from the server, if it sent one.
    has_more: Option<bool>,
    /// Page size reported by the server.
    page_size: Option<usize>,
}

impl<T> Page<T> {
    /// Creates a page without continuation metadata.
    pub fn new(number: u32, items: Vec<T>) -> Self {
        Self {
            number,
            items,
            has_more: None,
            page_size: None,
        }
    }

    /// Sets the server's explicit continuation signal.
    pub fn with_has_more(mut self, has_more: bool) -> Self {
        self.has_more = Some(has_more);
        self
    }

    /// Sets the page size reported by the server.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Returns the 1-based page number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Returns a reference to the items in this page.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the page and returns the items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the explicit continuation signal, if the server sent one.
    pub fn has_more(&self) -> Option<bool> {
        self.has_more
    }

    /// Returns the page size reported by the server.
    pub fn page_size(&self) -> Option<usize> {
        self.page_size
    }

    /// Returns `true` if this page has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Decides whether to request another page when the server gives no explicit
/// `hasMore`/`nextPage` signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagingPolicy {
    /// Stop unless the server says there is more.
    #[default]
    ExplicitOnly,
    /// Continue while pages come back full. `page_size` is used when the
    /// server does not report its own.
    FullPageHeuristic { page_size: usize },
}

impl PagingPolicy {
    /// The full-page heuristic with the API's default page size.
    pub fn full_page() -> Self {
        Self::FullPageHeuristic {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Returns `true` if the page after `page` should be fetched.
    ///
    /// An empty page always stops. An explicit server signal always wins.
    pub fn should_continue<T>(&self, page: &Page<T>) -> bool {
        if page.is_empty() {
            return false;
        }
        if let Some(has_more) = page.has_more() {
            return has_more;
        }
        match self {
            Self::ExplicitOnly => false,
            Self::FullPageHeuristic { page_size } => {
                page.len() == page.page_size().unwrap_or(*page_size)
            }
        }
    }
}

/// Fetches pages 1, 2, ... and concatenates their items.
///
/// `fetch` returns `Ok(None)` when the response carried no usable list, which
/// ends paging and keeps what was accumulated so far. Any error aborts the
/// whole listing.
pub async fn collect_pages<T, F, Fut>(policy: PagingPolicy, mut fetch: F) -> Result<Vec<T>, Error>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Option<Page<T>>, Error>>,
{
    let mut all = Vec::new();

    for number in 1..=MAX_PAGES {
        let Some(page) = fetch(number).await? else {
            break;
        };
        let more = policy.should_continue(&page);
        all.extend(page.into_items());
        if !more {
            break;
        }
        if number == MAX_PAGES {
            log::warn!("stopped paging after {} pages", MAX_PAGES);
        }
    }

    Ok(all)
}
