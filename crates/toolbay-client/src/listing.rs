//! Filter / sort / paginate pipeline shared by the browse, "my tools"
//! and "my reservations" tables.

use chrono::{DateTime, Utc};

use toolbay_shared::types::{Reservation, Tool};

/// Row adapter supplying the search haystack and the sort keys.
pub trait ListEntry {
    /// Lowercased text the free-text filter matches against.
    fn haystack(&self) -> String;
    /// Name of the other party shown in the row.
    fn counterparty_key(&self) -> String;
    fn tool_key(&self) -> String;
    fn date_from_key(&self) -> Option<DateTime<Utc>>;
    fn date_to_key(&self) -> Option<DateTime<Utc>>;
    fn status_key(&self) -> String;
    fn price_key(&self) -> f64;
    fn status_code(&self) -> Option<&str>;
    fn category_code(&self) -> Option<&str>;
}

/// Normalise one haystack fragment: missing fields become empty strings.
fn norm(value: Option<&str>) -> String {
    value.unwrap_or("").trim().to_lowercase()
}

fn price_or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(p) if p.is_finite() => p,
        _ => 0.0,
    }
}

impl ListEntry for Tool {
    fn haystack(&self) -> String {
        format!(
            "{} {} {}",
            norm(Some(&self.name)),
            norm(self.category.as_ref().map(|c| c.name.as_str())),
            norm(self.status.as_ref().map(|s| s.name.as_str())),
        )
    }

    fn counterparty_key(&self) -> String {
        self.user
            .as_ref()
            .map(|owner| owner.display_name().to_lowercase())
            .unwrap_or_default()
    }

    fn tool_key(&self) -> String {
        self.name.to_lowercase()
    }

    fn date_from_key(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn date_to_key(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn status_key(&self) -> String {
        norm(self.status.as_ref().map(|s| s.name.as_str()))
    }

    fn price_key(&self) -> f64 {
        price_or_zero(self.rental_price)
    }

    fn status_code(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.code.as_str())
    }

    fn category_code(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.code.as_str())
    }
}

impl ListEntry for Reservation {
    fn haystack(&self) -> String {
        format!(
            "{} {} {}",
            norm(Some(&self.tool.name)),
            norm(Some(&self.counterparty_key())),
            norm(Some(&self.status.name)),
        )
    }

    /// Tool owner when the backend included one, otherwise the borrower.
    fn counterparty_key(&self) -> String {
        self.tool
            .user
            .as_ref()
            .map(|owner| owner.display_name())
            .unwrap_or_else(|| self.borrower.display_name())
            .to_lowercase()
    }

    fn tool_key(&self) -> String {
        self.tool.name.to_lowercase()
    }

    fn date_from_key(&self) -> Option<DateTime<Utc>> {
        Some(self.date_from)
    }

    fn date_to_key(&self) -> Option<DateTime<Utc>> {
        Some(self.date_to)
    }

    fn status_key(&self) -> String {
        self.status.name.to_lowercase()
    }

    fn price_key(&self) -> f64 {
        price_or_zero(self.tool.rental_price)
    }

    fn status_code(&self) -> Option<&str> {
        Some(&self.status.code)
    }

    fn category_code(&self) -> Option<&str> {
        self.tool.category.as_ref().map(|c| c.code.as_str())
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Counterparty,
    Tool,
    DateFrom,
    DateTo,
    Status,
    Price,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

impl SortKey {
    /// Direction a freshly selected key starts with: text columns read
    /// top-down alphabetically, dates and prices newest/highest first.
    pub fn default_direction(self) -> SortDirection {
        match self {
            Self::Counterparty | Self::Tool | Self::Status => SortDirection::Ascending,
            Self::DateFrom | Self::DateTo | Self::Price => SortDirection::Descending,
        }
    }
}

/// Active filter criteria. Empty text and `None` selectors match all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub text: String,
    pub status_code: Option<String>,
    pub category_code: Option<String>,
}

impl ListingFilter {
    fn matches<T: ListEntry>(&self, item: &T) -> bool {
        if let Some(wanted) = self.status_code.as_deref() {
            if item.status_code() != Some(wanted) {
                return false;
            }
        }
        if let Some(wanted) = self.category_code.as_deref() {
            if item.category_code() != Some(wanted) {
                return false;
            }
        }

        let query = self.text.trim().to_lowercase();
        query.is_empty() || item.haystack().contains(&query)
    }
}

/// Keep the items matching `filter`, preserving order.
pub fn filter<T: ListEntry + Clone>(items: &[T], filter: &ListingFilter) -> Vec<T> {
    items
        .iter()
        .filter(|item| filter.matches(*item))
        .cloned()
        .collect()
}

/// Sort in place by `key`, then apply `direction`.
pub fn sort<T: ListEntry>(items: &mut [T], key: SortKey, direction: SortDirection) {
    items.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Counterparty => a.counterparty_key().cmp(&b.counterparty_key()),
            SortKey::Tool => a.tool_key().cmp(&b.tool_key()),
            SortKey::DateFrom => a.date_from_key().cmp(&b.date_from_key()),
            SortKey::DateTo => a.date_to_key().cmp(&b.date_to_key()),
            SortKey::Status => a.status_key().cmp(&b.status_key()),
            SortKey::Price => a.price_key().total_cmp(&b.price_key()),
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Effective 1-indexed page after clamping.
    pub page: usize,
    /// At least 1, even for an empty result set.
    pub total_pages: usize,
}

/// Slice out one 1-indexed page. A page past the end clamps to the last
/// valid page; page 0 clamps to 1.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = (items.len().div_ceil(page_size)).max(1);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());
    let items = if start < items.len() {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        items,
        page,
        total_pages,
    }
}

// ---------------------------------------------------------------------------
// Stateful model
// ---------------------------------------------------------------------------

/// Table state: held items plus the active filter, sort and page.
///
/// Purely synchronous; the surrounding view loads the items and hands
/// them over. Any change to the filter, the search text or the sort
/// resets to page 1.
#[derive(Clone)]
pub struct ListingFilterModel<T> {
    items: Vec<T>,
    filter: ListingFilter,
    sort_key: SortKey,
    direction: SortDirection,
    page: usize,
    page_size: usize,
}

impl<T: ListEntry + Clone> ListingFilterModel<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            filter: ListingFilter::default(),
            sort_key: SortKey::DateFrom,
            direction: SortKey::DateFrom.default_direction(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Replace the held items (after a fetch). The page resets; the
    /// filter and sort survive a reload.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.page = 1;
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.filter.text = text.into();
        self.page = 1;
    }

    pub fn set_status(&mut self, code: Option<String>) {
        self.filter.status_code = code;
        self.page = 1;
    }

    pub fn set_category(&mut self, code: Option<String>) {
        self.filter.category_code = code;
        self.page = 1;
    }

    /// Clicking a column header: same key flips the direction, a new key
    /// starts from its default direction.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.direction = self.direction.flipped();
        } else {
            self.sort_key = key;
            self.direction = key.default_direction();
        }
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Run the pipeline: filter, sort, then slice the current page.
    pub fn visible(&self) -> Page<T> {
        let mut matching = filter(&self.items, &self.filter);
        sort(&mut matching, self.sort_key, self.direction);
        paginate(&matching, self.page, self.page_size)
    }
}
