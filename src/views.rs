//! Derived view engine: pure projections over the entity cache
//!
//! Views hold presentation state (query, page, tab selection) and compute
//! their output from cache snapshots passed in by the caller. Everything here
//! is side-effect free; nothing mutates cache entries.

use crate::models::{Drink, Producer, ProducerReview, Review};

/// Mutually exclusive drink filter: selecting one kind clears the other
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DrinkFilter {
    /// No filter; yields the full collection
    #[default]
    None,
    /// Case-insensitive substring match on the drink name (stored lowercased)
    Text(String),
    /// Case-insensitive exact match on the category (stored lowercased)
    Category(String),
}

impl DrinkFilter {
    /// Build a text filter; blank input means no filter
    pub fn text(query: &str) -> Self {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            DrinkFilter::None
        } else {
            DrinkFilter::Text(q)
        }
    }

    /// Build a category filter; blank input means no filter
    pub fn category(category: &str) -> Self {
        let c = category.trim().to_lowercase();
        if c.is_empty() {
            DrinkFilter::None
        } else {
            DrinkFilter::Category(c)
        }
    }

    /// Whether one drink passes the filter
    pub fn matches(&self, drink: &Drink) -> bool {
        match self {
            DrinkFilter::None => true,
            DrinkFilter::Text(q) => drink.name.to_lowercase().contains(q.as_str()),
            DrinkFilter::Category(c) => drink.category.to_lowercase() == *c,
        }
    }
}

/// One 1-indexed pagination window over a filtered sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// The page actually shown; out-of-range requests clamp to the last page
    pub number: usize,
    /// `ceil(total_items / page_size)`, minimum 1
    pub total_pages: usize,
    pub total_items: usize,
}

fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    ((count + page_size - 1) / page_size).max(1)
}

/// Window a sequence into its 1-indexed `page` of `page_size` items.
/// Consecutive pages partition the input with no gaps or overlaps.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let total_items = items.len();
    let total = total_pages(total_items, page_size);
    let number = page.clamp(1, total);
    let start = (number - 1) * page_size;
    let items = items.into_iter().skip(start).take(page_size).collect();
    Page {
        items,
        number,
        total_pages: total,
        total_items,
    }
}

/// Filter and pagination state for the drink search screen
///
/// Text query and category selection are mutually exclusive; setting either
/// one clears the other and resets to page 1, as does changing the page size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView {
    filter: DrinkFilter,
    page: usize,
    page_size: usize,
}

impl SearchView {
    pub fn new(page_size: usize) -> Self {
        Self {
            filter: DrinkFilter::None,
            page: 1,
            page_size,
        }
    }

    pub fn filter(&self) -> &DrinkFilter {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Set the text query; clears any category selection, resets to page 1
    pub fn set_query(&mut self, query: &str) {
        self.filter = DrinkFilter::text(query);
        self.page = 1;
    }

    /// Select a category; clears any text query, resets to page 1
    pub fn set_category(&mut self, category: &str) {
        self.filter = DrinkFilter::category(category);
        self.page = 1;
    }

    /// Drop the filter, resetting to page 1
    pub fn clear_filter(&mut self) {
        self.filter = DrinkFilter::None;
        self.page = 1;
    }

    /// Change the page size, resetting to page 1
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
        self.page = 1;
    }

    /// Jump to a 1-indexed page; the window clamps to the last page if the
    /// filtered sequence is shorter
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self) {
        self.page += 1;
    }

    pub fn prev_page(&mut self) {
        self.page = (self.page - 1).max(1);
    }

    /// The matching subsequence of the full drink collection
    pub fn filtered<'a>(&self, drinks: &'a [Drink]) -> Vec<&'a Drink> {
        drinks.iter().filter(|d| self.filter.matches(d)).collect()
    }

    /// The current pagination window over the filtered sequence
    pub fn window<'a>(&self, drinks: &'a [Drink]) -> Page<&'a Drink> {
        paginate(self.filtered(drinks), self.page, self.page_size)
    }
}

/// The two parallel catalog tabs sharing one selection slot each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogTab {
    #[default]
    Drinks,
    Producers,
}

/// Per-tab remembered selection
///
/// Switching tabs never clears the other tab's memory. An empty selection
/// over a non-empty list resolves to the first item, and so does a remembered
/// id that no longer exists in the list; the memory itself is not overwritten
/// either way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabSelection {
    active: CatalogTab,
    drink_id: Option<String>,
    producer_id: Option<String>,
}

impl TabSelection {
    pub fn active(&self) -> CatalogTab {
        self.active
    }

    /// Switch the active tab
    pub fn activate(&mut self, tab: CatalogTab) {
        self.active = tab;
    }

    /// Remember a selection for the active tab
    pub fn select(&mut self, id: &str) {
        match self.active {
            CatalogTab::Drinks => self.drink_id = Some(id.to_owned()),
            CatalogTab::Producers => self.producer_id = Some(id.to_owned()),
        }
    }

    /// Resolve the drinks-tab selection against the current drink list
    pub fn selected_drink<'a>(&self, drinks: &'a [Drink]) -> Option<&'a Drink> {
        resolve(self.drink_id.as_deref(), drinks, |d| &d.id)
    }

    /// Resolve the producers-tab selection against the current producer list
    pub fn selected_producer<'a>(&self, producers: &'a [Producer]) -> Option<&'a Producer> {
        resolve(self.producer_id.as_deref(), producers, |p| &p.id)
    }
}

fn resolve<'a, T>(id: Option<&str>, items: &'a [T], key: impl Fn(&T) -> &str) -> Option<&'a T> {
    id.and_then(|id| items.iter().find(|item| key(item) == id))
        .or_else(|| items.first())
}

/// The owner's drink reviews, newest first, as the profile screen lists them
pub fn reviews_newest_first(reviews: &[Review]) -> Vec<&Review> {
    reviews.iter().rev().collect()
}

/// The owner's producer reviews, newest first
pub fn producer_reviews_newest_first(reviews: &[ProducerReview]) -> Vec<&ProducerReview> {
    reviews.iter().rev().collect()
}
