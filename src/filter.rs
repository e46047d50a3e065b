use std::time::{Duration, Instant};

use crate::models::collection::ProjectCollection;
use crate::models::project::Project;

/// Current category selection and search query. Empty strings mean
/// "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    selected_category: String,
    search_term: String,
}

impl FilterState {
    pub fn new(category: &str, search: &str) -> Self {
        let mut state = FilterState::default();
        state.set_category(category);
        state.set_search(search);
        state
    }

    pub fn selected_category(&self) -> &str {
        &self.selected_category
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_category(&mut self, category: &str) {
        self.selected_category = category.to_string();
    }

    /// Stores the query lowercased and trimmed.
    pub fn set_search(&mut self, raw: &str) {
        self.search_term = raw.trim().to_lowercase();
    }

    #[cfg(test)]
    pub fn clear(&mut self) {
        self.selected_category.clear();
        self.search_term.clear();
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.selected_category.is_empty() && self.search_term.is_empty()
    }

    pub fn matches(&self, project: &Project) -> bool {
        if !self.selected_category.is_empty() && !project.has_tag(&self.selected_category) {
            return false;
        }
        if !self.search_term.is_empty() && !project.searchable_text().contains(&self.search_term) {
            return false;
        }
        true
    }
}

/// Derive the visible subset. Input order is preserved; the source
/// collection is left untouched.
pub fn filter(collection: &ProjectCollection, state: &FilterState) -> ProjectCollection {
    collection
        .iter()
        .filter(|p| state.matches(p))
        .cloned()
        .collect()
}

/// Holds back a value until input has been idle for `window`. Every new
/// value restarts the timer.
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Debouncer {
            window,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// When the pending value will fire if nothing else arrives.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.window)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Release the pending value once the quiescence window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Owns the base collection, the filter state and the derived visible
/// subset. Category changes apply at once; search input is debounced.
#[derive(Debug)]
pub struct FilterController {
    base: ProjectCollection,
    state: FilterState,
    visible: ProjectCollection,
    search: Debouncer<String>,
}

impl FilterController {
    pub fn new(base: ProjectCollection, quiescence: Duration) -> Self {
        let visible = base.clone();
        FilterController {
            base,
            state: FilterState::default(),
            visible,
            search: Debouncer::new(quiescence),
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn visible(&self) -> &ProjectCollection {
        &self.visible
    }

    pub fn total(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty_result(&self) -> bool {
        self.visible.is_empty()
    }

    fn recompute(&mut self) {
        self.visible = filter(&self.base, &self.state);
        log::debug!(
            "Showing {} of {} projects (category={:?}, search={:?})",
            self.visible.len(),
            self.base.len(),
            self.state.selected_category(),
            self.state.search_term()
        );
    }

    pub fn on_category_change(&mut self, category: &str) {
        self.state.set_category(category);
        self.recompute();
    }

    /// Apply a search immediately, for committed values such as a form
    /// submission or a query string.
    pub fn submit_search(&mut self, raw: &str) {
        self.search.cancel();
        self.state.set_search(raw);
        self.recompute();
    }
}

/// Keystroke-level behaviour of the homepage filter. In generated pages the
/// inline filter script (`render::scripts::filter_script`) does the same in
/// the browser: input waits for the debounce window, clearing drops both
/// fields and any pending input. These model it for tests.
#[cfg(test)]
impl FilterController {
    pub fn base(&self) -> &ProjectCollection {
        &self.base
    }

    /// Record a keystroke. Nothing is recomputed until `tick` observes
    /// the quiescence window has passed.
    pub fn on_search_input(&mut self, raw: &str, now: Instant) {
        self.search.push(raw.to_string(), now);
    }

    /// Advance time. Returns true when a debounced search was applied.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.search.poll(now) {
            Some(raw) => {
                self.state.set_search(&raw);
                self.recompute();
                true
            }
            None => false,
        }
    }

    /// Handler for the "Clear Filters" action of the no-results panel.
    pub fn reset(&mut self) {
        self.search.cancel();
        self.state.clear();
        self.recompute();
    }
}
