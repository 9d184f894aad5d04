//! Interaction state: the accepted suggestions, the selection, and the
//! bookkeeping that decides whether a search result may be applied.

use std::collections::{HashMap, HashSet};

/// Ticket identifying one dispatched search.
pub type Seq = u64;

/// Suggestions, selection, and search bookkeeping for one widget.
///
/// `selected` is either `None` or a valid index into `suggestions`; every
/// method that replaces the list resets it.
#[derive(Debug)]
pub struct SuggestionStore<T> {
    current_value: String,
    query: String,
    selected: Option<usize>,
    suggestions: Vec<T>,
    hint: Option<String>,
    notice: bool,
    issued: Seq,
    cache_floor: Seq,
    cache: HashMap<String, Vec<T>>,
    bad_roots: HashSet<String>,
}

impl<T> Default for SuggestionStore<T> {
    fn default() -> Self {
        Self {
            current_value: String::new(),
            query: String::new(),
            selected: None,
            suggestions: Vec::new(),
            hint: None,
            notice: false,
            issued: 0,
            cache_floor: 0,
            cache: HashMap::new(),
            bad_roots: HashSet::new(),
        }
    }
}

impl<T: Clone> SuggestionStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field text as of the last query change or commit.
    pub fn current_value(&self) -> &str {
        &self.current_value
    }

    /// The last derived query.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn suggestions(&self) -> &[T] {
        &self.suggestions
    }

    /// Value of the first suggestion of the last accepted result.
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Whether the last accepted result was empty.
    pub fn showing_notice(&self) -> bool {
        self.notice
    }

    /// Record a new query. Clears the selection; the suggestions stay until a
    /// result replaces them.
    pub fn begin_query(&mut self, value: String, query: String) {
        self.current_value = value;
        self.query = query;
        self.selected = None;
    }

    /// Record a committed field value.
    pub fn set_current_value(&mut self, value: String) {
        self.current_value = value;
    }

    /// Select `index`, or clear the selection. Out-of-range indices clear it.
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.suggestions.len());
    }

    /// Issue the ticket for a new search. Every earlier ticket becomes stale.
    pub fn dispatch(&mut self) -> Seq {
        self.issued += 1;
        self.issued
    }

    /// Make every outstanding ticket stale without issuing a new one.
    pub fn invalidate(&mut self) {
        self.issued += 1;
    }

    /// Whether a result carrying `seq` is the latest dispatched one.
    pub fn is_current(&self, seq: Seq) -> bool {
        seq == self.issued
    }

    /// Atomically install a new result.
    pub fn replace(&mut self, suggestions: Vec<T>, hint: Option<String>) {
        self.notice = suggestions.is_empty();
        self.suggestions = suggestions;
        self.hint = hint;
        self.selected = None;
    }

    /// A result that can be served without searching, if any.
    ///
    /// A cached result for exactly `query` wins. Otherwise, when
    /// `prevent_bad_queries` is set, a query extending a root that previously
    /// found nothing is answered with an empty result.
    ///
    /// Roots match case-sensitively: a provider may distinguish case, so
    /// "XYZ" finding nothing says nothing about "xyza".
    pub fn lookup(&self, query: &str, prevent_bad_queries: bool) -> Option<Vec<T>> {
        if let Some(hit) = self.cache.get(query) {
            return Some(hit.clone());
        }
        if prevent_bad_queries && self.covered(query) {
            return Some(Vec::new());
        }
        None
    }

    /// Remember the result of search `seq` for later [`lookup`](Self::lookup)s.
    /// Searches dispatched before the last [`clear_cache`](Self::clear_cache)
    /// are not remembered.
    pub fn remember(&mut self, seq: Seq, query: &str, result: &[T], prevent_bad_queries: bool) {
        if seq <= self.cache_floor {
            return;
        }
        if result.is_empty() && prevent_bad_queries && !self.covered(query) {
            self.bad_roots.retain(|root| !root.starts_with(query));
            self.bad_roots.insert(query.to_string());
        }
        self.cache.insert(query.to_string(), result.to_vec());
    }

    fn covered(&self, query: &str) -> bool {
        self.bad_roots.iter().any(|root| query.starts_with(root.as_str()))
    }

    /// Forget cached results and bad-query roots.
    pub fn clear_cache(&mut self) {
        self.cache_floor = self.issued;
        self.cache.clear();
        self.bad_roots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(items: &[&str]) -> SuggestionStore<String> {
        let mut store = SuggestionStore::new();
        store.replace(items.iter().map(|s| s.to_string()).collect(), items.first().map(|s| s.to_string()));
        store
    }

    #[test]
    fn only_the_latest_ticket_is_current() {
        let mut store = SuggestionStore::<String>::new();
        let a = store.dispatch();
        let ap = store.dispatch();
        assert!(!store.is_current(a));
        assert!(store.is_current(ap));
        store.invalidate();
        assert!(!store.is_current(ap));
    }

    #[test]
    fn replace_resets_selection() {
        let mut store = store_with(&["apple", "apricot"]);
        store.select(Some(1));
        store.replace(vec!["kiwi".to_string()], Some("kiwi".to_string()));
        assert_eq!(store.selected(), None);
        assert_eq!(store.hint(), Some("kiwi"));
    }

    #[test]
    fn select_rejects_out_of_range() {
        let mut store = store_with(&["apple"]);
        store.select(Some(0));
        assert_eq!(store.selected(), Some(0));
        store.select(Some(1));
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn empty_result_shows_notice() {
        let mut store = store_with(&["apple"]);
        assert!(!store.showing_notice());
        store.replace(Vec::new(), None);
        assert!(store.showing_notice());
        assert!(store.suggestions().is_empty());
    }

    #[test]
    fn begin_query_keeps_suggestions() {
        let mut store = store_with(&["apple"]);
        store.select(Some(0));
        store.begin_query("ap".into(), "ap".into());
        assert_eq!(store.selected(), None);
        assert_eq!(store.suggestions().len(), 1);
    }

    #[test]
    fn cache_hit_for_exact_query() {
        let mut store = SuggestionStore::<String>::new();
        let seq = store.dispatch();
        store.remember(seq, "ap", &["apple".to_string()], true);
        assert_eq!(store.lookup("ap", true), Some(vec!["apple".to_string()]));
        assert_eq!(store.lookup("app", true), None);
    }

    #[test]
    fn bad_root_answers_extensions() {
        let mut store = SuggestionStore::<String>::new();
        let seq = store.dispatch();
        store.remember(seq, "xyz", &[], true);
        assert_eq!(store.lookup("xyza", true), Some(Vec::new()));
        assert_eq!(store.lookup("xy", true), None);
    }

    #[test]
    fn bad_roots_keep_only_the_shortest_prefix() {
        let mut store = SuggestionStore::<String>::new();
        let seq = store.dispatch();
        store.remember(seq, "xyz", &[], true);
        store.remember(seq, "xyz", &[], true);
        store.remember(seq, "xyzq", &[], true);
        assert_eq!(store.bad_roots.len(), 1);
        store.remember(seq, "xy", &[], true);
        assert_eq!(store.bad_roots, HashSet::from(["xy".to_string()]));
        assert_eq!(store.lookup("xyzzy", true), Some(Vec::new()));
    }

    #[test]
    fn bad_roots_are_case_sensitive() {
        let mut store = SuggestionStore::<String>::new();
        let seq = store.dispatch();
        store.remember(seq, "XYZ", &[], true);
        assert_eq!(store.lookup("XYZA", true), Some(Vec::new()));
        assert_eq!(store.lookup("xyza", true), None);
    }

    #[test]
    fn bad_roots_need_prevent_bad_queries() {
        let mut store = SuggestionStore::<String>::new();
        let seq = store.dispatch();
        store.remember(seq, "xyz", &[], false);
        assert_eq!(store.lookup("xyza", false), None);
        assert_eq!(store.lookup("xyz", false), Some(Vec::new()));
    }

    #[test]
    fn clear_cache_forgets_everything() {
        let mut store = SuggestionStore::<String>::new();
        let seq = store.dispatch();
        store.remember(seq, "xyz", &[], true);
        store.remember(seq, "ap", &["apple".to_string()], true);
        store.clear_cache();
        assert_eq!(store.lookup("xyza", true), None);
        assert_eq!(store.lookup("ap", true), None);
    }

    #[test]
    fn results_from_before_a_clear_are_not_cached() {
        let mut store = SuggestionStore::<String>::new();
        let before = store.dispatch();
        store.clear_cache();
        store.remember(before, "ap", &["apple".to_string()], true);
        assert_eq!(store.lookup("ap", true), None);
        let after = store.dispatch();
        store.remember(after, "ap", &["apple".to_string()], true);
        assert!(store.lookup("ap", true).is_some());
    }
}
