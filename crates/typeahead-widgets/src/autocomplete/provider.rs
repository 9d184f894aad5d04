//! Pluggable search and accessor capabilities.
//!
//! The widget treats suggestions as opaque items. It reads them only through
//! an [`Accessors`] implementation and obtains them only from a
//! [`SearchProvider`], so both are chosen per widget instance.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use super::options::Options;

/// Why a search produced no result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The provider gave up, e.g. a backend request failed.
    #[error("search failed: {0}")]
    Failed(String),
    /// The provider dropped the request before completing it.
    #[error("search cancelled")]
    Cancelled,
}

/// Reads display data out of an opaque suggestion item.
pub trait Accessors<T>: Send + Sync {
    /// The value written into the field when the item is committed.
    fn value(&self, item: &T) -> String;

    /// Secondary text shown next to the value.
    fn title(&self, _item: &T) -> String {
        String::new()
    }

    /// The item's group under the given `group_by` key.
    fn group(&self, _item: &T, _key: &str) -> Option<String> {
        None
    }

    /// Render one panel row. The default highlights every case-insensitive
    /// occurrence of `query` in the value.
    fn format(&self, item: &T, query: &str, _index: usize, options: &Options<T>) -> Line<'static> {
        highlight_matches(&self.value(item), query, options.style.item, options.style.highlight)
    }
}

/// Produces candidate suggestions for a query.
///
/// An empty result means "no matches" and is not an error. Results may
/// resolve in any order relative to earlier calls; the widget discards stale
/// ones.
pub trait SearchProvider<T>: Send + Sync {
    /// Search `collection` for `query`.
    fn search(
        &self,
        query: String,
        collection: Arc<[T]>,
        accessors: Arc<dyn Accessors<T>>,
    ) -> BoxFuture<'static, Result<Vec<T>, SearchError>>;
}

/// Case-insensitive substring match on each item's value, in collection order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainsSearch;

impl<T: Clone + Send + Sync + 'static> SearchProvider<T> for ContainsSearch {
    fn search(
        &self,
        query: String,
        collection: Arc<[T]>,
        accessors: Arc<dyn Accessors<T>>,
    ) -> BoxFuture<'static, Result<Vec<T>, SearchError>> {
        async move {
            let needle = query.to_lowercase();
            let found = collection
                .iter()
                .filter(|item| accessors.value(item).to_lowercase().contains(&needle))
                .cloned()
                .collect();
            Ok(found)
        }
        .boxed()
    }
}

/// A [`SearchProvider`] backed by an async closure. See [`search_fn`].
pub struct SearchFn<F>(F);

/// Wrap an async closure as a [`SearchProvider`].
///
/// ```ignore
/// let provider = search_fn(|query: String, collection, accessors| async move {
///     backend.lookup(&query).await.map_err(|e| SearchError::Failed(e.to_string()))
/// });
/// ```
pub fn search_fn<T, F, Fut>(f: F) -> SearchFn<F>
where
    F: Fn(String, Arc<[T]>, Arc<dyn Accessors<T>>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<T>, SearchError>> + Send + 'static,
{
    SearchFn(f)
}

impl<T, F, Fut> SearchProvider<T> for SearchFn<F>
where
    F: Fn(String, Arc<[T]>, Arc<dyn Accessors<T>>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<T>, SearchError>> + Send + 'static,
{
    fn search(
        &self,
        query: String,
        collection: Arc<[T]>,
        accessors: Arc<dyn Accessors<T>>,
    ) -> BoxFuture<'static, Result<Vec<T>, SearchError>> {
        (self.0)(query, collection, accessors).boxed()
    }
}

/// A ready-made suggestion item, loadable from JSON.
///
/// Any keys besides `value` and `title` land in `data` and are available to
/// `group_by`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(flatten)]
    pub data: BTreeMap<String, serde_json::Value>,
}

impl Suggestion {
    /// A suggestion with only a value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Attach an extra data field.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// [`Accessors`] for [`Suggestion`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SuggestionAccessors;

impl Accessors<Suggestion> for SuggestionAccessors {
    fn value(&self, item: &Suggestion) -> String {
        item.value.clone()
    }

    fn title(&self, item: &Suggestion) -> String {
        item.title.clone()
    }

    fn group(&self, item: &Suggestion, key: &str) -> Option<String> {
        match item.data.get(key)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Split `text` into spans, styling every case-insensitive occurrence of
/// `query` with `highlight`. The query is matched literally.
pub fn highlight_matches(text: &str, query: &str, base: Style, highlight: Style) -> Line<'static> {
    if query.is_empty() {
        return Line::from(Span::styled(text.to_string(), base));
    }
    let re = match RegexBuilder::new(&regex::escape(query)).case_insensitive(true).build() {
        Ok(re) => re,
        Err(err) => {
            tracing::debug!(%err, "highlight pattern rejected");
            return Line::from(Span::styled(text.to_string(), base));
        }
    };

    let mut spans = Vec::new();
    let mut last = 0;
    for m in re.find_iter(text) {
        if m.start() > last {
            spans.push(Span::styled(text[last..m.start()].to_string(), base));
        }
        spans.push(Span::styled(m.as_str().to_string(), highlight));
        last = m.end();
    }
    if last < text.len() {
        spans.push(Span::styled(text[last..].to_string(), base));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Modifier;

    fn fruit() -> Arc<[Suggestion]> {
        ["apple", "Apricot", "banana"].into_iter().map(Suggestion::new).collect()
    }

    fn values(items: &[Suggestion]) -> Vec<&str> {
        items.iter().map(|s| s.value.as_str()).collect()
    }

    #[tokio::test]
    async fn contains_search_is_case_insensitive() {
        let found = ContainsSearch
            .search("AP".into(), fruit(), Arc::new(SuggestionAccessors))
            .await
            .unwrap();
        assert_eq!(values(&found), ["apple", "Apricot"]);
    }

    #[tokio::test]
    async fn contains_search_empty_result_is_ok() {
        let found = ContainsSearch
            .search("xyz".into(), fruit(), Arc::new(SuggestionAccessors))
            .await;
        assert_eq!(found, Ok(Vec::new()));
    }

    #[tokio::test]
    async fn closure_provider() {
        let provider = search_fn(|query: String, _collection: Arc<[Suggestion]>, _accessors| async move {
            if query == "boom" {
                Err(SearchError::Failed("backend down".into()))
            } else {
                Ok(vec![Suggestion::new(query)])
            }
        });
        let accessors: Arc<dyn Accessors<Suggestion>> = Arc::new(SuggestionAccessors);
        let ok = provider.search("kiwi".into(), fruit(), accessors.clone()).await.unwrap();
        assert_eq!(values(&ok), ["kiwi"]);
        let err = provider.search("boom".into(), fruit(), accessors).await.unwrap_err();
        assert_eq!(err.to_string(), "search failed: backend down");
    }

    #[test]
    fn suggestion_from_json_keeps_extra_fields() {
        let s: Suggestion =
            serde_json::from_str(r#"{"value":"Paris","title":"France","region":"Europe","pop":2}"#).unwrap();
        assert_eq!(s.value, "Paris");
        assert_eq!(SuggestionAccessors.title(&s), "France");
        assert_eq!(SuggestionAccessors.group(&s, "region").as_deref(), Some("Europe"));
        assert_eq!(SuggestionAccessors.group(&s, "pop").as_deref(), Some("2"));
        assert_eq!(SuggestionAccessors.group(&s, "missing"), None);
    }

    #[test]
    fn highlight_marks_every_occurrence() {
        let hl = Style::default().add_modifier(Modifier::BOLD);
        let line = highlight_matches("Banana", "an", Style::default(), hl);
        let parts: Vec<(&str, bool)> = line
            .spans
            .iter()
            .map(|s| (s.content.as_ref(), s.style == hl))
            .collect();
        assert_eq!(parts, [("B", false), ("an", true), ("an", true), ("a", false)]);
    }

    #[test]
    fn highlight_escapes_reserved_characters() {
        let hl = Style::default().add_modifier(Modifier::BOLD);
        let line = highlight_matches("c++ (lang)", "+ (", Style::default(), hl);
        let marked: Vec<&str> = line
            .spans
            .iter()
            .filter(|s| s.style == hl)
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(marked, ["+ ("]);
    }

    #[test]
    fn highlight_with_empty_query_is_plain() {
        let line = highlight_matches("kiwi", "", Style::default(), Style::default());
        assert_eq!(line.spans.len(), 1);
    }
}
