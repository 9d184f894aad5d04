//! Widget configuration.
//!
//! [`Options`] is immutable once built. The widget holds it behind an `Arc`
//! and [`Autocomplete::set_options`](super::Autocomplete::set_options) swaps
//! in a freshly merged value, so a search dispatched under the old
//! configuration keeps reading a consistent snapshot.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

use super::position::Orientation;
use super::provider::{Accessors, ContainsSearch, SearchProvider, Suggestion, SuggestionAccessors};
use super::query::Delimiter;

const DEFAULT_DELAY: Duration = Duration::from_millis(200);

/// Colors and modifiers for the suggestion panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelStyle {
    /// Unselected rows.
    pub item: Style,
    /// The selected row.
    pub selected: Style,
    /// Query matches inside a row.
    pub highlight: Style,
    /// Group header rows.
    pub group: Style,
    /// Titles shown after each value.
    pub title: Style,
    /// The no-suggestion notice.
    pub notice: Style,
    /// Ghost text completing the field from the first suggestion.
    pub hint: Style,
    /// The panel border.
    pub border: Style,
}

impl Default for PanelStyle {
    fn default() -> Self {
        Self {
            item: Style::default().fg(Color::White),
            selected: Style::default().fg(Color::Black).bg(Color::Cyan),
            highlight: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            group: Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            title: Style::default().fg(Color::DarkGray),
            notice: Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            hint: Style::default().fg(Color::DarkGray),
            border: Style::default().fg(Color::Gray),
        }
    }
}

/// Complete configuration for one autocomplete widget.
pub struct Options<T> {
    pub(crate) collection: Arc<[T]>,
    pub(crate) search: Arc<dyn SearchProvider<T>>,
    pub(crate) accessors: Arc<dyn Accessors<T>>,
    pub(crate) no_cache: bool,
    pub(crate) delimiter: Option<Delimiter>,
    pub(crate) min_chars: usize,
    pub(crate) prevent_bad_queries: bool,
    pub(crate) show_no_suggestion_notice: bool,
    pub(crate) no_suggestion_notice: String,
    pub(crate) orientation: Orientation,
    pub(crate) group_by: Option<String>,
    pub(crate) max_height: u16,
    pub(crate) z_index: u16,
    pub(crate) input_delay: Duration,
    pub(crate) resize_delay: Duration,
    pub(crate) blur_delay: Duration,
    pub(crate) style: PanelStyle,
}

impl<T: Clone + Send + Sync + 'static> Options<T> {
    /// Default options over `collection`, read through `accessors` and
    /// searched with [`ContainsSearch`].
    pub fn new(collection: impl Into<Arc<[T]>>, accessors: impl Accessors<T> + 'static) -> Self {
        Self {
            collection: collection.into(),
            search: Arc::new(ContainsSearch),
            accessors: Arc::new(accessors),
            no_cache: false,
            delimiter: None,
            min_chars: 1,
            prevent_bad_queries: true,
            show_no_suggestion_notice: true,
            no_suggestion_notice: "No results".to_string(),
            orientation: Orientation::Auto,
            group_by: None,
            max_height: 8,
            z_index: 1,
            input_delay: DEFAULT_DELAY,
            resize_delay: DEFAULT_DELAY,
            blur_delay: DEFAULT_DELAY,
            style: PanelStyle::default(),
        }
    }
}

impl Options<Suggestion> {
    /// Default options over a list of [`Suggestion`]s.
    pub fn for_suggestions(collection: impl Into<Arc<[Suggestion]>>) -> Self {
        Self::new(collection, SuggestionAccessors)
    }
}

impl<T> Options<T> {
    /// Use a custom search provider.
    pub fn with_search(mut self, search: impl SearchProvider<T> + 'static) -> Self {
        self.search = Arc::new(search);
        self
    }

    /// Disable the result cache and bad-query memory.
    pub fn with_no_cache(mut self, no_cache: bool) -> Self {
        self.no_cache = no_cache;
        self
    }

    /// Search only the token after the last delimiter.
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Minimum query length (in chars) before searching. Clamped to at least 1.
    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars.max(1);
        self
    }

    /// Skip searching queries that extend a query which found nothing.
    pub fn with_prevent_bad_queries(mut self, prevent: bool) -> Self {
        self.prevent_bad_queries = prevent;
        self
    }

    /// Show a notice instead of hiding the panel when nothing matches.
    pub fn with_show_no_suggestion_notice(mut self, show: bool) -> Self {
        self.show_no_suggestion_notice = show;
        self
    }

    /// Notice text for empty results.
    pub fn with_no_suggestion_notice(mut self, notice: impl Into<String>) -> Self {
        self.no_suggestion_notice = notice.into();
        self
    }

    /// Vertical placement of the panel.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Group consecutive suggestions under headers by this data key.
    pub fn with_group_by(mut self, key: impl Into<String>) -> Self {
        self.group_by = Some(key.into());
        self
    }

    /// Maximum number of panel rows, not counting the border.
    pub fn with_max_height(mut self, rows: u16) -> Self {
        self.max_height = rows.max(1);
        self
    }

    /// Stacking level. At `0` the panel is drawn over existing cells without
    /// clearing them first.
    pub fn with_z_index(mut self, z_index: u16) -> Self {
        self.z_index = z_index;
        self
    }

    /// Quiet period before a keystroke triggers a query evaluation.
    pub fn with_input_delay(mut self, delay: Duration) -> Self {
        self.input_delay = delay;
        self
    }

    /// Quiet period before a viewport resize repositions the panel.
    pub fn with_resize_delay(mut self, delay: Duration) -> Self {
        self.resize_delay = delay;
        self
    }

    /// Grace period between losing focus and hiding the panel.
    pub fn with_blur_delay(mut self, delay: Duration) -> Self {
        self.blur_delay = delay;
        self
    }

    /// Panel colors.
    pub fn with_style(mut self, style: PanelStyle) -> Self {
        self.style = style;
        self
    }

    /// The items searched by the default provider.
    pub fn collection(&self) -> &Arc<[T]> {
        &self.collection
    }

    /// The configured delimiter.
    pub fn delimiter(&self) -> Option<&Delimiter> {
        self.delimiter.as_ref()
    }

    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn max_height(&self) -> u16 {
        self.max_height
    }

    pub fn z_index(&self) -> u16 {
        self.z_index
    }

    pub fn style(&self) -> &PanelStyle {
        &self.style
    }

    /// A new value with every field set in `update` replaced.
    pub fn merged(&self, update: OptionsUpdate<T>) -> Self {
        Self {
            collection: update.collection.unwrap_or_else(|| self.collection.clone()),
            search: update.search.unwrap_or_else(|| self.search.clone()),
            accessors: update.accessors.unwrap_or_else(|| self.accessors.clone()),
            no_cache: update.no_cache.unwrap_or(self.no_cache),
            delimiter: update.delimiter.unwrap_or_else(|| self.delimiter.clone()),
            min_chars: update.min_chars.map_or(self.min_chars, |n| n.max(1)),
            prevent_bad_queries: update.prevent_bad_queries.unwrap_or(self.prevent_bad_queries),
            show_no_suggestion_notice: update
                .show_no_suggestion_notice
                .unwrap_or(self.show_no_suggestion_notice),
            no_suggestion_notice: update
                .no_suggestion_notice
                .unwrap_or_else(|| self.no_suggestion_notice.clone()),
            orientation: update.orientation.unwrap_or(self.orientation),
            group_by: update.group_by.unwrap_or_else(|| self.group_by.clone()),
            max_height: update.max_height.map_or(self.max_height, |h| h.max(1)),
            z_index: update.z_index.unwrap_or(self.z_index),
            input_delay: update.input_delay.unwrap_or(self.input_delay),
            resize_delay: update.resize_delay.unwrap_or(self.resize_delay),
            blur_delay: update.blur_delay.unwrap_or(self.blur_delay),
            style: update.style.unwrap_or(self.style),
        }
    }
}

impl<T> Clone for Options<T> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            search: self.search.clone(),
            accessors: self.accessors.clone(),
            no_cache: self.no_cache,
            delimiter: self.delimiter.clone(),
            min_chars: self.min_chars,
            prevent_bad_queries: self.prevent_bad_queries,
            show_no_suggestion_notice: self.show_no_suggestion_notice,
            no_suggestion_notice: self.no_suggestion_notice.clone(),
            orientation: self.orientation,
            group_by: self.group_by.clone(),
            max_height: self.max_height,
            z_index: self.z_index,
            input_delay: self.input_delay,
            resize_delay: self.resize_delay,
            blur_delay: self.blur_delay,
            style: self.style,
        }
    }
}

impl<T> fmt::Debug for Options<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("collection_len", &self.collection.len())
            .field("no_cache", &self.no_cache)
            .field("delimiter", &self.delimiter)
            .field("min_chars", &self.min_chars)
            .field("prevent_bad_queries", &self.prevent_bad_queries)
            .field("show_no_suggestion_notice", &self.show_no_suggestion_notice)
            .field("orientation", &self.orientation)
            .field("group_by", &self.group_by)
            .field("max_height", &self.max_height)
            .field("z_index", &self.z_index)
            .finish_non_exhaustive()
    }
}

/// A partial set of options to merge over the current ones.
///
/// Unset fields keep their current value. `delimiter` and `group_by` take an
/// inner `Option` so they can be cleared.
pub struct OptionsUpdate<T> {
    pub collection: Option<Arc<[T]>>,
    pub search: Option<Arc<dyn SearchProvider<T>>>,
    pub accessors: Option<Arc<dyn Accessors<T>>>,
    pub no_cache: Option<bool>,
    pub delimiter: Option<Option<Delimiter>>,
    pub min_chars: Option<usize>,
    pub prevent_bad_queries: Option<bool>,
    pub show_no_suggestion_notice: Option<bool>,
    pub no_suggestion_notice: Option<String>,
    pub orientation: Option<Orientation>,
    pub group_by: Option<Option<String>>,
    pub max_height: Option<u16>,
    pub z_index: Option<u16>,
    pub input_delay: Option<Duration>,
    pub resize_delay: Option<Duration>,
    pub blur_delay: Option<Duration>,
    pub style: Option<PanelStyle>,
}

impl<T> Default for OptionsUpdate<T> {
    fn default() -> Self {
        Self {
            collection: None,
            search: None,
            accessors: None,
            no_cache: None,
            delimiter: None,
            min_chars: None,
            prevent_bad_queries: None,
            show_no_suggestion_notice: None,
            no_suggestion_notice: None,
            orientation: None,
            group_by: None,
            max_height: None,
            z_index: None,
            input_delay: None,
            resize_delay: None,
            blur_delay: None,
            style: None,
        }
    }
}

impl<T> OptionsUpdate<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the collection.
    pub fn collection(mut self, collection: impl Into<Arc<[T]>>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Replace the search provider.
    pub fn search(mut self, search: impl SearchProvider<T> + 'static) -> Self {
        self.search = Some(Arc::new(search));
        self
    }

    pub fn min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = Some(min_chars);
        self
    }

    pub fn delimiter(mut self, delimiter: Option<Delimiter>) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn group_by(mut self, key: Option<String>) -> Self {
        self.group_by = Some(key);
        self
    }

    pub fn max_height(mut self, rows: u16) -> Self {
        self.max_height = Some(rows);
        self
    }

    pub fn no_cache(mut self, no_cache: bool) -> Self {
        self.no_cache = Some(no_cache);
        self
    }

    pub fn no_suggestion_notice(mut self, notice: impl Into<String>) -> Self {
        self.no_suggestion_notice = Some(notice.into());
        self
    }
}

/// The scalar subset of [`Options`], as loaded from a config file.
///
/// Keys are camelCase. Unrecognised keys are kept in `extra` and otherwise
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub no_cache: Option<bool>,
    /// A literal delimiter string.
    pub delimiter: Option<String>,
    /// A regex delimiter; wins over `delimiter` when both are set.
    pub delimiter_pattern: Option<String>,
    pub min_chars: Option<usize>,
    pub prevent_bad_queries: Option<bool>,
    pub show_no_suggestion_notice: Option<bool>,
    pub no_suggestion_notice: Option<String>,
    pub orientation: Option<Orientation>,
    pub group_by: Option<String>,
    pub max_height: Option<u16>,
    pub z_index: Option<u16>,
    pub input_delay_ms: Option<u64>,
    pub resize_delay_ms: Option<u64>,
    pub blur_delay_ms: Option<u64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Settings {
    /// Convert into an update. Fails only on an invalid `delimiterPattern`.
    pub fn into_update<T>(self) -> Result<OptionsUpdate<T>, regex::Error> {
        if !self.extra.is_empty() {
            tracing::debug!(keys = ?self.extra.keys().collect::<Vec<_>>(), "ignoring unknown settings");
        }
        let delimiter = match (self.delimiter_pattern, self.delimiter) {
            (Some(pattern), _) => Some(Some(Delimiter::pattern(&pattern)?)),
            (None, Some(literal)) => Some(Some(Delimiter::literal(literal))),
            (None, None) => None,
        };
        Ok(OptionsUpdate {
            no_cache: self.no_cache,
            delimiter,
            min_chars: self.min_chars,
            prevent_bad_queries: self.prevent_bad_queries,
            show_no_suggestion_notice: self.show_no_suggestion_notice,
            no_suggestion_notice: self.no_suggestion_notice,
            orientation: self.orientation,
            group_by: self.group_by.map(Some),
            max_height: self.max_height,
            z_index: self.z_index,
            input_delay: self.input_delay_ms.map(Duration::from_millis),
            resize_delay: self.resize_delay_ms.map(Duration::from_millis),
            blur_delay: self.blur_delay_ms.map(Duration::from_millis),
            ..OptionsUpdate::default()
        })
    }
}
