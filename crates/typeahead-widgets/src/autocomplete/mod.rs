//! Autocomplete: a text field with debounced, asynchronous suggestions.
//!
//! As the user types, the widget derives a query from the field text, waits
//! for typing to pause, asks its [`SearchProvider`] for matches, and shows
//! them in a floating panel above or below the field. Up and Down preview a
//! suggestion in the field, Enter or a click commits it, and Esc or losing
//! focus hides the panel.
//!
//! Searches may resolve out of order. Each dispatch carries a sequence number
//! and only the most recent one is ever applied.
//!
//! # Example
//!
//! ```ignore
//! use typeahead_widgets::autocomplete::{Autocomplete, FieldRegistry, Options, Suggestion};
//!
//! let mut fields = FieldRegistry::new(frame_area);
//! fields.register("fruit", Rect::new(2, 1, 30, 1));
//!
//! let fruit = Autocomplete::create(
//!     "fruit",
//!     &mut fields,
//!     Options::for_suggestions(vec![Suggestion::new("apple"), Suggestion::new("apricot")])
//!         .with_min_chars(2),
//! )?;
//! ```

pub mod navigation;
pub mod options;
pub mod position;
pub mod provider;
pub mod query;
pub mod registry;
mod render;
pub mod store;


use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use typeahead_core::{Command, Component, DebounceLine};
use unicode_width::UnicodeWidthChar;

use crate::field::{Field, FieldEdit};

pub use navigation::{transition, Effect, Navigation};
pub use options::{Options, OptionsUpdate, PanelStyle, Settings};
pub use position::{place, Orientation, Visibility};
pub use provider::{
    highlight_matches, search_fn, Accessors, ContainsSearch, SearchError, SearchFn, SearchProvider,
    Suggestion, SuggestionAccessors,
};
pub use query::{derive_query, substitute_token, Delimiter};
pub use registry::{AutocompleteError, FieldRegistry};
pub use store::{Seq, SuggestionStore};

use render::{PanelView, Row};

/// Messages for the autocomplete component.
#[derive(Debug)]
pub enum Message<T> {
    /// A key press while the field has focus.
    Key(KeyEvent),
    /// Text pasted into the field.
    Paste(String),
    /// The field gained focus.
    Focus,
    /// The field lost focus.
    Blur,
    /// A mouse event anywhere on screen.
    Mouse(MouseEvent),
    /// The viewport was resized.
    Resized(u16, u16),
    /// The input debounce line elapsed.
    InputSettled(u64),
    /// The resize debounce line elapsed.
    ResizeSettled(u64),
    /// The blur debounce line elapsed.
    BlurSettled(u64),
    /// A search finished.
    SearchResolved {
        seq: Seq,
        query: String,
        result: Result<Vec<T>, SearchError>,
    },
    /// Emitted after a suggestion is written into the field.
    Committed(String),
    /// Emitted when the provider reports a failure; the panel is hidden.
    SearchFailed(String),
}

/// Autocomplete widget bound to one registered field.
pub struct Autocomplete<T> {
    name: String,
    field: Field,
    options: Arc<Options<T>>,
    store: SuggestionStore<T>,
    rows: Vec<Row>,
    scroll: usize,
    input_line: DebounceLine,
    resize_line: DebounceLine,
    blur_line: DebounceLine,
    visibility: Visibility,
    enabled: bool,
    focused: bool,
    /// Set when the user or the blur line hid the panel. Late results are
    /// stored but do not reopen it until the field is edited or refocused.
    dismissed: bool,
    pointer_inside: bool,
    field_area: Rect,
    viewport: Rect,
    panel_area: Rect,
}

impl<T: Clone + Send + Sync + 'static> Autocomplete<T> {
    /// Bind a new widget to the field registered as `name`.
    ///
    /// Fails without side effects if the field is unknown or already bound.
    pub fn create(name: &str, registry: &mut FieldRegistry, options: Options<T>) -> Result<Self, AutocompleteError> {
        let field_area = registry.bind(name)?;
        tracing::debug!(field = name, ?field_area, "autocomplete bound");
        Ok(Self {
            name: name.to_string(),
            field: Field::new(),
            input_line: DebounceLine::new("input", options.input_delay),
            resize_line: DebounceLine::new("resize", options.resize_delay),
            blur_line: DebounceLine::new("blur", options.blur_delay),
            options: Arc::new(options),
            store: SuggestionStore::new(),
            rows: Vec::new(),
            scroll: 0,
            visibility: Visibility::Hidden,
            enabled: true,
            focused: false,
            dismissed: false,
            pointer_inside: false,
            field_area,
            viewport: registry.viewport(),
            panel_area: Rect::default(),
        })
    }

    /// Disable the widget and give its field back to the registry.
    pub fn destroy(mut self, registry: &mut FieldRegistry) {
        self.disable();
        registry.release(&self.name);
        tracing::debug!(field = %self.name, "autocomplete released");
    }

    /// Merge `update` over the current options and swap them in.
    ///
    /// Cached results are dropped. A visible panel is re-laid out at once.
    pub fn set_options(&mut self, update: OptionsUpdate<T>) {
        let options = self.options.merged(update);
        self.input_line.set_delay(options.input_delay);
        self.resize_line.set_delay(options.resize_delay);
        self.blur_line.set_delay(options.blur_delay);
        self.options = Arc::new(options);
        self.store.clear_cache();
        self.rebuild_rows();
        if self.is_visible() {
            self.reposition();
        }
        tracing::debug!(field = %self.name, options = ?self.options, "options replaced");
    }

    /// Resume reacting to events.
    pub fn enable(&mut self) {
        self.enabled = true;
        tracing::debug!(field = %self.name, "enabled");
    }

    /// Hide the panel, cancel every timer, and ignore events and in-flight
    /// results until [`enable`](Self::enable).
    pub fn disable(&mut self) {
        self.hide();
        self.input_line.cancel();
        self.resize_line.cancel();
        self.blur_line.cancel();
        self.store.invalidate();
        self.enabled = false;
        tracing::debug!(field = %self.name, "disabled");
    }

    /// Name of the bound field.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &Options<T> {
        &self.options
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Text currently shown in the field, including any preview.
    pub fn value(&self) -> String {
        self.field.value()
    }

    /// Write the field programmatically. This is not an input event and
    /// triggers no search.
    pub fn set_value(&mut self, value: &str) {
        self.field.set_value(value);
    }

    /// Field text before navigation started, or the last committed value.
    pub fn current_value(&self) -> &str {
        self.store.current_value()
    }

    pub fn query(&self) -> &str {
        self.store.query()
    }

    pub fn selected(&self) -> Option<usize> {
        self.store.selected()
    }

    pub fn selected_suggestion(&self) -> Option<&T> {
        self.store.selected().and_then(|i| self.store.suggestions().get(i))
    }

    pub fn suggestions(&self) -> &[T] {
        self.store.suggestions()
    }

    /// Value of the first suggestion, drawn as ghost text after the field.
    pub fn hint(&self) -> Option<&str> {
        self.store.hint()
    }

    /// Whether the panel holds the no-suggestion notice.
    pub fn showing_notice(&self) -> bool {
        self.store.showing_notice()
    }

    /// Where the panel is drawn while visible.
    pub fn panel_area(&self) -> Rect {
        self.panel_area
    }

    pub fn field_area(&self) -> Rect {
        self.field_area
    }

    /// Move the field. Takes effect at the next show or resize.
    pub fn set_field_area(&mut self, area: Rect) {
        self.field_area = area;
    }

    /// Change the viewport without a resize event.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    fn show(&mut self) {
        if !self.enabled || self.dismissed {
            return;
        }
        let has_content = !self.store.suggestions().is_empty()
            || (self.store.showing_notice() && self.options.show_no_suggestion_notice);
        if !has_content {
            return;
        }
        self.reposition();
        if !self.is_visible() {
            tracing::trace!(field = %self.name, panel = ?self.panel_area, "panel shown");
        }
        self.visibility = Visibility::Visible;
    }

    fn hide(&mut self) {
        if self.is_visible() {
            tracing::trace!(field = %self.name, "panel hidden");
        }
        self.visibility = Visibility::Hidden;
        self.pointer_inside = false;
    }

    fn reposition(&mut self) {
        let height = render::panel_height(self.rows.len(), self.store.showing_notice(), self.options.max_height);
        self.panel_area = place(self.options.orientation, self.field_area, self.viewport, height);
    }

    fn rebuild_rows(&mut self) {
        let options = &self.options;
        self.rows = render::build_rows(
            self.store.suggestions(),
            options.accessors.as_ref(),
            options.group_by.as_deref(),
        );
        self.scroll = 0;
    }

    fn scroll_to(&mut self, index: usize) {
        if let Some(row) = render::row_of(&self.rows, index) {
            let visible = usize::from(render::inner(self.panel_area).height);
            self.scroll = render::follow(&self.rows, self.scroll, row, visible);
        }
    }

    fn input_changed(&mut self) -> Command<Message<T>> {
        if !self.enabled {
            return Command::none();
        }
        self.dismissed = false;
        self.input_line.schedule(Message::InputSettled)
    }

    /// Evaluate the settled field text: re-show, hide, answer from the
    /// cache, or dispatch a search.
    fn evaluate(&mut self) -> Command<Message<T>> {
        let options = Arc::clone(&self.options);
        let value = self.field.value();
        let query = derive_query(&value, options.delimiter());
        let long_enough = query.chars().count() >= options.min_chars;

        if query == self.store.query() {
            // The text before the delimiter may still have changed.
            self.store.set_current_value(value);
            if long_enough {
                self.show();
            }
            return Command::none();
        }

        tracing::debug!(field = %self.name, %query, "query changed");
        self.store.begin_query(value, query.clone());
        if !long_enough {
            self.store.invalidate();
            self.hide();
            return Command::none();
        }

        if !options.no_cache {
            if let Some(result) = self.store.lookup(&query, options.prevent_bad_queries) {
                tracing::debug!(field = %self.name, %query, count = result.len(), "answered without searching");
                self.store.invalidate();
                self.apply_result(result);
                return Command::none();
            }
        }

        let seq = self.store.dispatch();
        tracing::debug!(field = %self.name, %query, seq, "search dispatched");
        let search = options
            .search
            .search(query.clone(), options.collection.clone(), options.accessors.clone());
        Command::perform(search, move |result| Message::SearchResolved { seq, query, result })
    }

    fn resolved(&mut self, seq: Seq, query: String, result: Result<Vec<T>, SearchError>) -> Command<Message<T>> {
        if !self.enabled {
            tracing::debug!(field = %self.name, seq, "result discarded while disabled");
            return Command::none();
        }
        if !self.store.is_current(seq) {
            tracing::debug!(field = %self.name, seq, %query, "stale result discarded");
            return Command::none();
        }
        match result {
            Ok(items) => {
                tracing::debug!(field = %self.name, seq, %query, count = items.len(), "search resolved");
                if !self.options.no_cache {
                    self.store.remember(seq, &query, &items, self.options.prevent_bad_queries);
                }
                self.apply_result(items);
                Command::none()
            }
            Err(err) => {
                tracing::warn!(field = %self.name, seq, %query, %err, "search failed");
                self.hide();
                Command::message(Message::SearchFailed(err.to_string()))
            }
        }
    }

    fn apply_result(&mut self, items: Vec<T>) {
        let hint = items.first().map(|item| self.options.accessors.value(item));
        self.store.replace(items, hint);
        self.rebuild_rows();
        if self.store.showing_notice() && !self.options.show_no_suggestion_notice {
            self.hide();
        } else {
            self.show();
        }
    }

    fn navigate(&mut self, nav: Navigation) -> Command<Message<T>> {
        let (selected, effect) = transition(self.store.selected(), self.store.suggestions().len(), nav);
        self.store.select(selected);
        if let Some(index) = selected {
            self.scroll_to(index);
        }
        match effect {
            Effect::None => {}
            Effect::Preview(index) => {
                if let Some(preview) = self.token_for(index) {
                    self.field.set_value(&preview);
                }
            }
            Effect::Restore => {
                let restored = self.store.current_value().to_string();
                self.field.set_value(&restored);
            }
            Effect::Commit(index) => return self.commit(index),
            Effect::Hide => self.hide(),
        }
        Command::none()
    }

    /// Field text with the trailing token replaced by suggestion `index`.
    fn token_for(&self, index: usize) -> Option<String> {
        let item = self.store.suggestions().get(index)?;
        let value = self.options.accessors.value(item);
        Some(substitute_token(self.store.current_value(), self.options.delimiter(), &value))
    }

    fn commit(&mut self, index: usize) -> Command<Message<T>> {
        let Some(value) = self.token_for(index) else {
            return Command::none();
        };
        self.hide();
        self.dismissed = true;
        self.input_line.cancel();
        self.store.set_current_value(value.clone());
        self.field.set_value(&value);
        tracing::debug!(field = %self.name, index, %value, "suggestion committed");
        Command::message(Message::Committed(value))
    }

    fn on_key(&mut self, key: KeyEvent) -> Command<Message<T>> {
        if key.kind == KeyEventKind::Release {
            return Command::none();
        }
        if self.enabled && self.is_visible() {
            let nav = match key.code {
                KeyCode::Down => Some(Navigation::Down),
                KeyCode::Up => Some(Navigation::Up),
                KeyCode::Enter => Some(Navigation::Enter),
                KeyCode::Esc => {
                    self.hide();
                    self.dismissed = true;
                    return Command::none();
                }
                _ => None,
            };
            if let Some(nav) = nav {
                return self.navigate(nav);
            }
        }
        match self.field.apply_key(key) {
            FieldEdit::Changed => self.input_changed(),
            FieldEdit::Moved | FieldEdit::Ignored => Command::none(),
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) -> Command<Message<T>> {
        if !self.enabled || !self.is_visible() {
            return Command::none();
        }
        let (x, y) = (mouse.column, mouse.row);
        let inside = self.panel_area.contains(Position::new(x, y));
        let item = render::item_at(&self.rows, self.scroll, render::inner(self.panel_area), x, y);
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                let was_inside = std::mem::replace(&mut self.pointer_inside, inside);
                match item {
                    Some(index) => self.navigate(Navigation::Hover(index)),
                    None if was_inside && !inside => self.navigate(Navigation::Leave),
                    None => Command::none(),
                }
            }
            MouseEventKind::Down(MouseButton::Left) if inside => {
                self.blur_line.cancel();
                match item {
                    Some(index) => self.navigate(Navigation::Click(index)),
                    None => Command::none(),
                }
            }
            MouseEventKind::ScrollDown if inside => {
                let visible = usize::from(render::inner(self.panel_area).height);
                let max = self.rows.len().saturating_sub(visible);
                self.scroll = (self.scroll + 1).min(max);
                Command::none()
            }
            MouseEventKind::ScrollUp if inside => {
                self.scroll = self.scroll.saturating_sub(1);
                Command::none()
            }
            _ => Command::none(),
        }
    }

    /// Remainder of the hint past what has been typed, when the hint extends
    /// the current query.
    fn ghost_text(&self) -> Option<String> {
        if !self.is_visible() || self.store.selected().is_some() || self.field.cursor() != self.field.len() {
            return None;
        }
        let hint = self.store.hint()?;
        let query = derive_query(&self.field.value(), self.options.delimiter());
        if query.is_empty() {
            return None;
        }
        let mut rest = hint.chars();
        for typed in query.chars() {
            let suggested = rest.next()?;
            if !suggested.to_lowercase().eq(typed.to_lowercase()) {
                return None;
            }
        }
        let ghost: String = rest.collect();
        (!ghost.is_empty()).then_some(ghost)
    }

    fn field_line(&self, width: u16) -> Line<'static> {
        let cursor_style = Style::default().add_modifier(Modifier::REVERSED);
        let hint_style = self.options.style.hint;
        let chars = self.field.chars();
        let cursor = self.field.cursor();
        let start = scroll_start(chars, cursor, usize::from(width));

        let mut spans = Vec::new();
        let before: String = chars[start..cursor].iter().collect();
        if !before.is_empty() {
            spans.push(Span::raw(before));
        }
        if cursor < chars.len() {
            spans.push(Span::styled(chars[cursor].to_string(), cursor_style));
            let after: String = chars[cursor + 1..].iter().collect();
            if !after.is_empty() {
                spans.push(Span::raw(after));
            }
        } else if let Some(ghost) = self.ghost_text() {
            let mut ghost = ghost.chars();
            if let Some(first) = ghost.next() {
                spans.push(Span::styled(first.to_string(), cursor_style.patch(hint_style)));
            }
            spans.push(Span::styled(ghost.collect::<String>(), hint_style));
        } else {
            spans.push(Span::styled(" ", cursor_style));
        }
        Line::from(spans)
    }
}

/// First char to draw so the cursor cell fits in `width` columns.
fn scroll_start(chars: &[char], cursor: usize, width: usize) -> usize {
    if width == 0 {
        return cursor;
    }
    let mut used = 1; // cursor cell
    let mut start = cursor;
    while start > 0 {
        let w = chars[start - 1].width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start -= 1;
    }
    start
}

impl<T: Clone + Send + Sync + 'static> Component for Autocomplete<T> {
    type Message = Message<T>;

    fn update(&mut self, msg: Message<T>) -> Command<Message<T>> {
        match msg {
            Message::Key(key) => self.on_key(key),
            Message::Paste(text) => {
                if self.field.insert_str(&text) {
                    self.input_changed()
                } else {
                    Command::none()
                }
            }
            Message::Focus => {
                self.focused = true;
                if !self.enabled {
                    return Command::none();
                }
                self.blur_line.cancel();
                self.reposition();
                self.input_changed()
            }
            Message::Blur => {
                self.focused = false;
                if !self.enabled {
                    return Command::none();
                }
                self.blur_line.schedule(Message::BlurSettled)
            }
            Message::Mouse(mouse) => self.on_mouse(mouse),
            Message::Resized(width, height) => {
                self.viewport = Rect::new(0, 0, width, height);
                if !self.enabled {
                    return Command::none();
                }
                self.resize_line.schedule(Message::ResizeSettled)
            }
            Message::InputSettled(generation) => {
                if self.input_line.fire(generation) && self.enabled {
                    self.evaluate()
                } else {
                    Command::none()
                }
            }
            Message::ResizeSettled(generation) => {
                if self.resize_line.fire(generation) && self.is_visible() {
                    self.reposition();
                }
                Command::none()
            }
            Message::BlurSettled(generation) => {
                if self.blur_line.fire(generation) {
                    self.hide();
                    self.dismissed = true;
                }
                Command::none()
            }
            Message::SearchResolved { seq, query, result } => self.resolved(seq, query, result),
            Message::Committed(_) | Message::SearchFailed(_) => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }
        let field_area = Rect { height: 1, ..area };
        frame.render_widget(Paragraph::new(self.field_line(field_area.width)), field_area);

        if self.is_visible() {
            let panel_area = self.panel_area.intersection(frame.area());
            let view = PanelView {
                options: &self.options,
                rows: &self.rows,
                suggestions: self.store.suggestions(),
                selected: self.store.selected(),
                query: self.store.query(),
                notice: self.store.showing_notice(),
                scroll: self.scroll,
            };
            render::render_panel(frame, panel_area, &view);
        }
    }

    fn focused(&self) -> bool {
        self.focused
    }
}
