//! Panel layout and drawing.
//!
//! Suggestions are laid out as rows, with a header row before each run of
//! suggestions sharing a group when `group_by` is set. Row indices and
//! suggestion indices therefore differ; hit-testing maps between them.

use ratatui::layout::{Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};
use ratatui::Frame;

use super::options::Options;
use super::provider::Accessors;

/// Rows added by the panel border.
pub(crate) const BORDER_ROWS: u16 = 2;

/// One panel row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Row {
    Header(String),
    Item(usize),
}

/// Lay out `items`, inserting a header whenever the group changes.
pub(crate) fn build_rows<T>(items: &[T], accessors: &dyn Accessors<T>, group_by: Option<&str>) -> Vec<Row> {
    let Some(key) = group_by else {
        return (0..items.len()).map(Row::Item).collect();
    };
    let mut rows = Vec::with_capacity(items.len());
    let mut current: Option<String> = None;
    for (i, item) in items.iter().enumerate() {
        let group = accessors.group(item, key);
        if group.is_some() && group != current {
            rows.push(Row::Header(group.clone().unwrap_or_default()));
        }
        current = group;
        rows.push(Row::Item(i));
    }
    rows
}

/// Row holding suggestion `index`.
pub(crate) fn row_of(rows: &[Row], index: usize) -> Option<usize> {
    rows.iter().position(|row| *row == Row::Item(index))
}

/// Outer panel height for the given content.
pub(crate) fn panel_height(rows: usize, notice: bool, max_height: u16) -> u16 {
    let content = if notice { 1 } else { rows };
    u16::try_from(content).unwrap_or(u16::MAX).min(max_height) + BORDER_ROWS
}

/// Scroll offset that keeps `row` visible in a window of `visible` rows,
/// pulling its group header into view too when there is one.
pub(crate) fn follow(rows: &[Row], scroll: usize, row: usize, visible: usize) -> usize {
    if visible == 0 {
        return scroll;
    }
    let top = match row.checked_sub(1).and_then(|prev| rows.get(prev)) {
        Some(Row::Header(_)) => row - 1,
        _ => row,
    };
    if top < scroll {
        top
    } else if row >= scroll + visible {
        row + 1 - visible
    } else {
        scroll
    }
}

/// Suggestion index under the screen cell `(x, y)`, if it is a suggestion row.
pub(crate) fn item_at(rows: &[Row], scroll: usize, inner: Rect, x: u16, y: u16) -> Option<usize> {
    if !inner.contains(Position::new(x, y)) {
        return None;
    }
    match rows.get(scroll + usize::from(y - inner.y)) {
        Some(Row::Item(i)) => Some(*i),
        _ => None,
    }
}

/// The area inside the panel border.
pub(crate) fn inner(area: Rect) -> Rect {
    Block::bordered().inner(area)
}

/// Everything needed to draw the panel.
pub(crate) struct PanelView<'a, T> {
    pub options: &'a Options<T>,
    pub rows: &'a [Row],
    pub suggestions: &'a [T],
    pub selected: Option<usize>,
    pub query: &'a str,
    pub notice: bool,
    pub scroll: usize,
}

pub(crate) fn render_panel<T>(frame: &mut Frame, area: Rect, view: &PanelView<'_, T>) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let options = view.options;
    let style = &options.style;
    if options.z_index > 0 {
        frame.render_widget(Clear, area);
    }
    let block = Block::bordered().border_style(style.border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if view.notice {
        let notice = Paragraph::new(options.no_suggestion_notice.as_str()).style(style.notice);
        frame.render_widget(notice, Rect { height: inner.height.min(1), ..inner });
        return;
    }

    let accessors = options.accessors.as_ref();
    let visible = view.rows.iter().skip(view.scroll).take(usize::from(inner.height));
    for (offset, row) in visible.enumerate() {
        let row_area = Rect {
            y: inner.y + offset as u16,
            height: 1,
            ..inner
        };
        let paragraph = match row {
            Row::Header(name) => Paragraph::new(Line::from(Span::styled(name.clone(), style.group))),
            Row::Item(i) => {
                let Some(item) = view.suggestions.get(*i) else {
                    continue;
                };
                let selected = view.selected == Some(*i);
                let mut line = accessors.format(item, view.query, *i, options);
                line.spans.insert(0, Span::raw(if selected { "▸ " } else { "  " }));
                let title = accessors.title(item);
                if !title.is_empty() {
                    line.spans.push(Span::styled(format!("  {title}"), style.title));
                }
                let base = if selected { style.selected } else { style.item };
                Paragraph::new(line).style(base)
            }
        };
        frame.render_widget(paragraph, row_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autocomplete::provider::{Suggestion, SuggestionAccessors};

    fn grouped() -> Vec<Suggestion> {
        vec![
            Suggestion::new("apple").with_data("kind", "fruit"),
            Suggestion::new("apricot").with_data("kind", "fruit"),
            Suggestion::new("asparagus").with_data("kind", "vegetable"),
        ]
    }

    #[test]
    fn rows_without_grouping_are_items() {
        let rows = build_rows(&grouped(), &SuggestionAccessors, None);
        assert_eq!(rows, [Row::Item(0), Row::Item(1), Row::Item(2)]);
    }

    #[test]
    fn headers_precede_each_group() {
        let rows = build_rows(&grouped(), &SuggestionAccessors, Some("kind"));
        assert_eq!(
            rows,
            [
                Row::Header("fruit".into()),
                Row::Item(0),
                Row::Item(1),
                Row::Header("vegetable".into()),
                Row::Item(2),
            ]
        );
        assert_eq!(row_of(&rows, 2), Some(4));
    }

    #[test]
    fn ungrouped_items_get_no_header() {
        let items = vec![Suggestion::new("kiwi"), Suggestion::new("lime").with_data("kind", "citrus")];
        let rows = build_rows(&items, &SuggestionAccessors, Some("kind"));
        assert_eq!(rows, [Row::Item(0), Row::Header("citrus".into()), Row::Item(1)]);
    }

    #[test]
    fn height_is_capped() {
        assert_eq!(panel_height(3, false, 8), 5);
        assert_eq!(panel_height(30, false, 8), 10);
        assert_eq!(panel_height(0, true, 8), 3);
    }

    #[test]
    fn follow_scrolls_both_ways() {
        let rows: Vec<Row> = (0..10).map(Row::Item).collect();
        assert_eq!(follow(&rows, 0, 3, 4), 0);
        assert_eq!(follow(&rows, 0, 5, 4), 2);
        assert_eq!(follow(&rows, 4, 2, 4), 2);
    }

    #[test]
    fn follow_reveals_group_header() {
        let rows = build_rows(&grouped(), &SuggestionAccessors, Some("kind"));
        // Selecting item 0 (row 1) scrolls up far enough to show its header.
        assert_eq!(follow(&rows, 2, 1, 2), 0);
    }

    #[test]
    fn hit_test_skips_headers() {
        let rows = build_rows(&grouped(), &SuggestionAccessors, Some("kind"));
        let inner = Rect::new(5, 10, 20, 4);
        assert_eq!(item_at(&rows, 0, inner, 6, 10), None);
        assert_eq!(item_at(&rows, 0, inner, 6, 11), Some(0));
        assert_eq!(item_at(&rows, 1, inner, 6, 13), Some(2));
        assert_eq!(item_at(&rows, 0, inner, 30, 11), None);
    }
}
