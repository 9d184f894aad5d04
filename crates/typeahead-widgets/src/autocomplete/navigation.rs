//! Selection state machine.
//!
//! [`transition`] is pure: it maps the current selection and one navigation
//! event to the next selection plus the [`Effect`] the widget must apply to
//! the field and panel. Boundary moves are no-ops, never errors.

/// A navigation event, keyboard or pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Down,
    Up,
    Enter,
    /// Pointer over suggestion `i`.
    Hover(usize),
    /// Pointer left the panel.
    Leave,
    /// Pointer click on suggestion `i`.
    Click(usize),
}

/// What the widget does after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Nothing beyond the selection change, if any.
    None,
    /// Show suggestion `i`'s value in the field without committing it.
    Preview(usize),
    /// Put the pre-navigation value back into the field.
    Restore,
    /// Commit suggestion `i` and hide the panel.
    Commit(usize),
    /// Hide the panel without committing.
    Hide,
}

/// Apply `nav` to `selected` over a list of `len` suggestions.
pub fn transition(selected: Option<usize>, len: usize, nav: Navigation) -> (Option<usize>, Effect) {
    match (nav, selected) {
        (Navigation::Down, None) if len > 0 => (Some(0), Effect::Preview(0)),
        (Navigation::Down, Some(i)) if i + 1 < len => (Some(i + 1), Effect::Preview(i + 1)),
        (Navigation::Down, _) => (selected, Effect::None),

        (Navigation::Up, Some(0)) => (None, Effect::Restore),
        (Navigation::Up, Some(i)) => (Some(i - 1), Effect::Preview(i - 1)),
        (Navigation::Up, None) => (None, Effect::None),

        (Navigation::Enter, Some(i)) => (Some(i), Effect::Commit(i)),
        (Navigation::Enter, None) => (None, Effect::Hide),

        (Navigation::Hover(i), _) if i < len => (Some(i), Effect::None),
        (Navigation::Click(i), _) if i < len => (Some(i), Effect::Commit(i)),
        (Navigation::Hover(_) | Navigation::Click(_), _) => (selected, Effect::None),

        (Navigation::Leave, _) => (None, Effect::None),
    }
}
