//! Panel placement relative to the bound field.

use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};

/// Vertical placement of the suggestion panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Whichever side of the field has more room; below on a tie.
    #[default]
    Auto,
    /// Panel's bottom edge on the field's top edge.
    Top,
    /// Panel's top edge on the field's bottom edge.
    Bottom,
}

/// Whether the panel is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
}

/// Resolve `Auto` to a concrete side for a panel `height` rows tall.
///
/// Room on each side is what remains after placing the panel there; it goes
/// negative when the panel would overflow the viewport.
pub fn resolve(orientation: Orientation, field: Rect, viewport: Rect, height: u16) -> Orientation {
    match orientation {
        Orientation::Auto => {
            let h = i32::from(height);
            let above = i32::from(field.y) - i32::from(viewport.y) - h;
            let below = i32::from(viewport.bottom()) - (i32::from(field.bottom()) + h);
            if above > below {
                Orientation::Top
            } else {
                Orientation::Bottom
            }
        }
        fixed => fixed,
    }
}

/// Where to draw a panel `height` rows tall for `field`.
///
/// Horizontal position and width track the field. The result is clipped to
/// `viewport` and never overlaps the field, so it may be shorter than
/// `height` (or empty) when the chosen side lacks room.
pub fn place(orientation: Orientation, field: Rect, viewport: Rect, height: u16) -> Rect {
    let x = field.x.clamp(viewport.x, viewport.right());
    let width = field.right().min(viewport.right()).saturating_sub(x);
    match resolve(orientation, field, viewport, height) {
        Orientation::Top => {
            let bottom = field.y.min(viewport.bottom());
            let y = bottom.saturating_sub(height).max(viewport.y);
            Rect::new(x, y, width, bottom.saturating_sub(y))
        }
        _ => {
            let y = field.bottom().clamp(viewport.y, viewport.bottom());
            let height = height.min(viewport.bottom() - y);
            Rect::new(x, y, width, height)
        }
    }
}
