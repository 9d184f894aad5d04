//! Named field locations an autocomplete can bind to.
//!
//! A host registers each text field it draws under a name and area. Binding
//! looks the name up, so a widget cannot be created for a field that does not
//! exist, and one field never ends up with two widgets.

use std::collections::HashMap;

use ratatui::layout::Rect;

/// Why an autocomplete could not be created.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AutocompleteError {
    /// No field is registered under this name.
    #[error("no field named {0:?}")]
    TargetNotFound(String),
    /// Another autocomplete is already bound to this field.
    #[error("field {0:?} already has an autocomplete")]
    AlreadyBound(String),
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    area: Rect,
    bound: bool,
}

/// Field names mapped to their screen areas, plus the viewport they live in.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    viewport: Rect,
    fields: HashMap<String, Slot>,
}

impl FieldRegistry {
    /// An empty registry for a viewport.
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport,
            fields: HashMap::new(),
        }
    }

    /// Add a field, or move an existing one. Binding state is kept.
    pub fn register(&mut self, name: impl Into<String>, area: Rect) {
        self.fields
            .entry(name.into())
            .and_modify(|slot| slot.area = area)
            .or_insert(Slot { area, bound: false });
    }

    /// Remove a field. Returns `false` if it was unknown.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.fields.remove(name).is_some()
    }

    pub fn area(&self, name: &str) -> Option<Rect> {
        self.fields.get(name).map(|slot| slot.area)
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(|slot| slot.bound)
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Claim a field, returning its area.
    pub(crate) fn bind(&mut self, name: &str) -> Result<Rect, AutocompleteError> {
        let slot = self
            .fields
            .get_mut(name)
            .ok_or_else(|| AutocompleteError::TargetNotFound(name.to_string()))?;
        if slot.bound {
            return Err(AutocompleteError::AlreadyBound(name.to_string()));
        }
        slot.bound = true;
        Ok(slot.area)
    }

    /// Give a field back.
    pub(crate) fn release(&mut self, name: &str) {
        if let Some(slot) = self.fields.get_mut(name) {
            slot.bound = false;
        }
    }
}
