//! The autocomplete widget for **typeahead**.
//!
//! [`Autocomplete`](autocomplete::Autocomplete) implements
//! [`typeahead_core::Component`], so it embeds in any
//! [`typeahead_core::Model`] and renders into a [`ratatui`] frame.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`autocomplete`] | Debounced async suggestions with keyboard and mouse navigation |
//! | [`field`] | Single-line editing buffer the widget is bound to |

pub mod autocomplete;
pub mod field;

pub use autocomplete::{Autocomplete, FieldRegistry, Options, Suggestion};
