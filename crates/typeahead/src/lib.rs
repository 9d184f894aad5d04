//! **typeahead** -- an in-terminal autocomplete widget and the event-loop
//! runtime that drives it.
//!
//! This umbrella crate re-exports everything from a single dependency:
//!
//! * All public items from [`typeahead_core`] at the crate root ([`Model`],
//!   [`Component`], [`Command`], [`DebounceLine`], [`Program`], [`run`],
//!   [`run_with`], etc.).
//! * The [`widgets`] module re-exports [`typeahead_widgets`].
//! * [`ratatui`], [`crossterm`], and [`tokio`] so downstream crates do not
//!   need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use typeahead::widgets::autocomplete::{self, Autocomplete, FieldRegistry, Options, Suggestion};
//! use typeahead::{Command, Component, Model, TerminalEvent};
//!
//! struct App { fruit: Autocomplete<Suggestion> }
//!
//! enum Msg { Fruit(autocomplete::Message<Suggestion>), Terminal(TerminalEvent) }
//!
//! impl Model for App {
//!     type Message = Msg;
//!     type Flags = ();
//!
//!     fn init(_: ()) -> (Self, Command<Msg>) {
//!         let mut fields = FieldRegistry::new(Rect::new(0, 0, 80, 24));
//!         fields.register("fruit", Rect::new(2, 2, 30, 1));
//!         let options = Options::for_suggestions(vec![Suggestion::new("apple")]);
//!         let fruit = Autocomplete::create("fruit", &mut fields, options).unwrap();
//!         (App { fruit }, Command::none())
//!     }
//!     fn update(&mut self, msg: Msg) -> Command<Msg> {
//!         match msg {
//!             Msg::Fruit(m) => self.fruit.update(m).map(Msg::Fruit),
//!             Msg::Terminal(_) => Command::none(),
//!         }
//!     }
//!     fn view(&self, frame: &mut Frame) {
//!         self.fruit.view(frame, Rect::new(2, 2, 30, 1));
//!     }
//! }
//! ```

pub use typeahead_core::*;
pub mod widgets {
    pub use typeahead_widgets::*;
}

// Re-export dependencies for use in demos and downstream crates
pub use crossterm;
pub use ratatui;
pub use tokio;
