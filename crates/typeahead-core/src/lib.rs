//! Event-loop runtime for **typeahead**.
//!
//! `typeahead-core` follows the [Elm Architecture]: state changes only in
//! `update`, in response to one message at a time, and every side effect is
//! described as a [`Command`] that the runtime executes on the model's behalf.
//! That single-threaded, message-at-a-time discipline is what lets an
//! interactive widget juggle keystrokes, timers, and overlapping async
//! searches without locks.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Model`] | Top-level application trait (init / update / view) |
//! | [`Component`] | Reusable sub-model that renders into a [`ratatui::layout::Rect`] |
//! | [`Command`] | Describes a side effect to be executed by the runtime |
//! | [`DebounceLine`] | Single-slot, cancel-and-reschedule timer |
//! | [`Subscription`] | Long-lived event source (terminal events) |
//! | [`Program`] | Wires a [`Model`] to a real terminal and drives the event loop |
//! | [`TestProgram`](testing::TestProgram) | Headless harness for tests |
//!
//! [Elm Architecture]: https://guide.elm-lang.org/architecture/

pub mod command;
pub mod component;
pub mod debounce;
pub mod event;
pub mod logging;
pub mod model;
pub mod runtime;
pub mod subscription;
pub mod subscriptions;
pub mod testing;

pub use command::Command;
pub use component::Component;
pub use debounce::DebounceLine;
pub use event::TerminalEvent;
pub use model::Model;
pub use runtime::{OutputTarget, Program, ProgramError, ProgramOptions};
pub use subscription::{Subscription, SubscriptionId};
pub use subscriptions::terminal_events;

/// Run an application with default options.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags)?.run().await
}

/// Run with custom options.
pub async fn run_with<M: Model>(flags: M::Flags, options: ProgramOptions) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options)?.run().await
}
