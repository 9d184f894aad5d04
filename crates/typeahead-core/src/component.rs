use crate::command::Command;
use ratatui::{layout::Rect, Frame};

/// A reusable sub-model that renders into a given [`Rect`] area.
///
/// `Component` mirrors [`Model`](crate::Model) except that
/// [`view`](Component::view) receives the area to draw into, so a parent
/// decides where each child goes.
///
/// # Composition pattern
///
/// Wrap the component's message type in a variant of the parent message and
/// lift its commands with [`Command::map`]:
///
/// ```rust,ignore
/// use typeahead_core::{Command, Component, Model};
/// use typeahead_widgets::autocomplete::{self, Autocomplete, Suggestion};
///
/// struct App { city: Autocomplete<Suggestion> }
///
/// enum AppMsg { City(autocomplete::Message<Suggestion>) }
///
/// impl Model for App {
///     // ...
///     fn update(&mut self, msg: AppMsg) -> Command<AppMsg> {
///         match msg {
///             AppMsg::City(m) => self.city.update(m).map(AppMsg::City),
///         }
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's internal message type.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return a [`Command`] for side effects.
    ///
    /// The parent should call [`.map()`](Command::map) to lift the returned
    /// command into its own message type.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into a specific `area` of the [`Frame`].
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Whether this component currently has focus.
    fn focused(&self) -> bool {
        false
    }
}
