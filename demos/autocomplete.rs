//! # Autocomplete Example
//!
//! A single field with debounced, simulated-latency suggestions. The field
//! sits mid-screen so the panel flips above it when the terminal gets short.
//!
//! Run with: `cargo run --example autocomplete -- --delimiter ", " --log-file typeahead.log`
//!
//! Keys: type to search, Up/Down navigate, Enter commit, Esc hide (or quit
//! when nothing is shown), F2 toggle enabled, Ctrl+C quit.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use typeahead::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use typeahead::ratatui::layout::Rect;
use typeahead::ratatui::style::{Color, Modifier, Style};
use typeahead::ratatui::text::{Line, Span};
use typeahead::ratatui::widgets::{Block, Paragraph};
use typeahead::ratatui::Frame;
use typeahead::widgets::autocomplete::{
    self, search_fn, Accessors, Autocomplete, Delimiter, FieldRegistry, Options, Orientation,
    SearchError, Settings, Suggestion,
};
use typeahead::{terminal_events, Command, Component, Model, ProgramOptions, Subscription, TerminalEvent};

const FIELD: &str = "fruit";
const FIELD_WIDTH: u16 = 40;

const FRUITS: &[(&str, &str)] = &[
    ("Apple", "pome"),
    ("Apricot", "stone"),
    ("Avocado", "berry"),
    ("Banana", "berry"),
    ("Blackberry", "aggregate"),
    ("Blueberry", "berry"),
    ("Cherry", "stone"),
    ("Coconut", "stone"),
    ("Cranberry", "berry"),
    ("Date", "stone"),
    ("Fig", "multiple"),
    ("Grape", "berry"),
    ("Guava", "berry"),
    ("Kiwi", "berry"),
    ("Lemon", "citrus"),
    ("Lime", "citrus"),
    ("Mango", "stone"),
    ("Nectarine", "stone"),
    ("Orange", "citrus"),
    ("Papaya", "berry"),
    ("Peach", "stone"),
    ("Pear", "pome"),
    ("Pineapple", "multiple"),
    ("Plum", "stone"),
    ("Pomegranate", "berry"),
    ("Quince", "pome"),
    ("Raspberry", "aggregate"),
    ("Strawberry", "aggregate"),
    ("Tangerine", "citrus"),
    ("Watermelon", "berry"),
];

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Placement {
    Auto,
    Top,
    Bottom,
}

impl From<Placement> for Orientation {
    fn from(p: Placement) -> Self {
        match p {
            Placement::Auto => Orientation::Auto,
            Placement::Top => Orientation::Top,
            Placement::Bottom => Orientation::Bottom,
        }
    }
}

#[derive(Debug, Parser)]
#[command(about = "Autocomplete a field from a list of suggestions")]
struct Args {
    /// JSON array of suggestions (`{"value": ..., "title": ..., ...}`).
    #[arg(long)]
    collection: Option<PathBuf>,
    /// JSON settings object (camelCase keys), applied after the flags.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Only the text after the last occurrence of this string is searched.
    #[arg(long)]
    delimiter: Option<String>,
    #[arg(long, value_enum, default_value_t = Placement::Auto)]
    orientation: Placement,
    #[arg(long, default_value_t = 1)]
    min_chars: usize,
    /// Group suggestions by this data key.
    #[arg(long)]
    group_by: Option<String>,
    /// Simulated search latency in milliseconds.
    #[arg(long, default_value_t = 250)]
    latency_ms: u64,
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn builtin_collection() -> Vec<Suggestion> {
    FRUITS
        .iter()
        .map(|(name, kind)| Suggestion::new(*name).with_title(*kind).with_data("kind", *kind))
        .collect()
}

fn load_options(args: &Args) -> Result<Options<Suggestion>, Box<dyn std::error::Error>> {
    let collection = match &args.collection {
        Some(path) => serde_json::from_str::<Vec<Suggestion>>(&std::fs::read_to_string(path)?)?,
        None => builtin_collection(),
    };

    let latency = Duration::from_millis(args.latency_ms);
    let search = search_fn(
        move |query: String, collection: Arc<[Suggestion]>, accessors: Arc<dyn Accessors<Suggestion>>| async move {
            typeahead::tokio::time::sleep(latency).await;
            if query.eq_ignore_ascii_case("boom") {
                return Err(SearchError::Failed("backend unavailable".into()));
            }
            let needle = query.to_lowercase();
            Ok(collection
                .iter()
                .filter(|item| accessors.value(item).to_lowercase().contains(&needle))
                .cloned()
                .collect())
        },
    );

    let mut options = Options::for_suggestions(collection)
        .with_search(search)
        .with_orientation(args.orientation.into())
        .with_min_chars(args.min_chars)
        .with_prevent_bad_queries(true)
        .with_max_height(8)
        .with_z_index(1);
    if let Some(delimiter) = &args.delimiter {
        options = options.with_delimiter(Delimiter::literal(delimiter.clone()));
    }
    if let Some(key) = &args.group_by {
        options = options.with_group_by(key.clone());
    }
    if let Some(path) = &args.settings {
        let settings: Settings = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        options = options.merged(settings.into_update()?);
    }
    Ok(options)
}

struct App {
    fields: FieldRegistry,
    fruit: Autocomplete<Suggestion>,
    status: Option<(String, Style)>,
}

/// Registry and widget, built before the program starts so creation errors
/// surface from `main`.
struct Flags {
    fields: FieldRegistry,
    fruit: Autocomplete<Suggestion>,
}

#[derive(Debug)]
enum Msg {
    Fruit(autocomplete::Message<Suggestion>),
    Key(KeyEvent),
    Resized(u16, u16),
    Quit,
}

/// Field area for a terminal of the given size: mid-screen, inside a border.
fn field_area(width: u16, height: u16) -> Rect {
    Rect::new(3, height / 2, FIELD_WIDTH.min(width.saturating_sub(6)), 1)
}

impl App {
    fn status(&mut self, text: impl Into<String>, color: Color) {
        self.status = Some((text.into(), Style::default().fg(color)));
    }

    fn on_fruit(&mut self, msg: autocomplete::Message<Suggestion>) -> Command<Msg> {
        match &msg {
            autocomplete::Message::Committed(value) => {
                tracing::info!(%value, "committed");
                self.status(format!("Picked: {value}"), Color::Green);
            }
            autocomplete::Message::SearchFailed(reason) => {
                self.status(format!("Search failed: {reason}"), Color::Red);
            }
            _ => {}
        }
        self.fruit.update(msg).map(Msg::Fruit)
    }
}

impl Model for App {
    type Message = Msg;
    type Flags = Flags;

    fn init(Flags { fields, fruit }: Flags) -> (Self, Command<Msg>) {
        let app = App {
            fields,
            fruit,
            status: None,
        };
        let cmd = Command::batch([
            Command::message(Msg::Fruit(autocomplete::Message::Focus)),
            Command::window_size(Msg::Resized),
        ]);
        (app, cmd)
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Fruit(m) => self.on_fruit(m),
            Msg::Key(key) => match key.code {
                KeyCode::Esc if key.kind == KeyEventKind::Press && !self.fruit.is_visible() => Command::quit(),
                KeyCode::F(2) if key.kind == KeyEventKind::Press => {
                    if self.fruit.is_enabled() {
                        self.fruit.disable();
                        self.status("Autocomplete disabled", Color::Yellow);
                    } else {
                        self.fruit.enable();
                        self.status("Autocomplete enabled", Color::Yellow);
                    }
                    Command::none()
                }
                _ => self.on_fruit(autocomplete::Message::Key(key)),
            },
            Msg::Resized(width, height) => {
                let area = field_area(width, height);
                self.fields.set_viewport(Rect::new(0, 0, width, height));
                self.fields.register(FIELD, area);
                self.fruit.set_field_area(area);
                self.on_fruit(autocomplete::Message::Resized(width, height))
            }
            Msg::Quit => Command::quit(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let area = frame.area();
        let field = self.fruit.field_area();

        let title = Paragraph::new(Line::from(Span::styled(
            "Fruit Picker",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(title, Rect::new(1, 0, area.width.saturating_sub(2), 1));

        let border = if self.fruit.is_enabled() { Color::Cyan } else { Color::DarkGray };
        let frame_area = Rect::new(field.x.saturating_sub(2), field.y.saturating_sub(1), field.width + 4, 3)
            .intersection(area);
        frame.render_widget(
            Block::bordered().title(" Search ").border_style(Style::default().fg(border)),
            frame_area,
        );

        if let Some((text, style)) = &self.status {
            let row = area.bottom().saturating_sub(2);
            frame.render_widget(
                Paragraph::new(Span::styled(text.as_str(), *style)),
                Rect::new(1, row, area.width.saturating_sub(2), 1),
            );
        }

        let help = Paragraph::new(Line::from(vec![
            Span::styled("Up/Down", Style::default().fg(Color::DarkGray)),
            Span::raw(" navigate  "),
            Span::styled("Enter", Style::default().fg(Color::DarkGray)),
            Span::raw(" pick  "),
            Span::styled("F2", Style::default().fg(Color::DarkGray)),
            Span::raw(" toggle  "),
            Span::styled("Esc", Style::default().fg(Color::DarkGray)),
            Span::raw(" hide/quit"),
        ]));
        frame.render_widget(help, Rect::new(1, area.bottom().saturating_sub(1), area.width.saturating_sub(2), 1));

        // Last, so the panel draws over everything else.
        self.fruit.view(frame, field);
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        vec![terminal_events(|ev| match ev {
            TerminalEvent::Key(key) if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Msg::Quit)
            }
            TerminalEvent::Key(key) => Some(Msg::Key(key)),
            TerminalEvent::Mouse(mouse) => Some(Msg::Fruit(autocomplete::Message::Mouse(mouse))),
            TerminalEvent::Resize(w, h) => Some(Msg::Resized(w, h)),
            TerminalEvent::FocusGained => Some(Msg::Fruit(autocomplete::Message::Focus)),
            TerminalEvent::FocusLost => Some(Msg::Fruit(autocomplete::Message::Blur)),
            TerminalEvent::Paste(text) => Some(Msg::Fruit(autocomplete::Message::Paste(text))),
        })]
    }
}

#[typeahead::tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let options = load_options(&args)?;

    // The real size arrives with the first resize message.
    let (width, height) = (80, 24);
    let mut fields = FieldRegistry::new(Rect::new(0, 0, width, height));
    fields.register(FIELD, field_area(width, height));
    let fruit = Autocomplete::create(FIELD, &mut fields, options)?;

    let program_options = ProgramOptions {
        log_file: args.log_file,
        log_filter: "info,typeahead=debug".to_string(),
        title: Some("typeahead".to_string()),
        ..ProgramOptions::default()
    };
    typeahead::run_with::<App>(Flags { fields, fruit }, program_options).await?;
    Ok(())
}
