use crate::command::{Action, Command, CommandInner};
use crate::model::Model;
use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Terminal;

/// Run a command to completion and collect every message it produces.
///
/// Futures are awaited and streams drained in declaration order, so the
/// result is deterministic. Quit actions are dropped.
/// Pair with `#[tokio::test(start_paused = true)]` so timers elapse instantly.
///
/// ```rust,ignore
/// let cmd = widget.update(Message::Key(key('a')));
/// for msg in resolve(cmd).await {
///     widget.update(msg);
/// }
/// ```
pub async fn resolve<Msg: Send + 'static>(cmd: Command<Msg>) -> Vec<Msg> {
    let mut out = Vec::new();
    resolve_into(cmd, &mut out).await;
    out
}

fn resolve_into<Msg: Send + 'static>(cmd: Command<Msg>, out: &mut Vec<Msg>) -> BoxFuture<'_, ()> {
    async move {
        match cmd.inner {
            CommandInner::None | CommandInner::Action(Action::Quit) => {}
            CommandInner::Action(Action::Message(msg)) => out.push(msg),
            CommandInner::Future(fut) => out.push(fut.await),
            CommandInner::Stream(mut stream) => {
                while let Some(msg) = stream.next().await {
                    out.push(msg);
                }
            }
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    resolve_into(cmd, out).await;
                }
            }
        }
    }
    .boxed()
}

/// A headless test harness that drives a [`Model`] without a real terminal.
///
/// Synchronous commands (e.g. [`Command::message`]) are queued and flushed by
/// [`drain_messages`](TestProgram::drain_messages). Async commands are parked
/// until [`settle`](TestProgram::settle) runs them, which lets a test inspect
/// the state between "search dispatched" and "search resolved".
///
/// # Example
///
/// ```rust,ignore
/// use typeahead_core::testing::TestProgram;
///
/// let mut prog = TestProgram::<App>::new(flags);
/// prog.send(AppMsg::Key(key('a')));
/// prog.settle().await;
/// assert!(prog.model().autocomplete.is_visible());
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    pending_messages: Vec<M::Message>,
    pending_async: Vec<Command<M::Message>>,
    quit: bool,
}

impl<M: Model> TestProgram<M> {
    /// Create a test program by calling [`Model::init`] with the given flags.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut program = Self {
            model,
            pending_messages: Vec::new(),
            pending_async: Vec::new(),
            quit: false,
        };
        program.collect(init_cmd);
        program
    }

    /// Send a message, triggering a single update cycle.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.collect(cmd);
    }

    /// Process queued synchronous messages until none are left.
    pub fn drain_messages(&mut self) {
        while !self.pending_messages.is_empty() {
            let messages: Vec<_> = self.pending_messages.drain(..).collect();
            for msg in messages {
                let cmd = self.model.update(msg);
                self.collect(cmd);
            }
        }
    }

    /// Run every parked async command, feed the results back through
    /// `update`, and repeat until the program is quiescent.
    pub async fn settle(&mut self) {
        loop {
            self.drain_messages();
            if self.pending_async.is_empty() {
                break;
            }
            let parked: Vec<_> = self.pending_async.drain(..).collect();
            for cmd in parked {
                for msg in resolve(cmd).await {
                    self.send(msg);
                }
            }
        }
    }

    /// Number of async commands waiting for [`settle`](Self::settle).
    pub fn pending_async(&self) -> usize {
        self.pending_async.len()
    }

    /// Whether the model asked to quit.
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Get a shared reference to the model for assertions.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Get a mutable reference to the model for direct test setup.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Render the model to a ratatui [`Buffer`] of the given dimensions.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        let backend = ratatui::backend::TestBackend::new(width, height);
        let mut terminal = match Terminal::new(backend) {
            Ok(terminal) => terminal,
            Err(err) => panic!("test backend failed: {err}"),
        };
        if let Err(err) = terminal.draw(|frame| self.model.view(frame)) {
            panic!("test render failed: {err}");
        }
        terminal.backend().buffer().clone()
    }

    /// Render the model and return the visible content as a plain string,
    /// one line per row.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        buffer_to_string(&self.render(width, height))
    }

    fn collect(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => self.pending_messages.push(msg),
            CommandInner::Action(Action::Quit) => self.quit = true,
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect(cmd);
                }
            }
            inner @ (CommandInner::Future(_) | CommandInner::Stream(_)) => {
                self.pending_async.push(Command { inner })
            }
        }
    }
}

/// Flatten a buffer into newline-separated rows.
pub fn buffer_to_string(buf: &Buffer) -> String {
    let area: Rect = buf.area;
    let mut output = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            output.push_str(buf[(x, y)].symbol());
        }
        if y + 1 < area.bottom() {
            output.push('\n');
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debounce::DebounceLine;
    use ratatui::widgets::Paragraph;
    use std::time::Duration;

    // Echoes typed text once typing pauses.
    struct Echo {
        typed: String,
        settled: Option<String>,
        line: DebounceLine,
    }

    #[derive(Debug)]
    enum EchoMsg {
        Type(char),
        Settled(u64),
        Done,
    }

    impl Model for Echo {
        type Message = EchoMsg;
        type Flags = u64;

        fn init(delay_ms: u64) -> (Self, Command<EchoMsg>) {
            let echo = Echo {
                typed: String::new(),
                settled: None,
                line: DebounceLine::new("echo", Duration::from_millis(delay_ms)),
            };
            (echo, Command::none())
        }

        fn update(&mut self, msg: EchoMsg) -> Command<EchoMsg> {
            match msg {
                EchoMsg::Type(c) => {
                    self.typed.push(c);
                    self.line.schedule(EchoMsg::Settled)
                }
                EchoMsg::Settled(generation) => {
                    if self.line.fire(generation) {
                        self.settled = Some(self.typed.clone());
                        return Command::message(EchoMsg::Done);
                    }
                    Command::none()
                }
                EchoMsg::Done => Command::quit(),
            }
        }

        fn view(&self, frame: &mut ratatui::Frame) {
            let text = self.settled.as_deref().unwrap_or("...");
            frame.render_widget(Paragraph::new(text), frame.area());
        }
    }

    #[test]
    fn async_commands_are_parked_until_settle() {
        let mut prog = TestProgram::<Echo>::new(200);
        prog.send(EchoMsg::Type('a'));
        assert_eq!(prog.pending_async(), 1);
        assert!(prog.model().settled.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn settle_coalesces_a_burst_into_one_fire() {
        let mut prog = TestProgram::<Echo>::new(200);
        prog.send(EchoMsg::Type('h'));
        prog.send(EchoMsg::Type('i'));
        prog.settle().await;

        assert_eq!(prog.model().settled.as_deref(), Some("hi"));
        assert!(prog.quit_requested());
        assert_eq!(prog.pending_async(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn render_reflects_settled_state() {
        let mut prog = TestProgram::<Echo>::new(50);
        assert!(prog.render_string(10, 1).starts_with("..."));
        prog.send(EchoMsg::Type('x'));
        prog.settle().await;
        assert!(prog.render_string(10, 1).starts_with('x'));
    }

    #[tokio::test]
    async fn resolve_flattens_batches_in_order() {
        let cmd: Command<i32> = Command::batch(vec![
            Command::message(1),
            Command::perform(async { 2 }, |n| n),
            Command::stream(futures::stream::iter(vec![3, 4])),
        ]);
        assert_eq!(resolve(cmd).await, vec![1, 2, 3, 4]);
    }
}
