//! Main TUI application state and logic

use crate::gui::{Gui, Timer, WndEvent, WndId};
use crate::parser::{parse_functions, ParseError};
use crate::writer::write_function;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Functions,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Functions,
            FocusedPane::Functions => FocusedPane::Source,
        }
    }
}

/// What identifies a version of the file on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl FileStamp {
    fn read(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        Ok(FileStamp {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

/// The viewer: a function file on the left, its parsed functions written
/// back on the right. A timer owned by the app checks the file for changes.
pub struct App<'gui> {
    gui: &'gui Gui,

    /// This app's window identity, the reload timer's only subscriber
    wnd: WndId,
    reload_timer: Timer<'gui>,

    path: PathBuf,
    stamp: Option<FileStamp>,

    /// The source text as last read
    pub source_code: String,

    /// Written functions from the last successful parse, sorted by name
    pub written: Vec<String>,

    /// Error from the last parse, if it failed
    pub parse_error: Option<ParseError>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub functions_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl<'gui> App<'gui> {
    /// Load `path` and start a reload timer firing every `reload_interval` ticks
    pub fn new(gui: &'gui Gui, path: PathBuf, reload_interval: i32) -> io::Result<Self> {
        let wnd = gui.create_wnd_id();
        let reload_timer = Timer::new(gui, reload_interval);
        reload_timer.connect(wnd);

        let mut app = App {
            gui,
            wnd,
            reload_timer,
            path,
            stamp: None,
            source_code: String::new(),
            written: Vec::new(),
            parse_error: None,
            focused_pane: FocusedPane::Source,
            source_scroll: 0,
            functions_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
        };
        app.reload()?;
        Ok(app)
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.process_timers();

            // Poll with a timeout so timers keep firing without input
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Fire due timers and handle the events addressed to this app
    pub fn process_timers(&mut self) {
        let mut events = Vec::new();
        self.gui
            .process_timers(|wnd, event| events.push((wnd, event)));

        for (wnd, event) in events {
            if wnd == self.wnd {
                self.handle_wnd_event(event);
            }
        }
    }

    fn handle_wnd_event(&mut self, event: WndEvent) {
        match event {
            WndEvent::TimerFiring { timer, .. } if timer == self.reload_timer.id() => {
                self.reload_if_changed();
            }
            WndEvent::TimerFiring { .. } => {}
        }
    }

    fn reload_if_changed(&mut self) {
        match FileStamp::read(&self.path) {
            Ok(stamp) if Some(stamp) == self.stamp => {}
            Ok(_) => {
                if let Err(err) = self.reload() {
                    self.report_io_error(err);
                }
            }
            Err(err) => self.report_io_error(err),
        }
    }

    fn report_io_error(&mut self, err: io::Error) {
        tracing::warn!(path = %self.path.display(), error = %err, "cannot read function file");
        self.status_message = format!("Cannot read {}: {}", self.path.display(), err);
    }

    /// Re-read and re-parse the file unconditionally
    pub fn reload(&mut self) -> io::Result<()> {
        self.stamp = Some(FileStamp::read(&self.path)?);
        self.source_code = fs::read_to_string(&self.path)?;

        let filename = self.path.display().to_string();
        match parse_functions(&self.source_code, &filename) {
            Ok(functions) => {
                let mut names: Vec<&String> = functions.keys().collect();
                names.sort();
                self.written = names
                    .into_iter()
                    .map(|name| write_function(&functions[name]))
                    .collect();
                self.parse_error = None;
                self.status_message = format!("Parsed {}", filename);
                tracing::info!(file = %filename, functions = self.written.len(), "parsed function file");
            }
            Err(err) => {
                tracing::warn!(error = %err, "parse failed");
                self.status_message = err.to_string();
                self.parse_error = Some(err);
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Two panes side by side, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main_chunks[0]);

        super::panes::render_source_pane(
            frame,
            columns[0],
            &self.source_code,
            self.parse_error.as_ref().map(|err| err.location.line),
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        super::panes::render_functions_pane(
            frame,
            columns[1],
            &self.written,
            self.parse_error.is_some(),
            self.focused_pane == FocusedPane::Functions,
            &mut self.functions_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.written.len(),
            self.parse_error.is_some(),
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if let Err(err) = self.reload() {
                    self.report_io_error(err);
                }
                self.reload_timer.reset(0);
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Up => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(1);
            }
            _ => {}
        }
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Source => &mut self.source_scroll,
            FocusedPane::Functions => &mut self.functions_scroll,
        }
    }
}

impl Drop for App<'_> {
    fn drop(&mut self) {
        self.gui.remove_wnd(self.wnd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::ManualClock;
    use crossterm::event::KeyModifiers;

    struct TempFile(PathBuf);

    impl TempFile {
        fn new(name: &str, contents: &str) -> Self {
            let path = std::env::temp_dir().join(format!("ggadam-{}-{}", std::process::id(), name));
            fs::write(&path, contents).unwrap();
            TempFile(path)
        }
    }

    impl Drop for TempFile {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_loads_and_writes_functions() {
        let file = TempFile::new("load.fn", "b() { return 2; }\na(x) { return x; }\n");
        let gui = Gui::new(ManualClock::new(1));
        let app = App::new(&gui, file.0.clone(), 500).unwrap();

        assert!(app.parse_error.is_none());
        assert_eq!(
            app.written,
            vec![
                "a (x) {\n    return x;\n}".to_string(),
                "b () {\n    return 2;\n}".to_string(),
            ]
        );
    }

    #[test]
    fn test_timer_reloads_changed_file() {
        let file = TempFile::new("reload.fn", "f() { return 1; }");
        let clock = ManualClock::new(1);
        let gui = Gui::new(clock.clone());
        let mut app = App::new(&gui, file.0.clone(), 100).unwrap();

        fs::write(&file.0, "f() { return 1; }\ng() { return 22; }").unwrap();

        clock.advance(100);
        app.process_timers();
        assert_eq!(app.written.len(), 1);

        clock.advance(1);
        app.process_timers();
        assert_eq!(app.written.len(), 2);
    }

    #[test]
    fn test_parse_error_keeps_last_good_functions() {
        let file = TempFile::new("broken.fn", "f() { return 1; }");
        let gui = Gui::new(ManualClock::new(1));
        let mut app = App::new(&gui, file.0.clone(), 100).unwrap();

        fs::write(&file.0, "f() { return 1;").unwrap();
        app.handle_key_event(key(KeyCode::Char('r')));

        assert!(app.parse_error.is_some());
        assert_eq!(app.written.len(), 1);
        assert!(app.status_message.starts_with("Parse error"));
    }

    #[test]
    fn test_keys() {
        let file = TempFile::new("keys.fn", "");
        let gui = Gui::new(ManualClock::new(1));
        let mut app = App::new(&gui, file.0.clone(), 100).unwrap();

        app.handle_key_event(key(KeyCode::Tab));
        assert_eq!(app.focused_pane, FocusedPane::Functions);
        app.handle_key_event(key(KeyCode::Down));
        assert_eq!(app.functions_scroll, 1);
        assert_eq!(app.source_scroll, 0);
        app.handle_key_event(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_drop_releases_timer() {
        let file = TempFile::new("drop.fn", "");
        let gui = Gui::new(ManualClock::new(1));
        let app = App::new(&gui, file.0.clone(), 100).unwrap();
        assert_eq!(gui.timer_count(), 1);
        drop(app);
        assert_eq!(gui.timer_count(), 0);
    }
}
