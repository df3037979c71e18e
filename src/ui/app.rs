use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use tracing::warn;

use crate::db::Store;
use crate::error::StoreResult;
use crate::models::{LanguageFilter, SearchQuery};

use super::forms::{Field, MemoForm};
use super::helpers::{centered_box, format_results};

/// How long a success notification stays on screen.
const TOAST_DURATION: Duration = Duration::from_millis(800);
/// Footer space reserved for key hints.
const FOOTER_HEIGHT: u16 = 2;
/// Entry block: four inputs plus borders.
const ENTRY_HEIGHT: u16 = 6;
/// Search block: two inputs plus borders.
const SEARCH_HEIGHT: u16 = 4;

/// Everything the user can ask the app to do. Key bindings map onto these in
/// [`Command::from_key`]; [`App::execute`] has one handler per variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    AddLanguage,
    SavePair,
    Search,
    Clear,
    Quit,
}

impl Command {
    /// Translate a key press into a command. Enter means different things
    /// depending on which widget has focus.
    pub(crate) fn from_key(key: &KeyEvent, active: Field) -> Option<Self> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('n') => Some(Command::AddLanguage),
                KeyCode::Char('s') => Some(Command::SavePair),
                KeyCode::Char('f') => Some(Command::Search),
                KeyCode::Char('l') => Some(Command::Clear),
                KeyCode::Char('c') => Some(Command::Quit),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Esc => Some(Command::Quit),
            KeyCode::Enter => Some(match active {
                Field::NewLanguage => Command::AddLanguage,
                Field::Language | Field::English | Field::Foreign => Command::SavePair,
                Field::Keyword | Field::SearchLanguage => Command::Search,
            }),
            _ => None,
        }
    }
}

/// Transient notification plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
    shown_at: Instant,
}

/// Info toasts fade on their own; errors wait for the next key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::White).bg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    store: Store,
    form: MemoForm,
    output: String,
    pair_count: usize,
    status: Option<StatusMessage>,
}

impl App {
    /// Load the language list and pair count so the first frame is complete.
    pub fn new(store: Store) -> Result<Self> {
        let languages = store
            .list_languages()
            .context("failed to load languages")?;
        let pair_count = store.count_pairs().context("failed to count pairs")?;

        Ok(Self {
            store,
            form: MemoForm::new(&languages),
            output: String::new(),
            pair_count,
            status: None,
        })
    }

    /// Handle one key press. Returns `true` when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if matches!(&self.status, Some(status) if status.kind == StatusKind::Error) {
            self.clear_status();
        }

        if let Some(command) = Command::from_key(&key, self.form.active) {
            return self.execute(command);
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(false);
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.previous_field(),
            KeyCode::Left => self.form.cycle_selector(-1),
            KeyCode::Right => self.form.cycle_selector(1),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(ch) => {
                self.form.push_char(ch);
            }
            _ => {}
        }
        Ok(false)
    }

    /// Run a command. Recoverable store errors become notifications; storage
    /// failures are returned to the caller.
    pub fn execute(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::AddLanguage => self.add_language()?,
            Command::SavePair => self.save_pair()?,
            Command::Search => self.search()?,
            Command::Clear => self.clear(),
            Command::Quit => return Ok(true),
        }
        Ok(false)
    }

    /// Drop a success toast once it has been visible long enough.
    pub(crate) fn expire_status(&mut self, now: Instant) {
        if let Some(status) = &self.status {
            if status.kind == StatusKind::Info
                && now.duration_since(status.shown_at) >= TOAST_DURATION
            {
                self.status = None;
            }
        }
    }

    fn add_language(&mut self) -> Result<()> {
        let name = self.form.new_language.trim().to_string();
        if name.is_empty() {
            self.set_status("Please enter a language name", StatusKind::Error);
            return Ok(());
        }

        let result = self.store.add_language(&name);
        if let Some(language) = self.recover(result)? {
            self.reload_languages()?;
            self.form.language.select(&language.name);
            self.form.new_language.clear();
            self.set_status(format!("Added \"{}\"!", language.name), StatusKind::Info);
        }
        Ok(())
    }

    fn save_pair(&mut self) -> Result<()> {
        let english = self.form.english.trim().to_string();
        let foreign = self.form.foreign.trim().to_string();
        let language = self.form.language.value().unwrap_or_default().to_string();

        if english.is_empty() || foreign.is_empty() || language.is_empty() {
            self.set_status("All fields are required!", StatusKind::Error);
            self.form.focus(Field::English);
            return Ok(());
        }

        let result = self.store.save_pair(&english, &foreign, &language);
        if self.recover(result)?.is_some() {
            self.form.english.clear();
            self.form.foreign.clear();
            self.pair_count = self.store.count_pairs().context("failed to count pairs")?;
            self.set_status("\u{2713} Saved!", StatusKind::Info);
        }
        self.form.focus(Field::English);
        Ok(())
    }

    fn search(&mut self) -> Result<()> {
        let query = SearchQuery::new(
            Some(self.form.keyword.as_str()),
            LanguageFilter::from_selection(self.form.search_language.value()),
        );

        let result = self.store.search_pairs(&query);
        if let Some(results) = self.recover(result)? {
            self.output = format_results(&results);
        }
        self.form.focus(Field::English);
        Ok(())
    }

    /// Reset the search inputs and results. The database is not touched.
    fn clear(&mut self) {
        self.output.clear();
        self.form.keyword.clear();
        self.form.focus(Field::English);
    }

    fn reload_languages(&mut self) -> Result<()> {
        let languages = self
            .store
            .list_languages()
            .context("failed to reload languages")?;
        self.form.set_languages(&languages);
        Ok(())
    }

    /// Split store results into "show the user" and "give up".
    fn recover<T>(&mut self, result: StoreResult<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_recoverable() => {
                warn!(error = %err, "store rejected request");
                self.set_status(err.to_string(), StatusKind::Error);
                Ok(None)
            }
            Err(err) => Err(err).context("language store failed"),
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
            shown_at: Instant::now(),
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(ENTRY_HEIGHT),
                Constraint::Min(3),
                Constraint::Length(SEARCH_HEIGHT),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_inputs(
            frame,
            chunks[0],
            "Language Memo",
            &[Field::Language, Field::NewLanguage, Field::English, Field::Foreign],
        );
        self.draw_results(frame, chunks[1]);
        self.draw_inputs(
            frame,
            chunks[2],
            "Search",
            &[Field::Keyword, Field::SearchLanguage],
        );
        self.draw_footer(frame, chunks[3]);

        if let Some(status) = &self.status {
            self.draw_status(frame, area, status);
        }
    }

    fn draw_inputs(&self, frame: &mut Frame, area: Rect, title: &str, fields: &[Field]) {
        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        let inner = block.inner(area);
        let lines: Vec<Line> = fields
            .iter()
            .map(|field| self.form.build_line(*field))
            .collect();
        frame.render_widget(Paragraph::new(lines).block(block), area);

        if let Some(row) = fields.iter().position(|field| *field == self.form.active) {
            let active = self.form.active;
            let row = u16::try_from(row).unwrap_or(u16::MAX);
            if !active.is_selector() && row < inner.height {
                let offset = Span::raw(active.label()).width() + self.form.value_width(active);
                frame.set_cursor_position((cursor_column(inner, offset), inner.y + row));
            }
        }
    }

    fn draw_results(&self, frame: &mut Frame, area: Rect) {
        let title = format!("Search Results ({} saved)", self.pair_count);
        let block = Block::default().title(title).borders(Borders::ALL);
        let paragraph = Paragraph::new(self.output.as_str())
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints = Line::from(vec![
            Span::styled("[Tab]", key_style),
            Span::raw(" Next field   "),
            Span::styled("[\u{2190}\u{2192}]", key_style),
            Span::raw(" Choose language   "),
            Span::styled("[Ctrl-N]", key_style),
            Span::raw(" Add language   "),
            Span::styled("[Ctrl-S]", key_style),
            Span::raw(" Save pair   "),
            Span::styled("[Ctrl-F]", key_style),
            Span::raw(" Search   "),
            Span::styled("[Ctrl-L]", key_style),
            Span::raw(" Clear   "),
            Span::styled("[Esc]", key_style),
            Span::raw(" Quit"),
        ]);
        let block = Block::default().borders(Borders::TOP);
        let paragraph = Paragraph::new(hints)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect, status: &StatusMessage) {
        let width = to_columns(Line::from(status.text.as_str()).width()).saturating_add(4);
        let popup_area = centered_box(width, 3, area);
        frame.render_widget(Clear, popup_area);

        let block = match status.kind {
            StatusKind::Info => Block::default().style(status.kind.style()),
            StatusKind::Error => Block::default()
                .title("Error")
                .borders(Borders::ALL)
                .border_style(status.kind.style()),
        };
        let paragraph = Paragraph::new(Span::styled(status.text.clone(), status.kind.style()))
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, popup_area);
    }
}

/// Clamp a display width to the `u16` range used by terminal coordinates.
fn to_columns(width: usize) -> u16 {
    u16::try_from(width).unwrap_or(u16::MAX)
}

/// Column for a cursor `offset` cells into `area`, pinned to its right edge.
fn cursor_column(area: Rect, offset: usize) -> u16 {
    area.x.saturating_add(to_columns(offset)).min(area.right())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::temp_store;

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE))
                .unwrap();
        }
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn status_text(app: &App) -> Option<&str> {
        app.status.as_ref().map(|status| status.text.as_str())
    }

    #[test]
    fn key_bindings_map_to_commands() {
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(
            Command::from_key(&enter, Field::NewLanguage),
            Some(Command::AddLanguage)
        );
        assert_eq!(
            Command::from_key(&enter, Field::Foreign),
            Some(Command::SavePair)
        );
        assert_eq!(
            Command::from_key(&enter, Field::Keyword),
            Some(Command::Search)
        );
        assert_eq!(
            Command::from_key(&ctrl('l'), Field::English),
            Some(Command::Clear)
        );
        assert_eq!(
            Command::from_key(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE), Field::English),
            Some(Command::Quit)
        );
        assert_eq!(
            Command::from_key(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE), Field::English),
            None
        );
    }

    #[test]
    fn adding_language_selects_it_and_refreshes_filter() {
        let (store, _dir) = temp_store();
        let mut app = App::new(store).unwrap();

        app.form.focus(Field::NewLanguage);
        type_text(&mut app, " French ");
        app.execute(Command::AddLanguage).unwrap();

        assert_eq!(status_text(&app), Some("Added \"French\"!"));
        assert_eq!(app.form.language.value(), Some("French"));
        assert!(app.form.new_language.is_empty());
        assert!(app.form.search_language.select("French"));
    }

    #[test]
    fn duplicate_language_shows_error_and_keeps_running() {
        let (store, _dir) = temp_store();
        store.add_language("French").unwrap();
        let mut app = App::new(store).unwrap();

        app.form.new_language = "French".to_string();
        let exit = app.execute(Command::AddLanguage).unwrap();

        assert!(!exit);
        assert_eq!(status_text(&app), Some("\"French\" already exists!"));
        assert_eq!(app.store.list_languages().unwrap().len(), 1);
    }

    #[test]
    fn blank_language_name_is_reported() {
        let (store, _dir) = temp_store();
        let mut app = App::new(store).unwrap();

        app.form.new_language = "   ".to_string();
        app.execute(Command::AddLanguage).unwrap();

        assert_eq!(status_text(&app), Some("Please enter a language name"));
    }

    #[test]
    fn save_requires_every_field() {
        let (store, _dir) = temp_store();
        store.add_language("French").unwrap();
        let mut app = App::new(store).unwrap();

        app.form.english = "Hello".to_string();
        app.form.foreign = "Bonjour".to_string();
        app.form.focus(Field::Foreign);
        app.execute(Command::SavePair).unwrap();

        assert_eq!(status_text(&app), Some("All fields are required!"));
        assert_eq!(app.form.active, Field::English);
        assert_eq!(app.pair_count, 0);
    }

    #[test]
    fn saving_clears_inputs_and_refocuses_english() {
        let (store, _dir) = temp_store();
        store.add_language("French").unwrap();
        let mut app = App::new(store).unwrap();

        app.form.language.select("French");
        type_text(&mut app, "Good night");
        app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE))
            .unwrap();
        type_text(&mut app, "Bonne nuit");
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
            .unwrap();

        assert_eq!(status_text(&app), Some("\u{2713} Saved!"));
        assert!(app.form.english.is_empty());
        assert!(app.form.foreign.is_empty());
        assert_eq!(app.form.active, Field::English);
        assert_eq!(app.pair_count, 1);
    }

    #[test]
    fn search_renders_blocks_or_placeholder() {
        let (store, _dir) = temp_store();
        store.add_language("French").unwrap();
        store.save_pair("The cat sat", "Le chat", "French").unwrap();
        store.save_pair("A dog ran", "Un chien", "French").unwrap();
        let mut app = App::new(store).unwrap();

        app.form.keyword = "cat".to_string();
        app.execute(Command::Search).unwrap();
        assert_eq!(app.output, "English: The cat sat\nFrench: Le chat");

        app.form.keyword = "zebra".to_string();
        app.execute(Command::Search).unwrap();
        assert_eq!(app.output, "No results found");
    }

    #[test]
    fn clear_resets_search_without_touching_store() {
        let (store, _dir) = temp_store();
        store.add_language("French").unwrap();
        store.save_pair("Hello", "Bonjour", "French").unwrap();
        let mut app = App::new(store).unwrap();

        app.form.keyword = "Hello".to_string();
        app.execute(Command::Search).unwrap();
        app.handle_key(ctrl('l')).unwrap();

        assert!(app.output.is_empty());
        assert!(app.form.keyword.is_empty());
        assert_eq!(app.store.count_pairs().unwrap(), 1);
    }

    #[test]
    fn success_toast_expires_but_errors_wait_for_a_key() {
        let (store, _dir) = temp_store();
        let mut app = App::new(store).unwrap();

        app.set_status("\u{2713} Saved!", StatusKind::Info);
        app.expire_status(Instant::now() + TOAST_DURATION);
        assert!(app.status.is_none());

        app.set_status("All fields are required!", StatusKind::Error);
        app.expire_status(Instant::now() + TOAST_DURATION * 10);
        assert!(app.status.is_some());

        app.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE))
            .unwrap();
        assert!(app.status.is_none());
    }

    #[test]
    fn storage_failure_leaves_the_loop_instead_of_showing_a_popup() {
        let (store, _dir) = temp_store();
        store.add_language("French").unwrap();
        let mut app = App::new(store).unwrap();

        // Reconnecting creates an empty file with no tables.
        std::fs::remove_file(app.store.path()).unwrap();

        app.form.keyword = "cat".to_string();
        let err = app.execute(Command::Search).unwrap_err();
        assert!(format!("{err:#}").contains("storage unavailable"));
        assert!(app.status.is_none());

        app.form.new_language = "German".to_string();
        assert!(app.execute(Command::AddLanguage).is_err());
        assert!(app.status.is_none());

        app.form.language.select("French");
        app.form.english = "Hello".to_string();
        app.form.foreign = "Bonjour".to_string();
        assert!(app.handle_key(ctrl('s')).is_err());
        assert!(app.status.is_none());
    }

    #[test]
    fn cursor_column_uses_display_width_and_saturates() {
        let area = Rect::new(2, 0, 40, 3);
        let wide = "\u{5927}\u{4e08}\u{592b}";
        let offset = Span::raw(Field::Foreign.label()).width() + Span::raw(wide).width();

        assert_eq!(cursor_column(area, offset), 2 + 18 + 6);
        assert_eq!(cursor_column(area, usize::MAX), area.right());
        assert_eq!(to_columns(70_000), u16::MAX);
    }

    #[test]
    fn escape_quits() {
        let (store, _dir) = temp_store();
        let mut app = App::new(store).unwrap();

        let exit = app
            .handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))
            .unwrap();
        assert!(exit);
    }
}
