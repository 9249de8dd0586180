//! Main application state and logic.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{block::BorderType, Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use tracing::{info, warn};
use unicode_width::UnicodeWidthStr;

use super::theme::{icons, Theme};
use super::widgets::{
    CompletionScreen, FlashcardWidget, KeyHints, Logo, ProgressBar, VerdictBadge, VerdictButtons,
};
use crate::card::CardPhase;
use crate::config::Config;
use crate::generate::{GenerationJob, Generator};
use crate::models::{QaItem, Verdict};
use crate::presets::{self, PRESETS};
use crate::session::{Session, SessionPhase};

const GENERATION_FAILED: &str = "An error occurred while generating questions. Please try again.";
const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

// ══════════════════════════════════════════════════════════════════════════
// Application State
// ══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Compose,
    Generating,
    Review,
    Complete,
    Summary,
}

pub struct App {
    pub screen: Screen,
    pub running: bool,

    // Config and theme
    pub config: Config,
    config_path: PathBuf,
    pub theme: Theme,

    // Generation
    generator: Arc<dyn Generator>,
    job: Option<GenerationJob>,
    generating_since: Option<Instant>,

    // Review
    pub session: Session,
    pub has_session: bool,

    // Compose state
    pub draft: String,
    pub source_text: String,
    pub preset: Option<usize>,

    // Summary state
    pub summary_state: ListState,
    summary_return: Screen,

    // Status message (shown temporarily)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(config: Config, config_path: PathBuf, generator: Arc<dyn Generator>) -> Self {
        let theme = Theme::from_name(&config.theme);
        let session = Session::new(config.settle());

        Self {
            screen: Screen::Compose,
            running: true,
            config,
            config_path,
            theme,
            generator,
            job: None,
            generating_since: None,
            session,
            has_session: false,
            draft: String::new(),
            source_text: String::new(),
            preset: None,
            summary_state: ListState::default(),
            summary_return: Screen::Review,
            status_message: None,
        }
    }

    pub fn cycle_theme(&mut self) {
        let new_theme_name = self.theme.name.next();
        self.theme = Theme::new(new_theme_name);
        self.config.theme = new_theme_name.as_str().to_string();
        if let Err(e) = self.config.save(&self.config_path) {
            warn!(error = %e, "could not save theme choice");
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    /// Replace the current session with `items` and show the first card.
    pub fn load_items(&mut self, items: Vec<QaItem>) {
        self.session.initialize(items);
        self.has_session = true;
        self.summary_state = ListState::default();
        self.show_session();
    }

    pub fn start_generation(&mut self) {
        if self.draft.trim().is_empty() {
            self.set_status("Paste some content first.");
            return;
        }

        match GenerationJob::spawn(Arc::clone(&self.generator), self.draft.clone()) {
            Ok(job) => {
                info!(chars = self.draft.len(), "starting generation");
                self.job = Some(job);
                self.generating_since = Some(Instant::now());
                self.status_message = None;
                self.screen = Screen::Generating;
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    pub fn cancel_generation(&mut self) {
        if self.job.take().is_some() {
            info!("generation cancelled");
            self.set_status("Generation cancelled.");
        }
        self.generating_since = None;
        self.screen = Screen::Compose;
    }

    /// Advance time-driven state: collect a finished generation and fire
    /// the settled advance of the active card.
    pub fn tick(&mut self, now: Instant) {
        if let Some(result) = self.job.as_ref().and_then(GenerationJob::poll) {
            self.job = None;
            self.generating_since = None;
            match result {
                Ok(items) => {
                    let empty = items.is_empty();
                    self.source_text = self.draft.clone();
                    self.load_items(items);
                    if empty {
                        self.set_status("No usable cards were produced.");
                    }
                }
                Err(e) => {
                    warn!(error = %e, "keeping previous session after failed generation");
                    self.set_status(GENERATION_FAILED);
                    self.screen = Screen::Compose;
                }
            }
        }

        if self.session.tick(now) {
            self.sync_review_screen();
        }
    }

    fn judge(&mut self, verdict: Verdict) {
        self.session.judge(verdict, Instant::now());
    }

    fn next_card(&mut self) {
        self.session.advance();
        self.sync_review_screen();
    }

    fn previous_card(&mut self) {
        self.session.retreat();
        self.sync_review_screen();
    }

    fn restart(&mut self) {
        self.session.restart();
        self.sync_review_screen();
    }

    fn edit_content(&mut self) {
        self.session.cancel_settle();
        self.draft = self.source_text.clone();
        self.screen = Screen::Compose;
    }

    fn open_summary(&mut self) {
        if self.session.is_empty() {
            return;
        }
        if self.summary_state.selected().is_none() {
            self.summary_state.select(Some(0));
        }
        self.session.cancel_settle();
        self.summary_return = self.screen;
        self.screen = Screen::Summary;
    }

    fn show_session(&mut self) {
        self.screen = match self.session.phase() {
            SessionPhase::InProgress => Screen::Review,
            SessionPhase::Empty | SessionPhase::Completed => Screen::Complete,
        };
    }

    // Follow the session across the Completed boundary while it is on screen.
    fn sync_review_screen(&mut self) {
        if matches!(self.screen, Screen::Review | Screen::Complete) {
            self.show_session();
        }
    }

    fn load_next_preset(&mut self) {
        let i = presets::next_index(self.preset);
        self.preset = Some(i);
        self.draft = PRESETS[i].text.to_string();
    }

    // ══════════════════════════════════════════════════════════════════════
    // Event Handling
    // ══════════════════════════════════════════════════════════════════════

    pub fn handle_events(&mut self) -> anyhow::Result<()> {
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key.code),
                Event::Paste(text) if self.screen == Screen::Compose => {
                    self.preset = None;
                    self.draft.push_str(&text.replace('\r', ""));
                }
                _ => {}
            }
        }
        self.tick(Instant::now());
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match self.screen {
            Screen::Compose => self.handle_compose_keys(key),
            Screen::Generating => self.handle_generating_keys(key),
            Screen::Review => self.handle_review_keys(key),
            Screen::Complete => self.handle_complete_keys(key),
            Screen::Summary => self.handle_summary_keys(key),
        }
    }

    fn handle_compose_keys(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                if self.has_session {
                    self.show_session();
                } else {
                    self.running = false;
                }
            }
            KeyCode::Enter => self.start_generation(),
            KeyCode::Tab => self.load_next_preset(),
            KeyCode::Delete => {
                self.preset = None;
                self.draft.clear();
            }
            KeyCode::Backspace => {
                self.preset = None;
                self.draft.pop();
            }
            KeyCode::Char(c) => {
                self.preset = None;
                self.draft.push(c);
            }
            _ => {}
        }
    }

    fn handle_generating_keys(&mut self, key: KeyCode) {
        if key == KeyCode::Esc {
            self.cancel_generation();
        }
    }

    fn handle_review_keys(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Esc | KeyCode::Char('e') => self.edit_content(),
            KeyCode::Char('t') => self.cycle_theme(),
            KeyCode::Char(' ') => self.session.reveal(),
            KeyCode::Left | KeyCode::Char('h') => self.previous_card(),
            KeyCode::Right | KeyCode::Char('l') => self.next_card(),
            KeyCode::Char('r') => self.restart(),
            KeyCode::Char('s') => self.open_summary(),
            KeyCode::Char(c) => {
                if let Some(verdict) = Verdict::from_key(c) {
                    self.judge(verdict);
                }
            }
            _ => {}
        }
    }

    fn handle_complete_keys(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Enter | KeyCode::Char('r') => self.restart(),
            KeyCode::Esc | KeyCode::Char('e') => self.edit_content(),
            KeyCode::Char('s') => self.open_summary(),
            KeyCode::Char('t') => self.cycle_theme(),
            _ => {}
        }
    }

    fn handle_summary_keys(&mut self, key: KeyCode) {
        let len = self.session.len();
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('s') => {
                self.screen = self.summary_return;
                self.sync_review_screen();
            }
            KeyCode::Up | KeyCode::Char('k') if len > 0 => {
                let i = self.summary_state.selected().unwrap_or(0);
                let new_i = if i == 0 { len - 1 } else { i - 1 };
                self.summary_state.select(Some(new_i));
            }
            KeyCode::Down | KeyCode::Char('j') if len > 0 => {
                let i = self.summary_state.selected().unwrap_or(0);
                let new_i = if i >= len - 1 { 0 } else { i + 1 };
                self.summary_state.select(Some(new_i));
            }
            KeyCode::Char('t') => self.cycle_theme(),
            _ => {}
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Rendering
    // ══════════════════════════════════════════════════════════════════════

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // Clear with background
        frame.render_widget(Clear, area);
        frame.render_widget(
            Block::default().style(Style::default().bg(self.theme.colors.bg_dark)),
            area,
        );

        match self.screen {
            Screen::Compose => self.render_compose(frame, area),
            Screen::Generating => self.render_generating(frame, area),
            Screen::Review => self.render_review(frame, area),
            Screen::Complete => self.render_complete(frame, area),
            Screen::Summary => self.render_summary(frame, area),
        }

        self.render_status(frame, area);
    }

    fn render_compose(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(1),           // Top padding
            Constraint::Length(Logo::HEIGHT), // Logo
            Constraint::Length(1),           // Spacing
            Constraint::Min(6),              // Source text
            Constraint::Length(1),           // Presets
            Constraint::Length(1),           // Status
            Constraint::Length(2),           // Hints
        ])
        .split(area);

        frame.render_widget(Logo::new(&self.theme), chunks[1]);

        let input_area = centered_rect(80, 100, chunks[3]);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.colors.accent))
            .title(if self.source_text.is_empty() { " Paste Content " } else { " Edit Content " })
            .title_style(self.theme.highlight());
        let inner = block.inner(input_area);

        let (row, col) = cursor_position(&self.draft, inner.width as usize);
        let scroll = row.saturating_sub(inner.height.saturating_sub(1) as usize) as u16;

        let input = if self.draft.is_empty() {
            Paragraph::new(Span::styled(
                "Paste your content here or press Tab for an example...",
                Style::default().fg(self.theme.colors.text_dim),
            ))
        } else {
            Paragraph::new(self.draft.as_str())
                .style(Style::default().fg(self.theme.colors.text))
                .wrap(Wrap { trim: false })
                .scroll((scroll, 0))
        };
        frame.render_widget(input.block(block), input_area);
        frame.set_cursor_position((
            inner.x + (col as u16).min(inner.width.saturating_sub(1)),
            inner.y + (row as u16).saturating_sub(scroll),
        ));

        let mut preset_spans = vec![Span::styled("Examples: ", self.theme.key_hint())];
        for (i, preset) in PRESETS.iter().enumerate() {
            let style = if self.preset == Some(i) {
                self.theme.selected().add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.colors.text_muted)
            };
            preset_spans.push(Span::styled(format!(" {} ", preset.title), style));
        }
        frame.render_widget(
            Paragraph::new(Line::from(preset_spans)).alignment(Alignment::Center),
            chunks[4],
        );

        let hints_data: &[(&str, &str)] = if self.has_session {
            &[("Enter", "generate"), ("Tab", "example"), ("Del", "clear"), ("Esc", "back to review")]
        } else {
            &[("Enter", "generate"), ("Tab", "example"), ("Del", "clear"), ("Esc", "quit")]
        };
        frame.render_widget(KeyHints::new(hints_data, &self.theme), chunks[6]);
    }

    fn render_generating(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(area);

        let elapsed = self
            .generating_since
            .map(|since| since.elapsed())
            .unwrap_or_default();
        let frame_idx = (elapsed.as_millis() / 150) as usize % SPINNER.len();

        let text = vec![
            Line::from(vec![
                Span::styled(SPINNER[frame_idx], self.theme.highlight()),
                Span::styled(" Generating questions...", self.theme.title()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                format!("{}s", elapsed.as_secs()),
                Style::default().fg(self.theme.colors.text_muted),
            )),
        ];
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), chunks[1]);

        frame.render_widget(KeyHints::new(&[("Esc", "cancel")], &self.theme), chunks[3]);
    }

    fn render_review(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(1),   // Top padding
            Constraint::Length(1),   // Progress
            Constraint::Length(1),   // Spacing
            Constraint::Min(8),      // Card
            Constraint::Length(1),   // Verdict badge
            Constraint::Length(3),   // Buttons
            Constraint::Length(1),   // Status
            Constraint::Length(2),   // Hints
        ])
        .split(area);

        let Some(item) = self.session.current_item() else {
            return;
        };
        let card = self.session.card();

        frame.render_widget(
            ProgressBar::new(
                self.session.current_index() + 1,
                self.session.len(),
                self.session.progress_fraction(),
                &self.theme,
            ),
            centered_rect(80, 100, chunks[1]),
        );

        let answer = card.is_revealed().then_some(item.answer.as_str());
        frame.render_widget(
            FlashcardWidget::new(&item.question, answer, &self.theme),
            centered_rect(80, 100, chunks[3]),
        );

        frame.render_widget(VerdictBadge::new(card.verdict(), &self.theme), chunks[4]);

        if !card.is_attempted() {
            frame.render_widget(
                VerdictButtons::new(card.accepts_verdict(), &self.theme),
                centered_rect(40, 100, chunks[5]),
            );
        }

        let mut hints: Vec<(&str, &str)> = match card.phase() {
            CardPhase::Hidden => vec![("Space", "reveal")],
            CardPhase::Revealed => vec![("y", "remembered"), ("n", "forgot")],
            CardPhase::Settling => Vec::new(),
            CardPhase::Attempted if !card.is_revealed() => vec![("Space", "reveal")],
            CardPhase::Attempted => Vec::new(),
        };
        hints.extend([
            ("←/→", "prev/next"),
            ("r", "restart"),
            ("s", "summary"),
            ("e", "edit"),
            ("t", self.theme.name.display_name()),
            ("q", "quit"),
        ]);
        frame.render_widget(KeyHints::new(&hints, &self.theme), chunks[7]);
    }

    fn render_complete(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Min(10),
            Constraint::Length(2),
        ])
        .split(area);

        frame.render_widget(
            CompletionScreen::new(self.session.stats(), &self.theme),
            centered_rect(60, 50, chunks[0]),
        );

        let hints: &[(&str, &str)] = if self.session.is_empty() {
            &[("e", "edit content"), ("q", "quit")]
        } else {
            &[("r", "mark completed"), ("s", "summary"), ("e", "edit content"), ("q", "quit")]
        };
        frame.render_widget(KeyHints::new(hints, &self.theme), chunks[1]);
    }

    fn render_summary(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(3),   // Title
            Constraint::Min(5),      // List
            Constraint::Length(2),   // Hints
        ])
        .split(area);

        let title = Paragraph::new("Summary")
            .alignment(Alignment::Center)
            .style(self.theme.title());
        frame.render_widget(title, chunks[0]);

        let selected = self.summary_state.selected();
        let width = centered_rect(80, 100, chunks[1]).width.saturating_sub(6).max(10) as usize;
        let items: Vec<ListItem> = self
            .session
            .items()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let verdict = self.session.response(i).unwrap_or_default();
                let mark = match verdict {
                    Verdict::Remembered => icons::CHECK,
                    Verdict::Forgot => icons::CROSS,
                    Verdict::Unanswered => icons::DOT,
                };
                let mut lines = vec![Line::from(vec![
                    Span::styled(
                        format!("{} ", mark),
                        Style::default().fg(verdict.color_for_theme(&self.theme)),
                    ),
                    Span::styled(item.question.clone(), Style::default().fg(self.theme.colors.text)),
                ])];
                if selected == Some(i) {
                    for line in textwrap::wrap(&item.answer, width) {
                        lines.push(Line::from(Span::styled(
                            format!("  {}", line),
                            Style::default().fg(self.theme.colors.success),
                        )));
                    }
                }
                ListItem::new(Text::from(lines))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(self.theme.colors.primary))
                    .title(" Questions ")
                    .title_style(self.theme.highlight()),
            )
            .highlight_style(self.theme.selected())
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, centered_rect(80, 100, chunks[1]), &mut self.summary_state);

        frame.render_widget(
            KeyHints::new(&[("j/k", "nav"), ("t", "theme"), ("Esc", "back")], &self.theme),
            chunks[2],
        );
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        // Show status message if recent (within 5 seconds)
        if let Some((ref msg, time)) = self.status_message {
            if time.elapsed().as_secs() < 5 {
                let color = if msg == GENERATION_FAILED {
                    self.theme.colors.error
                } else {
                    self.theme.colors.success
                };
                let status = Paragraph::new(msg.as_str())
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(color));
                // Render above the hints
                let status_area = Rect {
                    x: area.x,
                    y: area.bottom().saturating_sub(3),
                    width: area.width,
                    height: 1,
                };
                frame.render_widget(status, status_area);
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Helper Functions
// ══════════════════════════════════════════════════════════════════════════

/// Create a centered rectangle.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

/// Row and column of the end of `text` once wrapped to `width` columns.
fn cursor_position(text: &str, width: usize) -> (usize, usize) {
    if width == 0 || text.is_empty() {
        return (0, 0);
    }

    let options = textwrap::Options::new(width)
        .break_words(true)
        .wrap_algorithm(textwrap::WrapAlgorithm::FirstFit);
    let lines = textwrap::wrap(text, options);
    let row = lines.len().saturating_sub(1);
    let col = lines.last().map(|line| line.width()).unwrap_or(0);

    if col >= width {
        (row + 1, 0)
    } else {
        (row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::GenerationError;
    use ratatui::{backend::TestBackend, Terminal};

    struct Canned(Option<&'static str>);

    impl Generator for Canned {
        fn generate(&self, _source: &str) -> Result<String, GenerationError> {
            self.0.map(str::to_string).ok_or(GenerationError::EmptyResponse)
        }
    }

    fn app(reply: Option<&'static str>) -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(
            Config::default(),
            dir.path().join("config.toml"),
            Arc::new(Canned(reply)),
        );
        (app, dir)
    }

    fn items(n: usize) -> Vec<QaItem> {
        (1..=n)
            .map(|i| QaItem::new(&format!("Question {i}"), &format!("Answer {i}")).unwrap())
            .collect()
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    fn finish_generation(app: &mut App) {
        let start = Instant::now();
        while app.screen == Screen::Generating {
            assert!(start.elapsed() < Duration::from_secs(5), "generation never finished");
            std::thread::sleep(Duration::from_millis(5));
            app.tick(Instant::now());
        }
    }

    fn settle(app: &mut App) {
        app.tick(Instant::now() + Duration::from_secs(5));
    }

    fn screen_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn blank_draft_does_not_generate() {
        let (mut app, _dir) = app(Some("Q###A"));
        type_text(&mut app, "   ");
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.screen, Screen::Compose);
        assert!(app.job.is_none());
        assert!(app.status_message.is_some());
    }

    #[test]
    fn generation_starts_review() {
        let (mut app, _dir) = app(Some("Q1###A1???Q2###A2???"));
        type_text(&mut app, "Some text");
        app.handle_key(KeyCode::Enter);
        finish_generation(&mut app);

        assert_eq!(app.screen, Screen::Review);
        assert_eq!(app.session.len(), 2);
        assert_eq!(app.source_text, "Some text");
    }

    #[test]
    fn failed_generation_keeps_previous_session() {
        let (mut app, _dir) = app(None);
        app.load_items(items(3));
        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Char('y'));
        settle(&mut app);

        app.handle_key(KeyCode::Char('e'));
        type_text(&mut app, "new text");
        app.handle_key(KeyCode::Enter);
        finish_generation(&mut app);

        assert_eq!(app.screen, Screen::Compose);
        assert_eq!(app.status_message.as_ref().map(|(m, _)| m.as_str()), Some(GENERATION_FAILED));
        assert_eq!(app.session.len(), 3);
        assert_eq!(app.session.current_index(), 1);
        assert_eq!(app.session.response(0), Some(Verdict::Remembered));

        app.handle_key(KeyCode::Esc);
        assert_eq!(app.screen, Screen::Review);
    }

    #[test]
    fn empty_reply_lands_on_complete() {
        let (mut app, _dir) = app(Some("nothing useful here"));
        type_text(&mut app, "text");
        app.handle_key(KeyCode::Enter);
        finish_generation(&mut app);

        assert_eq!(app.screen, Screen::Complete);
        assert!(app.session.is_empty());
        assert!(screen_text(&mut app).contains("No usable cards were produced."));
    }

    #[test]
    fn review_keys_walk_to_completion() {
        let (mut app, _dir) = app(None);
        app.load_items(items(2));

        // Judging before reveal does nothing.
        app.handle_key(KeyCode::Char('y'));
        assert_eq!(app.session.response(0), Some(Verdict::Unanswered));

        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Char('n'));
        app.handle_key(KeyCode::Char('y'));
        settle(&mut app);
        assert_eq!(app.session.current_index(), 1);
        assert_eq!(app.session.response(0), Some(Verdict::Forgot));

        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Char('y'));
        settle(&mut app);
        assert_eq!(app.screen, Screen::Complete);
        assert_eq!(app.session.stats().remembered, 1);

        // Mark completed starts over with a clean slate.
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.screen, Screen::Review);
        assert_eq!(app.session.current_index(), 0);
        assert_eq!(app.session.stats().unanswered, 2);
    }

    #[test]
    fn navigation_keys_stay_in_bounds() {
        let (mut app, _dir) = app(None);
        app.load_items(items(2));

        app.handle_key(KeyCode::Left);
        assert_eq!(app.session.current_index(), 0);

        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.screen, Screen::Complete);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.session.current_index(), 2);
    }

    #[test]
    fn summary_returns_to_where_it_was_opened() {
        let (mut app, _dir) = app(None);
        app.load_items(items(3));
        app.handle_key(KeyCode::Char('s'));
        assert_eq!(app.screen, Screen::Summary);

        app.handle_key(KeyCode::Up);
        assert_eq!(app.summary_state.selected(), Some(2));
        assert!(screen_text(&mut app).contains("Answer 3"));

        app.handle_key(KeyCode::Esc);
        assert_eq!(app.screen, Screen::Review);
    }

    #[test]
    fn summary_marks_each_verdict() {
        let (mut app, _dir) = app(None);
        app.load_items(items(3));
        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Char('y'));
        settle(&mut app);
        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Char('n'));
        settle(&mut app);
        app.handle_key(KeyCode::Char('s'));

        let text = screen_text(&mut app);
        assert!(text.contains("✓ Question 1"));
        assert!(text.contains("✗ Question 2"));
        assert!(text.contains("· Question 3"));
    }

    #[test]
    fn leaving_review_mid_settle_stays_on_card() {
        let (mut app, _dir) = app(None);
        app.load_items(items(3));
        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Char('y'));
        app.handle_key(KeyCode::Char('e'));
        assert_eq!(app.screen, Screen::Compose);

        settle(&mut app);
        assert_eq!(app.session.current_index(), 0);
        assert_eq!(app.session.response(0), Some(Verdict::Remembered));

        app.handle_key(KeyCode::Esc);
        assert_eq!(app.screen, Screen::Review);
        assert_eq!(app.session.card().phase(), CardPhase::Attempted);
    }

    #[test]
    fn tab_cycles_presets() {
        let (mut app, _dir) = app(None);
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.preset, Some(0));
        assert_eq!(app.draft, PRESETS[0].text);

        app.handle_key(KeyCode::Tab);
        assert_eq!(app.draft, PRESETS[1].text);

        app.handle_key(KeyCode::Char('!'));
        assert_eq!(app.preset, None);
    }

    #[test]
    fn theme_cycle_is_saved() {
        let (mut app, dir) = app(None);
        app.load_items(items(1));
        app.handle_key(KeyCode::Char('t'));
        assert_eq!(app.theme.name, crate::ui::theme::ThemeName::KanagawaWave);

        let saved = Config::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(saved.theme, "kanagawa-wave");
    }

    #[test]
    fn review_screen_shows_answer_only_after_reveal() {
        let (mut app, _dir) = app(None);
        app.load_items(items(1));
        let hidden = screen_text(&mut app);
        assert!(hidden.contains("Question 1"));
        assert!(!hidden.contains("Answer 1"));
        assert!(hidden.contains("1/1"));

        app.handle_key(KeyCode::Char(' '));
        assert!(screen_text(&mut app).contains("Answer 1"));
    }

    #[test]
    fn every_screen_renders() {
        let (mut app, _dir) = app(None);
        assert!(screen_text(&mut app).contains("Paste Content"));

        app.load_items(items(2));
        app.screen = Screen::Generating;
        assert!(screen_text(&mut app).contains("Generating questions"));

        app.screen = Screen::Complete;
        assert!(screen_text(&mut app).contains("SESSION COMPLETE"));
    }

    #[test]
    fn cursor_tracks_wrapped_text() {
        assert_eq!(cursor_position("", 10), (0, 0));
        assert_eq!(cursor_position("abc", 10), (0, 3));
        assert_eq!(cursor_position("abc\nde", 10), (1, 2));
        assert_eq!(cursor_position("aaaa bbbb cc", 9), (1, 2));
        assert_eq!(cursor_position("aa bb cc dd ee", 8), (1, 5));
        assert_eq!(cursor_position("abc", 3), (1, 0));
    }
}
