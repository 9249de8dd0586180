//! Custom widgets for the memo TUI.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, Gauge, Paragraph, Widget, Wrap},
};

use super::theme::{icons, Theme};
use crate::models::{SessionStats, Verdict};

// ══════════════════════════════════════════════════════════════════════════
// Logo Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct Logo<'a> {
    theme: &'a Theme,
}

impl<'a> Logo<'a> {
    const ART: &'static str = r#"
 __  __                      _          _   _
|  \/  | ___ _ __ ___   ___ (_)______ _| |_(_) ___  _ __
| |\/| |/ _ \ '_ ` _ \ / _ \| |_  / _` | __| |/ _ \| '_ \
| |  | |  __/ | | | | | (_) | |/ / (_| | |_| | (_) | | | |
|_|  |_|\___|_| |_| |_|\___/|_/___\__,_|\__|_|\___/|_| |_|"#;

    pub const HEIGHT: u16 = 5;

    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for Logo<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = Self::ART
            .lines()
            .skip(1)
            .map(|line| Line::from(Span::styled(line, Style::default().fg(self.theme.colors.primary))))
            .collect();

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Progress Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct ProgressBar<'a> {
    position: usize,
    total: usize,
    fraction: f64,
    theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    /// `position` is 1-based.
    pub fn new(position: usize, total: usize, fraction: f64, theme: &'a Theme) -> Self {
        Self { position, total, fraction, theme }
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let counter = format!("{}/{}", self.position, self.total);
        let chunks = Layout::horizontal([
            Constraint::Length(counter.len() as u16 + 2),
            Constraint::Min(10),
        ])
        .split(area);

        Paragraph::new(Span::styled(counter, self.theme.title()))
            .render(chunks[0], buf);

        Gauge::default()
            .gauge_style(Style::default().fg(self.theme.colors.primary).bg(self.theme.colors.bg_highlight))
            .ratio(self.fraction.clamp(0.0, 1.0))
            .label("")
            .render(chunks[1], buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Flashcard Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct FlashcardWidget<'a> {
    question: &'a str,
    answer: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> FlashcardWidget<'a> {
    pub fn new(question: &'a str, answer: Option<&'a str>, theme: &'a Theme) -> Self {
        Self { question, answer, theme }
    }
}

impl Widget for FlashcardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (label, label_style, border_color) = match self.answer {
            None => ("QUESTION", self.theme.question(), self.theme.colors.accent),
            Some(_) => ("ANSWER", self.theme.answer(), self.theme.colors.success),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(label, label_style),
                Span::raw(" "),
            ]))
            .title_alignment(Alignment::Center);

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![Line::from(Span::styled(
            self.question,
            Style::default().fg(self.theme.colors.text).add_modifier(Modifier::BOLD),
        ))];
        if let Some(answer) = self.answer {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                answer,
                Style::default().fg(self.theme.colors.success),
            )));
        }

        // Center vertically
        let content_height = lines.len() as u16;
        let vertical_padding = inner.height.saturating_sub(content_height) / 2;

        let content_area = Rect {
            x: inner.x + 2,
            y: inner.y + vertical_padding,
            width: inner.width.saturating_sub(4),
            height: inner.height.saturating_sub(vertical_padding),
        };

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(content_area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Verdict Widgets
// ══════════════════════════════════════════════════════════════════════════

pub struct VerdictBadge<'a> {
    verdict: Verdict,
    theme: &'a Theme,
}

impl<'a> VerdictBadge<'a> {
    pub fn new(verdict: Verdict, theme: &'a Theme) -> Self {
        Self { verdict, theme }
    }
}

impl Widget for VerdictBadge<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let icon = match self.verdict {
            Verdict::Unanswered => return,
            Verdict::Remembered => icons::CHECK,
            Verdict::Forgot => icons::CROSS,
        };
        let style = Style::default()
            .fg(self.verdict.color_for_theme(self.theme))
            .add_modifier(Modifier::BOLD);

        Paragraph::new(Line::from(vec![
            Span::styled(icon, style),
            Span::raw(" "),
            Span::styled(self.verdict.name(), style),
        ]))
        .alignment(Alignment::Center)
        .render(area, buf);
    }
}

pub struct VerdictButtons<'a> {
    enabled: bool,
    theme: &'a Theme,
}

impl<'a> VerdictButtons<'a> {
    pub fn new(enabled: bool, theme: &'a Theme) -> Self {
        Self { enabled, theme }
    }
}

impl Widget for VerdictButtons<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let buttons = [
            ("n", "No", Verdict::Forgot),
            ("y", "Yes", Verdict::Remembered),
        ];

        for (chunk, (key, label, verdict)) in chunks.iter().zip(buttons) {
            let color = if self.enabled {
                verdict.color_for_theme(self.theme)
            } else {
                self.theme.colors.text_dim
            };

            let button = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color));

            let inner = button.inner(*chunk);
            button.render(*chunk, buf);

            Paragraph::new(Line::from(vec![
                Span::styled(key, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(label, Style::default().fg(color)),
            ]))
            .alignment(Alignment::Center)
            .render(inner, buf);
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Key Hints Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct KeyHints<'a> {
    hints: &'a [(&'a str, &'a str)],
    theme: &'a Theme,
}

impl<'a> KeyHints<'a> {
    pub fn new(hints: &'a [(&'a str, &'a str)], theme: &'a Theme) -> Self {
        Self { hints, theme }
    }
}

impl Widget for KeyHints<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let spans: Vec<Span> = self
            .hints
            .iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(*key, self.theme.key_highlight()),
                    Span::styled(format!(" {} ", desc), self.theme.key_hint()),
                    Span::styled("│ ", Style::default().fg(self.theme.colors.text_dim)),
                ]
            })
            .collect();

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Completion Screen Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct CompletionScreen<'a> {
    stats: SessionStats,
    theme: &'a Theme,
}

impl<'a> CompletionScreen<'a> {
    pub fn new(stats: SessionStats, theme: &'a Theme) -> Self {
        Self { stats, theme }
    }
}

impl Widget for CompletionScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.colors.success))
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled("SESSION COMPLETE", self.theme.answer()),
                Span::raw(" "),
            ]))
            .title_alignment(Alignment::Center);

        let inner = block.inner(area);
        block.render(area, buf);

        let muted = Style::default().fg(self.theme.colors.text_muted);
        let text = if self.stats.total == 0 {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No usable cards were produced.",
                    Style::default().fg(self.theme.colors.warning).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled("Try a longer or more detailed passage.", muted)),
            ]
        } else {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("{} Success!", icons::SPARKLE),
                    Style::default().fg(self.theme.colors.success).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled("You have completed all the questions.", muted)),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Remembered: ", muted),
                    Span::styled(
                        self.stats.remembered.to_string(),
                        Style::default().fg(self.theme.colors.remembered).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("  {}  ", icons::DOT), muted),
                    Span::styled("Forgot: ", muted),
                    Span::styled(
                        self.stats.forgot.to_string(),
                        Style::default().fg(self.theme.colors.forgot).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("  {}  ", icons::DOT), muted),
                    Span::styled("Skipped: ", muted),
                    Span::styled(
                        self.stats.unanswered.to_string(),
                        Style::default().fg(self.theme.colors.text_dim),
                    ),
                ]),
            ]
        };

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
