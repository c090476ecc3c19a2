use std::time::Instant;

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::app::Feedback;
use crate::pattern::token;
use crate::session::{EndReason, SessionOrchestrator, SessionState};
use crate::ui::format;
use crate::ui::theme::Theme;

const CURSOR: &str = "▌";

/// The trainer screen in all of its session states.
pub struct PatternDisplay<'a> {
    pub session: &'a SessionOrchestrator,
    pub feedback: Option<&'a Feedback>,
    pub save_failed: bool,
    pub theme: &'a Theme,
    pub now: Instant,
}

impl<'a> PatternDisplay<'a> {
    pub fn new(
        session: &'a SessionOrchestrator,
        feedback: Option<&'a Feedback>,
        save_failed: bool,
        theme: &'a Theme,
        now: Instant,
    ) -> Self {
        Self {
            session,
            feedback,
            save_failed,
            theme,
            now,
        }
    }

    fn idle_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        vec![
            Line::from(Span::styled(
                "Keystroke Trainer",
                Style::default()
                    .fg(colors.title())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("{} patterns loaded", self.session.patterns().len()),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Space to begin",
                Style::default().fg(colors.dim()),
            )),
        ]
    }

    fn running_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let engine = self.session.engine();
        let Some(pattern) = engine.active() else {
            return Vec::new();
        };

        let best = match self.session.stats().best_time(&pattern.text) {
            Some(best) => Span::styled(
                format!("Best: {}", format::attempt_time(best)),
                Style::default().fg(colors.record()),
            ),
            None => Span::styled("No record yet", Style::default().fg(colors.dim())),
        };

        let typed = if engine.buffer().is_empty() {
            CURSOR.to_string()
        } else {
            token::format_for_display(engine.buffer())
        };

        let mut lines = vec![
            Line::from(Span::styled(
                pattern.name.clone(),
                Style::default()
                    .fg(colors.title())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(best),
            Line::from(""),
            Line::from(Span::styled(
                pattern.display(),
                Style::default()
                    .fg(colors.target())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(typed, Style::default().fg(colors.typed()))),
            Line::from(Span::styled(
                format::attempt_time(engine.elapsed(self.now)),
                Style::default().fg(colors.dim()),
            )),
        ];

        lines.push(self.feedback.map_or_else(|| Line::from(""), |f| self.feedback_line(f)));

        let remaining = self.session.remaining();
        if remaining > 0 {
            lines.push(Line::from(Span::styled(
                format!("{remaining} patterns remaining"),
                Style::default().fg(colors.dim()),
            )));
        }
        lines
    }

    fn feedback_line(&self, feedback: &Feedback) -> Line<'static> {
        let colors = &self.theme.colors;
        match feedback {
            Feedback::Mistake { expected } => Line::from(Span::styled(
                format!("✗ Expected {expected}"),
                Style::default().fg(colors.error()),
            )),
            Feedback::Finished {
                elapsed,
                new_best: true,
            } => Line::from(Span::styled(
                format!("✓ NEW BEST! {}", format::attempt_time(*elapsed)),
                Style::default()
                    .fg(colors.record())
                    .add_modifier(Modifier::BOLD),
            )),
            Feedback::Finished { elapsed, .. } => Line::from(Span::styled(
                format!("✓ {}", format::attempt_time(*elapsed)),
                Style::default().fg(colors.success()),
            )),
            Feedback::Requeued { resets } => Line::from(Span::styled(
                format!("↻ {resets} resets - retry later"),
                Style::default().fg(colors.warning()),
            )),
        }
    }

    fn ended_lines(&self, reason: EndReason) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let summary = self.session.last_summary();
        let total = summary.map_or(0, |s| s.patterns_total);
        let perfect = summary.map_or(0, |s| s.patterns_perfect);

        let mut lines = match reason {
            EndReason::Stopped => vec![Line::from(Span::styled(
                format!("Session ended: {perfect}/{total} perfect"),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            ))],
            EndReason::Completed => {
                let duration = summary.map(|s| s.duration).unwrap_or_default();
                vec![
                    Line::from(Span::styled(
                        "ALL PATTERNS MASTERED!",
                        Style::default()
                            .fg(colors.success())
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from(Span::styled(
                        format!("Session time: {}", format::session_time(duration)),
                        Style::default().fg(colors.fg()),
                    )),
                    Line::from(Span::styled(
                        format!(
                            "{} patterns completed perfectly",
                            self.session.patterns().len()
                        ),
                        Style::default().fg(colors.fg()),
                    )),
                ]
            }
        };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Space to train again",
            Style::default().fg(colors.dim()),
        )));
        lines
    }
}

impl Widget for PatternDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = if self.session.is_running() {
            format!(
                " strokr | {} | {}/{} perfect ",
                format::session_time(self.session.session_elapsed(self.now)),
                self.session.patterns_perfect(),
                self.session.patterns_total(),
            )
        } else {
            " strokr ".to_string()
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = match self.session.state() {
            SessionState::Idle => self.idle_lines(),
            SessionState::Running => self.running_lines(),
            SessionState::Ended(reason) => self.ended_lines(reason),
        };
        if self.save_failed {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Stats could not be saved (see log)",
                Style::default().fg(colors.warning()),
            )));
        }

        // Vertically center the content block.
        let pad = inner.height.saturating_sub(lines.len() as u16) / 2;
        let body = Rect::new(
            inner.x,
            inner.y + pad,
            inner.width,
            inner.height.saturating_sub(pad),
        );
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .render(body, buf);
    }
}
