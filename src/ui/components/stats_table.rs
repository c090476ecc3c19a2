use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Paragraph, Row, Table, Widget};

use crate::pattern::token;
use crate::stats::StatsAggregator;
use crate::ui::format;
use crate::ui::theme::Theme;

const HEADERS: [&str; 8] = [
    "Pattern", "Tries", "Perfect", "Best", "Avg", "Streak", "Top", "Weakest",
];

pub struct StatsTable<'a> {
    pub stats: &'a StatsAggregator,
    pub theme: &'a Theme,
}

impl<'a> StatsTable<'a> {
    pub fn new(stats: &'a StatsAggregator, theme: &'a Theme) -> Self {
        Self { stats, theme }
    }

    fn rows(&self) -> Vec<Row<'static>> {
        let colors = &self.theme.colors;
        self.stats
            .summaries()
            .into_iter()
            .map(|s| {
                let weakest = s
                    .weakest
                    .map(|w| token::format_for_display(&token::tokenize(&w)))
                    .unwrap_or_else(|| "-".to_string());
                Row::new(vec![
                    Cell::from(s.name),
                    Cell::from(s.attempts.to_string()),
                    Cell::from(format!("{:.0}%", s.perfect_rate * 100.0)),
                    Cell::from(format::optional_time(s.best_time))
                        .style(Style::default().fg(colors.record())),
                    Cell::from(format::optional_time(s.average_time)),
                    Cell::from(s.current_streak.to_string()),
                    Cell::from(s.best_streak.to_string()),
                    Cell::from(weakest).style(Style::default().fg(colors.error())),
                ])
                .style(Style::default().fg(colors.fg()))
            })
            .collect()
    }
}

impl Widget for StatsTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Statistics ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(2)])
            .split(inner);

        let rows = self.rows();
        if rows.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "No attempts recorded yet",
                Style::default().fg(colors.dim()),
            )))
            .render(layout[0], buf);
        } else {
            let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h))).style(
                Style::default()
                    .fg(colors.header_fg())
                    .bg(colors.header_bg())
                    .add_modifier(Modifier::BOLD),
            );
            let widths = [
                Constraint::Min(16),
                Constraint::Length(6),
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(7),
                Constraint::Length(5),
                Constraint::Length(8),
            ];
            Table::new(rows, widths)
                .header(header)
                .column_spacing(1)
                .render(layout[0], buf);
        }

        let all = self.stats.stats();
        let totals = format!(
            " Sessions: {}  |  Training time: {}",
            all.total_sessions,
            format::session_time(all.total_train_time)
        );
        Paragraph::new(Line::from(Span::styled(
            totals,
            Style::default().fg(colors.title()),
        )))
        .render(layout[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::pattern::Pattern;
    use crate::store::memory::MemoryStore;

    fn render_text(stats: &StatsAggregator) -> String {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 100, 12);
        let mut buf = Buffer::empty(area);
        StatsTable::new(stats, &theme).render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_empty_stats_message() {
        let stats = StatsAggregator::new(Box::new(MemoryStore::new()));
        assert!(render_text(&stats).contains("No attempts recorded yet"));
    }

    #[test]
    fn test_rows_show_pattern_name_and_counts() {
        let mut stats = StatsAggregator::new(Box::new(MemoryStore::new()));
        let p = Pattern::new("Drill one", "abLC");
        stats.record_attempt(&p, Duration::from_millis(1200), 0);
        let text = render_text(&stats);
        assert!(text.contains("Drill one"));
        assert!(text.contains("100%"));
        assert!(text.contains("1.200s"));
    }
}
