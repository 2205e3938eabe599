// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! UI rendering logic for the chart panel.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::{
    components::{ChartFocus, ChartPanel},
    render::icons::ICON_CALENDAR,
    theme::Theme,
};

impl ChartPanel {
    pub(crate) fn draw(&mut self, f: &mut Frame, area: Rect, title: &str, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        self.draw_entries(f, chunks[0], title, theme);
        self.draw_results(f, chunks[1], theme);
    }

    fn border_style(&self, focus: ChartFocus, theme: &Theme) -> Style {
        if self.focus == Some(focus) {
            Style::default().fg(theme.accent_colour)
        } else {
            Style::default().fg(theme.border_colour)
        }
    }

    fn draw_entries(&mut self, f: &mut Frame, area: Rect, title: &str, theme: &Theme) {
        let block = Block::default()
            .title(format!(" {} ", title))
            .title_top(Line::from(format!(" {} {} ", ICON_CALENDAR, self.date.format("%Y-%m-%d"))).right_aligned())
            .borders(Borders::ALL)
            .border_style(self.border_style(ChartFocus::Entries, theme));

        if self.entries.is_empty() {
            let inner = block.inner(area);
            f.render_widget(block, area);
            f.render_widget(Paragraph::new("No chart for this date").style(Style::default().fg(theme.muted_fg)), inner);
            return;
        }

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("#{:<4}", entry.rank), Style::default().fg(theme.time_fg)),
                    Span::styled(&entry.title, Style::default().fg(theme.track_fg).add_modifier(Modifier::BOLD)),
                    Span::raw("  "),
                    Span::styled(&entry.album, Style::default().fg(theme.album_fg)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(theme.selection_bg));

        f.render_stateful_widget(list, area, &mut self.entries_state);
    }

    fn draw_results(&mut self, f: &mut Frame, area: Rect, theme: &Theme) {
        let title = match &self.last_query {
            Some(query) => format!(" Results for \"{}\" ", query),
            None => " Results ".to_string(),
        };

        let block = Block::default()
            .title(title)
            .title_bottom(Line::from(" enter: play now  a: add to playlist ").right_aligned())
            .borders(Borders::ALL)
            .border_style(self.border_style(ChartFocus::Results, theme));

        if self.lookup_pending {
            let inner = block.inner(area);
            f.render_widget(block, area);
            f.render_widget(Paragraph::new("Searching...").style(Style::default().fg(theme.muted_fg)), inner);
            return;
        }

        let items: Vec<ListItem> = self
            .results
            .iter()
            .map(|track| {
                ListItem::new(Line::from(vec![
                    Span::styled(&track.title, Style::default().fg(theme.track_fg)),
                    Span::raw("  "),
                    Span::styled(&track.artist, Style::default().fg(theme.artist_fg)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(theme.selection_bg));

        f.render_stateful_widget(list, area, &mut self.results_state);
    }
}
