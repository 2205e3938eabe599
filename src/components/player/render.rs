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

//! Render the now playing panel.
//!
//! The active track, the seek bar with elapsed and total time, the transport
//! controls, the volume gauge and the playlist, with the active entry marked
//! and scrolled into the middle of the view whenever the track changes.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Padding, Paragraph},
};

use crate::{
    components::{PlayerPanel, PlayerState, player::center_offset},
    model::store::PlaybackStore,
    render::icons::{ICON_NEXT, ICON_PAUSE, ICON_PLAY, ICON_PREV, ICON_REPEAT, ICON_SHUFFLE, ICON_VOLUME},
    theme::Theme,
    util::format::format_time,
};

impl PlayerPanel {
    pub(crate) fn draw(&mut self, f: &mut Frame, area: Rect, store: &PlaybackStore, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(9), Constraint::Min(0)])
            .split(area);

        self.draw_now_playing(f, chunks[0], store, theme);
        self.draw_playlist(f, chunks[1], store, theme);
    }

    fn draw_now_playing(&self, f: &mut Frame, area: Rect, store: &PlaybackStore, theme: &Theme) {
        let block = Block::default()
            .title(" Now Playing ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_colour))
            .padding(Padding::horizontal(1));

        let inner_area = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner_area);

        match store.current_track() {
            Some(track) => {
                let title = Line::from(Span::styled(&track.title, Style::default().add_modifier(Modifier::BOLD)).fg(theme.accent_colour));
                f.render_widget(Paragraph::new(title), chunks[0]);
                f.render_widget(Paragraph::new(track.artist.as_str()).fg(theme.artist_fg), chunks[1]);
            }
            None => {
                f.render_widget(Paragraph::new("No music is currently playing").fg(theme.muted_fg), chunks[0]);
            }
        }

        let position_gauge = Gauge::default()
            .gauge_style(Style::default().fg(theme.accent_colour).bg(theme.gauge_track_colour))
            .ratio(self.transport.progress.clamp(0.0, 1.0))
            .label("")
            .use_unicode(true);
        f.render_widget(position_gauge, chunks[2]);

        let time_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[3]);
        f.render_widget(Paragraph::new(format_time(self.elapsed())).fg(theme.time_fg), time_chunks[0]);
        f.render_widget(
            Paragraph::new(format_time(self.transport.duration)).fg(theme.time_fg).alignment(Alignment::Right),
            time_chunks[1],
        );

        let toggle_style = |active: bool| {
            if active {
                Style::default().fg(theme.accent_colour).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.muted_fg)
            }
        };

        let play_icon = match self.state() {
            PlayerState::LoadedPlaying | PlayerState::Seeking if self.transport.is_playing => ICON_PAUSE,
            _ => ICON_PLAY,
        };

        let controls = Line::from(vec![
            Span::styled(ICON_SHUFFLE, toggle_style(self.transport.shuffle)),
            Span::raw("   "),
            Span::styled(ICON_PREV, Style::default().fg(Color::White)),
            Span::raw("   "),
            Span::styled(play_icon, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
            Span::raw("   "),
            Span::styled(ICON_NEXT, Style::default().fg(Color::White)),
            Span::raw("   "),
            Span::styled(ICON_REPEAT, toggle_style(self.transport.repeat)),
        ]);
        f.render_widget(Paragraph::new(controls).alignment(Alignment::Center), chunks[5]);

        let volume_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(5)])
            .split(chunks[6]);

        f.render_widget(Paragraph::new(ICON_VOLUME), volume_layout[0]);

        let volume_gauge = Gauge::default()
            .gauge_style(Style::default().fg(theme.accent_colour).bg(theme.gauge_track_colour))
            .ratio(f64::from(self.transport.volume) / 100.0)
            .label("")
            .use_unicode(true);
        f.render_widget(volume_gauge, volume_layout[1]);

        let volume_label = Paragraph::new(format!(" {}", self.transport.volume))
            .alignment(Alignment::Right)
            .fg(Color::White);
        f.render_widget(volume_label, volume_layout[2]);
    }

    fn draw_playlist(&mut self, f: &mut Frame, area: Rect, store: &PlaybackStore, theme: &Theme) {
        let border_colour = if self.is_active { theme.accent_colour } else { theme.border_colour };

        let block = Block::default()
            .title(format!(" Play List ({}) ", store.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_colour));

        let height = block.inner(area).height as usize;
        if self.take_scroll_request() {
            if let Some(cursor) = store.cursor() {
                *self.list_state.offset_mut() = center_offset(cursor, store.len(), height);
            }
        }

        let cursor = store.cursor();
        let items: Vec<ListItem> = store
            .playlist()
            .iter()
            .enumerate()
            .map(|(index, track)| {
                if Some(index) == cursor {
                    ListItem::new(Line::from(vec![
                        Span::styled(format!("{} ", ICON_PLAY), Style::default().fg(theme.accent_colour)),
                        Span::styled(&track.title, Style::default().fg(theme.accent_colour).add_modifier(Modifier::BOLD)),
                    ]))
                } else {
                    ListItem::new(Line::from(vec![
                        Span::raw("  "),
                        Span::styled(&track.title, Style::default().fg(theme.track_fg)),
                    ]))
                }
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(theme.selection_bg));

        f.render_stateful_widget(list, area, &mut self.list_state);
    }
}
