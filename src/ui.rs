//! Rendering: arena, slot row, header, and the overlay screens.
//!
//! The arena is drawn in its own unit space (x in percent, y in units from the top)
//! scaled onto whatever cells the terminal offers. `ArenaLayout` owns that mapping in
//! both directions so mouse hit-testing agrees with what is on screen.

use crate::app::{GameOverReason, QuitOption, Screen};
use crate::arena::{ArenaSnapshot, Fragment, FragmentState, Geometry, Phase, Point};
use crate::levels::Level;
use crate::score::Scoreboard;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

const HEADER_HEIGHT: u16 = 3;
const SLOT_ROW_HEIGHT: u16 = 5;
const FOOTER_HEIGHT: u16 = 1;
const MAX_BOARD_WIDTH: u16 = 96;
const SUBMIT_LABEL: &str = " [ Submit ] ";
const CLEAR_FADE_MS: u32 = 600;
const REJECT_FLASH_MS: u32 = 400;

/// Screen regions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArenaLayout {
    pub header: Rect,
    pub submit: Rect,
    /// Arena block including its border.
    pub arena: Rect,
    /// Drawable inside of the arena block.
    pub field: Rect,
    /// Slot block including its border.
    pub slots: Rect,
    pub slot_row: Rect,
    pub footer: Rect,
}

impl ArenaLayout {
    pub fn new(area: Rect) -> Self {
        let width = area.width.min(MAX_BOARD_WIDTH);
        let board = Rect {
            x: area.x + (area.width - width) / 2,
            width,
            ..area
        };
        let [header, arena, slots, footer] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(SLOT_ROW_HEIGHT),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .areas(board);
        let label = SUBMIT_LABEL.len() as u16;
        let submit = Rect {
            x: header.right().saturating_sub(label + 2),
            y: header.y + 1,
            width: label.min(header.width.saturating_sub(2)),
            height: 1.min(header.height),
        };
        Self {
            header,
            submit,
            arena,
            field: Block::bordered().inner(arena),
            slots,
            slot_row: Block::bordered().inner(slots),
            footer,
        }
    }

    /// Terminal cell to arena point. Rows in the slot block map into the slot band
    /// below the floor; anything outside the board lands outside both.
    pub fn to_point(&self, column: u16, row: u16, geometry: &Geometry) -> Point {
        let field_w = f32::from(self.field.width.max(1));
        let x = (f32::from(column) - f32::from(self.field.x) + 0.5) / field_w * 100.0;
        let row = f32::from(row) + 0.5;
        let y = if row < f32::from(self.slots.y) {
            (row - f32::from(self.field.y)) / f32::from(self.field.height.max(1)) * geometry.height as f32
        } else {
            let into = (row - f32::from(self.slots.y)) / f32::from(self.slots.height.max(1));
            geometry.height as f32 + into * geometry.slot_band as f32
        };
        Point::new(x, y)
    }

    /// Arena point back to a terminal cell, clamped onto the arena or slot block.
    fn to_cell(&self, point: Point, geometry: &Geometry) -> Position {
        let width = f32::from(self.field.width);
        let col = (point.x / 100.0 * width).clamp(0.0, (width - 1.0).max(0.0)) as u16;
        let height = geometry.height as f32;
        let row = if point.y < height {
            let rows = f32::from(self.field.height);
            self.field.y + (point.y.max(0.0) / height * rows).min((rows - 1.0).max(0.0)) as u16
        } else {
            let rows = f32::from(self.slots.height);
            let into = (point.y - height) / geometry.slot_band.max(1) as f32;
            self.slots.y + (into * rows).min((rows - 1.0).max(0.0)) as u16
        };
        Position::new(self.field.x + col, row)
    }

    /// Rows covering arena units `[top, top + units)`, at least one row tall.
    fn rows(&self, top: u32, units: u32, geometry: &Geometry) -> (u16, u16) {
        let scale = f32::from(self.field.height) / geometry.height.max(1) as f32;
        let limit = self.field.height;
        let start = ((top as f32 * scale).round() as u16).min(limit.saturating_sub(1));
        let end = (((top + units) as f32 * scale).round() as u16).clamp(start + 1, limit.max(start + 1));
        (self.field.y + start, self.field.y + end)
    }
}

/// Cells `[start, end)` of band `index` out of `count` equal bands across `width`.
/// Edges are placed so each cell's centre maps back to the band it is drawn in.
fn band(index: usize, count: usize, width: u16) -> (u16, u16) {
    let count = count.max(1) as f32;
    let w = f32::from(width);
    let edge = |i: usize| (i as f32 * w / count - 0.5).ceil().clamp(0.0, w) as u16;
    (edge(index), edge(index + 1))
}

/// What the renderer needs from the app for one frame.
pub struct View<'a> {
    pub screen: Screen,
    pub snapshot: &'a ArenaSnapshot,
    pub board: &'a Scoreboard,
    pub levels: &'a [Level],
    pub theme: &'a Theme,
    pub best: u32,
    pub new_best: bool,
    pub end: Option<GameOverReason>,
    pub quit_selected: QuitOption,
    /// Highlighted level on the main menu.
    pub menu_level: usize,
    /// Transient footer message, e.g. after submitting an incomplete row.
    pub notice: Option<&'a str>,
}

impl View<'_> {
    fn level(&self) -> Option<&Level> {
        self.levels.get(self.board.level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Cleared,
    Rejected,
}

/// Flash effects on the slot row.
#[derive(Default)]
pub struct Effects {
    pending: Option<Cue>,
    active: Option<Effect>,
    last: Option<Instant>,
    disabled: bool,
}

impl Effects {
    pub fn new(disabled: bool) -> Self {
        Self {
            disabled,
            ..Self::default()
        }
    }

    pub fn cue(&mut self, cue: Cue) {
        if !self.disabled {
            self.pending = Some(cue);
        }
    }

    pub fn reset(&mut self) {
        self.pending = None;
        self.active = None;
        self.last = None;
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, now: Instant) {
        if let Some(cue) = self.pending.take() {
            let effect = match cue {
                Cue::Cleared => fx::fade_from(theme.title, theme.bg, (CLEAR_FADE_MS, Interpolation::Linear)),
                Cue::Rejected => fx::fade_from(theme.bg, theme.reject, (REJECT_FLASH_MS, Interpolation::Linear)),
            };
            self.active = Some(effect.with_area(area));
            self.last = None;
        }
        let delta = self.last.map_or(std::time::Duration::ZERO, |t| now.saturating_duration_since(t));
        self.last = Some(now);
        let delta = TfxDuration::from_millis(u32::try_from(delta.as_millis()).unwrap_or(u32::MAX));
        let mut done = false;
        if let Some(effect) = self.active.as_mut() {
            frame.render_effect(effect, area, delta);
            done = effect.done();
        }
        if done {
            self.active = None;
            self.last = None;
        }
    }
}

/// Draws the current screen and returns the layout used, for mouse hit-testing.
pub fn draw(frame: &mut Frame, view: &View, effects: &mut Effects, now: Instant) -> ArenaLayout {
    let area = frame.area();
    let layout = ArenaLayout::new(area);
    frame.render_widget(Block::default().style(Style::default().bg(view.theme.bg)), area);

    if view.screen == Screen::Menu {
        draw_menu(frame, view, area);
        return layout;
    }

    draw_game(frame, view, &layout);
    effects.render(frame, layout.slots, view.theme, now);
    match view.screen {
        Screen::Playing if view.snapshot.phase == Phase::Paused => draw_pause_overlay(frame, view.theme, layout.arena),
        Screen::LevelCleared => draw_level_cleared(frame, view, layout.arena),
        Screen::GameOver => draw_game_over(frame, view, layout.arena),
        Screen::QuitMenu => draw_quit_menu(frame, view.theme, view.quit_selected),
        Screen::Playing | Screen::Menu => {}
    }
    layout
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn popup<'a>(frame: &mut Frame, theme: &Theme, rect: Rect, title: &'a str, lines: Vec<Line<'a>>) {
    frame.render_widget(Clear, rect);
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.div_line))
            .style(Style::default().bg(theme.bg))
            .title(Span::styled(title, Style::default().fg(theme.title))),
    );
    frame.render_widget(p, rect);
}

fn draw_game(frame: &mut Frame, view: &View, layout: &ArenaLayout) {
    draw_header(frame, view, layout);
    draw_field(frame, view, layout);
    draw_slot_row(frame, view, layout);
    draw_held(frame, view, layout);
    draw_footer(frame, view, layout.footer);
}

fn draw_header(frame: &mut Frame, view: &View, layout: &ArenaLayout) {
    let theme = view.theme;
    let label = Style::default().fg(theme.div_line);
    let value = Style::default().fg(theme.main_fg).add_modifier(Modifier::BOLD);
    let kind = view.level().map_or("", |l| l.kind.as_str());
    let mut spans = vec![
        Span::styled(" Score ", label),
        Span::styled(view.board.score.to_string(), value),
        Span::styled("  Level ", label),
        Span::styled(format!("{}/{}", view.board.level + 1, view.levels.len()), value),
    ];
    if !kind.is_empty() {
        spans.push(Span::styled(format!("  {kind}"), Style::default().fg(theme.title)));
    }
    if view.board.combo > 0 {
        spans.push(Span::styled(
            format!("  Combo x{}", view.board.combo),
            Style::default().fg(theme.group_color(3)),
        ));
    }
    spans.push(Span::styled("  Best ", label));
    spans.push(Span::styled(view.best.max(view.board.score).to_string(), value));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.div_line))
        .title(Span::styled(" Sentrixtui ", Style::default().fg(theme.title)));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), layout.header);

    let style = if view.snapshot.can_submit {
        Style::default().fg(theme.bg).bg(theme.group_color(4)).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.main_fg).bg(theme.danger)
    };
    frame.render_widget(Paragraph::new(SUBMIT_LABEL).style(style), layout.submit);
}

fn draw_field(frame: &mut Frame, view: &View, layout: &ArenaLayout) {
    let theme = view.theme;
    let snapshot = view.snapshot;
    let g = &snapshot.geometry;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.div_line));
    frame.render_widget(block, layout.arena);
    let field = layout.field;
    if field.is_empty() {
        return;
    }

    // Loss threshold marker.
    let (row, _) = layout.rows(g.height.saturating_sub(snapshot.loss_threshold), 0, g);
    let marker = "┈".repeat(usize::from(field.width));
    frame.buffer_mut().set_string(field.x, row, marker, Style::default().fg(theme.danger));

    let columns = snapshot.column_heights.len().max(1);
    let box_width = (field.width / columns as u16).max(1);
    for f in &snapshot.fragments {
        let (left, width) = match f.state {
            FragmentState::Piled { column, .. } => {
                let (start, end) = band(column, columns, field.width);
                (field.x + start, end - start)
            }
            FragmentState::Falling => {
                let centre = f.x / 100.0 * f32::from(field.width);
                let start = (centre - f32::from(box_width) / 2.0).round().max(0.0) as u16;
                let start = start.min(field.width.saturating_sub(box_width));
                (field.x + start, box_width.min(field.width))
            }
            FragmentState::Slotted { .. } | FragmentState::Held { .. } => continue,
        };
        let (top, bottom) = layout.rows(f.y, g.fragment_height, g);
        let rect = Rect::new(left, top, width, bottom - top).intersection(field);
        draw_fragment(frame, f, rect, theme.group_color(f.group), theme);
    }
}

fn draw_fragment(frame: &mut Frame, fragment: &Fragment, rect: Rect, color: Color, theme: &Theme) {
    if rect.is_empty() {
        return;
    }
    if rect.height >= 3 {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color));
        let text = Paragraph::new(fragment.text.as_str())
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.main_fg).add_modifier(Modifier::BOLD))
            .block(block);
        frame.render_widget(text, rect);
    } else {
        let fill = Style::default().fg(theme.bg).bg(color);
        frame.render_widget(Block::default().style(fill), rect);
        let text = Paragraph::new(fragment.text.as_str())
            .alignment(Alignment::Center)
            .style(fill.add_modifier(Modifier::BOLD));
        frame.render_widget(text, Rect { height: 1, ..rect });
    }
}

fn draw_slot_row(frame: &mut Frame, view: &View, layout: &ArenaLayout) {
    let theme = view.theme;
    let snapshot = view.snapshot;
    let title = if snapshot.rejected { " Not quite, try again " } else { " Sentence " };
    let border = if snapshot.rejected { theme.reject } else { theme.div_line };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(Span::styled(title, Style::default().fg(border)));
    frame.render_widget(block, layout.slots);

    let row = layout.slot_row;
    let n = snapshot.slots.len();
    for (i, slot) in snapshot.slots.iter().enumerate() {
        let (start, end) = band(i, n, row.width);
        let rect = Rect::new(row.x + start, row.y, end - start, row.height);
        let fragment = slot.and_then(|id| snapshot.fragment(id));
        let color = match fragment {
            Some(_) if snapshot.rejected => theme.reject,
            Some(f) => theme.group_color(f.group),
            None => theme.danger,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color))
            .title(Span::styled(format!("{}", i + 1), Style::default().fg(theme.div_line)));
        let text = fragment.map_or("", |f| f.text.as_str());
        let p = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.main_fg).add_modifier(Modifier::BOLD))
            .block(block);
        frame.render_widget(p, rect);
    }
}

/// The lifted fragment follows the pointer as a single row.
fn draw_held(frame: &mut Frame, view: &View, layout: &ArenaLayout) {
    let snapshot = view.snapshot;
    let Some(held) = snapshot.held else {
        return;
    };
    let Some(fragment) = snapshot.fragment(held.id) else {
        return;
    };
    let at = layout.to_cell(held.at, &snapshot.geometry);
    let columns = snapshot.column_heights.len().max(1) as u16;
    let width = (layout.field.width / columns).max(fragment.text.chars().count() as u16 + 2);
    let rect = Rect::new(at.x.saturating_sub(width / 2), at.y, width, 1).intersection(frame.area());
    let style = Style::default()
        .fg(view.theme.bg)
        .bg(view.theme.group_color(fragment.group))
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(fragment.text.as_str()).alignment(Alignment::Center).style(style),
        rect,
    );
}

fn draw_footer(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let line = match view.notice {
        Some(notice) => Line::from(Span::styled(
            format!(" {notice} "),
            Style::default().fg(theme.group_color(3)).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            " Drag fragments into the slots · Enter submit · Esc cancel drag · P pause · Q quit ",
            Style::default().fg(theme.div_line),
        )),
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_menu(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let fg = Style::default().fg(theme.main_fg);
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "S E N T R I X T U I",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("rebuild the sentence before the pile overflows", Style::default().fg(theme.div_line))),
        Line::from(""),
        Line::from(Span::styled("Fragments fall into the arena and pile up.", fg)),
        Line::from(Span::styled("Drag them into the slot row in the right order,", fg)),
        Line::from(Span::styled("then press Enter or click Submit.", fg)),
        Line::from(""),
    ];
    for (i, level) in view.levels.iter().enumerate() {
        let text = if level.kind.is_empty() {
            format!(" {}. {:?} ", i + 1, level.difficulty)
        } else {
            format!(" {}. {} · {:?} ", i + 1, level.kind, level.difficulty)
        };
        let style = if i == view.menu_level {
            Style::default().fg(theme.bg).bg(theme.title).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.group_color(i))
        };
        lines.push(Line::from(Span::styled(text, style)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Best: {}", view.best),
        Style::default().fg(theme.main_fg),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "↑/↓ choose level · Enter start · Q quit",
        Style::default().fg(theme.div_line),
    )));
    let height = lines.len() as u16 + 2;
    popup(frame, theme, centered(area, 56, height), " Sentrixtui ", lines);
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(" Paused ", Style::default().fg(Color::Black).bg(Color::Yellow))),
        Line::from(""),
        Line::from(Span::styled(" P: resume    Q: quit ", Style::default().fg(theme.main_fg))),
    ];
    popup(frame, theme, centered(area, 28, 6), "", lines);
}

fn draw_level_cleared(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let fg = Style::default().fg(theme.main_fg);
    let sentence = view.level().map_or("", |l| l.sentence.as_str());
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Sentence complete! ",
            Style::default().fg(theme.bg).bg(theme.group_color(4)).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(sentence, Style::default().fg(theme.title))),
        Line::from(""),
        Line::from(Span::styled(format!("+{} points", view.board.last_award), fg)),
    ];
    if view.board.combo > 1 {
        lines.push(Line::from(Span::styled(format!("Combo x{}", view.board.combo), fg)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Enter: next level    Q: quit ",
        Style::default().fg(theme.div_line),
    )));
    let height = lines.len() as u16 + 2;
    popup(frame, theme, centered(area, 48, height), " Level cleared ", lines);
}

fn draw_game_over(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let fg = Style::default().fg(theme.main_fg);
    let (title, banner) = match view.end {
        Some(GameOverReason::AllCleared) => (" You win ", Style::default().fg(theme.bg).bg(theme.group_color(4))),
        _ => (" Game Over ", Style::default().fg(Color::White).bg(theme.reject)),
    };
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            match view.end {
                Some(GameOverReason::AllCleared) => " Every sentence rebuilt! ",
                _ => " The pile reached the top ",
            },
            banner,
        )),
        Line::from(""),
        Line::from(Span::styled(format!(" Score: {} ", view.board.score), fg)),
        Line::from(Span::styled(format!(" Best: {} ", view.best), fg)),
        Line::from(Span::styled(format!(" Sentences: {} ", view.board.sentences_cleared), fg)),
    ];
    if view.new_best {
        lines.push(Line::from(Span::styled(
            " New record! ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " R: restart    Enter: menu    Q: quit ",
        Style::default().fg(theme.div_line),
    )));
    let height = lines.len() as u16 + 2;
    popup(frame, theme, centered(area, 44, height), title, lines);
}

fn draw_quit_menu(frame: &mut Frame, theme: &Theme, selected: QuitOption) {
    let rect = centered(frame.area(), 24, 8);
    frame.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.title))
        .style(Style::default().bg(theme.bg))
        .title(" Quit? ");
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let options = [
        (QuitOption::Resume, " Resume "),
        (QuitOption::MainMenu, " Main Menu "),
        (QuitOption::Exit, " Exit "),
    ];
    for (i, (opt, label)) in options.iter().enumerate() {
        let style = if *opt == selected {
            Style::default().fg(theme.bg).bg(theme.title).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.title)
        };
        let x = inner.x + inner.width.saturating_sub(label.len() as u16) / 2;
        let y = inner.y + 1 + i as u16 * 2;
        if y < inner.bottom() {
            frame.buffer_mut().set_string(x, y, label, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ArenaLayout {
        ArenaLayout::new(Rect::new(0, 0, 62, 40))
    }

    #[test]
    fn test_layout_stacks_regions() {
        let l = layout();
        assert_eq!(l.header.height, HEADER_HEIGHT);
        assert_eq!(l.slots.height, SLOT_ROW_HEIGHT);
        assert_eq!(l.slots.y, l.arena.bottom());
        assert_eq!(l.field.x, l.slot_row.x);
        assert_eq!(l.field.width, l.slot_row.width);
        assert!(l.header.contains(Position::new(l.submit.x, l.submit.y)));
    }

    #[test]
    fn test_board_is_centred_on_wide_terminals() {
        let l = ArenaLayout::new(Rect::new(0, 0, 200, 40));
        assert_eq!(l.arena.width, MAX_BOARD_WIDTH);
        assert_eq!(l.arena.x, (200 - MAX_BOARD_WIDTH) / 2);
    }

    #[test]
    fn test_points_land_in_arena_and_slot_band() {
        let l = layout();
        let g = Geometry::default();
        let top = l.to_point(l.field.x, l.field.y, &g);
        assert!(top.x > 0.0 && top.x < 2.0);
        assert!(top.y > 0.0 && top.y < 30.0);

        let floor = l.to_point(l.field.right() - 1, l.field.bottom() - 1, &g);
        assert!(floor.x > 98.0 && floor.x < 100.0);
        assert!(floor.y < g.height as f32 && floor.y > g.landing_line() as f32);

        let slot = l.to_point(l.slot_row.x + 1, l.slot_row.y + 1, &g);
        assert!(g.in_slot_band(slot));

        let header = l.to_point(l.field.x, l.header.y, &g);
        assert!(header.y < 0.0);
        let footer = l.to_point(l.field.x, l.footer.y, &g);
        assert!(!g.in_slot_band(footer) && footer.y > g.height as f32);
    }

    #[test]
    fn test_bands_match_point_mapping() {
        let l = layout();
        let g = Geometry::default();
        for count in [1, 4, 5, 6, 7] {
            for i in 0..count {
                let (start, end) = band(i, count, l.field.width);
                assert!(end > start, "band {i}/{count} is empty");
                for cell in start..end {
                    let p = l.to_point(l.field.x + cell, l.field.y, &g);
                    assert_eq!((p.x / 100.0 * count as f32) as usize, i, "cell {cell} of {count}");
                }
            }
            assert_eq!(band(count - 1, count, l.field.width).1, l.field.width);
        }
    }

    #[test]
    fn test_fragment_rows_round_trip() {
        let l = layout();
        let g = Geometry::default();
        for level in 0..10u32 {
            let top = g.piled_top(level * g.fragment_height);
            let (r0, r1) = l.rows(top, g.fragment_height, &g);
            for row in r0..r1 {
                let p = l.to_point(l.field.x, row, &g);
                let picked = ((g.height as f32 - p.y) / g.fragment_height as f32) as u32;
                assert_eq!(picked, level, "row {row}");
            }
        }
    }

    #[test]
    fn test_cell_round_trip() {
        let l = layout();
        let g = Geometry::default();
        let cell = Position::new(l.field.x + 10, l.field.y + 5);
        let p = l.to_point(cell.x, cell.y, &g);
        assert_eq!(l.to_cell(p, &g), cell);
    }
}
