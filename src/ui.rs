pub mod screen;

use std::time::Instant;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};
use unicode_width::UnicodeWidthStr;
use wordfall::{session::Field, stats::GameStats, Difficulty, Game, Language};

use crate::{ui::screen::current_screen, App};

const HORIZONTAL_MARGIN: u16 = 2;
const HIT_TEXT: &str = "-1 HP";

pub fn draw(app: &App, f: &mut Frame) {
    current_screen(app.game.phase()).render(app, f);
}

/// Map a field position to a cell of `area`; None when off the visible field
pub fn to_cell(field: &Field, area: Rect, top: f64, left: f64) -> Option<(u16, u16)> {
    if area.width == 0 || area.height == 0 {
        return None;
    }
    if !(0.0..field.height).contains(&top) || !(0.0..field.width).contains(&left) {
        return None;
    }

    let x = area.x + ((left / field.width) * area.width as f64) as u16;
    let y = area.y + ((top / field.height) * area.height as f64) as u16;
    Some((x.min(area.right() - 1), y.min(area.bottom() - 1)))
}

fn hearts(stats: &GameStats) -> String {
    (0..stats.max_hp)
        .map(|i| if i < stats.current_hp { "♥" } else { "♡" })
        .join(" ")
}

fn hud_line(game: &Game) -> Line<'static> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let stats = game.stats();

    Line::from(vec![
        Span::styled(hearts(stats), Style::default().fg(Color::Red)),
        Span::raw("   "),
        Span::styled(format!("level {}", game.level()), bold_style),
        Span::raw(format!(
            "   {} words   {:.0} wpm   {:.0}% acc",
            stats.correct_words, stats.wpm, stats.accuracy
        )),
    ])
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// The falling words and health-loss markers inside a bordered box
pub struct FieldView<'a> {
    game: &'a Game,
    now: Instant,
}

impl<'a> FieldView<'a> {
    pub fn new(game: &'a Game, now: Instant) -> Self {
        Self { game, now }
    }
}

impl Widget for FieldView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::ALL).title(format!(
            " {} / {} ",
            self.game.difficulty(),
            self.game.language()
        ));
        let inner = block.inner(area);
        block.render(area, buf);

        let field = self.game.field();
        let input = self.game.input();
        let word_style = Style::default().fg(Color::White);
        let typed_style = Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD);

        for word in self.game.falling_words() {
            let Some((x, y)) = to_cell(field, inner, word.top, word.left) else {
                continue;
            };
            let style = if !input.is_empty() && word.text.starts_with(input) {
                typed_style
            } else {
                word_style
            };
            let label = format!("{} {}", word.item.glyph(), word.text);
            buf.set_stringn(x, y, label, (inner.right() - x) as usize, style);
        }

        for marker in self.game.indicators().iter() {
            let top = marker.display_top(self.now);
            let Some((x, y)) = to_cell(field, inner, top, marker.left) else {
                continue;
            };
            let style = if marker.progress(self.now) > 0.5 {
                Style::default().fg(Color::Red).add_modifier(Modifier::DIM)
            } else {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            };
            buf.set_stringn(x, y, HIT_TEXT, (inner.right() - x) as usize, style);
        }
    }
}

pub fn render_field(app: &App, f: &mut Frame) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(3),
    ])
    .horizontal_margin(HORIZONTAL_MARGIN)
    .split(f.area());

    f.render_widget(Paragraph::new(hud_line(&app.game)), chunks[0]);
    f.render_widget(FieldView::new(&app.game, app.frame_at), chunks[1]);

    let input = app.game.input();
    let input_box = Paragraph::new(input.to_string()).block(Block::bordered().title(" type "));
    f.render_widget(input_box, chunks[2]);

    if app.game.is_playing() {
        let max_x = chunks[2].right().saturating_sub(2);
        let x = (chunks[2].x + 1).saturating_add(input.width() as u16).min(max_x);
        f.set_cursor_position((x, chunks[2].y + 1));
    }
}

pub fn render_paused(f: &mut Frame) {
    let legend = "(esc) resume / (q) give up";
    let popup = centered_rect(legend.width() as u16 + 4, 4, f.area());

    let text = vec![
        Line::from(Span::styled(
            "PAUSED",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            legend,
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ];

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::bordered()),
        popup,
    );
}

pub fn render_menu(app: &App, f: &mut Frame) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let selected_style = Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let mut lines = vec![
        Line::from(Span::styled("wordfall", bold_style)),
        Line::from(""),
    ];

    for difficulty in Difficulty::ALL {
        let cfg = difficulty.config();
        let detail = format!(
            "speed {:.1}, a word every {:.1}s, up to {} at once",
            cfg.initial_speed,
            cfg.spawn_interval_ms as f64 / 1000.0,
            cfg.max_words_on_screen
        );
        let line = if difficulty == app.menu.difficulty {
            Line::from(vec![
                Span::styled(format!("> {:<8}", difficulty.to_string()), selected_style),
                Span::styled(detail, dim_style),
            ])
        } else {
            Line::from(vec![
                Span::raw(format!("  {:<8}", difficulty.to_string())),
                Span::styled(detail, dim_style),
            ])
        };
        lines.push(line);
    }

    lines.push(Line::from(""));
    lines.push(Line::from(
        Language::ALL
            .iter()
            .map(|language| {
                if *language == app.menu.language {
                    Span::styled(format!("[{language}]"), selected_style)
                } else {
                    Span::styled(format!(" {language} "), dim_style)
                }
            })
            .collect::<Vec<_>>(),
    ));

    let height = lines.len() as u16 + 2;
    let chunks = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(height),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .horizontal_margin(HORIZONTAL_MARGIN)
    .split(f.area());

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), chunks[1]);
    f.render_widget(
        Paragraph::new(Span::styled(
            "(↑/↓) difficulty / (←/→) language / (enter) start / (esc)ape",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        chunks[3],
    );
}

pub fn render_results(app: &App, f: &mut Frame) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let stats = app.game.stats();

    let lines = vec![
        Line::from(Span::styled(
            "Game Over",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} wpm   {:.0}% acc   level {}",
                stats.wpm.round(),
                stats.accuracy,
                app.game.level()
            ),
            bold_style,
        )),
        Line::from(format!(
            "{} typed   {} missed   {} characters",
            stats.correct_words, stats.incorrect_words, stats.total_typed_characters
        )),
        Line::from(Span::styled(
            format!("{} / {}", app.game.difficulty(), app.game.language()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let chunks = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(lines.len() as u16),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .horizontal_margin(HORIZONTAL_MARGIN)
    .split(f.area());

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), chunks[1]);
    f.render_widget(
        Paragraph::new(Span::styled(
            "(enter) menu / (r)etry / (esc)ape",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        chunks[3],
    );
}
