//! Stateless UI rendering.

use super::app::{App, Field, SetupForm};
use crate::controller::{NoticeLevel, View};
use duotoe_tictactoe::{Board, Game, GameMode, Player, Position, Square, WinningLine};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const X_COLOR: Color = Color::Blue;
const O_COLOR: Color = Color::Red;

/// Renders the current screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(12),   // Body
            Constraint::Length(3), // Status
            Constraint::Length(1), // Help
        ])
        .split(area);

    let title = Paragraph::new("duotoe - Tic Tac Toe")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    match (app.session().view(), app.session().game()) {
        (View::Game, Some(game)) => {
            draw_game(frame, chunks[1], app, game);
            draw_status(frame, chunks[2], &app.session().status_message());
            draw_help(
                frame,
                chunks[3],
                "arrows move  enter/1-9 place  h home  q quit",
            );
            if let Some((headline, detail)) = app.session().round_summary() {
                draw_round_over(frame, area, game, &headline, &detail);
            }
        }
        _ => {
            draw_home(frame, chunks[1], app.setup(), app.provider_name());
            draw_status(frame, chunks[2], "Set up a match and press Enter");
            draw_help(
                frame,
                chunks[3],
                "tab/arrows select  left/right change  type names  enter start  esc quit",
            );
        }
    }

    if let Some(notice) = app.toast() {
        draw_toast(frame, area, &notice.message, notice.level);
    }
}

fn draw_home(frame: &mut Frame, area: Rect, setup: &SetupForm, provider: &str) {
    let form_area = center_rect(area, 48, 12);

    let mut lines = Vec::new();
    for field in setup.fields() {
        let (label, value) = match field {
            Field::Mode => ("Mode", format!("< {} >", setup.mode.label())),
            Field::Side => {
                let side = match setup.side {
                    Player::X => "X (First)",
                    Player::O => "O (Second)",
                };
                let who = match setup.mode {
                    GameMode::HumanVsAi => "You play",
                    GameMode::HumanVsHuman => "Player 1 plays",
                };
                (who, format!("< {} >", side))
            }
            Field::PlayerOne => ("Player 1", format!("[{:<16}]", setup.player_one)),
            Field::PlayerTwo => ("Player 2", format!("[{:<16}]", setup.player_two)),
        };

        let style = if *field == setup.focus {
            Style::default().fg(Color::Black).bg(Color::White)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:>15}: ", label), Style::default().fg(Color::Gray)),
            Span::styled(value, style),
        ]));
    }

    let names = setup.preview();
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled(names.x().clone(), Style::default().fg(X_COLOR)),
        Span::raw(" (X)  vs  "),
        Span::styled(names.o().clone(), Style::default().fg(O_COLOR)),
        Span::raw(" (O)"),
    ]));
    if setup.mode == GameMode::HumanVsAi {
        lines.push(Line::from(Span::styled(
            format!("Bot: {}", provider),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let form = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().title(" New Game ").borders(Borders::ALL));
    frame.render_widget(form, form_area);
}

fn draw_game(frame: &mut Frame, area: Rect, app: &App, game: &Game) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(11)])
        .split(area);

    draw_scores(frame, chunks[0], game);
    draw_board(
        frame,
        chunks[1],
        game.board(),
        app.cursor(),
        game.winning_line(),
        !game.status().is_terminal(),
    );
}

fn draw_scores(frame: &mut Frame, area: Rect, game: &Game) {
    let cards_area = center_rect(area, 60, 3);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(cards_area);

    let playing = !game.status().is_terminal();
    let scores = game.scores();

    for (col, player) in [(0, Player::X), (2, Player::O)] {
        let mut name = game.name_of(player).to_string();
        if game.ai_side() == Some(player) {
            name.push_str(" [bot]");
        }
        let color = match player {
            Player::X => X_COLOR,
            Player::O => O_COLOR,
        };
        let border = if playing && game.to_move() == player {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let card = Paragraph::new(format!("{}: {}", player, scores.wins(player)))
            .alignment(Alignment::Center)
            .style(Style::default().fg(color))
            .block(
                Block::default()
                    .title(format!(" {} ", name))
                    .borders(Borders::ALL)
                    .border_style(border),
            );
        frame.render_widget(card, cols[col]);
    }

    let draws = Paragraph::new(scores.draws().to_string())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(" Draws ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(draws, cols[1]);
}

fn draw_board(
    frame: &mut Frame,
    area: Rect,
    board: &Board,
    cursor: Position,
    winning_line: Option<WinningLine>,
    show_cursor: bool,
) {
    let board_area = center_rect(area, 38, 11);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(board_area);

    for (row, positions) in Position::ALL.chunks(3).enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(12),
                Constraint::Length(1),
                Constraint::Length(12),
                Constraint::Length(1),
                Constraint::Length(12),
            ])
            .split(rows[row * 2]);

        for (col, pos) in positions.iter().enumerate() {
            let highlighted = winning_line.is_some_and(|line| line.contains(*pos));
            let focused = show_cursor && *pos == cursor;
            draw_cell(frame, cols[col * 2], board.get(*pos), *pos, focused, highlighted);
            if col < 2 {
                draw_separator_vertical(frame, cols[col * 2 + 1]);
            }
        }
        if row < 2 {
            draw_separator(frame, rows[row * 2 + 1]);
        }
    }
}

fn draw_cell(
    frame: &mut Frame,
    area: Rect,
    square: Square,
    pos: Position,
    focused: bool,
    highlighted: bool,
) {
    let (symbol, base_style) = match square {
        Square::Empty => (
            format!("{}", pos.to_index() + 1),
            Style::default().fg(Color::DarkGray),
        ),
        Square::Occupied(Player::X) => (
            "X".to_string(),
            Style::default().fg(X_COLOR).add_modifier(Modifier::BOLD),
        ),
        Square::Occupied(Player::O) => (
            "O".to_string(),
            Style::default().fg(O_COLOR).add_modifier(Modifier::BOLD),
        ),
    };

    let style = if focused {
        base_style.bg(Color::White).fg(Color::Black)
    } else if highlighted {
        base_style.bg(Color::Green).fg(Color::Black)
    } else {
        base_style
    };

    // Vertically center the mark in the 3-line cell.
    let cell = Paragraph::new(vec![
        Line::default(),
        Line::from(Span::styled(format!(" {} ", symbol), style)),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(cell, area);
}

fn draw_separator(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new("─".repeat(area.width as usize))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn draw_separator_vertical(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new(vec![Line::from("│"); area.height as usize])
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn draw_status(frame: &mut Frame, area: Rect, status: &str) {
    let status = Paragraph::new(status.to_string())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, area);
}

fn draw_help(frame: &mut Frame, area: Rect, help: &str) {
    let help = Paragraph::new(help.to_string())
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, area);
}

fn draw_round_over(frame: &mut Frame, area: Rect, game: &Game, headline: &str, detail: &str) {
    let popup = center_rect(area, 44, 9);
    let color = match game.winning_line().map(|line| line.winner) {
        Some(Player::X) => X_COLOR,
        Some(Player::O) => O_COLOR,
        None => Color::Yellow,
    };
    let scores = game.scores();

    let lines = vec![
        Line::from(Span::styled(
            headline.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(detail.to_string()),
        Line::default(),
        Line::from(format!(
            "{} {} - {} draws - {} {}",
            game.name_of(Player::X),
            scores.wins(Player::X),
            scores.draws(),
            scores.wins(Player::O),
            game.name_of(Player::O),
        )),
        Line::default(),
        Line::from(Span::styled(
            "enter: play again   h: home   q: quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Clear, popup);
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(" Round Over ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    frame.render_widget(paragraph, popup);
}

fn draw_toast(frame: &mut Frame, area: Rect, message: &str, level: NoticeLevel) {
    let color = match level {
        NoticeLevel::Info => Color::Cyan,
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Error => Color::Red,
    };
    let width = (message.chars().count() as u16 + 4).min(area.width);
    let toast = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(5),
        width,
        height: 3.min(area.height),
    };

    frame.render_widget(Clear, toast);
    let paragraph = Paragraph::new(message.to_string())
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)));
    frame.render_widget(paragraph, toast);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vert[1])[1]
}
