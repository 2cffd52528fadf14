//! Application state and key handling.

use super::input::move_cursor;
use crate::ai_move::AiMoveError;
use crate::controller::{AiTicket, Notice, Pacing, SessionController, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use duotoe_tictactoe::{GameMode, Player, PlayerNames, Position};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// How long a notice stays on screen.
const TOAST_TTL: Duration = Duration::from_secs(3);

/// Longest name accepted by the setup form.
const MAX_NAME_LEN: usize = 16;

/// Whether the event loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Focusable fields on the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Mode,
    Side,
    PlayerOne,
    PlayerTwo,
}

/// Home-screen form state.
#[derive(Debug, Clone)]
pub struct SetupForm {
    pub mode: GameMode,
    pub side: Player,
    pub player_one: String,
    pub player_two: String,
    pub focus: Field,
}

impl SetupForm {
    fn new() -> Self {
        Self {
            mode: GameMode::HumanVsAi,
            side: Player::X,
            player_one: String::new(),
            player_two: String::new(),
            focus: Field::Mode,
        }
    }

    /// Fields shown for the current mode, top to bottom.
    pub fn fields(&self) -> &'static [Field] {
        match self.mode {
            GameMode::HumanVsAi => &[Field::Mode, Field::Side, Field::PlayerOne],
            GameMode::HumanVsHuman => &[Field::Mode, Field::Side, Field::PlayerOne, Field::PlayerTwo],
        }
    }

    /// Names as they would be assigned if the session started now.
    pub fn preview(&self) -> PlayerNames {
        PlayerNames::resolve(self.mode, self.side, &self.player_one, &self.player_two)
    }

    fn cycle_focus(&mut self, forward: bool) {
        let fields = self.fields();
        let current = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % fields.len()
        } else {
            (current + fields.len() - 1) % fields.len()
        };
        self.focus = fields[next];
    }

    fn toggle_focused(&mut self) {
        match self.focus {
            Field::Mode => {
                self.mode = self.mode.toggle();
                if !self.fields().contains(&self.focus) {
                    self.focus = Field::Mode;
                }
            }
            Field::Side => self.side = self.side.opponent(),
            Field::PlayerOne | Field::PlayerTwo => {}
        }
    }

    fn focused_name(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::PlayerOne => Some(&mut self.player_one),
            Field::PlayerTwo => Some(&mut self.player_two),
            Field::Mode | Field::Side => None,
        }
    }
}

/// Main application state.
pub struct App {
    session: SessionController,
    setup: SetupForm,
    cursor: Position,
    toast: Option<(Notice, Instant)>,
    provider_name: String,
    rng: StdRng,
}

impl App {
    /// Creates the app on the home screen.
    pub fn new(pacing: Pacing, provider_name: impl Into<String>) -> Self {
        Self {
            session: SessionController::new(pacing),
            setup: SetupForm::new(),
            cursor: Position::Center,
            toast: None,
            provider_name: provider_name.into(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionController {
        &mut self.session
    }

    pub fn setup(&self) -> &SetupForm {
        &self.setup
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    /// The notice currently on screen, if any.
    pub fn toast(&self) -> Option<&Notice> {
        self.toast.as_ref().map(|(notice, _)| notice)
    }

    /// Feeds a finished bot request back into the session.
    pub fn complete_ai_turn(&mut self, ticket: AiTicket, result: Result<Position, AiMoveError>) {
        if let Some(outcome) = self.session.complete_ai_turn(ticket, result, &mut self.rng) {
            debug!(?outcome, "Bot turn applied");
        }
    }

    /// Expires the current toast and promotes the next queued notice.
    pub fn tick(&mut self) {
        if let Some((_, shown_at)) = &self.toast
            && shown_at.elapsed() >= TOAST_TTL
        {
            self.toast = None;
        }
        // Only the newest notice is worth showing.
        if let Some(notice) = self.session.drain_notices().pop() {
            self.toast = Some((notice, Instant::now()));
        }
    }

    /// Handles one key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Flow::Quit;
        }
        match self.session.view() {
            View::Home => self.handle_home_key(key.code),
            View::Game => self.handle_game_key(key.code),
        }
    }

    fn handle_home_key(&mut self, code: KeyCode) -> Flow {
        match code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Enter => self.start_session(),
            KeyCode::Tab | KeyCode::Down => self.setup.cycle_focus(true),
            KeyCode::BackTab | KeyCode::Up => self.setup.cycle_focus(false),
            KeyCode::Left | KeyCode::Right => self.setup.toggle_focused(),
            KeyCode::Backspace => {
                if let Some(name) = self.setup.focused_name() {
                    name.pop();
                }
            }
            KeyCode::Char(c) => match self.setup.focus {
                Field::PlayerOne | Field::PlayerTwo => {
                    if let Some(name) = self.setup.focused_name()
                        && name.chars().count() < MAX_NAME_LEN
                    {
                        name.push(c);
                    }
                }
                Field::Mode | Field::Side if c == ' ' => self.setup.toggle_focused(),
                Field::Mode | Field::Side if c == 'q' => return Flow::Quit,
                Field::Mode | Field::Side => {}
            },
            _ => {}
        }
        Flow::Continue
    }

    fn handle_game_key(&mut self, code: KeyCode) -> Flow {
        let finished = self
            .session
            .game()
            .is_some_and(|game| game.status().is_terminal());

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('h') => {
                self.session.go_home();
                self.toast = None;
            }
            KeyCode::Enter | KeyCode::Char('r') if finished => {
                self.session.play_again();
                self.cursor = Position::Center;
            }
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                self.cursor = move_cursor(self.cursor, code);
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.click(self.cursor),
            KeyCode::Char(c) => {
                if let Some(position) = c.to_digit(10).and_then(Position::from_key) {
                    self.cursor = position;
                    self.click(position);
                }
            }
            _ => {}
        }
        Flow::Continue
    }

    fn start_session(&mut self) {
        let setup = &self.setup;
        info!(mode = ?setup.mode, side = %setup.side, "Starting session from setup");
        self.session
            .start(setup.mode, setup.side, &setup.player_one, &setup.player_two);
        self.cursor = Position::Center;
        self.toast = None;
    }

    fn click(&mut self, position: Position) {
        if let Err(e) = self.session.click(position) {
            debug!(error = %e, %position, "Click ignored");
        }
    }
}
