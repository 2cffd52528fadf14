//! Session controller tests with a scripted bot.

use async_trait::async_trait;
use duotoe::{
    AiMoveError, BOT_CONFUSED, Board, GameMode, GameStatus, MoveError, MoveProvider,
    MoveSuggestion, NoticeLevel, Pacing, Player, Position, SessionController, View, get_move,
};
use duotoe_tictactoe::{Move, Round};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays canned answers, one per request.
struct ScriptedProvider {
    answers: Mutex<VecDeque<Result<i64, String>>>,
}

impl ScriptedProvider {
    fn new(answers: impl IntoIterator<Item = Result<i64, String>>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
        }
    }
}

#[async_trait]
impl MoveProvider for ScriptedProvider {
    async fn suggest(&self, _board: &Board, _symbol: Player) -> Result<MoveSuggestion, AiMoveError> {
        let next = self
            .answers
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err("script exhausted".to_string()));
        match next {
            Ok(index) => Ok(MoveSuggestion {
                best_move_index: index,
                reasoning: None,
            }),
            Err(reason) => Err(AiMoveError::Unavailable(reason)),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(7)
}

fn cell(session: &SessionController, index: usize) -> Option<Player> {
    let game = session.game().expect("game on board");
    game.board()
        .get(Position::from_index(index).expect("index in range"))
        .player()
}

#[tokio::test]
async fn test_bot_center_reply_flips_turn() {
    let provider = ScriptedProvider::new([Ok(4)]);
    let position = get_move(&provider, &Board::new(), Player::O)
        .await
        .expect("bot move");
    assert_eq!(position, Position::Center);

    let round = Round::from_board(Board::new(), Player::O);
    let (round, _) = round
        .play(Move::new(Player::O, position))
        .expect("legal move");
    assert_eq!(round.board().get(Position::Center).player(), Some(Player::O));
    assert_eq!(round.to_move(), Player::X);
}

#[tokio::test]
async fn test_bot_opens_when_human_plays_o() {
    let provider = ScriptedProvider::new([Ok(4)]);
    let mut session = SessionController::new(Pacing::none());
    session.start(GameMode::HumanVsAi, Player::O, "Ada", "ignored");

    let game = session.game().expect("game");
    assert_eq!(game.name_of(Player::X), "Bot");
    assert_eq!(game.name_of(Player::O), "Ada");

    let outcome = session.play_ai_turn(&provider, &mut rng()).await;
    assert!(outcome.is_some());
    assert_eq!(cell(&session, 4), Some(Player::X));
    assert_eq!(session.status_message(), "Ada's Turn");
    assert!(session.drain_notices().is_empty());
}

#[tokio::test]
async fn test_occupied_suggestion_uses_lowest_empty_square() {
    let provider = ScriptedProvider::new([Ok(2)]);
    let mut session = SessionController::new(Pacing::none());
    session.start(GameMode::HumanVsAi, Player::X, "Ada", "");

    session.click(Position::TopRight).expect("human move");
    session.play_ai_turn(&provider, &mut rng()).await;

    assert_eq!(cell(&session, 2), Some(Player::X));
    assert_eq!(cell(&session, 0), Some(Player::O));
    // Correction is silent.
    assert!(session.drain_notices().is_empty());
}

#[tokio::test]
async fn test_provider_failure_plays_random_move_with_notice() {
    let provider = ScriptedProvider::new([Err("network down".to_string())]);
    let mut session = SessionController::new(Pacing::none());
    session.start(GameMode::HumanVsAi, Player::X, "Ada", "");

    session.click(Position::Center).expect("human move");
    let outcome = session.play_ai_turn(&provider, &mut rng()).await;
    assert!(outcome.is_some());

    let board = *session.game().expect("game").board();
    assert_eq!(board.count(Player::X), 1);
    assert_eq!(board.count(Player::O), 1);
    assert_eq!(session.game().expect("game").to_move(), Player::X);

    let notices = session.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].message, BOT_CONFUSED);
}

#[tokio::test]
async fn test_failure_fallback_spreads_over_empty_squares() {
    let mut seen = std::collections::BTreeSet::new();
    for seed in 0..40 {
        let provider = ScriptedProvider::new([Err("offline".to_string())]);
        let mut session = SessionController::new(Pacing::none());
        session.start(GameMode::HumanVsAi, Player::X, "Ada", "");
        session.click(Position::TopLeft).expect("human move");

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        session.play_ai_turn(&provider, &mut rng).await;

        let board = *session.game().expect("game").board();
        let bot_square = Position::ALL
            .into_iter()
            .find(|pos| board.get(*pos).player() == Some(Player::O))
            .expect("bot moved");
        seen.insert(bot_square);
    }

    // Not pinned to the lowest empty square like a corrected suggestion.
    assert!(seen.len() >= 4, "fallback only used {:?}", seen);
    assert!(!seen.contains(&Position::TopLeft));
}

#[tokio::test]
async fn test_one_request_per_turn_and_clicks_blocked() {
    let mut session = SessionController::new(Pacing::none());
    session.start(GameMode::HumanVsAi, Player::O, "Ada", "");

    // Bot's turn but nothing requested yet.
    assert!(matches!(
        session.click(Position::Center),
        Err(MoveError::NotHumanTurn)
    ));

    let request = session.begin_ai_turn().expect("bot turn");
    assert!(session.begin_ai_turn().is_none());
    assert!(session.is_thinking());
    assert_eq!(session.status_message(), "Bot is thinking...");
    assert!(matches!(
        session.click(Position::Center),
        Err(MoveError::AwaitingBot)
    ));

    let provider = ScriptedProvider::new([Ok(0)]);
    let result = request.run(&provider).await;
    assert!(session.complete_ai_turn(request.ticket, result, &mut rng()).is_some());
    assert!(!session.is_thinking());

    // Duplicate delivery of the same reply is ignored.
    let again = session.complete_ai_turn(request.ticket, Ok(Position::Center), &mut rng());
    assert!(again.is_none());
    assert_eq!(cell(&session, 4), None);
}

#[tokio::test]
async fn test_reply_after_going_home_is_discarded() {
    let mut session = SessionController::new(Pacing::none());
    session.start(GameMode::HumanVsAi, Player::O, "Ada", "");
    let request = session.begin_ai_turn().expect("bot turn");

    session.go_home();
    assert_eq!(session.view(), View::Home);
    assert!(!session.is_thinking());

    let applied = session.complete_ai_turn(request.ticket, Ok(Position::Center), &mut rng());
    assert!(applied.is_none());
    assert!(session.game().is_none());
}

#[tokio::test]
async fn test_reply_from_previous_session_is_discarded() {
    let mut session = SessionController::new(Pacing::none());
    session.start(GameMode::HumanVsAi, Player::O, "Ada", "");
    let old = session.begin_ai_turn().expect("bot turn");

    session.start(GameMode::HumanVsAi, Player::O, "Ada", "");
    let applied = session.complete_ai_turn(old.ticket, Ok(Position::Center), &mut rng());
    assert!(applied.is_none());
    assert_eq!(session.game().expect("game").board().empty_positions().len(), 9);

    // The new session's own turn still works.
    let fresh = session.begin_ai_turn().expect("bot turn");
    assert_ne!(fresh.ticket, old.ticket);
}

#[test]
fn test_pvp_play_again_swaps_names_and_keeps_scores() {
    let mut session = SessionController::new(Pacing::none());
    session.start(GameMode::HumanVsHuman, Player::X, "Ada", "Grace");

    assert!(!session.play_again(), "round still in progress");

    for index in [0, 3, 1, 4, 2] {
        session
            .click(Position::from_index(index).expect("index"))
            .expect("legal move");
    }
    let game = session.game().expect("game");
    assert_eq!(game.status(), GameStatus::Won);
    assert_eq!(session.status_message(), "Game Over");
    let (headline, _) = session.round_summary().expect("summary");
    assert_eq!(headline, "Ada Wins!");

    assert!(session.play_again());
    let game = session.game().expect("game");
    assert_eq!(game.name_of(Player::X), "Grace");
    assert_eq!(game.name_of(Player::O), "Ada");
    assert_eq!(game.scores().wins(Player::X), 1);
    assert_eq!(game.status(), GameStatus::Playing);
    assert_eq!(session.status_message(), "Grace's Turn");

    let notices = session.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Success);
    assert_eq!(notices[0].message, "Swapping sides! Grace is now X.");
}

#[tokio::test]
async fn test_pvai_play_again_announces_first_player() {
    let provider = ScriptedProvider::new([Ok(3), Ok(4)]);
    let mut session = SessionController::new(Pacing::none());
    session.start(GameMode::HumanVsAi, Player::X, "Ada", "");

    // Ada takes the top row while the bot plays 3 and 4.
    session.click(Position::TopLeft).expect("move");
    session.play_ai_turn(&provider, &mut rng()).await;
    session.click(Position::TopCenter).expect("move");
    session.play_ai_turn(&provider, &mut rng()).await;
    session.click(Position::TopRight).expect("move");
    assert_eq!(session.game().expect("game").status(), GameStatus::Won);

    assert!(session.play_again());
    let notices = session.drain_notices();
    assert_eq!(notices[0].message, "Bot plays as X (First)");
    assert!(session.game().expect("game").is_ai_turn());

    // A bot win hands X back to the human.
    let provider = ScriptedProvider::new([Ok(0), Ok(1), Ok(2)]);
    session.play_ai_turn(&provider, &mut rng()).await;
    session.click(Position::MiddleLeft).expect("move");
    session.play_ai_turn(&provider, &mut rng()).await;
    session.click(Position::Center).expect("move");
    session.play_ai_turn(&provider, &mut rng()).await;
    assert_eq!(session.game().expect("game").status(), GameStatus::Won);
    assert_eq!(session.round_summary().expect("summary").0, "Bot Wins!");

    assert!(session.play_again());
    assert_eq!(session.drain_notices()[0].message, "You play as X (First)");
}

#[test]
fn test_click_without_game_is_rejected() {
    let mut session = SessionController::default();
    assert_eq!(session.view(), View::Home);
    assert!(matches!(
        session.click(Position::Center),
        Err(MoveError::NoGame)
    ));
    assert!(session.begin_ai_turn().is_none());
    assert_eq!(session.status_message(), "");
}
