//! Tests for the game state machine.

use duotoe_tictactoe::{
    Board, Game, GameMode, GameStatus, MoveError, MoveOutcome, Player, PlayerNames, Position,
    Round, Scores, SessionConfig,
};

fn pvp() -> SessionConfig {
    SessionConfig::new(
        GameMode::HumanVsHuman,
        Player::X,
        PlayerNames::new("Bob", "Alice"),
    )
}

fn play_all(game: &mut Game, moves: &[usize]) -> MoveOutcome {
    let mut last = MoveOutcome::Continue;
    for &idx in moves {
        let pos = Position::from_index(idx).expect("index in range");
        last = game
            .apply_move(pos, game.to_move())
            .unwrap_or_else(|e| panic!("move {} rejected: {}", idx, e));
    }
    last
}

#[test]
fn test_x_completes_top_row() {
    // [X, X, _, _, O, _, _, _, O] with X to move at index 2.
    let board = Board::from_cells([
        Some(Player::X),
        Some(Player::X),
        None,
        None,
        Some(Player::O),
        None,
        None,
        None,
        Some(Player::O),
    ]);
    let round = Round::from_board(board, Player::X);
    let (round, outcome) = round
        .play(duotoe_tictactoe::Move::new(Player::X, Position::TopRight))
        .expect("legal move");

    assert_eq!(round.status(), GameStatus::Won);
    assert_eq!(round.winner(), Some(Player::X));
    match outcome {
        MoveOutcome::Won(line) => assert_eq!(line.indices(), [0, 1, 2]),
        other => panic!("expected a win, got {:?}", other),
    }
}

#[test]
fn test_win_increments_only_winner_score() {
    let mut game = Game::new(pvp());
    let outcome = play_all(&mut game, &[0, 4, 1, 8, 2]);

    assert!(matches!(outcome, MoveOutcome::Won(_)));
    assert_eq!(game.status(), GameStatus::Won);
    assert_eq!(game.winning_line().map(|l| l.winner), Some(Player::X));
    assert_eq!(*game.scores().x(), 1);
    assert_eq!(*game.scores().o(), 0);
    assert_eq!(*game.scores().draws(), 0);
}

#[test]
fn test_full_board_without_line_is_draw() {
    let mut game = Game::new(pvp());
    let outcome = play_all(&mut game, &[0, 4, 2, 1, 3, 5, 7, 6, 8]);

    assert_eq!(outcome, MoveOutcome::Draw);
    assert_eq!(game.status(), GameStatus::Draw);
    assert_eq!(game.winning_line(), None);
    assert_eq!(*game.scores().draws(), 1);
    assert_eq!(game.scores().rounds(), 1);
}

#[test]
fn test_occupied_square_is_noop() {
    let mut game = Game::new(pvp());
    play_all(&mut game, &[4]);
    let before = game.clone();

    let result = game.apply_move(Position::Center, Player::O);

    assert_eq!(result, Err(MoveError::SquareOccupied(Position::Center)));
    assert_eq!(game, before);
}

#[test]
fn test_moves_after_game_over_are_noop() {
    let mut game = Game::new(pvp());
    play_all(&mut game, &[0, 4, 1, 8, 2]);
    let before = game.clone();

    let result = game.apply_move(Position::BottomLeft, Player::O);

    assert_eq!(result, Err(MoveError::GameOver));
    assert_eq!(game, before);
}

#[test]
fn test_wrong_turn_is_noop() {
    let mut game = Game::new(pvp());
    let before = game.clone();

    assert_eq!(
        game.apply_move(Position::Center, Player::O),
        Err(MoveError::WrongPlayer(Player::O))
    );
    assert_eq!(game, before);
}

#[test]
fn test_reset_keeps_scores() {
    let mut game = Game::new(pvp());
    play_all(&mut game, &[0, 4, 1, 8, 2]);

    game.reset();

    assert_eq!(game.status(), GameStatus::Playing);
    assert_eq!(game.to_move(), Player::X);
    assert_eq!(*game.board(), Board::new());
    assert_eq!(game.winning_line(), None);
    assert_eq!(*game.scores().x(), 1);
}

#[test]
fn test_start_session_zeroes_scores() {
    let mut game = Game::new(pvp());
    play_all(&mut game, &[0, 4, 1, 8, 2]);

    let config = SessionConfig::new(
        GameMode::HumanVsAi,
        Player::O,
        PlayerNames::new("Bot", "Carol"),
    );
    game.start_session(config.clone());

    assert_eq!(*game.scores(), Scores::new());
    assert_eq!(game.config(), &config);
    assert_eq!(game.status(), GameStatus::Playing);
    assert_eq!(game.ai_side(), Some(Player::X));
    assert!(game.is_ai_turn());
}

#[test]
fn test_swap_sides_keeps_names_with_people() {
    let mut game = Game::new(pvp());
    play_all(&mut game, &[0, 4, 1, 8, 2]);

    game.swap_sides_for_next_round();

    assert_eq!(*game.config().human_side(), Player::O);
    assert_eq!(game.name_of(Player::X), "Alice");
    assert_eq!(game.name_of(Player::O), "Bob");
    assert_eq!(game.to_move(), Player::X);
    assert_eq!(game.status(), GameStatus::Playing);
    assert_eq!(*game.scores().x(), 1);
}

#[test]
fn test_swap_sides_twice_restores_names() {
    let mut game = Game::new(pvp());
    let original = game.names().clone();

    game.swap_sides_for_next_round();
    assert_ne!(game.names(), &original);
    game.swap_sides_for_next_round();

    assert_eq!(game.names(), &original);
    assert_eq!(*game.config().human_side(), Player::X);
}

#[test]
fn test_ai_turn_follows_side_assignment() {
    let config = SessionConfig::new(
        GameMode::HumanVsAi,
        Player::X,
        PlayerNames::new("Dana", "Bot"),
    );
    let mut game = Game::new(config);
    assert!(!game.is_ai_turn());

    game.apply_move(Position::Center, Player::X).unwrap();
    assert!(game.is_ai_turn());

    game.apply_move(Position::TopLeft, Player::O).unwrap();
    assert!(!game.is_ai_turn());
}
