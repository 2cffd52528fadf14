//! Draw detection logic for tic-tac-toe.

use super::super::{Board, Square};
use super::win::detect_winner;
use tracing::instrument;

/// Checks if the board is full (all squares occupied).
#[instrument]
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}

/// A full board with no completed line.
#[instrument]
pub fn is_draw(board: &Board) -> bool {
    is_full(board) && detect_winner(board).is_none()
}

#[cfg(test)]
mod tests {
    use super::super::super::{Player, Position};
    use super::*;

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(&Board::new()));
    }

    #[test]
    fn test_partial_board_not_full() {
        let board = Board::new().place(Position::Center, Player::X);
        assert!(!is_full(&board));
    }

    #[test]
    fn test_draw_detection() {
        // X O X / O X X / O X O
        let board = Board::from_cells([
            Some(Player::X),
            Some(Player::O),
            Some(Player::X),
            Some(Player::O),
            Some(Player::X),
            Some(Player::X),
            Some(Player::O),
            Some(Player::X),
            Some(Player::O),
        ]);
        assert!(is_full(&board));
        assert!(is_draw(&board));
    }

    #[test]
    fn test_full_board_with_winner_is_not_draw() {
        // X X X / O O X / X O O
        let board = Board::from_cells([
            Some(Player::X),
            Some(Player::X),
            Some(Player::X),
            Some(Player::O),
            Some(Player::O),
            Some(Player::X),
            Some(Player::X),
            Some(Player::O),
            Some(Player::O),
        ]);
        assert!(is_full(&board));
        assert!(!is_draw(&board));
    }
}
