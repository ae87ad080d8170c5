//! Checkers rule engine
//!
//! House rule: men capture in every diagonal direction, not only forward.
//! Simple moves stay forward-only for men.

use crate::board::{Square, BOARD_SIZE, DIAGONALS};
use crate::error::{GameError, Result};
use crate::game::GameStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Players per game
pub const MAX_PLAYERS: usize = 2;

/// Pieces each player starts with
pub const PIECES_PER_PLAYER: usize = 12;

/// Rows of pieces each player starts with
const STARTING_ROWS: i8 = 3;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckersColor {
    White,
    Black,
}

impl CheckersColor {
    pub fn opponent(self) -> Self {
        match self {
            CheckersColor::White => CheckersColor::Black,
            CheckersColor::Black => CheckersColor::White,
        }
    }

    /// Row delta of a forward step
    pub fn forward(self) -> i8 {
        match self {
            CheckersColor::White => -1,
            CheckersColor::Black => 1,
        }
    }

    /// Row on which men of this color are crowned
    pub fn promotion_row(self) -> i8 {
        match self {
            CheckersColor::White => 0,
            CheckersColor::Black => BOARD_SIZE - 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CheckersColor::White => "white",
            CheckersColor::Black => "black",
        }
    }

    fn first_home_row(self) -> i8 {
        match self {
            CheckersColor::White => BOARD_SIZE - STARTING_ROWS,
            CheckersColor::Black => 0,
        }
    }
}

/// A seated player
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckersPlayer {
    pub id: String,
    pub name: String,
    pub color: CheckersColor,
}

/// A piece on the board
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckersPiece {
    pub id: String,
    pub player_id: String,
    pub color: CheckersColor,
    pub is_king: bool,
    pub position: Square,
}

/// A requested move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckersMove {
    pub from: Square,
    pub to: Square,
}

impl CheckersMove {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

/// Pending multi-capture: only this piece may move, and only by capturing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureChain {
    pub piece_id: String,
    pub position: Square,
}

/// Result of an accepted move
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckersOutcome {
    pub captured: Option<Square>,
    pub promoted: bool,
    pub continue_capture: bool,
    pub game_over: bool,
    pub winner: Option<String>,
}

/// Piece placement for custom setups
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub color: CheckersColor,
    pub square: Square,
    pub is_king: bool,
}

impl Placement {
    pub fn man(color: CheckersColor, row: i8, col: i8) -> Self {
        Self { color, square: Square::new(row, col), is_king: false }
    }

    pub fn king(color: CheckersColor, row: i8, col: i8) -> Self {
        Self { color, square: Square::new(row, col), is_king: true }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MoveKind {
    Simple,
    Capture { captured: Square },
}

// ============================================================================
// BOARD
// ============================================================================

/// 8x8 grid; the single owner of every checkers piece
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    squares: [[Option<CheckersPiece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self {
            squares: std::array::from_fn(|_| std::array::from_fn(|_| None)),
        }
    }
}

impl Board {
    /// Piece on a square (None for empty or off-board squares)
    pub fn get(&self, square: Square) -> Option<&CheckersPiece> {
        if !square.is_valid() {
            return None;
        }
        self.squares[square.row as usize][square.col as usize].as_ref()
    }

    pub fn is_empty(&self, square: Square) -> bool {
        square.is_valid() && self.get(square).is_none()
    }

    fn slot_mut(&mut self, square: Square) -> Option<&mut Option<CheckersPiece>> {
        if !square.is_valid() {
            return None;
        }
        Some(&mut self.squares[square.row as usize][square.col as usize])
    }

    fn place(&mut self, mut piece: CheckersPiece, square: Square) {
        piece.position = square;
        if let Some(slot) = self.slot_mut(square) {
            *slot = Some(piece);
        }
    }

    fn take(&mut self, square: Square) -> Option<CheckersPiece> {
        self.slot_mut(square).and_then(Option::take)
    }

    fn relocate(&mut self, from: Square, to: Square) {
        if let Some(piece) = self.take(from) {
            self.place(piece, to);
        }
    }

    /// Iterate pieces, row by row
    pub fn pieces(&self) -> impl Iterator<Item = &CheckersPiece> + '_ {
        self.squares.iter().flatten().flatten()
    }

    /// Iterate one player's pieces
    pub fn pieces_of<'a>(&'a self, player_id: &'a str) -> impl Iterator<Item = &'a CheckersPiece> + 'a {
        self.pieces().filter(move |p| p.player_id == player_id)
    }

    pub fn count_of(&self, player_id: &str) -> usize {
        self.pieces_of(player_id).count()
    }

    fn remove_player(&mut self, player_id: &str) {
        for slot in self.squares.iter_mut().flatten() {
            if slot.as_ref().is_some_and(|p| p.player_id == player_id) {
                *slot = None;
            }
        }
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// One checkers game
#[derive(Clone, Debug)]
pub struct CheckersGame {
    id: String,
    board: Board,
    players: Vec<CheckersPlayer>,
    current_player: Option<String>,
    winner: Option<String>,
    status: GameStatus,
    capture_chain: Option<CaptureChain>,
}

/// Serializable view of a checkers game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckersSnapshot {
    pub id: String,
    pub board: Board,
    pub players: Vec<CheckersPlayer>,
    pub pieces: BTreeMap<String, Vec<CheckersPiece>>,
    pub current_player: Option<String>,
    pub winner: Option<String>,
    pub status: GameStatus,
    pub capture_chain: Option<CaptureChain>,
}

impl CheckersGame {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Empty game waiting for two players
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            board: Board::default(),
            players: Vec::with_capacity(MAX_PLAYERS),
            current_player: None,
            winner: None,
            status: GameStatus::Waiting,
            capture_chain: None,
        }
    }

    /// Game in progress from explicit placements
    ///
    /// Players are given as `(id, name)`; `to_move` chooses who plays first.
    pub fn from_setup(
        id: impl Into<String>,
        white: (&str, &str),
        black: (&str, &str),
        placements: &[Placement],
        to_move: CheckersColor,
    ) -> Result<Self> {
        let mut game = Self::new(id);
        for ((player_id, name), color) in [(white, CheckersColor::White), (black, CheckersColor::Black)] {
            game.players.push(CheckersPlayer {
                id: player_id.to_string(),
                name: name.to_string(),
                color,
            });
        }

        let mut counters = [0usize; 2];
        for placement in placements {
            if !placement.square.is_valid() || !placement.square.is_dark() {
                return Err(GameError::PreconditionError(format!(
                    "pieces must sit on dark squares, got {:?}",
                    placement.square
                )));
            }
            if game.board.get(placement.square).is_some() {
                return Err(GameError::PreconditionError(format!(
                    "square {:?} is occupied twice",
                    placement.square
                )));
            }
            let seat = placement.color as usize;
            let player_id = game.players[seat].id.clone();
            if counters[seat] >= PIECES_PER_PLAYER {
                return Err(GameError::PreconditionError(format!(
                    "{} has more than {} pieces",
                    player_id, PIECES_PER_PLAYER
                )));
            }
            let piece = CheckersPiece {
                id: format!("{}_{}", player_id, counters[seat]),
                player_id,
                color: placement.color,
                is_king: placement.is_king,
                position: placement.square,
            };
            counters[seat] += 1;
            game.board.place(piece, placement.square);
        }

        game.status = GameStatus::Playing;
        game.current_player = game.player_with(to_move).map(|p| p.id.clone());
        Ok(game)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[CheckersPlayer] {
        &self.players
    }

    pub fn current_player(&self) -> Option<&str> {
        self.current_player.as_deref()
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    pub fn capture_chain(&self) -> Option<&CaptureChain> {
        self.capture_chain.as_ref()
    }

    pub fn is_player_turn(&self, player_id: &str) -> bool {
        self.current_player.as_deref() == Some(player_id)
    }

    /// Seated player with the given color
    pub fn player_with(&self, color: CheckersColor) -> Option<&CheckersPlayer> {
        self.players.iter().find(|p| p.color == color)
    }

    pub fn player(&self, player_id: &str) -> Option<&CheckersPlayer> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// Open seat and nobody has started playing yet
    pub fn is_joinable(&self) -> bool {
        self.status == GameStatus::Waiting && self.players.len() < MAX_PLAYERS
    }

    // ========================================================================
    // LOBBY
    // ========================================================================

    /// Seat a player on the free color and lay out their twelve men
    pub fn add_player(&mut self, id: &str, name: &str) -> Result<&CheckersPlayer> {
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::CapacityError { max: MAX_PLAYERS });
        }
        if self.status != GameStatus::Waiting {
            return Err(GameError::GameClosed);
        }
        if self.player(id).is_some() {
            return Err(GameError::AlreadyInGame(id.to_string()));
        }

        let color = if self.player_with(CheckersColor::White).is_none() {
            CheckersColor::White
        } else {
            CheckersColor::Black
        };

        let first_row = color.first_home_row();
        let mut index = 0;
        for row in first_row..first_row + STARTING_ROWS {
            for col in 0..BOARD_SIZE {
                let square = Square::new(row, col);
                if square.is_dark() {
                    let piece = CheckersPiece {
                        id: format!("{}_{}", id, index),
                        player_id: id.to_string(),
                        color,
                        is_king: false,
                        position: square,
                    };
                    self.board.place(piece, square);
                    index += 1;
                }
            }
        }

        self.players.push(CheckersPlayer {
            id: id.to_string(),
            name: name.to_string(),
            color,
        });
        Ok(&self.players[self.players.len() - 1])
    }

    /// Begin play; white moves first
    pub fn start_game(&mut self) -> Result<()> {
        if self.players.len() != MAX_PLAYERS {
            return Err(GameError::PreconditionError(
                "two players are required to start".to_string(),
            ));
        }
        if self.status != GameStatus::Waiting {
            return Err(GameError::PreconditionError(
                "game has already started".to_string(),
            ));
        }
        self.status = GameStatus::Playing;
        self.current_player = self.player_with(CheckersColor::White).map(|p| p.id.clone());
        Ok(())
    }

    /// Abandonment: the remaining player wins a game in progress
    ///
    /// Returns false if the player was not seated.
    pub fn remove_player(&mut self, player_id: &str) -> bool {
        let Some(index) = self.players.iter().position(|p| p.id == player_id) else {
            return false;
        };
        self.players.remove(index);
        self.board.remove_player(player_id);

        if self.status == GameStatus::Playing && self.players.len() == 1 {
            let survivor = self.players[0].id.clone();
            self.finish(survivor);
        }
        true
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// Classify a move of `piece` to `to` without the mandatory-capture rule
    fn geometry(&self, piece: &CheckersPiece, to: Square) -> Result<MoveKind> {
        let from = piece.position;
        if !to.is_valid() {
            return Err(GameError::illegal("destination is off the board"));
        }
        let distance = from
            .diagonal_distance(to)
            .ok_or_else(|| GameError::illegal("moves must be diagonal"))?;
        if self.board.get(to).is_some() {
            return Err(GameError::illegal("destination is occupied"));
        }

        match distance {
            1 => {
                if !piece.is_king && to.row - from.row != piece.color.forward() {
                    return Err(GameError::illegal("men move forward only"));
                }
                Ok(MoveKind::Simple)
            }
            2 => {
                let captured = from
                    .midpoint(to)
                    .ok_or_else(|| GameError::illegal("moves must be diagonal"))?;
                match self.board.get(captured) {
                    Some(victim) if victim.player_id != piece.player_id => {
                        Ok(MoveKind::Capture { captured })
                    }
                    _ => Err(GameError::illegal("no opposing piece to jump")),
                }
            }
            _ => Err(GameError::illegal("pieces move one or two diagonal squares")),
        }
    }

    /// Full legality check for a move by `piece`
    fn classify(&self, piece: &CheckersPiece, to: Square) -> Result<MoveKind> {
        let kind = self.geometry(piece, to)?;
        if kind == MoveKind::Simple && self.has_captures(&piece.player_id) {
            return Err(GameError::MandatoryCapture);
        }
        Ok(kind)
    }

    /// Landing squares of every capture available to `piece`
    pub fn capture_targets(&self, piece: &CheckersPiece) -> Vec<Square> {
        DIAGONALS
            .iter()
            .map(|&(dr, dc)| piece.position.offset(2 * dr, 2 * dc))
            .filter(|&to| matches!(self.geometry(piece, to), Ok(MoveKind::Capture { .. })))
            .collect()
    }

    /// Whether any of the player's pieces can capture
    pub fn has_captures(&self, player_id: &str) -> bool {
        self.board
            .pieces_of(player_id)
            .any(|piece| !self.capture_targets(piece).is_empty())
    }

    fn simple_targets(&self, piece: &CheckersPiece) -> Vec<Square> {
        DIAGONALS
            .iter()
            .map(|&(dr, dc)| piece.position.offset(dr, dc))
            .filter(|&to| self.geometry(piece, to) == Ok(MoveKind::Simple))
            .collect()
    }

    /// Every legal move for a player, honouring capture chains and mandatory capture
    pub fn legal_moves(&self, player_id: &str) -> Vec<CheckersMove> {
        if let Some(chain) = &self.capture_chain {
            return match self.board.get(chain.position) {
                Some(piece) if piece.player_id == player_id => self
                    .capture_targets(piece)
                    .into_iter()
                    .map(|to| CheckersMove::new(chain.position, to))
                    .collect(),
                _ => vec![],
            };
        }

        let captures: Vec<CheckersMove> = self
            .board
            .pieces_of(player_id)
            .flat_map(|piece| {
                self.capture_targets(piece)
                    .into_iter()
                    .map(move |to| CheckersMove::new(piece.position, to))
            })
            .collect();
        if !captures.is_empty() {
            return captures;
        }

        self.board
            .pieces_of(player_id)
            .flat_map(|piece| {
                self.simple_targets(piece)
                    .into_iter()
                    .map(move |to| CheckersMove::new(piece.position, to))
            })
            .collect()
    }

    // ========================================================================
    // APPLY MOVE
    // ========================================================================

    /// Validate and apply a move for `player_id`
    pub fn make_move(&mut self, player_id: &str, mv: CheckersMove) -> Result<CheckersOutcome> {
        if self.status != GameStatus::Playing {
            return Err(GameError::NotPlaying);
        }
        if !self.is_player_turn(player_id) {
            return Err(GameError::NotYourTurn);
        }

        let piece = match self.board.get(mv.from) {
            Some(piece) if piece.player_id == player_id => piece.clone(),
            _ => return Err(GameError::IllegalPiece),
        };

        if let Some(chain) = &self.capture_chain {
            if chain.piece_id != piece.id || !self.capture_targets(&piece).contains(&mv.to) {
                return Err(GameError::MustContinueCapture);
            }
        }

        let kind = self.classify(&piece, mv.to)?;

        // Validation complete; mutate from here on
        let captured = match kind {
            MoveKind::Capture { captured } => {
                self.board.take(captured);
                Some(captured)
            }
            MoveKind::Simple => None,
        };
        self.board.relocate(mv.from, mv.to);
        let promoted = self.promote_if_due(mv.to);

        self.capture_chain = None;
        if captured.is_some() {
            if let Some(mover) = self.board.get(mv.to) {
                if !self.capture_targets(mover).is_empty() {
                    self.capture_chain = Some(CaptureChain {
                        piece_id: mover.id.clone(),
                        position: mv.to,
                    });
                }
            }
        }

        let continue_capture = self.capture_chain.is_some();
        if !continue_capture {
            self.switch_player();
        }

        let mut outcome = CheckersOutcome {
            captured,
            promoted,
            continue_capture,
            ..Default::default()
        };

        if let Some(winner) = self.detect_winner() {
            self.finish(winner.clone());
            outcome.continue_capture = false;
            outcome.game_over = true;
            outcome.winner = Some(winner);
        }

        Ok(outcome)
    }

    fn promote_if_due(&mut self, square: Square) -> bool {
        let Some(Some(piece)) = self.board.slot_mut(square) else {
            return false;
        };
        if !piece.is_king && square.row == piece.color.promotion_row() {
            piece.is_king = true;
            return true;
        }
        false
    }

    fn switch_player(&mut self) {
        let next = self
            .players
            .iter()
            .find(|p| Some(p.id.as_str()) != self.current_player.as_deref())
            .map(|p| p.id.clone());
        if next.is_some() {
            self.current_player = next;
        }
    }

    /// Winner if a player ran out of pieces or the player to move is stuck
    fn detect_winner(&self) -> Option<String> {
        for player in &self.players {
            if self.board.count_of(&player.id) == 0 {
                return self.opponent_of(&player.id);
            }
        }

        let current = self.current_player.as_deref()?;
        if self.legal_moves(current).is_empty() {
            return self.opponent_of(current);
        }
        None
    }

    fn opponent_of(&self, player_id: &str) -> Option<String> {
        self.players
            .iter()
            .find(|p| p.id != player_id)
            .map(|p| p.id.clone())
    }

    fn finish(&mut self, winner: String) {
        self.status = GameStatus::Finished;
        self.winner = Some(winner);
        self.capture_chain = None;
    }

    // ========================================================================
    // SNAPSHOT
    // ========================================================================

    pub fn snapshot(&self) -> CheckersSnapshot {
        let pieces = self
            .players
            .iter()
            .map(|p| (p.id.clone(), self.board.pieces_of(&p.id).cloned().collect()))
            .collect();

        CheckersSnapshot {
            id: self.id.clone(),
            board: self.board.clone(),
            players: self.players.clone(),
            pieces,
            current_player: self.current_player.clone(),
            winner: self.winner.clone(),
            status: self.status,
            capture_chain: self.capture_chain.clone(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use CheckersColor::{Black, White};

    fn started_game() -> CheckersGame {
        let mut game = CheckersGame::new("g1");
        game.add_player("alice", "Alice").unwrap();
        game.add_player("bob", "Bob").unwrap();
        game.start_game().unwrap();
        game
    }

    fn setup(placements: &[Placement], to_move: CheckersColor) -> CheckersGame {
        CheckersGame::from_setup("g1", ("alice", "Alice"), ("bob", "Bob"), placements, to_move).unwrap()
    }

    fn mv(from: (i8, i8), to: (i8, i8)) -> CheckersMove {
        CheckersMove::new(Square::new(from.0, from.1), Square::new(to.0, to.1))
    }

    #[test]
    fn test_initial_layout() {
        let game = started_game();
        assert_eq!(game.board().count_of("alice"), PIECES_PER_PLAYER);
        assert_eq!(game.board().count_of("bob"), PIECES_PER_PLAYER);
        assert!(game.board().pieces().all(|p| p.position.is_dark()));
        assert!(game.board().pieces_of("alice").all(|p| p.position.row >= 5));
        assert!(game.board().pieces_of("bob").all(|p| p.position.row <= 2));
        assert_eq!(game.current_player(), Some("alice"));
        assert_eq!(game.player("bob").unwrap().color, Black);
    }

    #[test]
    fn test_third_player_rejected() {
        let mut game = started_game();
        assert_eq!(
            game.add_player("carol", "Carol").unwrap_err(),
            GameError::CapacityError { max: 2 }
        );
    }

    #[test]
    fn test_start_requires_two_players() {
        let mut game = CheckersGame::new("g1");
        game.add_player("alice", "Alice").unwrap();
        assert!(matches!(game.start_game(), Err(GameError::PreconditionError(_))));
        assert_eq!(game.status(), GameStatus::Waiting);
    }

    #[test]
    fn test_simple_move_switches_turn() {
        let mut game = started_game();
        let outcome = game.make_move("alice", mv((5, 0), (4, 1))).unwrap();
        assert!(!outcome.continue_capture);
        assert!(!outcome.game_over);
        assert_eq!(game.current_player(), Some("bob"));
        assert!(game.board().get(Square::new(4, 1)).is_some());
        assert!(game.board().get(Square::new(5, 0)).is_none());
    }

    #[test]
    fn test_rejections_leave_state_untouched() {
        let mut game = started_game();
        let before = game.snapshot();

        assert_eq!(game.make_move("bob", mv((2, 1), (3, 0))), Err(GameError::NotYourTurn));
        assert_eq!(game.make_move("alice", mv((4, 1), (3, 2))), Err(GameError::IllegalPiece));
        assert_eq!(game.make_move("alice", mv((2, 1), (3, 0))), Err(GameError::IllegalPiece));
        assert!(matches!(game.make_move("alice", mv((5, 0), (4, 0))), Err(GameError::IllegalMove(_))));
        assert!(matches!(game.make_move("alice", mv((5, 0), (3, 2))), Err(GameError::IllegalMove(_))));
        assert!(matches!(game.make_move("alice", mv((5, 0), (6, -1))), Err(GameError::IllegalMove(_))));

        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_men_cannot_step_backward() {
        let mut game = setup(
            &[Placement::man(White, 4, 3), Placement::man(Black, 0, 1)],
            White,
        );
        assert!(matches!(game.make_move("alice", mv((4, 3), (5, 4))), Err(GameError::IllegalMove(_))));
        assert!(game.make_move("alice", mv((4, 3), (3, 4))).is_ok());
    }

    #[test]
    fn test_kings_step_backward() {
        let mut game = setup(
            &[Placement::king(White, 4, 3), Placement::man(Black, 0, 1)],
            White,
        );
        assert!(game.make_move("alice", mv((4, 3), (5, 4))).is_ok());
    }

    #[test]
    fn test_mandatory_capture_blocks_simple_moves() {
        let mut game = setup(
            &[
                Placement::man(White, 5, 2),
                Placement::man(White, 6, 7),
                Placement::man(Black, 4, 3),
                Placement::man(Black, 0, 1),
            ],
            White,
        );
        assert!(game.has_captures("alice"));
        assert_eq!(game.make_move("alice", mv((6, 7), (5, 6))), Err(GameError::MandatoryCapture));
        assert_eq!(game.legal_moves("alice"), vec![mv((5, 2), (3, 4))]);

        let outcome = game.make_move("alice", mv((5, 2), (3, 4))).unwrap();
        assert_eq!(outcome.captured, Some(Square::new(4, 3)));
        assert!(game.board().get(Square::new(4, 3)).is_none());
        assert_eq!(game.board().count_of("bob"), 1);
    }

    #[test]
    fn test_men_capture_backward() {
        let mut game = setup(
            &[
                Placement::man(White, 3, 2),
                Placement::man(Black, 4, 3),
                Placement::man(Black, 0, 7),
            ],
            White,
        );
        let outcome = game.make_move("alice", mv((3, 2), (5, 4))).unwrap();
        assert_eq!(outcome.captured, Some(Square::new(4, 3)));
    }

    #[test]
    fn test_capture_chain_requires_same_piece() {
        let mut game = setup(
            &[
                Placement::man(White, 6, 1),
                Placement::man(White, 7, 6),
                Placement::man(Black, 5, 2),
                Placement::man(Black, 3, 4),
                Placement::man(Black, 0, 7),
            ],
            White,
        );

        let outcome = game.make_move("alice", mv((6, 1), (4, 3))).unwrap();
        assert!(outcome.continue_capture);
        assert_eq!(game.current_player(), Some("alice"));
        let chain = game.capture_chain().unwrap().clone();
        assert_eq!(chain.position, Square::new(4, 3));
        assert_eq!(chain.piece_id, "alice_0");

        assert_eq!(game.make_move("alice", mv((7, 6), (6, 5))), Err(GameError::MustContinueCapture));
        // the chained piece itself may not step instead of jumping
        assert_eq!(game.make_move("alice", mv((4, 3), (3, 2))), Err(GameError::MustContinueCapture));
        assert_eq!(game.legal_moves("alice"), vec![mv((4, 3), (2, 5))]);

        let outcome = game.make_move("alice", mv((4, 3), (2, 5))).unwrap();
        assert!(!outcome.continue_capture);
        assert!(game.capture_chain().is_none());
        assert_eq!(game.current_player(), Some("bob"));
    }

    #[test]
    fn test_promotion_happens_once() {
        let mut game = setup(
            &[
                Placement::man(White, 1, 2),
                Placement::man(Black, 6, 1),
                Placement::man(Black, 6, 5),
            ],
            White,
        );
        let outcome = game.make_move("alice", mv((1, 2), (0, 1))).unwrap();
        assert!(outcome.promoted);
        assert!(game.board().get(Square::new(0, 1)).unwrap().is_king);

        game.make_move("bob", mv((6, 5), (7, 4))).unwrap();
        let outcome = game.make_move("alice", mv((0, 1), (1, 0))).unwrap();
        assert!(!outcome.promoted);
        assert!(game.board().get(Square::new(1, 0)).unwrap().is_king);
    }

    #[test]
    fn test_capturing_last_piece_wins() {
        let mut game = setup(
            &[Placement::man(White, 5, 2), Placement::man(Black, 4, 3)],
            White,
        );
        let outcome = game.make_move("alice", mv((5, 2), (3, 4))).unwrap();
        assert!(outcome.game_over);
        assert_eq!(outcome.winner.as_deref(), Some("alice"));
        assert_eq!(game.status(), GameStatus::Finished);
        assert_eq!(game.make_move("bob", mv((0, 1), (1, 0))), Err(GameError::NotPlaying));
    }

    #[test]
    fn test_blocked_player_loses() {
        // Black man on row 7 cannot step forward, and has nothing to capture
        let mut game = setup(
            &[
                Placement::man(White, 3, 0),
                Placement::man(Black, 7, 0),
            ],
            White,
        );
        let outcome = game.make_move("alice", mv((3, 0), (2, 1))).unwrap();
        assert!(outcome.game_over);
        assert_eq!(game.winner(), Some("alice"));
    }

    #[test]
    fn test_abandonment_awards_win() {
        let mut game = started_game();
        assert!(game.remove_player("bob"));
        assert_eq!(game.status(), GameStatus::Finished);
        assert_eq!(game.winner(), Some("alice"));
        assert_eq!(game.board().count_of("bob"), 0);
        assert!(!game.remove_player("bob"));
    }

    #[test]
    fn test_seat_reused_after_leaving_lobby() {
        let mut game = CheckersGame::new("g1");
        game.add_player("alice", "Alice").unwrap();
        game.remove_player("alice");
        assert_eq!(game.status(), GameStatus::Waiting);
        let player = game.add_player("bob", "Bob").unwrap();
        assert_eq!(player.color, White);
    }

    #[test]
    fn test_setup_rejects_light_squares() {
        let result = CheckersGame::from_setup(
            "g1",
            ("a", "A"),
            ("b", "B"),
            &[Placement::man(White, 0, 0)],
            White,
        );
        assert!(matches!(result, Err(GameError::PreconditionError(_))));
    }

    #[test]
    fn test_snapshot_lists_pieces_by_player() {
        let game = started_game();
        let snapshot = game.snapshot();
        assert_eq!(snapshot.pieces["alice"].len(), PIECES_PER_PLAYER);
        assert_eq!(snapshot.pieces["bob"].len(), PIECES_PER_PLAYER);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["currentPlayer"], "alice");
        assert_eq!(json["status"], "playing");
        assert!(json["captureChain"].is_null());
    }
}
