//! Errors returned by the rule engines and the registry
//!
//! Every rejected action leaves game state untouched.

use crate::game::GameType;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("game not found: {0}")]
    NotFound(String),

    #[error("game is full ({max} players)")]
    CapacityError { max: usize },

    #[error("game is no longer accepting players")]
    GameClosed,

    #[error("player {0} is already in an active game")]
    AlreadyInGame(String),

    #[error("color {0} is already taken")]
    ColorTaken(String),

    #[error("it is not your turn")]
    NotYourTurn,

    #[error("no piece of yours on that square")]
    IllegalPiece,

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("a capture is available and must be taken")]
    MandatoryCapture,

    #[error("the capture must be continued with the same piece")]
    MustContinueCapture,

    #[error("game is not in progress")]
    NotPlaying,

    #[error("{operation} is not available in a {game_type} game")]
    WrongGameType {
        operation: &'static str,
        game_type: GameType,
    },

    #[error("dice already rolled, move a piece first")]
    AlreadyRolled,

    #[error("roll the dice first")]
    NoPendingRoll,

    #[error("{0}")]
    PreconditionError(String),
}

impl GameError {
    /// Stable identifier for clients
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::NotFound(_) => "NotFound",
            GameError::CapacityError { .. } => "CapacityError",
            GameError::GameClosed => "GameClosed",
            GameError::AlreadyInGame(_) => "AlreadyInGame",
            GameError::ColorTaken(_) => "ColorTaken",
            GameError::NotYourTurn => "NotYourTurn",
            GameError::IllegalPiece => "IllegalPiece",
            GameError::IllegalMove(_) => "IllegalMove",
            GameError::MandatoryCapture => "MandatoryCapture",
            GameError::MustContinueCapture => "MustContinueCapture",
            GameError::NotPlaying => "NotPlaying",
            GameError::WrongGameType { .. } => "WrongGameType",
            GameError::AlreadyRolled => "AlreadyRolled",
            GameError::NoPendingRoll => "NoPendingRoll",
            GameError::PreconditionError(_) => "PreconditionError",
        }
    }

    pub(crate) fn illegal(reason: impl Into<String>) -> Self {
        GameError::IllegalMove(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
