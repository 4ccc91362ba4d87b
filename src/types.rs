use serde::Serialize;

/// Number of captures above which a move counts as a "many flips" move.
pub const MANY_CAPTURES_THRESHOLD: usize = 3;

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Row-major square index (0..=63).
    pub fn index(self) -> usize {
        self.row as usize * crate::board::BOARD_SIZE + self.col as usize
    }
}

/// One of the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }
}

/// Contents of a single square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
}

impl Cell {
    /// Render code: 0=empty, 1=black, 2=white.
    pub fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Black => 1,
            Self::White => 2,
        }
    }

    pub fn owner(self) -> Option<Player> {
        match self {
            Self::Empty => None,
            Self::Black => Some(Player::Black),
            Self::White => Some(Player::White),
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::Black => Self::Black,
            Player::White => Self::White,
        }
    }
}

/// An empty square together with the opponent pieces playing there would capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveCandidate {
    pub row: u8,
    pub col: u8,
    pub captured: Vec<Position>,
}

impl MoveCandidate {
    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }
}

/// Piece counts, recomputed from the board on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scores {
    pub black: u8,
    pub white: u8,
}

/// Final result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win(Player),
    Tie,
}

impl Outcome {
    /// Strict majority wins; equal counts tie.
    pub fn from_scores(scores: Scores) -> Self {
        if scores.black > scores.white {
            Self::Win(Player::Black)
        } else if scores.white > scores.black {
            Self::Win(Player::White)
        } else {
            Self::Tie
        }
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            Self::Win(player) => Some(player),
            Self::Tie => None,
        }
    }
}

/// Answer to "is the game over, and who won".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameStatus {
    pub ended: bool,
    /// `None` while the game is still running.
    pub outcome: Option<Outcome>,
}

/// What happened during a state transition.
///
/// The presentation layer maps these to display text through
/// [`GameEvent::message_key`]; the engine never produces text itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    TurnStarted {
        player: Player,
    },
    MoveApplied {
        player: Player,
        position: Position,
        captured: usize,
    },
    /// `player` had no legal move and the turn passed to the opponent.
    ForcedPass {
        player: Player,
    },
    GameEnded {
        outcome: Outcome,
    },
}

impl GameEvent {
    /// Stable key of the message group a localization layer should draw from.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::TurnStarted {
                player: Player::Black,
            } => "black_turn",
            Self::TurnStarted {
                player: Player::White,
            } => "white_turn",
            Self::MoveApplied { captured, .. } if *captured > MANY_CAPTURES_THRESHOLD => {
                "flip_many"
            }
            Self::MoveApplied { .. } => "good_move",
            Self::ForcedPass { .. } => "no_moves",
            Self::GameEnded {
                outcome: Outcome::Win(Player::Black),
            } => "black_win",
            Self::GameEnded {
                outcome: Outcome::Win(Player::White),
            } => "white_win",
            Self::GameEnded {
                outcome: Outcome::Tie,
            } => "tie",
        }
    }
}

/// Render-facing view of a game instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    /// Row-major cell codes, see [`Cell::code`].
    pub board: Vec<u8>,
    pub current_player: Player,
    pub black_count: u8,
    pub white_count: u8,
    pub is_game_over: bool,
    pub outcome: Option<Outcome>,
    /// Contract:
    /// - `true` when the last action ended in a forced pass.
    /// - `false` after a reset or a normal move that needed no pass.
    pub is_pass: bool,
    /// Contract:
    /// - Normal move: captured positions, nearest-first per direction.
    /// - After reset: empty.
    pub flipped: Vec<Position>,
    pub events: Vec<GameEvent>,
}
