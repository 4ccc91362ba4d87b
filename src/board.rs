use crate::error::EngineError;
use crate::types::{Cell, MoveCandidate, Player, Position, Scores};

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Reversi board state represented by two bitboards, bit `row * 8 + col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    black: u64,
    white: u64,
}

impl Board {
    /// Creates the initial board:
    /// (3,3)=white, (3,4)=black, (4,3)=black, (4,4)=white.
    pub fn new() -> Self {
        Self {
            black: bit(28) | bit(35),
            white: bit(27) | bit(36),
        }
    }

    /// Builds a board from raw masks. A square set in both masks is treated as black.
    pub fn from_bitboards(black: u64, white: u64) -> Self {
        Self {
            black,
            white: white & !black,
        }
    }

    /// Contents of `pos`; off-board coordinates read as empty.
    pub fn cell(&self, pos: Position) -> Cell {
        if !is_on_board(pos.row as i32, pos.col as i32) {
            return Cell::Empty;
        }

        let square = bit(pos.index());
        if (self.black & square) != 0 {
            Cell::Black
        } else if (self.white & square) != 0 {
            Cell::White
        } else {
            Cell::Empty
        }
    }

    /// Walks from `origin` in one direction over opponent pieces.
    ///
    /// Returns the opponent pieces passed over, nearest first, only when at
    /// least one was seen and the walk stopped on a piece owned by `player`.
    /// Running off the board or onto an empty square yields nothing.
    pub fn scan_direction(
        &self,
        origin: Position,
        d_row: i32,
        d_col: i32,
        player: Player,
    ) -> Vec<Position> {
        let own = Cell::from(player);
        let opp = Cell::from(player.opponent());
        let mut r = origin.row as i32 + d_row;
        let mut c = origin.col as i32 + d_col;
        let mut line = Vec::new();

        while is_on_board(r, c) {
            let pos = Position::new(r as u8, c as u8);
            let cell = self.cell(pos);
            if cell == opp {
                line.push(pos);
            } else if cell == own {
                return line;
            } else {
                break;
            }

            r += d_row;
            c += d_col;
        }

        Vec::new()
    }

    /// Every opponent piece captured by `player` playing at `pos`, grouped by
    /// direction in [`DIRECTIONS`] order. Empty when `pos` is occupied or off the board.
    pub fn flipped_pieces(&self, pos: Position, player: Player) -> Vec<Position> {
        if !is_on_board(pos.row as i32, pos.col as i32) || self.cell(pos) != Cell::Empty {
            return Vec::new();
        }

        DIRECTIONS
            .iter()
            .flat_map(|&(dr, dc)| self.scan_direction(pos, dr, dc, player))
            .collect()
    }

    /// Legal moves for `player` in row-major order.
    pub fn valid_moves(&self, player: Player) -> Vec<MoveCandidate> {
        let occupied = self.black | self.white;

        (0..NUM_SQUARES)
            .filter(|&idx| (occupied & bit(idx)) == 0)
            .filter_map(|idx| {
                let pos = index_to_position(idx);
                let captured = self.flipped_pieces(pos, player);
                (!captured.is_empty()).then_some(MoveCandidate {
                    row: pos.row,
                    col: pos.col,
                    captured,
                })
            })
            .collect()
    }

    pub fn has_valid_move(&self, player: Player) -> bool {
        let occupied = self.black | self.white;
        (0..NUM_SQUARES)
            .filter(|&idx| (occupied & bit(idx)) == 0)
            .any(|idx| !self.flipped_pieces(index_to_position(idx), player).is_empty())
    }

    /// Places one piece for `player` and flips everything it captures.
    ///
    /// Rejected without touching `self` unless the square is a legal move.
    pub fn apply_move(
        &self,
        player: Player,
        row: u8,
        col: u8,
    ) -> Result<(Board, Vec<Position>), EngineError> {
        let pos = Position::new(row, col);
        let captured = self.flipped_pieces(pos, player);
        if captured.is_empty() {
            return Err(EngineError::IllegalMove { row, col });
        }

        let flips = captured.iter().fold(0u64, |mask, p| mask | bit(p.index()));
        let (me, opp) = self.sides(player);
        let next_me = me | bit(pos.index()) | flips;
        let next_opp = opp & !flips;

        let next = match player {
            Player::Black => Self {
                black: next_me,
                white: next_opp,
            },
            Player::White => Self {
                black: next_opp,
                white: next_me,
            },
        };

        Ok((next, captured))
    }

    /// Returns `(black_count, white_count)`.
    pub fn count(&self) -> (u8, u8) {
        (self.black.count_ones() as u8, self.white.count_ones() as u8)
    }

    pub fn scores(&self) -> Scores {
        let (black, white) = self.count();
        Scores { black, white }
    }

    /// Returns the number of empty squares.
    pub fn empty_count(&self) -> u8 {
        let (black_count, white_count) = self.count();
        NUM_SQUARES as u8 - black_count - white_count
    }

    /// Converts board to `[u8; 64]` where 0=empty, 1=black, 2=white.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut board = [0u8; NUM_SQUARES];
        for (idx, cell) in board.iter_mut().enumerate() {
            *cell = self.cell(index_to_position(idx)).code();
        }
        board
    }

    fn sides(&self, player: Player) -> (u64, u64) {
        match player {
            Player::Black => (self.black, self.white),
            Player::White => (self.white, self.black),
        }
    }

    /// Parses eight rows of `B`, `W` and `.` into a board.
    #[cfg(test)]
    pub(crate) fn parse(rows: [&str; BOARD_SIZE]) -> Self {
        let mut black = 0u64;
        let mut white = 0u64;
        for (r, line) in rows.iter().enumerate() {
            assert_eq!(line.len(), BOARD_SIZE, "row {r} must have 8 cells");
            for (c, ch) in line.chars().enumerate() {
                match ch {
                    'B' => black |= bit(r * BOARD_SIZE + c),
                    'W' => white |= bit(r * BOARD_SIZE + c),
                    '.' => {}
                    other => panic!("unexpected cell {other:?}"),
                }
            }
        }
        Self::from_bitboards(black, white)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// True iff `(row, col)` lies on the 8×8 board.
pub fn is_on_board(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}

fn bit(idx: usize) -> u64 {
    if idx < NUM_SQUARES { 1u64 << idx } else { 0 }
}

fn index_to_position(idx: usize) -> Position {
    Position::new((idx / BOARD_SIZE) as u8, (idx % BOARD_SIZE) as u8)
}
