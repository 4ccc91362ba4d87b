use tracing::{debug, trace};

use crate::board::Board;
use crate::error::EngineError;
use crate::types::{
    GameEvent, GameSnapshot, GameStatus, MoveCandidate, Outcome, Player, Position, Scores,
};

/// Board plus side to move. Every engine operation takes and returns this by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_player: Player,
}

/// Result of resolving whose turn it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: GameState,
    pub events: Vec<GameEvent>,
}

/// Result of a successful [`GameState::attempt_move`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    pub state: GameState,
    /// Captured positions, nearest-first per direction.
    pub captured: Vec<Position>,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Initial board with Black to move.
    pub fn new() -> Self {
        Self::from_parts(Board::new(), Player::Black)
    }

    pub fn from_parts(board: Board, current_player: Player) -> Self {
        Self {
            board,
            current_player,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn legal_moves(&self) -> Vec<MoveCandidate> {
        self.board.valid_moves(self.current_player)
    }

    /// Hands the turn to the other side without checking its moves.
    pub fn switch_turn(self) -> Self {
        Self {
            current_player: self.current_player.opponent(),
            ..self
        }
    }

    pub fn scores(&self) -> Scores {
        self.board.scores()
    }

    pub fn status(&self) -> GameStatus {
        if self.is_ended() {
            GameStatus {
                ended: true,
                outcome: Some(Outcome::from_scores(self.scores())),
            }
        } else {
            GameStatus {
                ended: false,
                outcome: None,
            }
        }
    }

    /// True when neither side has a legal move.
    pub fn is_ended(&self) -> bool {
        !self.board.has_valid_move(self.current_player)
            && !self.board.has_valid_move(self.current_player.opponent())
    }

    /// Settles the turn: the current player moves, is forced to pass, or the game ends.
    ///
    /// A forced pass only switches the turn; the board is never touched.
    pub fn resolve_turn(self) -> Transition {
        let player = self.current_player;
        if self.board.has_valid_move(player) {
            return Transition {
                state: self,
                events: vec![GameEvent::TurnStarted { player }],
            };
        }

        let other = player.opponent();
        if self.board.has_valid_move(other) {
            debug!(?player, "forced pass");
            return Transition {
                state: self.switch_turn(),
                events: vec![
                    GameEvent::ForcedPass { player },
                    GameEvent::TurnStarted { player: other },
                ],
            };
        }

        let scores = self.scores();
        let outcome = Outcome::from_scores(scores);
        debug!(?outcome, black = scores.black, white = scores.white, "game ended");
        Transition {
            state: self,
            events: vec![GameEvent::GameEnded { outcome }],
        }
    }

    /// Plays the current player's piece at `(row, col)`, then settles the next turn.
    pub fn attempt_move(&self, row: u8, col: u8) -> Result<MoveResult, EngineError> {
        let player = self.current_player;
        let (board, captured) = self
            .board
            .apply_move(player, row, col)
            .inspect_err(|_| trace!(?player, row, col, "rejected move"))?;

        debug!(?player, row, col, captured = captured.len(), "move applied");

        let next = Self::from_parts(board, player).switch_turn().resolve_turn();
        let mut events = Vec::with_capacity(next.events.len() + 1);
        events.push(GameEvent::MoveApplied {
            player,
            position: Position::new(row, col),
            captured: captured.len(),
        });
        events.extend(next.events);

        Ok(MoveResult {
            state: next.state,
            captured,
            events,
        })
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// One game session as held by the presentation layer.
///
/// All mutation goes through `&mut self`, so a move is fully committed to
/// the board before any other query on the same game can run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    state: GameState,
    is_pass: bool,
    flipped: Vec<Position>,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new() -> Self {
        let start = GameState::new().resolve_turn();
        Self {
            state: start.state,
            is_pass: false,
            flipped: Vec::new(),
            events: start.events,
        }
    }

    /// Re-seeds the board with Black to move.
    pub fn reset(&mut self) -> &[GameEvent] {
        *self = Self::new();
        &self.events
    }

    /// Returns the captured positions so the caller can animate them.
    pub fn place(&mut self, row: u8, col: u8) -> Result<&[Position], EngineError> {
        let result = self.state.attempt_move(row, col)?;

        self.is_pass = result
            .events
            .iter()
            .any(|event| matches!(event, GameEvent::ForcedPass { .. }));
        self.state = result.state;
        self.flipped = result.captured;
        self.events = result.events;

        Ok(&self.flipped)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn legal_moves(&self) -> Vec<MoveCandidate> {
        self.state.legal_moves()
    }

    pub fn scores(&self) -> Scores {
        self.state.scores()
    }

    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    /// Events emitted by the last reset or move.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn to_snapshot(&self) -> GameSnapshot {
        let scores = self.state.scores();
        let status = self.state.status();
        GameSnapshot {
            board: self.state.board().to_array().to_vec(),
            current_player: self.state.current_player(),
            black_count: scores.black,
            white_count: scores.white,
            is_game_over: status.ended,
            outcome: status.outcome,
            is_pass: self.is_pass,
            flipped: self.flipped.clone(),
            events: self.events.clone(),
        }
    }

    #[cfg(test)]
    fn set_state_for_test(&mut self, state: GameState) {
        self.state = state;
        self.is_pass = false;
        self.flipped.clear();
        self.events.clear();
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    const FULL_ROW: &str = "WWWWWWWW";

    fn p(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    /// Black to move with no legal square; White can take (0,0).
    fn black_must_pass() -> GameState {
        let board = Board::parse([
            ".BWWWWWW", FULL_ROW, FULL_ROW, FULL_ROW, FULL_ROW, FULL_ROW, FULL_ROW, FULL_ROW,
        ]);
        GameState::from_parts(board, Player::Black)
    }

    #[test]
    fn initial_state_is_correct() {
        let game = Game::new();
        let state = game.to_snapshot();

        assert_eq!(state.current_player, Player::Black);
        assert_eq!(state.black_count, 2);
        assert_eq!(state.white_count, 2);
        assert!(!state.is_game_over);
        assert_eq!(state.outcome, None);
        assert!(!state.is_pass);
        assert!(state.flipped.is_empty());
        assert_eq!(
            state.events,
            vec![GameEvent::TurnStarted {
                player: Player::Black
            }]
        );
        assert_eq!(game.legal_moves().len(), 4);
    }

    #[test]
    fn t01_black_opening_captures_single_center_piece() {
        let state = GameState::new();

        let result = state.attempt_move(2, 3).unwrap();
        let board = result.state.board();

        assert_eq!(result.captured, vec![p(3, 3)]);
        assert_eq!(board.count(), (4, 1));
        assert_eq!(board.cell(p(3, 3)), Cell::Black);
        assert_eq!(board.cell(p(3, 4)), Cell::Black);
        assert_eq!(board.cell(p(4, 3)), Cell::Black);
        assert_eq!(board.cell(p(4, 4)), Cell::White);
        assert_eq!(result.state.current_player(), Player::White);
        assert_eq!(
            result.events,
            vec![
                GameEvent::MoveApplied {
                    player: Player::Black,
                    position: p(2, 3),
                    captured: 1,
                },
                GameEvent::TurnStarted {
                    player: Player::White
                },
            ]
        );
    }

    #[test]
    fn t02_illegal_player_move_returns_error() {
        let mut game = Game::new();
        let before = game.clone();

        let err = game.place(0, 0).unwrap_err();
        assert_eq!(err, EngineError::IllegalMove { row: 0, col: 0 });
        assert!(err.to_string().contains("illegal move"));

        assert_eq!(
            game.place(3, 3).unwrap_err(),
            EngineError::IllegalMove { row: 3, col: 3 }
        );
        assert_eq!(game, before);
    }

    #[test]
    fn t03_pass_occurrence_switches_turn_without_touching_board() {
        let state = black_must_pass();
        assert!(state.legal_moves().is_empty());
        assert!(!state.is_ended());

        let next = state.resolve_turn();

        assert_eq!(next.state.current_player(), Player::White);
        assert_eq!(next.state.board(), state.board());
        assert_eq!(
            next.events,
            vec![
                GameEvent::ForcedPass {
                    player: Player::Black
                },
                GameEvent::TurnStarted {
                    player: Player::White
                },
            ]
        );
        assert_eq!(next.state.legal_moves().len(), 1);
    }

    #[test]
    fn t04_move_that_leaves_opponent_stuck_reports_forced_pass() {
        // White takes (0,0); Black is then stuck but White still has (7,7).
        let board = Board::parse([
            ".BWWWWWW", FULL_ROW, FULL_ROW, FULL_ROW, FULL_ROW, FULL_ROW, "WWWWWWWB", "WWWWWWB.",
        ]);
        let mut game = Game::new();
        game.set_state_for_test(GameState::from_parts(board, Player::White));

        let flipped = game.place(0, 0).unwrap().to_vec();
        let snapshot = game.to_snapshot();

        assert_eq!(flipped, vec![p(0, 1)]);
        assert!(snapshot.is_pass);
        assert!(!snapshot.is_game_over);
        assert_eq!(snapshot.current_player, Player::White);
        assert_eq!(
            snapshot.events[1..],
            [
                GameEvent::ForcedPass {
                    player: Player::Black
                },
                GameEvent::TurnStarted {
                    player: Player::White
                },
            ]
        );
    }

    #[test]
    fn t05_full_board_after_move_sets_game_over() {
        let mut game = Game::new();
        game.set_state_for_test(black_must_pass().switch_turn());

        let flipped = game.place(0, 0).unwrap().to_vec();
        let state = game.to_snapshot();

        assert_eq!(flipped, vec![p(0, 1)]);
        assert!(state.is_game_over);
        assert!(!state.is_pass);
        assert_eq!(state.black_count, 0);
        assert_eq!(state.white_count, 64);
        assert_eq!(state.outcome, Some(Outcome::Win(Player::White)));
        assert_eq!(
            state.events.last(),
            Some(&GameEvent::GameEnded {
                outcome: Outcome::Win(Player::White)
            })
        );
    }

    #[test]
    fn ended_game_rejects_further_moves() {
        let board = Board::parse([
            "BBBBBBBB", "........", "........", "........", "........", "........", "........",
            "........",
        ]);
        let state = GameState::from_parts(board, Player::White);

        assert_eq!(
            state.status(),
            GameStatus {
                ended: true,
                outcome: Some(Outcome::Win(Player::Black))
            }
        );
        assert!(state.attempt_move(1, 0).is_err());
        assert_eq!(
            state.resolve_turn().events,
            vec![GameEvent::GameEnded {
                outcome: Outcome::Win(Player::Black)
            }]
        );
    }

    #[test]
    fn full_board_outcome_follows_majority_or_ties() {
        let black = "BBBBBBBB";
        let white = "WWWWWWWW";
        let majority = Board::parse([black, black, black, black, black, white, white, white]);
        let even = Board::parse([black, black, black, black, white, white, white, white]);

        let status = GameState::from_parts(majority, Player::Black).status();
        assert!(status.ended);
        assert_eq!(status.outcome, Some(Outcome::Win(Player::Black)));

        let status = GameState::from_parts(even, Player::White).status();
        assert!(status.ended);
        assert_eq!(status.outcome, Some(Outcome::Tie));
    }

    #[test]
    fn switch_turn_is_unconditional() {
        let state = black_must_pass();

        assert_eq!(state.switch_turn().current_player(), Player::White);
        assert_eq!(state.switch_turn().switch_turn(), state);
    }

    #[test]
    fn games_are_independent() {
        let mut first = Game::new();
        let second = Game::new();

        first.place(2, 3).unwrap();

        assert_eq!(second.state(), &GameState::new());
        assert_ne!(first.state(), second.state());
    }

    #[test]
    fn reset_restores_initial_position() {
        let mut game = Game::new();
        game.place(2, 3).unwrap();

        let events = game.reset().to_vec();

        assert_eq!(game, Game::new());
        assert_eq!(
            events,
            vec![GameEvent::TurnStarted {
                player: Player::Black
            }]
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    mod playouts {
        use proptest::prelude::*;

        use super::*;
        use crate::board::{BOARD_SIZE, NUM_SQUARES};

        fn all_positions() -> impl Iterator<Item = Position> {
            (0..NUM_SQUARES).map(|idx| p((idx / BOARD_SIZE) as u8, (idx % BOARD_SIZE) as u8))
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn random_playouts_respect_rules(choices in proptest::collection::vec(any::<usize>(), 0..70)) {
                let mut state = GameState::new();
                let mut turns = 0usize;

                for choice in choices {
                    if state.is_ended() {
                        break;
                    }
                    let board = *state.board();
                    let player = state.current_player();
                    let moves = state.legal_moves();
                    prop_assert_eq!(&moves, &state.legal_moves());

                    for pos in all_positions() {
                        let listed = moves.iter().any(|m| m.position() == pos);
                        let legal = board.cell(pos) == Cell::Empty
                            && !board.flipped_pieces(pos, player).is_empty();
                        prop_assert_eq!(listed, legal);
                    }

                    let pick = &moves[choice % moves.len()];
                    let result = state.attempt_move(pick.row, pick.col).unwrap();
                    let next = result.state.board();
                    prop_assert_eq!(&result.captured, &pick.captured);

                    for pos in all_positions() {
                        let changed = pos == pick.position() || pick.captured.contains(&pos);
                        if changed {
                            prop_assert_eq!(next.cell(pos), Cell::from(player));
                        } else {
                            prop_assert_eq!(next.cell(pos), board.cell(pos));
                        }
                    }
                    prop_assert_eq!(next.empty_count() + 1, board.empty_count());

                    let passes = result
                        .events
                        .iter()
                        .filter(|e| matches!(e, GameEvent::ForcedPass { .. }))
                        .count();
                    turns += 1 + passes;
                    let expected = if turns % 2 == 0 { Player::Black } else { Player::White };
                    prop_assert_eq!(result.state.current_player(), expected);

                    state = result.state;
                }

                if state.is_ended() {
                    let status = state.status();
                    prop_assert!(state.legal_moves().is_empty());
                    prop_assert!(!state.board().has_valid_move(state.current_player().opponent()));
                    prop_assert_eq!(status.outcome, Some(Outcome::from_scores(state.scores())));
                }
            }
        }
    }
}
