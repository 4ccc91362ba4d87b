use wasm_bindgen::prelude::*;

pub mod board;
pub mod error;
pub mod game;
pub mod types;

pub use error::EngineError;
pub use game::{Game, GameState, MoveResult, Transition};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

/// One game session exposed to JavaScript.
///
/// wasm-bindgen refuses re-entrant calls on the same handle, so a move is
/// always committed before the next query sees the board.
#[wasm_bindgen]
#[derive(Default)]
pub struct WasmGame {
    game: Game,
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { game: Game::new() }
    }

    /// Re-seeds the board and returns the fresh snapshot.
    pub fn reset(&mut self) -> Result<JsValue, JsError> {
        self.game.reset();
        self.state()
    }

    pub fn state(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.game.to_snapshot())?)
    }

    /// `[{ row, col, captured: [{ row, col }] }]` in row-major order.
    pub fn legal_moves(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.game.legal_moves())?)
    }

    /// Plays for the side to move. Throws `illegal move at (row, col)` on rejection.
    pub fn attempt_move(&mut self, row: u8, col: u8) -> Result<JsValue, JsError> {
        self.game.place(row, col)?;
        self.state()
    }

    pub fn scores(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.game.scores())?)
    }

    pub fn status(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.game.status())?)
    }

    /// Message keys of the last action's events, for the localization layer.
    pub fn message_keys(&self) -> Vec<String> {
        self.game
            .events()
            .iter()
            .map(|event| event.message_key().to_string())
            .collect()
    }
}
