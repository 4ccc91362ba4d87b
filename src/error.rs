/// Errors returned by the rules engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The target square is not in the current legal-move set: out of range,
    /// occupied, capturing nothing, or the game has already ended.
    #[error("illegal move at ({row}, {col})")]
    IllegalMove { row: u8, col: u8 },
}
