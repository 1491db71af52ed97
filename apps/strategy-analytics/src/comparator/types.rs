//! Inputs for multi-strategy comparison.

/// Raw bytes of one strategy's records plus its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategySource {
    /// Strategy identifier (usually the file stem).
    pub strategy_id: String,
    /// Delimited text as read from the source.
    pub bytes: Vec<u8>,
}

impl StrategySource {
    /// Create a source.
    #[must_use]
    pub fn new(strategy_id: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            strategy_id: strategy_id.into(),
            bytes: bytes.into(),
        }
    }
}
