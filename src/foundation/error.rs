pub type FuseResult<T> = Result<T, FuseError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every error is terminal for the current merge call; there is no
/// partial-result mode and nothing is retried internally.
#[derive(thiserror::Error, Debug)]
pub enum FuseError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The caller-supplied merge function failed at a timeline tick.
    #[error("merge function failed at tick {tick}: {message}")]
    MergeFunction { tick: usize, message: String },

    #[error("encoding error: {0}")]
    Encoding(String),

    /// The output cannot be brought under the byte budget without
    /// degrading below the minimum pixel dimensions.
    #[error("size budget unattainable: {0}")]
    BudgetUnattainable(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FuseError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn merge_function(tick: usize, msg: impl Into<String>) -> Self {
        Self::MergeFunction {
            tick,
            message: msg.into(),
        }
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    pub fn budget_unattainable(msg: impl Into<String>) -> Self {
        Self::BudgetUnattainable(msg.into())
    }
}
