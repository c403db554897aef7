#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read strain dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed strain dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("strain dataset is missing the `{0}` column")]
    MissingColumn(&'static str),

    #[error("invalid value `{value}` in column `{column}` at row {row}")]
    InvalidValue {
        row: u64,
        column: String,
        value: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum StrainError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("strain `{0}` not found")]
    NotFound(String),

    #[error("no strain matches the given preferences")]
    EmptyPool,

    #[error("strain dataset is empty")]
    EmptyStore,

    #[error("strain dataset is still loading")]
    NotReady,
}
