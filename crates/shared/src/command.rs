#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validate(#[from] validator::ValidationErrors),

    /// Message meant to be shown back to the chat user as-is.
    #[error("{0}")]
    User(String),

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

impl Error {
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Error::User(_) | Error::Validate(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        Self::Unknown(value.into())
    }
}

impl From<std::time::SystemTimeError> for Error {
    fn from(value: std::time::SystemTimeError) -> Self {
        Self::Unknown(value.into())
    }
}

#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::Server(format!($msg)))
    };
    ($err:expr $(,)?) => {
        return Err($crate::Error::Server(format!($err)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::Server(format!($fmt, $($arg)*)))
    };
}

#[macro_export]
macro_rules! user {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::User(format!($msg)))
    };
    ($err:expr $(,)?) => {
        return Err($crate::Error::User(format!($err)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::User(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reject(amount: f64) -> Result<f64> {
        if amount <= 0.0 {
            crate::user!("amount must be greater than 0, got {amount}");
        }

        Ok(amount)
    }

    #[test]
    fn user_macro_returns_user_error() {
        let err = reject(-1.0).unwrap_err();
        assert!(err.is_user_facing());
        assert_eq!(err.to_string(), "amount must be greater than 0, got -1");
    }

    #[test]
    fn unknown_errors_are_not_user_facing() {
        let err: Error = anyhow::anyhow!("disk full").into();
        assert!(!err.is_user_facing());
    }
}
