use crate::session::state::SessionStatus;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised by the session engine and the analyzers.
///
/// Dropped keystrokes are not errors; only invalid transitions and bad
/// configuration surface here.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("cannot {operation} a session that is {status}")]
    InvalidTransition {
        operation: &'static str,
        status: SessionStatus,
    },
    #[error("duration must be positive, got {0}s")]
    InvalidDuration(f64),
    #[error("target word list is empty")]
    EmptyTargetWords,
    #[error("target word {0:?} is empty or contains whitespace")]
    InvalidTargetWord(String),
    #[error("sequence length must be 2 or 3, got {0}")]
    InvalidSequenceLength(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_display() {
        let err = Error::InvalidTransition {
            operation: "complete",
            status: SessionStatus::Idle,
        };
        assert_eq!(err.to_string(), "cannot complete a session that is idle");
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            Error::InvalidDuration(-5.0).to_string(),
            "duration must be positive, got -5s"
        );
        assert_eq!(
            Error::EmptyTargetWords.to_string(),
            "target word list is empty"
        );
        assert_eq!(
            Error::InvalidTargetWord("a b".to_string()).to_string(),
            "target word \"a b\" is empty or contains whitespace"
        );
        assert_eq!(
            Error::InvalidSequenceLength(4).to_string(),
            "sequence length must be 2 or 3, got 4"
        );
    }
}
