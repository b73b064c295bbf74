#[derive(Debug, Clone, PartialEq)]
pub enum ChallengeError {
    InvalidDifficulty {
        field: &'static str,
        value: i64,
    },
    InvalidEncoding {
        reason: String,
    },
    MismatchedAlgorithm {
        position: usize,
        expected: Option<i32>,
        actual: i32,
    },
    Timeout {
        max_seconds: f64,
    },
    UnknownAlgorithm {
        name: String,
    },
}

impl std::fmt::Display for ChallengeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChallengeError::InvalidDifficulty { field, value } => {
                let min = if *field == "num_nodes" { 1 } else { 0 };
                write!(
                    f,
                    "Value for Difficulty.{} must be >= {}, got '{}'",
                    field, min, value
                )
            }
            ChallengeError::InvalidEncoding { reason } => {
                write!(f, "Invalid encoding: {}", reason)
            }
            ChallengeError::MismatchedAlgorithm {
                position,
                expected: Some(expected),
                actual,
            } => write!(
                f,
                "Mismatched algo at byte {}. Recorded: '{}', Emitted: '{}'",
                position, expected, actual
            ),
            ChallengeError::MismatchedAlgorithm {
                position,
                expected: None,
                actual,
            } => write!(
                f,
                "Mismatched algo at byte {}. Recorded stream exhausted, Emitted: '{}'",
                position, actual
            ),
            ChallengeError::Timeout { max_seconds } => write!(
                f,
                "Solving challenge exceeded max_seconds '{}'",
                max_seconds
            ),
            ChallengeError::UnknownAlgorithm { name } => {
                write!(f, "Algorithm '{}' does not exist", name)
            }
        }
    }
}

impl std::error::Error for ChallengeError {}

pub type ChallengeResult<T> = std::result::Result<T, ChallengeError>;
