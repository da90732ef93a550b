use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum LineageError {
    /// A raw record whose co-indexed lists cannot be turned into intervals.
    MalformedRecord { replicate: String, message: String },
    /// A raw record that parsed to zero intervals.
    EmptySequence { replicate: String },
    Configuration(String),
    Io(std::io::Error),
    Csv(csv::Error),
    Serde(serde_json::Error),
}

impl LineageError {
    pub fn malformed(replicate: &str, message: impl Into<String>) -> Self {
        LineageError::MalformedRecord {
            replicate: replicate.to_string(),
            message: message.into(),
        }
    }

    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            LineageError::MalformedRecord { .. } | LineageError::EmptySequence { .. }
        )
    }
}

impl Error for LineageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LineageError::Io(e) => Some(e),
            LineageError::Csv(e) => Some(e),
            LineageError::Serde(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for LineageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LineageError::MalformedRecord { replicate, message } => {
                write!(f, "Malformed record for replicate '{replicate}': {message}")
            }
            LineageError::EmptySequence { replicate } => {
                write!(f, "Replicate '{replicate}' has an empty state sequence")
            }
            LineageError::Configuration(message) => write!(f, "Configuration error: {message}"),
            LineageError::Io(e) => write!(f, "I/O error: {e}"),
            LineageError::Csv(e) => write!(f, "CSV error: {e}"),
            LineageError::Serde(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl From<std::io::Error> for LineageError {
    fn from(err: std::io::Error) -> Self {
        LineageError::Io(err)
    }
}

impl From<csv::Error> for LineageError {
    fn from(err: csv::Error) -> Self {
        LineageError::Csv(err)
    }
}

impl From<serde_json::Error> for LineageError {
    fn from(err: serde_json::Error) -> Self {
        LineageError::Serde(err)
    }
}
