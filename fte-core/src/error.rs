use std::fmt;

/// Custom error type for FTE estimate operations
#[derive(Debug)]
pub enum FteError {
    /// Issue tracker returned an error status or an unexpected payload
    Tracker(String),
    /// Configuration errors
    Config(String),
    /// File I/O errors
    Io(std::io::Error),
    /// JSON parsing errors
    Json(serde_json::Error),
    /// YAML parsing errors
    Yaml(serde_yaml::Error),
    /// HTTP request errors
    Http(reqwest::Error),
    /// Generic errors with message
    Generic(String),
}

impl fmt::Display for FteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FteError::Tracker(msg) => write!(f, "Issue tracker error: {}", msg),
            FteError::Config(msg) => write!(f, "Configuration error: {}", msg),
            FteError::Io(err) => write!(f, "I/O error: {}", err),
            FteError::Json(err) => write!(f, "JSON error: {}", err),
            FteError::Yaml(err) => write!(f, "YAML error: {}", err),
            FteError::Http(err) => write!(f, "HTTP error: {}", err),
            FteError::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FteError::Io(err) => Some(err),
            FteError::Json(err) => Some(err),
            FteError::Yaml(err) => Some(err),
            FteError::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FteError {
    fn from(err: std::io::Error) -> Self {
        FteError::Io(err)
    }
}

impl From<serde_json::Error> for FteError {
    fn from(err: serde_json::Error) -> Self {
        FteError::Json(err)
    }
}

impl From<serde_yaml::Error> for FteError {
    fn from(err: serde_yaml::Error) -> Self {
        FteError::Yaml(err)
    }
}

impl From<reqwest::Error> for FteError {
    fn from(err: reqwest::Error) -> Self {
        FteError::Http(err)
    }
}

impl From<std::num::ParseIntError> for FteError {
    fn from(err: std::num::ParseIntError) -> Self {
        FteError::Generic(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for FteError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        FteError::Generic(err.to_string())
    }
}

impl From<url::ParseError> for FteError {
    fn from(err: url::ParseError) -> Self {
        FteError::Config(err.to_string())
    }
}

impl From<String> for FteError {
    fn from(err: String) -> Self {
        FteError::Generic(err)
    }
}

impl From<anyhow::Error> for FteError {
    fn from(err: anyhow::Error) -> Self {
        FteError::Generic(err.to_string())
    }
}

/// Result type alias for FTE estimate operations
pub type Result<T> = std::result::Result<T, FteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_tracker_errors() {
        let err = FteError::Tracker("GET issue/SWG-1 returned 404".to_string());
        assert_eq!(err.to_string(), "Issue tracker error: GET issue/SWG-1 returned 404");
    }

    #[test]
    fn string_converts_to_generic() {
        let err: FteError = "boom".to_string().into();
        assert!(matches!(err, FteError::Generic(ref msg) if msg == "boom"));
    }
}
