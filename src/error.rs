use thiserror::Error;

pub type TabularResult<T> = Result<T, TabularError>;

/// Boxed cause carried by [`TabularError::Export`]
pub type ExportCause = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum TabularError {
    #[error("Format error: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export error: {message}")]
    Export {
        message: String,
        #[source]
        source: Option<ExportCause>,
    },
}

impl TabularError {
    /// Export failure without an underlying library error (format limits)
    pub fn export(message: impl Into<String>) -> Self {
        TabularError::Export {
            message: message.into(),
            source: None,
        }
    }

    /// Export failure wrapping the library error that caused it
    pub fn export_with<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        TabularError::Export {
            message: message.into(),
            source: Some(Box::new(cause)),
        }
    }

    pub fn is_format(&self) -> bool {
        matches!(self, TabularError::Format(_))
    }

    pub fn is_io(&self) -> bool {
        matches!(self, TabularError::Io(_))
    }

    pub fn is_export(&self) -> bool {
        matches!(self, TabularError::Export { .. })
    }
}

impl From<csv::Error> for TabularError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(io) => TabularError::Io(io),
                other => TabularError::export(format!("CSV write failed: {:?}", other)),
            }
        } else {
            TabularError::export_with("CSV write failed", err)
        }
    }
}

/// Shorten offending input for log and error messages
pub fn summarize(content: &str) -> String {
    const LIMIT: usize = 200;
    let trimmed = content.trim();
    if trimmed.chars().count() <= LIMIT {
        return trimmed.to_string();
    }
    let head: String = trimmed.chars().take(LIMIT).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_summarize_short_content_unchanged() {
        assert_eq!(summarize("  [1, 2]  "), "[1, 2]");
    }

    #[test]
    fn test_summarize_truncates_long_content() {
        let long = "x".repeat(500);
        let summary = summarize(&long);
        assert_eq!(summary.len(), 203);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_export_with_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = TabularError::export_with("Failed to build workbook", io);
        assert!(err.is_export());
        assert_eq!(err.to_string(), "Export error: Failed to build workbook");
        assert!(err.source().unwrap().to_string().contains("disk on fire"));
    }

    #[test]
    fn test_csv_io_error_maps_to_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: TabularError = csv::Error::from(io).into();
        assert!(err.is_io());
    }
}
