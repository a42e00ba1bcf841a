use thiserror::Error;

/// Errors raised while turning a Parquet file into a [`Table`](crate::Table)
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The file could not be opened or read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Corrupt footer, bad magic, truncated stream or a failed page decode
    #[error("Malformed parquet file: {0}")]
    Malformed(String),

    /// A column declares a type with no normalization rule, or carries
    /// binary data that is not text
    #[error("Unsupported type for column '{column}': {data_type}")]
    UnsupportedType { column: String, data_type: String },

    /// Caller supplied options that do not fit the file
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for decode operations
pub type Result<T> = std::result::Result<T, DecodeError>;

impl From<parquet::errors::ParquetError> for DecodeError {
    fn from(err: parquet::errors::ParquetError) -> Self {
        match err {
            parquet::errors::ParquetError::External(inner) => {
                match inner.downcast::<std::io::Error>() {
                    Ok(io) => DecodeError::Io(*io),
                    Err(other) => DecodeError::Malformed(other.to_string()),
                }
            }
            other => DecodeError::Malformed(other.to_string()),
        }
    }
}

impl From<arrow_schema::ArrowError> for DecodeError {
    fn from(err: arrow_schema::ArrowError) -> Self {
        match err {
            arrow_schema::ArrowError::IoError(_, io) => DecodeError::Io(io),
            other => DecodeError::Malformed(other.to_string()),
        }
    }
}

impl DecodeError {
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        DecodeError::Malformed(msg.into())
    }

    pub fn unsupported_type<C: Into<String>, T: Into<String>>(column: C, data_type: T) -> Self {
        DecodeError::UnsupportedType {
            column: column.into(),
            data_type: data_type.into(),
        }
    }

    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        DecodeError::InvalidArgument(msg.into())
    }

    /// Prefix the message with `ctx`, keeping the error kind intact
    fn prefixed(self, ctx: String) -> Self {
        match self {
            DecodeError::Io(io) => {
                DecodeError::Io(std::io::Error::new(io.kind(), format!("{}: {}", ctx, io)))
            }
            DecodeError::Malformed(msg) => DecodeError::Malformed(format!("{}: {}", ctx, msg)),
            DecodeError::InvalidArgument(msg) => {
                DecodeError::InvalidArgument(format!("{}: {}", ctx, msg))
            }
            // Already names the column
            unsupported @ DecodeError::UnsupportedType { .. } => unsupported,
        }
    }
}

/// Extension trait to add context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, ctx: S) -> Result<T>;

    /// Add context with a closure that's only called on error
    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, f: F) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<DecodeError>,
{
    fn context<S: Into<String>>(self, ctx: S) -> Result<T> {
        self.map_err(|e| e.into().prefixed(ctx.into()))
    }

    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, f: F) -> Result<T> {
        self.map_err(|e| e.into().prefixed(f().into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = DecodeError::malformed("bad footer");
        assert_eq!(err.to_string(), "Malformed parquet file: bad footer");

        let err = DecodeError::unsupported_type("tags", "List(Utf8)");
        assert_eq!(
            err.to_string(),
            "Unsupported type for column 'tags': List(Utf8)"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: DecodeError = io_err.into();
        assert!(matches!(err, DecodeError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_error_from_parquet() {
        let err: DecodeError =
            parquet::errors::ParquetError::EOF("unexpected end of file".to_string()).into();
        assert!(matches!(err, DecodeError::Malformed(_)));
        assert!(err.to_string().contains("unexpected end of file"));
    }

    #[test]
    fn test_context_keeps_kind() {
        fn failing_open() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "No such file").into())
        }

        let err = failing_open().context("opening data.parquet").unwrap_err();
        match err {
            DecodeError::Io(io) => {
                assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
                assert!(io.to_string().starts_with("opening data.parquet: "));
            }
            other => panic!("expected Io, got {:?}", other),
        }
    }

    #[test]
    fn test_with_context() {
        fn failing_decode() -> Result<()> {
            Err(DecodeError::malformed("truncated"))
        }

        let filename = "test.parquet";
        let err = failing_decode()
            .with_context(|| format!("Processing file: {}", filename))
            .unwrap_err();
        assert!(err.to_string().contains("Processing file: test.parquet"));
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn test_context_leaves_unsupported_untouched() {
        let result: Result<()> = Err(DecodeError::unsupported_type("blob", "Binary"));
        let err = result.context("reading batch").unwrap_err();
        assert_eq!(err.to_string(), "Unsupported type for column 'blob': Binary");
    }
}
