use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    Usage,
    Io,
    UnknownColumn,
    UnsupportedConversion,
    Parse,
    UnconvertibleKind,
    InvalidTarget,
    NoCurrentRow,
    StreamFailure,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    column: Option<String>,
    hint: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            column: None,
            hint: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(column) = &self.column {
            write!(f, " (column: {column})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::Io => 3,
        ErrorKind::UnknownColumn => 4,
        ErrorKind::UnsupportedConversion => 5,
        ErrorKind::Parse => 6,
        ErrorKind::UnconvertibleKind => 7,
        ErrorKind::InvalidTarget => 8,
        ErrorKind::NoCurrentRow => 9,
        ErrorKind::StreamFailure => 10,
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind, to_exit_code};
    use std::error::Error as StdError;

    #[test]
    fn exit_code_mapping_is_stable() {
        let cases = [
            (ErrorKind::Internal, 1),
            (ErrorKind::Usage, 2),
            (ErrorKind::Io, 3),
            (ErrorKind::UnknownColumn, 4),
            (ErrorKind::UnsupportedConversion, 5),
            (ErrorKind::Parse, 6),
            (ErrorKind::UnconvertibleKind, 7),
            (ErrorKind::InvalidTarget, 8),
            (ErrorKind::NoCurrentRow, 9),
            (ErrorKind::StreamFailure, 10),
        ];

        for (kind, code) in cases {
            assert_eq!(to_exit_code(kind), code);
        }
    }

    #[test]
    fn display_names_kind_message_and_column() {
        let err = Error::new(ErrorKind::UnsupportedConversion)
            .with_message("unsupported conversion: db(DOUBLE) => string")
            .with_column("price");
        assert_eq!(
            err.to_string(),
            "UnsupportedConversion: unsupported conversion: db(DOUBLE) => string (column: price)"
        );
    }

    #[test]
    fn source_is_exposed() {
        let io = std::io::Error::other("socket reset");
        let err = Error::new(ErrorKind::StreamFailure).with_source(io);
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "socket reset");
    }
}
