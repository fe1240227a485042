use std::fmt;

/// Errors that can occur while parsing request items.
///
/// Every variant carries the original token text so diagnostics always
/// point back at exactly what the user typed. Any failure aborts the whole
/// parse; there are no partial results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A referenced file could not be opened or read.
    FileAccess {
        /// The original token text.
        token: String,
        /// The path that failed to open.
        path: String,
        /// The underlying I/O error message.
        error: String,
    },
    /// An embedded file's bytes are not valid UTF-8 text.
    NotTextFile {
        /// The original token text.
        token: String,
        /// The path of the offending file.
        path: String,
    },
    /// A raw or file-embedded JSON value is malformed.
    InvalidJson {
        /// The original token text.
        token: String,
        /// The JSON decoder's error message.
        error: String,
    },
    /// The empty-header separator (`;`) was used with a non-empty value.
    EmptyHeaderValue {
        /// The original token text.
        token: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileAccess { token, path, error } => {
                write!(f, "\"{token}\": {path}: {error}")
            }
            Self::NotTextFile { token, path } => {
                write!(
                    f,
                    "\"{token}\": cannot embed the content of \"{path}\", \
                     not a UTF-8 or ASCII-encoded text file"
                )
            }
            Self::InvalidJson { token, error } => {
                write!(f, "\"{token}\": {error}")
            }
            Self::EmptyHeaderValue { token } => {
                write!(
                    f,
                    "invalid item \"{token}\" (to specify an empty header use `Header;`)"
                )
            }
        }
    }
}

impl std::error::Error for ParseError {}
