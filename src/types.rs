use serde::{Serialize, Serializer};
use std::fmt;
use std::fs::File;

// ---------------------------------------------------------------------------
// Separator
// ---------------------------------------------------------------------------

/// The eight request-item separators, one per concrete marker.
///
/// The marker decides both which collection the item lands in and how its
/// value is interpreted (raw string, null, parsed JSON, file contents, or
/// an open file handle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Separator {
    /// `:` — header with a string value.
    Header,
    /// `;` — header explicitly set to an empty value.
    HeaderEmpty,
    /// `==` — query-string parameter.
    Query,
    /// `=` — body data field with a string value.
    Data,
    /// `:=` — body data field whose value is parsed as JSON.
    DataRawJson,
    /// `@` — file upload.
    Files,
    /// `=@` — body data field embedding a text file's contents.
    DataEmbedFile,
    /// `:=@` — body data field embedding a JSON file's parsed contents.
    DataEmbedRawJsonFile,
}

/// All markers, longest first, so that a scan trying them in order
/// resolves overlaps (`:=@` before `:=` before `:`) correctly.
const MARKERS: [(&str, Separator); 8] = [
    (":=@", Separator::DataEmbedRawJsonFile),
    ("==", Separator::Query),
    (":=", Separator::DataRawJson),
    ("=@", Separator::DataEmbedFile),
    (":", Separator::Header),
    (";", Separator::HeaderEmpty),
    ("=", Separator::Data),
    ("@", Separator::Files),
];

impl Separator {
    /// Return the literal marker as typed on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => ":",
            Self::HeaderEmpty => ";",
            Self::Query => "==",
            Self::Data => "=",
            Self::DataRawJson => ":=",
            Self::Files => "@",
            Self::DataEmbedFile => "=@",
            Self::DataEmbedRawJsonFile => ":=@",
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// One `key<separator>value` token, with its separator already resolved.
///
/// `orig` is the verbatim user-typed token, retained solely so diagnostics
/// can point back at exactly what the user wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// The part before the separator.
    pub key: String,
    /// The part after the separator (may be empty).
    pub value: String,
    /// Which marker split the token.
    pub separator: Separator,
    /// The original token text.
    pub orig: String,
}

impl Item {
    /// Build an item from already-split parts, reconstructing `orig`.
    pub fn new(
        key: impl Into<String>,
        separator: Separator,
        value: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let value = value.into();
        let orig = format!("{key}{}{value}", separator.as_str());
        Self {
            key,
            value,
            separator,
            orig,
        }
    }

    /// Split a raw token at its first separator marker.
    ///
    /// The scan runs left to right; at each position the longest marker is
    /// tried first, so `a:=@f` resolves to `:=@` rather than `:`.
    ///
    /// Returns `None` when the token contains no marker or the key would
    /// be empty.
    pub fn parse(token: &str) -> Option<Self> {
        for (i, _) in token.char_indices().skip(1) {
            for (marker, separator) in MARKERS {
                if token[i..].starts_with(marker) {
                    return Some(Self {
                        key: token[..i].to_string(),
                        value: token[i + marker.len()..].to_string(),
                        separator,
                        orig: token.to_string(),
                    });
                }
            }
        }
        None
    }
}

// ---------------------------------------------------------------------------
// DataValue
// ---------------------------------------------------------------------------

/// A value stored in the body-data collection.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// A verbatim string (`=`) or embedded text-file contents (`=@`).
    Text(String),
    /// A parsed JSON value (`:=` or `:=@`); any JSON type, not just scalars.
    Json(serde_json::Value),
}

impl Serialize for DataValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(s) => serializer.serialize_str(s),
            Self::Json(v) => v.serialize(serializer),
        }
    }
}

// ---------------------------------------------------------------------------
// FileUpload
// ---------------------------------------------------------------------------

/// The contents of a file upload, tagged by how they were acquired.
#[derive(Debug)]
pub enum FileContent {
    /// The whole file, read into memory up front.
    Buffered(Vec<u8>),
    /// An open, unread handle. Ownership transfers to the consumer, which
    /// must close it after the body is sent — or after aborting the send.
    Streaming(File),
}

/// A file-upload value (`@`): basename, contents, and sniffed content type.
#[derive(Debug, Serialize)]
pub struct FileUpload {
    /// The basename of the path as typed.
    pub filename: String,
    /// Buffered bytes or an open streaming handle.
    #[serde(serialize_with = "serialize_content")]
    pub content: FileContent,
    /// MIME type guessed from the filename extension.
    pub content_type: String,
}

/// Serialize buffered contents as lossy UTF-8; streaming handles cannot be
/// rendered, so they serialize as a placeholder.
fn serialize_content<S: Serializer>(content: &FileContent, s: S) -> Result<S::Ok, S::Error> {
    match content {
        FileContent::Buffered(bytes) => s.serialize_str(&String::from_utf8_lossy(bytes)),
        FileContent::Streaming(_) => s.serialize_str("<streaming handle>"),
    }
}

// ---------------------------------------------------------------------------
// Tests (unit)
// ---------------------------------------------------------------------------
