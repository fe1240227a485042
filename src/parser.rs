use std::fs::{self, File};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ParseError;
use crate::multimap::Multimap;
use crate::types::{DataValue, FileContent, FileUpload, Item, Separator};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Options that shape how items are parsed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Body data will be serialized as form fields rather than JSON
    /// (default: false). Recorded on the result for downstream encoding;
    /// items are collected identically either way.
    pub as_form: bool,
    /// File uploads are opened as streaming handles rather than read into
    /// memory (default: false).
    pub chunked: bool,
}

// ---------------------------------------------------------------------------
// RequestItems
// ---------------------------------------------------------------------------

/// The parsed result: four order-preserving multimaps, one per target.
///
/// Populated once by [`RequestItems::parse`] and handed downstream; never
/// mutated afterwards.
///
/// # Usage
///
/// ```rust
/// use reqitem::{Item, ParseOptions, RequestItems, Separator};
///
/// let items = vec![
///     Item::new("Accept", Separator::Header, "application/json"),
///     Item::new("q", Separator::Query, "term"),
/// ];
/// let parsed = RequestItems::parse(items, &ParseOptions::default()).unwrap();
/// assert_eq!(parsed.headers.get("Accept"), Some(&Some("application/json".into())));
/// assert_eq!(parsed.params.get("q"), Some(&"term".to_string()));
/// ```
#[derive(Debug, Serialize)]
pub struct RequestItems {
    /// Header fields. `None` means "header present with no value".
    pub headers: Multimap<Option<String>>,
    /// Query-string parameters.
    pub params: Multimap<String>,
    /// Body data fields.
    pub data: Multimap<DataValue>,
    /// File uploads.
    pub files: Multimap<FileUpload>,
    /// Whether body data is destined for form encoding rather than JSON.
    #[serde(skip)]
    pub form: bool,
}

impl RequestItems {
    fn with_options(options: &ParseOptions) -> Self {
        Self {
            headers: Multimap::new(),
            params: Multimap::new(),
            data: Multimap::new(),
            files: Multimap::new(),
            form: options.as_form,
        }
    }

    /// Parse an ordered item sequence into the four collections.
    ///
    /// Items are processed strictly in input order; repeated keys append to
    /// the existing entry. The first failing item aborts the whole parse.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for file-access, encoding, JSON-decode, or
    /// validation failures; the diagnostic names the offending token.
    pub fn parse(items: Vec<Item>, options: &ParseOptions) -> Result<Self, ParseError> {
        let mut request_items = Self::with_options(options);
        for item in items {
            request_items.dispatch(item, options)?;
        }
        Ok(request_items)
    }

    /// Route one item, by separator, to its `(collection, parser)` pair.
    fn dispatch(&mut self, item: Item, options: &ParseOptions) -> Result<(), ParseError> {
        match item.separator {
            Separator::Header => {
                let value = parse_header_item(item.value);
                self.headers.insert(item.key, value);
            }
            Separator::HeaderEmpty => {
                let value = parse_empty_header_item(&item)?;
                self.headers.insert(item.key, value);
            }
            Separator::Query => {
                self.params.insert(item.key, item.value);
            }
            Separator::Data => {
                self.data.insert(item.key, DataValue::Text(item.value));
            }
            Separator::DataRawJson => {
                let value = load_json(&item, &item.value)?;
                self.data.insert(item.key, DataValue::Json(value));
            }
            Separator::Files => {
                // Re-read the flag per item; binding one parser up front
                // would make a per-invocation override unobservable.
                let upload = if options.chunked {
                    parse_file_item_streaming(&item)?
                } else {
                    parse_file_item_buffered(&item)?
                };
                self.files.insert(item.key, upload);
            }
            Separator::DataEmbedFile => {
                let text = load_text_file(&item)?;
                self.data.insert(item.key, DataValue::Text(text));
            }
            Separator::DataEmbedRawJsonFile => {
                let text = load_text_file(&item)?;
                let value = load_json(&item, &text)?;
                self.data.insert(item.key, DataValue::Json(value));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Value parsers (one per separator)
// ---------------------------------------------------------------------------

/// `:` — the string value, or `None` for "header with no value".
fn parse_header_item(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// `;` — the value must be empty; the stored header value is `None`.
fn parse_empty_header_item(item: &Item) -> Result<Option<String>, ParseError> {
    if item.value.is_empty() {
        Ok(None)
    } else {
        Err(ParseError::EmptyHeaderValue {
            token: item.orig.clone(),
        })
    }
}

/// `@` in buffered mode — read the whole file into memory.
fn parse_file_item_buffered(item: &Item) -> Result<FileUpload, ParseError> {
    let path = expand_user(&item.value);
    let bytes = fs::read(&path).map_err(|e| file_access_error(item, &e))?;
    Ok(FileUpload {
        filename: basename(&item.value),
        content: FileContent::Buffered(bytes),
        content_type: sniff_content_type(&item.value),
    })
}

/// `@` in chunked mode — open the file and hand over the unread handle.
/// The caller owns (and must close) the handle from here on.
fn parse_file_item_streaming(item: &Item) -> Result<FileUpload, ParseError> {
    let path = expand_user(&item.value);
    let handle = File::open(&path).map_err(|e| file_access_error(item, &e))?;
    Ok(FileUpload {
        filename: basename(&item.value),
        content: FileContent::Streaming(handle),
        content_type: sniff_content_type(&item.value),
    })
}

// ---------------------------------------------------------------------------
// File & JSON loaders
// ---------------------------------------------------------------------------

/// Read the file referenced by `item.value` and decode it as UTF-8 text.
fn load_text_file(item: &Item) -> Result<String, ParseError> {
    let path = expand_user(&item.value);
    let bytes = fs::read(&path).map_err(|e| file_access_error(item, &e))?;
    String::from_utf8(bytes).map_err(|_| ParseError::NotTextFile {
        token: item.orig.clone(),
        path: item.value.clone(),
    })
}

/// Decode `text` as a JSON value, preserving object key order.
fn load_json(item: &Item, text: &str) -> Result<serde_json::Value, ParseError> {
    serde_json::from_str(text).map_err(|e| ParseError::InvalidJson {
        token: item.orig.clone(),
        error: e.to_string(),
    })
}

fn file_access_error(item: &Item, error: &std::io::Error) -> ParseError {
    ParseError::FileAccess {
        token: item.orig.clone(),
        path: item.value.clone(),
        error: error.to_string(),
    }
}

/// MIME type for an upload, guessed from the filename extension.
fn sniff_content_type(filename: &str) -> String {
    new_mime_guess::from_path(filename)
        .first_or_octet_stream()
        .to_string()
}

/// The final path component, as typed (before tilde expansion).
fn basename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Expand a leading `~` or `~/` to the user's home directory.
fn expand_user(path: &str) -> PathBuf {
    expand_user_with(path, user_home_dir())
}

fn expand_user_with(path: &str, home: Option<PathBuf>) -> PathBuf {
    if let Some(home) = home {
        if path == "~" {
            return home;
        }
        if let Some(rest) = path.strip_prefix("~/") {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn user_home_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        if let Some(value) = std::env::var_os("USERPROFILE") {
            return Some(PathBuf::from(value));
        }
        if let (Some(drive), Some(path)) =
            (std::env::var_os("HOMEDRIVE"), std::env::var_os("HOMEPATH"))
        {
            let mut full = PathBuf::from(drive);
            full.push(path);
            return Some(full);
        }
    }

    std::env::var_os("HOME").map(PathBuf::from)
}

// ---------------------------------------------------------------------------
// Tests (unit)
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_user_handles_tilde_forms() {
        let home = Some(PathBuf::from("/home/alex"));
        assert_eq!(
            expand_user_with("~", home.clone()),
            PathBuf::from("/home/alex")
        );
        assert_eq!(
            expand_user_with("~/notes.txt", home.clone()),
            PathBuf::from("/home/alex/notes.txt")
        );
        // Interior and bare-prefix tildes pass through untouched.
        assert_eq!(
            expand_user_with("/tmp/~file", home.clone()),
            PathBuf::from("/tmp/~file")
        );
        assert_eq!(expand_user_with("~user/x", home), PathBuf::from("~user/x"));
    }

    #[test]
    fn expand_user_without_home_is_identity() {
        assert_eq!(expand_user_with("~/x", None), PathBuf::from("~/x"));
        assert_eq!(expand_user_with("~", None), PathBuf::from("~"));
    }

    #[test]
    fn basename_takes_final_component() {
        assert_eq!(basename("/a/b/report.pdf"), "report.pdf");
        assert_eq!(basename("report.pdf"), "report.pdf");
    }

    #[test]
    fn content_type_guessed_from_extension() {
        assert_eq!(sniff_content_type("data.json"), "application/json");
        assert_eq!(sniff_content_type("unknown.zzz"), "application/octet-stream");
    }

    #[test]
    fn header_value_parsers() {
        assert_eq!(parse_header_item("v".into()), Some("v".to_string()));
        assert_eq!(parse_header_item(String::new()), None);

        let ok = Item::new("X", Separator::HeaderEmpty, "");
        assert_eq!(parse_empty_header_item(&ok), Ok(None));

        let bad = Item::new("X", Separator::HeaderEmpty, "oops");
        assert_eq!(
            parse_empty_header_item(&bad),
            Err(ParseError::EmptyHeaderValue {
                token: "X;oops".to_string()
            })
        );
    }
}
