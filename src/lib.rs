//! # reqitem
//!
//! A parser for the **HTTPie-style request-item mini-language**: a flat,
//! ordered sequence of `key<separator>value` command-line tokens becomes
//! four structured collections — headers, query parameters, body data, and
//! file uploads — ready to hand to an HTTP request builder.
//!
//! Eight separators are recognized: `:` header, `;` empty header, `==`
//! query parameter, `=` data field, `:=` raw-JSON data, `@` file upload,
//! `=@` embed-text-file, and `:=@` embed-JSON-file. Every collection is an
//! order-preserving multimap: repeated keys accumulate values instead of
//! overwriting.
//!
//! ## Quick start — pre-resolved items
//!
//! ```rust
//! use reqitem::{parse_items, Item, Separator};
//!
//! let items = vec![
//!     Item::new("Accept", Separator::Header, "application/json"),
//!     Item::new("q", Separator::Query, "term"),
//!     Item::new("n", Separator::DataRawJson, "[1,2,3]"),
//! ];
//! let parsed = parse_items(items).expect("valid items");
//! assert_eq!(parsed.params.get("q"), Some(&"term".to_string()));
//! ```
//!
//! ## Quick start — raw tokens
//!
//! ```rust
//! use reqitem::{parse_items, Item};
//!
//! let items: Vec<Item> = ["Accept:application/json", "a=b"]
//!     .into_iter()
//!     .filter_map(Item::parse)
//!     .collect();
//! let parsed = parse_items(items).expect("valid items");
//! assert_eq!(parsed.data.len(), 1);
//! ```

mod error;
mod multimap;
mod output;
mod parser;
mod types;

// Re-export public API.
pub use error::ParseError;
pub use multimap::Multimap;
pub use output::{format_debug, format_json};
pub use parser::{ParseOptions, RequestItems};
pub use types::{DataValue, FileContent, FileUpload, Item, Separator};

/// Parse an ordered item sequence with default options (JSON body,
/// buffered uploads).
///
/// This is a convenience wrapper around [`RequestItems::parse`].
///
/// # Errors
///
/// Returns [`ParseError`] if any item fails; no partial result is kept.
pub fn parse_items(items: Vec<Item>) -> Result<RequestItems, ParseError> {
    RequestItems::parse(items, &ParseOptions::default())
}

/// Parse an ordered item sequence with explicit [`ParseOptions`].
///
/// # Errors
///
/// Returns [`ParseError`] if any item fails; no partial result is kept.
pub fn parse_items_with_options(
    items: Vec<Item>,
    options: ParseOptions,
) -> Result<RequestItems, ParseError> {
    RequestItems::parse(items, &options)
}
