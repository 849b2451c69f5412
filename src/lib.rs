//! # maildraft
//!
//! Convert legacy HTML email markup into an editor-ready design document.
//!
//! The converter ingests an arbitrary (often table-based) HTML email and
//! produces a typed tree of rows, columns and content blocks with resolved
//! style attributes, ready for a visual drag-and-drop template editor to
//! load as JSON.
//!
//! ## Quick Start
//!
//! ```
//! let html = r#"<table class="es-content-body"><tr><td>
//!     <p style="font-size: 18px">Welcome!</p>
//! </td></tr></table>"#;
//!
//! let doc = maildraft::convert(html).unwrap();
//! assert_eq!(doc.counters.row, 1);
//! let json = doc.to_json().unwrap();
//! assert!(json.contains("\"schemaVersion\":16"));
//! ```
//!
//! ## How it works
//!
//! A conversion is a single synchronous pass with four stages:
//!
//! 1. every `<style>` block is parsed into a selector → declarations index;
//! 2. per-element effective styles merge inline declarations, matched index
//!    rules, legacy presentational attributes, and baseline defaults;
//! 3. row and column containers are inferred from the raw DOM with a
//!    prioritized set of structural heuristics;
//! 4. each column's subtree is classified into text / image / button blocks.
//!
//! Empty columns and rows are discarded, then a final pass recounts every
//! block so ids and the top-level counters always agree.
//!
//! Malformed style blocks and unsupported selectors are skipped with a
//! warning via the [`log`] facade; only input the HTML parser cannot make a
//! document out of fails the conversion.
//!
//! ## Deterministic output
//!
//! Row, column and block ids default to opaque random tokens. Inject
//! [`SequentialIds`] through [`convert_with_ids`] when byte-identical output
//! matters:
//!
//! ```
//! use maildraft::{SequentialIds, convert_with_ids};
//!
//! let html = "<table class=\"es-content-body\"><tr><td><p>Hi</p></td></tr></table>";
//! let mut ids = SequentialIds::new();
//! let a = convert_with_ids(html, &mut ids).unwrap();
//! let mut ids = SequentialIds::new();
//! let b = convert_with_ids(html, &mut ids).unwrap();
//! assert_eq!(a, b);
//! ```

pub mod convert;
pub mod css;
pub mod document;
pub mod dom;
pub mod error;
pub mod ids;
pub mod style;
pub(crate) mod util;

pub use convert::{convert, convert_with_ids};
pub use document::{Body, Column, ContentBlock, Counters, DesignDocument, Row, SCHEMA_VERSION};
pub use error::{Error, Result};
pub use ids::{IdSource, SequentialIds, TokenIds};
