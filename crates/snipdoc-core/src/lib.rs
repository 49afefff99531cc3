//! # SnipDoc Core
//!
//! A round-tripper for HTML fragments built on a standards-compliant parser.
//!
//! SnipDoc wraps a fragment in a synthetic full-document shell with a forced
//! UTF-8 declaration, parses it with WHATWG error recovery, and extracts the
//! fragment back out via a marked wrapper element. Malformed input never
//! fails: it comes back repaired.
//!
//! ## Quick Start
//!
//! ```rust
//! use snipdoc_core::SnippetDocument;
//!
//! let mut doc = SnippetDocument::new();
//! doc.load("<b>hi");
//! let normalized = doc.serialize().unwrap();
//!
//! assert_eq!(normalized, "<b>hi</b>");
//! ```
//!
//! ## Recovery Diagnostics
//!
//! Whatever the parser had to repair is reported, without ever affecting
//! the output:
//!
//! ```rust
//! use snipdoc_core::SnippetDocument;
//!
//! let mut doc = SnippetDocument::new();
//! doc.load("<p>one<p>two");
//!
//! // The tree is still built; diagnostics are collected on the side.
//! println!("Repairs: {}", doc.parse_errors().len());
//! ```
//!
//! ## Direct Node Access
//!
//! Callers who want more than the whole-fragment string can walk the tree
//! themselves and serialize any node with custom options (the default
//! options emit children only):
//!
//! ```rust
//! use snipdoc_core::{SerializeOpts, SnippetDocument, TraversalScope};
//!
//! let mut doc = SnippetDocument::new();
//! doc.load("<p>text</p>");
//! let content = doc.content_root().unwrap();
//! let child = content.children.borrow()[0].clone();
//!
//! let opts = SerializeOpts {
//!     traversal_scope: TraversalScope::IncludeNode,
//!     ..SerializeOpts::default()
//! };
//! let html = doc.serialize_node(&child, opts).unwrap();
//! assert_eq!(html, "<p>text</p>");
//! ```

pub mod dom;
pub mod error;
pub mod snippet;

pub use error::{SnippetError, SnippetErrorKind};
pub use snippet::{roundtrip, SnippetDocument, CONTENT_ID};

// Re-exported so callers of `serialize_node` and the tree helpers do not
// need a direct dependency on the parser crates.
pub use html5ever::serialize::{SerializeOpts, TraversalScope};
pub use markup5ever_rcdom::{Handle, NodeData};
