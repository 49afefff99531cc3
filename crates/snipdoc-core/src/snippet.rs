//! The snippet document wrapper.
//!
//! Wraps a standards-compliant HTML parser behind two operations: `load`
//! puts a caller-supplied fragment inside a synthetic document shell and
//! parses it; `serialize` extracts the fragment back out of the parsed
//! tree, normalized by the parser's error recovery.
//!
//! The shell declares UTF-8 explicitly and tags the wrapper element with a
//! reserved id, so byte-level consumers decode correctly and the caller's
//! content has a stable anchor for re-extraction.

use std::fmt;

use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{parse_document, ParseOpts};
use log::{debug, warn};
use markup5ever_rcdom::{Handle, RcDom, SerializableHandle};
use memchr::memmem;

use crate::dom::find_element_by_id;
use crate::error::SnippetError;

/// Reserved `id` value used to tag the synthetic wrapper element.
///
/// Fragments containing this token collide with the wrapper; the library
/// does not defend against that (a debug-level log line is emitted, nothing
/// more). Preorder lookup means the synthetic wrapper still wins.
pub const CONTENT_ID: &str = "__contentID";

/// A parser/serializer wrapper for HTML fragments.
///
/// Holds at most one parsed tree, replaced wholesale on every [`load`].
/// One instance per concurrent fragment; there is no internal
/// synchronization and none is needed for the intended
/// load-then-serialize cycle.
///
/// # Example
///
/// ```rust
/// use snipdoc_core::SnippetDocument;
///
/// let mut doc = SnippetDocument::new();
/// doc.load("<p>one<p>two");
/// assert_eq!(doc.serialize().unwrap(), "<p>one</p><p>two</p>");
/// ```
///
/// [`load`]: SnippetDocument::load
#[derive(Default)]
pub struct SnippetDocument {
    dom: Option<RcDom>,
}

impl SnippetDocument {
    /// Create an empty snippet document with no tree loaded.
    pub fn new() -> Self {
        Self { dom: None }
    }

    /// Parse an HTML fragment, replacing any previously held tree.
    ///
    /// The fragment is wrapped in a full document shell with an explicit
    /// UTF-8 declaration and a marked wrapper `div`, then handed to the
    /// HTML parser. Malformed markup never fails: unknown or unclosed tags
    /// are auto-closed, entities are normalized, and invalid nesting is
    /// repaired per the standard error-recovery algorithm. Whatever the
    /// parser had to repair is available afterwards from
    /// [`parse_errors`](SnippetDocument::parse_errors).
    pub fn load(&mut self, fragment: &str) {
        if memmem::find(fragment.as_bytes(), CONTENT_ID.as_bytes()).is_some() {
            debug!(
                "fragment already contains the marker token {:?}; extraction may not return the caller's content",
                CONTENT_ID
            );
        }

        let shell = wrap_fragment(fragment);
        let opts = ParseOpts {
            tree_builder: TreeBuilderOpts {
                // The shell deliberately carries no doctype; parsing it like
                // an iframe srcdoc document keeps that omission out of the
                // recovery diagnostics and out of quirks mode.
                iframe_srcdoc: true,
                // No script execution here, so <noscript> content parses as
                // markup rather than raw text.
                scripting_enabled: false,
                ..TreeBuilderOpts::default()
            },
            ..ParseOpts::default()
        };
        self.dom = Some(parse_document(RcDom::default(), opts).one(shell.as_str()));
    }

    /// Parse an HTML fragment supplied as raw bytes.
    ///
    /// Bytes are decoded as UTF-8 up front (a leading byte-order mark is
    /// honored, malformed sequences are replaced) rather than letting any
    /// downstream consumer sniff an encoding. This is the byte-level face
    /// of the shell's forced UTF-8 declaration.
    pub fn load_bytes(&mut self, bytes: &[u8]) {
        let (text, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
        if had_errors {
            debug!("fragment bytes contained malformed UTF-8; offending sequences were replaced");
        }
        self.load(&text);
    }

    /// Whether a tree is currently held.
    pub fn is_loaded(&self) -> bool {
        self.dom.is_some()
    }

    /// Recovery diagnostics collected by the parser during the last `load`.
    ///
    /// Empty for well-formed fragments and before any load. Diagnostics are
    /// informational: they never affect the tree or the serialized output.
    pub fn parse_errors(&self) -> Vec<String> {
        match &self.dom {
            Some(dom) => dom.errors.iter().map(|err| err.to_string()).collect(),
            None => Vec::new(),
        }
    }

    /// The marker element wrapping the caller's content.
    ///
    /// Its children are the parse of the loaded fragment; callers who want
    /// to sidestep string-level unwrapping entirely can serialize those
    /// children themselves (see [`serialize_node`]). Fails if no fragment
    /// was loaded.
    ///
    /// [`serialize_node`]: SnippetDocument::serialize_node
    pub fn content_root(&self) -> Result<Handle, SnippetError> {
        let dom = self
            .dom
            .as_ref()
            .ok_or_else(|| SnippetError::marker_missing(CONTENT_ID))?;
        find_element_by_id(&dom.document, CONTENT_ID)
            .ok_or_else(|| SnippetError::marker_missing(CONTENT_ID))
    }

    /// Serialize the loaded fragment, stripping the synthetic wrapper.
    ///
    /// The marker element's subtree is serialized with explicit end tags
    /// (`<div></div>`, never `<div/>`), then the wrapper tag is stripped by
    /// exact prefix/suffix matching. A mismatch is non-fatal: the
    /// unstripped string is returned and a warning is logged.
    ///
    /// Calling this before any [`load`](SnippetDocument::load) is a
    /// contract violation and fails with
    /// [`SnippetErrorKind::MarkerMissing`](crate::SnippetErrorKind::MarkerMissing).
    pub fn serialize(&self) -> Result<String, SnippetError> {
        let content = self.content_root()?;
        // Default opts serialize children only; the strip step needs the
        // marker's own tag in the output.
        let opts = SerializeOpts {
            traversal_scope: TraversalScope::IncludeNode,
            ..SerializeOpts::default()
        };
        let subtree = self.serialize_node(&content, opts)?;
        Ok(strip_wrapper(subtree))
    }

    /// Serialize a specific node with caller-supplied options.
    ///
    /// Direct passthrough to the underlying serializer: no wrapper
    /// stripping is applied, and any handle serializes standalone. Note
    /// that `SerializeOpts::default()` emits children only; pass
    /// [`TraversalScope::IncludeNode`](crate::TraversalScope) to include
    /// the node's own tag.
    pub fn serialize_node(
        &self,
        node: &Handle,
        opts: SerializeOpts,
    ) -> Result<String, SnippetError> {
        let mut buf = Vec::new();
        let serializable = SerializableHandle::from(node.clone());
        serialize(&mut buf, &serializable, opts).map_err(SnippetError::serializer)?;
        String::from_utf8(buf).map_err(SnippetError::encoding)
    }
}

impl fmt::Debug for SnippetDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnippetDocument")
            .field("loaded", &self.dom.is_some())
            .finish()
    }
}

/// One-shot round trip: load `fragment` into a fresh document and
/// serialize it back, normalized.
///
/// # Example
///
/// ```rust
/// let normalized = snipdoc_core::roundtrip("<b>hi").unwrap();
/// assert_eq!(normalized, "<b>hi</b>");
/// ```
pub fn roundtrip(fragment: &str) -> Result<String, SnippetError> {
    let mut doc = SnippetDocument::new();
    doc.load(fragment);
    doc.serialize()
}

/// Build the synthetic document shell around a fragment.
///
/// Same shape as the historical wrapper: explicit UTF-8 meta declaration,
/// newline before `<body>`, marker div opened directly against the fragment
/// so no whitespace is introduced inside it. The marker id is double-quoted
/// the way the serializer itself quotes attributes, which keeps the strip
/// pattern an exact match.
fn wrap_fragment(fragment: &str) -> String {
    format!(
        "<html><head><meta content=\"text/html; charset=utf-8\" http-equiv=\"Content-Type\"></head>\n<body><div id=\"{}\">{}</div></body></html>",
        CONTENT_ID, fragment
    )
}

/// Strip the wrapper tag from a serialized marker subtree.
///
/// Exact prefix/suffix match on `<div id="__contentID">` ... `</div>`; on
/// a mismatch the input is returned unstripped (non-fatal, but worth a
/// warning since it means the serializer's output shape changed).
fn strip_wrapper(serialized: String) -> String {
    let prefix = format!("<div id=\"{}\">", CONTENT_ID);
    match serialized
        .strip_prefix(prefix.as_str())
        .and_then(|rest| rest.strip_suffix("</div>"))
    {
        Some(inner) => inner.to_string(),
        None => {
            warn!("wrapper pattern did not match the serialized subtree; returning it unstripped");
            serialized
        }
    }
}
