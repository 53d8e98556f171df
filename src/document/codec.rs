//! Document codec: front matter + body <-> blob bytes.
//!
//! The encoded form is a `+++`-delimited TOML metadata block followed by the
//! raw body:
//!
//! ```text
//! +++
//! title = "Welcome"
//! draft = true
//! +++
//! The body starts here.
//! ```
//!
//! Encoding is byte-stable for identical inputs (fixed field order, defaults
//! omitted), which the object store relies on for reproducible content ids.
//! A document with blank metadata encodes to just its body, so the empty
//! document encodes to an empty blob - the payload used for placeholder files.

use crate::document::{Document, FrontMatter};
use crate::store::{StoreError, StoreResult};

const DELIMITER: &str = "+++\n";

/// encode a document into a single blob payload
pub fn encode(doc: &Document) -> StoreResult<Vec<u8>> {
    if doc.front_matter.is_blank() {
        // body-only form, unless the body itself would parse as a front
        // matter block - then an explicit empty block keeps decode exact
        if !doc.body.starts_with(DELIMITER) && doc.body != "+++" {
            return Ok(doc.body.clone().into_bytes());
        }
    }

    let meta = toml::to_string(&doc.front_matter)
        .map_err(|e| StoreError::Internal(format!("front matter serialization failed: {}", e)))?;

    let mut out = String::with_capacity(DELIMITER.len() * 2 + meta.len() + doc.body.len());
    out.push_str(DELIMITER);
    out.push_str(&meta);
    out.push_str(DELIMITER);
    out.push_str(&doc.body);
    Ok(out.into_bytes())
}

/// decode a blob payload back into a document.
///
/// `path` is only used for error context. Content without an opening
/// delimiter is a body-only document with blank metadata (this covers the
/// empty placeholder blob). A present-but-unterminated or malformed metadata
/// block fails with a decode error rather than silently dropping fields.
pub fn decode(path: &str, bytes: &[u8]) -> StoreResult<Document> {
    let text = std::str::from_utf8(bytes).map_err(|e| StoreError::Decode {
        path: path.to_string(),
        reason: format!("invalid utf-8: {}", e),
    })?;

    let Some(rest) = text.strip_prefix(DELIMITER) else {
        return Ok(Document::new(FrontMatter::default(), text));
    };

    let (meta, body) = if let Some(body) = rest.strip_prefix(DELIMITER) {
        // empty metadata block
        ("", body)
    } else if let Some(idx) = rest.find("\n+++\n") {
        (&rest[..idx + 1], &rest[idx + 5..])
    } else {
        return Err(StoreError::Decode {
            path: path.to_string(),
            reason: "unterminated front matter block".to_string(),
        });
    };

    let front_matter: FrontMatter = toml::from_str(meta).map_err(|e| StoreError::Decode {
        path: path.to_string(),
        reason: format!("malformed front matter: {}", e),
    })?;

    Ok(Document::new(front_matter, body))
}
