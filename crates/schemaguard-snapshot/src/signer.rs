//! # Tamper-Evident Signatures
//!
//! Snapshot files are machine-generated and committed to version control. A
//! hand-edited snapshot could silently hide an approved breaking change, so
//! every snapshot carries a signature that is a deterministic function of the
//! rest of its content.
//!
//! The signature is not a secret. The signing token is public and anyone can
//! re-sign a file; the point is only that an edit made *without* re-running
//! the generator is detected.
//!
//! ## Format
//!
//! An unsigned text contains the [`SIGNING_TOKEN`] exactly where the signature
//! will go. Signing hashes that text with SHA-256 and replaces the first
//! occurrence of the token with:
//!
//! ```text
//! @generated SignedSnapshot<<0f1e...64 lowercase hex digits...>>
//! ```
//!
//! Verification finds the first signature, puts the token back, hashes, and
//! compares.
//!
//! ## Example
//!
//! ```rust
//! use schemaguard_snapshot::signer::{sign, verify};
//!
//! let signed = sign("hello");
//! assert!(verify(&signed));
//! assert!(!verify(&signed.replace("hello", "hullo")));
//! assert!(!verify("hello"));
//! ```

use crate::models::{Hash, LINE_ENDING};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

/// Public marker embedded in every file before it is signed.
pub const SIGNING_TOKEN: &str = "@generated <<SignedSnapshot::unsigned>>";

const SIGNATURE_PATTERN: &str = r"@generated SignedSnapshot<<([0-9a-f]{64})>>";

fn signature_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(SIGNATURE_PATTERN).expect("signature pattern is valid"))
}

/// Returns the public signing token.
pub fn signing_token() -> &'static str {
    SIGNING_TOKEN
}

/// Signs `text`.
///
/// The first [`SIGNING_TOKEN`] in `text` is replaced by the signature. A text
/// without the token gets a `# <token>` header line prepended first, so
/// `"b"` and `"# <token>\nb"` sign to the same output. Callers that need
/// distinct bodies to sign distinctly should always embed the token, as
/// [`build`](crate::build) does.
///
/// A signature already present is part of the signed content: signing a
/// signed text adds a second signature rather than replacing the first.
pub fn sign(text: &str) -> String {
    let unsigned = if text.contains(SIGNING_TOKEN) {
        text.to_string()
    } else {
        format!("# {}{}{}", SIGNING_TOKEN, LINE_ENDING, text)
    };

    let signature = signature_marker(&digest(&unsigned));
    unsigned.replacen(SIGNING_TOKEN, &signature, 1)
}

/// Checks the embedded signature of `text`.
///
/// Returns `false` for any text without a well-formed signature; an unsigned
/// or garbled file is untrusted, not an error.
pub fn verify(text: &str) -> bool {
    let Some(captures) = signature_regex().captures(text) else {
        return false;
    };
    let (Some(whole), Some(embedded)) = (captures.get(0), captures.get(1)) else {
        return false;
    };

    let mut unsigned = String::with_capacity(text.len());
    unsigned.push_str(&text[..whole.start()]);
    unsigned.push_str(SIGNING_TOKEN);
    unsigned.push_str(&text[whole.end()..]);

    hex::encode(digest(&unsigned)) == embedded.as_str()
}

/// Extracts the hex signature embedded in `text`, if any.
pub fn extract_signature(text: &str) -> Option<String> {
    signature_regex()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn signature_marker(digest: &Hash) -> String {
    format!("@generated SignedSnapshot<<{}>>", hex::encode(digest))
}

fn digest(text: &str) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher.finalize().into()
}
