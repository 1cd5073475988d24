//! Minimal, allocation-light debug tracing.
//!
//! Mirrors the engine's own `info string debug <msg>` convention: tracing is
//! opt-in per call site via a `bool` rather than a global logger, and writes
//! straight to stderr so it never interleaves with a consumer's own stdout
//! protocol.

use std::io::{self, Write};

/// Writes `message` to stderr if `enabled`, prefixed so it is easy to grep
/// for among other diagnostic output.
pub fn trace(enabled: bool, message: &str) {
    if enabled {
        let _ = writeln!(io::stderr(), "zugzwang: debug {message}");
    }
}
