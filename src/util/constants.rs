//! Centralized format constants
//!
//! On-disk format values in one place so readers and writers agree.

// ═══════════════════════════════════════════════════════════════
// JSON Documents
// ═══════════════════════════════════════════════════════════════

/// Indentation used when pretty-printing JSON documents
pub const JSON_INDENT: &[u8] = b"    ";

// ═══════════════════════════════════════════════════════════════
// Binary Artifacts
// ═══════════════════════════════════════════════════════════════

/// Leading bytes of every binary artifact
pub const ARTIFACT_MAGIC: [u8; 4] = *b"AIOB";

/// Current binary artifact format version
pub const ARTIFACT_VERSION: u16 = 1;

/// Magic plus little-endian version
pub const ARTIFACT_HEADER_LEN: usize = ARTIFACT_MAGIC.len() + 2;

// ═══════════════════════════════════════════════════════════════
// Sizes
// ═══════════════════════════════════════════════════════════════

/// Bytes per kilobyte for size reporting
pub const BYTES_PER_KB: f64 = 1024.0;

// ═══════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════
