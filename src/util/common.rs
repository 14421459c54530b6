//! Persistence helpers for pipeline stages
//!
//! Each function performs one filesystem operation, logs one `INFO` event on
//! success and propagates the underlying failure otherwise. Paths are checked
//! before any I/O is attempted.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use super::config_box::ConfigBox;
use super::constants::{
    ARTIFACT_HEADER_LEN, ARTIFACT_MAGIC, ARTIFACT_VERSION, BYTES_PER_KB, JSON_INDENT,
};
use crate::error::{ArtifactError, Result};

// ═══════════════════════════════════════════════════════════════════════════
// CONFIG
// ═══════════════════════════════════════════════════════════════════════════

/// Load a YAML file into a [`ConfigBox`]
///
/// # Errors
///
/// - [`ArtifactError::EmptyConfig`] when the document has no content
/// - [`ArtifactError::NotAMapping`] when the root is a list or scalar
/// - [`ArtifactError::Io`] / [`ArtifactError::YamlParse`] otherwise
pub fn read_config(path: impl AsRef<Path>) -> Result<ConfigBox> {
    let path = path.as_ref();
    require_path("path", path)?;

    let text = fs::read_to_string(path)?;
    let origin = path.display().to_string();

    if !has_yaml_content(&text) {
        return Err(ArtifactError::EmptyConfig { path: origin });
    }

    let mut document: serde_yaml::Value = serde_yaml::from_str(&text)?;
    if document.is_null() {
        return Err(ArtifactError::EmptyConfig { path: origin });
    }

    // `<<: *anchor` keys are expanded the way YAML loaders do
    document.apply_merge()?;
    require_finite(&document, "")?;

    // Non-string scalar keys (`1: a`) become strings in the JSON model
    let value = serde_json::to_value(document)?;
    let config = ConfigBox::from_value(value, &origin)?;

    tracing::info!(path = %path.display(), "YAML file loaded successfully");
    Ok(config)
}

/// The JSON model has no NaN or infinity, so `.nan` / `.inf` are rejected
/// instead of silently becoming `null`
fn require_finite(value: &serde_yaml::Value, at: &str) -> Result<()> {
    use serde_yaml::Value as Yaml;

    let child = |key: String| {
        if at.is_empty() {
            key
        } else {
            format!("{at}.{key}")
        }
    };

    match value {
        Yaml::Number(n) => match n.as_f64() {
            Some(f) if !f.is_finite() => Err(ArtifactError::TypeMismatch {
                key: at.to_string(),
                expected: "a finite number".to_string(),
                found: if f.is_nan() { "NaN" } else { "infinity" }.to_string(),
            }),
            _ => Ok(()),
        },
        Yaml::Sequence(items) => items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| require_finite(item, &format!("{at}[{i}]"))),
        Yaml::Mapping(map) => map.iter().try_for_each(|(key, item)| {
            let key = match key {
                Yaml::String(s) => s.clone(),
                other => serde_yaml::to_string(other)?.trim_end().to_string(),
            };
            require_finite(item, &child(key))
        }),
        Yaml::Tagged(tagged) => require_finite(&tagged.value, at),
        Yaml::Null | Yaml::Bool(_) | Yaml::String(_) => Ok(()),
    }
}

/// True when the text holds anything besides blank lines, comments and
/// document markers
fn has_yaml_content(text: &str) -> bool {
    text.lines().map(str::trim).any(|line| {
        !(line.is_empty() || line.starts_with('#') || line == "---" || line == "...")
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// DIRECTORIES
// ═══════════════════════════════════════════════════════════════════════════

/// Create every directory in `paths`, including missing parents
///
/// Existing directories are left alone. All entries are validated before
/// the first directory is created.
pub fn ensure_directories<P: AsRef<Path>>(paths: &[P], verbose: bool) -> Result<()> {
    for path in paths {
        require_path("paths", path.as_ref())?;
    }

    for path in paths {
        let path = path.as_ref();
        fs::create_dir_all(path)?;
        if verbose {
            tracing::info!(path = %path.display(), "Created directory");
        }
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// JSON
// ═══════════════════════════════════════════════════════════════════════════

/// Write a mapping as 4-space indented JSON, replacing any existing file
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, data: &T) -> Result<()> {
    let path = path.as_ref();
    require_write_target("path", path)?;

    let value = serde_json::to_value(data)?;
    if !value.is_object() {
        return Err(ArtifactError::invalid_argument(
            "data",
            format!("expected a mapping, got {}", super::path::type_name(&value)),
        ));
    }

    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;

    write_atomic(path, &buf)?;

    tracing::info!(path = %path.display(), "JSON file saved");
    Ok(())
}

/// Load a JSON mapping into a [`ConfigBox`]
pub fn read_json(path: impl AsRef<Path>) -> Result<ConfigBox> {
    let path = path.as_ref();
    require_path("path", path)?;

    let text = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&text)?;
    let config = ConfigBox::from_value(value, &path.display().to_string())?;

    tracing::info!(path = %path.display(), "JSON file loaded");
    Ok(config)
}

// ═══════════════════════════════════════════════════════════════════════════
// BINARY ARTIFACTS
// ═══════════════════════════════════════════════════════════════════════════

/// Serialize a value to a binary artifact, replacing any existing file
///
/// Layout: `AIOB` magic, little-endian `u16` version, postcard payload.
pub fn write_binary<T: Serialize + ?Sized>(path: impl AsRef<Path>, data: &T) -> Result<()> {
    let path = path.as_ref();
    require_write_target("path", path)?;

    let payload = postcard::to_stdvec(data)?;
    let mut bytes = Vec::with_capacity(ARTIFACT_HEADER_LEN + payload.len());
    bytes.extend_from_slice(&ARTIFACT_MAGIC);
    bytes.extend_from_slice(&ARTIFACT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&payload);

    write_atomic(path, &bytes)?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "Binary file saved");
    Ok(())
}

/// Deserialize a value from an artifact written by [`write_binary`]
pub fn read_binary<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    require_path("path", path)?;

    let bytes = fs::read(path)?;
    if bytes.len() < ARTIFACT_HEADER_LEN {
        return Err(ArtifactError::artifact_format(path, "file is shorter than the header"));
    }

    let (header, payload) = bytes.split_at(ARTIFACT_HEADER_LEN);
    if header[..ARTIFACT_MAGIC.len()] != ARTIFACT_MAGIC {
        return Err(ArtifactError::artifact_format(path, "missing artifact magic"));
    }

    let version = u16::from_le_bytes([header[4], header[5]]);
    if version != ARTIFACT_VERSION {
        return Err(ArtifactError::artifact_format(
            path,
            format!("unsupported format version {version} (expected {ARTIFACT_VERSION})"),
        ));
    }

    let (data, rest) = postcard::take_from_bytes(payload)?;
    if !rest.is_empty() {
        return Err(ArtifactError::artifact_format(
            path,
            format!("{} unexpected trailing bytes after the payload", rest.len()),
        ));
    }

    tracing::info!(path = %path.display(), "Binary file loaded");
    Ok(data)
}

// ═══════════════════════════════════════════════════════════════════════════
// SIZES
// ═══════════════════════════════════════════════════════════════════════════

/// Human-readable size in kilobytes, e.g. `"2 KB"`
///
/// Directories report the total of the files beneath them.
pub fn file_size(path: impl AsRef<Path>) -> Result<String> {
    let kb = file_size_kb(path)?;
    Ok(format!("{kb} KB"))
}

/// Size in kilobytes, rounded half to even
pub fn file_size_kb(path: impl AsRef<Path>) -> Result<u64> {
    let path = path.as_ref();
    require_path("path", path)?;

    let metadata = fs::metadata(path)?;
    let bytes = if metadata.is_dir() {
        dir_size(path)?
    } else {
        metadata.len()
    };

    Ok(bytes_to_kb(bytes))
}

/// Total bytes of all regular files under `path`
pub fn dir_size(path: impl AsRef<Path>) -> Result<u64> {
    let path = path.as_ref();
    require_path("path", path)?;

    let mut total = 0;
    for entry in WalkDir::new(path) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() {
            total += entry.metadata().map_err(std::io::Error::from)?.len();
        }
    }

    tracing::debug!(path = %path.display(), bytes = total, "Measured directory");
    Ok(total)
}

fn bytes_to_kb(bytes: u64) -> u64 {
    (bytes as f64 / BYTES_PER_KB).round_ties_even() as u64
}

// ═══════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════

fn require_path(param: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(ArtifactError::invalid_argument(param, "path must not be empty"));
    }
    Ok(())
}

fn require_write_target(param: &str, path: &Path) -> Result<()> {
    require_path(param, path)?;
    if path.is_dir() {
        return Err(ArtifactError::invalid_argument(
            param,
            format!("'{}' is a directory", path.display()),
        ));
    }
    Ok(())
}

/// Write to a uniquely named temp file beside the target, then rename over it
///
/// The temp file is removed when any step fails.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Atomic write complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn kb_rounding_matches_half_even() {
        assert_eq!(bytes_to_kb(0), 0);
        assert_eq!(bytes_to_kb(511), 0);
        assert_eq!(bytes_to_kb(512), 0);
        assert_eq!(bytes_to_kb(1536), 2);
        assert_eq!(bytes_to_kb(2048), 2);
        assert_eq!(bytes_to_kb(2560), 2);
        assert_eq!(bytes_to_kb(2561), 3);
    }

    #[test]
    fn yaml_content_detection() {
        assert!(!has_yaml_content(""));
        assert!(!has_yaml_content("\n   \n"));
        assert!(!has_yaml_content("# just a comment\n---\n"));
        assert!(has_yaml_content("a: 1"));
    }

    fn entry_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out.bin");
        write_atomic(&target, b"payload").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"payload");
        assert_eq!(entry_names(dir.path()), vec!["out.bin"]);
    }

    #[test]
    fn atomic_write_keeps_unrelated_tmp_sibling() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("scores.json");
        let sibling = dir.path().join("scores.json.tmp");
        fs::write(&sibling, b"user data").unwrap();

        write_atomic(&target, b"{}").unwrap();

        assert_eq!(fs::read(&sibling).unwrap(), b"user data");
        assert_eq!(fs::read(&target).unwrap(), b"{}");
    }

    #[test]
    fn atomic_write_into_missing_dir_fails_cleanly() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("missing").join("out.json");
        let err = write_atomic(&target, b"{}").unwrap_err();

        assert!(matches!(err, ArtifactError::Io(_)));
        assert_eq!(entry_names(dir.path()), Vec::<String>::new());
    }

    #[test]
    fn non_finite_numbers_report_their_path() {
        let doc: serde_yaml::Value =
            serde_yaml::from_str("train:\n  tols: [0.1, .inf]\n").unwrap();

        match require_finite(&doc, "").unwrap_err() {
            ArtifactError::TypeMismatch { key, found, .. } => {
                assert_eq!(key, "train.tols[1]");
                assert_eq!(found, "infinity");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_path_is_rejected_before_io() {
        let err = read_json("").unwrap_err();
        assert!(matches!(err, ArtifactError::InvalidArgument { param, .. } if param == "path"));
    }
}
