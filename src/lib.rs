//! artifact-io - config, JSON and binary artifact persistence for ML pipelines

pub mod error;
pub mod logging;
pub mod util;

pub use error::{ArtifactError, FixSuggestion, Result};
pub use util::{
    dir_size, ensure_directories, file_size, file_size_kb, read_binary, read_config, read_json,
    write_binary, write_json, ConfigBox,
};
