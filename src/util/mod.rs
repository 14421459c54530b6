//! Utilities Module - persistence helpers for pipeline stages
//!
//! - `common`: config loading, directory creation, JSON/binary persistence, sizes
//! - `config_box`: attribute-accessible mapping returned by the loaders
//! - `constants`: on-disk format values
//! - `path`: dotted key path parser used by `ConfigBox`

pub mod common;
pub mod config_box;
pub mod constants;
pub mod path;

// Re-export public types
pub use common::{
    dir_size, ensure_directories, file_size, file_size_kb, read_binary, read_config, read_json,
    write_binary, write_json,
};
pub use config_box::ConfigBox;
