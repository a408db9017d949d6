// src/config/mod.rs

//! Configuration: raw file model, argument splitting, validation, loading.

pub mod args;
pub mod loader;
pub mod model;
pub mod validate;

pub use args::split_args;
pub use loader::{ConfigFormat, load_and_validate, load_from_path, parse_str};
pub use model::{ConfigFile, RawConfigFile, RawStreamConfig, StreamConfig};
pub use validate::{InputMode, validate_stream};
