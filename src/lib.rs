//! MStyle Library
//!
//! Codecs for the slash-delimited media style command language. A style's
//! command string (`imageView2/1/w/240/h/180`, `$0.mp4?vframe/jpg/offset/1`,
//! ...) is parsed into a typed, validated form, regenerated in canonical
//! form, and classified into the edit mode that can represent it.

pub mod cli;
pub mod codec;
pub mod config;
pub mod domain;
pub mod error;
pub mod utils;

// Re-export commonly used types
pub use codec::StyleCodec;
pub use domain::errors::{CommandError, CommandResult, ErrorKind};
pub use domain::model::{Gravity, Style, StyleType};
pub use domain::rules::{BatchEntry, StyleBatch, StyleClassifier, StyleForm};
pub use error::{MediaStyleError, MediaStyleResult};
