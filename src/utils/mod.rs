//! Common utilities and helpers

pub mod logging;
pub mod name;
pub mod number;
