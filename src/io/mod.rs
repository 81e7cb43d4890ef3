//! Plan export.

pub mod export;
