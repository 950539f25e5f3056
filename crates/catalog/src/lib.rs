//! Storefront Catalog
//!
//! Defines the data contracts behind every generated asset:
//! - **Clips:** demo subjects with a source video, gradient theme, and
//!   per-locale teleprompter lines
//! - **Languages:** ordered marketing copy (one record per clip) and
//!   optional font overrides
//! - **Devices:** canvas sizes per device family, plus video targets
//! - **Output naming:** deterministic card paths
//!
//! Copy tables are data, not code: the built-in catalog ships as an
//! embedded JSON document and any other catalog can be loaded from disk.

pub mod catalog;
pub mod clip;
pub mod color;
pub mod device;
pub mod language;
pub mod output;
pub mod video;

pub use catalog::*;
pub use clip::*;
pub use color::*;
pub use device::*;
pub use language::*;
pub use output::*;
pub use video::*;
