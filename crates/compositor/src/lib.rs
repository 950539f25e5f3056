//! Storefront Compositor
//!
//! Pure raster work for marketing cards. Nothing here touches the
//! filesystem except font loading; every function returns a new image and
//! leaves its inputs untouched.
//!
//! # Card pipeline
//!
//! ```text
//! gradient ──────────────────────────────┐
//! headline / subtitle (fitted) ──────────┤
//!                                        ├── shadow composite ── RGB card
//! frame ── fit ── teleprompter ── mockup ┘
//! ```

pub mod card;
pub mod fonts;
pub mod gradient;
pub mod mockup;
pub mod raster;
pub mod shadow;
pub mod teleprompter;
pub mod text;

pub use card::{CardCompositor, CardRequest, LayoutConfig, LayoutPolicy};
pub use fonts::{FontRegistry, Script};
pub use gradient::render_gradient;
pub use mockup::{build_phone_mockup, MockupSpec, PHONE_ASPECT};
pub use shadow::{composite_with_shadow, ShadowStyle};
pub use teleprompter::{apply_teleprompter, OverlayPolicy, TeleprompterStyle};
