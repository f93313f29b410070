//! # surface-layout-core
//!
//! Device-independent layout and positioning engine.
//!
//! This library places rectangular elements on a virtual design surface and
//! keeps their geometry consistent across:
//!
//! - **Three coordinate modes**: absolute pixels, fractions of the surface, grid cells
//! - **Physical paper sizes**: A/B series, Letter, Legal, Tabloid at any DPI
//! - **DPI changes**: position, size and font rescaled together
//! - **Persistence**: layouts saved as fractions replay on surfaces of any size
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use surface_layout_core::{
//!     store, EngineConfig, LayoutEngine, Orientation, PageSize, PositionRequest, SizeRequest,
//!     SurfaceProfile,
//! };
//!
//! fn main() -> anyhow::Result<()> {
//!     // An A4 page at screen resolution: 794 x 1123 px
//!     let surface = SurfaceProfile::create(PageSize::A4, Orientation::Portrait, 96.0)?;
//!     let mut engine = LayoutEngine::new(surface, EngineConfig::default())?;
//!
//!     let button = engine.add_element(
//!         "btn1",
//!         PositionRequest::Relative { fx: 0.5, fy: 0.5 },
//!         SizeRequest::Absolute { width: 100, height: 30 },
//!     )?;
//!     println!("btn1 at {:?}", button.bounds);
//!
//!     // The display moved to a high-DPI monitor
//!     engine.on_dpi_changed(192.0)?;
//!
//!     store::save(&engine, "form-layout.json")?;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
mod element;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod reconcile;
pub mod resolver;
pub mod store;
pub mod surface;
pub mod units;

// Re-export main types for convenience
pub use cache::CacheStats;
pub use config::{EngineConfig, GridSettings};
pub use element::Element;
pub use engine::LayoutEngine;
pub use error::{ErrorKind, LayoutError, Result};
pub use geometry::{
    Alignment, Axis, Bounds, HorizontalAlign, PositionRequest, SizeRequest, VerticalAlign,
};
pub use reconcile::DpiReconciler;
pub use resolver::PositioningResolver;
pub use store::{ElementLayout, LayoutDocument, LoadReport};
pub use surface::{PageSpec, SurfaceProfile};
pub use units::{Orientation, PageSize};

/// Initialize the library's logging.
/// Call this once at application startup if you want to see logs.
pub fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();
}
