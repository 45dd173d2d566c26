//! `ytcard` generates an SVG "now playing" card out of a random video of a
//! YouTube playlist, meant to be embedded in a profile README.
//!
//! The main struct of this crate is `controller::WidgetController`, which picks
//! the video, gathers its thumbnail, animated background, duration and accent
//! colors, renders the theme and writes the widget.
//!
//! The rendering pieces can also be used on their own (start with
//! `renderer::SvgRenderer`), they do no I/O.
//!
//! Rendering example:
//! ```
//! use ytcard::{context::RenderContext, renderer::SvgRenderer};
//!
//! let ctx = RenderContext {
//!     title: "Aruarian Dance".to_string(),
//!     channel_name: "Nujabes".to_string(),
//!     ..Default::default()
//! };
//!
//! let theme = "<text>{{TITLE}} - {{CHANNEL_NAME}}</text>";
//! assert_eq!(
//!     SvgRenderer::new().render(theme, &ctx),
//!     "<text>Aruarian Dance - Nujabes</text>"
//! );
//! ```

pub mod config;
pub mod constants;
pub mod context;
pub mod controller;
pub mod error;
pub mod fallback;
pub mod feed;
pub mod fetcher;
pub mod log;
pub mod media;
pub mod palette;
pub mod reader;
pub mod renderer;
pub mod string_utils;
pub mod template;
pub mod utils;
pub mod writer;

/// The ytcard prelude
///
/// This module re-exports the most commonly used items from ytcard.
/// You can use it with `use ytcard::prelude::*;` to bring all common items into scope.
pub mod prelude {
    // Re-export the collaborator traits
    pub use crate::controller::{ClipSource, ImageSource, PlaylistSource};

    // Re-export commonly used types
    pub use crate::config::{ConfigSource, WidgetConfig};
    pub use crate::context::RenderContext;
    pub use crate::controller::{BackgroundKind, Paths, RunReport, WidgetController};
    pub use crate::error::Result;
    pub use crate::fallback::Degradable;
    pub use crate::renderer::SvgRenderer;
}
