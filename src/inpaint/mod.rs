//! Depth and color inpainting from fitted planes.
//!
//! Modules
//! - [`params`]: configuration of every stage, aggregated in [`InpaintParams`].
//! - [`depth`]: nearest accepted plane per pixel and hole depth filling.
//! - [`color`]: per-plane average colors and hole painting.
//! - `workspace`: buffers reused across calls.
//! - `pipeline`: the [`Inpainter`] orchestrating all stages.

pub mod color;
pub mod depth;
pub mod params;
mod pipeline;
mod workspace;

pub use depth::DepthFillStats;
pub use params::{ColorMapping, DepthFillParams, InpaintParams};
pub use pipeline::{InpaintFrame, Inpainter};
pub use workspace::InpaintWorkspace;
