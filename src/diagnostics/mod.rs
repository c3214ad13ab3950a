//! Diagnostics returned alongside every inpainting run.
//!
//! [`InpaintReport`] records the per-stage counters, the fitted planes with
//! their average colors and a [`TimingBreakdown`]. Everything serializes to
//! camelCase JSON for the demo tool.

pub mod report;
pub mod timing;

pub use report::{ClusterSummary, InpaintOutcome, InpaintReport, InputDescriptor, PlaneSummary};
pub use timing::{StageTiming, TimingBreakdown};
