//! Pull-to-refresh and load-more gesture handling.
//!
//! Data flow: the layout reports anchor positions to an offset tracker,
//! the [`RefreshMachine`] turns the resulting offset into state transitions
//! and action dispatch, and the presentation mapper derives indicator
//! attributes from the current state for every frame.

mod completion;
mod config;
mod machine;
mod offset;
mod presentation;

pub use completion::Completion;
pub use config::{DEFAULT_BOTTOM_THRESHOLD, DEFAULT_TOP_THRESHOLD, RefreshConfig};
pub use machine::{Animation, Edge, RefreshMachine, RefreshSnapshot, RefreshState, Thresholds};
pub use offset::AnchorReport;
pub use presentation::RegionPresentation;
