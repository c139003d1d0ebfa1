pub mod classify;
pub mod eligibility;
pub mod policy;
pub mod slots;

use thiserror::Error;

pub use classify::{AspectClass, AspectThresholds, MonitorClass, Orientation};
pub use eligibility::{Candidate, Eligibility, Ineligible};
pub use policy::{Action, Decision, Occupancy, Plan, PlacementCase, PlacementKey, Reason, plan};
pub use slots::Columns;

use crate::sys::geometry::Rect;
use crate::sys::window_system::{HostError, WindowId};

#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("window {0:?} went away before it could be placed")]
    StaleHandle(WindowId),
    #[error("work area {0} has no usable size")]
    UnsupportedGeometry(Rect),
    #[error(transparent)]
    Host(#[from] HostError),
}
