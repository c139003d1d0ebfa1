//! The narrow capability set the placement engine needs from the host
//! compositor.
//!
//! Host notifications (window created, first frame, window destroyed) are not
//! delivered through this trait; the host glue turns them into
//! [`crate::actor::placer::Event`]s. The trait only covers subscribing to
//! them, reading window state and mutating the new window.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::Rect;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct WindowId(u64);

impl WindowId {
    pub fn new(id: u64) -> WindowId { WindowId(id) }

    pub fn get(&self) -> u64 { self.0 }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct MonitorId(u32);

impl MonitorId {
    pub fn new(id: u32) -> MonitorId { MonitorId(id) }

    pub fn get(&self) -> u32 { self.0 }
}

/// Handle for a host signal connection.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn new(id: u64) -> SubscriptionId { SubscriptionId(id) }

    pub fn get(&self) -> u64 { self.0 }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct MaximizeFlags: u8 {
        const HORIZONTAL = 1 << 0;
        const VERTICAL = 1 << 1;
        const BOTH = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();
    }
}

/// Point-in-time view of one host window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowInfo {
    pub frame: Rect,
    pub monitor: MonitorId,
    #[serde(default)]
    pub is_minimized: bool,
    #[serde(default)]
    pub on_all_workspaces: bool,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default = "yes")]
    pub can_maximize: bool,
    #[serde(default)]
    pub maximized: MaximizeFlags,
}

fn yes() -> bool { true }

impl WindowInfo {
    pub fn is_maximized_both(&self) -> bool { self.maximized.contains(MaximizeFlags::BOTH) }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("window {0:?} no longer exists")]
    StaleWindow(WindowId),
    #[error("host rejected request: {0}")]
    Rejected(String),
}

pub trait WindowSystem {
    /// Windows on the active workspace, in the host's stacking order.
    ///
    /// The eligibility filter preserves this order and the slot finder relies
    /// on it being stable between two reads of an unchanged workspace.
    fn workspace_windows(&self) -> Vec<WindowId>;

    /// Usable area of `monitor` on the active workspace, excluding panels.
    fn work_area(&self, monitor: MonitorId) -> Option<Rect>;

    /// Returns `None` once the window (or its compositor actor) is gone.
    fn window(&self, id: WindowId) -> Option<WindowInfo>;

    fn move_frame(&mut self, id: WindowId, x: i32, y: i32) -> Result<(), HostError>;
    fn move_resize_frame(&mut self, id: WindowId, frame: Rect) -> Result<(), HostError>;
    fn maximize(&mut self, id: WindowId, axes: MaximizeFlags) -> Result<(), HostError>;
    fn unmaximize(&mut self, id: WindowId, axes: MaximizeFlags) -> Result<(), HostError>;
    fn focus(&mut self, id: WindowId, timestamp: u32) -> Result<(), HostError>;

    /// The host's current event timestamp, used as the focus time token.
    fn current_time(&self) -> u32;

    fn connect_window_created(&mut self) -> SubscriptionId;

    /// One-shot subscription to the first rendered frame of `id`. Returns
    /// `None` when the window has already gone away.
    fn connect_first_frame(&mut self, id: WindowId) -> Option<SubscriptionId>;

    fn disconnect(&mut self, subscription: SubscriptionId);
}
