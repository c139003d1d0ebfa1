//! An in-process host used by tests and by `lonely-cli plan`.
//!
//! It keeps a workspace of windows in stacking order, applies mutations the
//! way a compositor would (maximizing snaps the frame to the work area) and
//! records every request so callers can assert on the exact sequence.

use serde::Serialize;

use super::geometry::Rect;
use super::settings::{SettingsError, SettingsStore};
use super::window_system::{
    HostError, MaximizeFlags, MonitorId, SubscriptionId, WindowId, WindowInfo, WindowSystem,
};
use crate::common::collections::HashMap;
use crate::model::ExclusionList;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Request {
    MoveFrame(WindowId, i32, i32),
    MoveResizeFrame(WindowId, Rect),
    Maximize(WindowId, MaximizeFlags),
    Unmaximize(WindowId, MaximizeFlags),
    Focus(WindowId, u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Subscription {
    WindowCreated,
    FirstFrame(WindowId),
}

#[derive(Debug, Default)]
pub struct MemoryWindowSystem {
    windows: Vec<(WindowId, WindowInfo)>,
    work_areas: HashMap<MonitorId, Rect>,
    subscriptions: HashMap<SubscriptionId, Subscription>,
    requests: Vec<Request>,
    next_window: u64,
    next_subscription: u64,
    time: u32,
    reject_moves: bool,
}

impl MemoryWindowSystem {
    pub fn new() -> Self {
        Self {
            time: 1000,
            ..Self::default()
        }
    }

    pub fn set_work_area(&mut self, monitor: MonitorId, area: Rect) {
        self.work_areas.insert(monitor, area);
    }

    /// Adds a window on top of the stack and returns its id.
    pub fn add_window(&mut self, info: WindowInfo) -> WindowId {
        self.next_window += 1;
        let id = WindowId::new(self.next_window);
        self.windows.push((id, info));
        id
    }

    pub fn remove_window(&mut self, id: WindowId) -> Option<WindowInfo> {
        let index = self.windows.iter().position(|(wid, _)| *wid == id)?;
        Some(self.windows.remove(index).1)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut WindowInfo> {
        self.windows.iter_mut().find(|(wid, _)| *wid == id).map(|(_, info)| info)
    }

    /// Makes `move_frame` and `move_resize_frame` fail the way a host
    /// refusing a geometry change would.
    pub fn reject_moves(&mut self, reject: bool) { self.reject_moves = reject; }

    pub fn requests(&self) -> &[Request] { &self.requests }

    pub fn take_requests(&mut self) -> Vec<Request> { std::mem::take(&mut self.requests) }

    pub fn is_connected(&self, subscription: SubscriptionId) -> bool {
        self.subscriptions.contains_key(&subscription)
    }

    pub fn window_created_connected(&self) -> bool {
        self.subscriptions.values().any(|s| *s == Subscription::WindowCreated)
    }

    pub fn first_frame_subscriptions(&self) -> usize {
        self.subscriptions
            .values()
            .filter(|s| matches!(s, Subscription::FirstFrame(_)))
            .count()
    }

    fn live(&mut self, id: WindowId) -> Result<&mut WindowInfo, HostError> {
        self.window_mut(id).ok_or(HostError::StaleWindow(id))
    }

    fn subscribe(&mut self, subscription: Subscription) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId::new(self.next_subscription);
        self.subscriptions.insert(id, subscription);
        id
    }
}

impl WindowSystem for MemoryWindowSystem {
    fn workspace_windows(&self) -> Vec<WindowId> { self.windows.iter().map(|(id, _)| *id).collect() }

    fn work_area(&self, monitor: MonitorId) -> Option<Rect> { self.work_areas.get(&monitor).copied() }

    fn window(&self, id: WindowId) -> Option<WindowInfo> {
        self.windows.iter().find(|(wid, _)| *wid == id).map(|(_, info)| info.clone())
    }

    fn move_frame(&mut self, id: WindowId, x: i32, y: i32) -> Result<(), HostError> {
        if self.reject_moves {
            return Err(HostError::Rejected(format!("move of {id:?}")));
        }
        let info = self.live(id)?;
        info.frame = info.frame.with_origin(x, y);
        self.requests.push(Request::MoveFrame(id, x, y));
        Ok(())
    }

    fn move_resize_frame(&mut self, id: WindowId, frame: Rect) -> Result<(), HostError> {
        if self.reject_moves {
            return Err(HostError::Rejected(format!("resize of {id:?}")));
        }
        self.live(id)?.frame = frame;
        self.requests.push(Request::MoveResizeFrame(id, frame));
        Ok(())
    }

    fn maximize(&mut self, id: WindowId, axes: MaximizeFlags) -> Result<(), HostError> {
        let monitor = self.live(id)?.monitor;
        let area = self.work_areas.get(&monitor).copied();
        let info = self.live(id)?;
        info.maximized |= axes;
        if let Some(area) = area {
            let mut frame = info.frame;
            if axes.contains(MaximizeFlags::HORIZONTAL) {
                frame = Rect::new(area.x, frame.y, area.width, frame.height);
            }
            if axes.contains(MaximizeFlags::VERTICAL) {
                frame = Rect::new(frame.x, area.y, frame.width, area.height);
            }
            info.frame = frame;
        }
        self.requests.push(Request::Maximize(id, axes));
        Ok(())
    }

    fn unmaximize(&mut self, id: WindowId, axes: MaximizeFlags) -> Result<(), HostError> {
        self.live(id)?.maximized.remove(axes);
        self.requests.push(Request::Unmaximize(id, axes));
        Ok(())
    }

    fn focus(&mut self, id: WindowId, timestamp: u32) -> Result<(), HostError> {
        self.live(id)?;
        self.requests.push(Request::Focus(id, timestamp));
        Ok(())
    }

    fn current_time(&self) -> u32 { self.time }

    fn connect_window_created(&mut self) -> SubscriptionId { self.subscribe(Subscription::WindowCreated) }

    fn connect_first_frame(&mut self, id: WindowId) -> Option<SubscriptionId> {
        self.window(id)?;
        Some(self.subscribe(Subscription::FirstFrame(id)))
    }

    fn disconnect(&mut self, subscription: SubscriptionId) { self.subscriptions.remove(&subscription); }
}

/// Settings held in memory; `fail` simulates an unreadable store.
#[derive(Debug, Default, Clone)]
pub struct MemorySettings {
    pub exclusions: ExclusionList,
    pub fail: bool,
}

impl MemorySettings {
    pub fn new(exclusions: ExclusionList) -> Self {
        Self {
            exclusions,
            fail: false,
        }
    }
}

impl SettingsStore for MemorySettings {
    fn exclusion_list(&self) -> Result<ExclusionList, SettingsError> {
        if self.fail {
            return Err(SettingsError::NoLocation);
        }
        Ok(self.exclusions.clone())
    }
}
