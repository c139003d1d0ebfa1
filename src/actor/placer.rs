//! Reacts to window creation and places each new window exactly once.
//!
//! The host glue forwards its notifications as [`Event`]s, either by calling
//! [`Placer::handle_event`] from its own loop or by sending them through the
//! actor channel drained by [`Placer::run`]. Everything happens on one thread.

use tracing::{debug, debug_span, info, warn};

use super::executor;
use crate::common::collections::HashMap;
use crate::common::config::Settings;
use crate::layout_engine::{
    self, Action, AspectThresholds, Candidate, Eligibility, Plan, PlacementError,
};
use crate::model::ExclusionList;
use crate::sys::settings::SettingsStore;
use crate::sys::window_system::{SubscriptionId, WindowId, WindowInfo, WindowSystem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Enable,
    Disable,
    WindowCreated(WindowId),
    FirstFrame(WindowId),
    WindowDestroyed(WindowId),
    ExclusionListChanged,
}

pub type Sender = crate::actor::Sender<Event>;
pub type WeakSender = crate::actor::WeakSender<Event>;
pub type Receiver = crate::actor::Receiver<Event>;

/// Exclusion list as last read from the settings store. `None` means it must
/// be read again before the next decision.
#[derive(Debug, Default)]
struct ExclusionCache(Option<ExclusionList>);

impl ExclusionCache {
    fn get<S: SettingsStore>(&mut self, store: &S) -> &ExclusionList {
        self.0.get_or_insert_with(|| match store.exclusion_list() {
            Ok(list) => list,
            Err(e) => {
                warn!("could not read exclusion list, excluding nothing: {e}");
                ExclusionList::new()
            }
        })
    }

    fn invalidate(&mut self) { self.0 = None; }
}

pub struct Placer<W: WindowSystem, S: SettingsStore> {
    host: W,
    store: S,
    settings: Settings,
    thresholds: AspectThresholds,
    exclusions: ExclusionCache,
    window_created: Option<SubscriptionId>,
    pending: HashMap<WindowId, SubscriptionId>,
}

impl<W: WindowSystem, S: SettingsStore> Placer<W, S> {
    pub fn new(host: W, store: S, settings: Settings) -> Self {
        Self {
            host,
            store,
            thresholds: AspectThresholds::from(&settings),
            settings,
            exclusions: ExclusionCache::default(),
            window_created: None,
            pending: HashMap::default(),
        }
    }

    pub fn host(&self) -> &W { &self.host }

    pub fn host_mut(&mut self) -> &mut W { &mut self.host }

    pub fn store(&self) -> &S { &self.store }

    pub fn is_enabled(&self) -> bool { self.window_created.is_some() }

    pub fn pending_windows(&self) -> usize { self.pending.len() }

    /// Handles events until every sender is dropped, then disables itself
    /// and hands the placer back.
    pub async fn run(mut self, mut events: Receiver) -> Self {
        while let Some((span, event)) = events.recv().await {
            let _guard = span.enter();
            self.handle_event(event);
        }
        debug!("event channel closed, disabling");
        self.disable();
        self
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Enable => self.enable(),
            Event::Disable => self.disable(),
            Event::WindowCreated(wid) => self.on_window_created(wid),
            Event::FirstFrame(wid) => {
                self.on_first_frame(wid);
            }
            Event::WindowDestroyed(wid) => self.on_window_destroyed(wid),
            Event::ExclusionListChanged => {
                debug!("exclusion list changed");
                self.exclusions.invalidate();
            }
        }
    }

    /// Subscribes to window creation. Calling it again while enabled does
    /// nothing.
    pub fn enable(&mut self) {
        if self.is_enabled() {
            debug!("already enabled");
            return;
        }
        self.window_created = Some(self.host.connect_window_created());
        self.exclusions.invalidate();
        let count = self.exclusions.get(&self.store).len();
        info!(excluded = count, "auto placement enabled");
    }

    /// Drops every host subscription. Disabling when not enabled is a no-op.
    pub fn disable(&mut self) {
        let Some(subscription) = self.window_created.take() else {
            return;
        };
        self.host.disconnect(subscription);
        for (_, pending) in self.pending.drain() {
            self.host.disconnect(pending);
        }
        self.exclusions.invalidate();
        info!("auto placement disabled");
    }

    fn on_window_created(&mut self, wid: WindowId) {
        if !self.is_enabled() {
            return;
        }
        if self.pending.contains_key(&wid) {
            debug!(?wid, "already waiting for first frame");
            return;
        }
        match self.host.connect_first_frame(wid) {
            Some(subscription) => {
                self.pending.insert(wid, subscription);
            }
            None => debug!(?wid, "window vanished before its first frame could be awaited"),
        }
    }

    fn on_window_destroyed(&mut self, wid: WindowId) {
        if let Some(subscription) = self.pending.remove(&wid) {
            debug!(?wid, "window destroyed before its first frame");
            self.host.disconnect(subscription);
        }
    }

    /// Runs placement for `wid` if it was waiting for its first frame.
    /// Returns the plan that was applied, if any.
    pub fn on_first_frame(&mut self, wid: WindowId) -> Option<Plan> {
        let subscription = self.pending.remove(&wid)?;
        self.host.disconnect(subscription);

        let span = debug_span!("place", window = wid.get());
        let _guard = span.enter();
        match self.place(wid) {
            Ok(plan) => {
                debug!(decision = ?plan.decision, "placed");
                Some(plan)
            }
            Err(e @ (PlacementError::StaleHandle(_) | PlacementError::UnsupportedGeometry(_))) => {
                debug!("skipping placement: {e}");
                None
            }
            Err(e) => {
                warn!("placement failed, leaving window as is: {e}");
                None
            }
        }
    }

    fn place(&mut self, wid: WindowId) -> Result<Plan, PlacementError> {
        let info = self.host.window(wid).ok_or(PlacementError::StaleHandle(wid))?;
        let planned = self.plan(wid, info);
        // A live window is focused even when no plan could be made for it.
        let action = planned.as_ref().map_or(Action::None, |plan| plan.decision.action);
        executor::apply(&mut self.host, wid, action)?;
        planned
    }

    fn plan(&mut self, wid: WindowId, info: WindowInfo) -> Result<Plan, PlacementError> {
        // A monitor without a work area is treated like a zero-sized one.
        let work_area = self.host.work_area(info.monitor).unwrap_or_default();
        let subject = Candidate::new(wid, info);
        let candidates: Vec<Candidate> = self
            .host
            .workspace_windows()
            .into_iter()
            .filter_map(|id| self.host.window(id).map(|info| Candidate::new(id, info)))
            .collect();

        let exclusions = self.exclusions.get(&self.store);
        layout_engine::plan(
            &subject,
            &candidates,
            work_area,
            Eligibility::new(exclusions, &self.settings),
            &self.thresholds,
        )
    }
}
