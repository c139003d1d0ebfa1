use serde::Serialize;
use tracing::trace;

use crate::common::config::{OccupancyRule, Settings};
use crate::model::ExclusionList;
use crate::sys::window_system::{WindowId, WindowInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: WindowId,
    pub info: WindowInfo,
}

impl Candidate {
    pub fn new(id: WindowId, info: WindowInfo) -> Self { Self { id, info } }
}

/// Why a newly created window is never placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Ineligible {
    Excluded,
    CannotMaximize,
    Popup,
}

#[derive(Clone, Copy)]
pub struct Eligibility<'a> {
    pub exclusions: &'a ExclusionList,
    pub settings: &'a Settings,
}

impl<'a> Eligibility<'a> {
    pub fn new(exclusions: &'a ExclusionList, settings: &'a Settings) -> Self {
        Self { exclusions, settings }
    }

    /// Whether the new window itself may be moved or maximized.
    pub fn check_subject(&self, subject: &WindowInfo) -> Result<(), Ineligible> {
        if self.exclusions.excludes(subject.class.as_deref()) {
            Err(Ineligible::Excluded)
        } else if !subject.can_maximize {
            Err(Ineligible::CannotMaximize)
        } else if self.settings.is_popup_role(subject.role.as_deref()) {
            Err(Ineligible::Popup)
        } else {
            Ok(())
        }
    }

    /// Windows that count toward the occupancy of the subject's monitor.
    ///
    /// The result keeps the order of `candidates`, which is the host's
    /// stacking order.
    pub fn occupants<'c>(&self, subject: &Candidate, candidates: &'c [Candidate]) -> Vec<&'c Candidate> {
        candidates.iter().filter(|c| self.occupies(subject, c)).collect()
    }

    fn occupies(&self, subject: &Candidate, candidate: &Candidate) -> bool {
        let info = &candidate.info;
        let skip = if candidate.id == subject.id {
            Some("subject")
        } else if info.monitor != subject.info.monitor {
            Some("other monitor")
        } else if self.exclusions.excludes(info.class.as_deref()) {
            Some("excluded class")
        } else if info.is_minimized {
            Some("minimized")
        } else if info.on_all_workspaces {
            Some("on all workspaces")
        } else if self.settings.is_popup_role(info.role.as_deref()) {
            Some("popup")
        } else if self.settings.occupancy == OccupancyRule::Maximized && info.maximized.is_empty() {
            Some("floating")
        } else {
            None
        };
        if let Some(reason) = skip {
            trace!(window = ?candidate.id, reason, "not an occupant");
        }
        skip.is_none()
    }
}
