//! The placement decision table.
//!
//! Every creation event is reduced to a [`PlacementKey`] (how many occupants,
//! how wide the monitor is, which way it is rotated). The key maps onto
//! exactly one [`PlacementCase`], and each case is a small rule that turns the
//! event into an [`Action`] for the new window.

use enum_dispatch::enum_dispatch;
use serde::Serialize;
use tracing::debug;

use super::PlacementError;
use super::classify::{AspectClass, AspectThresholds, MonitorClass, Orientation};
use super::eligibility::{Candidate, Eligibility, Ineligible};
use super::slots::Columns;
use crate::sys::geometry::Rect;
use crate::sys::window_system::{MaximizeFlags, WindowId, WindowInfo};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Occupancy {
    Empty,
    One,
    Two,
    /// Three or more.
    Crowded,
}

impl Occupancy {
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Occupancy::Empty,
            1 => Occupancy::One,
            2 => Occupancy::Two,
            _ => Occupancy::Crowded,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct PlacementKey {
    pub occupancy: Occupancy,
    pub aspect: AspectClass,
    pub orientation: Orientation,
}

impl PlacementKey {
    pub fn new(occupancy: Occupancy, class: MonitorClass) -> Self {
        Self {
            occupancy,
            aspect: class.aspect,
            orientation: class.orientation,
        }
    }

    pub fn case(self) -> PlacementCase {
        use AspectClass::*;
        use Occupancy::*;
        use Orientation::*;
        match (self.occupancy, self.aspect, self.orientation) {
            (Empty, Standard, _) => Fill.into(),
            (Empty | One, Ultrawide, Landscape) => Split { columns: 2 }.into(),
            (Empty | One | Two, ExtraUltrawide, Landscape) => Split { columns: 3 }.into(),
            (Empty | One, Ultrawide, Portrait) | (Empty | One | Two, ExtraUltrawide, Portrait) => {
                PortraitGap.into()
            }
            (One | Two | Crowded, Standard, _)
            | (Two | Crowded, Ultrawide, _)
            | (Crowded, ExtraUltrawide, _) => Full.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Leave the window where the host put it.
    None,
    /// Move to the work-area origin and maximize both axes.
    Maximize { area: Rect },
    /// Resize into `target` and maximize vertically.
    Tile { target: Rect, clear_horizontal: bool },
    /// Undo a full maximize the window came back with.
    Unmaximize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    Placed,
    Ineligible(Ineligible),
    MonitorFull,
    /// Wide monitors rotated to portrait are recognized but not tiled.
    PortraitGap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub action: Action,
    pub reason: Reason,
}

impl Decision {
    fn placed(action: Action) -> Self {
        Self {
            action,
            reason: Reason::Placed,
        }
    }

    fn untouched(reason: Reason) -> Self {
        Self {
            action: Action::None,
            reason,
        }
    }
}

pub struct PlacementInput<'a> {
    pub subject: &'a WindowInfo,
    pub work_area: Rect,
    pub occupants: &'a [Rect],
}

#[enum_dispatch]
pub trait PlacementRule {
    fn decide(&self, input: &PlacementInput<'_>) -> Decision;
}

/// Lonely window on a standard monitor: take the whole work area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fill;

impl PlacementRule for Fill {
    fn decide(&self, input: &PlacementInput<'_>) -> Decision {
        Decision::placed(Action::Maximize { area: input.work_area })
    }
}

/// Wide landscape monitor with room left: take the free column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Split {
    pub columns: u32,
}

impl PlacementRule for Split {
    fn decide(&self, input: &PlacementInput<'_>) -> Decision {
        let columns = Columns::new(input.work_area, self.columns);
        let slot = columns.find_slot(input.occupants);
        Decision::placed(Action::Tile {
            target: columns.rect(slot),
            clear_horizontal: input.subject.maximized.contains(MaximizeFlags::HORIZONTAL),
        })
    }
}

/// The monitor is busy enough; only undo a stale full maximize.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Full;

impl PlacementRule for Full {
    fn decide(&self, input: &PlacementInput<'_>) -> Decision {
        let action = if input.subject.is_maximized_both() {
            Action::Unmaximize
        } else {
            Action::None
        };
        Decision {
            action,
            reason: Reason::MonitorFull,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortraitGap;

impl PlacementRule for PortraitGap {
    fn decide(&self, _input: &PlacementInput<'_>) -> Decision {
        Decision::untouched(Reason::PortraitGap)
    }
}

#[enum_dispatch(PlacementRule)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementCase {
    Fill(Fill),
    Split(Split),
    Full(Full),
    PortraitGap(PortraitGap),
}

/// Everything decided for one newly created window.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Plan {
    pub window: WindowId,
    pub work_area: Rect,
    pub class: MonitorClass,
    pub occupants: Vec<WindowId>,
    pub key: PlacementKey,
    pub decision: Decision,
}

/// Runs the whole decision pipeline for `subject` against a snapshot of the
/// workspace. Pure: the same snapshot always yields the same plan.
pub fn plan(
    subject: &Candidate,
    candidates: &[Candidate],
    work_area: Rect,
    eligibility: Eligibility<'_>,
    thresholds: &AspectThresholds,
) -> Result<Plan, PlacementError> {
    let class = MonitorClass::of(work_area, thresholds)?;
    let occupants = eligibility.occupants(subject, candidates);
    let key = PlacementKey::new(Occupancy::from_count(occupants.len()), class);

    let decision = match eligibility.check_subject(&subject.info) {
        Err(why) => Decision::untouched(Reason::Ineligible(why)),
        Ok(()) => {
            let frames: Vec<Rect> = occupants.iter().map(|c| c.info.frame).collect();
            let case = key.case();
            debug!(?key, ?case, "dispatching placement");
            case.decide(&PlacementInput {
                subject: &subject.info,
                work_area,
                occupants: &frames,
            })
        }
    };

    Ok(Plan {
        window: subject.id,
        work_area,
        class,
        occupants: occupants.iter().map(|c| c.id).collect(),
        key,
        decision,
    })
}
