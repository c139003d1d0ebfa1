use lonely_wm::actor::placer::{Event, Placer};
use lonely_wm::common::config::Settings;
use lonely_wm::layout_engine::{Action, AspectClass, Ineligible, Occupancy, Plan, Reason};
use lonely_wm::model::ExclusionList;
use lonely_wm::sys::geometry::Rect;
use lonely_wm::sys::memory::{MemorySettings, MemoryWindowSystem, Request};
use lonely_wm::sys::window_system::{MaximizeFlags, MonitorId, WindowId, WindowInfo, WindowSystem};
use pretty_assertions::assert_eq;
use test_log::test;

const STANDARD: Rect = Rect {
    x: 0,
    y: 32,
    width: 1920,
    height: 1200,
};
const ULTRAWIDE: Rect = Rect {
    x: 0,
    y: 0,
    width: 2520,
    height: 1080,
};
const EXTRA_ULTRAWIDE: Rect = Rect {
    x: 0,
    y: 0,
    width: 5120,
    height: 1440,
};

fn window(class: &str, frame: Rect, maximized: MaximizeFlags) -> WindowInfo {
    WindowInfo {
        frame,
        monitor: MonitorId::new(0),
        is_minimized: false,
        on_all_workspaces: false,
        class: Some(class.to_string()),
        role: None,
        can_maximize: true,
        maximized,
    }
}

fn fresh(class: &str) -> WindowInfo {
    window(class, Rect::new(400, 300, 800, 600), MaximizeFlags::empty())
}

struct Desk {
    placer: Placer<MemoryWindowSystem, MemorySettings>,
}

impl Desk {
    fn new(area: Rect, exclusions: &[&str]) -> Self {
        let mut host = MemoryWindowSystem::new();
        host.set_work_area(MonitorId::new(0), area);
        let store = MemorySettings::new(ExclusionList::from_entries(exclusions.iter().copied()));
        let mut placer = Placer::new(host, store, Settings::default());
        placer.handle_event(Event::Enable);
        Self { placer }
    }

    fn existing(&mut self, info: WindowInfo) -> WindowId { self.placer.host_mut().add_window(info) }

    /// Creates a window, waits for its first frame and returns the plan plus
    /// the requests issued for it.
    fn open(&mut self, info: WindowInfo) -> (WindowId, Plan, Vec<Request>) {
        self.placer.host_mut().take_requests();
        let wid = self.placer.host_mut().add_window(info);
        self.placer.handle_event(Event::WindowCreated(wid));
        assert!(self.placer.host().requests().is_empty(), "nothing happens before the first frame");
        let plan = self.placer.on_first_frame(wid).expect("window is placed");
        (wid, plan, self.placer.host_mut().take_requests())
    }

    fn frame(&self, wid: WindowId) -> Rect { self.placer.host().window(wid).unwrap().frame }

    fn now(&self) -> u32 { self.placer.host().current_time() }
}

#[test]
fn lonely_window_on_standard_monitor_is_maximized() {
    let mut desk = Desk::new(STANDARD, &[]);
    let (wid, plan, requests) = desk.open(fresh("org.example.Editor"));

    assert_eq!(plan.class.aspect, AspectClass::Standard);
    assert_eq!(plan.key.occupancy, Occupancy::Empty);
    assert_eq!(requests, vec![
        Request::MoveFrame(wid, 0, 32),
        Request::Maximize(wid, MaximizeFlags::BOTH),
        Request::Focus(wid, desk.now()),
    ]);
    assert_eq!(desk.frame(wid), STANDARD);
}

#[test]
fn lonely_window_on_ultrawide_takes_left_half() {
    let mut desk = Desk::new(ULTRAWIDE, &[]);
    let (wid, plan, requests) = desk.open(fresh("org.example.Editor"));

    let half = Rect::new(0, 0, 1260, 1080);
    assert_eq!(plan.class.aspect, AspectClass::Ultrawide);
    assert_eq!(requests, vec![
        Request::MoveFrame(wid, 0, 0),
        Request::MoveResizeFrame(wid, half),
        Request::Maximize(wid, MaximizeFlags::VERTICAL),
        Request::Focus(wid, desk.now()),
    ]);
    assert_eq!(desk.frame(wid), half);
}

#[test]
fn second_window_on_ultrawide_takes_right_half() {
    let mut desk = Desk::new(ULTRAWIDE, &[]);
    let (left, ..) = desk.open(fresh("org.example.Editor"));
    assert_eq!(desk.frame(left).x, 0);

    let (wid, plan, requests) = desk.open(fresh("org.example.Terminal"));
    assert_eq!(plan.occupants, vec![left]);
    assert_eq!(plan.decision.action, Action::Tile {
        target: Rect::new(1260, 0, 1260, 1080),
        clear_horizontal: false,
    });
    assert_eq!(requests[0], Request::MoveFrame(wid, 1260, 0));
    assert_eq!(desk.frame(wid), Rect::new(1260, 0, 1260, 1080));
}

#[test]
fn third_column_fills_the_middle_gap() {
    let mut desk = Desk::new(EXTRA_ULTRAWIDE, &[]);
    let width = 5120 / 3;
    desk.existing(window("a", Rect::new(0, 0, width, 1440), MaximizeFlags::VERTICAL));
    desk.existing(window("b", Rect::new(2 * width, 0, width, 1440), MaximizeFlags::VERTICAL));

    let (wid, plan, _) = desk.open(fresh("c"));
    assert_eq!(plan.class.aspect, AspectClass::ExtraUltrawide);
    assert_eq!(plan.key.occupancy, Occupancy::Two);
    assert_eq!(desk.frame(wid), Rect::new(width, 0, width, 1440));
}

#[test]
fn busy_standard_monitor_leaves_window_alone() {
    let mut desk = Desk::new(STANDARD, &[]);
    desk.existing(window("a", STANDARD, MaximizeFlags::BOTH));

    let (wid, plan, requests) = desk.open(fresh("b"));
    assert_eq!(plan.decision.reason, Reason::MonitorFull);
    assert_eq!(plan.decision.action, Action::None);
    assert_eq!(requests, vec![Request::Focus(wid, desk.now())]);
    assert_eq!(desk.frame(wid), Rect::new(400, 300, 800, 600));
}

#[test]
fn maximized_newcomer_on_full_monitor_is_restored() {
    let mut desk = Desk::new(STANDARD, &[]);
    desk.existing(window("a", STANDARD, MaximizeFlags::BOTH));
    desk.existing(window("b", STANDARD, MaximizeFlags::BOTH));

    let (wid, plan, requests) = desk.open(window("c", STANDARD, MaximizeFlags::BOTH));
    assert_eq!(plan.key.occupancy, Occupancy::Two);
    assert_eq!(plan.decision.action, Action::Unmaximize);
    assert_eq!(requests, vec![
        Request::Unmaximize(wid, MaximizeFlags::BOTH),
        Request::Focus(wid, desk.now()),
    ]);
    assert!(!desk.placer.host().window(wid).unwrap().is_maximized_both());
}

#[test]
fn excluded_class_is_only_focused() {
    let mut desk = Desk::new(STANDARD, &["Slack"]);
    let (wid, plan, requests) = desk.open(fresh("Slack"));

    assert_eq!(plan.decision.reason, Reason::Ineligible(Ineligible::Excluded));
    assert_eq!(requests, vec![Request::Focus(wid, desk.now())]);
}

#[test]
fn excluded_windows_do_not_occupy_the_monitor() {
    let mut desk = Desk::new(STANDARD, &["Slack"]);
    desk.existing(window("Slack", STANDARD, MaximizeFlags::BOTH));

    let (_, plan, _) = desk.open(fresh("org.example.Editor"));
    assert!(plan.occupants.is_empty());
    assert_eq!(plan.decision.action, Action::Maximize { area: STANDARD });
}

#[test]
fn windows_elsewhere_do_not_count() {
    let mut desk = Desk::new(STANDARD, &[]);
    let mut minimized = window("a", STANDARD, MaximizeFlags::BOTH);
    minimized.is_minimized = true;
    desk.existing(minimized);
    let mut sticky = window("b", STANDARD, MaximizeFlags::BOTH);
    sticky.on_all_workspaces = true;
    desk.existing(sticky);
    let mut other_monitor = window("c", STANDARD, MaximizeFlags::BOTH);
    other_monitor.monitor = MonitorId::new(1);
    desk.existing(other_monitor);

    let (_, plan, _) = desk.open(fresh("d"));
    assert_eq!(plan.key.occupancy, Occupancy::Empty);
}

#[test]
fn popups_are_never_moved() {
    let mut desk = Desk::new(ULTRAWIDE, &[]);
    let mut popup = fresh("org.example.Editor");
    popup.role = Some("pop-up".to_string());

    let (wid, plan, requests) = desk.open(popup);
    assert_eq!(plan.decision.reason, Reason::Ineligible(Ineligible::Popup));
    assert_eq!(requests, vec![Request::Focus(wid, desk.now())]);
}
