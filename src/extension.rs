//! Wiring for a host integration: one placer fed by the host's notifications
//! and by the settings file watcher.

use tracing::{info, warn};

use crate::actor::placer::{self, Event, Placer};
use crate::actor::settings_watcher::SettingsWatcher;
use crate::actor::{self, Receiver};
use crate::common::config::FileSettings;
use crate::sys::settings::SettingsError;
use crate::sys::window_system::WindowSystem;

pub struct Extension<W: WindowSystem> {
    placer: Placer<W, FileSettings>,
    tx: placer::Sender,
    rx: Receiver<Event>,
}

impl<W: WindowSystem> Extension<W> {
    /// Loads the settings file once for the placement thresholds; the
    /// exclusion list is re-read whenever the watcher reports a change.
    pub fn new(host: W, settings: FileSettings) -> Result<Self, SettingsError> {
        let mut config = settings.load()?;
        let fixes = config.auto_fix_values();
        if fixes > 0 {
            info!(fixes, "repaired invalid placement settings");
        }
        let (tx, rx) = actor::channel();
        Ok(Self {
            placer: Placer::new(host, settings, config.settings),
            tx,
            rx,
        })
    }

    /// Handle for the host glue to forward its notifications.
    pub fn sender(&self) -> placer::Sender { self.tx.clone() }

    /// Starts the settings watcher, enables placement and processes events
    /// until every sender handed out by [`Extension::sender`] is gone. The
    /// watcher stops with it. Returns the disabled placer.
    pub async fn run(self) -> Placer<W, FileSettings> {
        let Self { mut placer, tx, rx } = self;
        let file = placer.store().path().to_path_buf();
        if let Err(e) = SettingsWatcher::new(file, tx.downgrade()).spawn() {
            warn!("settings changes will not be picked up: {e}");
        }
        drop(tx);
        placer.enable();
        placer.run(rx).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;
    use crate::sys::geometry::Rect;
    use crate::sys::memory::{MemoryWindowSystem, Request};
    use crate::sys::window_system::{MaximizeFlags, MonitorId, WindowInfo};

    #[test]
    fn rejects_unparseable_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lonely.toml");
        std::fs::write(&path, "not toml at all [").unwrap();
        assert!(Extension::new(MemoryWindowSystem::new(), FileSettings::new(path)).is_err());
    }

    fn window(class: &str) -> WindowInfo {
        WindowInfo {
            frame: Rect::new(200, 100, 800, 600),
            monitor: MonitorId::new(0),
            is_minimized: false,
            on_all_workspaces: false,
            class: Some(class.to_string()),
            role: None,
            can_maximize: true,
            maximized: MaximizeFlags::empty(),
        }
    }

    #[test(tokio::test)]
    async fn places_forwarded_windows_and_disables_when_senders_drop() {
        let dir = tempfile::tempdir().unwrap();
        let settings = FileSettings::new(dir.path().join("lonely.toml"));

        let mut host = MemoryWindowSystem::new();
        host.set_work_area(MonitorId::new(0), Rect::new(0, 0, 1920, 1080));
        let wid = host.add_window(window("org.example.Editor"));

        let extension = Extension::new(host, settings).unwrap();
        let tx = extension.sender();
        tx.send(Event::WindowCreated(wid));
        tx.send(Event::FirstFrame(wid));
        drop(tx);

        let mut placer = extension.run().await;
        assert!(!placer.is_enabled());
        assert!(!placer.host().window_created_connected());
        let now = placer.host().current_time();
        assert_eq!(placer.host_mut().take_requests(), vec![
            Request::MoveFrame(wid, 0, 0),
            Request::Maximize(wid, MaximizeFlags::BOTH),
            Request::Focus(wid, now),
        ]);
    }

    #[test(tokio::test)]
    async fn edited_exclusions_apply_to_the_next_window() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lonely.toml");
        let settings = FileSettings::new(&path);

        let mut host = MemoryWindowSystem::new();
        host.set_work_area(MonitorId::new(0), Rect::new(0, 0, 2520, 1080));
        let editor = host.add_window(window("org.example.Editor"));
        let terminal = host.add_window(window("org.example.Terminal"));

        let extension = Extension::new(host, settings.clone()).unwrap();
        let tx = extension.sender();
        let driver = async move {
            tx.send(Event::WindowCreated(editor));
            tx.send(Event::FirstFrame(editor));
            // Let the watcher take its first look at the directory.
            tokio::time::sleep(Duration::from_millis(1500)).await;
            settings
                .edit_exclusions(|list| list.add("org.example.Terminal").map(|()| ((), true)))
                .unwrap();
            tokio::time::sleep(Duration::from_secs(4)).await;
            tx.send(Event::WindowCreated(terminal));
            tx.send(Event::FirstFrame(terminal));
        };

        let (mut placer, ()) = tokio::join!(extension.run(), driver);
        let requests = placer.host_mut().take_requests();
        let now = placer.host().current_time();
        let for_terminal: Vec<_> = requests
            .into_iter()
            .filter(|r| match r {
                Request::MoveFrame(id, ..)
                | Request::MoveResizeFrame(id, _)
                | Request::Maximize(id, _)
                | Request::Unmaximize(id, _)
                | Request::Focus(id, _) => *id == terminal,
            })
            .collect();
        assert_eq!(for_terminal, vec![Request::Focus(terminal, now)]);
        assert_eq!(placer.host().window(editor).unwrap().frame, Rect::new(0, 0, 1260, 1080));
    }
}
