use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use notify::{Config as NotifyConfig, Event, EventKind, PollWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::unbounded_channel;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::actor::placer::{self, Event as PlacerEvent};

const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Polls the settings file and tells the placer when the exclusion list may
/// have changed. Stops on its own once the placer's channel has no other
/// senders left.
pub struct SettingsWatcher {
    file: PathBuf,
    placer: placer::WeakSender,
}

impl SettingsWatcher {
    pub fn new(file: PathBuf, placer: placer::WeakSender) -> Self { Self { file, placer } }

    pub fn spawn(self) -> std::io::Result<thread::JoinHandle<()>> {
        thread::Builder::new().name("settings-watcher".to_string()).spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(e) => {
                    warn!("settings watcher has no runtime: {e}");
                    return;
                }
            };
            if let Err(e) = runtime.block_on(self.run()) {
                warn!(file = ?self.file, "settings watcher stopped: {e}");
            }
        })
    }

    async fn run(&self) -> notify::Result<()> {
        let (changes_tx, mut changes) = unbounded_channel::<notify::Result<Event>>();
        let mut poller = PollWatcher::new(
            move |change| {
                _ = changes_tx.send(change);
            },
            NotifyConfig::default()
                .with_poll_interval(POLL_INTERVAL)
                .with_compare_contents(true),
        )?;
        // The file itself may not exist yet.
        poller.watch(self.file.parent().unwrap_or(Path::new(".")), RecursiveMode::NonRecursive)?;
        debug!(file = ?self.file, "polling settings");

        loop {
            let change = match timeout(POLL_INTERVAL, changes.recv()).await {
                Ok(Some(change)) => Some(change),
                Ok(None) => return Ok(()),
                Err(_elapsed) => None,
            };
            let Some(placer) = self.placer.upgrade() else {
                debug!("placer is gone, no longer polling settings");
                return Ok(());
            };
            match change {
                Some(Ok(event)) if is_relevant(&self.file, &event) => {
                    debug!(kind = ?event.kind, "settings file changed");
                    placer.send(PlacerEvent::ExclusionListChanged);
                }
                Some(Ok(_)) | None => {}
                Some(Err(e)) => warn!("polling settings failed: {e}"),
            }
        }
    }
}

fn is_relevant(file: &Path, event: &Event) -> bool {
    match event.kind {
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) => event
            .paths
            .iter()
            .any(|p| p == file || p.file_name() == file.file_name()),
        _ => false,
    }
}
