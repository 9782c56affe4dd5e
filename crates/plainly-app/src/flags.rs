use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncReceiver;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use plainly_types::FeatureFlags;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::profile::plainly_root;

const RELOAD_DEBOUNCE: Duration = Duration::from_millis(50);

/// Persisted feature flags with change notification
pub struct FlagStore {
    path: PathBuf,
    tx: watch::Sender<FeatureFlags>,
}

impl FlagStore {
    pub fn default_path() -> anyhow::Result<PathBuf> {
        Ok(plainly_root()?.join("flags.json"))
    }

    /// Read the store; a missing or unreadable file yields `defaults`
    pub fn load(path: PathBuf, defaults: FeatureFlags) -> Self {
        let flags = match read_flags(&path) {
            Ok(Some(flags)) => flags,
            Ok(None) => defaults,
            Err(e) => {
                tracing::warn!("[FLAGS] Ignoring unreadable {}: {}", path.display(), e);
                defaults
            }
        };
        tracing::debug!("[FLAGS] Loaded {:?}", flags);

        let (tx, _) = watch::channel(flags);
        Self { path, tx }
    }

    pub fn get(&self) -> FeatureFlags {
        *self.tx.borrow()
    }

    /// Persist `flags` and notify subscribers if anything changed
    pub fn set(&self, flags: FeatureFlags) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // readers in other processes never see a half-written file
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, serde_json::to_string_pretty(&flags)?)?;
        fs::rename(&staging, &self.path)?;

        self.publish(flags);
        Ok(())
    }

    /// Change individual flags, keeping the others
    pub fn update(&self, simplify: Option<bool>, tts: Option<bool>) -> anyhow::Result<FeatureFlags> {
        let mut flags = self.get();
        if let Some(on) = simplify {
            flags.simplify_enabled = on;
        }
        if let Some(on) = tts {
            flags.tts_enabled = on;
        }
        self.set(flags)?;
        Ok(flags)
    }

    pub fn subscribe(&self) -> watch::Receiver<FeatureFlags> {
        self.tx.subscribe()
    }

    /// Pick up the file as another process left it. Returns whether the
    /// flags changed; a missing or corrupt file keeps the current value.
    pub fn reload(&self) -> bool {
        match read_flags(&self.path) {
            Ok(Some(flags)) => self.publish(flags),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("[FLAGS] Keeping current flags, {} unreadable: {}", self.path.display(), e);
                false
            }
        }
    }

    /// Start following writes to the flags file made outside this process
    pub fn watch_file(self: &Arc<Self>) -> anyhow::Result<FlagFileWatcher> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("{} has no parent directory", self.path.display()))?;
        fs::create_dir_all(dir)?;

        let (event_tx, event_rx) = kanal::unbounded();
        let mut watcher = RecommendedWatcher::new(
            move |result: notify::Result<Event>| {
                if let Ok(event) = result {
                    let _ = event_tx.send(event);
                }
            },
            notify::Config::default(),
        )?;
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        tracing::info!("[FLAGS] Watching {}", self.path.display());

        Ok(FlagFileWatcher {
            store: self.clone(),
            events: event_rx.to_async(),
            _watcher: watcher,
        })
    }

    fn publish(&self, flags: FeatureFlags) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == flags {
                return false;
            }
            *current = flags;
            true
        });
        if changed {
            tracing::info!(
                "[FLAGS] simplifyEnabled={} ttsEnabled={}",
                flags.simplify_enabled,
                flags.tts_enabled
            );
        }
        changed
    }

    pub(crate) fn is_relevant_event(&self, event: &Event) -> bool {
        matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
            && event
                .paths
                .iter()
                .any(|p| p.file_name() == self.path.file_name())
    }
}

/// Live file watch; reloads the store until cancelled
pub struct FlagFileWatcher {
    store: Arc<FlagStore>,
    events: AsyncReceiver<Event>,
    _watcher: RecommendedWatcher,
}

impl FlagFileWatcher {
    pub async fn run(self, cancel: CancellationToken) -> anyhow::Result<()> {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("[FLAGS] Watcher shutting down");
                    break;
                }
                event = self.events.recv() => {
                    if !self.store.is_relevant_event(&event?) {
                        continue;
                    }
                    // one write arrives as several events
                    tokio::time::sleep(RELOAD_DEBOUNCE).await;
                    while let Ok(Some(_)) = self.events.try_recv() {}
                    self.store.reload();
                }
            }
        }

        Ok(())
    }
}

fn read_flags(path: &Path) -> anyhow::Result<Option<FeatureFlags>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&data)?))
}
