//! Configuration file watcher for hot reload.
//!
//! Each change to the file is re-read, parsed and validated on the notify
//! thread. Only configurations that pass are forwarded; the receiver
//! (see `HttpServer::run`) builds and swaps in a fresh dispatcher.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::parse_config;
use crate::config::schema::RouterConfig;

/// Watches one route configuration file.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<RouterConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end for accepted configurations.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<RouterConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching. Updates stop when the returned handle is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, update_tx } = self;
        let reload = Reload {
            path: path.clone(),
            update_tx,
            last_forwarded: Mutex::new(None),
        };

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => reload.on_change(),
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }
}

/// State shared by the notify callback.
struct Reload {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<RouterConfig>,
    last_forwarded: Mutex<Option<String>>,
}

impl Reload {
    fn on_change(&self) {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::error!(path = ?self.path, error = %e, "Failed to read config; keeping current routes");
                return;
            }
        };

        // A truncate-then-write shows up as an empty file first.
        if content.trim().is_empty() {
            tracing::debug!(path = ?self.path, "Config file empty, waiting for content");
            return;
        }

        let mut last = match self.last_forwarded.lock() {
            Ok(last) => last,
            Err(poisoned) => poisoned.into_inner(),
        };
        if last.as_deref() == Some(content.as_str()) {
            return;
        }

        match parse_config(&content) {
            Ok(config) => {
                tracing::info!(path = ?self.path, routes = config.routes.len(), "Config reloaded");
                if self.update_tx.send(config).is_ok() {
                    *last = Some(content);
                }
            }
            Err(e) => {
                tracing::error!(path = ?self.path, error = %e, "Rejected config change; keeping current routes");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tokio::time::{sleep, timeout};

    fn routes_toml(paths: &[&str]) -> String {
        paths
            .iter()
            .map(|path| format!("[[routes]]\npath = \"{}\"\nbody = \"ok\"\n\n", path))
            .collect()
    }

    fn has_route(config: &RouterConfig, path: &str) -> bool {
        config.routes.iter().any(|route| route.path == path)
    }

    async fn wait_for_route(rx: &mut mpsc::UnboundedReceiver<RouterConfig>, path: &str) {
        let found = timeout(Duration::from_secs(10), async {
            while let Some(config) = rx.recv().await {
                if has_route(&config, path) {
                    return true;
                }
            }
            false
        })
        .await;
        assert!(matches!(found, Ok(true)), "no config with {} was forwarded", path);
    }

    #[tokio::test]
    async fn test_file_changes_are_forwarded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("routes.toml");
        fs::write(&path, routes_toml(&["/"])).unwrap();

        let (watcher, mut rx) = ConfigWatcher::new(&path);
        let _handle = watcher.run().unwrap();

        fs::write(&path, routes_toml(&["/", "/fresh/{id}"])).unwrap();
        wait_for_route(&mut rx, "/fresh/{id}").await;

        // let any trailing events for the last write settle
        sleep(Duration::from_millis(200)).await;
        while rx.try_recv().is_ok() {}

        fs::write(&path, routes_toml(&["/", "/x/{id"])).unwrap();
        sleep(Duration::from_secs(1)).await;
        while let Ok(config) = rx.try_recv() {
            assert!(!has_route(&config, "/x/{id"));
        }

        // the watcher is still alive after a rejected change
        fs::write(&path, routes_toml(&["/after"])).unwrap();
        wait_for_route(&mut rx, "/after").await;
    }

    #[test]
    fn test_empty_and_unchanged_content_is_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("routes.toml");
        let (update_tx, mut rx) = mpsc::unbounded_channel();
        let reload = Reload {
            path: path.clone(),
            update_tx,
            last_forwarded: Mutex::new(None),
        };

        fs::write(&path, "").unwrap();
        reload.on_change();
        assert!(rx.try_recv().is_err());

        fs::write(&path, routes_toml(&["/a"])).unwrap();
        reload.on_change();
        reload.on_change();
        assert!(has_route(&rx.try_recv().unwrap(), "/a"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_missing_file_keeps_current_routes() {
        let dir = tempdir().unwrap();
        let (update_tx, mut rx) = mpsc::unbounded_channel();
        let reload = Reload {
            path: dir.path().join("gone.toml"),
            update_tx,
            last_forwarded: Mutex::new(None),
        };
        reload.on_change();
        assert!(rx.try_recv().is_err());
    }
}
