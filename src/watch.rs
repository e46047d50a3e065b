//! Rebuilds the output directory while the preview server runs, once the
//! data file and templates have stopped changing.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};

use log::{debug, error, info};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::tokio;
use rocket::{Orbit, Rocket};

use crate::app::AppContext;
use crate::filter::Debouncer;
use crate::generator::Generator;

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Modification times of a fixed set of files. A missing file reads as
/// `None`, so creating or deleting one counts as a change.
#[derive(Debug)]
pub struct ChangeWatcher {
    paths: Vec<PathBuf>,
    last: Vec<Option<SystemTime>>,
    pending: Debouncer<()>,
}

impl ChangeWatcher {
    pub fn new(paths: Vec<PathBuf>, quiet: Duration) -> Self {
        let last = snapshot(&paths);
        ChangeWatcher {
            paths,
            last,
            pending: Debouncer::new(quiet),
        }
    }

    /// Data file plus the three host templates when a template directory
    /// is configured.
    pub fn for_context(ctx: &AppContext, quiet: Duration) -> Self {
        let mut paths = vec![ctx.projects_file()];
        if let Some(dir) = ctx.template_dir() {
            for name in ["home.html", "project.html", "status.html"] {
                paths.push(dir.join(name));
            }
        }
        Self::new(paths, quiet)
    }

    /// Look at the files once. True when a change has been followed by a
    /// full quiet period and a rebuild is due.
    pub fn check(&mut self, now: Instant) -> bool {
        let current = snapshot(&self.paths);
        if current != self.last {
            if !self.pending.is_pending() {
                debug!("Change detected; waiting for edits to settle");
            }
            self.last = current;
            self.pending.push((), now);
        }
        self.pending.poll(now).is_some()
    }
}

fn snapshot(paths: &[PathBuf]) -> Vec<Option<SystemTime>> {
    paths
        .iter()
        .map(|p| fs::metadata(p).and_then(|m| m.modified()).ok())
        .collect()
}

fn rebuild(ctx: &AppContext) {
    let result = Generator::new(ctx).and_then(|g| g.build(&ctx.project_source()));
    match result {
        Ok(report) => info!("[watch] Rebuilt {} project pages", report.project_count),
        Err(e) => error!("[watch] Rebuild failed: {}", e),
    }
}

/// Liftoff fairing that polls for changes and regenerates the site.
pub struct RebuildOnChange;

#[rocket::async_trait]
impl Fairing for RebuildOnChange {
    fn info(&self) -> Info {
        Info {
            name: "Rebuild on change",
            kind: Kind::Liftoff,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let Some(ctx) = rocket.state::<AppContext>().cloned() else {
            error!("[watch] No site context; not watching for changes");
            return;
        };
        info!("[watch] Watching {} for changes", ctx.projects_file().display());

        tokio::spawn(async move {
            let mut watcher = ChangeWatcher::for_context(&ctx, QUIET_PERIOD);
            loop {
                tokio::time::sleep(POLL_INTERVAL).await;
                if !watcher.check(Instant::now()) {
                    continue;
                }
                let ctx = ctx.clone();
                if let Err(e) = tokio::task::spawn_blocking(move || rebuild(&ctx)).await {
                    error!("[watch] Rebuild task failed: {}", e);
                }
            }
        });
    }
}
