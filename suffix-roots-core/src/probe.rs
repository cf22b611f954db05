// Bounded worker pool that probes every candidate domain once

use crate::error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use suffix_roots_prober::{ProbeResult, Prober};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info};

const PROGRESS_INTERVAL: Duration = Duration::from_secs(2);

/// Options for configuring a probe run
pub struct ProbeOptions {
    pub domains: Vec<String>,
    pub max_workers: usize,
    pub show_progress_bar: bool,
}

/// Callback invoked after each completed probe with `(done, total)`
pub type ProbeProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// HTML-confirmed domains plus the diagnostic message of every probe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allowlist {
    pub domains: BTreeSet<String>,
    pub debug: BTreeMap<String, String>,
}

impl Allowlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: ProbeResult) {
        if let Some(message) = result.message {
            self.debug.insert(result.domain.clone(), message);
        }
        if result.is_html {
            self.domains.insert(result.domain);
        }
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn probed_count(&self) -> usize {
        self.debug.len()
    }
}

impl FromIterator<ProbeResult> for Allowlist {
    fn from_iter<T: IntoIterator<Item = ProbeResult>>(iter: T) -> Self {
        let mut allowlist = Allowlist::new();
        for result in iter {
            allowlist.record(result);
        }
        allowlist
    }
}

/// Tracks completions and emits a progress line at most every couple of
/// seconds, either through the bar or the log.
struct ProgressReporter {
    total: usize,
    done: usize,
    last_report: Instant,
    bar: Option<ProgressBar>,
    callback: Option<ProbeProgressCallback>,
}

impl ProgressReporter {
    fn new(total: usize, show_bar: bool, callback: Option<ProbeProgressCallback>) -> Self {
        let bar = show_bar.then(|| {
            let pb = ProgressBar::new(total as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=>-"),
            );
            pb
        });

        Self {
            total,
            done: 0,
            last_report: Instant::now(),
            bar,
            callback,
        }
    }

    fn advance(&mut self, domain: &str) {
        self.done += 1;

        if let Some(ref pb) = self.bar {
            pb.set_message(domain.to_string());
            pb.inc(1);
        }
        if let Some(ref callback) = self.callback {
            callback(self.done, self.total);
        }

        if self.last_report.elapsed() >= PROGRESS_INTERVAL {
            let line = progress_line(self.done, self.total);
            match self.bar {
                Some(ref pb) => pb.suspend(|| info!("{}", line)),
                None => info!("{}", line),
            }
            self.last_report = Instant::now();
        }
    }

    fn finish(&self) {
        if let Some(ref pb) = self.bar {
            pb.finish_and_clear();
        }
    }
}

pub fn progress_line(done: usize, total: usize) -> String {
    let percent = if total == 0 {
        100.0
    } else {
        done as f64 * 100.0 / total as f64
    };
    format!("Progress: {}/{} ({:.1}%)", done, total, percent)
}

/// Probe every domain with at most `max_workers` probes in flight.
///
/// Results are folded in completion order. Per-domain failures end up in
/// the debug map; only a panicking worker fails the run.
pub async fn execute_probe(
    prober: &Prober,
    options: ProbeOptions,
    progress_callback: Option<ProbeProgressCallback>,
) -> Result<Allowlist> {
    let ProbeOptions {
        domains,
        max_workers,
        show_progress_bar,
    } = options;

    let total = domains.len();
    let workers = max_workers.max(1).min(total);
    info!(
        "Checking {} candidate domains with up to {} workers",
        total, max_workers
    );

    let mut allowlist = Allowlist::new();
    if total == 0 {
        return Ok(allowlist);
    }

    let queue: Arc<Mutex<VecDeque<String>>> = Arc::new(Mutex::new(domains.into()));
    let (tx, mut rx) = mpsc::unbounded_channel::<ProbeResult>();

    let mut worker_handles = Vec::with_capacity(workers);
    for worker_id in 0..workers {
        let prober = prober.clone();
        let queue = queue.clone();
        let tx = tx.clone();

        let handle = tokio::spawn(async move {
            debug!("Worker {} started", worker_id);
            loop {
                let next = queue.lock().await.pop_front();
                let Some(domain) = next else {
                    break;
                };

                let result = prober.probe_domain(&domain).await;
                if tx.send(result).is_err() {
                    break;
                }
            }
            debug!("Worker {} finished", worker_id);
        });

        worker_handles.push(handle);
    }
    // The channel closes once every worker has dropped its sender.
    drop(tx);

    let mut progress = ProgressReporter::new(total, show_progress_bar, progress_callback);
    while let Some(result) = rx.recv().await {
        progress.advance(&result.domain);
        allowlist.record(result);
    }
    progress.finish();

    for handle in worker_handles {
        handle.await?;
    }

    info!(
        "Probed {} domains, {} serve HTML",
        allowlist.probed_count(),
        allowlist.len()
    );
    Ok(allowlist)
}
