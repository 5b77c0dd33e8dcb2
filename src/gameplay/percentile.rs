use crate::core::network::ScoreService;
use log::{debug, warn};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

// --- Global Percentile Cache ---

static PERCENTILE_CACHE: Lazy<Mutex<HashMap<u32, u32>>> = Lazy::new(|| Mutex::new(HashMap::new()));

pub fn get_cached_percentile(accuracy: u32) -> Option<u32> {
    PERCENTILE_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&accuracy)
        .copied()
}

fn set_cached_percentile(accuracy: u32, percentile: u32) {
    debug!("Caching percentile {} for accuracy {}", percentile, accuracy);
    PERCENTILE_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(accuracy, percentile);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PercentileReport {
    pub round: usize,
    pub accuracy: u32,
    pub percentile: u32,
}

/// Fetches "better than N% of players" off the input thread. Failures are logged and dropped.
pub struct PercentileLookup {
    tx: Sender<PercentileReport>,
    rx: Receiver<PercentileReport>,
}

impl Default for PercentileLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl PercentileLookup {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self { tx, rx }
    }

    pub fn request(&self, service: Arc<dyn ScoreService>, round: usize, accuracy: u32) {
        if let Some(percentile) = get_cached_percentile(accuracy) {
            let _ = self.tx.send(PercentileReport { round, accuracy, percentile });
            return;
        }

        let tx = self.tx.clone();
        // Detached; the result is simply dropped if nobody polls for it.
        thread::spawn(move || match service.percentile(accuracy) {
            Ok(percentile) => {
                set_cached_percentile(accuracy, percentile);
                let _ = tx.send(PercentileReport { round, accuracy, percentile });
            }
            Err(e) => warn!("Failed to load percentile for accuracy {}: {}", accuracy, e),
        });
    }

    /// Blocks up to `grace` for the report of `round`. Returns everything received meanwhile.
    pub fn wait_for(&self, round: usize, grace: Duration) -> Vec<PercentileReport> {
        let deadline = Instant::now() + grace;
        let mut reports = Vec::new();
        while let Ok(report) = self.rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            let done = report.round == round;
            reports.push(report);
            if done {
                break;
            }
        }
        if !reports.iter().any(|r| r.round == round) {
            debug!("No percentile for round {} within {:?}", round, grace);
        }
        reports
    }

    /// Reports that arrived since the last poll.
    pub fn poll(&self) -> Vec<PercentileReport> {
        self.rx.try_iter().collect()
    }
}
