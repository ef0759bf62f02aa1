use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

#[derive(Debug, Clone)]
pub struct RunStats {
    pub elapsed_time: Duration,
    pub requests_sent: usize,
    pub memory_usage_mb: Option<u64>,
}

/// Phase timing plus the HTTP round-trip count, with process memory when `sysinfo` is built in.
pub struct RunMonitor {
    start_time: Instant,
    enabled: bool,
    #[cfg(feature = "cli")]
    process: Option<(Pid, Mutex<System>)>,
}

impl RunMonitor {
    pub fn new(enabled: bool) -> Self {
        Self {
            start_time: Instant::now(),
            enabled,
            #[cfg(feature = "cli")]
            process: if enabled {
                sysinfo::get_current_pid()
                    .ok()
                    .map(|pid| (pid, Mutex::new(System::new())))
            } else {
                None
            },
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[cfg(feature = "cli")]
    fn memory_usage_mb(&self) -> Option<u64> {
        let (pid, system) = self.process.as_ref()?;
        let mut system = system.lock().ok()?;
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[*pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        system.process(*pid).map(|p| p.memory() / 1024 / 1024)
    }

    #[cfg(not(feature = "cli"))]
    fn memory_usage_mb(&self) -> Option<u64> {
        None
    }

    pub fn get_stats(&self, requests_sent: usize) -> Option<RunStats> {
        if !self.enabled {
            return None;
        }

        Some(RunStats {
            elapsed_time: self.start_time.elapsed(),
            requests_sent,
            memory_usage_mb: self.memory_usage_mb(),
        })
    }

    pub fn log_stats(&self, phase: &str, requests_sent: usize) {
        if let Some(stats) = self.get_stats(requests_sent) {
            match stats.memory_usage_mb {
                Some(memory) => tracing::info!(
                    "📊 {} - Requests: {}, Memory: {}MB, Time: {:?}",
                    phase,
                    stats.requests_sent,
                    memory,
                    stats.elapsed_time
                ),
                None => tracing::info!(
                    "📊 {} - Requests: {}, Time: {:?}",
                    phase,
                    stats.requests_sent,
                    stats.elapsed_time
                ),
            }
        }
    }

    pub fn log_final_stats(&self, requests_sent: usize) {
        if let Some(stats) = self.get_stats(requests_sent) {
            tracing::info!(
                "📊 Final Stats - Total Time: {:?}, HTTP round trips: {}",
                stats.elapsed_time,
                stats.requests_sent
            );
        }
    }
}

impl Default for RunMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
