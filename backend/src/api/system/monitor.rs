//! Host and process resource sampling.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use sysinfo::{Pid, ProcessesToUpdate, System};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Host, process and runtime figures for the stats endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendStats {
    pub cpu_percent: f32,
    pub memory_total_mb: u64,
    pub memory_used_mb: u64,
    pub memory_percent: f64,
    pub process_memory_mb: Option<u64>,
    pub runtime_workers: usize,
    pub runtime_alive_tasks: usize,
}

/// Keeps one `sysinfo::System` alive so that CPU usage is measured between
/// consecutive samples rather than from a cold start every time.
pub struct SystemMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
}

impl SystemMonitor {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_usage();

        Self {
            system: Mutex::new(system),
            pid: sysinfo::get_current_pid().ok(),
        }
    }

    /// Refresh and read the current figures.
    pub fn sample(&self) -> BackendStats {
        let mut system = self
            .system
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        system.refresh_cpu_usage();
        system.refresh_memory();

        let process_memory_mb = self.pid.and_then(|pid| {
            system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
            system.process(pid).map(|p| p.memory() / BYTES_PER_MB)
        });

        let total = system.total_memory();
        let used = system.used_memory();
        let memory_percent = if total == 0 {
            0.0
        } else {
            used as f64 / total as f64 * 100.0
        };

        let metrics = tokio::runtime::Handle::current().metrics();

        BackendStats {
            cpu_percent: system.global_cpu_usage(),
            memory_total_mb: total / BYTES_PER_MB,
            memory_used_mb: used / BYTES_PER_MB,
            memory_percent,
            process_memory_mb,
            runtime_workers: metrics.num_workers(),
            runtime_alive_tasks: metrics.num_alive_tasks(),
        }
    }
}

impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new()
    }
}
