// System resource probe
// reason: sysinfo for cross-platform system monitoring
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use sysinfo::{Disks, System, MINIMUM_CPU_UPDATE_INTERVAL};
use tracing::debug;

use healthprobe_core::application::constants::{
    DEFAULT_CPU_WARN_PERCENT, DEFAULT_MEMORY_WARN_PERCENT,
};
use healthprobe_core::domain::{ProbeExtras, ProbeLevel, ProbeResult, ProbeStatus};
use healthprobe_core::port::{Probe, ProbeError, ProbeOutcome};

const PROBE_NAME: &str = "System resource probe";

/// Resource usage sampled for one probe run
#[derive(Debug, Clone)]
pub struct ResourceSnapshot {
    pub cpu_usage_percent: f32,
    pub memory_used_mb: u64,
    pub memory_total_mb: u64,
    /// Only sampled for thorough runs
    pub disk: Option<(u64, u64)>, // (used_gb, total_gb)
}

impl ResourceSnapshot {
    pub fn memory_usage_percent(&self) -> f32 {
        if self.memory_total_mb == 0 {
            return 0.0;
        }
        self.memory_used_mb as f32 * 100.0 / self.memory_total_mb as f32
    }
}

/// sysinfo state plus the time of the last CPU refresh
///
/// CPU usage is a delta between two refreshes, so the first reading only means
/// something once `MINIMUM_CPU_UPDATE_INTERVAL` has passed since the seed.
struct Sampler {
    system: System,
    cpu_refreshed_at: Instant,
}

impl Sampler {
    fn seeded() -> Self {
        let mut system = System::new();
        system.refresh_cpu();
        Self {
            system,
            cpu_refreshed_at: Instant::now(),
        }
    }

    /// Blocking: may sleep until the CPU delta is meaningful
    fn sample(&mut self, with_disk: bool) -> ResourceSnapshot {
        let wait = cpu_settle_delay(self.cpu_refreshed_at.elapsed());
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }

        self.system.refresh_cpu();
        self.cpu_refreshed_at = Instant::now();
        self.system.refresh_memory();

        let disk = with_disk.then(|| {
            let disks = Disks::new_with_refreshed_list();
            match disks.first() {
                Some(disk) => {
                    let total = disk.total_space() / 1024 / 1024 / 1024;
                    let available = disk.available_space() / 1024 / 1024 / 1024;
                    (total.saturating_sub(available), total)
                }
                None => (0, 0),
            }
        });

        ResourceSnapshot {
            cpu_usage_percent: self.system.global_cpu_info().cpu_usage(),
            memory_used_mb: self.system.used_memory() / 1024 / 1024,
            memory_total_mb: self.system.total_memory() / 1024 / 1024,
            disk,
        }
    }
}

/// Time left before a CPU refresh yields a real usage figure
fn cpu_settle_delay(since_last_refresh: Duration) -> Duration {
    MINIMUM_CPU_UPDATE_INTERVAL.saturating_sub(since_last_refresh)
}

/// Probe reporting on the host's CPU, memory and disk
///
/// - Basic: samples CPU and memory, OK when sampling works
/// - Extended: also compares CPU and memory usage with the warn thresholds
/// - Thorough: extended checks plus the sampled values as extras
///
/// Sampling runs on the blocking pool.
pub struct SystemResourceProbe {
    sampler: Arc<Mutex<Sampler>>,
    cpu_warn_percent: f32,
    memory_warn_percent: f32,
}

impl SystemResourceProbe {
    pub fn new(cpu_warn_percent: f32, memory_warn_percent: f32) -> Self {
        Self {
            sampler: Arc::new(Mutex::new(Sampler::seeded())),
            cpu_warn_percent,
            memory_warn_percent,
        }
    }

    /// Turn a snapshot into a result for the requested level
    pub fn assess(&self, level: ProbeLevel, snapshot: &ResourceSnapshot) -> ProbeOutcome {
        if snapshot.memory_total_mb == 0 {
            return Err(ProbeError::Failed(
                "No memory information available from the operating system.".to_string(),
            ));
        }

        if level == ProbeLevel::Basic {
            return Ok(ProbeResult::new(
                PROBE_NAME,
                ProbeStatus::Ok,
                "OK - System resources readable.",
            ));
        }

        let mut problems = Vec::new();
        if snapshot.cpu_usage_percent > self.cpu_warn_percent {
            problems.push(format!(
                "CPU usage {:.1}% above {:.1}%",
                snapshot.cpu_usage_percent, self.cpu_warn_percent
            ));
        }
        let memory_percent = snapshot.memory_usage_percent();
        if memory_percent > self.memory_warn_percent {
            problems.push(format!(
                "memory usage {:.1}% above {:.1}%",
                memory_percent, self.memory_warn_percent
            ));
        }

        let (status, message) = if problems.is_empty() {
            (ProbeStatus::Ok, "OK - System resources within limits.".to_string())
        } else {
            (ProbeStatus::Warning, format!("WARNING - {}.", problems.join(", ")))
        };

        if level < ProbeLevel::Thorough {
            return Ok(ProbeResult::new(PROBE_NAME, status, message));
        }

        let mut extras = ProbeExtras::new();
        extras.insert(
            "cpu_usage_percent".to_string(),
            format!("{:.1}", snapshot.cpu_usage_percent),
        );
        extras.insert("memory_used_mb".to_string(), snapshot.memory_used_mb.to_string());
        extras.insert("memory_total_mb".to_string(), snapshot.memory_total_mb.to_string());
        if let Some((used_gb, total_gb)) = snapshot.disk {
            extras.insert("disk_used_gb".to_string(), used_gb.to_string());
            extras.insert("disk_total_gb".to_string(), total_gb.to_string());
        }

        Ok(ProbeResult::thorough(PROBE_NAME, status, message, extras))
    }
}

impl Default for SystemResourceProbe {
    fn default() -> Self {
        Self::new(DEFAULT_CPU_WARN_PERCENT, DEFAULT_MEMORY_WARN_PERCENT)
    }
}

#[async_trait]
impl Probe for SystemResourceProbe {
    fn name(&self) -> &str {
        PROBE_NAME
    }

    async fn execute(&self, level: ProbeLevel) -> ProbeOutcome {
        let sampler = Arc::clone(&self.sampler);
        let with_disk = level == ProbeLevel::Thorough;
        let snapshot = tokio::task::spawn_blocking(move || sampler.lock().sample(with_disk))
            .await
            .map_err(|e| ProbeError::Failed(format!("Resource sampling aborted: {}", e)))?;

        debug!(
            level = %level,
            cpu = %snapshot.cpu_usage_percent,
            mem_used_mb = %snapshot.memory_used_mb,
            mem_total_mb = %snapshot.memory_total_mb,
            "System resources sampled"
        );

        self.assess(level, &snapshot)
    }
}
