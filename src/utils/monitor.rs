#[cfg(feature = "cli")]
use std::sync::Mutex;
use std::time::Duration;
#[cfg(feature = "cli")]
use std::time::Instant;
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

/// Resource usage captured at the end of a stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageStats {
    pub stage: String,
    pub cpu_usage: f32,
    pub memory_usage_mb: u64,
    pub memory_usage_percent: f32,
    pub peak_memory_mb: u64,
    pub elapsed_time: Duration,
}

#[cfg(feature = "cli")]
struct MonitorState {
    system: System,
    peak_memory_mb: u64,
    stages: Vec<StageStats>,
}

#[cfg(feature = "cli")]
pub struct ResourceMonitor {
    state: Option<Mutex<MonitorState>>,
    pid: Option<Pid>,
    start_time: Instant,
}

#[cfg(feature = "cli")]
impl ResourceMonitor {
    pub fn new(enabled: bool) -> Self {
        let state = enabled.then(|| {
            let mut system = System::new_with_specifics(RefreshKind::everything());
            system.refresh_all();
            Mutex::new(MonitorState {
                system,
                peak_memory_mb: 0,
                stages: Vec::new(),
            })
        });

        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                if enabled {
                    tracing::warn!("Resource monitoring unavailable: {}", e);
                }
                None
            }
        };

        Self {
            state,
            pid,
            start_time: Instant::now(),
        }
    }

    /// Records usage for `stage`; `None` when monitoring is off.
    pub fn snapshot(&self, stage: &str) -> Option<StageStats> {
        let pid = self.pid?;
        let mut state = self.state.as_ref()?.lock().ok()?;
        state.system.refresh_all();

        let process = state.system.process(pid)?;
        let memory_mb = process.memory() / 1024 / 1024;
        let cpu_usage = process.cpu_usage();
        let total_memory = state.system.total_memory() / 1024 / 1024;
        let memory_percent = if total_memory > 0 {
            (memory_mb as f32 / total_memory as f32) * 100.0
        } else {
            0.0
        };
        state.peak_memory_mb = state.peak_memory_mb.max(memory_mb);

        let stats = StageStats {
            stage: stage.to_string(),
            cpu_usage,
            memory_usage_mb: memory_mb,
            memory_usage_percent: memory_percent,
            peak_memory_mb: state.peak_memory_mb,
            elapsed_time: self.start_time.elapsed(),
        };
        state.stages.push(stats.clone());
        Some(stats)
    }

    pub fn log_stage(&self, stage: &str) {
        if let Some(stats) = self.snapshot(stage) {
            tracing::info!(
                "📊 {} - CPU: {:.1}%, Memory: {}MB ({:.1}%), Peak: {}MB, Time: {:?}",
                stats.stage,
                stats.cpu_usage,
                stats.memory_usage_mb,
                stats.memory_usage_percent,
                stats.peak_memory_mb,
                stats.elapsed_time
            );
        }
    }

    pub fn log_summary(&self) {
        let Some(state) = self.state.as_ref().and_then(|s| s.lock().ok()) else {
            return;
        };
        tracing::info!(
            "📊 Final Stats - {} stage(s), Total Time: {:?}, Peak Memory: {}MB",
            state.stages.len(),
            self.start_time.elapsed(),
            state.peak_memory_mb
        );
    }

    /// Snapshots taken so far, oldest first.
    pub fn stages(&self) -> Vec<StageStats> {
        self.state
            .as_ref()
            .and_then(|s| s.lock().ok())
            .map(|s| s.stages.clone())
            .unwrap_or_default()
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_some()
    }
}

// 非 CLI 環境提供空實現
#[cfg(not(feature = "cli"))]
pub struct ResourceMonitor;

#[cfg(not(feature = "cli"))]
impl ResourceMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn snapshot(&self, _stage: &str) -> Option<StageStats> {
        None
    }

    pub fn log_stage(&self, _stage: &str) {}

    pub fn log_summary(&self) {}

    pub fn stages(&self) -> Vec<StageStats> {
        Vec::new()
    }

    pub fn is_enabled(&self) -> bool {
        false
    }
}

impl Default for ResourceMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
