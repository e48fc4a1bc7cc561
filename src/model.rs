use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Worker-pool scenario axis of the benchmark.
///
/// Baseline creates pods directly on the super cluster; the other two route
/// creation through a pool of 20 or 100 downward-sync workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum WorkerPool {
    Baseline,
    Dws20,
    Dws100,
}

impl WorkerPool {
    /// Data directory that holds this scenario's measurement files.
    pub fn data_dir(self) -> &'static str {
        match self {
            WorkerPool::Baseline => "base",
            WorkerPool::Dws20 => "20dws200uws",
            WorkerPool::Dws100 => "100dws1000uws",
        }
    }

    /// Legend label used in comparison charts.
    pub fn label(self) -> &'static str {
        match self {
            WorkerPool::Baseline => "Baseline",
            WorkerPool::Dws20 => "20 workers",
            WorkerPool::Dws100 => "100 workers",
        }
    }
}

/// One benchmark configuration: which files to read and how to name outputs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Scenario {
    pub tenants: u32,
    pub pods: u32,
    pub worker_pool: WorkerPool,
}

impl Scenario {
    pub fn new(tenants: u32, pods: u32, worker_pool: WorkerPool) -> Self {
        Self {
            tenants,
            pods,
            worker_pool,
        }
    }

    /// Stem shared by all measurement files of this scenario,
    /// e.g. `base/100tenants10000pods/100tenants10000pods`.
    pub fn file_stem(&self, data_root: &Path) -> PathBuf {
        let name = format!("{}tenants{}pods", self.tenants, self.pods);
        data_root
            .join(self.worker_pool.data_dir())
            .join(&name)
            .join(name)
    }

    /// Creation log: `#podName,creationTimestamp,readyTimestamp` rows.
    pub fn creation_log(&self, data_root: &Path) -> PathBuf {
        self.file_stem(data_root).with_extension("data")
    }

    /// Stage-delay log: per-stage delays plus end-to-end latency.
    pub fn stage_delay_log(&self, data_root: &Path) -> PathBuf {
        self.file_stem(data_root).with_extension("diff")
    }

    /// Deterministic chart file name, e.g. `100tenants10000pods.png`.
    pub fn chart_name(&self) -> String {
        format!("{}tenants{}pods.png", self.tenants, self.pods)
    }
}

/// Row of a creation log (`.data`): when a pod was requested and when it
/// became ready, in unix seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct CreationRecord {
    #[serde(rename = "podName")]
    #[allow(dead_code)]
    pub pod_name: String,
    #[serde(rename = "creationTimestamp")]
    pub creation_ts: i64,
    #[serde(rename = "readyTimestamp")]
    pub ready_ts: i64,
}

impl CreationRecord {
    /// End-to-end creation latency in seconds.
    pub fn latency(&self) -> i64 {
        self.ready_ts - self.creation_ts
    }
}

/// Row of a stage-delay log (`.diff`): how long a pod spent in each stage of
/// the creation pipeline. `total` is the end-to-end latency.
#[derive(Debug, Clone, Deserialize)]
pub struct StageDelayRecord {
    #[serde(rename = "podName")]
    #[allow(dead_code)]
    pub pod_name: String,
    #[serde(rename = "dwsQDelay")]
    pub dws_queue_delay: i64,
    #[serde(rename = "dwsProcessDelay")]
    pub dws_process_delay: i64,
    #[serde(rename = "superCreationTime")]
    pub super_creation_time: i64,
    #[serde(rename = "uwsQDelay")]
    pub uws_queue_delay: i64,
    #[serde(rename = "tenantUpdateTime")]
    pub tenant_update_time: i64,
    pub total: i64,
}

/// Row of an event log (`.log`): absolute timestamps of each pipeline stage.
/// Only the tenant-creation column feeds the distribution charts today; the
/// remaining stages are parsed so schema drift is caught at load time.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "podName")]
    #[allow(dead_code)]
    pub pod_name: String,
    #[serde(rename = "tenantCreation")]
    pub tenant_creation: i64,
    #[serde(rename = "dwsDequeue")]
    #[allow(dead_code)]
    pub dws_dequeue: i64,
    #[serde(rename = "superCreation")]
    #[allow(dead_code)]
    pub super_creation: i64,
    #[serde(rename = "superReady")]
    #[allow(dead_code)]
    pub super_ready: i64,
    #[serde(rename = "uwsDequeue")]
    #[allow(dead_code)]
    pub uws_dequeue: i64,
    #[serde(rename = "tenantUpdate")]
    #[allow(dead_code)]
    pub tenant_update: i64,
}

/// Row of a headerless CPU sample file (`.dat`): a pod-count label and the
/// CPU seconds consumed at that scale.
#[derive(Debug, Clone)]
pub struct CpuSample {
    pub label: String,
    pub cpu_seconds: f64,
}

/// Row of a headerless per-tenant rate file; row order is meaningful (the
/// first rows belong to the greedy tenants).
#[derive(Debug, Clone)]
pub struct RateSample {
    #[allow(dead_code)]
    pub tenant: String,
    pub rate: f64,
}

/// Aggregated creation statistics for one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub tenants: u32,
    pub pods: u32,
    /// max(ready) - min(creation), in seconds.
    pub total_time_secs: i64,
    /// Pods created per second across the measured window.
    pub throughput: f64,
    pub max_creation_secs: i64,
    pub min_creation_secs: i64,
    pub mean_creation_secs: f64,
    pub p99_creation_secs: f64,
}
