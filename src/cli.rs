use crate::chart::{self, BarChartConfig, Bins, HistogramConfig, Output, YScale};
use crate::model::{Scenario, WorkerPool};
use crate::{reader, report};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

/// Tenant counts measured by the benchmark sweep.
const TENANT_COUNTS: [u32; 3] = [25, 50, 100];
/// Pod counts measured by the benchmark sweep.
const POD_COUNTS: [u32; 4] = [1250, 2500, 5000, 10000];

#[derive(Debug, Parser)]
#[command(
    name = "podbench-report",
    version,
    about = "Summarize and chart pod-creation benchmark logs"
)]
pub struct Cli {
    /// Root directory holding the per-worker-pool data directories
    /// (base, 20dws200uws, 100dws1000uws)
    #[arg(long, default_value = ".")]
    pub data_root: PathBuf,

    /// Directory where chart images are written
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Creation-time statistics (total time, throughput, min/max/mean/p99)
    Stats {
        #[arg(long, default_value_t = 25)]
        tenants: u32,

        #[arg(long, default_value_t = 1250)]
        pods: u32,

        #[arg(long, value_enum, default_value = "baseline")]
        worker_pool: WorkerPool,

        /// Report every tenant/pod combination of the sweep
        #[arg(long)]
        sweep: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Histogram of end-to-end creation latency, comparing the baseline
    /// against the 20- and 100-worker pools
    LatencyHist {
        #[arg(long, default_value_t = 100)]
        tenants: u32,

        #[arg(long, default_value_t = 10000)]
        pods: u32,

        /// Render every tenant/pod combination of the sweep
        #[arg(long)]
        sweep: bool,
    },

    /// Mean of each stage-delay column of a stage-delay (.diff) log
    StageAverages {
        /// Path to the stage-delay log
        input: PathBuf,
    },

    /// Distribution of pod creation timestamps from an event (.log) or
    /// creation (.data) log
    CreationDist {
        /// Path to the input log
        input: PathBuf,

        /// Keep only timestamps strictly below this value
        #[arg(long)]
        below: Option<i64>,

        /// Number of equal-width buckets
        #[arg(long, default_value_t = 10)]
        bins: usize,

        /// Use a logarithmic y axis
        #[arg(long)]
        log_y: bool,

        /// Chart title
        #[arg(long)]
        title: Option<String>,

        /// Write a PNG here instead of opening the interactive view
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Horizontal bar chart of CPU seconds per pod count, 20 vs 100 workers
    CpuChart {
        #[arg(long, default_value_t = 100)]
        tenants: u32,
    },

    /// Per-tenant admission-rate bar chart with the greedy tenants highlighted
    FairnessChart {
        /// Path to the headerless per-tenant rate file
        input: PathBuf,

        /// Number of leading rows that belong to greedy tenants
        #[arg(long, default_value_t = 10)]
        greedy: usize,

        #[arg(long)]
        out: Option<PathBuf>,
    },
}

pub fn run(args: Cli) -> Result<()> {
    match args.command {
        Command::Stats {
            tenants,
            pods,
            worker_pool,
            sweep,
            json,
        } => {
            let scenarios = if sweep {
                sweep_scenarios(worker_pool)
            } else {
                vec![Scenario::new(tenants, pods, worker_pool)]
            };
            run_stats(&args.data_root, &scenarios, json)
        }
        Command::LatencyHist {
            tenants,
            pods,
            sweep,
        } => {
            let combos: Vec<(u32, u32)> = if sweep {
                TENANT_COUNTS
                    .iter()
                    .flat_map(|&t| POD_COUNTS.iter().map(move |&p| (t, p)))
                    .collect()
            } else {
                vec![(tenants, pods)]
            };
            for (t, p) in combos {
                run_latency_hist(&args.data_root, &args.out_dir, t, p)?;
            }
            Ok(())
        }
        Command::StageAverages { input } => {
            let records = reader::read_stage_delay_log(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let summary = report::stage_average_summary(&records)
                .with_context(|| format!("no data rows in {}", input.display()))?;
            for line in summary.lines {
                println!("{line}");
            }
            Ok(())
        }
        Command::CreationDist {
            input,
            below,
            bins,
            log_y,
            title,
            out,
        } => run_creation_dist(&input, below, bins, log_y, title, out),
        Command::CpuChart { tenants } => run_cpu_chart(&args.data_root, &args.out_dir, tenants),
        Command::FairnessChart { input, greedy, out } => {
            let out = out.unwrap_or_else(|| args.out_dir.join("unfair-tenants-no-fq.png"));
            run_fairness_chart(&input, greedy, out)
        }
    }
}

fn sweep_scenarios(worker_pool: WorkerPool) -> Vec<Scenario> {
    TENANT_COUNTS
        .iter()
        .flat_map(|&t| {
            POD_COUNTS
                .iter()
                .map(move |&p| Scenario::new(t, p, worker_pool))
        })
        .collect()
}

fn run_stats(data_root: &std::path::Path, scenarios: &[Scenario], json: bool) -> Result<()> {
    let mut reports = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        let path = scenario.creation_log(data_root);
        let records = reader::read_creation_log(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let report = report::build_stats_report(scenario, &records)
            .with_context(|| format!("failed to aggregate {}", path.display()))?;
        reports.push(report);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            for line in report::stats_summary(report).lines {
                println!("{line}");
            }
        }
    }
    Ok(())
}

/// Per-pod-count y limit of the latency histograms, tuned to keep the three
/// figures of a row comparable.
fn latency_hist_y_limit(pods: u32) -> f64 {
    match pods {
        1250 => 1500.0,
        2500 => 3000.0,
        5000 | 10000 => 5000.0,
        _ => 3000.0,
    }
}

fn run_latency_hist(
    data_root: &std::path::Path,
    out_dir: &std::path::Path,
    tenants: u32,
    pods: u32,
) -> Result<()> {
    let pools = [WorkerPool::Baseline, WorkerPool::Dws20, WorkerPool::Dws100];

    let mut series = Vec::with_capacity(pools.len());
    for pool in pools {
        let scenario = Scenario::new(tenants, pods, pool);
        let path = scenario.stage_delay_log(data_root);
        let records = reader::read_stage_delay_log(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        series.push(
            records
                .iter()
                .map(|r| r.total as f64)
                .collect::<Vec<f64>>(),
        );
    }

    let scenario = Scenario::new(tenants, pods, WorkerPool::Baseline);
    let out = out_dir.join(scenario.chart_name());
    let cfg = HistogramConfig {
        title: format!("{pods} Pods"),
        x_label: "Time Bucket (seconds)".into(),
        y_label: "Number of Pods".into(),
        bins: Bins::Edges((0..8).map(|i| (i * 2) as f64).collect()),
        legend: pools.iter().map(|p| p.label().to_string()).collect(),
        y_limit: Some(latency_hist_y_limit(pods)),
        y_scale: YScale::Linear,
        output: Output::Png(out.clone()),
    };
    chart::render_histogram(&series, &cfg)
        .with_context(|| format!("failed to render {}", out.display()))?;
    info!("latency histogram for {tenants} tenants / {pods} pods: {}", out.display());
    Ok(())
}

fn run_creation_dist(
    input: &std::path::Path,
    below: Option<i64>,
    bins: usize,
    log_y: bool,
    title: Option<String>,
    out: Option<PathBuf>,
) -> Result<()> {
    // Both log kinds carry the creation timestamp in their second column;
    // the extension tells them apart.
    let timestamps: Vec<i64> = match input.extension().and_then(|e| e.to_str()) {
        Some("data") => reader::read_creation_log(input)
            .with_context(|| format!("failed to read {}", input.display()))?
            .iter()
            .map(|r| r.creation_ts)
            .collect(),
        _ => reader::read_event_log(input)
            .with_context(|| format!("failed to read {}", input.display()))?
            .iter()
            .map(|r| r.tenant_creation)
            .collect(),
    };

    let filtered: Vec<f64> = timestamps
        .iter()
        .filter(|&&ts| below.map_or(true, |limit| ts < limit))
        .map(|&ts| ts as f64)
        .collect();

    let cfg = HistogramConfig {
        title: title.unwrap_or_default(),
        x_label: "Creation Timestamp".into(),
        y_label: "Number of Pods".into(),
        bins: Bins::Count(bins),
        legend: vec![input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("pods")
            .to_string()],
        y_limit: None,
        y_scale: if log_y { YScale::Log } else { YScale::Linear },
        output: match out {
            Some(path) => Output::Png(path),
            None => Output::Interactive,
        },
    };
    chart::render_histogram(&[filtered], &cfg)
        .with_context(|| format!("failed to render distribution of {}", input.display()))?;
    Ok(())
}

fn run_cpu_chart(
    data_root: &std::path::Path,
    out_dir: &std::path::Path,
    tenants: u32,
) -> Result<()> {
    let mut categories = Vec::new();
    let mut series = Vec::new();
    for pool in [WorkerPool::Dws20, WorkerPool::Dws100] {
        let path = data_root
            .join(pool.data_dir())
            .join(format!("{tenants}_tenants_cpu.dat"));
        let samples = reader::read_cpu_samples(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        if categories.is_empty() {
            categories = samples.iter().map(|s| s.label.clone()).collect();
        }
        series.push(samples.iter().map(|s| s.cpu_seconds).collect::<Vec<f64>>());
    }

    let out = out_dir.join(format!("{tenants}tenants_cpu.png"));
    let cfg = BarChartConfig {
        title: String::new(),
        x_label: "CPU Time (second)".into(),
        y_label: "Number of Pods".into(),
        y_limit: None,
        out: out.clone(),
    };
    let legend = vec!["20 workers".to_string(), "100 workers".to_string()];
    chart::render_grouped_hbar_chart(&categories, &series, &legend, &cfg)
        .with_context(|| format!("failed to render {}", out.display()))?;
    Ok(())
}

fn run_fairness_chart(input: &std::path::Path, greedy: usize, out: PathBuf) -> Result<()> {
    let samples = reader::read_rate_samples(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let rates: Vec<f64> = samples.iter().map(|s| s.rate).collect();

    let cfg = BarChartConfig {
        title: String::new(),
        x_label: String::new(),
        y_label: "Pods per second".into(),
        y_limit: Some(22.0),
        out: out.clone(),
    };
    chart::render_bar_chart(&rates, greedy, &cfg)
        .with_context(|| format!("failed to render {}", out.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_file(path: &std::path::Path, contents: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut f = File::create(path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    fn creation_log(rows: &[(i64, i64)]) -> String {
        let mut s = String::from("#podName,creationTimestamp,readyTimestamp\n");
        for (i, (start, end)) in rows.iter().enumerate() {
            s.push_str(&format!("pod-{i},{start},{end}\n"));
        }
        s
    }

    fn stage_delay_log(totals: &[i64]) -> String {
        let mut s = String::from(
            "#podName,dwsQDelay,dwsProcessDelay,superCreationTime,uwsQDelay,tenantUpdateTime,total\n",
        );
        for (i, t) in totals.iter().enumerate() {
            s.push_str(&format!("pod-{i},1,1,1,1,1,{t}\n"));
        }
        s
    }

    #[test]
    fn stats_pipeline_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let scenario = Scenario::new(2, 2, WorkerPool::Baseline);
        write_file(
            &scenario.creation_log(dir.path()),
            &creation_log(&[(0, 5), (2, 7)]),
        );
        run_stats(dir.path(), &[scenario], false).unwrap();
        run_stats(dir.path(), &[scenario], true).unwrap();
    }

    #[test]
    fn stats_fails_on_header_only_log() {
        let dir = tempfile::tempdir().unwrap();
        let scenario = Scenario::new(2, 2, WorkerPool::Baseline);
        write_file(&scenario.creation_log(dir.path()), &creation_log(&[]));
        assert!(run_stats(dir.path(), &[scenario], false).is_err());
    }

    #[test]
    fn latency_hist_writes_deterministic_png() {
        let dir = tempfile::tempdir().unwrap();
        for pool in [WorkerPool::Baseline, WorkerPool::Dws20, WorkerPool::Dws100] {
            let scenario = Scenario::new(25, 1250, pool);
            write_file(
                &scenario.stage_delay_log(dir.path()),
                &stage_delay_log(&[1, 3, 3, 7, 12, 20]),
            );
        }
        run_latency_hist(dir.path(), dir.path(), 25, 1250).unwrap();
        assert!(dir.path().join("25tenants1250pods.png").exists());
    }

    #[test]
    fn creation_dist_applies_below_filter_and_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("run.data");
        write_file(&input, &creation_log(&[(1, 2), (4, 6), (9, 12)]));
        let out = dir.path().join("dist.png");
        run_creation_dist(&input, Some(5), 4, false, None, Some(out.clone())).unwrap();
        assert!(out.exists());
    }

    #[test]
    fn cpu_chart_needs_both_worker_pools() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            &dir.path().join("20dws200uws/100_tenants_cpu.dat"),
            "1250,12.5\n2500,30.1\n5000,61.0\n10000,118.4\n",
        );
        // 100-worker file missing: the error names the absent path.
        let err = run_cpu_chart(dir.path(), dir.path(), 100).unwrap_err();
        assert!(format!("{err:#}").contains("100dws1000uws"));

        write_file(
            &dir.path().join("100dws1000uws/100_tenants_cpu.dat"),
            "1250,14.0\n2500,33.9\n5000,66.2\n10000,130.7\n",
        );
        run_cpu_chart(dir.path(), dir.path(), 100).unwrap();
        assert!(dir.path().join("100tenants_cpu.png").exists());
    }

    #[test]
    fn fairness_chart_highlights_greedy_rows() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("unfair-tenants-no-fq.data.50");
        let mut contents = String::new();
        for i in 0..50 {
            let rate = if i < 10 { 20.0 } else { 2.0 };
            contents.push_str(&format!("tenant-{i},{rate}\n"));
        }
        write_file(&input, &contents);
        let out = dir.path().join("unfair.png");
        run_fairness_chart(&input, 10, out.clone()).unwrap();
        assert!(out.exists());
    }
}
