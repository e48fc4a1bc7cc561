//! Text summary builders for stdout output.

use crate::error::ReportError;
use crate::model::{CreationRecord, Scenario, StageDelayRecord, StatsReport};
use crate::stats;

/// Pre-formatted lines for text output.
pub struct TextSummary {
    pub lines: Vec<String>,
}

/// Aggregate a scenario's creation log into a [`StatsReport`].
pub fn build_stats_report(
    scenario: &Scenario,
    records: &[CreationRecord],
) -> Result<StatsReport, ReportError> {
    let starts: Vec<i64> = records.iter().map(|r| r.creation_ts).collect();
    let ends: Vec<i64> = records.iter().map(|r| r.ready_ts).collect();
    let latencies: Vec<i64> = records.iter().map(|r| r.latency()).collect();

    Ok(StatsReport {
        tenants: scenario.tenants,
        pods: scenario.pods,
        total_time_secs: stats::window_secs(&starts, &ends)?,
        throughput: stats::throughput(&starts, &ends)?,
        max_creation_secs: stats::max(&latencies)?,
        min_creation_secs: stats::min(&latencies)?,
        mean_creation_secs: stats::mean(&latencies)?,
        p99_creation_secs: stats::percentile(&latencies, 99.0)?,
    })
}

/// Format a stats report as the per-scenario summary block.
pub fn stats_summary(report: &StatsReport) -> TextSummary {
    let lines = vec![
        "====================================================".to_string(),
        format!("{}Tenants{}Pods", report.tenants, report.pods),
        format!("Total Time = {}", report.total_time_secs),
        format!("Throughput = {}", report.throughput),
        format!("Max Creation Time = {}", report.max_creation_secs),
        format!("Min Creation Time = {}", report.min_creation_secs),
        format!("Average Creation Time = {}", report.mean_creation_secs),
        format!("99% Creation Time = {}", report.p99_creation_secs),
    ];
    TextSummary { lines }
}

/// Mean of every stage-delay column of a `.diff` file, one line per stage.
pub fn stage_average_summary(records: &[StageDelayRecord]) -> Result<TextSummary, ReportError> {
    let columns: [(&str, fn(&StageDelayRecord) -> i64); 6] = [
        ("dwsQDelay", |r| r.dws_queue_delay),
        ("dwsProcessDelay", |r| r.dws_process_delay),
        ("superCreationTime", |r| r.super_creation_time),
        ("uwsQDelay", |r| r.uws_queue_delay),
        ("tenantUpdateTime", |r| r.tenant_update_time),
        ("total", |r| r.total),
    ];

    let mut lines = Vec::with_capacity(columns.len());
    for (name, extract) in columns {
        let series: Vec<i64> = records.iter().map(extract).collect();
        lines.push(format!("{} {}", name, stats::mean(&series)?));
    }
    Ok(TextSummary { lines })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WorkerPool;

    fn record(name: &str, start: i64, end: i64) -> CreationRecord {
        CreationRecord {
            pod_name: name.to_string(),
            creation_ts: start,
            ready_ts: end,
        }
    }

    #[test]
    fn stats_report_matches_hand_computation() {
        let scenario = Scenario::new(2, 2, WorkerPool::Baseline);
        let records = vec![record("1", 0, 5), record("2", 2, 7)];
        let report = build_stats_report(&scenario, &records).unwrap();
        assert_eq!(report.total_time_secs, 7);
        assert!((report.throughput - 2.0 / 7.0).abs() < 1e-12);
        assert_eq!(report.max_creation_secs, 5);
        assert_eq!(report.min_creation_secs, 5);
        assert_eq!(report.mean_creation_secs, 5.0);
    }

    #[test]
    fn empty_log_is_empty_input() {
        let scenario = Scenario::new(25, 1250, WorkerPool::Dws20);
        let err = build_stats_report(&scenario, &[]).unwrap_err();
        assert!(matches!(err, ReportError::EmptyInput));
    }

    #[test]
    fn stage_averages_cover_every_column() {
        let records = vec![
            StageDelayRecord {
                pod_name: "a".into(),
                dws_queue_delay: 1,
                dws_process_delay: 2,
                super_creation_time: 3,
                uws_queue_delay: 4,
                tenant_update_time: 5,
                total: 15,
            },
            StageDelayRecord {
                pod_name: "b".into(),
                dws_queue_delay: 3,
                dws_process_delay: 4,
                super_creation_time: 5,
                uws_queue_delay: 6,
                tenant_update_time: 7,
                total: 25,
            },
        ];
        let summary = stage_average_summary(&records).unwrap();
        assert_eq!(summary.lines.len(), 6);
        assert_eq!(summary.lines[0], "dwsQDelay 2");
        assert_eq!(summary.lines[5], "total 20");
    }
}
