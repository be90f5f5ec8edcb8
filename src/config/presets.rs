//! Built-in figures for the Handel simulation results.

use crate::config::figure::{FigureSpec, SeriesSpec, XAxis, NODES_COLUMN};
use crate::data::{UnitConversion, XTransform};

const NET_COLUMN: &str = "net_sentBytes_avg";
const SIG_COLUMN: &str = "sigen_wall_avg";

const HANDEL_99: &str = "csv/handel_0failing_99thr.csv";
const COMPLETE_99: &str = "csv/n2_4000_99thr.csv";

fn network(name: &str, title: Option<&str>, series: Vec<SeriesSpec>) -> FigureSpec {
    FigureSpec {
        name: name.to_string(),
        title: title.map(str::to_string),
        x_label: "nodes".to_string(),
        y_label: "KBytes".to_string(),
        x: XAxis::default(),
        column: NET_COLUMN.to_string(),
        convert: UnitConversion::BytesToKilobytes,
        log_y: false,
        series,
    }
}

fn signature_time(name: &str, title: Option<&str>, series: Vec<SeriesSpec>) -> FigureSpec {
    FigureSpec {
        name: name.to_string(),
        title: title.map(str::to_string),
        x_label: "nodes".to_string(),
        y_label: "signature generation (ms)".to_string(),
        x: XAxis::default(),
        column: SIG_COLUMN.to_string(),
        convert: UnitConversion::SecondsToMillis,
        log_y: false,
        series,
    }
}

fn failing_nodes(expected_nodes: u64) -> XAxis {
    XAxis {
        column: "failing".to_string(),
        transform: XTransform::PercentOfNodes {
            nodes_column: NODES_COLUMN.to_string(),
            expected_nodes: Some(expected_nodes),
        },
    }
}

fn thresholds() -> Vec<SeriesSpec> {
    vec![
        SeriesSpec::new("csv/handel_0failing_51thr.csv", "51% threshold"),
        SeriesSpec::new("csv/handel_0failing_75thr.csv", "75% threshold"),
        SeriesSpec::new(HANDEL_99, "99% threshold"),
    ]
}

pub fn all() -> Vec<FigureSpec> {
    vec![
        FigureSpec {
            y_label: "KBytes (log)".to_string(),
            log_y: true,
            ..network(
                "comparison_network",
                Some("Outgoing network consumption - comparative baseline"),
                vec![
                    SeriesSpec::new(HANDEL_99, "handel"),
                    SeriesSpec::new(COMPLETE_99, "complete"),
                ],
            )
        },
        signature_time(
            "comparison_nodes",
            None,
            vec![
                SeriesSpec::new(HANDEL_99, "handel"),
                SeriesSpec::new(COMPLETE_99, "complete"),
            ],
        ),
        FigureSpec {
            x_label: "Number of Handel nodes".to_string(),
            y_label: "Signature generation (ms)".to_string(),
            ..signature_time(
                "comparison_time",
                None,
                vec![
                    SeriesSpec::new(HANDEL_99, "Handel").with_peak(0.10, 0.14),
                    SeriesSpec::new(COMPLETE_99, "Complete").with_peak(0.17, -0.02),
                ],
            )
        },
        network(
            "threshold_network",
            Some("Outgoing network consumption with various thresholds"),
            thresholds(),
        ),
        signature_time(
            "threshold_time",
            Some("signature generation time with various thresholds"),
            thresholds(),
        ),
        network(
            "timeout_network",
            None,
            vec![
                SeriesSpec::new("csv/handel_2000_50timeout_99thr.csv", "50ms timeout"),
                SeriesSpec::new("csv/handel_2000_100timeout_99thr.csv", "100ms timeout"),
                SeriesSpec::new("csv/handel_2000_200timeout_99thr.csv", "200ms timeout"),
            ],
        ),
        network(
            "period_network",
            Some("Outgoing network consumption with various periods"),
            [10, 20, 50, 100]
                .iter()
                .map(|p| {
                    SeriesSpec::new(
                        format!("csv/handel_2000_{p}period_25fail_99thr.csv"),
                        format!("{p}ms period"),
                    )
                })
                .collect(),
        ),
        signature_time(
            "reallike",
            Some("Handel: 75% threshold signature with 25% failings"),
            vec![SeriesSpec::new("csv/handel_4000_real.csv", "handel")],
        ),
        FigureSpec {
            x_label: "failing nodes in %".to_string(),
            x: failing_nodes(2000),
            ..network(
                "failing_network",
                Some("Outgoing network consumption for 51% signature with varying failing nodes"),
                vec![SeriesSpec::new("csv/handel_2000_failing.csv", "handel")],
            )
        },
        FigureSpec {
            name: "failing_time".to_string(),
            title: None,
            x_label: "failing nodes in %".to_string(),
            y_label: "signature generation".to_string(),
            x: failing_nodes(4000),
            column: SIG_COLUMN.to_string(),
            convert: UnitConversion::Identity,
            log_y: false,
            series: vec![
                SeriesSpec::new("csv/handel_4000_failing.csv", "Average"),
                SeriesSpec::new("csv/handel_4000_failing.csv", "Maximum")
                    .with_column("sigen_wall_max"),
            ],
        },
    ]
}
