use anyhow::Result;
use rust_decimal::Decimal;
use tabled::{settings::Style, Table, Tabled};

use crate::analysis::report::{DistributionSummaries, Recommendation};
use crate::analysis::StatisticsReport;
use crate::data::AnalysisWindow;

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Bucket")]
    bucket: &'static str,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Average")]
    average: String,
    #[tabled(rename = "Median")]
    median: String,
    #[tabled(rename = "Minimum")]
    minimum: String,
}

#[derive(Tabled)]
struct RecommendationRow {
    #[tabled(rename = "Distance")]
    kind: &'static str,
    #[tabled(rename = "Ticks")]
    ticks: String,
    #[tabled(rename = "Source")]
    source: &'static str,
}

fn ticks(value: Option<Decimal>) -> String {
    match value {
        Some(value) => format!("{:.2}", value.round_dp(2)),
        None => "n/a".to_string(),
    }
}

pub fn print_json(report: &StatisticsReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

pub fn print_report(report: &StatisticsReport) {
    println!("\n=== Swing Structure Recon ===\n");
    print_window(report.window());

    match report {
        StatisticsReport::InsufficientHistory { earliest_bar, .. } => {
            let earliest = earliest_bar
                .as_ref()
                .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "WARNING: insufficient history (earliest bar {earliest}); statistics suppressed."
            );
        }
        StatisticsReport::Complete {
            swing_count,
            label_counts,
            unrecognized_pairs,
            distributions,
            recommendation,
            ..
        } => {
            let labels = ["HH", "LH", "HL", "LL"]
                .iter()
                .map(|label| format!("{label} {}", label_counts.get(label).copied().unwrap_or(0)))
                .collect::<Vec<_>>()
                .join(" | ");
            println!("Swings: {swing_count} ({labels})");
            println!("Unclassified legs: {unrecognized_pairs}");
            print_distributions(distributions);
            print_recommendation(recommendation);
        }
    }
}

fn print_window(window: &AnalysisWindow) {
    println!(
        "Window: {} to {} ({}, {:02}:00-{:02}:00, {}-{})",
        window.start_date,
        window.end_date,
        window.timezone.name(),
        window.session.start_hour,
        window.session.end_hour,
        window.first_weekday,
        window.last_weekday,
    );
}

fn print_distributions(distributions: &DistributionSummaries) {
    let rows: Vec<SummaryRow> = distributions
        .rows()
        .into_iter()
        .map(|(bucket, summary)| SummaryRow {
            bucket,
            count: summary.count,
            average: ticks(summary.average),
            median: ticks(summary.median),
            minimum: ticks(summary.minimum),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("\n{table}\n");
}

fn print_recommendation(recommendation: &Recommendation) {
    let rows = vec![
        RecommendationRow {
            kind: "Target",
            ticks: ticks(recommendation.target_ticks),
            source: "median measured move",
        },
        RecommendationRow {
            kind: "Stop",
            ticks: ticks(recommendation.stop_ticks),
            source: "median pullback",
        },
        RecommendationRow {
            kind: "Trailing",
            ticks: ticks(recommendation.trailing_ticks),
            source: "minimum pullback",
        },
    ];

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}\n");
}
