//! Пример CLI: читает JSON-ответ сервиса и выводит таблицу отчёта или график истории.

use std::env;
use std::fs::File;

use activity_report::{
    ChartProjector, ColumnKey, Metric, MetricFamily, MetricKey, RawHistory, RawReportTable,
    ValueFormatter, ViewMode,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "activity_report=info".into()),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("report") if args.len() >= 2 => print_report(&args[1]),
        Some("history") if args.len() >= 2 => print_history(
            &args[1],
            args.get(2).map(String::as_str),
            args.get(3).map(String::as_str),
        ),
        _ => {
            println!("Usage: activity-report report <report.json>");
            println!("       activity-report history <history.json> [simple|sum] [metric]");
            println!("       metric: domestic | export | total");
            Ok(())
        }
    }
}

fn print_report(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let table = RawReportTable::from_reader(File::open(path)?)?.parse()?;
    let formatter = ValueFormatter::default();
    let columns = table.columns();

    println!(
        "Отчёт: месяц {}, период {}, строк {} из {}",
        table.month,
        table.period,
        table.rows.len(),
        table.total
    );
    for row in &table.rows {
        println!("{}", row.code);
        for family in MetricFamily::ALL {
            let cells: Vec<String> = columns
                .iter()
                .map(|column| {
                    let key = MetricKey::new(family, *column);
                    let value = row.value(key);
                    let text = match column {
                        ColumnKey::Change(_) => formatter.format_percentage(value),
                        ColumnKey::Year(_) if family.is_price() => {
                            formatter.format_price(value)
                        }
                        ColumnKey::Year(_) => formatter.format_count(value),
                    };
                    format!("{column}: {text}")
                })
                .collect();
            println!("  {family}: {}", cells.join(" | "));
        }
    }
    for mismatch in table.total_mismatches() {
        tracing::warn!(error = %mismatch, "total invariant violated");
    }
    Ok(())
}

fn print_history(
    path: &str,
    view: Option<&str>,
    metric: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let history = RawHistory::from_reader(File::open(path)?)?;
    let view = match view {
        Some("sum") => ViewMode::Cumulative,
        _ => ViewMode::Pointwise,
    };
    let metric = match metric {
        Some("export") => Metric::Export,
        Some("total") => Metric::Total,
        _ => Metric::Domestic,
    };
    let chart = ChartProjector::default()
        .view(view)
        .metric(metric)
        .project(&history.records);
    println!("{}", serde_json::to_string_pretty(&chart)?);
    Ok(())
}
