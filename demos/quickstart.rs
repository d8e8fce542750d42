//! Quickstart: evaluate the moving-average baseline on a small crypto panel.
//!
//! Run with: cargo run --example quickstart
//! Set RUST_LOG=panel_baseline=debug to see per-entity logging.

use chrono::{Duration, NaiveDate};
use panel_baseline::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "panel_baseline=info".into()),
        )
        .init();

    println!("=== panel-baseline Quickstart ===\n");

    // 1. Build a raw table the way it would arrive from a CSV export
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut raw = RawTable::new(["crypto_id", "timestamp", "price", "market_cap"]);
    for day in 1..=60 {
        let date = (start + Duration::days(day - 1)).format("%Y-%m-%d").to_string();
        let t = day as f64;
        raw.push_row([
            "bitcoin".to_string(),
            date.clone(),
            format!("{:.2}", 42_000.0 + 150.0 * t + 900.0 * (t * 0.3).sin()),
            "820000000000".to_string(),
        ]);
        raw.push_row([
            "ethereum".to_string(),
            date.clone(),
            format!("{:.2}", 2_300.0 + 40.0 * (t * 0.2).sin()),
            "".to_string(),
        ]);
        raw.push_row(["tether".to_string(), date.clone(), "1.0".to_string(), "".to_string()]);
        if day > 56 {
            // listed late, too short for a window of 5
            raw.push_row(["newcoin".to_string(), date, format!("{}", 0.5 + 0.01 * t), "".to_string()]);
        }
    }

    let columns = ColumnNames::new().with_entity("crypto_id");
    let table = PanelTable::from_raw(&raw, &columns)?;
    println!(
        "Loaded {} observations for {} entities",
        table.len(),
        table.entity_ids().len()
    );

    // 2. Run the evaluation with the default window and split
    let config = EvaluationConfig::default();
    let evaluator = BaselineEvaluator::new(config)?;
    let evaluation = evaluator.run(&table)?;

    match evaluation.cutoff {
        Some(cutoff) => println!(
            "Train: {} predictions, test: {} predictions, cutoff {}",
            evaluation.train.len(),
            evaluation.test.len(),
            cutoff.format("%Y-%m-%d")
        ),
        None => println!("No predictions were produced"),
    }

    // 3. Print the report
    println!("\n{}", evaluation.report);

    if !evaluation.warnings.is_empty() {
        println!("Warnings:");
        for warning in &evaluation.warnings {
            println!("  {warning}");
        }
    }

    // 4. Points for an actual-vs-predicted plot
    println!("\n--- bitcoin test points ---");
    for record in evaluation.plot_points("bitcoin").take(5) {
        println!(
            "{}  actual {:>10.2}  predicted {:>10.2}",
            record.timestamp().format("%Y-%m-%d"),
            record.actual(),
            record.predicted()
        );
    }

    Ok(())
}
