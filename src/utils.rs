//! Terminal tables for the CLI commands.

use crate::level::Level;
use crate::trainer::ClassificationReport;

/// Rows shown by `predict`.
pub const PREVIEW_LIMIT: usize = 10;

pub fn print_class_balance(balance: &[(Level, usize)]) {
    let total: usize = balance.iter().map(|(_, n)| n).sum();
    println!("\nClass balance ({total} samples)");
    println!("{:-<34}", "");
    println!("  {:<10} | {:>8} | {:>8}", "Level", "Count", "Share");
    println!("  {:-<10}-+-{:-<8}-+-{:-<8}", "", "", "");
    for (level, count) in balance {
        let share = if total == 0 {
            0.0
        } else {
            *count as f64 * 100.0 / total as f64
        };
        println!("  {:<10} | {:>8} | {:>7.1}%", level.name(), count, share);
    }
    println!("{:-<34}", "");
}

pub fn print_report(model: &str, report: &ClassificationReport) {
    println!("\n--- {model} report ---");
    println!(
        "  {:<10} | {:>9} | {:>9} | {:>9} | {:>7}",
        "", "precision", "recall", "f1-score", "support"
    );
    for m in &report.classes {
        println!(
            "  {:<10} | {:>9.2} | {:>9.2} | {:>9.2} | {:>7}",
            m.level.name(),
            m.precision,
            m.recall,
            m.f1,
            m.support
        );
    }
    let support: usize = report.classes.iter().map(|m| m.support).sum();
    println!(
        "  {:<10} | {:>9} | {:>9} | {:>9.2} | {:>7}",
        "accuracy", "", "", report.accuracy, support
    );
}

pub fn print_predictions(levels: &[Level]) {
    println!("Processed samples: {}", levels.len());
    let preview: Vec<&str> = levels.iter().take(PREVIEW_LIMIT).map(|l| l.name()).collect();
    println!("Results (first {PREVIEW_LIMIT}): {preview:?}");
}
