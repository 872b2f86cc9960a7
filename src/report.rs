//! Console table and file exports for a finished scan

use colored::Colorize;
use csv::Writer;
use log::info;
use rust_decimal::Decimal;
use std::fs::{self, OpenOptions};
use std::path::Path;

use crate::scanner::{ScanMode, ScanReport};
use crate::types::{AppError, Opportunity, Signal};

const REFERENCE_RULE: usize = 152;
const EXECUTION_RULE: usize = 180;

pub fn print_table(report: &ScanReport, min_diff_pct: Decimal) {
    let mut lines = render_table(report, min_diff_pct).into_iter();
    if let Some(title) = lines.next() {
        println!("\n{}", title.bold());
    }
    if let Some(header) = lines.next() {
        println!("{}", header.cyan());
    }
    for line in lines {
        println!("{}", line);
    }
}

/// Title, column header, rule, then one line per row; uncolored
pub fn render_table(report: &ScanReport, min_diff_pct: Decimal) -> Vec<String> {
    let count = report.opportunities.len();
    let mut lines = Vec::with_capacity(count + 3);

    match report.mode {
        ScanMode::ReferencePrice => {
            lines.push(if min_diff_pct > Decimal::ZERO {
                format!(
                    "Top {} symbols with % markPx difference >= {}% (swap vs margin):",
                    count,
                    fixed(min_diff_pct, 2)
                )
            } else {
                format!("Top {} symbols by % markPx difference (swap vs margin):", count)
            });
            lines.push(format!(
                "{:<12} {:<15} {:<15} {:<18} {:<10} {:<15} {:<12} {:<16} {:<10} {:<12}",
                "Symbol",
                "Margin",
                "Swap",
                "Actual Diff",
                "% Diff",
                "Structure",
                "FundingRate",
                "TimeToFunding",
                "Fees",
                "ActualProfit"
            ));
            lines.push("-".repeat(REFERENCE_RULE));
        }
        ScanMode::ExecutionPrice => {
            lines.push(if min_diff_pct > Decimal::ZERO {
                format!(
                    "Top {} symbols with real execution prices (% difference >= {}%):",
                    count,
                    fixed(min_diff_pct, 2)
                )
            } else {
                format!("Top {} symbols with real execution prices:", count)
            });
            lines.push(format!(
                "{:<12} {:<15} {:<15} {:<15} {:<15} {:<10} {:<15} {:<12} {:<16} {:<10} {:<12} {:<12}",
                "Symbol",
                "MarginBuy",
                "MarginSell",
                "SwapBuy",
                "SwapSell",
                "% Diff",
                "Structure",
                "FundingRate",
                "TimeToFunding",
                "Fees",
                "ActualProfit",
                "Slippage"
            ));
            lines.push("-".repeat(EXECUTION_RULE));
        }
    }

    lines.extend(report.opportunities.iter().map(render_row));
    lines
}

fn render_row(opp: &Opportunity) -> String {
    let funding_rate = fixed(opp.funding.rate, 6);
    let time_to_funding = format_duration_secs(opp.funding.time_to_funding_ms);
    let fees = format!("{}%", fixed(opp.fee_fraction * Decimal::ONE_HUNDRED, 4));
    let profit = format!("{}%", fixed(opp.actual_profit_pct, 2));

    match &opp.signal {
        Signal::ReferencePrice(d) => format!(
            "{:<12} {:<15} {:<15} {:<18} {:<10} {:<15} {:<12} {:<16} {:<12} {:<12}",
            d.base,
            fixed(d.margin_price, 6),
            fixed(d.swap_price, 6),
            signed(d.actual_diff, 6),
            fixed(d.percent_diff, 2),
            d.term_structure.to_string(),
            funding_rate,
            time_to_funding,
            fees,
            profit
        ),
        Signal::ExecutionPrice(a) => format!(
            "{:<12} {:<15} {:<15} {:<15} {:<15} {:<10} {:<15} {:<12} {:<16} {:<12} {:<12} {:<12}",
            a.base,
            fixed(a.margin_buy, 6),
            fixed(a.margin_sell, 6),
            fixed(a.swap_buy, 6),
            fixed(a.swap_sell, 6),
            fixed(a.percent_diff, 2),
            a.term_structure.to_string(),
            funding_rate,
            time_to_funding,
            fees,
            profit,
            format!("{}%", fixed(a.avg_slippage_pct(), 4))
        ),
    }
}

fn fixed(value: Decimal, dp: u32) -> String {
    format!("{:.*}", dp as usize, value.round_dp(dp))
}

fn signed(value: Decimal, dp: u32) -> String {
    if value >= Decimal::ZERO {
        format!("+{}", fixed(value, dp))
    } else {
        fixed(value, dp)
    }
}

/// Whole seconds rendered as `1h2m3s`, `4m0s`, `59s`
fn format_duration_secs(ms: i64) -> String {
    // round half away from zero to the nearest second
    let secs = if ms >= 0 { (ms + 500) / 1000 } else { (ms - 500) / 1000 };
    if secs == 0 {
        return "0s".to_string();
    }

    let sign = if secs < 0 { "-" } else { "" };
    let secs = secs.abs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}{}h{}m{}s", sign, h, m, s)
    } else if m > 0 {
        format!("{}{}m{}s", sign, m, s)
    } else {
        format!("{}{}s", sign, s)
    }
}

/// Full report as pretty-printed JSON
pub async fn save_json(report: &ScanReport, path: &Path) -> Result<(), AppError> {
    let body = serde_json::to_string_pretty(report)?;
    tokio::fs::write(path, body).await?;
    info!("Saved {} opportunities to {}", report.opportunities.len(), path.display());
    Ok(())
}

/// Append rows to a CSV file; the header goes in only when the file is new or empty
pub fn save_csv(report: &ScanReport, path: &Path) -> Result<(), AppError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let needs_header = fs::metadata(path)?.len() == 0;
    let mut writer = Writer::from_writer(file);

    if needs_header {
        writer.write_record([
            "generated_at",
            "mode",
            "symbol",
            "structure",
            "margin_buy",
            "margin_sell",
            "swap_buy",
            "swap_sell",
            "percent_diff",
            "funding_rate",
            "time_to_funding_ms",
            "fee_pct",
            "actual_profit_pct",
            "avg_slippage_pct",
        ])?;
    }

    let generated_at = report.generated_at.to_rfc3339();
    for opp in &report.opportunities {
        // reference rows have one price per leg, so buy and sell columns repeat it
        let (margin_buy, margin_sell, swap_buy, swap_sell, slippage) = match &opp.signal {
            Signal::ReferencePrice(d) => (d.margin_price, d.margin_price, d.swap_price, d.swap_price, None),
            Signal::ExecutionPrice(a) => (
                a.margin_buy,
                a.margin_sell,
                a.swap_buy,
                a.swap_sell,
                Some(a.avg_slippage_pct()),
            ),
        };

        writer.write_record([
            generated_at.clone(),
            report.mode.to_string(),
            opp.signal.base().to_string(),
            opp.signal.term_structure().to_string(),
            margin_buy.to_string(),
            margin_sell.to_string(),
            swap_buy.to_string(),
            swap_sell.to_string(),
            fixed(opp.signal.percent_diff(), 4),
            opp.funding.rate.to_string(),
            opp.funding.time_to_funding_ms.to_string(),
            fixed(opp.fee_fraction * Decimal::ONE_HUNDRED, 4),
            fixed(opp.actual_profit_pct, 4),
            slippage.map(|s| fixed(s, 4)).unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    info!("Flushed {} opportunities to {}", report.opportunities.len(), path.display());
    Ok(())
}
