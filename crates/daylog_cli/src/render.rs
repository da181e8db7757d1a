//! Chart rendering surface: colored ANSI bars keyed by date.

use daylog_core::{Trend, TrendChart};

const BAR_WIDTH: usize = 40;

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Prints a trend to the terminal.
///
/// The empty store state is informational output, not an error.
pub fn print_trend(trend: &Trend) {
    match trend {
        Trend::Empty => println!("No entries yet. Run `daylog entry` to record your first day."),
        Trend::Chart(chart) => print_chart(chart),
    }
}

fn print_chart(chart: &TrendChart) {
    println!("Trend for: {}", chart.column);

    let (min, max) = axis_range(chart);
    for (date, value) in chart.dates.iter().zip(&chart.values) {
        match value {
            Some(value) => {
                let fraction = if max > min {
                    ((value - min) / (max - min)).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                let width = ((fraction * BAR_WIDTH as f64).round() as usize).max(1);
                let color = scale_color(fraction);
                println!(
                    "{date:>10}  {color}{bar}{RESET} {value}",
                    bar = "█".repeat(width)
                );
            }
            None => println!("{date:>10}  -"),
        }
    }
}

fn axis_range(chart: &TrendChart) -> (f64, f64) {
    if let Some((min, max)) = chart.y_axis {
        return (min, max);
    }
    // Unclamped (hours) columns scale to the observed maximum.
    let observed = chart
        .values
        .iter()
        .flatten()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);
    if observed.is_finite() && observed > 0.0 {
        (0.0, observed)
    } else {
        (0.0, 1.0)
    }
}

/// Low-to-high red/yellow/green scale.
fn scale_color(fraction: f64) -> &'static str {
    if fraction < 1.0 / 3.0 {
        RED
    } else if fraction < 2.0 / 3.0 {
        YELLOW
    } else {
        GREEN
    }
}
