//! Terminal summary for `cuaca once`.

use crate::dashboard::{DashboardState, Phase};
use crate::weather::{HourlyMetric, HourlySeries};

const WIDTH: usize = 62;
const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One block character per value, scaled over the series' own range.
pub fn bar_sparkline(values: &[f64]) -> String {
    let (lo, hi) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let span = hi - lo;
    values
        .iter()
        .map(|&v| {
            if !v.is_finite() || !(span > 0.0) {
                return BARS[0];
            }
            let idx = ((v - lo) / span * (BARS.len() - 1) as f64).round() as usize;
            BARS[idx.min(BARS.len() - 1)]
        })
        .collect()
}

fn line(out: &mut String, text: &str) {
    let pad = WIDTH.saturating_sub(text.chars().count());
    out.push_str("  ║ ");
    out.push_str(text);
    out.push_str(&" ".repeat(pad));
    out.push_str(" ║\n");
}

fn rule(out: &mut String, left: char, right: char) {
    out.push_str("  ");
    out.push(left);
    out.push_str(&"═".repeat(WIDTH + 2));
    out.push(right);
    out.push('\n');
}

fn chart_line(out: &mut String, label: &str, hourly: &HourlySeries, metric: HourlyMetric) {
    let values = hourly.values(metric);
    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    line(
        out,
        &format!("{:<10} {} {:>5.1}–{:<5.1}", label, bar_sparkline(&values), lo, hi),
    );
}

/// Box-drawn summary of the dashboard.
pub fn summary(state: &DashboardState) -> String {
    let mut out = String::new();
    rule(&mut out, '╔', '╗');
    line(&mut out, &format!("Cuaca.Live  {}  {}", state.date_label(), state.clock_label()));

    match &state.phase {
        Phase::Loading => {
            rule(&mut out, '╠', '╣');
            line(&mut out, &format!("Loading{}", state.loading_dots));
        }
        Phase::Failed { reason } => {
            rule(&mut out, '╠', '╣');
            line(&mut out, "Weather data could not be loaded");
            line(&mut out, reason);
        }
        Phase::Ready => {
            if let Some(loc) = &state.location {
                line(&mut out, &format!("{}, {}", loc.city, loc.region));
                line(&mut out, &format!("{} ({})", loc.coordinates, state.gps_status));
            }
            rule(&mut out, '╠', '╣');
            if let Some(s) = &state.snapshot {
                line(
                    &mut out,
                    &format!(
                        "{:.1}°C (feels {:.1}°C)  {}",
                        s.temperature, s.apparent_temperature, s.description
                    ),
                );
                line(
                    &mut out,
                    &format!(
                        "Humidity {:.0}%  Pressure {:.0} hPa  Wind {:.1} m/s",
                        s.humidity, s.pressure, s.wind_speed
                    ),
                );
                line(
                    &mut out,
                    &format!(
                        "Rain today {:.1} mm  Chance {:.0}%",
                        s.daily_precipitation_sum, s.daily_precipitation_probability
                    ),
                );
            }
            rule(&mut out, '╠', '╣');
            chart_line(&mut out, "Temp °C", &state.hourly, HourlyMetric::Temperature);
            chart_line(&mut out, "Humidity %", &state.hourly, HourlyMetric::Humidity);
            chart_line(&mut out, "Rain mm", &state.hourly, HourlyMetric::Rainfall);
            chart_line(&mut out, "Chance %", &state.hourly, HourlyMetric::RainProbability);
            if let Some(updated) = state.last_update_label() {
                rule(&mut out, '╠', '╣');
                line(&mut out, &format!("Open-Meteo API · updated {}", updated));
            }
        }
    }

    rule(&mut out, '╚', '╝');
    out
}
