//! Server-side HTML for the dashboard page.
//!
//! Two complete layouts are rendered from the same state: a desktop grid
//! and stacked mobile cards. The page also carries the loading and error
//! views and the "weather updated" toast.

use super::gauge::{RingGauge, HUMIDITY_MAX, RAIN_PROBABILITY_MAX, TEMPERATURE_MAX};
use super::sparkline::Sparkline;
use super::{escape, Layout};
use crate::dashboard::{DashboardState, Phase};
use crate::location::{GpsStatus, Location};
use crate::weather::{describe, HourlyMetric, HourlySeries, WeatherSnapshot};
use tokio::time::Instant;

const ORANGE: &str = "#f97316";
const AMBER: &str = "#f59e0b";
const SKY: &str = "#0ea5e9";
const INDIGO: &str = "#6366f1";
const VIOLET: &str = "#8b5cf6";
const PINK: &str = "#ec4899";

const TOAST_TEXT: &str = "Weather conditions updated!";

pub fn page(state: &DashboardState, layout: Layout, at: Instant) -> String {
    let (phase, body) = match &state.phase {
        Phase::Loading => ("loading", loading_view(state)),
        Phase::Failed { reason } => ("failed", failed_view(reason)),
        Phase::Ready => match (&state.snapshot, &state.location) {
            (Some(snapshot), Some(location)) => {
                let ready = Ready { state, snapshot, location };
                let body = match layout {
                    Layout::Desktop => ready.desktop(),
                    Layout::Mobile => ready.mobile(),
                };
                ("ready", body)
            }
            _ => ("failed", failed_view("No weather data is available.")),
        },
    };
    let layout_name = match layout {
        Layout::Desktop => "desktop",
        Layout::Mobile => "mobile",
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1, maximum-scale=1, user-scalable=no">
<title>Cuaca.Live</title>
<link rel="stylesheet" href="/style.css">
</head>
<body data-revision="{revision}" data-layout="{layout}" data-phase="{phase}">
{toast}
{body}
<script src="/app.js"></script>
</body>
</html>
"#,
        revision = state.revision,
        layout = layout_name,
        phase = phase,
        toast = toast(state.weather_changed(at)),
        body = body,
    )
}

fn toast(visible: bool) -> String {
    format!(
        r#"<div id="toast" class="toast"{hidden}><span class="toast-icon">{icon}</span><span>{text}</span></div>"#,
        hidden = if visible { "" } else { " hidden" },
        icon = describe(0).icon,
        text = TOAST_TEXT,
    )
}

fn brand() -> &'static str {
    r#"<div class="brand"><span class="brand-name">Cuaca<span>.Live</span></span><span class="brand-sub">Real-time weather monitoring</span></div>"#
}

/// Status hint under the loading title.
pub fn loading_hint(status: GpsStatus) -> &'static str {
    match status {
        GpsStatus::Detecting => "Allow location access",
        GpsStatus::Ip => "Using IP location",
        GpsStatus::Accurate | GpsStatus::Unavailable => "Loading weather data…",
    }
}

fn loading_view(state: &DashboardState) -> String {
    format!(
        r#"<main class="screen loading">
<div class="spinner"><svg viewBox="0 0 76 76"><circle cx="38" cy="38" r="30" fill="none" stroke="rgba(249,115,22,0.12)" stroke-width="5"/><circle class="spin" cx="38" cy="38" r="30" fill="none" stroke="{orange}" stroke-width="5" stroke-linecap="round" stroke-dasharray="188" stroke-dashoffset="141"/></svg></div>
<p class="loading-title">Detecting location<span id="dots">{dots}</span></p>
<p class="loading-hint">{hint}</p>
</main>"#,
        orange = ORANGE,
        dots = state.loading_dots,
        hint = loading_hint(state.gps_status),
    )
}

fn failed_view(reason: &str) -> String {
    format!(
        r#"<main class="screen failed">
{brand}
<div class="card error-card">
<p class="error-icon">{icon}</p>
<h2>Weather data could not be loaded</h2>
<p class="error-reason">{reason}</p>
<p class="error-hint">Reload the page to try again.</p>
</div>
</main>"#,
        brand = brand(),
        icon = describe(-1).icon,
        reason = escape(reason),
    )
}

/// Short label for the GPS indicator.
pub fn gps_label(status: GpsStatus) -> &'static str {
    match status {
        GpsStatus::Accurate => "GPS active",
        GpsStatus::Ip => "IP location",
        GpsStatus::Unavailable => "Default location",
        GpsStatus::Detecting => "Detecting",
    }
}

fn stat_pill(label: &str, value: &str, unit: &str, color: &str) -> String {
    format!(
        r#"<div class="pill"><span class="pill-label">{label}</span><span class="pill-value" style="color:{color}">{value}<small>{unit}</small></span></div>"#,
        label = label,
        value = value,
        unit = unit,
        color = color,
    )
}

fn chart_panel(class: &str, label: &str, color: &str, values: &[f64]) -> String {
    format!(
        r#"<div class="{class}"><span class="chart-label" style="color:{color}">{label}</span>{svg}</div>"#,
        class = class,
        label = label,
        color = color,
        svg = Sparkline::new(values, color).svg(),
    )
}

fn charts(class: &str, hourly: &HourlySeries) -> String {
    [
        ("Temperature (°C)", ORANGE, HourlyMetric::Temperature),
        ("Humidity (%)", AMBER, HourlyMetric::Humidity),
        ("Rainfall per hour (mm)", INDIGO, HourlyMetric::Rainfall),
        ("Rain probability (%)", PINK, HourlyMetric::RainProbability),
    ]
    .iter()
    .map(|&(label, color, metric)| chart_panel(class, label, color, &hourly.values(metric)))
    .collect()
}

fn gauges(snapshot: &WeatherSnapshot, size: f64) -> String {
    [
        RingGauge::new(snapshot.temperature, TEMPERATURE_MAX, size).svg(ORANGE, "Temp", "°C"),
        RingGauge::new(snapshot.humidity, HUMIDITY_MAX, size).svg(AMBER, "Humidity", "%"),
        RingGauge::new(snapshot.daily_precipitation_probability, RAIN_PROBABILITY_MAX, size)
            .svg(INDIGO, "Rain", "%"),
    ]
    .concat()
}

/// Formatted stat values: pressure, wind, daily rain, rain probability.
fn stat_values(s: &WeatherSnapshot) -> [String; 4] {
    [
        format!("{:.0}", s.pressure),
        format!("{:.1}", s.wind_speed),
        format!("{:.1}", s.daily_precipitation_sum),
        format!("{:.0}", s.daily_precipitation_probability),
    ]
}

struct Ready<'a> {
    state: &'a DashboardState,
    snapshot: &'a WeatherSnapshot,
    location: &'a Location,
}

impl Ready<'_> {
    fn coords(&self) -> String {
        let c = self.location.coordinates;
        format!("{:.4}°, {:.4}°", c.latitude, c.longitude)
    }

    fn last_update(&self) -> String {
        self.state.last_update_label().unwrap_or_else(|| "—".into())
    }

    fn weather_head(&self) -> String {
        let d = describe(self.snapshot.weather_code);
        format!(
            r#"<div class="weather-head"><span class="weather-icon">{icon}</span><div><div class="temp">{temp:.1}<small>°C</small></div><div class="feels">Feels like {feels:.0}°C</div><div class="desc">{desc}</div></div></div>"#,
            icon = d.icon,
            temp = self.snapshot.temperature,
            feels = self.snapshot.apparent_temperature,
            desc = escape(&self.snapshot.description),
        )
    }

    fn desktop(&self) -> String {
        let s = self.snapshot;
        let [pressure, wind, rain, prob] = stat_values(s);
        format!(
            r#"<main class="desk">
<header class="topbar">
{brand}
<div class="topbar-meta"><span class="gps gps-{status}">{gps}</span><span class="coords">{coords}</span><span class="date">{date}</span></div>
<div class="clock-box"><span class="clock-caption">TIME</span><span id="clock" class="clock">{clock}</span></div>
</header>
<div class="grid">
<section class="card weather-card">
<span class="live">LIVE</span>
<div class="city">{city}</div>
<div class="region">📍 {region}</div>
{head}
<div class="mini-stats">{p1}{p2}{p3}{p4}</div>
<div class="source"><span>Open-Meteo API</span><span>Updated {updated}</span></div>
</section>
<section class="card metrics-card">
<h3>Real-time metrics</h3>
<div class="rings">{rings}</div>
<div class="pills">{q1}{q2}{q3}{q4}</div>
</section>
<section class="card charts-card">
<h3>24-hour changes</h3>
<div class="charts">{charts}</div>
</section>
</div>
</main>"#,
            brand = brand(),
            status = self.state.gps_status.as_str(),
            gps = gps_label(self.state.gps_status),
            coords = self.coords(),
            date = escape(&self.state.date_label()),
            clock = self.state.clock_label(),
            city = escape(&self.location.city),
            region = escape(&self.location.region),
            head = self.weather_head(),
            p1 = stat_pill("Pressure", &pressure, "hPa", ORANGE),
            p2 = stat_pill("Wind", &wind, "m/s", SKY),
            p3 = stat_pill("Rain", &rain, "mm", INDIGO),
            p4 = stat_pill("Chance", &prob, "%", VIOLET),
            updated = self.last_update(),
            rings = gauges(s, 100.0),
            q1 = stat_pill("Air pressure", &pressure, "hPa", ORANGE),
            q2 = stat_pill("Wind speed", &wind, "m/s", SKY),
            q3 = stat_pill("Rainfall", &rain, "mm", INDIGO),
            q4 = stat_pill("Rain chance", &prob, "%", VIOLET),
            charts = charts("chart", &self.state.hourly),
        )
    }

    fn mobile(&self) -> String {
        let s = self.snapshot;
        let [pressure, wind, rain, prob] = stat_values(s);
        let stats: String = [
            ("Air pressure", format!("{} hPa", pressure)),
            ("Wind speed", format!("{} m/s", wind)),
            ("Rainfall", format!("{} mm", rain)),
            ("Rain chance", format!("{}%", prob)),
        ]
        .iter()
        .map(|(label, value)| format!(r#"<div class="stat"><p>{}</p><b>{}</b></div>"#, label, value))
        .collect();

        format!(
            r#"<main class="mob">
<header class="mob-header">
{brand}
<div class="clock-box"><span class="clock-caption">TIME</span><span id="clock" class="clock">{clock}</span></div>
</header>
<div class="gps-bar"><span class="gps gps-{status}">{gps}</span><span class="coords">{coords}</span></div>
<section class="card weather-card">
<h2 class="city">{city}</h2>
<p class="region">{region}</p>
{head}
<div class="stats">{stats}</div>
</section>
<section class="card metrics-card">
<h3>Real-time metrics</h3>
<div class="rings">{rings}</div>
<div class="charts">{charts}</div>
</section>
<footer class="card footer">
<div><p>Data source</p><p>Open-Meteo API</p></div>
<div><p>{coords}</p><p>Updated {updated}</p></div>
<div><p>{date}</p><p>Real-Time</p></div>
</footer>
</main>"#,
            brand = brand(),
            clock = self.state.clock_label(),
            status = self.state.gps_status.as_str(),
            gps = gps_label(self.state.gps_status),
            coords = self.coords(),
            city = escape(&self.location.city),
            region = escape(&self.location.region),
            head = self.weather_head(),
            stats = stats,
            rings = gauges(s, 80.0),
            charts = charts("mob-chart", &self.state.hourly),
            updated = self.last_update(),
            date = escape(&self.state.date_label()),
        )
    }
}
