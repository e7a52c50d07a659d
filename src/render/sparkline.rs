//! 24-point line charts as inline SVG.

use std::fmt::Write;

const WIDTH: f64 = 240.0;
const HEIGHT: f64 = 60.0;
const PAD: f64 = 2.0;

/// A line chart over one hourly metric.
#[derive(Debug, Clone, PartialEq)]
pub struct Sparkline<'a> {
    pub values: &'a [f64],
    pub color: &'a str,
}

impl<'a> Sparkline<'a> {
    pub fn new(values: &'a [f64], color: &'a str) -> Self {
        Self { values, color }
    }

    /// Y axis domain: [min − 1, max + 1]; (−1, 1) when empty.
    pub fn domain(&self) -> (f64, f64) {
        let finite = self.values.iter().copied().filter(|v| v.is_finite());
        let (lo, hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if lo > hi {
            (-1.0, 1.0)
        } else {
            (lo - 1.0, hi + 1.0)
        }
    }

    /// Polyline vertices in viewBox coordinates.
    pub fn points(&self) -> Vec<(f64, f64)> {
        let (lo, hi) = self.domain();
        let span = hi - lo;
        let step = if self.values.len() > 1 {
            (WIDTH - 2.0 * PAD) / (self.values.len() - 1) as f64
        } else {
            0.0
        };
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let v = if v.is_finite() { *v } else { lo };
                let x = PAD + step * i as f64;
                let y = HEIGHT - PAD - (v - lo) / span * (HEIGHT - 2.0 * PAD);
                (x, y)
            })
            .collect()
    }

    pub fn svg(&self) -> String {
        let mut pts = String::new();
        for (i, (x, y)) in self.points().into_iter().enumerate() {
            if i > 0 {
                pts.push(' ');
            }
            let _ = write!(pts, "{:.1},{:.1}", x, y);
        }
        format!(
            r#"<svg class="spark" viewBox="0 0 {w} {h}" preserveAspectRatio="none"><polyline fill="none" stroke="{color}" stroke-width="2" stroke-linejoin="round" stroke-linecap="round" points="{pts}"/></svg>"#,
            w = WIDTH,
            h = HEIGHT,
            color = super::escape(self.color),
            pts = pts,
        )
    }
}
