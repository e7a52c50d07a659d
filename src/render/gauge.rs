//! SVG ring gauge.

use std::f64::consts::PI;

/// Scale maxima for the three dashboard dials.
pub const TEMPERATURE_MAX: f64 = 50.0;
pub const HUMIDITY_MAX: f64 = 100.0;
pub const RAIN_PROBABILITY_MAX: f64 = 100.0;

/// A circular dial whose arc length is proportional to `value / max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGauge {
    pub value: f64,
    pub max: f64,
    /// Rendered width and height, px.
    pub size: f64,
}

impl RingGauge {
    pub fn new(value: f64, max: f64, size: f64) -> Self {
        Self { value, max, size }
    }

    pub fn view_box(&self) -> f64 {
        self.size * 2.0
    }

    pub fn radius(&self) -> f64 {
        self.view_box() / 2.0 * 0.82
    }

    pub fn circumference(&self) -> f64 {
        2.0 * PI * self.radius()
    }

    /// Filled share of the circle, in [0, 1].
    pub fn fraction(&self) -> f64 {
        if !(self.value.is_finite() && self.max.is_finite() && self.max > 0.0) {
            return 0.0;
        }
        (self.value / self.max).clamp(0.0, 1.0)
    }

    pub fn arc(&self) -> f64 {
        self.fraction() * self.circumference()
    }

    pub fn gap(&self) -> f64 {
        self.circumference() - self.arc()
    }

    pub fn svg(&self, color: &str, label: &str, unit: &str) -> String {
        let vb = self.view_box();
        let c = vb / 2.0;
        let stroke = vb * 0.045;
        let shown = if self.value.is_finite() { self.value.round() } else { 0.0 };
        format!(
            concat!(
                r#"<div class="ring" style="--size:{size}px">"#,
                r#"<div class="ring-dial">"#,
                r#"<svg viewBox="0 0 {vb:.2} {vb:.2}" style="transform:rotate(-90deg)">"#,
                r#"<circle cx="{c:.2}" cy="{c:.2}" r="{r:.2}" fill="none" stroke="rgba(0,0,0,0.06)" stroke-width="{sw:.2}"/>"#,
                r#"<circle cx="{c:.2}" cy="{c:.2}" r="{r:.2}" fill="none" stroke="{color}" stroke-width="{sw:.2}" "#,
                r#"stroke-linecap="round" stroke-dasharray="{arc:.2} {gap:.2}" stroke-dashoffset="0"/>"#,
                r#"</svg>"#,
                r#"<div class="ring-value"><b>{shown}</b><span>{unit}</span></div>"#,
                r#"</div>"#,
                r#"<span class="ring-label">{label}</span>"#,
                r#"</div>"#,
            ),
            size = self.size,
            vb = vb,
            c = c,
            r = self.radius(),
            sw = stroke,
            color = super::escape(color),
            arc = self.arc(),
            gap = self.gap(),
            shown = shown,
            unit = super::escape(unit),
            label = super::escape(label),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_geometry() {
        let g = RingGauge::new(0.0, 50.0, 100.0);
        assert_relative_eq!(g.view_box(), 200.0);
        assert_relative_eq!(g.radius(), 82.0);
        assert_relative_eq!(g.circumference(), 2.0 * PI * 82.0);
    }

    #[test]
    fn test_half_value_fills_half() {
        let g = RingGauge::new(25.0, 50.0, 80.0);
        assert_relative_eq!(g.fraction(), 0.5);
        assert_relative_eq!(g.arc(), g.circumference() / 2.0);
        assert_relative_eq!(g.gap(), g.arc());
    }

    #[test]
    fn test_clamps_to_circle() {
        let over = RingGauge::new(75.0, 50.0, 80.0);
        assert_relative_eq!(over.arc(), over.circumference());
        assert_relative_eq!(over.gap(), 0.0);

        let under = RingGauge::new(-5.0, 50.0, 80.0);
        assert_relative_eq!(under.arc(), 0.0);
        assert_relative_eq!(under.gap(), under.circumference());
    }

    #[test]
    fn test_degenerate_max_is_empty() {
        assert_eq!(RingGauge::new(10.0, 0.0, 80.0).fraction(), 0.0);
        assert_eq!(RingGauge::new(10.0, -3.0, 80.0).fraction(), 0.0);
        assert_eq!(RingGauge::new(f64::NAN, 100.0, 80.0).fraction(), 0.0);
    }

    #[test]
    fn test_svg_dasharray() {
        let svg = RingGauge::new(25.0, 50.0, 100.0).svg("#f97316", "Temp", "°C");
        let half = PI * 82.0;
        assert!(svg.contains(&format!(r#"stroke-dasharray="{:.2} {:.2}""#, half, half)));
        assert!(svg.contains(r#"viewBox="0 0 200.00 200.00""#));
        assert!(svg.contains("<b>25</b><span>°C</span>"));
        assert!(svg.contains("rotate(-90deg)"));
    }
}
