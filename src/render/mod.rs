//! Presentation: HTML pages, SVG primitives and the terminal summary.
//!
//! Everything here is a pure function of a [`DashboardState`] clone. No
//! renderer performs I/O or touches the controller.

pub mod gauge;
pub mod html;
pub mod sparkline;
pub mod text;

pub use gauge::RingGauge;
pub use sparkline::Sparkline;

use crate::dashboard::DashboardState;
use serde::Serialize;
use tokio::time::Instant;

/// Viewport width at which the desktop grid takes over.
pub const DESKTOP_MIN_WIDTH: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Desktop,
    Mobile,
}

impl Layout {
    /// Pick the layout for a viewport width. Unknown width → mobile.
    pub fn for_width(width: Option<u32>) -> Self {
        match width {
            Some(w) if w >= DESKTOP_MIN_WIDTH => Self::Desktop,
            _ => Self::Mobile,
        }
    }
}

/// Render the full dashboard page for `state` as seen at `at`.
pub fn page(state: &DashboardState, layout: Layout, at: Instant) -> String {
    html::page(state, layout, at)
}

/// Minimal HTML escaping for text and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_breakpoint() {
        assert_eq!(Layout::for_width(Some(1024)), Layout::Desktop);
        assert_eq!(Layout::for_width(Some(1920)), Layout::Desktop);
        assert_eq!(Layout::for_width(Some(1023)), Layout::Mobile);
        assert_eq!(Layout::for_width(Some(0)), Layout::Mobile);
        assert_eq!(Layout::for_width(None), Layout::Mobile);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<b>"Tom" & 'Jerry'</b>"#), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
        assert_eq!(escape("Yogyakarta"), "Yogyakarta");
    }
}
