//! WMO weather code → label and icon.
//!
//! Only the codes the dashboard knows how to show get a real label;
//! everything else (snow codes, negatives, garbage) is "Not known".

use serde::Serialize;

/// Label shown for any code outside the table.
pub const UNKNOWN_LABEL: &str = "Not known";
/// Generic thermometer glyph for unknown codes.
pub const UNKNOWN_ICON: &str = "\u{1F321}\u{FE0F}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherDescription {
    pub code: i32,
    pub label: &'static str,
    pub icon: &'static str,
}

const TABLE: &[(i32, &str, &str)] = &[
    (0, "Clear sky", "\u{2600}\u{FE0F}"),
    (1, "Mostly clear", "\u{1F324}\u{FE0F}"),
    (2, "Partly cloudy", "\u{26C5}"),
    (3, "Overcast", "\u{2601}\u{FE0F}"),
    (45, "Foggy", "\u{1F32B}\u{FE0F}"),
    (48, "Dense fog", "\u{1F32B}\u{FE0F}"),
    (51, "Light drizzle", "\u{1F326}\u{FE0F}"),
    (53, "Moderate drizzle", "\u{1F326}\u{FE0F}"),
    (55, "Heavy drizzle", "\u{1F327}\u{FE0F}"),
    (61, "Light rain", "\u{1F327}\u{FE0F}"),
    (63, "Moderate rain", "\u{1F327}\u{FE0F}"),
    (65, "Heavy rain", "\u{26C8}\u{FE0F}"),
    (80, "Light showers", "\u{1F327}\u{FE0F}"),
    (81, "Heavy showers", "\u{26C8}\u{FE0F}"),
    (82, "Violent showers", "\u{26C8}\u{FE0F}"),
    (95, "Thunderstorm", "\u{26C8}\u{FE0F}"),
    (96, "Thunderstorm with hail", "\u{26C8}\u{FE0F}"),
    (99, "Severe thunderstorm", "\u{26C8}\u{FE0F}"),
];

/// Describe a WMO weather code. Never fails.
pub fn describe(code: i32) -> WeatherDescription {
    TABLE
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|&(code, label, icon)| WeatherDescription { code, label, icon })
        .unwrap_or(WeatherDescription {
            code,
            label: UNKNOWN_LABEL,
            icon: UNKNOWN_ICON,
        })
}

pub fn is_known(code: i32) -> bool {
    TABLE.iter().any(|(c, _, _)| *c == code)
}

/// The full known-code table, in code order.
pub fn known_codes() -> Vec<WeatherDescription> {
    TABLE
        .iter()
        .map(|&(code, label, icon)| WeatherDescription { code, label, icon })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels() {
        assert_eq!(describe(0).label, "Clear sky");
        assert_eq!(describe(3).label, "Overcast");
        assert_eq!(describe(48).label, "Dense fog");
        assert_eq!(describe(63).label, "Moderate rain");
        assert_eq!(describe(82).label, "Violent showers");
        assert_eq!(describe(99).label, "Severe thunderstorm");
    }

    #[test]
    fn test_every_table_entry_round_trips() {
        for entry in known_codes() {
            assert!(is_known(entry.code));
            assert_eq!(describe(entry.code), entry);
            assert_ne!(entry.label, UNKNOWN_LABEL);
        }
        assert_eq!(known_codes().len(), 18);
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        for code in [-1, -100, 4, 71, 77, 100, 1000, i32::MIN, i32::MAX] {
            let d = describe(code);
            assert_eq!(d.label, UNKNOWN_LABEL, "code {}", code);
            assert_eq!(d.icon, UNKNOWN_ICON);
            assert_eq!(d.code, code);
            assert!(!is_known(code));
        }
    }

    #[test]
    fn test_icons() {
        assert_eq!(describe(0).icon, "\u{2600}\u{FE0F}");
        assert_eq!(describe(45).icon, describe(48).icon);
        assert_eq!(describe(96).icon, "\u{26C8}\u{FE0F}");
    }
}
