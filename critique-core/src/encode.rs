//! Visual encoding of qualitative labels.
//!
//! Maps complexity notation, issue severity, and issue type to display colors,
//! and complexity to a proportional bar width. Every function here is total:
//! unknown, empty, or absent input yields the neutral default.

use std::fmt;

/// An sRGB color, rendered as `#rrggbb` in HTML and as truecolor in the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

pub const GREEN: Rgb = Rgb(0x4c, 0xaf, 0x50); // #4caf50
pub const LIGHT_GREEN: Rgb = Rgb(0x8b, 0xc3, 0x4a); // #8bc34a
pub const YELLOW: Rgb = Rgb(0xff, 0xc1, 0x07); // #ffc107
pub const ORANGE: Rgb = Rgb(0xff, 0x98, 0x00); // #ff9800
pub const ORANGE_RED: Rgb = Rgb(0xff, 0x57, 0x22); // #ff5722
pub const RED: Rgb = Rgb(0xf4, 0x43, 0x36); // #f44336
pub const PINK_RED: Rgb = Rgb(0xe9, 0x1e, 0x63); // #e91e63
pub const BLUE: Rgb = Rgb(0x21, 0x96, 0xf3); // #2196f3
pub const GRAY: Rgb = Rgb(0x9e, 0x9e, 0x9e); // #9e9e9e

/// Asymptotic growth classes, ordered from slowest to fastest growth.
///
/// `Unknown` sits outside the ordering; it is what any unrecognized notation
/// classifies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexityClass {
    Constant,
    Logarithmic,
    Linear,
    Linearithmic,
    Quadratic,
    Exponential,
    Unknown,
}

impl ComplexityClass {
    /// Known classes in growth order.
    pub const ORDERED: [ComplexityClass; 6] = [
        ComplexityClass::Constant,
        ComplexityClass::Logarithmic,
        ComplexityClass::Linear,
        ComplexityClass::Linearithmic,
        ComplexityClass::Quadratic,
        ComplexityClass::Exponential,
    ];

    /// Classifies free-form notation such as `"O(n log n)"`.
    ///
    /// Matching is case-insensitive and substring-based, checked in a fixed
    /// priority order; the first hit wins. Linear is the one exact match so
    /// that `"O(n)"` is not confused with the other `O(n…` forms.
    pub fn classify(notation: Option<&str>) -> Self {
        let Some(raw) = notation else {
            return ComplexityClass::Unknown;
        };
        let c = raw.trim().to_lowercase();
        if c.is_empty() {
            ComplexityClass::Unknown
        } else if c.contains("o(1)") {
            ComplexityClass::Constant
        } else if c.contains("o(log n)") {
            ComplexityClass::Logarithmic
        } else if c == "o(n)" {
            ComplexityClass::Linear
        } else if c.contains("o(n log n)") {
            ComplexityClass::Linearithmic
        } else if c.contains("o(n²)") || c.contains("o(n^2)") {
            ComplexityClass::Quadratic
        } else if c.contains("o(2^n)") || c.contains("o(n!)") {
            ComplexityClass::Exponential
        } else {
            ComplexityClass::Unknown
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            ComplexityClass::Constant => GREEN,
            ComplexityClass::Logarithmic | ComplexityClass::Linear => LIGHT_GREEN,
            ComplexityClass::Linearithmic => YELLOW,
            ComplexityClass::Quadratic => ORANGE,
            ComplexityClass::Exponential => RED,
            ComplexityClass::Unknown => GRAY,
        }
    }

    /// Bar width in percent. A fixed lookup, not a computed growth rate.
    pub fn width_pct(self) -> u16 {
        match self {
            ComplexityClass::Constant => 10,
            ComplexityClass::Logarithmic => 20,
            ComplexityClass::Linear => 30,
            ComplexityClass::Linearithmic => 50,
            ComplexityClass::Quadratic => 70,
            ComplexityClass::Exponential => 90,
            ComplexityClass::Unknown => 50,
        }
    }
}

pub fn complexity_color(notation: Option<&str>) -> Rgb {
    ComplexityClass::classify(notation).color()
}

pub fn complexity_width(notation: Option<&str>) -> u16 {
    ComplexityClass::classify(notation).width_pct()
}

/// Badge color for an issue severity label.
pub fn severity_color(severity: Option<&str>) -> Rgb {
    match severity.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("critical") => RED,
        Some("high") => ORANGE_RED,
        Some("medium") => ORANGE,
        Some("low") => GREEN,
        _ => GRAY,
    }
}

/// Badge color for an issue type label.
pub fn issue_kind_color(kind: Option<&str>) -> Rgb {
    match kind.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("bug") => RED,
        Some("security") => PINK_RED,
        Some("performance") => ORANGE,
        Some("best_practice") => BLUE,
        _ => GRAY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_known_notation() {
        let cases = [
            ("O(1)", ComplexityClass::Constant),
            ("o(log n)", ComplexityClass::Logarithmic),
            ("O(n)", ComplexityClass::Linear),
            ("O(n log n)", ComplexityClass::Linearithmic),
            ("O(n²)", ComplexityClass::Quadratic),
            ("O(N^2)", ComplexityClass::Quadratic),
            ("O(2^n)", ComplexityClass::Exponential),
            ("O(n!)", ComplexityClass::Exponential),
        ];
        for (notation, expected) in cases {
            assert_eq!(ComplexityClass::classify(Some(notation)), expected, "{notation}");
        }
    }

    #[test]
    fn linear_requires_exact_match() {
        assert_eq!(ComplexityClass::classify(Some("  O(N)  ")), ComplexityClass::Linear);
        assert_eq!(
            ComplexityClass::classify(Some("O(n) amortized")),
            ComplexityClass::Unknown
        );
    }

    #[test]
    fn substring_match_tolerates_prose() {
        assert_eq!(
            ComplexityClass::classify(Some("Constant time, O(1) per lookup")),
            ComplexityClass::Constant
        );
        assert_eq!(complexity_color(Some("roughly O(n log n) due to sort")), YELLOW);
    }

    #[test]
    fn width_is_monotonic_over_growth_order() {
        let widths: Vec<u16> = ComplexityClass::ORDERED.iter().map(|c| c.width_pct()).collect();
        assert!(widths.windows(2).all(|w| w[0] <= w[1]), "{widths:?}");
    }

    #[test]
    fn unknown_and_absent_fall_back() {
        for input in [None, Some(""), Some("   "), Some("O(n^3)"), Some("fast")] {
            assert_eq!(complexity_color(input), GRAY);
            assert_eq!(complexity_width(input), 50);
        }
    }

    #[test]
    fn badge_colors_match_palette() {
        assert_eq!(issue_kind_color(Some("bug")).hex(), "#f44336");
        assert_eq!(severity_color(Some("high")).hex(), "#ff5722");
        assert_eq!(severity_color(Some("CRITICAL")), RED);
        assert_eq!(issue_kind_color(Some("Best_Practice")), BLUE);
        assert_eq!(issue_kind_color(Some("Security")), PINK_RED);
        assert_eq!(severity_color(Some("low")), GREEN);
    }

    #[test]
    fn badge_colors_are_total() {
        for input in [None, Some(""), Some("nope"), Some("MEDIUMISH")] {
            assert_eq!(severity_color(input), GRAY);
            assert_eq!(issue_kind_color(input), GRAY);
        }
    }
}
