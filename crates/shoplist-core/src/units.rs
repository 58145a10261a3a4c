//! Unit labels
//!
//! List items carry their unit as a long name ("kilograms"); lists display
//! a short label instead.

/// Long unit name to display abbreviation
pub const UNIT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("unit", "U"),
    ("liters", "Lts"),
    ("milliliters", "mL"),
    ("kilograms", "Kg"),
    ("grams", "G"),
    ("volume", "Vol."),
    ("pack", "Pack"),
    ("pounds", "Lb"),
    ("ounces", "Oz"),
    ("centimeters", "Cm"),
    ("meters", "Mts"),
];

/// Abbreviate a unit name
///
/// Unknown units are returned unchanged; an empty unit has no label.
pub fn unit_abbreviation(unit: &str) -> Option<&str> {
    if unit.is_empty() {
        return None;
    }
    let label = UNIT_ABBREVIATIONS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, abbr)| *abbr)
        .unwrap_or(unit);
    Some(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_units() {
        assert_eq!(unit_abbreviation("unit"), Some("U"));
        assert_eq!(unit_abbreviation("milliliters"), Some("mL"));
        assert_eq!(unit_abbreviation("volume"), Some("Vol."));
    }

    #[test]
    fn test_unknown_unit_passes_through() {
        assert_eq!(unit_abbreviation("dozen"), Some("dozen"));
    }

    #[test]
    fn test_empty_unit() {
        assert_eq!(unit_abbreviation(""), None);
    }
}
