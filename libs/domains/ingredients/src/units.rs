//! Mass/volume unit conversion with grams as the common basis.
//!
//! Volumes assume a density of ~1 g/mL, which holds closely enough for the
//! aqueous and light-oil bases typical in cosmetic work. Unknown unit
//! strings are treated as grams rather than rejected; callers that need
//! strict units validate upstream.

/// Grams per avoirdupois ounce
pub const GRAMS_PER_OUNCE: f64 = 28.3495;

/// Grams per kilogram
pub const GRAMS_PER_KILOGRAM: f64 = 1000.0;

/// Grams per pound
pub const GRAMS_PER_POUND: f64 = 453.592;

/// Multiplier taking one unit of `unit` to grams.
///
/// Case-insensitive; singular and plural aliases accepted. Unrecognized
/// units map to 1.0 (treated as grams).
fn grams_multiplier(unit: &str) -> f64 {
    match unit.trim().to_lowercase().as_str() {
        "g" | "gram" | "grams" => 1.0,
        "oz" | "ounce" | "ounces" => GRAMS_PER_OUNCE,
        "kg" | "kilogram" | "kilograms" => GRAMS_PER_KILOGRAM,
        "lb" | "pound" | "pounds" => GRAMS_PER_POUND,
        // 1 mL ~ 1 g for typical cosmetic bases
        "ml" | "milliliter" | "milliliters" => 1.0,
        "l" | "liter" | "liters" => 1000.0,
        _ => 1.0,
    }
}

/// Convert a quantity in any supported unit to grams.
pub fn to_grams(quantity: f64, unit: &str) -> f64 {
    quantity * grams_multiplier(unit)
}

/// Convert grams to any supported unit.
pub fn from_grams(grams: f64, target_unit: &str) -> f64 {
    grams / grams_multiplier(target_unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assertions::assert_close;

    #[test]
    fn test_to_grams_known_units() {
        assert_close(to_grams(1.0, "g"), 1.0, 1e-9, "g");
        assert_close(to_grams(1.0, "oz"), 28.3495, 1e-9, "oz");
        assert_close(to_grams(2.0, "kg"), 2000.0, 1e-9, "kg");
        assert_close(to_grams(1.0, "lb"), 453.592, 1e-9, "lb");
        assert_close(to_grams(250.0, "ml"), 250.0, 1e-9, "ml");
        assert_close(to_grams(1.5, "l"), 1500.0, 1e-9, "l");
    }

    #[test]
    fn test_case_and_plural_aliases() {
        assert_close(to_grams(1.0, "Ounces"), 28.3495, 1e-9, "Ounces");
        assert_close(to_grams(1.0, "KILOGRAMS"), 1000.0, 1e-9, "KILOGRAMS");
        assert_close(to_grams(1.0, " Grams "), 1.0, 1e-9, "padded");
    }

    #[test]
    fn test_unknown_unit_falls_back_to_grams() {
        // Deliberate leniency: unrecognized unit strings behave as grams.
        assert_close(to_grams(42.0, "drops"), 42.0, 1e-9, "unknown unit");
        assert_close(from_grams(42.0, "scoops"), 42.0, 1e-9, "unknown target");
    }

    #[test]
    fn test_round_trip_all_units() {
        for unit in [
            "g", "gram", "grams", "oz", "ounce", "ounces", "kg", "kilogram", "kilograms", "lb",
            "pound", "pounds", "ml", "milliliter", "milliliters", "l", "liter", "liters",
        ] {
            for quantity in [0.1, 1.0, 37.5, 1000.0] {
                let round_tripped = from_grams(to_grams(quantity, unit), unit);
                assert_close(round_tripped, quantity, 1e-9, unit);
            }
        }
    }
}
