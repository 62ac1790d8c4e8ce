//! Brand vocabularies and classification

/// Fallback brand when no vocabulary entry matches
pub const OTHER_BRAND: &str = "Other";

/// Known two-wheeler brands, in match priority order
pub const VEHICLE_BRANDS: &[&str] = &[
    "Yamaha",
    "Honda",
    "Bajaj",
    "TVS",
    "Hero",
    "Royal Enfield",
    "KTM",
    "Suzuki",
    "Kawasaki",
];

/// Known tyre brands, in match priority order
pub const TYRE_BRANDS: &[&str] = &[
    "MRF",
    "CEAT",
    "Apollo",
    "JK Tyre",
    "Michelin",
    "Bridgestone",
    "Goodyear",
    "Continental",
    "Pirelli",
    "Yokohama",
    "Falken",
    "TVS",
];

/// Classify a display name against an ordered vocabulary
///
/// The first vocabulary entry found anywhere in `name` (case-insensitive)
/// wins; no match yields [`OTHER_BRAND`].
pub fn classify_brand(vocabulary: &'static [&'static str], name: &str) -> &'static str {
    let haystack = name.to_lowercase();
    vocabulary
        .iter()
        .find(|brand| haystack.contains(&brand.to_lowercase()))
        .copied()
        .unwrap_or(OTHER_BRAND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_brand_anywhere() {
        assert_eq!(classify_brand(VEHICLE_BRANDS, "Yamaha R15 V4"), "Yamaha");
        assert_eq!(classify_brand(VEHICLE_BRANDS, "new royal enfield classic"), "Royal Enfield");
        assert_eq!(classify_brand(VEHICLE_BRANDS, "Duke 390 by KTM"), "KTM");
        assert_eq!(classify_brand(TYRE_BRANDS, "jk tyre Ultima"), "JK Tyre");
    }

    #[test]
    fn test_classify_first_hit_wins() {
        // "Honda" precedes "Hero" in the vocabulary
        assert_eq!(classify_brand(VEHICLE_BRANDS, "Hero Honda Splendor"), "Honda");
    }

    #[test]
    fn test_classify_unknown_is_other() {
        assert_eq!(classify_brand(VEHICLE_BRANDS, "Ather 450X"), OTHER_BRAND);
        assert_eq!(classify_brand(VEHICLE_BRANDS, ""), OTHER_BRAND);
        assert_eq!(classify_brand(&[], "Yamaha"), OTHER_BRAND);
    }
}
