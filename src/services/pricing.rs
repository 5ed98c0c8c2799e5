// src/services/pricing.rs
// DOCUMENTATION: Archive pricing
// PURPOSE: Single source of the price shown to buyers and charged by the provider

/// Largest gallery sold at the small tier
pub const SMALL_TIER_MAX_PHOTOS: u64 = 50;
/// Largest gallery sold at the medium tier
pub const MEDIUM_TIER_MAX_PHOTOS: u64 = 150;

pub const SMALL_TIER_PRICE: u32 = 3;
pub const MEDIUM_TIER_PRICE: u32 = 5;
pub const LARGE_TIER_PRICE: u32 = 8;

/// Price in whole currency units for a gallery of `photo_count` photos
pub fn price_for(photo_count: u64) -> u32 {
    if photo_count <= SMALL_TIER_MAX_PHOTOS {
        SMALL_TIER_PRICE
    } else if photo_count <= MEDIUM_TIER_MAX_PHOTOS {
        MEDIUM_TIER_PRICE
    } else {
        LARGE_TIER_PRICE
    }
}

/// The payment provider counts in hundredths
pub fn to_minor_units(price: u32) -> i64 {
    i64::from(price) * 100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(price_for(0), 3);
        assert_eq!(price_for(50), 3);
        assert_eq!(price_for(51), 5);
        assert_eq!(price_for(150), 5);
        assert_eq!(price_for(151), 8);
        assert_eq!(price_for(10_000), 8);
    }

    #[test]
    fn test_price_is_monotonic() {
        let mut previous = price_for(0);
        for count in 1..=400 {
            let price = price_for(count);
            assert!(price >= previous, "price dropped at {}", count);
            previous = price;
        }
        assert_eq!(price_for(u64::MAX), LARGE_TIER_PRICE);
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(to_minor_units(3), 300);
        assert_eq!(to_minor_units(5), 500);
        assert_eq!(to_minor_units(8), 800);
    }
}
