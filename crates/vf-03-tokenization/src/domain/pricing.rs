//! Credit pricing under a fixed per-ton policy.
//!
//! `price(kg) = kg / 1000 * price_per_ton`. Aggregations run on the full
//! precision value; only the value placed in a payload is rounded.

use super::config::{ConfigError, PricingConfig};

/// Decimal places of a price in a mint payload or metadata attribute.
pub const PRICE_DECIMALS: u32 = 4;

const KG_PER_TON: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PricingEngine {
    price_per_ton: f64,
    currency: String,
    reference_usd_per_ton: f64,
}

impl PricingEngine {
    pub fn new(config: &PricingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            price_per_ton: config.price_per_ton,
            currency: config.currency.clone(),
            reference_usd_per_ton: config.reference_usd_per_ton,
        })
    }

    pub fn price_per_ton(&self) -> f64 {
        self.price_per_ton
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Full-precision price. Non-positive and NaN masses price at zero.
    pub fn price(&self, carbon_kg: f64) -> f64 {
        if carbon_kg.is_nan() || carbon_kg <= 0.0 {
            return 0.0;
        }
        tons(carbon_kg) * self.price_per_ton
    }

    /// Price rounded for a payload.
    pub fn price_rounded(&self, carbon_kg: f64) -> f64 {
        round_to(self.price(carbon_kg), PRICE_DECIMALS)
    }

    pub fn reference_usd_per_ton(&self) -> f64 {
        self.reference_usd_per_ton
    }

    /// Fiat reference value, full precision.
    pub fn reference_value_usd(&self, carbon_kg: f64) -> f64 {
        if carbon_kg.is_nan() || carbon_kg <= 0.0 {
            return 0.0;
        }
        tons(carbon_kg) * self.reference_usd_per_ton
    }
}

pub fn tons(carbon_kg: f64) -> f64 {
    carbon_kg / KG_PER_TON
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn engine(price_per_ton: f64) -> PricingEngine {
        PricingEngine::new(&PricingConfig {
            price_per_ton,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_zero_mass_is_free() {
        assert_eq!(engine(0.02).price(0.0), 0.0);
        assert_eq!(engine(0.02).price(-5.0), 0.0);
    }

    #[test]
    fn test_one_ton_costs_price_per_ton() {
        assert_eq!(engine(0.02).price(1000.0), 0.02);
        assert_eq!(engine(50.0).price(1000.0), 50.0);
    }

    #[test]
    fn test_payload_price_rounds_to_four_places() {
        let pricing = engine(0.02);
        assert_eq!(pricing.price_rounded(1250.5), 0.025);
        assert!((pricing.price(1250.5) - 0.025_01).abs() < 1e-12);
    }

    #[test]
    fn test_usd_reference_value() {
        let pricing = engine(0.02);
        assert_eq!(pricing.reference_usd_per_ton(), 50.0);
        assert_eq!(pricing.reference_value_usd(2000.0), 100.0);
        assert_eq!(pricing.reference_value_usd(-1.0), 0.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PricingConfig {
            price_per_ton: f64::INFINITY,
            ..Default::default()
        };
        assert!(PricingEngine::new(&config).is_err());
    }

    proptest! {
        #[test]
        fn price_is_monotonic(a in 0.0f64..1e9, b in 0.0f64..1e9, ppt in 0.0f64..1e4) {
            let pricing = engine(ppt);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(pricing.price(lo) <= pricing.price(hi));
            prop_assert!(pricing.price_rounded(lo) <= pricing.price_rounded(hi));
        }
    }
}
