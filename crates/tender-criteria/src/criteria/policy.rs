use rust_decimal::Decimal;

use super::domain::ProcurementCategory;

/// Rejected policy settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("rate bounds must satisfy 0 < min <= max <= 1 (min {min}, max {max})")]
    RateBounds { min: Decimal, max: Decimal },
    #[error("{category} cast ceiling {ceiling} must lie between 0 and 1")]
    CastCeiling {
        category: &'static str,
        ceiling: Decimal,
    },
}

/// Numeric limits applied to conversions and their coefficients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionPolicy {
    min_rate: Decimal,
    max_rate: Decimal,
    goods_ceiling: Decimal,
    works_ceiling: Decimal,
    services_ceiling: Decimal,
}

impl ConversionPolicy {
    pub fn new(
        min_rate: Decimal,
        max_rate: Decimal,
        goods_ceiling: Decimal,
        works_ceiling: Decimal,
        services_ceiling: Decimal,
    ) -> Result<Self, PolicyError> {
        if min_rate <= Decimal::ZERO || min_rate > max_rate || max_rate > Decimal::ONE {
            return Err(PolicyError::RateBounds {
                min: min_rate,
                max: max_rate,
            });
        }

        let ceilings = [
            (ProcurementCategory::Goods, goods_ceiling),
            (ProcurementCategory::Works, works_ceiling),
            (ProcurementCategory::Services, services_ceiling),
        ];
        for (category, ceiling) in ceilings {
            if ceiling < Decimal::ZERO || ceiling > Decimal::ONE {
                return Err(PolicyError::CastCeiling {
                    category: category.label(),
                    ceiling,
                });
            }
        }

        Ok(Self {
            min_rate,
            max_rate,
            goods_ceiling,
            works_ceiling,
            services_ceiling,
        })
    }

    pub fn min_rate(&self) -> Decimal {
        self.min_rate
    }

    pub fn max_rate(&self) -> Decimal {
        self.max_rate
    }

    /// Inclusive on both ends.
    pub fn rate_in_bounds(&self, rate: Decimal) -> bool {
        rate >= self.min_rate && rate <= self.max_rate
    }

    /// Largest total price reduction non-price criteria may cast on one lot.
    pub fn cast_ceiling(&self, category: ProcurementCategory) -> Decimal {
        match category {
            ProcurementCategory::Goods => self.goods_ceiling,
            ProcurementCategory::Works => self.works_ceiling,
            ProcurementCategory::Services => self.services_ceiling,
        }
    }
}

impl Default for ConversionPolicy {
    fn default() -> Self {
        Self {
            min_rate: Decimal::new(1, 2),
            max_rate: Decimal::ONE,
            goods_ceiling: Decimal::new(60, 2),
            works_ceiling: Decimal::new(80, 2),
            services_ceiling: Decimal::new(40, 2),
        }
    }
}
