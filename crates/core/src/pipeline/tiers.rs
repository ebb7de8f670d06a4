use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::reference::ReferenceRow;

const TIER_COUNT: usize = 9;

// Divisor/multiplier pairs as (mantissa, scale). Breakpoint = spot / divisor,
// so descending divisors give ascending breakpoints ending at the spot price
// itself with multiplier 1.
const GOLD_DIVISORS: [(i64, u32); TIER_COUNT] =
    [(21, 1), (17, 1), (15, 1), (135, 2), (125, 2), (1175, 3), (11, 1), (10683, 4), (1, 0)];
const GOLD_MULTIPLIERS: [(i64, u32); TIER_COUNT] =
    [(2, 0), (18, 1), (16, 1), (14, 1), (13, 1), (12, 1), (11, 1), (105, 2), (1, 0)];
const SILVER_DIVISORS: [(i64, u32); TIER_COUNT] = [
    (22, 1),
    (15573, 4),
    (14615, 4),
    (13571, 4),
    (13073, 4),
    (12025, 4),
    (11176, 4),
    (10555, 4),
    (1, 0),
];
const SILVER_MULTIPLIERS: [(i64, u32); TIER_COUNT] =
    [(2, 0), (16, 1), (15, 1), (14, 1), (13, 1), (12, 1), (11, 1), (105, 2), (1, 0)];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceTier {
    pub breakpoint: Decimal,
    pub multiplier: Decimal,
}

/// Step function from market-price breakpoints to price multipliers, built
/// fresh from one spot price per run and sorted ascending by breakpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct MultiplierTable {
    tiers: Vec<PriceTier>,
}

impl MultiplierTable {
    pub fn gold(spot: Decimal) -> Self {
        Self::build(spot, &GOLD_DIVISORS, &GOLD_MULTIPLIERS)
    }

    pub fn silver(spot: Decimal) -> Self {
        Self::build(spot, &SILVER_DIVISORS, &SILVER_MULTIPLIERS)
    }

    fn build(
        spot: Decimal,
        divisors: &[(i64, u32); TIER_COUNT],
        multipliers: &[(i64, u32); TIER_COUNT],
    ) -> Self {
        let mut tiers: Vec<PriceTier> = divisors
            .iter()
            .zip(multipliers)
            .map(|(&(d_mantissa, d_scale), &(m_mantissa, m_scale))| PriceTier {
                breakpoint: spot / Decimal::new(d_mantissa, d_scale),
                multiplier: Decimal::new(m_mantissa, m_scale),
            })
            .collect();
        tiers.sort_by(|a, b| a.breakpoint.cmp(&b.breakpoint));
        Self { tiers }
    }

    pub fn tiers(&self) -> &[PriceTier] {
        &self.tiers
    }

    /// Ceiling lookup: the multiplier of the first breakpoint strictly
    /// greater than `market`. A value at or above every breakpoint takes the
    /// last tier (multiplier 1 by construction). Exact equality with a
    /// breakpoint does not match and falls upward.
    pub fn lookup(&self, market: Decimal) -> Option<Decimal> {
        match self.tiers.iter().find(|tier| tier.breakpoint > market) {
            Some(tier) => Some(tier.multiplier),
            None => self.tiers.last().map(|tier| tier.multiplier),
        }
    }
}

/// Assigns each row's multiplier from the table matching its metal class.
/// Exactly the literal `S/S` routes to silver; everything else, including an
/// empty metal, routes to gold. A missing market value leaves the multiplier
/// missing.
pub fn resolve_multipliers(
    rows: &mut [ReferenceRow],
    gold: &MultiplierTable,
    silver: &MultiplierTable,
) {
    for row in rows {
        row.multiplier = row.gold_market.and_then(|market| {
            if row.metal == "S/S" {
                silver.lookup(market)
            } else {
                gold.lookup(market)
            }
        });
    }
}

/// `new_price = price_per_unit * multiplier`, with a missing multiplier
/// treated as 1, rounded half-to-even to currency precision.
pub fn apply_pricing(rows: &mut [ReferenceRow]) {
    for row in rows {
        let multiplier = row.multiplier.unwrap_or(Decimal::ONE);
        row.new_price = Some(round_price(row.price_per_unit * multiplier));
    }
}

pub(crate) fn round_price(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}
