use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// One stock item from the pricing reference export, after field-level
/// typing. `multiplier` and `new_price` start out unset and are filled in
/// by the pricing stages.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceRow {
    pub stock_id: String,
    pub metal: String,
    /// Per-unit base price; unparsable source values collapse to zero.
    pub price_per_unit: Decimal,
    /// Market-price field used for tier lookup; unparsable values are
    /// missing and leave the row without a resolved multiplier.
    pub gold_market: Option<Decimal>,
    /// Latest of the row's three source timestamps, when any parsed.
    pub max_date: Option<NaiveDateTime>,
    pub multiplier: Option<Decimal>,
    pub new_price: Option<Decimal>,
}

impl ReferenceRow {
    pub fn new(
        stock_id: impl Into<String>,
        metal: impl Into<String>,
        price_per_unit: Decimal,
        gold_market: Option<Decimal>,
        max_date: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            stock_id: stock_id.into(),
            metal: metal.into(),
            price_per_unit,
            gold_market,
            max_date,
            multiplier: None,
            new_price: None,
        }
    }
}
