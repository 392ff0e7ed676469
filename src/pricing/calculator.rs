//! Seller price + rate -> commission and customer price.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Decimal places kept for stored currency amounts.
pub const CURRENCY_SCALE: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionBreakdown {
    pub seller_price: Decimal,
    pub commission_rate: Decimal,
    pub commission_amount: Decimal,
    pub customer_price: Decimal,
}

/// Round half-up to cents, always carrying two decimal places.
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_SCALE);
    rounded
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CalculationError {
    #[error("price calculation overflowed")]
    Overflow,
}

/// `commission_amount = seller_price * rate / 100` rounded to cents;
/// `customer_price = seller_price + commission_amount`.
pub fn calculate(seller_price: Decimal, rate_percent: Decimal) -> Result<CommissionBreakdown, CalculationError> {
    let raw = seller_price.checked_mul(rate_percent).ok_or(CalculationError::Overflow)?;
    let commission_amount = round_currency(raw / Decimal::ONE_HUNDRED);
    let customer_price = seller_price.checked_add(commission_amount).ok_or(CalculationError::Overflow)?;
    Ok(CommissionBreakdown {
        seller_price,
        commission_rate: rate_percent,
        commission_amount,
        customer_price: round_currency(customer_price),
    })
}
