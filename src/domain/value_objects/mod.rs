//! Value Objects for marketplace pricing

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Commission percentage, always within `[0, 100]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct CommissionRate(Decimal);

impl CommissionRate {
    pub const MAX: Decimal = Decimal::ONE_HUNDRED;

    pub fn new(value: Decimal) -> Result<Self, RateError> {
        if value.is_sign_negative() && !value.is_zero() { return Err(RateError::Negative); }
        if value > Self::MAX { return Err(RateError::AboveHundred); }
        Ok(Self(value))
    }
    pub fn value(&self) -> Decimal { self.0 }
}

impl TryFrom<Decimal> for CommissionRate {
    type Error = RateError;
    fn try_from(value: Decimal) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<CommissionRate> for Decimal {
    fn from(rate: CommissionRate) -> Self { rate.0 }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum RateError { Negative, AboveHundred }
impl std::error::Error for RateError {}
impl fmt::Display for RateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negative => write!(f, "commission rate cannot be negative"),
            Self::AboveHundred => write!(f, "commission rate cannot exceed 100"),
        }
    }
}

/// Seller price range a commission setting is eligible for. Both ends inclusive,
/// no upper bound when `max` is absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBand { min: Decimal, max: Option<Decimal> }

impl PriceBand {
    pub fn new(min: Decimal, max: Option<Decimal>) -> Result<Self, PriceBandError> {
        if min.is_sign_negative() && !min.is_zero() { return Err(PriceBandError::NegativeMin); }
        if let Some(max) = max {
            if max.is_sign_negative() && !max.is_zero() { return Err(PriceBandError::NegativeMax); }
            if max < min { return Err(PriceBandError::Inverted); }
        }
        Ok(Self { min, max })
    }
    pub fn contains(&self, price: Decimal) -> bool {
        self.min <= price && self.max.map_or(true, |max| price <= max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum PriceBandError { NegativeMin, NegativeMax, Inverted }
impl std::error::Error for PriceBandError {}
impl fmt::Display for PriceBandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeMin => write!(f, "minimum seller price cannot be negative"),
            Self::NegativeMax => write!(f, "maximum seller price cannot be negative"),
            Self::Inverted => write!(f, "maximum price cannot be less than minimum price"),
        }
    }
}

/// Price set by a seller: positive, whole cents, and small enough that the
/// customer price still fits a `NUMERIC(10, 2)` column at a 100% commission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct SellerPrice(Decimal);

impl SellerPrice {
    /// 49_999_999.99
    pub const MAX: Decimal = Decimal::from_parts(705_032_703, 1, 0, false, 2);

    pub fn new(value: Decimal) -> Result<Self, SellerPriceError> {
        if value <= Decimal::ZERO { return Err(SellerPriceError::NotPositive); }
        if value.normalize().scale() > 2 { return Err(SellerPriceError::FractionalCents); }
        if value > Self::MAX { return Err(SellerPriceError::TooLarge); }
        let mut cents = value;
        cents.rescale(2);
        Ok(Self(cents))
    }
    pub fn value(&self) -> Decimal { self.0 }
}

impl TryFrom<Decimal> for SellerPrice {
    type Error = SellerPriceError;
    fn try_from(value: Decimal) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<SellerPrice> for Decimal {
    fn from(price: SellerPrice) -> Self { price.0 }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum SellerPriceError { NotPositive, FractionalCents, TooLarge }
impl std::error::Error for SellerPriceError {}
impl fmt::Display for SellerPriceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPositive => write!(f, "seller price must be positive"),
            Self::FractionalCents => write!(f, "seller price cannot have more than 2 decimal places"),
            Self::TooLarge => write!(f, "seller price cannot exceed {}", SellerPrice::MAX),
        }
    }
}

/// Stock quantity value object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: u32) -> Self { Self(value) }
    pub fn value(&self) -> u32 { self.0 }
    pub fn subtract(&self, other: u32) -> Option<Self> {
        if other > self.0 { None } else { Some(Self(self.0 - other)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_bounds() {
        assert!(CommissionRate::new(Decimal::ZERO).is_ok());
        assert!(CommissionRate::new(Decimal::ONE_HUNDRED).is_ok());
        assert_eq!(CommissionRate::new(Decimal::new(1001, 1)), Err(RateError::AboveHundred));
        assert_eq!(CommissionRate::new(Decimal::new(-1, 0)), Err(RateError::Negative));
    }

    #[test]
    fn test_rate_deserialize_rejects_out_of_range() {
        let ok: CommissionRate = serde_json::from_str("\"12.5\"").unwrap();
        assert_eq!(ok.value(), Decimal::new(125, 1));
        assert!(serde_json::from_str::<CommissionRate>("\"150\"").is_err());
    }

    #[test]
    fn test_price_band() {
        let band = PriceBand::new(Decimal::new(100, 0), Some(Decimal::new(500, 0))).unwrap();
        assert!(!band.contains(Decimal::new(50, 0)));
        assert!(band.contains(Decimal::new(100, 0)));
        assert!(band.contains(Decimal::new(500, 0)));
        assert!(!band.contains(Decimal::new(50001, 2)));
        assert!(PriceBand::new(Decimal::ZERO, None).unwrap().contains(Decimal::new(1_000_000, 0)));
        assert_eq!(PriceBand::new(Decimal::new(10, 0), Some(Decimal::new(5, 0))), Err(PriceBandError::Inverted));
    }

    #[test]
    fn test_quantity() {
        let q = Quantity::new(5);
        assert_eq!(q.subtract(6), None);
        assert_eq!(q.subtract(5).map(|q| q.value()), Some(0));
    }

    #[test]
    fn test_seller_price_bounds() {
        assert_eq!(SellerPrice::MAX, "49999999.99".parse::<Decimal>().unwrap());
        assert_eq!(SellerPrice::new(SellerPrice::MAX).unwrap().value(), SellerPrice::MAX);
        assert_eq!(SellerPrice::new(Decimal::new(5_000_000_000, 2)), Err(SellerPriceError::TooLarge));
        assert_eq!(SellerPrice::new(Decimal::MAX), Err(SellerPriceError::TooLarge));
        assert_eq!(SellerPrice::new(Decimal::ZERO), Err(SellerPriceError::NotPositive));
        assert_eq!(SellerPrice::new(Decimal::new(-1, 2)), Err(SellerPriceError::NotPositive));
    }

    #[test]
    fn test_seller_price_whole_cents() {
        assert_eq!(SellerPrice::new(Decimal::new(10005, 3)), Err(SellerPriceError::FractionalCents));
        // Trailing zeros beyond cents are fine.
        let price = SellerPrice::new(Decimal::new(105000, 4)).unwrap();
        assert_eq!(price.value().to_string(), "10.50");
        assert_eq!(SellerPrice::new(Decimal::new(7, 0)).unwrap().value().to_string(), "7.00");
        assert!(serde_json::from_str::<SellerPrice>("\"0.001\"").is_err());
    }
}
