use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use rust_decimal::{
    prelude::{FromPrimitive, ToPrimitive},
    Decimal,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::op;

pub const USDT_CURRENCY_CODE: &str = "USDT";
/// USDT (TRC20) carries six fractional digits on-chain.
pub const USDT_DECIMALS: u32 = 6;

//--------------------------------------     UsdtAmount       ---------------------------------------------------------
/// An exact USDT amount, in whole units (i.e. `UsdtAmount::from(2)` is two USDT).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct UsdtAmount(Decimal);

op!(binary UsdtAmount, Add, add);
op!(binary UsdtAmount, Sub, sub);
op!(inplace UsdtAmount, AddAssign, add_assign);
op!(inplace UsdtAmount, SubAssign, sub_assign);
op!(unary UsdtAmount, Neg, neg);

impl Sum for UsdtAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a USDT amount: {0}")]
pub struct UsdtConversionError(String);

impl From<i64> for UsdtAmount {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl TryFrom<Decimal> for UsdtAmount {
    type Error = UsdtConversionError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        let value = value.normalize();
        if value.scale() > USDT_DECIMALS {
            return Err(UsdtConversionError(format!("{value} has more than {USDT_DECIMALS} decimal places")));
        }
        Ok(Self(value))
    }
}

impl From<UsdtAmount> for Decimal {
    fn from(value: UsdtAmount) -> Self {
        value.0
    }
}

impl FromStr for UsdtAmount {
    type Err = UsdtConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|e| UsdtConversionError(format!("{s}: {e}")))?;
        Self::try_from(value)
    }
}

impl Display for UsdtAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {USDT_CURRENCY_CODE}", self.0.normalize())
    }
}

impl UsdtAmount {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// The inclusive range `[self - tolerance, self + tolerance]`. Fails if either bound cannot be represented.
    pub fn window(self, tolerance: Self) -> Result<(Self, Self), UsdtConversionError> {
        match (self.checked_sub(tolerance), self.checked_add(tolerance)) {
            (Some(min), Some(max)) => Ok((min, max)),
            _ => Err(UsdtConversionError(format!("The range {} ± {} is too large", self.0, tolerance.0))),
        }
    }

    /// The plain decimal representation, without a currency suffix. This is the form used for range bounds in the
    /// keyed store.
    pub fn to_plain_string(&self) -> String {
        self.0.normalize().to_string()
    }

    /// Converts the amount into a sorted-set score.
    pub fn to_score(&self) -> Result<f64, UsdtConversionError> {
        self.0.to_f64().ok_or_else(|| UsdtConversionError(format!("{} does not fit in a score", self.0)))
    }

    /// Recovers an amount from a sorted-set score. Scores are binary floats, so the value is rounded back to USDT
    /// precision.
    pub fn from_score(score: f64) -> Result<Self, UsdtConversionError> {
        Decimal::from_f64(score)
            .map(|d| Self(d.round_dp(USDT_DECIMALS).normalize()))
            .ok_or_else(|| UsdtConversionError(format!("{score} is not a valid amount")))
    }
}
