use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use thiserror::Error;

pub type Dec = Decimal;

/// Largest scale a `Decimal` can carry.
pub const MAX_SCALE: u32 = 28;

pub const STABILITY_ROUNDING: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecimalError {
    #[error("scale {0} is larger than the supported maximum of 28")]
    ScaleTooLarge(u32),
    #[error("unknown rounding mode `{0}`")]
    UnknownRounding(String),
}

/// How a value is rounded when it is brought to a fixed scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rounding {
    /// Round half to even (banker's rounding).
    #[default]
    HalfEven,
    HalfUp,
    HalfDown,
    Up,
    Down,
    Ceiling,
    Floor,
}

impl Rounding {
    pub fn strategy(self) -> RoundingStrategy {
        match self {
            Rounding::HalfEven => RoundingStrategy::MidpointNearestEven,
            Rounding::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            Rounding::HalfDown => RoundingStrategy::MidpointTowardZero,
            Rounding::Up => RoundingStrategy::AwayFromZero,
            Rounding::Down => RoundingStrategy::ToZero,
            Rounding::Ceiling => RoundingStrategy::ToPositiveInfinity,
            Rounding::Floor => RoundingStrategy::ToNegativeInfinity,
        }
    }
}

impl FromStr for Rounding {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "halfeven" => Ok(Rounding::HalfEven),
            "halfup" => Ok(Rounding::HalfUp),
            "halfdown" => Ok(Rounding::HalfDown),
            "up" => Ok(Rounding::Up),
            "down" => Ok(Rounding::Down),
            "ceiling" => Ok(Rounding::Ceiling),
            "floor" => Ok(Rounding::Floor),
            _ => Err(DecimalError::UnknownRounding(s.to_owned())),
        }
    }
}

impl fmt::Display for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rounding::HalfEven => "half-even",
            Rounding::HalfUp => "half-up",
            Rounding::HalfDown => "half-down",
            Rounding::Up => "up",
            Rounding::Down => "down",
            Rounding::Ceiling => "ceiling",
            Rounding::Floor => "floor",
        };
        write!(f, "{name}")
    }
}

/// Number of fractional digits kept by an operation together with the
/// rounding applied when digits are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Precision {
    scale: u32,
    rounding: Rounding,
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            scale: STABILITY_ROUNDING,
            rounding: Rounding::HalfEven,
        }
    }
}

impl Precision {
    pub fn new(scale: u32, rounding: Rounding) -> Result<Self, DecimalError> {
        if scale > MAX_SCALE {
            return Err(DecimalError::ScaleTooLarge(scale));
        }
        Ok(Self { scale, rounding })
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Of two precisions, the one keeping more digits.
    pub fn finer(self, other: Self) -> Self {
        if other.scale > self.scale {
            other
        } else {
            self
        }
    }

    pub fn round(&self, value: Dec) -> Dec {
        value.round_dp_with_strategy(self.scale, self.rounding.strategy())
    }

    pub fn sqrt(&self, value: Dec) -> Dec {
        let root = value
            .sqrt()
            .expect("square root is only taken of sums of squares");
        self.round(root)
    }
}

/// Numerical equivalence under a caller supplied tolerance.
pub fn approx_eq(a: Dec, b: Dec, tolerance: Dec) -> bool {
    (a - b).abs() <= tolerance
}

/// `value` lies in `[lo - tolerance, hi + tolerance]`.
pub fn within_range(value: Dec, lo: Dec, hi: Dec, tolerance: Dec) -> bool {
    value >= lo - tolerance && value <= hi + tolerance
}
