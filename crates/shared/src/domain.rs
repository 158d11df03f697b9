use std::{
    fmt,
    iter::Sum,
    ops::{Add, Mul},
};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ProductId);

const CENTS_PER_UNIT: i64 = 100;
const BASIS_POINTS_PER_UNIT: i64 = 10_000;

/// An amount of money held as whole cents.
///
/// On the wire it is a plain decimal number of currency units (`10.5`), which
/// is how catalog files express prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);
    /// Largest amount accepted from external input: one trillion units.
    pub const MAX: Money = Money(1_000_000_000_000 * CENTS_PER_UNIT);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Converts a unit amount to cents, rounding to the nearest cent.
    /// Returns `None` when the amount is not finite or exceeds [`Money::MAX`]
    /// in magnitude.
    pub fn from_units(units: f64) -> Option<Self> {
        let cents = (units * CENTS_PER_UNIT as f64).round();
        if !cents.is_finite() || cents.abs() > Self::MAX.0 as f64 {
            return None;
        }
        Some(Self(cents as i64))
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn as_units(self) -> f64 {
        self.0 as f64 / CENTS_PER_UNIT as f64
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a rate expressed in basis points and rounds half away
    /// from zero at the cent.
    pub fn apply_basis_points(self, basis_points: u32) -> Self {
        let scaled = i128::from(self.0) * i128::from(basis_points);
        let per_unit = i128::from(BASIS_POINTS_PER_UNIT);
        let half = per_unit / 2;
        let rounded = if scaled >= 0 {
            (scaled + half) / per_unit
        } else {
            (scaled - half) / per_unit
        };
        Self(saturate(rounded))
    }
}

fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, rhs: u32) -> Money {
        Money(self.0.saturating_mul(i64::from(rhs)))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(
            f,
            "{sign}{}.{:02}",
            abs / CENTS_PER_UNIT as u64,
            abs % CENTS_PER_UNIT as u64
        )
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_units())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let units = f64::deserialize(deserializer)?;
        Money::from_units(units).ok_or_else(|| {
            de::Error::custom(format!(
                "money amount {units} is not finite or exceeds {}",
                Money::MAX
            ))
        })
    }
}

/// A product as published by the external catalog source. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub img: String,
    pub price: Money,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub info: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartMembership {
    NotInCart,
    InCart,
}

/// A catalog entry together with its session-local cart fields.
///
/// `count`, `in_cart` and `total` only change together through
/// [`Product::set_count`] and [`Product::reset`], so `total == price * count`
/// holds for every value of `count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(flatten)]
    pub record: CatalogRecord,
    pub in_cart: bool,
    pub count: u32,
    pub total: Money,
}

impl Product {
    pub fn from_record(record: &CatalogRecord) -> Self {
        Self {
            record: record.clone(),
            in_cart: false,
            count: 0,
            total: Money::ZERO,
        }
    }

    pub fn id(&self) -> ProductId {
        self.record.id
    }

    pub fn title(&self) -> &str {
        &self.record.title
    }

    pub fn price(&self) -> Money {
        self.record.price
    }

    pub fn membership(&self) -> CartMembership {
        if self.in_cart {
            CartMembership::InCart
        } else {
            CartMembership::NotInCart
        }
    }

    pub fn set_count(&mut self, count: u32) {
        if count == 0 {
            self.reset();
            return;
        }
        self.in_cart = true;
        self.count = count;
        self.total = self.record.price * count;
    }

    pub fn reset(&mut self) {
        self.in_cart = false;
        self.count = 0;
        self.total = Money::ZERO;
    }
}
