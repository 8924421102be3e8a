pub mod categories;
pub mod mappings;
pub mod recurring;
pub mod transactions;
pub mod variances;

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Reference month in `YYYY-MM` form, as the API addresses it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Month(String);

impl Month {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Month {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = s.len() == 7
            && s.as_bytes()[4] == b'-'
            && s[..4].bytes().all(|b| b.is_ascii_digit())
            && matches!(s[5..].parse::<u8>(), Ok(1..=12));
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(MonthParseError(s.to_string()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthParseError(String);

impl Display for MonthParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid month '{}': expected YYYY-MM", self.0)
    }
}

impl std::error::Error for MonthParseError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionId(i64);

impl TransactionId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn inner(&self) -> i64 {
        self.0
    }
}

impl From<i64> for TransactionId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monetary amount in currency units, as the API reports it.
#[derive(Default, Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Valor(f64);

impl Valor {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn inner(&self) -> f64 {
        self.0
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0.0
    }
}

impl From<f64> for Valor {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<Valor> for f64 {
    fn from(value: Valor) -> Self {
        value.0
    }
}

impl std::ops::Add for Valor {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Valor {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::iter::Sum for Valor {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self(0.0), |acc, x| acc + x)
    }
}

impl std::fmt::Display for Valor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Envelope returned by the description-scoped mutation endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub success: bool,
    #[serde(default)]
    pub transacoes_atualizadas: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
}

/// `?categoria=` filter shared by the month-scoped list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct CategoriaQuery {
    pub categoria: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_parses_valid_values() {
        assert_eq!("2025-01".parse::<Month>().unwrap().as_str(), "2025-01");
        assert_eq!("1999-12".parse::<Month>().unwrap().as_str(), "1999-12");
    }

    #[test]
    fn month_rejects_malformed_values() {
        for bad in ["2025-13", "2025-00", "2025-1", "202501", "abcd-01", "2025-aa"] {
            assert!(bad.parse::<Month>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn valor_sums_and_abs() {
        let total: Valor = [Valor::new(-10.0), Valor::new(2.5)].into_iter().sum();
        assert_eq!(total.inner(), -7.5);
        assert_eq!(total.abs().inner(), 7.5);
    }
}
