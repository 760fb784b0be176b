// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuantityError {
    #[error("quantity is empty")]
    Empty,
    #[error("invalid number in quantity {0:?}")]
    InvalidNumber(String),
    #[error("unknown suffix in quantity {0:?}")]
    UnknownSuffix(String),
    #[error("quantity {0:?} is out of range")]
    OutOfRange(String),
}

/// Parses a Kubernetes quantity into its exact numeric value.
///
/// Accepts binary suffixes (`Ki` .. `Ei`), decimal SI suffixes (`n` .. `E`) and
/// decimal exponents (`1e3`, `5E-2`).
pub fn parse_quantity(quantity: &Quantity) -> Result<Decimal, QuantityError> {
    let raw = quantity.0.trim();
    if raw.is_empty() {
        return Err(QuantityError::Empty);
    }

    let split = raw
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && (*c == '+' || *c == '-'))))
        .map(|(i, _)| i)
        .unwrap_or(raw.len());
    let (number, suffix) = raw.split_at(split);

    let value = Decimal::from_str(number.trim_start_matches('+'))
        .map_err(|_| QuantityError::InvalidNumber(raw.to_string()))?;
    let factor = suffix_factor(suffix).ok_or_else(|| QuantityError::UnknownSuffix(raw.to_string()))?;

    value
        .checked_mul(factor)
        .map(|parsed| parsed.normalize())
        .ok_or_else(|| QuantityError::OutOfRange(raw.to_string()))
}

/// Exact numeric equality. Quantities that fail to parse never compare equal.
pub fn quantities_equal(left: &Quantity, right: &Quantity) -> bool {
    match (parse_quantity(left), parse_quantity(right)) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}

fn suffix_factor(suffix: &str) -> Option<Decimal> {
    let binary = |power: u32| Some(Decimal::from(1u64 << (10 * power)));
    match suffix {
        "" => Some(Decimal::ONE),
        "Ki" => binary(1),
        "Mi" => binary(2),
        "Gi" => binary(3),
        "Ti" => binary(4),
        "Pi" => binary(5),
        "Ei" => binary(6),
        "n" => Some(Decimal::new(1, 9)),
        "u" => Some(Decimal::new(1, 6)),
        "m" => Some(Decimal::new(1, 3)),
        "k" => power_of_ten(3),
        "M" => power_of_ten(6),
        "G" => power_of_ten(9),
        "T" => power_of_ten(12),
        "P" => power_of_ten(15),
        "E" => power_of_ten(18),
        _ => {
            let exponent = suffix.strip_prefix(['e', 'E'])?;
            power_of_ten(exponent.parse::<i32>().ok()?)
        }
    }
}

fn power_of_ten(exponent: i32) -> Option<Decimal> {
    if exponent >= 0 {
        let exponent = u32::try_from(exponent).ok().filter(|e| *e <= 28)?;
        Some(Decimal::from_i128_with_scale(10i128.pow(exponent), 0))
    } else {
        let scale = exponent.unsigned_abs();
        (scale <= 28).then(|| Decimal::new(1, scale))
    }
}
