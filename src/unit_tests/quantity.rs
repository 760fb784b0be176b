// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::quantity::*;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use rust_decimal::Decimal;

fn q(value: &str) -> Quantity {
    Quantity(value.to_string())
}

#[test]
pub fn test_parse_plain_and_fraction() {
    assert_eq!(parse_quantity(&q("4")), Ok(Decimal::from(4)));
    assert_eq!(parse_quantity(&q("0.5")), Ok(Decimal::new(5, 1)));
    assert_eq!(parse_quantity(&q("-2")), Ok(Decimal::from(-2)));
}

#[test]
pub fn test_parse_suffixes() {
    assert_eq!(parse_quantity(&q("500m")), Ok(Decimal::new(5, 1)));
    assert_eq!(parse_quantity(&q("1k")), Ok(Decimal::from(1000)));
    assert_eq!(parse_quantity(&q("1Ki")), Ok(Decimal::from(1024)));
    assert_eq!(parse_quantity(&q("1Gi")), Ok(Decimal::from(1073741824u64)));
    assert_eq!(parse_quantity(&q("2e3")), Ok(Decimal::from(2000)));
    assert_eq!(parse_quantity(&q("1E")), Ok(Decimal::from(1_000_000_000_000_000_000u64)));
}

#[test]
pub fn test_numeric_equality() {
    assert!(quantities_equal(&q("1"), &q("1000m")));
    assert!(quantities_equal(&q("16Gi"), &q("17179869184")));
    assert!(quantities_equal(&q("1.5Gi"), &q("1536Mi")));
    assert!(quantities_equal(&q("1e3"), &q("1k")));
    assert!(!quantities_equal(&q("1G"), &q("1Gi")));
    assert!(!quantities_equal(&q("4"), &q("8")));
}

#[test]
pub fn test_invalid_quantities() {
    assert_eq!(parse_quantity(&q("")), Err(QuantityError::Empty));
    assert!(matches!(
        parse_quantity(&q("abc")),
        Err(QuantityError::InvalidNumber(_))
    ));
    assert!(matches!(
        parse_quantity(&q("1Xi")),
        Err(QuantityError::UnknownSuffix(_))
    ));
    assert!(!quantities_equal(&q("1Xi"), &q("1Xi")));
}
