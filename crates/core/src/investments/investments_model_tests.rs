//! Tests for investment domain models.

use super::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn new_return(month: &str, pct: rust_decimal::Decimal) -> NewMonthlyReturn {
    NewMonthlyReturn {
        investment_id: "inv-1".to_string(),
        month: month.to_string(),
        return_percentage: pct,
        applied: false,
    }
}

#[test]
fn test_is_valid_month() {
    assert!(is_valid_month("2024-01"));
    assert!(is_valid_month("1999-12"));
    assert!(!is_valid_month("2024-1"));
    assert!(!is_valid_month("2024-13"));
    assert!(!is_valid_month("2024-00"));
    assert!(!is_valid_month("2024/01"));
    assert!(!is_valid_month("24-01-01"));
    assert!(!is_valid_month("２０２４-01"));
}

#[test]
fn test_new_monthly_return_validation() {
    assert!(new_return("2024-01", dec!(15)).validate().is_ok());
    assert!(new_return("2024-01", dec!(-100)).validate().is_ok());
    assert!(new_return("2024-01", dec!(-100.01)).validate().is_err());
    assert!(new_return("January", dec!(1)).validate().is_err());

    let mut missing_investment = new_return("2024-01", dec!(1));
    missing_investment.investment_id = " ".to_string();
    assert!(missing_investment.validate().is_err());
}

#[test]
fn test_new_investment_validation() {
    let valid = NewInvestment {
        id: None,
        investor_id: "investor-1".to_string(),
        amount: dec!(0),
        investment_type: InvestmentType::Single,
        pool: Pool::Base,
        date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
    };
    assert!(valid.validate().is_ok());

    let negative = NewInvestment {
        amount: dec!(-1),
        ..valid.clone()
    };
    assert!(negative.validate().is_err());

    let orphan = NewInvestment {
        investor_id: String::new(),
        ..valid
    };
    assert!(orphan.validate().is_err());
}

#[test]
fn test_pool_target_rates() {
    assert_eq!(Pool::Base.target_monthly_rate(), dec!(0.032));
    assert!(Pool::Performance.target_monthly_rate() > Pool::Mixed.target_monthly_rate());
    assert!(Pool::Mixed.target_monthly_rate() > Pool::Base.target_monthly_rate());
}

#[test]
fn test_investment_wire_format() {
    let json = r#"{
        "id": "inv-1",
        "investorId": "investor-1",
        "amount": 10000,
        "type": "recurring",
        "pool": "performance",
        "date": "2024-01-15",
        "status": "active"
    }"#;
    let investment: Investment = serde_json::from_str(json).unwrap();
    assert_eq!(investment.investment_type, InvestmentType::Recurring);
    assert_eq!(investment.pool, Pool::Performance);
    assert!(investment.monthly_returns.is_empty());
    assert_eq!(investment.acquisition_month(), "2024-01");
    assert!(investment.is_active());
}
