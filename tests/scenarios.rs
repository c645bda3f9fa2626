use delay_penalty::{
    Decimal, Field, PayerCategory, PenaltyEngine, PenaltyError, PenaltyRequest, ReferenceData, compute_penalty,
};

fn request(handover: &str, actual: &str, payer: PayerCategory, exclude_moratorium: bool) -> PenaltyRequest {
    PenaltyRequest {
        price:              "5 000 000".to_owned(),
        handover_date:      handover.to_owned(),
        actual_date:        actual.to_owned(),
        payer,
        exclude_moratorium,
    }
}

#[test]
fn individual_one_month_late() {
    let result = compute_penalty(&request("01.01.2023", "01.02.2023", PayerCategory::Individual, false))
        .expect("valid request");
    assert_eq!(result.overdue_days, 31);
    assert_eq!(result.applied_rate_percent, Some(Decimal::new(75, 1)));
    assert_eq!(result.penalty_amount, Some(Decimal::new(7_750_000, 2)));
    assert_eq!(result.penalty_amount.map(|a| a.to_string()).as_deref(), Some("77500.00"));
}

#[test]
fn moratorium_covers_whole_delay() {
    let result = compute_penalty(&request("01.01.2023", "01.02.2023", PayerCategory::Individual, true))
        .expect("valid request");
    assert_eq!(result.overdue_days, 0);
    assert_eq!(result.excluded_days, 31);
    assert_eq!(result.penalty_amount, None);
}

#[test]
fn nonexistent_handover_date() {
    let err = compute_penalty(&request("31.02.2024", "01.03.2024", PayerCategory::Individual, false))
        .expect_err("31 February does not exist");
    assert!(matches!(
        err,
        PenaltyError::InvalidCalendarDate {
            field: Field::HandoverDate,
            ..
        }
    ));
}

#[test]
fn handover_before_rate_table() {
    let result = compute_penalty(&request("01.01.2019", "01.01.2020", PayerCategory::Individual, false))
        .expect("valid request");
    assert_eq!(result.overdue_days, 365);
    assert_eq!(result.applied_rate_percent, None);
    assert_eq!(result.penalty_amount, None);
}

#[test]
fn legal_entity_one_month_late() {
    let result = compute_penalty(&request("01.01.2023", "01.02.2023", PayerCategory::LegalEntity, false))
        .expect("valid request");
    assert_eq!(result.overdue_days, 31);
    assert_eq!(result.penalty_amount, Some(Decimal::new(15_500_000, 2)));
}

#[test]
fn custom_reference_tables_from_json() {
    let data = ReferenceData::from_json(
        r#"{
            "key_rates": [{ "since": "01.01.2015", "rate": "10" }],
            "moratoria": []
        }"#,
    )
    .expect("reference json");
    let engine = PenaltyEngine::from_reference(data).expect("valid tables");

    let result = engine
        .compute(&request("01.01.2019", "31.01.2019", PayerCategory::Individual, true))
        .expect("valid request");
    assert_eq!(result.overdue_days, 30);
    assert_eq!(result.applied_rate_percent, Some(Decimal::TEN));
    // 5 000 000 * 2 * 10 / 100 * 30 / 300
    assert_eq!(result.penalty_amount, Some(Decimal::new(10_000_000, 2)));
}

#[test]
fn result_json_shape() {
    let result = compute_penalty(&request("01.01.2023", "01.02.2023", PayerCategory::Individual, false))
        .expect("valid request");
    let json: serde_json::Value = serde_json::to_value(result).expect("serialize");
    assert_eq!(json["overdue_days"], 31);
    assert_eq!(json["penalty_amount"], "77500.00");
    assert_eq!(json["applied_rate_percent"], "7.50");
}
