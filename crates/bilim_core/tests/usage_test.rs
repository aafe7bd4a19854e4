use bilim_core::{TokenUsage, UsagePricing, UsageRecord};
use chrono::NaiveDate;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, 1).unwrap()
}

#[test]
fn test_token_usage_total() {
    assert_eq!(TokenUsage::new(250, 60).total(), 310);
    assert_eq!(TokenUsage::new(u64::MAX, 1).total(), u64::MAX);
}

#[test]
fn test_cost_is_monotonic() {
    let pricing = UsagePricing::default();
    let mut record = UsageRecord::new(start());

    for tokens in [0, 1, 310, 999, 1_000_000, 0, 42] {
        let before = *record.total_cost();
        record.add(tokens, &pricing);
        assert!(*record.total_cost() >= before);
    }

    assert_eq!(*record.facts_generated(), 7);
    assert_eq!(*record.total_tokens(), 1_001_352);
}

#[test]
fn test_report_averages_over_at_least_one_day() {
    let pricing = UsagePricing::default();
    let mut record = UsageRecord::new(start());
    record.add(1000, &pricing);
    record.add(1000, &pricing);

    let same_day = record.report(&pricing, start());
    assert_eq!(same_day.days_running, 1);
    assert_eq!(same_day.facts_per_day, 2.0);
    assert!((same_day.remaining_balance - 4.996).abs() < 1e-9);
    assert!(!same_day.low_balance);

    let later = record.report(&pricing, NaiveDate::from_ymd_opt(2024, 11, 5).unwrap());
    assert_eq!(later.days_running, 4);
    assert_eq!(later.facts_per_day, 0.5);
}

#[test]
fn test_low_balance_flag() {
    let pricing = UsagePricing {
        cost_per_1k_tokens: 1.0,
        initial_balance: 5.0,
        low_balance_threshold: 1.0,
    };
    let mut record = UsageRecord::new(start());
    record.add(3_900, &pricing);
    assert!(!record.report(&pricing, start()).low_balance);

    record.add(200, &pricing);
    assert!(record.report(&pricing, start()).low_balance);
}

#[test]
fn test_record_json_shape() {
    let record = UsageRecord::new(start());
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["start_date"], "2024-11-01");
    assert_eq!(json["total_tokens"], 0);
    assert_eq!(json["facts_generated"], 0);
}
