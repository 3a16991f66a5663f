use activity_report::{
    Metric, MonthlyRecord, PERSIAN_MONTHS, RawHistory, SeriesBuilder, ViewMode, group_by_year,
    sorted_years,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn load_history() -> Vec<MonthlyRecord> {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("stock_history.json");
    let json = std::fs::read_to_string(path).expect("read fixture");
    RawHistory::from_json(&json).expect("parse fixture").records
}

fn record(year: i32, month: u8, domestic: Decimal) -> MonthlyRecord {
    MonthlyRecord::new(year, month, domestic, Decimal::ZERO)
}

#[test]
fn every_year_has_twelve_points_in_calendar_order() {
    let records = load_history();
    for view in [ViewMode::Pointwise, ViewMode::Cumulative] {
        let series = SeriesBuilder::default().view(view).build(&records);
        let years: Vec<i32> = series.iter().map(|s| s.year).collect();
        assert_eq!(years, vec![1400, 1401, 1402, 1403]);
        for s in &series {
            let labels: Vec<&str> = s.points.iter().map(|p| p.label.as_str()).collect();
            assert_eq!(labels, PERSIAN_MONTHS);
        }
    }
}

#[test]
fn missing_months_stay_empty_in_pointwise_view() {
    let series = SeriesBuilder::default().build(&load_history());
    let y1401 = &series[1];
    assert_eq!(y1401.name, "1401");
    assert_eq!(y1401.points[0].y, Some(dec!(282585)));
    assert_eq!(y1401.points[11].y, None);

    let y1402 = &series[2];
    assert_eq!(y1402.points[10].y, None);
    assert_eq!(y1402.points[11].y, Some(dec!(345978)));
}

#[test]
fn cumulative_view_carries_running_total_over_gaps() {
    let series = SeriesBuilder::default()
        .view(ViewMode::Cumulative)
        .build(&load_history());
    assert_eq!(series[1].points[11].y, Some(dec!(2508742)));
    assert_eq!(series[2].points[9].y, Some(dec!(4182295)));
    assert_eq!(series[2].points[10].y, Some(dec!(4182295)));
    assert_eq!(series[2].points[11].y, Some(dec!(4528273)));
}

#[test]
fn cumulative_equals_prefix_sum_of_pointwise() {
    let records = load_history();
    let pointwise = SeriesBuilder::default().build(&records);
    let cumulative = SeriesBuilder::default()
        .view(ViewMode::Cumulative)
        .build(&records);

    for (p, c) in pointwise.iter().zip(&cumulative) {
        let mut sum = Decimal::ZERO;
        let mut seen = false;
        for (pp, cp) in p.points.iter().zip(&c.points) {
            if let Some(value) = pp.y {
                sum += value;
                seen = true;
            }
            let expected = if seen { Some(sum) } else { None };
            assert_eq!(cp.y, expected, "year {} month {}", p.name, pp.label);
        }
    }
}

#[test]
fn cumulative_is_empty_before_first_record() {
    let records = [record(1399, 4, dec!(10)), record(1399, 6, Decimal::ZERO)];
    let series = SeriesBuilder::default()
        .view(ViewMode::Cumulative)
        .build(&records);
    let values = series[0].values();
    assert_eq!(&values[..3], &[None, None, None]);
    assert_eq!(values[3], Some(dec!(10)));
    assert_eq!(values[5], Some(dec!(10)));
    assert_eq!(values[11], Some(dec!(10)));
}

#[test]
fn observed_zero_is_not_missing() {
    let records = [record(1399, 2, Decimal::ZERO)];
    let values = SeriesBuilder::default().build(&records)[0].values();
    assert_eq!(values[0], None);
    assert_eq!(values[1], Some(Decimal::ZERO));
}

#[test]
fn duplicate_month_last_record_wins() {
    let records = [
        record(1400, 3, dec!(10)),
        record(1400, 1, dec!(1)),
        record(1400, 3, dec!(25)),
    ];
    let pointwise = SeriesBuilder::default().build(&records);
    assert_eq!(pointwise[0].points[2].y, Some(dec!(25)));

    let cumulative = SeriesBuilder::default()
        .view(ViewMode::Cumulative)
        .build(&records);
    assert_eq!(cumulative[0].points[2].y, Some(dec!(26)));
}

#[test]
fn years_sort_numerically_not_lexicographically() {
    assert_eq!(sorted_years(&["1403", "1392", "1400"]), vec![1392, 1400, 1403]);
    assert_eq!(sorted_years(&["10000", "999"]), vec![999, 10000]);

    let json = r#"[
        {"year": "1403", "month": 1, "domestic": 1, "export": 0},
        {"year": "1392", "month": 1, "domestic": 2, "export": 0},
        {"year": 1400, "month": 1, "domestic": 3}
    ]"#;
    let records = RawHistory::from_json(json).expect("parse").records;
    let groups: Vec<i32> = group_by_year(&records).iter().map(|g| g.year).collect();
    assert_eq!(groups, vec![1392, 1400, 1403]);
}

#[test]
fn year_groups_are_ordered_by_month() {
    let records = [
        record(1401, 5, dec!(5)),
        record(1401, 2, dec!(2)),
        record(1401, 9, dec!(9)),
    ];
    let groups = group_by_year(&records);
    let months: Vec<u8> = groups[0].records.iter().map(|r| r.month).collect();
    assert_eq!(months, vec![2, 5, 9]);
}

#[test]
fn total_metric_sums_domestic_and_export() {
    let records = [
        MonthlyRecord::new(1402, 1, dec!(100), dec!(40)),
        MonthlyRecord::new(1402, 2, dec!(50), dec!(10)),
    ];
    let export = SeriesBuilder::default().metric(Metric::Export).build(&records);
    assert_eq!(export[0].points[0].y, Some(dec!(40)));

    let total = SeriesBuilder::default()
        .metric(Metric::Total)
        .view(ViewMode::Cumulative)
        .build(&records);
    assert_eq!(total[0].points[0].y, Some(dec!(140)));
    assert_eq!(total[0].points[1].y, Some(dec!(200)));
}

#[test]
fn out_of_range_month_keeps_year_without_points() {
    let records = [record(1398, 13, dec!(5)), record(1398, 0, dec!(5))];
    let series = SeriesBuilder::default().build(&records);
    assert_eq!(series.len(), 1);
    assert!(series[0].values().iter().all(Option::is_none));
}

#[test]
fn overflowing_sums_saturate_instead_of_panicking() {
    let big = Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0);
    let records = [MonthlyRecord::new(1403, 1, big, big), record(1403, 2, big)];

    let total = SeriesBuilder::default().metric(Metric::Total).build(&records);
    assert_eq!(total[0].points[0].y, Some(Decimal::MAX));

    let cumulative = SeriesBuilder::default()
        .view(ViewMode::Cumulative)
        .build(&records);
    assert_eq!(cumulative[0].points[0].y, Some(big));
    assert_eq!(cumulative[0].points[1].y, Some(Decimal::MAX));
    assert_eq!(cumulative[0].points[11].y, Some(Decimal::MAX));
}

#[test]
fn no_records_no_series() {
    assert!(SeriesBuilder::default().build(&[]).is_empty());
}
