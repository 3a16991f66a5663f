use activity_report::{
    ColumnKey, MetricFamily, MetricKey, RawReportTable, ReportError, ReportFilter, ReportRow,
    ReportTable, SortDirection, SortSpec, SortState, sort_rows,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

fn load_fixture(name: &str) -> ReportTable {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let json = std::fs::read_to_string(path).expect("read fixture");
    RawReportTable::from_json(&json)
        .expect("decode fixture")
        .parse()
        .expect("parse fixture")
}

fn key(s: &str) -> MetricKey {
    s.parse().expect("valid key")
}

fn codes(rows: &[ReportRow]) -> Vec<&str> {
    rows.iter().map(|r| r.code.as_str()).collect()
}

fn spec(property: &str, direction: SortDirection) -> SortSpec {
    SortSpec {
        property: key(property),
        direction,
    }
}

#[test]
fn parses_report_fixture() {
    let table = load_fixture("activity_report.json");
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.years, vec!["1402", "1403"]);
    assert_eq!(table.month, 12);
    assert_eq!(table.period, 1);
    assert_eq!(table.total, 155);

    let first = table.row("قشکر").expect("row");
    assert_eq!(first.external_id, Some(224));
    assert_eq!(first.exchange_id.as_deref(), Some("35964395659427029"));
    assert_eq!(
        first.value(key("domesticSellPrice_1403")),
        Some(dec!(1067615))
    );
    assert_eq!(
        first.value(key("domesticSellPrice_change.1403")),
        Some(dec!(1075.5414615884342))
    );

    let second = table.row("فولاد").expect("row");
    assert_eq!(second.external_id, Some(312));
    assert_eq!(second.rsi, Some(dec!(61.5)));

    let third = table.row("شپنا").expect("row");
    assert_eq!(third.rsi, None);
    assert_eq!(third.value(key("exportSellPrice_1403")), None);
}

#[test]
fn columns_follow_returned_years_plus_change() {
    let table = load_fixture("activity_report.json");
    assert_eq!(table.change_year(), Some(1403));
    assert_eq!(
        table.columns(),
        vec![
            ColumnKey::Year(1402),
            ColumnKey::Year(1403),
            ColumnKey::Change(1403)
        ]
    );

    let wide = ReportTable {
        years: vec!["1403".into(), "1401".into(), "1402".into()],
        ..ReportTable::default()
    };
    assert_eq!(wide.columns().len(), 4);
    assert_eq!(wide.columns()[3], ColumnKey::Change(1403));
}

#[test]
fn metric_keys_parse_and_display() {
    let k = key("totalSellPrice_change.1403");
    assert_eq!(k.family, MetricFamily::TotalSellPrice);
    assert_eq!(k.column, ColumnKey::Change(1403));
    assert_eq!(k.to_string(), "totalSellPrice_change.1403");
    assert_eq!(key("domesticSellCount_1402").to_string(), "domesticSellCount_1402");

    assert!(matches!(
        "volume_1402".parse::<MetricKey>(),
        Err(ReportError::MetricKey { .. })
    ));
    assert!("totalSellPrice_1402x".parse::<MetricKey>().is_err());
    assert!(matches!(
        "delta.1403".parse::<ColumnKey>(),
        Err(ReportError::ColumnKey { .. })
    ));
}

#[test]
fn rejects_unknown_column_keys() {
    let json = r#"{
        "records": [{"code": "x", "totalSellCount": {"1402": 1, "growth": 3}}],
        "years": ["1402"], "month": 12, "period": 1, "total": 1
    }"#;
    let raw = RawReportTable::from_json(json).expect("decode");
    assert!(matches!(raw.parse(), Err(ReportError::ColumnKey { .. })));
    assert!(matches!(
        RawReportTable::from_json("{"),
        Err(ReportError::Json(_))
    ));
}

#[test]
fn sorts_by_composite_key() {
    let mut table = load_fixture("activity_report.json");
    table.sort(spec("totalSellPrice_1403", SortDirection::Desc));
    assert_eq!(codes(&table.rows), vec!["فولاد", "قشکر", "شپنا"]);

    table.sort(spec("totalSellPrice_1403", SortDirection::Asc));
    assert_eq!(codes(&table.rows), vec!["شپنا", "قشکر", "فولاد"]);

    table.sort(spec("domesticSellCount_change.1403", SortDirection::Desc));
    assert_eq!(codes(&table.rows), vec!["شپنا", "قشکر", "فولاد"]);
}

#[test]
fn absent_values_sort_as_zero() {
    let mut table = load_fixture("activity_report.json");
    table.sort(spec("exportSellPrice_1403", SortDirection::Desc));
    assert_eq!(codes(&table.rows), vec!["فولاد", "قشکر", "شپنا"]);

    table.sort(spec("exportSellPrice_1403", SortDirection::Asc));
    assert_eq!(codes(&table.rows), vec!["شپنا", "قشکر", "فولاد"]);
    assert_eq!(table.rows.len(), 3);
}

fn tied_rows() -> Vec<ReportRow> {
    let k = key("totalSellCount_1403");
    let mut rows: Vec<ReportRow> = ["a", "b", "c", "d"].into_iter().map(ReportRow::new).collect();
    rows[0].set(k, dec!(5));
    rows[1].set(k, dec!(5));
    rows[2].set(k, dec!(7));
    rows
}

#[test]
fn sort_is_stable_and_idempotent() {
    let mut rows = tied_rows();
    sort_rows(&mut rows, spec("totalSellCount_1403", SortDirection::Desc));
    assert_eq!(codes(&rows), vec!["c", "a", "b", "d"]);

    let again = {
        let mut copy = rows.clone();
        sort_rows(&mut copy, spec("totalSellCount_1403", SortDirection::Desc));
        copy
    };
    assert_eq!(codes(&again), codes(&rows));

    sort_rows(&mut rows, spec("totalSellCount_1403", SortDirection::Asc));
    assert_eq!(codes(&rows), vec!["d", "a", "b", "c"]);
}

#[test]
fn sort_toggle_policy() {
    let price = key("totalSellPrice_1403");
    let count = key("totalSellCount_1403");
    let mut state = SortState::default();
    assert_eq!(state.active(), None);

    assert_eq!(state.select(price).direction, SortDirection::Desc);
    assert_eq!(state.select(price).direction, SortDirection::Asc);
    assert_eq!(state.select(price).direction, SortDirection::Desc);
    assert_eq!(state.select(price).direction, SortDirection::Asc);

    let switched = state.select(count);
    assert_eq!(switched.property, count);
    assert_eq!(switched.direction, SortDirection::Desc);
    assert_eq!(state.select(price).direction, SortDirection::Desc);

    state.clear();
    assert_eq!(state.active(), None);
}

#[test]
fn fixture_totals_are_consistent() {
    let table = load_fixture("activity_report.json");
    assert!(table.total_mismatches().is_empty());
}

#[test]
fn detects_total_mismatch_from_upstream() {
    let json = r#"{
        "records": [{
            "code": "قشکر",
            "domesticSellCount": {"1402": 2000, "1403": 2000, "change.1403": 0},
            "domesticSellPrice": {"1402": 90819, "1403": 1067615, "change.1403": 1075.54},
            "exportSellCount": {"1402": 2000, "1403": 2000, "change.1403": 0},
            "exportSellPrice": {"1402": 10, "1403": 20, "change.1403": 100},
            "totalSellCount": {"1402": 4000, "1403": 4000, "change.1403": 0},
            "totalSellPrice": {"1402": 90819, "1403": 1067615, "change.1403": 1075.54}
        }],
        "years": ["1402", "1403"], "month": 12, "period": 1, "total": 1
    }"#;
    let table = RawReportTable::from_json(json)
        .expect("decode")
        .parse()
        .expect("parse");
    let mismatches = table.total_mismatches();
    assert_eq!(mismatches.len(), 1);
    match &mismatches[0] {
        ReportError::TotalMismatch {
            family,
            column,
            expected,
            actual,
            ..
        } => {
            assert_eq!(*family, MetricFamily::TotalSellPrice);
            assert_eq!(*column, ColumnKey::Year(1402));
            assert_eq!(*expected, dec!(90829));
            assert_eq!(*actual, dec!(90819));
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn overflowing_expected_total_is_reported_not_panicked() {
    let json = r#"{
        "records": [{
            "code": "فولاد",
            "domesticSellPrice": {"1403": "50000000000000000000000000000"},
            "exportSellPrice": {"1403": "50000000000000000000000000000"},
            "totalSellPrice": {"1403": "1"}
        }],
        "years": ["1403"], "month": 12, "period": 1, "total": 1
    }"#;
    let table = RawReportTable::from_json(json)
        .expect("decode")
        .parse()
        .expect("parse");
    let mismatches = table.total_mismatches();
    assert_eq!(mismatches.len(), 1);
    match &mismatches[0] {
        ReportError::TotalMismatch {
            family,
            expected,
            actual,
            ..
        } => {
            assert_eq!(*family, MetricFamily::TotalSellPrice);
            assert_eq!(*expected, Decimal::MAX);
            assert_eq!(*actual, Decimal::ONE);
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn rows_built_from_parts_hold_total_invariant() {
    let years = |a: Decimal, b: Decimal| {
        BTreeMap::from([(ColumnKey::Year(1402), a), (ColumnKey::Year(1403), b)])
    };
    let row = ReportRow::from_parts(
        "فولاد",
        years(dec!(150000), dec!(120000)),
        years(dec!(12000000), dec!(15500000)),
        BTreeMap::from([(ColumnKey::Year(1403), dec!(70000))]),
        years(dec!(4000000), dec!(6100000)),
    );
    assert!(row.check_totals().is_ok());
    for year in [1402, 1403] {
        let column = ColumnKey::Year(year);
        let total = row.value_or_zero(MetricKey::new(MetricFamily::TotalSellCount, column));
        let domestic = row.value_or_zero(MetricKey::new(MetricFamily::DomesticSellCount, column));
        let export = row.value_or_zero(MetricKey::new(MetricFamily::ExportSellCount, column));
        assert_eq!(total, domestic + export);
    }
    assert_eq!(
        row.value(key("totalSellPrice_1403")),
        Some(dec!(21600000))
    );
    assert_eq!(row.value(key("totalSellPrice_change.1403")), None);

    let mut broken = row;
    broken.set(key("totalSellCount_1402"), Decimal::ONE);
    assert!(broken.check_totals().is_err());
}

#[test]
fn filter_serializes_for_report_service() {
    let filter = ReportFilter::new([1402, 1403])
        .period(3)
        .sort(Some(spec("totalSellPrice_change.1403", SortDirection::Desc)));
    let value = serde_json::to_value(&filter).expect("serialize");
    assert_eq!(
        value,
        serde_json::json!({
            "subset": false,
            "years": [1402, 1403],
            "month": 12,
            "period": 3,
            "sort": {"property": "totalSellPrice_change.1403", "direction": "desc"}
        })
    );

    let plain = serde_json::to_value(ReportFilter::new([1403])).expect("serialize");
    assert!(plain.get("sort").is_none());
}
