use pretty_assertions::assert_eq;
use serde_json::json;

use table_sort::{
    normalize_missing, sort_rows, sort_scalar, sort_wrapped, ComparabilityGuard, FieldValue, Row,
    RowComparator, SortDirection, SortError, SortOptions, MISSING_SENTINEL,
};

fn rows(value: serde_json::Value) -> Vec<Row> {
    serde_json::from_value(value).unwrap()
}

fn values(rows: &[Row], key: &str) -> Vec<serde_json::Value> {
    rows.iter()
        .map(|row| {
            row.get(key)
                .map(serde_json::Value::from)
                .unwrap_or(serde_json::Value::Null)
        })
        .collect()
}

#[test]
fn wrapped_numbers_sort_both_ways() {
    let mut data = rows(json!([{"otri": {"value": 50}}, {"otri": {"value": 10}}]));

    sort_wrapped(&mut data, "otri", SortDirection::Ascending).unwrap();
    assert_eq!(
        values(&data, "otri"),
        vec![json!({"value": 10}), json!({"value": 50})]
    );

    sort_wrapped(&mut data, "otri", SortDirection::Descending).unwrap();
    assert_eq!(
        values(&data, "otri"),
        vec![json!({"value": 50}), json!({"value": 10})]
    );
}

#[test]
fn scalar_strings_sort_ascending() {
    let mut data = rows(json!([{"market": "DAL"}, {"market": "ATL"}]));
    sort_scalar(&mut data, "market", SortDirection::from_token("asc")).unwrap();
    assert_eq!(values(&data, "market"), vec![json!("ATL"), json!("DAL")]);
}

#[test]
fn explicit_zero_and_missing_score_rank_adjacently() {
    let mut data = rows(json!([{"score": 0}, {}]));
    sort_scalar(&mut data, "score", SortDirection::Ascending).unwrap();

    assert_eq!(data.len(), 2);
    assert_eq!(values(&data, "score"), vec![json!(0), json!(MISSING_SENTINEL)]);
}

#[test]
fn falsy_booleans_contribute_no_ordering() {
    let mut data = rows(json!([{"x": false}, {"x": true}]));
    sort_scalar(&mut data, "x", SortDirection::Ascending).unwrap();

    // The pair is reported equal, so the sort leaves it as it was.
    assert_eq!(values(&data, "x"), vec![json!(false), json!(true)]);
}

#[test]
fn missing_fields_are_filled_regardless_of_direction() {
    for direction in [SortDirection::Ascending, SortDirection::Descending] {
        let mut data = rows(json!([{"score": 3}, {"market": "ATL"}, {"score": 9}, {}]));
        sort_scalar(&mut data, "score", direction).unwrap();

        let filled = data
            .iter()
            .filter(|row| row.get("score") == Some(&FieldValue::from(MISSING_SENTINEL)))
            .count();
        assert_eq!(filled, 2);
        assert!(data.iter().all(|row| row.contains_key("score")));
    }
}

#[test]
fn a_single_row_is_still_normalized() {
    let mut data = vec![Row::new().with("market", "ATL")];
    sort_wrapped(&mut data, "otri", SortDirection::Ascending).unwrap();
    assert_eq!(data[0].get("otri"), Some(&FieldValue::from(MISSING_SENTINEL)));
}

#[test]
fn unknown_direction_tokens_sort_descending() {
    let mut data = rows(json!([{"score": 21}, {"score": 77}, {"score": 38}]));
    sort_scalar(&mut data, "score", SortDirection::from_token("DESCENDING?")).unwrap();
    assert_eq!(values(&data, "score"), vec![json!(77), json!(38), json!(21)]);

    let mut data = rows(json!([{"score": 21}, {"score": 77}]));
    sort_scalar(&mut data, "score", SortDirection::from_token("Asc")).unwrap();
    assert_eq!(values(&data, "score"), vec![json!(77), json!(21)]);
}

#[test]
fn wrapped_sort_accepts_rows_filled_by_an_earlier_sort() {
    let mut data = rows(json!([
        {"otri": {"value": 50, "valid": true}},
        {},
        {"otri": {"value": 10, "valid": false}},
    ]));

    sort_wrapped(&mut data, "otri", SortDirection::Ascending).unwrap();
    // Sorting again sees the bare sentinel and must not treat it as a shape error.
    sort_wrapped(&mut data, "otri", SortDirection::Ascending).unwrap();

    let payloads: Vec<f64> = data
        .iter()
        .filter_map(|row| row.get("otri").and_then(FieldValue::as_wrapped))
        .map(|w| match w.value {
            table_sort::WrappedScalar::Number(n) => n,
            table_sort::WrappedScalar::Text(_) => f64::NAN,
        })
        .collect();
    assert_eq!(payloads, vec![10.0, 50.0]);
    assert!(data
        .iter()
        .any(|row| row.get("otri") == Some(&FieldValue::from(MISSING_SENTINEL))));
}

#[test]
fn wrapped_string_payloads_use_locale_order() {
    let mut data = rows(json!([
        {"status": {"value": "stale", "valid": false}},
        {"status": {"value": "Late"}},
        {"status": {"value": "ok"}},
    ]));
    sort_wrapped(&mut data, "status", SortDirection::Ascending).unwrap();
    assert_eq!(
        values(&data, "status"),
        vec![
            json!({"value": "Late"}),
            json!({"value": "ok"}),
            json!({"value": "stale", "valid": false}),
        ]
    );
}

#[test]
fn scalar_values_in_a_wrapped_sort_fail_fast() {
    let mut data = rows(json!([{"otri": {"value": 5}}, {"otri": 7}]));
    let before = data.clone();

    let err = sort_wrapped(&mut data, "otri", SortDirection::Ascending).unwrap_err();
    assert_eq!(err.row(), 1);
    assert!(matches!(err, SortError::InvalidFieldShape { .. }));
    assert_eq!(
        err.to_string(),
        "row 1: field `otri` holds a number, expected a wrapped field"
    );
    assert_eq!(data, before);
}

#[test]
fn records_without_value_are_uncomparable() {
    let mut data = rows(json!([{"otri": {"value": 5}}, {"otri": {"score": 1}}]));
    let err = sort_wrapped(&mut data, "otri", SortDirection::Ascending).unwrap_err();
    assert!(matches!(err, SortError::UncomparableType { row: 1, .. }));
}

#[test]
fn null_notes_fail_the_present_guard_sort_in_any_position() {
    let options = SortOptions {
        direction: SortDirection::Ascending,
        guard: ComparabilityGuard::Present,
        ..SortOptions::default()
    };

    for (data, null_row) in [
        (json!([{"note": "late"}, {"note": null}]), 1),
        (json!([{"note": null}, {"note": "late"}]), 0),
    ] {
        let mut data = rows(data);
        let before = data.clone();

        let err = sort_rows(&mut data, "note", &options).unwrap_err();
        assert_eq!(
            err,
            SortError::UncomparableType {
                row: null_row,
                key: "note".to_string(),
                found: "null",
            }
        );
        assert_eq!(data, before);
    }
}

#[test]
fn present_guard_orders_zero_and_false() {
    let data = rows(json!([{"score": 5}, {"score": 0}, {"score": -2}, {}]));
    let order = RowComparator::scalar("score", SortDirection::Ascending)
        .with_guard(ComparabilityGuard::Present)
        .sorted_indices(&data)
        .unwrap();

    let numeric: Vec<usize> = order.into_iter().filter(|&i| i != 3).collect();
    assert_eq!(numeric, vec![2, 1, 0]);
}

#[test]
fn index_ordering_and_normalization_are_separable() {
    let mut data = rows(json!([{"market": "ONT"}, {}, {"market": "ATL"}]));
    let before = data.clone();

    let comparator = RowComparator::scalar("market", SortDirection::Ascending);
    let order = comparator.sorted_indices(&data).unwrap();
    assert_eq!(data, before);

    // "ATL" < "N/A" < "ONT"
    assert_eq!(order, vec![2, 1, 0]);
    assert_eq!(normalize_missing(&mut data, "market"), 1);
}
