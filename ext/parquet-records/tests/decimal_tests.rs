use arrow_array::{ArrayRef, Decimal128Array, Decimal256Array, Int32Array, StringArray};
use arrow_buffer::i256;
use parquet_records::*;
use std::sync::Arc;

use test_helpers::*;

#[test]
fn test_widget_row() {
    let data = write_parquet(vec![
        ("id", Arc::new(Int32Array::from(vec![1])) as ArrayRef),
        (
            "amount",
            Arc::new(
                Decimal128Array::from(vec![1999])
                    .with_precision_and_scale(10, 2)
                    .unwrap(),
            ),
        ),
        ("name", Arc::new(StringArray::from(vec!["widget"]))),
    ]);

    assert_eq!(
        read_json(data),
        r#"[{"id":1,"amount":19.99,"name":"widget"}]"#
    );
}

#[test]
fn test_high_precision_decimal_keeps_digits() {
    let data = write_parquet(vec![(
        "amount",
        Arc::new(
            Decimal128Array::from(vec![12345678901234567890_i128])
                .with_precision_and_scale(20, 2)
                .unwrap(),
        ) as ArrayRef,
    )]);

    let records = read_records(data.clone());
    assert_eq!(
        records[0]["amount"],
        NormalizedValue::IntegerString("123456789012345678.90".to_string())
    );
    assert_eq!(read_json(data), r#"[{"amount":"123456789012345678.90"}]"#);
}

#[test]
fn test_decimal128_precision_scale_combinations() {
    let column = |values: Vec<Option<i128>>, precision: u8, scale: i8| -> ArrayRef {
        Arc::new(
            Decimal128Array::from(values)
                .with_precision_and_scale(precision, scale)
                .unwrap(),
        )
    };

    let data = write_parquet(vec![
        ("dec_5_2", column(vec![Some(99999), Some(-1), None], 5, 2)),
        (
            "dec_18_0",
            column(
                vec![Some(999_999_999_999_999_999), Some(9_007_199_254_740_991), Some(0)],
                18,
                0,
            ),
        ),
        (
            "dec_38_10",
            column(
                vec![
                    Some(99_999_999_999_999_999_999_999_999_999_999_999_999),
                    Some(1),
                    Some(-12345678901234567890123456789),
                ],
                38,
                10,
            ),
        ),
    ]);

    let records = read_records(data);
    assert_eq!(records.len(), 3);

    assert_eq!(records[0]["dec_5_2"], NormalizedValue::Number(999.99));
    assert_eq!(records[1]["dec_5_2"], NormalizedValue::Number(-0.01));
    assert_eq!(records[2]["dec_5_2"], NormalizedValue::Null);

    assert_eq!(
        records[0]["dec_18_0"],
        NormalizedValue::IntegerString("999999999999999999".to_string())
    );
    assert_eq!(
        records[1]["dec_18_0"],
        NormalizedValue::Number(9_007_199_254_740_991.0)
    );
    assert_eq!(records[2]["dec_18_0"], NormalizedValue::Number(0.0));

    assert_eq!(
        records[0]["dec_38_10"],
        NormalizedValue::IntegerString("9999999999999999999999999999.9999999999".to_string())
    );
    assert_eq!(records[1]["dec_38_10"], NormalizedValue::Number(0.0000000001));
    assert_eq!(
        records[2]["dec_38_10"],
        NormalizedValue::IntegerString("-1234567890123456789.0123456789".to_string())
    );
}

#[test]
fn test_decimal256_values() {
    let big = i256::from_string("123456789012345678901234567890123456789012345").unwrap();
    let data = write_parquet(vec![(
        "wide",
        Arc::new(
            Decimal256Array::from(vec![Some(big), Some(i256::from_i128(-250)), None])
                .with_precision_and_scale(50, 5)
                .unwrap(),
        ) as ArrayRef,
    )]);

    let records = read_records(data);
    assert_eq!(
        records[0]["wide"],
        NormalizedValue::IntegerString("1234567890123456789012345678901234567890.12345".to_string())
    );
    assert_eq!(records[1]["wide"], NormalizedValue::Number(-0.0025));
    assert_eq!(records[2]["wide"], NormalizedValue::Null);
}

#[test]
fn test_decimal_output_is_idempotent() {
    let data = write_parquet(vec![(
        "amount",
        Arc::new(
            Decimal128Array::from(vec![Some(1999), Some(12345678901234567890), None])
                .with_precision_and_scale(20, 2)
                .unwrap(),
        ) as ArrayRef,
    )]);

    assert_eq!(read_json(data.clone()), read_json(data));
}
