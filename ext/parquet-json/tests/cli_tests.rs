use arrow_array::{ArrayRef, Decimal128Array, Float64Array, Int32Array, RecordBatch, StringArray};
use parquet::arrow::ArrowWriter;
use std::io::Write;
use std::process::{Command, Output};
use std::sync::Arc;
use tempfile::NamedTempFile;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_parquet-json"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn widget_file() -> NamedTempFile {
    let batch = RecordBatch::try_from_iter(vec![
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
    ])
    .unwrap();

    let file = NamedTempFile::new().unwrap();
    let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), batch.schema(), None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    file
}

#[test]
fn test_prints_records() {
    let file = widget_file();
    let output = run(&[file.path().to_str().unwrap()]);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "[{\"id\":1,\"amount\":19.99,\"name\":\"widget\"}]\n"
    );
}

#[test]
fn test_column_projection_flag() {
    let file = widget_file();
    let output = run(&[file.path().to_str().unwrap(), "--columns", "name,id"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "[{\"id\":1,\"name\":\"widget\"}]\n");
}

#[test]
fn test_output_is_idempotent() {
    let file = widget_file();
    let path = file.path().to_str().unwrap();
    assert_eq!(run(&[path]).stdout, run(&[path]).stdout);
}

#[test]
fn test_nan_prints_null() {
    let batch = RecordBatch::try_from_iter(vec![(
        "amount",
        Arc::new(Float64Array::from(vec![f64::NAN])) as ArrayRef,
    )])
    .unwrap();
    let file = NamedTempFile::new().unwrap();
    let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), batch.schema(), None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let output = run(&[file.path().to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "[{\"amount\":null}]\n");
}

#[test]
fn test_truncated_file_reports_error() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"PAR1\x15\x00\x15").unwrap();
    file.flush().unwrap();

    let output = run(&[file.path().to_str().unwrap()]);
    assert!(!output.status.success());

    let text = stdout(&output);
    assert_eq!(text.lines().count(), 1);
    let payload: serde_json::Value = serde_json::from_str(&text).unwrap();
    let object = payload.as_object().unwrap();
    assert_eq!(object.len(), 1);
    assert!(object["error"]
        .as_str()
        .unwrap()
        .starts_with("Malformed parquet file"));
}

#[test]
fn test_missing_file_reports_error() {
    let output = run(&["/no/such/dir/data.parquet"]);
    assert_eq!(output.status.code(), Some(1));

    let payload: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let message = payload["error"].as_str().unwrap();
    assert!(message.contains("/no/such/dir/data.parquet"), "{}", message);
}

#[test]
fn test_no_arguments_is_usage_error() {
    let output = run(&[]);
    assert_eq!(output.status.code(), Some(2));

    let payload: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert!(payload["error"].as_str().unwrap().starts_with("Usage: parquet-json"));
}

#[test]
fn test_too_many_arguments_is_usage_error() {
    let output = run(&["a.parquet", "b.parquet"]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout(&output).lines().count(), 1);
}
