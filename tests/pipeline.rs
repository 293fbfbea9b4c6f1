//! End-to-end pipeline tests: a CSV emitter feeding the binary reduction
//! executor through an item stream, under completion and cancellation.

use serde::Deserialize;
use std::io::{Cursor, Write};
use std::time::Duration;
use streamfold::{BinaryOpExecutor, BinaryOpFn, Context, CsvEmitter, Emitter};
use tempfile::NamedTempFile;
use tokio::time::timeout;
use tokio_test::assert_ok;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[allow(dead_code)]
struct Row {
  col1: String,
  col2: String,
  col3: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Measurement {
  #[allow(dead_code)]
  sensor: String,
  value: i64,
}

fn init_logging() {
  let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[tokio::test]
async fn test_csv_records_counted_through_executor() {
  init_logging();

  let data = "Col1,Col2,Col3\nA,B,C\nD,E,F";
  let ctx = Context::new();

  let mut emitter = CsvEmitter::<Row>::from_reader(Cursor::new(data)).with_headers(true);
  let records = emitter.output();
  assert_ok!(emitter.open(&ctx).await);

  let mut executor = BinaryOpExecutor::<Row, i64>::new(ctx.child());
  executor.set_operation(BinaryOpFn::new(|count: &i64, _row: Row| Ok(count + 1)));
  executor.set_initial_state(0);
  executor.set_concurrency(1);
  executor.set_input(records);
  let mut output = executor.output();

  assert_ok!(executor.run());

  assert_eq!(output.recv().await, Some(2));
  assert_eq!(output.recv().await, None);
}

#[tokio::test]
async fn test_file_backed_pipeline_sums_a_column() {
  init_logging();

  let mut file = NamedTempFile::new().unwrap();
  writeln!(file, "sensor,value").unwrap();
  writeln!(file, "alpha,10").unwrap();
  writeln!(file, "beta,20").unwrap();
  writeln!(file, "gamma,12").unwrap();
  file.flush().unwrap();

  let ctx = Context::new();
  let mut emitter = CsvEmitter::<Measurement>::from_path(file.path());
  let readings = emitter.output();
  assert_ok!(emitter.open(&ctx).await);

  let mut executor = BinaryOpExecutor::<Measurement, i64>::new(ctx.child());
  executor.set_operation(BinaryOpFn::new(|total: &i64, m: Measurement| {
    Ok(total + m.value)
  }));
  executor.set_input(readings);
  let mut output = executor.output();

  assert_ok!(executor.run());

  assert_eq!(output.recv().await, Some(42));
  assert_eq!(output.recv().await, None);
}

#[tokio::test]
async fn test_cancelled_pipeline_still_emits_exactly_once() {
  init_logging();

  // Enough rows that the run is still in flight when the deadline fires.
  let mut data = String::from("sensor,value\n");
  for n in 0..50_000 {
    data.push_str(&format!("sensor-{n},1\n"));
  }

  let ctx = Context::new();
  let mut emitter = CsvEmitter::<Measurement>::from_reader(Cursor::new(data));
  let readings = emitter.output();
  assert_ok!(emitter.open(&ctx).await);

  let mut executor = BinaryOpExecutor::<Measurement, i64>::new(ctx.child());
  executor.set_operation(BinaryOpFn::new(|count: &i64, _m: Measurement| Ok(count + 1)));
  executor.set_concurrency(4);
  executor.set_input(readings);
  let mut output = executor.output();

  assert_ok!(executor.run());
  ctx.cancel_after(Duration::from_millis(10));

  let emitted = timeout(Duration::from_secs(2), output.recv())
    .await
    .expect("cancellation must not stall the final emission");
  let count = emitted.expect("exactly one value should be emitted");
  assert!((0..=50_000).contains(&count));

  let closed = timeout(Duration::from_secs(2), output.recv())
    .await
    .expect("output must close after the final emission");
  assert_eq!(closed, None);

  assert!(executor.is_cancelled() || count == 50_000);
}
