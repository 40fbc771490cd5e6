mod common;

use common::{d, row, write_inputs, HEADER, SAMPLE};
use stock_stats::report::render;
use stock_stats::{collect_inputs, Engine, EngineConfig, SourceKind, StatsError};

fn engine(config: EngineConfig) -> Engine {
    Engine::new(config).unwrap()
}

#[test]
fn sample_file_end_to_end() {
    let (_dir, paths) = write_inputs(&[("sample.csv", SAMPLE)]);
    for kind in [SourceKind::Buffered, SourceKind::Mapped] {
        let aggregation = engine(EngineConfig::default().with_source(kind)).run(&paths).unwrap();

        let aapl = aggregation.report("AAPL").unwrap();
        assert_eq!(aapl.min, d("-0.50"));
        assert_eq!(aapl.max, d("1.50"));
        assert_eq!(aapl.average, d("0.50"));
        let msft = aggregation.report("MSFT").unwrap();
        assert_eq!((msft.min, msft.max, msft.average), (d("2.00"), d("2.00"), d("2.00")));

        assert!(matches!(
            aggregation.report("GOOGL"),
            Err(StatsError::KeyNotFound(key)) if key == "GOOGL"
        ));
        assert_eq!(
            render(&aggregation.table, 2),
            vec![
                "AAPL: min=-0.50 max=1.50 average=0.50".to_string(),
                "MSFT: min=2.00 max=2.00 average=2.00".to_string(),
            ]
        );
    }
}

#[test]
fn grouping_spans_all_inputs() {
    let first = format!("{HEADER}\n{}\n{}\n", row("AAPL", "1.00"), row("TSLA", "-3.00"));
    let second = format!("{HEADER}\n{}\n{}\n", row("AAPL", "3.00"), row("AAPL", "-1.00"));
    let (_dir, paths) = write_inputs(&[("a.csv", &first), ("b.csv", &second)]);

    let aggregation = engine(EngineConfig::default()).run(&paths).unwrap();
    assert_eq!(aggregation.summary.inputs_read, 2);
    assert_eq!(aggregation.summary.records, 4);

    let aapl = aggregation.table.get("AAPL").unwrap();
    assert_eq!(aapl.count(), 3);
    assert_eq!(aapl.min(), d("-1"));
    assert_eq!(aapl.max(), d("3"));
    assert_eq!(aapl.average(), d("1"));
    assert_eq!(aggregation.report("TSLA").unwrap().average, d("-3"));
}

#[test]
fn windows_line_endings_and_trailing_blanks() {
    let content = format!("{HEADER}\r\n{}\r\n{}\r\n\r\n   \r\n", row("AAPL", "1.25"), row("AAPL", "0.75"));
    let (_dir, paths) = write_inputs(&[("crlf.csv", &content)]);
    for kind in [SourceKind::Buffered, SourceKind::Mapped] {
        let aggregation = engine(EngineConfig::default().with_source(kind)).run(&paths).unwrap();
        assert_eq!(aggregation.summary.records, 2);
        assert_eq!(aggregation.summary.malformed_lines, 0);
        assert_eq!(aggregation.summary.blank_lines, 2);
        assert_eq!(aggregation.report("AAPL").unwrap().average, d("1"));
    }
}

#[test]
fn short_row_is_skipped_and_counted() {
    let content = format!("{SAMPLE}AAPL,2024-01-03,1,2,3,4\n{}\n", row("MSFT", "4.00"));
    let (_dir, paths) = write_inputs(&[("short.csv", &content)]);

    let aggregation = engine(EngineConfig::default()).run(&paths).unwrap();
    assert_eq!(aggregation.summary.malformed_lines, 1);
    assert_eq!(aggregation.summary.malformed.len(), 1);
    assert_eq!(aggregation.table.get("AAPL").unwrap().count(), 2);
    assert_eq!(aggregation.report("AAPL").unwrap().average, d("0.50"));
    assert_eq!(aggregation.report("MSFT").unwrap().max, d("4"));
}

#[test]
fn missing_input_is_reported_and_run_continues() {
    let (dir, mut paths) = write_inputs(&[("good.csv", SAMPLE)]);
    paths.insert(0, dir.path().join("missing.csv"));

    let aggregation = engine(EngineConfig::default()).run(&paths).unwrap();
    assert_eq!(aggregation.summary.inputs_read, 1);
    assert_eq!(aggregation.summary.failed_inputs.len(), 1);
    match &aggregation.summary.failed_inputs[0] {
        StatsError::InputUnavailable { path, source } => {
            assert_eq!(path, &dir.path().join("missing.csv"));
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(aggregation.table.len(), 2);
}

#[test]
fn missing_input_aborts_with_fail_fast() {
    let (dir, mut paths) = write_inputs(&[("good.csv", SAMPLE)]);
    paths.push(dir.path().join("missing.csv"));

    for kind in [SourceKind::Buffered, SourceKind::Mapped] {
        let config = EngineConfig::default().with_fail_fast(true).with_source(kind);
        let err = engine(config).run(&paths).unwrap_err();
        assert!(matches!(err, StatsError::InputUnavailable { .. }));
    }
}

#[test]
fn empty_input_contributes_nothing() {
    let (_dir, paths) = write_inputs(&[("empty.csv", ""), ("header.csv", HEADER), ("sample.csv", SAMPLE)]);
    for kind in [SourceKind::Buffered, SourceKind::Mapped] {
        let aggregation = engine(EngineConfig::default().with_source(kind)).run(&paths).unwrap();
        assert_eq!(aggregation.summary.inputs_read, 3);
        assert_eq!(aggregation.summary.records, 3);
        assert_eq!(aggregation.table.len(), 2);
    }
}

#[test]
fn directories_expand_to_sorted_files() {
    let (dir, _) = write_inputs(&[("b.csv", SAMPLE), ("a.csv", SAMPLE)]);
    std::fs::create_dir(dir.path().join("nested")).unwrap();

    let inputs = collect_inputs(&[dir.path()]).unwrap();
    assert_eq!(inputs, vec![dir.path().join("a.csv"), dir.path().join("b.csv")]);

    let aggregation = engine(EngineConfig::default()).run(&inputs).unwrap();
    assert_eq!(aggregation.table.get("AAPL").unwrap().count(), 4);
    assert_eq!(aggregation.report("AAPL").unwrap().average, d("0.50"));
}
