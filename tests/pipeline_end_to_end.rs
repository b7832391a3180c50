use std::path::Path;
use std::sync::Mutex;

use dataprep::observe::{PipelineObserver, StageEvent};
use dataprep::pipeline::{EnrichConfig, PipelineConfig, TopNConfig, run_pipeline};
use dataprep::processing::{ColumnBounds, RowFilter, SubstringExclusion};
use dataprep::types::{DataType, Field};

fn emission_columns() -> Vec<Field> {
    vec![
        Field::new("Entity", DataType::Utf8),
        Field::new("Year", DataType::Int64),
        Field::new("Emission", DataType::Float64),
    ]
}

fn cleaning_config(input: &Path, output: &Path) -> PipelineConfig {
    PipelineConfig {
        inputs: vec![input.to_path_buf()],
        output: output.to_path_buf(),
        columns: emission_columns(),
        normalize: None,
        filter: RowFilter {
            require_present: vec!["Emission".to_string()],
            non_negative: vec!["Emission".to_string()],
            bounds: vec![ColumnBounds {
                column: "Year".to_string(),
                min: 2017,
                max: 2024,
            }],
            exclude: Some(SubstringExclusion {
                column: "Entity".to_string(),
                patterns: ["asia", "world", "europe", "africa", "income", "north america"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            }),
        },
        group_by: vec!["Entity".to_string(), "Year".to_string()],
        aggregate: vec!["Emission".to_string()],
        enrich: Some(EnrichConfig {
            key_column: "Entity".to_string(),
            output_column: "Region".to_string(),
            lookup_path: None,
        }),
        top_n: Some(TopNConfig {
            group_column: "Entity".to_string(),
            metric_column: "Emission".to_string(),
            count: 10,
        }),
    }
}

#[derive(Default)]
struct RecordingObserver {
    stages: Mutex<Vec<&'static str>>,
    failures: Mutex<Vec<&'static str>>,
}

impl PipelineObserver for RecordingObserver {
    fn on_stage(&self, event: &StageEvent) {
        self.stages.lock().unwrap().push(event.stage);
    }

    fn on_failure(
        &self,
        stage: &'static str,
        _severity: dataprep::observe::Severity,
        _error: &dataprep::PrepError,
    ) {
        self.failures.lock().unwrap().push(stage);
    }
}

#[test]
fn duplicate_entities_are_averaged_and_enriched() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("raw.csv");
    let output = dir.path().join("clean.csv");
    std::fs::write(
        &input,
        "Entity,Year,Emission\nchile,2018,5\nchile,2018,7\nAsia,2018,100\n",
    )
    .unwrap();

    let config = cleaning_config(&input, &output);
    let report = run_pipeline(&config, None).unwrap();

    assert_eq!(report.rows_loaded, 3);
    assert_eq!(report.rows_written, 1);

    let text = std::fs::read_to_string(&output).unwrap();
    assert_eq!(text, "Entity,Year,Emission,Region\nchile,2018,6,South America\n");
}

#[test]
fn full_run_over_fixture_in_stage_order() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("clean.csv");

    let config = cleaning_config(Path::new("tests/fixtures/emissions.csv"), &output);
    let observer = RecordingObserver::default();
    let report = run_pipeline(&config, Some(&observer)).unwrap();

    assert_eq!(
        observer.stages.lock().unwrap().as_slice(),
        [
            "load",
            "normalize",
            "filter",
            "aggregate",
            "dedup",
            "enrich",
            "top_n",
            "write",
        ]
    );
    assert!(observer.failures.lock().unwrap().is_empty());
    assert_eq!(report.stages.len(), 8);

    // Peru (out of year range), Bolivia (null emission), and the Asia
    // aggregate row are dropped; Brazil's duplicate rows collapse.
    let text = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        text,
        "Entity,Year,Emission,Region\n\
         chile,2018,6,South America\n\
         brazil,2018,50,South America\n"
    );
}

#[test]
fn config_loads_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("raw.csv");
    let output = dir.path().join("clean.csv");
    let config_path = dir.path().join("pipeline.json");
    std::fs::write(&input, "Entity,Year,Emission\nchile,2018,5\n").unwrap();

    let config = cleaning_config(&input, &output);
    std::fs::write(&config_path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    let loaded = PipelineConfig::from_json_path(&config_path).unwrap();
    assert_eq!(loaded, config);

    let report = run_pipeline(&loaded, None).unwrap();
    assert_eq!(report.rows_written, 1);
}

#[test]
fn multiple_inputs_concatenate_before_aggregation() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("a.csv");
    let second = dir.path().join("b.csv");
    let output = dir.path().join("clean.csv");
    std::fs::write(&first, "Entity,Year,Emission\nchile,2018,5\n").unwrap();
    std::fs::write(&second, "Entity,Year,Emission\nchile,2018,7\n").unwrap();

    let mut config = cleaning_config(&first, &output);
    config.inputs = vec![first, second];
    let report = run_pipeline(&config, None).unwrap();

    assert_eq!(report.rows_loaded, 2);
    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("chile,2018,6"));
}

#[test]
fn failing_stage_reports_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("raw.csv");
    let output = dir.path().join("clean.csv");
    std::fs::write(&input, "Entity,Year,Emission\nchile,2018,5\n").unwrap();

    let mut config = cleaning_config(&input, &output);
    // Reference a column the input does not have.
    config.filter.require_present = vec!["Population".to_string()];

    let observer = RecordingObserver::default();
    let err = run_pipeline(&config, Some(&observer)).unwrap_err();

    assert!(err.to_string().contains("missing column 'Population'"));
    assert_eq!(observer.failures.lock().unwrap().as_slice(), ["filter"]);
    assert!(!output.exists());
}
