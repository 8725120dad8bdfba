//! End-to-end pipeline test
//!
//! 1. Combine record batches into a dataset and derive the margin KPI
//! 2. Segment on province, postal code and gender
//! 3. Test, decide and record each hypothesis
//! 4. Render the report

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;
use trueno_ab::config::AnalysisConfig;
use trueno_ab::dataset::{Condition, Dataset, MARGIN_COLUMN};
use trueno_ab::decision::{analyze_results, Decision};
use trueno_ab::engine::HypothesisEngine;
use trueno_ab::profile;
use trueno_ab::report::{generate_report, ReportGenerator};
use trueno_ab::results::ResultStore;
use trueno_ab::segment::Segmenter;

fn schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("Province", DataType::Utf8, false),
        Field::new("PostalCode", DataType::Int64, false),
        Field::new("Gender", DataType::Utf8, false),
        Field::new("TotalPremium", DataType::Float64, false),
        Field::new("TotalClaims", DataType::Float64, false),
    ]))
}

fn batch(
    provinces: Vec<&str>,
    postal_codes: Vec<i64>,
    genders: Vec<&str>,
    premiums: Vec<f64>,
    claims: Vec<f64>,
) -> RecordBatch {
    RecordBatch::try_new(
        schema(),
        vec![
            Arc::new(StringArray::from(provinces)),
            Arc::new(Int64Array::from(postal_codes)),
            Arc::new(StringArray::from(genders)),
            Arc::new(Float64Array::from(premiums)),
            Arc::new(Float64Array::from(claims)),
        ],
    )
    .unwrap()
}

fn load_dataset() -> Dataset {
    let first = batch(
        vec!["Gauteng", "Western Cape", "Gauteng", "Western Cape"],
        vec![2000, 8001, 2000, 8001],
        vec!["Male", "Female", "Female", "Male"],
        vec![3000.0, 2500.0, 3200.0, 2600.0],
        vec![2000.0, 1500.0, 2100.0, 1600.0],
    );
    let second = batch(
        vec!["Gauteng", "Western Cape", "Gauteng", "Western Cape"],
        vec![2000, 8001, 1685, 8001],
        vec!["Female", "Male", "Male", "Female"],
        vec![2900.0, 2400.0, 3100.0, 2700.0],
        vec![1950.0, 1550.0, 2050.0, 1650.0],
    );
    Dataset::from_batches(&[first, second])
        .unwrap()
        .with_margin()
        .unwrap()
}

#[test]
fn test_full_pipeline() {
    let dataset = load_dataset();
    assert_eq!(dataset.num_rows(), 8);

    let config = AnalysisConfig::default();
    let engine = HypothesisEngine::with_config(&config);
    let segmenter = Segmenter::new(&dataset);
    let mut store = ResultStore::new();

    // Provinces: claims clearly higher in Gauteng
    let (gauteng, western_cape) = segmenter
        .segment_by(
            "Province",
            &Condition::equals("Province", "Gauteng"),
            &Condition::equals("Province", "Western Cape"),
        )
        .unwrap();
    let p = engine.t_test(&gauteng, &western_cape, "TotalClaims").unwrap();
    store.add_result(
        "There are no risk differences across provinces",
        p,
        analyze_results(p, config.alpha()),
    );

    // Postal codes compared on their textual form
    let (jhb, cpt) = segmenter
        .segment_by(
            "PostalCode",
            &Condition::equals("PostalCode", "2000"),
            &Condition::equals("PostalCode", "8001"),
        )
        .unwrap();
    assert_eq!(jhb.num_rows(), 3);
    assert_eq!(cpt.num_rows(), 4);
    let p = engine.t_test(&jhb, &cpt, MARGIN_COLUMN).unwrap();
    store.add_result(
        "There are no significant margin differences between zip codes",
        p,
        analyze_results(p, config.alpha()),
    );

    // Gender mix does not depend on province
    let p = engine
        .chi_squared_test(&gauteng, &western_cape, "Gender")
        .unwrap();
    assert!((p - 1.0).abs() < 1e-9);
    store.add_result(
        "Gender mix does not differ between provinces",
        p,
        analyze_results(p, config.alpha()),
    );

    assert_eq!(store.len(), 3);
    assert_eq!(store.records()[0].decision(), Decision::Reject);
    assert_eq!(store.records()[2].decision(), Decision::FailToReject);

    let report = generate_report(&store);
    assert!(report.starts_with("\nA/B Hypothesis Testing Report\n"));
    assert_eq!(report.matches("Hypothesis: ").count(), 3);
    assert_eq!(report, ReportGenerator::new(&store).generate_report());

    let json = ReportGenerator::new(&store).generate_json().unwrap();
    assert!(json.contains("fail_to_reject"));
}

#[test]
fn test_profile_before_testing() {
    let dataset = load_dataset();

    let missing = profile::missing_values(&dataset);
    assert!(missing.iter().all(|(_, n)| *n == 0));

    let summaries = profile::describe(&dataset).unwrap();
    let names: Vec<&str> = summaries.iter().map(|s| s.column.as_str()).collect();
    assert_eq!(
        names,
        vec!["PostalCode", "TotalPremium", "TotalClaims", MARGIN_COLUMN]
    );

    let corr = profile::correlation_matrix(&dataset).unwrap();
    let r = corr.get("TotalPremium", "TotalClaims").unwrap();
    assert!(r > 0.5);
}
