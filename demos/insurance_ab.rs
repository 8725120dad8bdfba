//! Insurance A/B Hypothesis Testing Example
//!
//! Builds a synthetic policy dataset, derives the margin KPI, evaluates the
//! usual risk and margin hypotheses across provinces, postal codes and
//! gender, and prints the text report.
//!
//! Run with: RUST_LOG=debug cargo run --example insurance_ab

use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use trueno_ab::config::AnalysisConfig;
use trueno_ab::dataset::{Condition, Dataset, MARGIN_COLUMN};
use trueno_ab::engine::TestKind;
use trueno_ab::profile;
use trueno_ab::report::ReportGenerator;
use trueno_ab::results::ResultStore;
use trueno_ab::suite::{HypothesisPlan, HypothesisSuite};

const PROVINCES: [&str; 3] = ["Gauteng", "Western Cape", "KwaZulu-Natal"];
const POSTAL_CODES: [&str; 4] = ["2000", "8001", "4001", "1685"];
const GENDERS: [&str; 2] = ["Male", "Female"];

fn synthetic_policies(rows: usize) -> Result<RecordBatch, Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(42);

    let mut provinces = Vec::with_capacity(rows);
    let mut postal_codes = Vec::with_capacity(rows);
    let mut genders = Vec::with_capacity(rows);
    let mut premiums = Vec::with_capacity(rows);
    let mut claims = Vec::with_capacity(rows);

    for _ in 0..rows {
        let province = PROVINCES[rng.gen_range(0..PROVINCES.len())];
        // Gauteng policies claim more on average
        let claim_scale = if province == "Gauteng" { 1.3 } else { 1.0 };

        provinces.push(province);
        postal_codes.push(POSTAL_CODES[rng.gen_range(0..POSTAL_CODES.len())]);
        genders.push(GENDERS[rng.gen_range(0..GENDERS.len())]);
        premiums.push(rng.gen_range(1_500.0..3_500.0));
        claims.push(rng.gen_range(500.0..2_500.0) * claim_scale);
    }

    let schema = Schema::new(vec![
        Field::new("Province", DataType::Utf8, false),
        Field::new("PostalCode", DataType::Utf8, false),
        Field::new("Gender", DataType::Utf8, false),
        Field::new("TotalPremium", DataType::Float64, false),
        Field::new("TotalClaims", DataType::Float64, false),
    ]);

    Ok(RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(StringArray::from(provinces)),
            Arc::new(StringArray::from(postal_codes)),
            Arc::new(StringArray::from(genders)),
            Arc::new(Float64Array::from(premiums)),
            Arc::new(Float64Array::from(claims)),
        ],
    )?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Trueno-AB Insurance Hypothesis Testing ===\n");

    // -------------------------------------------------------------------------
    // 1. Load data and derive the margin KPI
    // -------------------------------------------------------------------------
    let dataset = Dataset::new(synthetic_policies(600)?)?.with_margin()?;
    println!(
        "1. Dataset: {} rows, columns {:?}",
        dataset.num_rows(),
        dataset.column_names()
    );

    // -------------------------------------------------------------------------
    // 2. Profile before testing
    // -------------------------------------------------------------------------
    println!("\n2. Numeric summaries:");
    for summary in profile::describe(&dataset)? {
        println!(
            "   {:<14} n={:<4} mean={:>9.2} std={:>8.2} median={:>9.2}",
            summary.column, summary.count, summary.mean, summary.std, summary.median
        );
    }

    // -------------------------------------------------------------------------
    // 3. Evaluate the hypotheses
    // -------------------------------------------------------------------------
    let gauteng = Condition::equals("Province", "Gauteng");
    let western_cape = Condition::equals("Province", "Western Cape");
    let johannesburg = Condition::equals("PostalCode", "2000");
    let cape_town = Condition::equals("PostalCode", "8001");

    let suite = HypothesisSuite::new(AnalysisConfig::builder().alpha(0.05).build()?)
        .with_plan(HypothesisPlan::new(
            "There are no risk differences across provinces",
            "Province",
            gauteng.clone(),
            western_cape.clone(),
            TestKind::ZTest,
            "TotalClaims",
        ))
        .with_plan(HypothesisPlan::new(
            "There are no risk differences between zip codes",
            "PostalCode",
            johannesburg.clone(),
            cape_town.clone(),
            TestKind::TTest,
            "TotalClaims",
        ))
        .with_plan(HypothesisPlan::new(
            "There are no significant margin differences between zip codes",
            "PostalCode",
            johannesburg,
            cape_town,
            TestKind::TTest,
            MARGIN_COLUMN,
        ))
        .with_plan(HypothesisPlan::new(
            "There are no significant risk differences between Women and Men",
            "Gender",
            Condition::equals("Gender", "Female"),
            Condition::equals("Gender", "Male"),
            TestKind::TTest,
            "TotalClaims",
        ))
        .with_plan(HypothesisPlan::new(
            "Gender mix does not differ between provinces",
            "Province",
            gauteng,
            western_cape,
            TestKind::ChiSquared,
            "Gender",
        ));

    let mut store = ResultStore::new();
    let outcomes = suite.run(&dataset, &mut store);

    println!("\n3. Evaluated {} hypotheses:", outcomes.len());
    for outcome in &outcomes {
        match outcome.result() {
            Ok(evaluation) => println!(
                "   {:<12} {:>10.4} p={:.6}  {}",
                evaluation.statistic.kind,
                evaluation.statistic.statistic,
                evaluation.statistic.p_value,
                outcome.name()
            ),
            Err(e) => println!("   skipped: {} ({e})", outcome.name()),
        }
    }

    // -------------------------------------------------------------------------
    // 4. Report
    // -------------------------------------------------------------------------
    let report = ReportGenerator::new(&store);
    print!("{}", report.generate_report());

    println!("\n{} of {} null hypotheses rejected", store.rejected_count(), store.len());
    Ok(())
}
