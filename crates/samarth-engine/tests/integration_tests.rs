//! Integration tests for the question-answering pipeline.
//!
//! These tests drive the query handler end to end with saved workflow
//! responses standing in for the webhook.

use pretty_assertions::assert_eq;
use samarth_engine::fetch::{ClosureSource, FetchRequest, parse_body};
use samarth_engine::{
    AnalysisEngine, Conversation, Credentials, Dataset, EngineConfig, Intent, QueryHandler, Role,
    SamarthError, SummaryScope,
};
use std::path::PathBuf;
use std::sync::Arc;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn read_fixture(filename: &str) -> String {
    std::fs::read_to_string(fixtures_path().join(filename)).expect("Failed to read fixture")
}

fn load_dataset(filename: &str) -> Dataset {
    parse_body(&read_fixture(filename)).expect("Fixture should parse as a dataset")
}

fn fixture_handler(filename: &str) -> QueryHandler {
    let body = read_fixture(filename);
    let source = ClosureSource::new(filename, move |_req: &FetchRequest| parse_body(&body));
    QueryHandler::new(AnalysisEngine::default(), Arc::new(source))
}

fn credentials() -> Credentials {
    Credentials::new(
        Some("test-api-key".to_string()),
        Some("http://localhost/webhook/samarth".to_string()),
    )
}

fn column_f64(df: &polars::prelude::DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

// ============================================================================
// Tax Analysis
// ============================================================================

#[test]
fn test_tax_totals_for_named_states_over_last_two_years() {
    let dataset = load_dataset("tax_devolution.json");
    let answer = AnalysisEngine::default().answer(
        "What is the share of union taxes for Telangana and Karnataka in the last two years?",
        &dataset,
    );

    assert_eq!(answer.intent, Intent::TaxAnalysis);
    assert!(answer.fault.is_none());

    let table = answer.table.expect("Tax analysis should produce a table");
    let names: Vec<String> = table
        .get_column_names()
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(names, vec!["state_name", "_2016_17", "_2017_18", "Total"]);
    assert_eq!(column_f64(&table, "Total"), vec![Some(42000.25), Some(11000.0)]);
    assert_eq!(column_f64(&table, "_2017_18"), vec![Some(22000.25), None]);

    assert!(answer.markdown.starts_with(
        "**Share of Union Taxes and Duties (in Rs. Crore) for Telangana, Karnataka:**"
    ));
    assert!(answer.markdown.contains("| Karnataka | 20000 | 22000.25 | 42000.25 |"));
    assert!(answer.markdown.contains("| Telangana | 11000 |  | 11000 |"));
    assert_eq!(
        answer.citation.to_string(),
        "**State-wise Share of Union Taxes and Duties** \
         (Source: 9ef84268-d588-465a-a308-a864a43d0070, data.gov.in)"
    );
}

#[test]
fn test_tax_explicit_year() {
    let dataset = load_dataset("tax_devolution.json");
    let answer =
        AnalysisEngine::default().answer("Union tax devolution to Kerala in 2015", &dataset);

    let table = answer.table.unwrap();
    assert_eq!(table.height(), 1);
    assert_eq!(column_f64(&table, "Total"), vec![Some(9000.0)]);
}

#[test]
fn test_tax_no_matching_states_falls_back_to_summary() {
    let dataset = load_dataset("tax_devolution.json");
    let answer = AnalysisEngine::default().answer("Union taxes for Gujarat", &dataset);

    assert_eq!(answer.intent, Intent::TaxAnalysis);
    assert!(answer.markdown.contains(
        "I found the dataset, but could not find data for Gujarat. \
         States present in the data: Andhra Pradesh, Karnataka, Kerala, Telangana"
    ));
    assert!(answer.markdown.contains("I have successfully retrieved the dataset"));
    assert!(!answer.markdown.contains("| Total |"));
    assert!(!answer.markdown.contains("Share of Union Taxes and Duties (in Rs. Crore)"));

    let table = answer.table.unwrap();
    assert_eq!(table.height(), 4);
    assert!(table.column("Total").is_err());
}

#[test]
fn test_tax_missing_year_column_lists_alternatives() {
    let dataset = load_dataset("tax_devolution.json");
    let answer = AnalysisEngine::default().answer("Union taxes for Kerala in 2019", &dataset);

    let fault = answer.fault.expect("Missing year should be reported");
    assert!(fault.contains("2019-20"));
    assert!(fault.contains("_2015_16"));
}

// ============================================================================
// Rainfall Comparison
// ============================================================================

#[test]
fn test_rainfall_comparison_by_state() {
    let dataset = load_dataset("crop_rainfall.json");
    let answer = AnalysisEngine::default().answer(
        "Compare the average rainfall for each crop growing state",
        &dataset,
    );

    assert_eq!(answer.intent, Intent::RainfallCropComparison);
    assert_eq!(
        answer.markdown,
        "**Average Annual Rainfall Analysis:**\n\
         * **Kerala**: 2750.00 mm (average)\n\
         * **Punjab**: 650.50 mm (average)\n\
         * **Rajasthan**: n/a (no valid rainfall figures)\n"
    );
    assert_eq!(
        column_f64(answer.table.as_ref().unwrap(), "mean_rainfall_mm"),
        vec![Some(2750.0), Some(650.5), None]
    );
}

#[test]
fn test_generic_summary_for_other_questions() {
    let dataset = load_dataset("crop_rainfall.json");
    let engine = AnalysisEngine::new(
        EngineConfig::builder()
            .summary_scope(SummaryScope::Head(2))
            .build()
            .unwrap(),
    );
    let answer = engine.answer("Which districts grow rice?", &dataset);

    assert_eq!(answer.intent, Intent::GenericSummary);
    assert!(answer.markdown.contains(
        "**'District-wise Crop Production and Rainfall'**. Here is a summary of the first 2 rows:"
    ));
    assert!(answer.markdown.contains(
        "| State_Name | District_Name | Crop | Production | Rainfall_mm |\n| --- | --- | --- | --- | --- |"
    ));
    assert!(answer.markdown.contains("Ludhiana"));
    assert!(!answer.markdown.contains("Idukki"));
}

#[test]
fn test_zero_row_dataset_summarizes() {
    let dataset = load_dataset("empty_records.json");
    let answer = AnalysisEngine::default().answer("union tax for Kerala", &dataset);

    assert!(answer.markdown.contains("Empty Table"));
    assert!(!answer.markdown.trim().is_empty());
}

// ============================================================================
// Query Handling
// ============================================================================

#[test]
fn test_handler_records_question_and_answer() {
    let handler = fixture_handler("tax_devolution.json");
    let outcome = handler.handle(
        Conversation::new(),
        "Share of union taxes in Karnataka in 2016",
        &credentials(),
    );

    assert!(outcome.is_ok());
    let turns = outcome.conversation.turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[1].role, Role::Assistant);

    let snapshot = turns[1].table.as_ref().unwrap();
    assert_eq!(snapshot.columns, vec!["state_name", "_2016_17", "Total"]);
    assert_eq!(snapshot.rows, vec![vec!["Karnataka", "20000", "20000"]]);
}

#[test]
fn test_unknown_response_keeps_user_turn() {
    let handler = fixture_handler("unknown_response.json");
    let outcome = handler.handle(Conversation::new(), "rainfall in Kerala", &credentials());

    let err = outcome.error.expect("Unknown response should be an error");
    assert!(matches!(err, SamarthError::UnknownResponse { .. }));
    assert!(err.to_string().contains(r#"{"foo":"bar"}"#));

    let turns = outcome.conversation.turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].content, "rainfall in Kerala");
    assert!(turns[1].is_error);
    assert!(turns[1].content.contains(r#"{"foo":"bar"}"#));
}

#[test]
fn test_inactive_workflow_is_actionable() {
    let handler = fixture_handler("workflow_started.json");
    let outcome = handler.handle(Conversation::new(), "crop production", &credentials());

    let err = outcome.error.unwrap();
    assert_eq!(err.error_code(), "WORKFLOW_NOT_ACTIVE");
    assert!(err.to_string().contains("Respond to Webhook"));
}

#[test]
fn test_missing_credentials_skip_the_call() {
    let handler = fixture_handler("tax_devolution.json");

    let no_key = Credentials::new(None, Some("http://localhost/webhook".to_string()));
    let outcome = handler.handle(Conversation::new(), "union taxes", &no_key);
    assert!(outcome.conversation.is_empty());
    assert_eq!(
        outcome.error.unwrap().to_string(),
        "Please enter your data.gov.in API key to start"
    );

    let no_endpoint = Credentials::new(Some("key".to_string()), Some(String::new()));
    let outcome = handler.handle(Conversation::new(), "union taxes", &no_endpoint);
    assert!(outcome.conversation.is_empty());
    assert_eq!(
        outcome.error.unwrap().to_string(),
        "Please enter your workflow webhook URL to start"
    );
}

#[test]
fn test_conversation_accumulates_across_questions() {
    let handler = fixture_handler("crop_rainfall.json");
    let creds = credentials();

    let outcome = handler.handle(Conversation::new(), "compare rainfall by crop", &creds);
    let outcome = handler.handle(outcome.conversation, "show the table", &creds);

    assert_eq!(outcome.conversation.len(), 4);
    let json = serde_json::to_value(&outcome.conversation).unwrap();
    assert_eq!(json["turns"][3]["role"], "assistant");
    assert_eq!(
        json["turns"][3]["citation"]["resource_id"],
        "35be999b-0208-4354-b557-f6ca9a5355de"
    );
}
