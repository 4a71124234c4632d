//! Prints the response schemas sent alongside each request, and shows how a
//! canned reply is parsed without any network access.
//!
//! Run with: cargo run --example schemas

use rxverify::backend::parse_structured;
use rxverify::{
    AlternativeReport, AnalysisResult, InteractionReport, Schema, SchemaType, StructuredResponse,
};

fn show(name: &str, schema: Schema) {
    println!("== {} ==", name);
    match serde_json::to_string_pretty(schema.to_json()) {
        Ok(text) => println!("{}\n", text),
        Err(e) => eprintln!("Failed to serialize schema: {}", e),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    show("analyzePrescription", AnalysisResult::schema());
    show("checkDrugInteractions", InteractionReport::schema());
    show("findAlternativeMedication", AlternativeReport::schema());

    let reply = r#"```json
{
  "interactions": [
    {
      "pair": ["Warfarin", "Ibuprofen"],
      "severity": "high",
      "explanation": "NSAIDs increase the bleeding risk of anticoagulants."
    }
  ]
}
```"#;
    let report: InteractionReport = parse_structured(reply)?;
    report.validate()?;
    for interaction in &report.interactions {
        println!(
            "{} -> {}",
            interaction.pair.join(" + "),
            interaction.severity
        );
    }
    Ok(())
}
