//! Tests for qap-model types.

use qap_model::{Placement, Record, ScanKey, SchemaId};

#[test]
fn every_schema_places_all_its_metrics() {
    for schema in SchemaId::ALL {
        let definition = schema.definition();
        for metric in definition.root_measures {
            assert_eq!(definition.placement(metric), Some(Placement::Root));
        }
        for (metric, element) in definition.nested_measures {
            assert_eq!(definition.placement(metric), Some(Placement::Nested(*element)));
        }
    }
}

#[test]
fn structural_schema_table_matches_datatype() {
    let definition = SchemaId::AnatQa.definition();
    assert_eq!(
        definition.root_measures,
        &["cnr", "efc", "snr", "fber", "qi1", "gcor"]
    );
    assert_eq!(definition.metric_count(), 24);
}

#[test]
fn record_serializes() {
    let record: Record = [("subject", "S01"), ("snr", "10.5")].into_iter().collect();
    let json = serde_json::to_string(&record).expect("serialize record");
    let round: Record = serde_json::from_str(&json).expect("deserialize record");
    assert_eq!(round, record);
}

#[test]
fn scan_key_builds_assessment_label() {
    let record: Record = [
        ("subject", "AMC001"),
        ("session", "AMC001_MR1"),
        ("scan", "scan_7"),
        ("snr", "10.5"),
    ]
    .into_iter()
    .collect();
    let key = ScanKey::from_record(&record).expect("scan key");
    assert_eq!(
        key.assessment_label(SchemaId::FtempQa),
        "AMC001_AMC001_MR1_s7_ftempQA"
    );
}
