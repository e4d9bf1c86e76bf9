//! Per-record ingestion pipeline.
//!
//! Each results row runs normalize -> scan key -> scan type -> document ->
//! XML -> sink. A failing row is recorded and the run moves on to the next.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, trace, warn};

use qap_model::{ModelError, Record, ScanKey, SchemaId};
use qap_transform::normalize_record;
use qap_xml::DocumentBuilder;
use qap_xnat::{AssessmentTarget, DocumentSink, ScanTypeResolver, XnatError};

use crate::logging::{REDACTED_VALUE, log_data_enabled, redact_value};

/// What happened to one results row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordStatus {
    /// Stored by the sink under the given identifier.
    Submitted(String),
    /// Built and serialized without being sent.
    Rendered,
    /// An assessment with the same label already exists.
    Exists,
    Failed(String),
}

impl RecordStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Exists | Self::Failed(_))
    }
}

#[derive(Debug, Clone)]
pub struct RecordOutcome {
    /// 1-based data row number.
    pub row: usize,
    /// Assessment label, when the row identified a scan.
    pub label: Option<String>,
    pub status: RecordStatus,
}

/// Outcome of one run over a results table.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub source: PathBuf,
    pub schema: SchemaId,
    pub dry_run: bool,
    pub outcomes: Vec<RecordOutcome>,
}

impl RunReport {
    pub fn count(&self, predicate: impl Fn(&RecordStatus) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| predicate(&outcome.status))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.count(RecordStatus::is_failure)
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes
            .iter()
            .any(|outcome| outcome.status.is_failure())
    }
}

/// Drives records through normalization, document building and submission.
pub struct Pipeline<'a> {
    resolver: &'a dyn ScanTypeResolver,
    sink: &'a dyn DocumentSink,
    builder: DocumentBuilder,
    project: String,
    schema: SchemaId,
    dry_run: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        resolver: &'a dyn ScanTypeResolver,
        sink: &'a dyn DocumentSink,
        project: impl Into<String>,
        schema: SchemaId,
    ) -> Self {
        Self {
            resolver,
            sink,
            builder: DocumentBuilder::default(),
            project: project.into(),
            schema,
            dry_run: false,
        }
    }

    #[must_use]
    pub fn with_builder(mut self, builder: DocumentBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Build and serialize documents without handing them to the sink.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Processes every record, in order.
    pub fn run(&self, source: &Path, records: &[Record]) -> RunReport {
        let outcomes = records
            .iter()
            .enumerate()
            .map(|(idx, record)| self.process(idx + 1, record))
            .collect();
        let report = RunReport {
            source: source.to_path_buf(),
            schema: self.schema,
            dry_run: self.dry_run,
            outcomes,
        };
        info!(
            schema = %self.schema,
            records = records.len(),
            failed = report.failed(),
            "run complete"
        );
        report
    }

    /// Processes one record and classifies the result.
    pub fn process(&self, row: usize, record: &Record) -> RecordOutcome {
        let span = info_span!("record", row);
        let _guard = span.enter();

        let target = ScanKey::from_record(record)
            .map(|key| AssessmentTarget::new(self.project.as_str(), key, self.schema));
        let label = target.as_ref().ok().map(|target| target.label.clone());

        let status = match target
            .map_err(anyhow::Error::from)
            .and_then(|target| self.submit(record, &target))
        {
            Ok(Some(id)) => RecordStatus::Submitted(id),
            Ok(None) => RecordStatus::Rendered,
            Err(err) if is_conflict(&err) => {
                warn!(label = label.as_deref().unwrap_or("-"), "assessment already exists, skipping");
                RecordStatus::Exists
            }
            Err(err) => {
                warn!(error = %loggable_error(&err), "record failed");
                RecordStatus::Failed(format!("{err:#}"))
            }
        };
        RecordOutcome { row, label, status }
    }

    /// Returns the sink identifier, or `None` on a dry run.
    fn submit(&self, record: &Record, target: &AssessmentTarget) -> Result<Option<String>> {
        let normalized = normalize_record(record).context("normalize record")?;
        let scan_type = self
            .resolver
            .scan_type(&self.project, &target.key)
            .with_context(|| format!("look up scan type for {}", target.key))?;
        debug!(
            subject = %target.key.subject,
            session = %target.key.session,
            scan = %target.key.scan_id,
            scan_type = %scan_type,
            "resolved scan"
        );

        let document =
            self.builder
                .build(&normalized, self.schema, &target.key.scan_id, &scan_type);
        let xml = document
            .to_xml_string()
            .context("serialize assessment document")?;
        trace!(xml = redact_value(&xml), "assessment document");

        if self.dry_run {
            info!(label = %target.label, bytes = xml.len(), "dry run, document not sent");
            return Ok(None);
        }
        let id = self.sink.submit(target, &xml)?;
        Ok(Some(id))
    }
}

fn is_conflict(err: &anyhow::Error) -> bool {
    err.downcast_ref::<XnatError>()
        .is_some_and(XnatError::is_conflict)
}

/// Renders the error chain for the log, masking metric values unless `--log-data` is set.
fn loggable_error(err: &anyhow::Error) -> String {
    if log_data_enabled() {
        return format!("{err:#}");
    }
    err.chain()
        .map(|cause| match cause.downcast_ref::<ModelError>() {
            Some(ModelError::DataFormat { field, .. }) => ModelError::DataFormat {
                field: field.clone(),
                value: REDACTED_VALUE.to_string(),
            }
            .to_string(),
            _ => cause.to_string(),
        })
        .collect::<Vec<_>>()
        .join(": ")
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use qap_xnat::FixedScanType;

    use super::*;

    #[derive(Default)]
    struct MemorySink {
        stored: RefCell<Vec<(String, String)>>,
    }

    impl DocumentSink for MemorySink {
        fn submit(&self, target: &AssessmentTarget, xml: &str) -> qap_xnat::Result<String> {
            let mut stored = self.stored.borrow_mut();
            if stored.iter().any(|(label, _)| label == &target.label) {
                return Err(XnatError::AlreadyExists {
                    label: target.label.clone(),
                });
            }
            stored.push((target.label.clone(), xml.to_string()));
            Ok(format!("XNAT_E{:05}", stored.len()))
        }
    }

    fn record(scan: &str) -> Record {
        Record::from_iter([
            ("subject", "S01"),
            ("session", "MR1"),
            ("scan", scan),
            ("snr", "10.5"),
            ("fg_size", "1500.0"),
        ])
    }

    #[test]
    fn test_submits_each_record() {
        let resolver = FixedScanType("T1w".to_string());
        let sink = MemorySink::default();
        let pipeline = Pipeline::new(&resolver, &sink, "QAP", SchemaId::AnatQa);

        let report = pipeline.run(Path::new("qap.csv"), &[record("anat_1"), record("anat_2")]);

        assert!(!report.has_failures());
        assert_eq!(report.outcomes[1].status, RecordStatus::Submitted("XNAT_E00002".to_string()));
        let stored = sink.stored.borrow();
        assert_eq!(stored[0].0, "S01_MR1_s1_anatQA");
        assert!(stored[0].1.contains("<AMCZ0:snr>10.5</AMCZ0:snr>"));
        assert!(stored[0].1.contains(r#"fg_size="1500""#));
    }

    #[test]
    fn test_conflict_is_reported_and_run_continues() {
        let resolver = FixedScanType("T1w".to_string());
        let sink = MemorySink::default();
        let pipeline = Pipeline::new(&resolver, &sink, "QAP", SchemaId::AnatQa);

        let report = pipeline.run(
            Path::new("qap.csv"),
            &[record("anat_1"), record("anat_1"), record("anat_3")],
        );

        assert_eq!(report.outcomes[1].status, RecordStatus::Exists);
        assert!(matches!(report.outcomes[2].status, RecordStatus::Submitted(_)));
        assert_eq!(report.failed(), 1);
    }

    #[test]
    fn test_bad_scan_label_fails_without_label() {
        let resolver = FixedScanType("T1w".to_string());
        let sink = MemorySink::default();
        let pipeline = Pipeline::new(&resolver, &sink, "QAP", SchemaId::AnatQa);

        let outcome = pipeline.process(1, &record("anat"));

        assert_eq!(outcome.label, None);
        assert!(matches!(outcome.status, RecordStatus::Failed(_)));
    }

    #[test]
    fn test_dry_run_leaves_sink_untouched() {
        let resolver = FixedScanType("rest".to_string());
        let sink = MemorySink::default();
        let pipeline =
            Pipeline::new(&resolver, &sink, "QAP", SchemaId::FtempQa).with_dry_run(true);

        let outcome = pipeline.process(1, &record("func_2"));

        assert_eq!(outcome.status, RecordStatus::Rendered);
        assert_eq!(outcome.label.as_deref(), Some("S01_MR1_s2_ftempQA"));
        assert!(sink.stored.borrow().is_empty());
    }

    #[test]
    fn test_logged_error_hides_metric_value() {
        let resolver = FixedScanType("T1w".to_string());
        let sink = MemorySink::default();
        let pipeline = Pipeline::new(&resolver, &sink, "QAP", SchemaId::AnatQa);
        let mut input = record("anat_1");
        input.insert("gm_size", "12ab7");

        let key = ScanKey::from_record(&input).unwrap();
        let target = AssessmentTarget::new("QAP", key, SchemaId::AnatQa);

        let err = pipeline.submit(&input, &target).unwrap_err();
        let logged = loggable_error(&err);

        assert!(logged.starts_with("normalize record: "));
        assert!(logged.contains("gm_size"));
        assert!(logged.contains(REDACTED_VALUE));
        assert!(!logged.contains("12ab7"));

        let outcome = pipeline.process(1, &input);
        assert!(matches!(outcome.status, RecordStatus::Failed(message) if message.contains("12ab7")));
    }
}
