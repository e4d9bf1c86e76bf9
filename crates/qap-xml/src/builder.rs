//! Assessment document builder.
//!
//! Turns one normalized results row into an XNAT assessment document:
//!
//! ```text
//! <AMCZ0:anatQA xmlns:AMCZ0=".." xmlns:xnat=".." xmlns:xsi="..">
//!   <!-- XNAT XML generated by qap-ingest - .. on 2016-09-27 10:00:00 -->
//!   <xnat:date>2016-09-27</xnat:date>
//!   <xnat:time>10:00:00</xnat:time>
//!   <AMCZ0:scan ID="3" type="T1w"/>
//!   <AMCZ0:snr>10.5</AMCZ0:snr>
//!   <AMCZ0:gm gm_mean="0.8" gm_std="0.1"/>
//! </AMCZ0:anatQA>
//! ```
//!
//! Root measures become child elements. Nested measures become attributes
//! on a child element shared by every metric of the same group, created the
//! first time a metric of that group is seen.

use chrono::{Local, NaiveDateTime, SubsecRound};
use tracing::debug;

use qap_model::{Record, SchemaDefinition, SchemaId};

use crate::error::Result;
use crate::tree::{Document, Element, Namespace};

/// Default generator name recorded in the document comment.
pub const DEFAULT_GENERATOR: &str = "qap-ingest";

/// Default author recorded in the document comment.
pub const DEFAULT_AUTHOR: &str = "QAP ingest";

/// Builds assessment documents from normalized records.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    generator: String,
    author: String,
    timestamp: Option<NaiveDateTime>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self {
            generator: DEFAULT_GENERATOR.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            timestamp: None,
        }
    }
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tool name written to the generation comment.
    #[must_use]
    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }

    /// Set the author written to the generation comment.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Pin the generation timestamp instead of reading the clock per build.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp.trunc_subsecs(0));
        self
    }

    /// Builds the document for `record` under `schema`.
    ///
    /// `scan_id` and `scan_type` are written to the `scan` element as given.
    /// Record keys the schema does not know are ignored.
    pub fn build(
        &self,
        record: &Record,
        schema: SchemaId,
        scan_id: &str,
        scan_type: &str,
    ) -> Document {
        let generated_at = self
            .timestamp
            .unwrap_or_else(|| Local::now().naive_local().trunc_subsecs(0));
        let namespace = Namespace::of_schema(schema);

        let mut root = Element::new(namespace, schema.element_name());
        root.append_comment(format!(
            " XNAT XML generated by {} - {} on {} ",
            comment_safe(&self.generator),
            comment_safe(&self.author),
            generated_at.format("%Y-%m-%d %H:%M:%S")
        ));
        root.append_child(Element::with_text(
            Namespace::XNAT,
            "date",
            generated_at.format("%Y-%m-%d").to_string(),
        ));
        root.append_child(Element::with_text(
            Namespace::XNAT,
            "time",
            generated_at.format("%H:%M:%S").to_string(),
        ));

        let mut scan = Element::new(namespace, "scan");
        scan.set_attribute("ID", scan_id);
        scan.set_attribute("type", scan_type);
        root.append_child(scan);

        let mut context = BuildContext {
            root: &mut root,
            namespace,
            definition: schema.definition(),
        };
        let placed = context.populate(record);
        debug!(
            schema = %schema,
            scan_id,
            placed,
            ignored = record.len() - placed,
            "built assessment document"
        );

        Document::new(root, vec![namespace, Namespace::XNAT, Namespace::XSI])
    }

    /// Builds a document for a schema given by its compound identifier.
    ///
    /// Fails with [`qap_model::ModelError::UnknownSchema`] before anything is
    /// built when the identifier is not registered.
    pub fn build_for(
        &self,
        record: &Record,
        schema_id: &str,
        scan_id: &str,
        scan_type: &str,
    ) -> Result<Document> {
        let schema: SchemaId = schema_id.parse()?;
        Ok(self.build(record, schema, scan_id, scan_type))
    }
}

/// Builds a document with the default generator settings.
pub fn build_document(
    record: &Record,
    schema_id: &str,
    scan_id: &str,
    scan_type: &str,
) -> Result<Document> {
    DocumentBuilder::default().build_for(record, schema_id, scan_id, scan_type)
}

/// Mutable state for populating one document. Never outlives a `build` call.
struct BuildContext<'a> {
    root: &'a mut Element,
    namespace: Namespace,
    definition: &'static SchemaDefinition,
}

impl BuildContext<'_> {
    /// Inserts every recognized metric and returns how many were placed.
    fn populate(&mut self, record: &Record) -> usize {
        let mut placed = 0usize;
        // Root measures go first so a group named like a root measure
        // (`fwhm` in the spatial schema) attaches to that element.
        for (metric, value) in record.iter() {
            if self.definition.is_root_measure(metric) {
                self.root
                    .append_child(Element::with_text(self.namespace, metric, value));
                placed += 1;
            }
        }
        for (metric, value) in record.iter() {
            if let Some(target) = self.definition.nested_target(metric) {
                self.add_nested(target, metric, value);
                placed += 1;
            }
        }
        placed
    }

    /// Adds `metric=value` to the nested element `target`, creating it on first use.
    fn add_nested(&mut self, target: &str, metric: &str, value: &str) {
        match self.root.find_descendant_mut(self.namespace, target) {
            Some(element) => element.set_attribute(metric, value),
            None => {
                let mut element = Element::new(self.namespace, target);
                element.set_attribute(metric, value);
                self.root.append_child(element);
            }
        }
    }
}

/// Comments may not contain `--`.
fn comment_safe(value: &str) -> String {
    let mut out = value.to_string();
    while out.contains("--") {
        out = out.replace("--", "-");
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::tree::Node;

    fn fixed_builder() -> DocumentBuilder {
        let timestamp = NaiveDate::from_ymd_opt(2016, 9, 27)
            .unwrap()
            .and_hms_opt(10, 15, 30)
            .unwrap();
        DocumentBuilder::new()
            .with_generator("qap-ingest")
            .with_author("tester")
            .with_timestamp(timestamp)
    }

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_header_elements() {
        let document = fixed_builder().build(&Record::new(), SchemaId::AnatQa, "3", "T1w");
        let root = document.root();
        let ns = Namespace::of_schema(SchemaId::AnatQa);

        assert_eq!(root.qualified_name(), "AMCZ0:anatQA");
        assert_eq!(
            root.children()[0],
            Node::Comment(
                " XNAT XML generated by qap-ingest - tester on 2016-09-27 10:15:30 ".to_string()
            )
        );
        assert_eq!(
            root.find_descendant(Namespace::XNAT, "date").unwrap().text(),
            "2016-09-27"
        );
        assert_eq!(
            root.find_descendant(Namespace::XNAT, "time").unwrap().text(),
            "10:15:30"
        );
        let scan = root.find_descendant(ns, "scan").unwrap();
        assert_eq!(scan.attribute("ID"), Some("3"));
        assert_eq!(scan.attribute("type"), Some("T1w"));
        assert_eq!(
            document.declarations(),
            &[ns, Namespace::XNAT, Namespace::XSI]
        );
    }

    #[test]
    fn test_fwhm_group_attaches_to_root_measure() {
        let input = record(&[("fwhm_x", "2.1"), ("fwhm", "2.4"), ("fwhm_y", "2.2")]);
        let document = fixed_builder().build(&input, SchemaId::FspatQa, "5", "rest");
        let ns = Namespace::of_schema(SchemaId::FspatQa);

        let fwhm: Vec<&Element> = document.root().children_named(ns, "fwhm").collect();
        assert_eq!(fwhm.len(), 1);
        assert_eq!(fwhm[0].text(), "2.4");
        assert_eq!(fwhm[0].attribute("fwhm_x"), Some("2.1"));
        assert_eq!(fwhm[0].attribute("fwhm_y"), Some("2.2"));
    }

    #[test]
    fn test_empty_values_are_rendered() {
        let input = record(&[("snr", ""), ("gm_mean", "")]);
        let document = fixed_builder().build(&input, SchemaId::AnatQa, "1", "T1w");
        let ns = Namespace::of_schema(SchemaId::AnatQa);

        assert_eq!(document.root().find_descendant(ns, "snr").unwrap().text(), "");
        assert_eq!(
            document
                .root()
                .find_descendant(ns, "gm")
                .unwrap()
                .attribute("gm_mean"),
            Some("")
        );
    }

    #[test]
    fn test_build_for_unknown_schema() {
        let result = fixed_builder().build_for(&Record::new(), "xyz", "1", "T1w");
        assert!(matches!(
            result,
            Err(crate::XmlError::Model(qap_model::ModelError::UnknownSchema(_)))
        ));
    }

    #[test]
    fn test_comment_safe() {
        assert_eq!(comment_safe("a--b---c"), "a-b-c");
        assert_eq!(comment_safe("plain"), "plain");
    }
}
