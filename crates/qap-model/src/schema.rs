//! XNAT assessment schemas and their metric partition tables.
//!
//! Each QAP assessment datatype splits its metrics into two groups:
//!
//! - **Root measures** become standalone child elements of the document root.
//! - **Nested measures** become attributes on a shared child element; several
//!   metrics may target the same element (e.g. `fg_mean`, `fg_size` and
//!   `fg_std` all land on `fg`).
//!
//! The tables are static data attached to [`SchemaId`]. Supporting a new
//! datatype means adding a variant and a table, not new traversal code.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Prefix of the shared XNAT namespace used for generic fields.
pub const XNAT_NS_PREFIX: &str = "xnat";
/// Shared XNAT namespace URI.
pub const XNAT_NS: &str = "http://nrg.wustl.edu/xnat";
/// XML Schema instance namespace prefix.
pub const XSI_NS_PREFIX: &str = "xsi";
/// XML Schema instance namespace URI.
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Namespace prefix of the AMC QAP datatypes.
const AMCZ0_PREFIX: &str = "AMCZ0";
/// Namespace URI of the AMC QAP datatypes.
const AMCZ0_NS: &str = "http://nrg.wustl.edu/AMCZ0";

/// Where a metric lands in the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Standalone child element of the root.
    Root,
    /// Attribute on the named nested element.
    Nested(&'static str),
}

/// Partition of metric names for one assessment schema.
#[derive(Debug)]
pub struct SchemaDefinition {
    /// Metrics rendered as standalone child elements, in schema order.
    pub root_measures: &'static [&'static str],
    /// Metric name to nested-element name.
    pub nested_measures: &'static [(&'static str, &'static str)],
}

impl SchemaDefinition {
    pub fn is_root_measure(&self, metric: &str) -> bool {
        self.root_measures.contains(&metric)
    }

    /// Returns the nested element a metric contributes an attribute to.
    pub fn nested_target(&self, metric: &str) -> Option<&'static str> {
        self.nested_measures
            .iter()
            .find(|(name, _)| *name == metric)
            .map(|(_, element)| *element)
    }

    /// Classifies a metric, or returns `None` when the schema ignores it.
    pub fn placement(&self, metric: &str) -> Option<Placement> {
        if self.is_root_measure(metric) {
            Some(Placement::Root)
        } else {
            self.nested_target(metric).map(Placement::Nested)
        }
    }

    /// Distinct nested element names in first-use order.
    pub fn nested_elements(&self) -> Vec<&'static str> {
        let mut elements: Vec<&'static str> = Vec::new();
        for (_, element) in self.nested_measures {
            if !elements.contains(element) {
                elements.push(*element);
            }
        }
        elements
    }

    /// Total number of metrics the schema recognizes.
    pub fn metric_count(&self) -> usize {
        self.root_measures.len() + self.nested_measures.len()
    }
}

static ANAT_QA: SchemaDefinition = SchemaDefinition {
    root_measures: &["cnr", "efc", "snr", "fber", "qi1", "gcor"],
    nested_measures: &[
        ("gm_mean", "gm"),
        ("gm_size", "gm"),
        ("gm_std", "gm"),
        ("wm_mean", "wm"),
        ("wm_size", "wm"),
        ("wm_std", "wm"),
        ("csf_mean", "csf"),
        ("csf_size", "csf"),
        ("csf_std", "csf"),
        ("fg_mean", "fg"),
        ("fg_size", "fg"),
        ("fg_std", "fg"),
        ("bg_mean", "bg"),
        ("bg_size", "bg"),
        ("bg_std", "bg"),
        ("fwhm_x", "fwhm"),
        ("fwhm_y", "fwhm"),
        ("fwhm_z", "fwhm"),
    ],
};

static FSPAT_QA: SchemaDefinition = SchemaDefinition {
    root_measures: &["efc", "snr", "fber", "fwhm"],
    nested_measures: &[
        ("ghost_x", "gsr"),
        ("ghost_y", "gsr"),
        ("ghost_z", "gsr"),
        ("fg_mean", "fg"),
        ("fg_size", "fg"),
        ("fg_std", "fg"),
        ("bg_mean", "bg"),
        ("bg_size", "bg"),
        ("bg_std", "bg"),
        ("fwhm_x", "fwhm"),
        ("fwhm_y", "fwhm"),
        ("fwhm_z", "fwhm"),
    ],
};

static FTEMP_QA: SchemaDefinition = SchemaDefinition {
    root_measures: &["quality", "m_tsnr", "fber", "outlier", "dvars", "gcor"],
    nested_measures: &[("mean_fd", "fd"), ("num_fd", "fd"), ("perc_fd", "fd")],
};

/// Assessment datatype a document is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaId {
    /// Structural MRI QA (`AMCZ0:anatQA`).
    AnatQa,
    /// Functional MRI spatial QA (`AMCZ0:fspatQA`).
    FspatQa,
    /// Functional MRI temporal QA (`AMCZ0:ftempQA`).
    FtempQa,
}

impl SchemaId {
    /// Every registered schema, in display order.
    pub const ALL: [SchemaId; 3] = [SchemaId::AnatQa, SchemaId::FspatQa, SchemaId::FtempQa];

    /// Compound datatype identifier, e.g. `AMCZ0:anatQA`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaId::AnatQa => "AMCZ0:anatQA",
            SchemaId::FspatQa => "AMCZ0:fspatQA",
            SchemaId::FtempQa => "AMCZ0:ftempQA",
        }
    }

    /// Namespace part of the identifier.
    pub fn namespace_prefix(&self) -> &'static str {
        AMCZ0_PREFIX
    }

    pub fn namespace_uri(&self) -> &'static str {
        AMCZ0_NS
    }

    /// Element-type part of the identifier (the root element's local name).
    pub fn element_name(&self) -> &'static str {
        match self {
            SchemaId::AnatQa => "anatQA",
            SchemaId::FspatQa => "fspatQA",
            SchemaId::FtempQa => "ftempQA",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SchemaId::AnatQa => "Structural MRI quality assessment",
            SchemaId::FspatQa => "Functional MRI spatial quality assessment",
            SchemaId::FtempQa => "Functional MRI temporal quality assessment",
        }
    }

    /// Metric partition table for this schema.
    pub fn definition(&self) -> &'static SchemaDefinition {
        match self {
            SchemaId::AnatQa => &ANAT_QA,
            SchemaId::FspatQa => &FSPAT_QA,
            SchemaId::FtempQa => &FTEMP_QA,
        }
    }

    /// Selects the schema for a scan category and, for functional scans,
    /// the QAP analysis that produced the results.
    pub fn select(category: ScanCategory, analysis: Option<QapAnalysis>) -> Result<Self, ModelError> {
        match (category, analysis) {
            (ScanCategory::Anatomical, _) => Ok(SchemaId::AnatQa),
            (ScanCategory::Functional, Some(QapAnalysis::Spatial)) => Ok(SchemaId::FspatQa),
            (ScanCategory::Functional, Some(QapAnalysis::Temporal)) => Ok(SchemaId::FtempQa),
            (ScanCategory::Functional, None) => Err(ModelError::InvalidSchemaSelection {
                scan_category: category.to_string(),
                analysis: String::new(),
            }),
        }
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaId {
    type Err = ModelError;

    /// Parses the exact compound identifier. Surrounding whitespace or a
    /// different case makes it unknown.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemaId::ALL
            .into_iter()
            .find(|schema| schema.as_str() == s)
            .ok_or_else(|| ModelError::UnknownSchema(s.to_string()))
    }
}

/// Imaging category of the scans in a results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanCategory {
    Anatomical,
    Functional,
}

impl ScanCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanCategory::Anatomical => "anat",
            ScanCategory::Functional => "func",
        }
    }
}

impl fmt::Display for ScanCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// QAP analysis that produced functional results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QapAnalysis {
    Spatial,
    Temporal,
}

impl QapAnalysis {
    pub fn as_str(&self) -> &'static str {
        match self {
            QapAnalysis::Spatial => "spatial",
            QapAnalysis::Temporal => "temporal",
        }
    }
}

impl fmt::Display for QapAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_parse_roundtrip() {
        for schema in SchemaId::ALL {
            assert_eq!(schema.as_str().parse::<SchemaId>().unwrap(), schema);
        }
    }

    #[test]
    fn test_schema_parse_unknown() {
        assert_eq!(
            "xyz".parse::<SchemaId>(),
            Err(ModelError::UnknownSchema("xyz".to_string()))
        );
        // Element name alone is not an identifier.
        assert!("anatQA".parse::<SchemaId>().is_err());
        assert_eq!(
            " AMCZ0:anatQA ".parse::<SchemaId>(),
            Err(ModelError::UnknownSchema(" AMCZ0:anatQA ".to_string()))
        );
        assert!("amcz0:anatqa".parse::<SchemaId>().is_err());
    }

    #[test]
    fn test_identifier_splits_into_prefix_and_element() {
        for schema in SchemaId::ALL {
            let (prefix, element) = schema.as_str().split_once(':').unwrap();
            assert_eq!(schema.namespace_prefix(), prefix);
            assert_eq!(schema.element_name(), element);
            assert_eq!(schema.namespace_uri(), format!("http://nrg.wustl.edu/{prefix}"));
        }
    }

    #[test]
    fn test_no_metric_is_both_root_and_nested() {
        for schema in SchemaId::ALL {
            let definition = schema.definition();
            for (metric, _) in definition.nested_measures {
                assert!(
                    !definition.is_root_measure(metric),
                    "{metric} is both root and nested in {schema}"
                );
            }
        }
    }

    #[test]
    fn test_placement() {
        let anat = SchemaId::AnatQa.definition();
        assert_eq!(anat.placement("snr"), Some(Placement::Root));
        assert_eq!(anat.placement("gm_std"), Some(Placement::Nested("gm")));
        assert_eq!(anat.placement("ghost_x"), None);

        let ftemp = SchemaId::FtempQa.definition();
        assert_eq!(ftemp.placement("num_fd"), Some(Placement::Nested("fd")));
        assert_eq!(ftemp.placement("snr"), None);
    }

    #[test]
    fn test_nested_elements_distinct() {
        assert_eq!(
            SchemaId::AnatQa.definition().nested_elements(),
            vec!["gm", "wm", "csf", "fg", "bg", "fwhm"]
        );
        assert_eq!(
            SchemaId::FspatQa.definition().nested_elements(),
            vec!["gsr", "fg", "bg", "fwhm"]
        );
        assert_eq!(SchemaId::FtempQa.definition().nested_elements(), vec!["fd"]);
    }

    #[test]
    fn test_select() {
        assert_eq!(
            SchemaId::select(ScanCategory::Anatomical, None),
            Ok(SchemaId::AnatQa)
        );
        assert_eq!(
            SchemaId::select(ScanCategory::Functional, Some(QapAnalysis::Spatial)),
            Ok(SchemaId::FspatQa)
        );
        assert_eq!(
            SchemaId::select(ScanCategory::Functional, Some(QapAnalysis::Temporal)),
            Ok(SchemaId::FtempQa)
        );
        assert!(SchemaId::select(ScanCategory::Functional, None).is_err());
    }
}
