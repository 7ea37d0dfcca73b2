//! Shared domain types.
//!
//! Records are kept as ordered JSON objects so that every field we do not
//! understand is written back exactly as it was read.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field added to every labeled record.
pub const DOMAIN_FIELD: &str = "domain";
/// Field identifying the source article.
pub const TITLE_FIELD: &str = "title";
/// Article quality grade carried through from the upstream dataset.
pub const QUALITY_FIELD: &str = "quality_class_best";

/// Label for records whose categories matched no domain keyword.
pub const UNCLASSIFIED: &str = "unclassified";
/// Label for records without a title.
pub const UNKNOWN: &str = "unknown";

/// Coarse subject domain assigned to an article.
///
/// Declaration order is significant: it is the iteration order of the keyword
/// table and therefore the classifier's tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Domain {
    // Social sciences
    GovernmentPolitics,
    Economics,
    Psychology,
    Sociology,
    Anthropology,
    // Business
    Management,
    AccountingFinance,
    BusinessLaw,
    Entrepreneurship,
    Marketing,
    BusinessStatistics,
    // Health
    Nursing,
    ClinicalMedicine,
    Obstetrics,
    MentalHealth,
    Surgery,
    NutritionPharma,
    PublicHealth,
    // Humanities
    History,
    Philosophy,
    Writing,
    // Life sciences
    AnatomyPhysiology,
    Biology,
    Microbiology,
    // Physical sciences
    Astronomy,
    Physics,
    Chemistry,
    // Math and statistics
    Mathematics,
    Statistics,
    // Computing
    ComputerScience,
    DataScience,
}

impl Domain {
    pub const ALL: [Domain; 31] = [
        Domain::GovernmentPolitics,
        Domain::Economics,
        Domain::Psychology,
        Domain::Sociology,
        Domain::Anthropology,
        Domain::Management,
        Domain::AccountingFinance,
        Domain::BusinessLaw,
        Domain::Entrepreneurship,
        Domain::Marketing,
        Domain::BusinessStatistics,
        Domain::Nursing,
        Domain::ClinicalMedicine,
        Domain::Obstetrics,
        Domain::MentalHealth,
        Domain::Surgery,
        Domain::NutritionPharma,
        Domain::PublicHealth,
        Domain::History,
        Domain::Philosophy,
        Domain::Writing,
        Domain::AnatomyPhysiology,
        Domain::Biology,
        Domain::Microbiology,
        Domain::Astronomy,
        Domain::Physics,
        Domain::Chemistry,
        Domain::Mathematics,
        Domain::Statistics,
        Domain::ComputerScience,
        Domain::DataScience,
    ];

    /// Name written into the `domain` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::GovernmentPolitics => "government_politics",
            Domain::Economics => "economics",
            Domain::Psychology => "psychology",
            Domain::Sociology => "sociology",
            Domain::Anthropology => "anthropology",
            Domain::Management => "management",
            Domain::AccountingFinance => "accounting_finance",
            Domain::BusinessLaw => "business_law",
            Domain::Entrepreneurship => "entrepreneurship",
            Domain::Marketing => "marketing",
            Domain::BusinessStatistics => "business_statistics",
            Domain::Nursing => "nursing",
            Domain::ClinicalMedicine => "clinical_medicine",
            Domain::Obstetrics => "obstetrics",
            Domain::MentalHealth => "mental_health",
            Domain::Surgery => "surgery",
            Domain::NutritionPharma => "nutrition_pharma",
            Domain::PublicHealth => "public_health",
            Domain::History => "history",
            Domain::Philosophy => "philosophy",
            Domain::Writing => "writing",
            Domain::AnatomyPhysiology => "anatomy_physiology",
            Domain::Biology => "biology",
            Domain::Microbiology => "microbiology",
            Domain::Astronomy => "astronomy",
            Domain::Physics => "physics",
            Domain::Chemistry => "chemistry",
            Domain::Mathematics => "mathematics",
            Domain::Statistics => "statistics",
            Domain::ComputerScience => "computer_science",
            Domain::DataScience => "data_science",
        }
    }

    /// Look up a domain by its field name.
    pub fn from_name(name: &str) -> Option<Domain> {
        Domain::ALL.into_iter().find(|d| d.as_str() == name)
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The label a record receives from the annotation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainLabel {
    Known(Domain),
    /// Categories were fetched (possibly none) but no keyword matched.
    Unclassified,
    /// The record had no title, so nothing was fetched.
    Unknown,
}

impl DomainLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            DomainLabel::Known(domain) => domain.as_str(),
            DomainLabel::Unclassified => UNCLASSIFIED,
            DomainLabel::Unknown => UNKNOWN,
        }
    }
}

impl From<Option<Domain>> for DomainLabel {
    fn from(value: Option<Domain>) -> Self {
        match value {
            Some(domain) => DomainLabel::Known(domain),
            None => DomainLabel::Unclassified,
        }
    }
}

/// One dataset record: an ordered JSON object passed through verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Parse one NDJSON line. Anything other than a JSON object is rejected.
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim())
    }

    /// Serialize as a single line (no trailing newline).
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    /// Title used to look up categories. Missing, non-string and empty titles are `None`.
    pub fn title(&self) -> Option<&str> {
        self.str_field(TITLE_FIELD).filter(|t| !t.is_empty())
    }

    /// Assigned domain; records that were never labeled count as unclassified.
    pub fn domain(&self) -> &str {
        self.str_field(DOMAIN_FIELD).unwrap_or(UNCLASSIFIED)
    }

    pub fn set_domain(&mut self, label: DomainLabel) {
        self.0
            .insert(DOMAIN_FIELD.to_string(), Value::String(label.as_str().to_string()));
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Settings for the fetch + classify stage.
#[derive(Debug, Clone)]
pub struct AnnotateConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub api_url: String,
    pub user_agent: String,
    /// Pause before every category request.
    pub request_delay: Duration,
    pub request_timeout: Duration,
}

/// Settings for the quota + draw stage.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub total: usize,
    pub seed: u64,
    /// Hard percentage caps, `(domain, percent)`.
    pub caps: Vec<(String, f64)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_names_round_trip_through_lookup() {
        for domain in Domain::ALL {
            assert_eq!(Domain::from_name(domain.as_str()), Some(domain));
        }
        assert_eq!(Domain::from_name("unclassified"), None);
    }

    #[test]
    fn record_keeps_field_order_and_adds_domain_last() {
        let line = r#"{"title":"Entropy","quality_class_best":"B","views":12}"#;
        let mut record = Record::from_json_line(line).unwrap();
        record.set_domain(DomainLabel::Known(Domain::Physics));

        assert_eq!(
            record.to_json_line().unwrap(),
            r#"{"title":"Entropy","quality_class_best":"B","views":12,"domain":"physics"}"#
        );
    }

    #[test]
    fn record_title_rejects_empty_and_non_string() {
        let empty = Record::from_json_line(r#"{"title":""}"#).unwrap();
        let number = Record::from_json_line(r#"{"title":5}"#).unwrap();
        let missing = Record::from_json_line(r#"{"id":1}"#).unwrap();
        assert_eq!(empty.title(), None);
        assert_eq!(number.title(), None);
        assert_eq!(missing.title(), None);
    }

    #[test]
    fn record_rejects_non_object_lines() {
        assert!(Record::from_json_line("[1, 2]").is_err());
        assert!(Record::from_json_line("not json").is_err());
    }

    #[test]
    fn unlabeled_record_defaults_to_unclassified() {
        let record = Record::from_json_line(r#"{"title":"X"}"#).unwrap();
        assert_eq!(record.domain(), UNCLASSIFIED);
    }
}
