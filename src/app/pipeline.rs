//! Stage workflows shared by the CLI commands.
//!
//! annotate: read line -> fetch categories -> assign domain -> write line
//! sample:   load labeled records -> quotas -> seeded draws -> write sample
//!
//! Counters are returned to the caller; nothing here prints.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::classify::assign_domain;
use crate::data::CategorySource;
use crate::domain::{AnnotateConfig, DomainLabel, Record, SampleConfig};
use crate::error::AppError;
use crate::io::{JsonlWriter, LineError, count_lines, open_lines, read_records, write_records};
use crate::sample::{
    DomainPools, QuotaPlan, availability, compute_quotas, draw_sample, group_by_domain,
};

/// Progress is logged every this many input lines.
const PROGRESS_EVERY: usize = 100;

/// Counters for one annotation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotateStats {
    /// Lines in the input file (counted up front).
    pub total_lines: usize,
    pub processed: usize,
    /// Lines passed through unlabeled because they were not JSON objects.
    pub errors: usize,
    /// Label name -> record count.
    pub per_label: BTreeMap<String, usize>,
}

impl AnnotateStats {
    pub fn labeled(&self) -> usize {
        self.per_label.values().sum()
    }

    /// Records that received a real domain (neither unclassified nor unknown).
    pub fn classified(&self) -> usize {
        self.per_label
            .iter()
            .filter(|(label, _)| {
                label.as_str() != DomainLabel::Unclassified.as_str()
                    && label.as_str() != DomainLabel::Unknown.as_str()
            })
            .map(|(_, n)| n)
            .sum()
    }

    pub fn count(&self, label: DomainLabel) -> usize {
        self.per_label.get(label.as_str()).copied().unwrap_or(0)
    }

    fn record(&mut self, label: DomainLabel) {
        *self.per_label.entry(label.as_str().to_string()).or_default() += 1;
    }
}

/// Label one record in place and return the label it received.
///
/// Records without a title are never looked up.
pub fn label_record<S: CategorySource + ?Sized>(record: &mut Record, source: &S) -> DomainLabel {
    let label = match record.title() {
        None => DomainLabel::Unknown,
        Some(title) => DomainLabel::from(assign_domain(&source.categories(title))),
    };
    record.set_domain(label);
    label
}

/// Run the fetch + classify stage over a whole file.
pub fn annotate_file<S: CategorySource + ?Sized>(
    config: &AnnotateConfig,
    source: &S,
) -> Result<AnnotateStats, AppError> {
    let mut stats = AnnotateStats {
        total_lines: count_lines(&config.input)?,
        ..AnnotateStats::default()
    };
    info!(
        input = %config.input.display(),
        output = %config.output.display(),
        rows = stats.total_lines,
        "annotating records"
    );

    let mut writer = JsonlWriter::create(&config.output)?;

    for line in open_lines(&config.input)? {
        let bytes = line.map_err(|e| {
            AppError::new(2, format!("Failed to read '{}': {e}", config.input.display()))
        })?;
        stats.processed += 1;

        let parsed = std::str::from_utf8(&bytes)
            .map_err(|e| format!("invalid UTF-8: {e}"))
            .and_then(|text| Record::from_json_line(text).map_err(|e| e.to_string()));
        match parsed {
            Ok(mut record) => {
                let label = label_record(&mut record, source);
                writer.write_record(&record)?;
                stats.record(label);
            }
            Err(error) => {
                stats.errors += 1;
                warn!(row = stats.processed, %error, "passing malformed row through unlabeled");
                writer.write_raw(&bytes)?;
            }
        }

        if stats.processed % PROGRESS_EVERY == 0 {
            log_progress(&stats);
        }
    }

    writer.finish()?;
    Ok(stats)
}

fn log_progress(stats: &AnnotateStats) {
    let pct = percent(stats.processed, stats.total_lines);
    let classified = stats.classified();
    info!(
        processed = stats.processed,
        total = stats.total_lines,
        pct = %format!("{pct:.1}"),
        classified,
        classified_pct = %format!("{:.1}", percent(classified, stats.processed)),
        "progress"
    );
}

pub(crate) fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

/// Labeled records grouped by domain, ready for planning.
#[derive(Debug, Clone)]
pub struct LoadedPools {
    pub pools: DomainPools,
    pub records_loaded: usize,
    pub skipped: Vec<LineError>,
}

/// Load the labeled file and group it by domain.
pub fn load_pools(config: &SampleConfig) -> Result<LoadedPools, AppError> {
    let loaded = read_records(&config.input)?;
    if loaded.records.is_empty() {
        return Err(AppError::new(
            3,
            format!("No records found in '{}'.", config.input.display()),
        ));
    }

    let records_loaded = loaded.records.len();
    let pools = group_by_domain(loaded.records);
    info!(
        input = %config.input.display(),
        records = records_loaded,
        domains = pools.len(),
        skipped = loaded.skipped.len(),
        "loaded labeled records"
    );

    Ok(LoadedPools {
        pools,
        records_loaded,
        skipped: loaded.skipped,
    })
}

/// Compute the quota table for already-loaded pools.
pub fn plan_quotas(pools: &DomainPools, config: &SampleConfig) -> QuotaPlan {
    let plan = compute_quotas(&availability(pools), config.total, &config.caps);
    if plan.shortfall() > 0 {
        warn!(
            requested = plan.requested_total,
            allocated = plan.allocated(),
            "not enough records to reach the requested total"
        );
    }
    plan
}

/// Outputs of a sampler run.
#[derive(Debug, Clone)]
pub struct SampleRun {
    pub plan: QuotaPlan,
    pub sample: Vec<Record>,
    pub records_loaded: usize,
    pub skipped: Vec<LineError>,
}

/// Run the quota + draw stage and write the sample file.
pub fn sample_file(config: &SampleConfig) -> Result<SampleRun, AppError> {
    let loaded = load_pools(config)?;
    let plan = plan_quotas(&loaded.pools, config);

    // One RNG for the whole run: draws first, then the final shuffle.
    let mut rng = StdRng::seed_from_u64(config.seed);
    let sample = draw_sample(&loaded.pools, &plan, &mut rng);

    write_records(&config.output, &sample)?;
    info!(
        output = %config.output.display(),
        records = sample.len(),
        seed = config.seed,
        "wrote stratified sample"
    );

    Ok(SampleRun {
        plan,
        sample,
        records_loaded: loaded.records_loaded,
        skipped: loaded.skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    use crate::domain::Domain;

    /// In-memory category lookup keyed by title.
    struct FakeSource(HashMap<&'static str, Vec<&'static str>>);

    impl CategorySource for FakeSource {
        fn categories(&self, title: &str) -> Vec<String> {
            self.0
                .get(title)
                .map(|cats| cats.iter().map(|c| c.to_string()).collect())
                .unwrap_or_default()
        }
    }

    /// Panics if asked anything: proves a record was not looked up.
    struct NoLookups;

    impl CategorySource for NoLookups {
        fn categories(&self, title: &str) -> Vec<String> {
            panic!("unexpected lookup for '{title}'");
        }
    }

    fn annotate_config(input: &Path, output: &Path) -> AnnotateConfig {
        AnnotateConfig {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            api_url: "http://unused".to_string(),
            user_agent: "test".to_string(),
            request_delay: Duration::ZERO,
            request_timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn labels_physics_unclassified_and_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.jsonl");
        let output = dir.path().join("out.jsonl");
        fs::write(
            &input,
            concat!(
                "{\"title\":\"A\",\"quality_class_best\":\"GA\"}\n",
                "{\"title\":\"B\"}\n",
                "{\"id\":3}\n",
            ),
        )
        .unwrap();
        let source = FakeSource(HashMap::from([("A", vec!["Physics"]), ("B", vec![])]));

        let stats = annotate_file(&annotate_config(&input, &output), &source).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(
            lines,
            vec![
                "{\"title\":\"A\",\"quality_class_best\":\"GA\",\"domain\":\"physics\"}",
                "{\"title\":\"B\",\"domain\":\"unclassified\"}",
                "{\"id\":3,\"domain\":\"unknown\"}",
            ]
        );
        assert_eq!(stats.total_lines, 3);
        assert_eq!(stats.processed, 3);
        assert_eq!(stats.errors, 0);
        assert_eq!(stats.classified(), 1);
        assert_eq!(stats.count(DomainLabel::Known(Domain::Physics)), 1);
        assert_eq!(stats.count(DomainLabel::Unclassified), 1);
        assert_eq!(stats.count(DomainLabel::Unknown), 1);
    }

    #[test]
    fn malformed_rows_pass_through_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.jsonl");
        let output = dir.path().join("out.jsonl");
        fs::write(&input, "{\"title\":\"\"}\n{broken\n\"just a string\"\n").unwrap();

        let stats = annotate_file(&annotate_config(&input, &output), &NoLookups).unwrap();

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "{\"title\":\"\",\"domain\":\"unknown\"}\n{broken\n\"just a string\"\n"
        );
        assert_eq!(stats.errors, 2);
        assert_eq!(stats.labeled(), 1);
    }

    #[test]
    fn untitled_record_is_never_looked_up() {
        let mut record = Record::from_json_line(r#"{"title":null}"#).unwrap();
        assert_eq!(label_record(&mut record, &NoLookups), DomainLabel::Unknown);
        assert_eq!(record.domain(), "unknown");
    }

    #[test]
    fn relabeling_overwrites_previous_domain() {
        let source = FakeSource(HashMap::from([("Cell", vec!["Cell biology"])]));
        let mut record =
            Record::from_json_line(r#"{"title":"Cell","domain":"history"}"#).unwrap();
        assert_eq!(
            label_record(&mut record, &source),
            DomainLabel::Known(Domain::Biology)
        );
        assert_eq!(record.domain(), "biology");
    }

    fn sample_config(input: &Path, output: &Path, total: usize, seed: u64) -> SampleConfig {
        SampleConfig {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            total,
            seed,
            caps: vec![("history".to_string(), 10.0), ("unclassified".to_string(), 20.0)],
        }
    }

    fn write_labeled(path: &Path, shape: &[(&str, usize)]) {
        let mut body = String::new();
        let mut id = 0;
        for (domain, n) in shape {
            for _ in 0..*n {
                body.push_str(&format!(
                    "{{\"id\":{id},\"title\":\"T{id}\",\"domain\":\"{domain}\"}}\n"
                ));
                id += 1;
            }
        }
        fs::write(path, body).unwrap();
    }

    #[test]
    fn sample_file_writes_capped_stratified_sample() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("labeled.jsonl");
        let output = dir.path().join("sample.jsonl");
        write_labeled(
            &input,
            &[("history", 50), ("physics", 60), ("biology", 40), ("unclassified", 100)],
        );

        let run = sample_file(&sample_config(&input, &output, 100, 42)).unwrap();

        assert_eq!(run.records_loaded, 250);
        assert_eq!(run.plan.target("history"), 10);
        assert_eq!(run.plan.target("unclassified"), 20);
        assert_eq!(run.plan.allocated(), 100);
        assert_eq!(run.sample.len(), 100);

        let written = read_records(&output).unwrap();
        assert_eq!(written.records, run.sample);
        let ids: HashSet<u64> = written
            .records
            .iter()
            .map(|r| r.fields()["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids.len(), 100);
        let history = written.records.iter().filter(|r| r.domain() == "history").count();
        assert_eq!(history, 10);
    }

    #[test]
    fn sample_file_is_reproducible_for_a_seed() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("labeled.jsonl");
        write_labeled(&input, &[("physics", 30), ("chemistry", 30), ("unclassified", 30)]);

        let a = sample_file(&sample_config(&input, &dir.path().join("a.jsonl"), 40, 42)).unwrap();
        let b = sample_file(&sample_config(&input, &dir.path().join("b.jsonl"), 40, 42)).unwrap();

        assert_eq!(a.sample, b.sample);
        assert_eq!(
            fs::read_to_string(dir.path().join("a.jsonl")).unwrap(),
            fs::read_to_string(dir.path().join("b.jsonl")).unwrap()
        );
    }

    #[test]
    fn sampler_tolerates_unlabeled_and_broken_lines() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("labeled.jsonl");
        fs::write(
            &input,
            "{\"title\":\"A\",\"domain\":\"physics\"}\n{oops\n{\"title\":\"B\"}\n",
        )
        .unwrap();

        let run = sample_file(&sample_config(&input, &dir.path().join("s.jsonl"), 10, 1)).unwrap();

        assert_eq!(run.records_loaded, 2);
        assert_eq!(run.skipped.len(), 1);
        assert_eq!(run.plan.target("unclassified"), 1);
        assert_eq!(run.plan.target("physics"), 1);
    }

    #[test]
    fn empty_sampler_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("labeled.jsonl");
        fs::write(&input, "\n").unwrap();

        let config = sample_config(&input, &dir.path().join("s.jsonl"), 10, 1);
        let err = sample_file(&config).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    fn input_with_undecodable_line(path: &Path) {
        let mut body = b"{\"title\":\"A\",\"domain\":\"physics\"}\n".to_vec();
        body.extend_from_slice(b"\xff\xfe\n");
        body.extend_from_slice(b"{\"title\":\"C\"}\n");
        fs::write(path, body).unwrap();
    }

    #[test]
    fn undecodable_row_passes_through_byte_for_byte() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.jsonl");
        let output = dir.path().join("out.jsonl");
        input_with_undecodable_line(&input);
        let source = FakeSource(HashMap::from([("A", vec!["Physics"]), ("C", vec![])]));

        let stats = annotate_file(&annotate_config(&input, &output), &source).unwrap();

        assert_eq!(stats.total_lines, 3);
        assert_eq!(stats.processed, 3);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.labeled(), 2);

        let written = fs::read(&output).unwrap();
        let lines: Vec<&[u8]> = written.split(|b| *b == b'\n').collect();
        assert_eq!(lines[1], b"\xff\xfe");
        assert_eq!(lines[2], b"{\"title\":\"C\",\"domain\":\"unclassified\"}");
    }

    #[test]
    fn sampler_skips_undecodable_row() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("labeled.jsonl");
        input_with_undecodable_line(&input);

        let run = sample_file(&sample_config(&input, &dir.path().join("s.jsonl"), 10, 1)).unwrap();

        assert_eq!(run.records_loaded, 2);
        assert_eq!(run.skipped.len(), 1);
        assert_eq!(run.skipped[0].line, 2);
        assert_eq!(run.sample.len(), 2);
    }
}
