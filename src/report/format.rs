//! Formatted terminal output for each command.
//!
//! Formatting lives here so the stage code only returns numbers.

use std::collections::HashMap;

use crate::app::pipeline::{AnnotateStats, SampleRun, percent};
use crate::classify::DomainScore;
use crate::domain::{DomainLabel, QUALITY_FIELD, Record, SampleConfig, UNCLASSIFIED};
use crate::sample::QuotaPlan;

const RULE_WIDTH: usize = 60;

/// Summary printed after `strata annotate`.
pub fn format_annotate_summary(stats: &AnnotateStats) -> String {
    let mut out = String::new();
    out.push_str(&heading("RESULTS"));
    out.push_str(&format!("Total processed: {}\n", stats.processed));
    out.push_str(&format!("Errors: {}\n", stats.errors));

    let classified = stats.classified();
    let unclassified = stats.count(DomainLabel::Unclassified);
    out.push_str(&format!(
        "Classified: {classified} ({:.1}%)\n",
        percent(classified, stats.processed)
    ));
    out.push_str(&format!(
        "Unclassified: {unclassified} ({:.1}%)\n",
        percent(unclassified, stats.processed)
    ));

    out.push_str("\nDomain distribution:\n");
    out.push_str(&rule('-'));
    for (label, count) in by_count_desc(&stats.per_label) {
        out.push_str(&format!(
            "{label:<30}: {count:>5} ({:>5.1}%)\n",
            percent(count, stats.total_lines)
        ));
    }
    out
}

/// Quota table printed by `strata plan` and `strata sample`.
pub fn format_quota_plan(plan: &QuotaPlan) -> String {
    let allocated = plan.allocated();
    let mut out = String::new();
    out.push_str("Sampling targets:\n");
    out.push_str(&rule('-'));
    for entry in &plan.entries {
        let capped = if entry.capped { " [CAPPED]" } else { "" };
        out.push_str(&format!(
            "{:<30}: {:>5} / {:>6} ({:>4.1}%){capped}\n",
            entry.domain,
            entry.target,
            entry.available,
            percent(entry.target, allocated),
        ));
    }
    out.push_str(&format!(
        "\nTotal allocated: {allocated} (target was {})\n",
        plan.requested_total
    ));
    if plan.shortfall() > 0 {
        out.push_str(&format!(
            "Shortfall: {} (caps and availability leave no room)\n",
            plan.shortfall()
        ));
    }
    out
}

/// Summary printed after `strata sample`.
pub fn format_sample_summary(run: &SampleRun, config: &SampleConfig) -> String {
    let total = run.sample.len();
    let mut out = String::new();
    out.push_str(&format!(
        "Loaded: {} records ({} unreadable lines skipped)\n\n",
        run.records_loaded,
        run.skipped.len()
    ));
    out.push_str(&format_quota_plan(&run.plan));

    out.push('\n');
    out.push_str(&heading("FINAL STRATIFIED SAMPLE"));
    out.push_str(&format!("Total records: {total} (seed {})\n\n", config.seed));

    let domains = tally(&run.sample, |r| r.domain().to_string());
    out.push_str("Domain distribution:\n");
    out.push_str(&rule('-'));
    for (domain, count) in by_count_desc(&domains) {
        out.push_str(&format!("  {domain:<28}: {count:>5} ({:>5.1}%)\n", percent(count, total)));
    }

    let quality = tally(&run.sample, |r| {
        r.str_field(QUALITY_FIELD).unwrap_or("Unknown").to_string()
    });
    out.push_str("\nQuality class distribution:\n");
    out.push_str(&rule('-'));
    for (class, count) in by_count_desc(&quality) {
        out.push_str(&format!("  {class:<28}: {count:>5} ({:>5.1}%)\n", percent(count, total)));
    }

    let unclassified = domains.get(UNCLASSIFIED).copied().unwrap_or(0);
    let classified = total - unclassified;
    out.push_str("\nSummary:\n");
    out.push_str(&format!(
        "  Classified domains: {classified} ({:.1}%)\n",
        percent(classified, total)
    ));
    out.push_str(&format!(
        "  Unclassified: {unclassified} ({:.1}%)\n",
        percent(unclassified, total)
    ));
    out.push_str(&format!("\nStratified sample saved to: {}\n", config.output.display()));
    out
}

/// Score breakdown printed by `strata classify`.
pub fn format_scores(categories: &[String], scores: &[DomainScore], label: DomainLabel) -> String {
    let mut out = String::new();
    out.push_str(&format!("Categories: {}\n", categories.join(" | ")));
    out.push_str(&format!("Domain: {}\n", label.as_str()));

    let mut hits: Vec<&DomainScore> = scores.iter().filter(|s| s.score > 0).collect();
    if hits.is_empty() {
        out.push_str("(no keyword matched)\n");
        return out;
    }
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    out.push('\n');
    for s in hits {
        out.push_str(&format!(
            "{:<24} {:>2}  {}\n",
            s.domain.as_str(),
            s.score,
            s.matched.join(", ")
        ));
    }
    out
}

fn tally(records: &[Record], key: impl Fn(&Record) -> String) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for r in records {
        *counts.entry(key(r)).or_insert(0) += 1;
    }
    counts
}

/// Sort by count descending, then name, for stable output.
fn by_count_desc<'a>(
    counts: impl IntoIterator<Item = (&'a String, &'a usize)>,
) -> Vec<(&'a str, usize)> {
    let mut rows: Vec<(&str, usize)> = counts
        .into_iter()
        .map(|(k, v)| (k.as_str(), *v))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    rows
}

fn heading(title: &str) -> String {
    format!("{}{title}\n{}", rule('='), rule('='))
}

fn rule(ch: char) -> String {
    let mut line: String = std::iter::repeat_n(ch, RULE_WIDTH).collect();
    line.push('\n');
    line
}
