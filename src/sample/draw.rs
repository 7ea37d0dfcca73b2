//! Seeded draws from per-domain pools.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::domain::Record;
use crate::sample::quota::QuotaPlan;

/// Records grouped by their `domain` field, keyed by domain name.
pub type DomainPools = BTreeMap<String, Vec<Record>>;

/// Group records by assigned domain. Unlabeled records land in `unclassified`.
pub fn group_by_domain(records: impl IntoIterator<Item = Record>) -> DomainPools {
    let mut pools = DomainPools::new();
    for record in records {
        pools.entry(record.domain().to_string()).or_default().push(record);
    }
    pools
}

/// Pool sizes per domain.
pub fn availability(pools: &DomainPools) -> BTreeMap<String, usize> {
    pools
        .iter()
        .map(|(domain, records)| (domain.clone(), records.len()))
        .collect()
}

/// Draw each domain's target without replacement, then shuffle the combined sample.
///
/// Domains are visited in name order so a given seed always yields the same output.
pub fn draw_sample(pools: &DomainPools, plan: &QuotaPlan, rng: &mut StdRng) -> Vec<Record> {
    let mut sampled = Vec::with_capacity(plan.allocated());

    for entry in &plan.entries {
        if entry.target == 0 {
            continue;
        }
        let Some(pool) = pools.get(&entry.domain) else {
            continue;
        };
        if pool.is_empty() {
            continue;
        }
        let take = entry.target.min(pool.len());
        sampled.extend(pool.choose_multiple(rng, take).cloned());
    }

    sampled.shuffle(rng);
    sampled
}
