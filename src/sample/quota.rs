//! Per-domain sample targets.
//!
//! Allocation runs in three passes:
//! 1. capped domains get `min(floor(pct * total / 100), available)` and are locked
//! 2. the rest split the remaining budget in proportion to their availability
//! 3. rounding/availability drift is reconciled on uncapped domains only
//!
//! If capped domains plus uncapped availability cannot reach the requested
//! total, the plan simply allocates less. That shortfall is not an error.

use std::collections::BTreeMap;

/// Target for one domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaEntry {
    pub domain: String,
    pub available: usize,
    pub target: usize,
    pub capped: bool,
}

impl QuotaEntry {
    fn room(&self) -> usize {
        self.available - self.target
    }
}

/// Quota table for a sampler run. Entries are ordered by domain name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaPlan {
    pub requested_total: usize,
    pub entries: Vec<QuotaEntry>,
}

impl QuotaPlan {
    pub fn allocated(&self) -> usize {
        self.entries.iter().map(|e| e.target).sum()
    }

    pub fn shortfall(&self) -> usize {
        self.requested_total.saturating_sub(self.allocated())
    }

    pub fn target(&self, domain: &str) -> usize {
        self.entries
            .iter()
            .find(|e| e.domain == domain)
            .map(|e| e.target)
            .unwrap_or(0)
    }
}

/// Compute per-domain targets from availability counts.
///
/// `caps` holds `(domain, percent)` pairs; caps for domains absent from
/// `available` are ignored.
pub fn compute_quotas(
    available: &BTreeMap<String, usize>,
    total: usize,
    caps: &[(String, f64)],
) -> QuotaPlan {
    let cap_for = |domain: &str| caps.iter().find(|(d, _)| d == domain).map(|(_, pct)| *pct);

    let mut entries: Vec<QuotaEntry> = available
        .iter()
        .map(|(domain, &count)| QuotaEntry {
            domain: domain.clone(),
            available: count,
            target: 0,
            capped: cap_for(domain.as_str()).is_some(),
        })
        .collect();

    // 1) Strict caps.
    let mut capped_total = 0usize;
    for entry in entries.iter_mut().filter(|e| e.capped) {
        let pct = cap_for(entry.domain.as_str()).unwrap_or(0.0);
        entry.target = cap_limit(pct, total).min(entry.available);
        capped_total += entry.target;
    }

    // 2) Proportional fill for everything else.
    let remaining_budget = total.saturating_sub(capped_total);
    let uncapped_available: usize = entries
        .iter()
        .filter(|e| !e.capped)
        .map(|e| e.available)
        .sum();
    if uncapped_available > 0 {
        for entry in entries.iter_mut().filter(|e| !e.capped) {
            let share = (entry.available as u128 * remaining_budget as u128
                / uncapped_available as u128) as usize;
            entry.target = share.min(entry.available);
        }
    }

    // 3) Reconcile against the requested total.
    reconcile(&mut entries, total);

    QuotaPlan {
        requested_total: total,
        entries,
    }
}

/// `floor(pct * total / 100)`, never negative.
fn cap_limit(pct: f64, total: usize) -> usize {
    let limit = (pct * total as f64 / 100.0).floor();
    if limit.is_finite() && limit > 0.0 {
        limit as usize
    } else {
        0
    }
}

fn reconcile(entries: &mut [QuotaEntry], total: usize) {
    let allocated: usize = entries.iter().map(|e| e.target).sum();

    if allocated < total {
        let mut missing = total - allocated;
        let mut order: Vec<usize> = (0..entries.len())
            .filter(|&i| !entries[i].capped && entries[i].room() > 0)
            .collect();
        // Stable sort: equal room keeps name order.
        order.sort_by(|&a, &b| entries[b].room().cmp(&entries[a].room()));

        for i in order {
            if missing == 0 {
                break;
            }
            let add = missing.min(entries[i].room());
            entries[i].target += add;
            missing -= add;
        }
    } else if allocated > total {
        let mut excess = allocated - total;
        let mut order: Vec<usize> = (0..entries.len()).filter(|&i| !entries[i].capped).collect();
        order.sort_by(|&a, &b| entries[b].target.cmp(&entries[a].target));

        for i in order {
            if excess == 0 {
                break;
            }
            let cut = excess.min(entries[i].target);
            entries[i].target -= cut;
            excess -= cut;
        }
    }
}
