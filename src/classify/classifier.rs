//! Keyword scoring of category sets.

use crate::classify::keywords::DOMAIN_KEYWORDS;
use crate::domain::Domain;

/// Score of one domain against a category set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainScore {
    pub domain: Domain,
    pub score: usize,
    /// Keywords that were found, in table order.
    pub matched: Vec<&'static str>,
}

/// Score every domain in table order.
///
/// Each keyword contributes at most 1: containment is checked once against the
/// joined, lowercased category text, however often it occurs.
pub fn score_domains<S: AsRef<str>>(categories: &[S]) -> Vec<DomainScore> {
    let text = category_text(categories);

    DOMAIN_KEYWORDS
        .iter()
        .map(|(domain, keywords)| {
            let matched: Vec<&'static str> = keywords
                .iter()
                .copied()
                .filter(|kw| text.contains(&kw.to_lowercase()))
                .collect();
            DomainScore {
                domain: *domain,
                score: matched.len(),
                matched,
            }
        })
        .collect()
}

/// Pick the best-scoring domain for a category set.
///
/// Returns `None` for an empty set or when no keyword matches. On equal
/// scores the domain listed first in the keyword table wins.
pub fn assign_domain<S: AsRef<str>>(categories: &[S]) -> Option<Domain> {
    if categories.is_empty() {
        return None;
    }

    let mut best: Option<(Domain, usize)> = None;
    for s in score_domains(categories) {
        if s.score == 0 {
            continue;
        }
        match best {
            Some((_, top)) if top >= s.score => {}
            _ => best = Some((s.domain, s.score)),
        }
    }

    best.map(|(domain, _)| domain)
}

fn category_text<S: AsRef<str>>(categories: &[S]) -> String {
    categories
        .iter()
        .map(|c| -> &str { c.as_ref() })
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
