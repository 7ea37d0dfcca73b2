//! Percentage caps on how much of the sample a domain may take.

use crate::error::AppError;

/// Compiled-in caps, as percent of the requested total.
pub const DEFAULT_CAPS: &[(&str, f64)] = &[
    ("history", 5.0),
    ("nursing", 5.0),
    ("government_politics", 7.0),
    ("biology", 6.0),
    ("unclassified", 30.0),
];

pub fn default_caps() -> Vec<(String, f64)> {
    DEFAULT_CAPS
        .iter()
        .map(|(domain, pct)| (domain.to_string(), *pct))
        .collect()
}

/// Parse a `domain=percent` CLI value.
pub fn parse_cap(raw: &str) -> Result<(String, f64), String> {
    let (domain, pct) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected <domain>=<percent>, got '{raw}'"))?;
    let domain = domain.trim();
    if domain.is_empty() {
        return Err(format!("missing domain name in '{raw}'"));
    }
    let pct: f64 = pct
        .trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|e| format!("invalid percent in '{raw}': {e}"))?;
    Ok((domain.to_string(), pct))
}

/// Apply overrides on top of a base table. An override replaces an existing
/// entry for the same domain; new domains are appended.
pub fn merge_caps(mut base: Vec<(String, f64)>, overrides: &[(String, f64)]) -> Vec<(String, f64)> {
    for (domain, pct) in overrides {
        match base.iter_mut().find(|(d, _)| d == domain) {
            Some(entry) => entry.1 = *pct,
            None => base.push((domain.clone(), *pct)),
        }
    }
    base
}

/// Every cap must lie in `[0, 100]`, domains must be unique and the caps may
/// not add up to more than the whole sample.
pub fn validate_caps(caps: &[(String, f64)]) -> Result<(), AppError> {
    let mut sum = 0.0;
    for (idx, (domain, pct)) in caps.iter().enumerate() {
        if !(pct.is_finite() && (0.0..=100.0).contains(pct)) {
            return Err(AppError::new(
                2,
                format!("Cap for '{domain}' must be between 0 and 100, got {pct}."),
            ));
        }
        if caps[..idx].iter().any(|(d, _)| d == domain) {
            return Err(AppError::new(2, format!("Duplicate cap for '{domain}'.")));
        }
        sum += pct;
    }
    if sum > 100.0 + 1e-9 {
        return Err(AppError::new(
            2,
            format!("Caps add up to {sum:.1}%, which exceeds 100%."),
        ));
    }
    Ok(())
}
