//! Version Comparator
//!
//! Ordering over dotted release versions like "1.2.3" or "v1.2.3".

use std::cmp::Ordering;

/// Compare two dotted version strings.
///
/// An optional leading `v`/`V` is stripped from each input. Components are
/// compared numerically up to the longer sequence; a missing trailing
/// component counts as 0, so "1.2" and "1.2.0" are equal.
pub fn compare(a: &str, b: &str) -> Ordering {
    let a_parts = components(a);
    let b_parts = components(b);

    let len = a_parts.len().max(b_parts.len());
    for i in 0..len {
        let x = a_parts.get(i).copied().unwrap_or(0);
        let y = b_parts.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// True when `candidate` is strictly newer than `current`.
pub fn is_newer(candidate: &str, current: &str) -> bool {
    compare(candidate, current) == Ordering::Greater
}

fn components(version: &str) -> Vec<u64> {
    let trimmed = version.trim();
    let normalized = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);

    // Non-numeric components count as 0; release tags have always been
    // parsed permissively and malformed input must not panic here.
    normalized
        .split('.')
        .map(|part| part.parse::<u64>().unwrap_or(0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_versions() {
        assert_eq!(compare("1.2.3", "1.2.3"), Ordering::Equal);
        assert_eq!(compare("v1.2.3", "1.2.3"), Ordering::Equal);
    }

    #[test]
    fn test_trailing_zero_equivalence() {
        assert_eq!(compare("1.2", "1.2.0"), Ordering::Equal);
        assert_eq!(compare("1.2.0.0", "1.2"), Ordering::Equal);
    }

    #[test]
    fn test_prefix_stripped_ordering() {
        assert_eq!(compare("v2.0.0", "1.9.9"), Ordering::Greater);
        assert_eq!(compare("V2.0.0", "v2.0.1"), Ordering::Less);
    }

    #[test]
    fn test_numeric_not_lexicographic() {
        assert_eq!(compare("1.10.0", "1.9.0"), Ordering::Greater);
        assert_eq!(compare("0.9", "0.100"), Ordering::Less);
    }

    #[test]
    fn test_antisymmetry() {
        let cases = [("1.0.0", "1.0.1"), ("2.3", "2.3.0"), ("v3.1", "3.0.9")];
        for (a, b) in cases {
            assert_eq!(compare(a, b), compare(b, a).reverse());
        }
    }

    #[test]
    fn test_malformed_components_compare_as_zero() {
        assert_eq!(compare("1.x.0", "1.0.0"), Ordering::Equal);
        assert_eq!(compare("1.beta", "1.1"), Ordering::Less);
    }

    #[test]
    fn test_is_newer() {
        assert!(is_newer("v1.1.0", "1.0.0"));
        assert!(!is_newer("1.0.0", "1.0.0"));
        assert!(!is_newer("0.9.9", "1.0.0"));
    }
}
