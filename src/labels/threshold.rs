use std::collections::BTreeSet;

/// A label is hidden when its share is below `min_percent`, unless the
/// category is listed in `always_show`.
pub fn is_suppressed(
    percent: f64,
    name: &str,
    always_show: &BTreeSet<String>,
    min_percent: f64,
) -> bool {
    percent < min_percent && !always_show.contains(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_shares_are_hidden() {
        let always = BTreeSet::new();
        assert!(is_suppressed(2.0, "completed", &always, 3.0));
        assert!(is_suppressed(2.999, "completed", &always, 3.0));
        assert!(!is_suppressed(3.0, "completed", &always, 3.0));
        assert!(!is_suppressed(5.0, "completed", &always, 3.0));
    }

    #[test]
    fn always_show_names_bypass_the_threshold() {
        let always: BTreeSet<String> = ["failed".to_string()].into_iter().collect();
        assert!(!is_suppressed(0.5, "failed", &always, 3.0));
        assert!(is_suppressed(0.5, "Failed", &always, 3.0));
    }

    #[test]
    fn nan_share_is_never_below_threshold() {
        assert!(!is_suppressed(f64::NAN, "queued", &BTreeSet::new(), 3.0));
    }
}
