//! PR size gate: skip / warn / proceed based on change volume.
//!
//! Ceilings and thresholds are fixed product constants, not tenant policy.
//! Checks run in priority order — file count, then added lines, then total
//! changed lines — and the first exceeded ceiling wins.

/// Hard ceilings: the review is skipped entirely.
pub const MAX_FILES: u64 = 25;
pub const MAX_ADDITIONS: u64 = 800;
pub const MAX_TOTAL_CHANGES: u64 = 1200;

/// Warning thresholds: the review still runs, with a banner.
pub const WARN_FILES: u64 = 20;
pub const WARN_ADDITIONS: u64 = 400;

/// Outcome of the size gate for one PR. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeCheck {
    /// Within bounds; review proceeds unannotated.
    Proceed,
    /// Over a warning threshold; the banner is prepended to the eventual
    /// review summary, never posted on its own.
    Warn(String),
    /// Over a hard ceiling; the explanation is posted as a plain comment and
    /// the review is never invoked.
    Skip(String),
}

/// Classifies a PR by its aggregate counts.
pub fn check_pr_size(changed_files: u64, additions: u64, deletions: u64) -> SizeCheck {
    let total_changes = additions + deletions;

    if changed_files > MAX_FILES {
        return SizeCheck::Skip(format!(
            "## 🌬️ Gale Notice\n\n\
             **PR Too Large for Automated Review**\n\n\
             This PR modifies **{changed_files} files**, which exceeds our limit of \
             {MAX_FILES} files for automated review.\n\n\
             Smaller, focused PRs are easier to review thoroughly and merge faster — \
             consider splitting this into logical chunks.\n\n\
             *Happy to review once split into smaller pieces!* 🌬️"
        ));
    }

    if additions > MAX_ADDITIONS {
        return SizeCheck::Skip(format!(
            "## 🌬️ Gale Notice\n\n\
             **PR Too Large for Automated Review**\n\n\
             This PR adds **{additions} lines**, which exceeds our limit of \
             {MAX_ADDITIONS} added lines for automated review.\n\n\
             Aim for PRs under {WARN_ADDITIONS} added lines; split features into \
             reviewable chunks or put large ones behind a flag.\n\n\
             *Ready to provide detailed feedback on smaller PRs!* 🌬️"
        ));
    }

    if total_changes > MAX_TOTAL_CHANGES {
        return SizeCheck::Skip(format!(
            "## 🌬️ Gale Notice\n\n\
             **PR Too Large for Automated Review**\n\n\
             This PR has **{total_changes} total changes** (+{additions}, -{deletions}), \
             exceeding our limit of {MAX_TOTAL_CHANGES} changes.\n\n\
             **Recommendation**: break this into smaller, focused PRs — each PR should \
             tell one story. 🌬️"
        ));
    }

    let mut warnings = Vec::new();
    if changed_files > WARN_FILES {
        warnings.push(format!(
            "📁 **{changed_files} files changed** (consider < {WARN_FILES})"
        ));
    }
    if additions > WARN_ADDITIONS {
        warnings.push(format!(
            "📈 **{additions} lines added** (consider < {WARN_ADDITIONS})"
        ));
    }

    if warnings.is_empty() {
        SizeCheck::Proceed
    } else {
        SizeCheck::Warn(format!(
            "**⚠️ Large PR Warning:**\n{}\n\n\
             *Smaller PRs are easier to review thoroughly and merge faster.*\n\n---\n",
            warnings.join("\n")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_pr_proceeds_silently() {
        assert_eq!(check_pr_size(3, 50, 10), SizeCheck::Proceed);
    }

    #[test]
    fn file_ceiling_takes_priority_over_additions() {
        // Both ceilings exceeded: the file-count violation must be reported
        // because it is first in priority order.
        match check_pr_size(30, 900, 0) {
            SizeCheck::Skip(msg) => {
                assert!(msg.contains("30 files"));
                assert!(msg.contains("25"));
                assert!(!msg.contains("900"));
            }
            other => panic!("expected Skip, got {other:?}"),
        }
    }

    #[test]
    fn additions_ceiling_skips() {
        match check_pr_size(5, 900, 0) {
            SizeCheck::Skip(msg) => {
                assert!(msg.contains("900 lines"));
                assert!(msg.contains("800"));
            }
            other => panic!("expected Skip, got {other:?}"),
        }
    }

    #[test]
    fn total_changes_ceiling_counts_deletions() {
        // Additions alone are under the limit; additions + deletions are not.
        match check_pr_size(5, 700, 600) {
            SizeCheck::Skip(msg) => {
                assert!(msg.contains("1300 total changes"));
                assert!(msg.contains("1200"));
            }
            other => panic!("expected Skip, got {other:?}"),
        }
    }

    #[test]
    fn warning_thresholds_still_review() {
        match check_pr_size(22, 450, 0) {
            SizeCheck::Warn(banner) => {
                assert!(banner.contains("22 files changed"));
                assert!(banner.contains("450 lines added"));
            }
            other => panic!("expected Warn, got {other:?}"),
        }
    }

    #[test]
    fn boundary_values_are_inclusive() {
        // Exactly at the ceiling is still allowed; one past it is not.
        assert!(matches!(
            check_pr_size(MAX_FILES, WARN_ADDITIONS, 0),
            SizeCheck::Proceed | SizeCheck::Warn(_)
        ));
        assert!(matches!(
            check_pr_size(MAX_FILES + 1, 0, 0),
            SizeCheck::Skip(_)
        ));
    }
}
