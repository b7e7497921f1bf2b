use chrono::{DateTime, Utc};

use crate::models::{RetentionPlan, RetentionPolicy, RunDirectory};

const MS_PER_DAY: f64 = 86_400_000.0;

/// Age of a candidate in fractional days relative to `now`
///
/// Directories with a modification time in the future have a negative age.
pub fn age_in_days(modified: &DateTime<Utc>, now: &DateTime<Utc>) -> f64 {
    now.signed_duration_since(*modified).num_milliseconds() as f64 / MS_PER_DAY
}

/// Partition candidates into keep and remove sets
///
/// Candidates are sorted newest first (name breaks ties so the result does not
/// depend on listing order). An entry is kept when it is promoted, or when its
/// rank is below `keep_count` and its age is at most `keep_days`. Rank counts
/// every candidate, kept or not.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
///
/// use chrono::{Duration, Utc};
/// use workbench_ops::models::{RetentionPolicy, RunDirectory};
/// use workbench_ops::plan_retention;
///
/// let now = Utc::now();
/// let run = |name: &str, days: i64| RunDirectory {
///     name: name.to_string(),
///     path: PathBuf::from(name),
///     modified: now - Duration::days(days),
///     promoted: false,
/// };
///
/// let policy = RetentionPolicy { keep_count: 1, keep_days: 30 };
/// let plan = plan_retention(vec![run("old", 3), run("new", 1)], &policy, now);
/// assert_eq!(plan.keep[0].name, "new");
/// assert_eq!(plan.remove[0].name, "old");
/// ```
pub fn plan_retention(
    mut candidates: Vec<RunDirectory>,
    policy: &RetentionPolicy,
    now: DateTime<Utc>,
) -> RetentionPlan {
    candidates.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));

    let keep_days = policy.keep_days as f64;
    let mut plan = RetentionPlan::default();

    for (rank, candidate) in candidates.into_iter().enumerate() {
        let recent = rank < policy.keep_count;
        let fresh = age_in_days(&candidate.modified, &now) <= keep_days;
        if candidate.promoted || (recent && fresh) {
            plan.keep.push(candidate);
        } else {
            plan.remove.push(candidate);
        }
    }

    plan
}
