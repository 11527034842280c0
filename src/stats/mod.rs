//! Aggregation engine for story reports.
//!
//! Pure functions over already-fetched story lists; no network, no
//! persistence. Grouping preserves first-seen order, which the rendered
//! reports rely on, so the accumulators are an explicit insertion-ordered
//! map rather than a hash map.

use crate::api::UserStory;

/// Pseudo-group for stories with no sprint assignment.
pub const BACKLOG: &str = "Backlog";

/// Pseudo-user for stories with no assignee.
pub const UNASSIGNED: &str = "Unassigned";

/// Key/value association that preserves insertion order.
///
/// Lookups are linear scans; the maps here hold a handful of sprints or
/// users, never more.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Fetch the value for `key`, inserting `default()` at the end on a miss.
    pub fn get_or_insert_with(&mut self, key: &str, default: impl FnOnce() -> V) -> &mut V {
        let idx = match self.entries.iter().position(|(k, _)| k == key) {
            Some(idx) => idx,
            None => {
                self.entries.push((key.to_string(), default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

/// Per-assignee accumulator within a sprint report.
#[derive(Debug, Clone, PartialEq)]
pub struct UserStat {
    /// Display name of the assignee.
    pub full_name: String,
    /// Number of stories.
    pub stories: usize,
    /// Sum of story points.
    pub points: f64,
    /// Stories still open.
    pub open: usize,
    /// Stories closed.
    pub closed: usize,
}

impl UserStat {
    fn new(full_name: &str) -> Self {
        Self {
            full_name: full_name.to_string(),
            stories: 0,
            points: 0.0,
            open: 0,
            closed: 0,
        }
    }

    /// Closed ratio as a percentage, zero for an empty accumulator.
    pub fn progress_pct(&self) -> f64 {
        progress_pct(self.closed, self.stories)
    }
}

/// Sprint-level report: overall counters plus the per-assignee breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct SprintUserStats {
    /// All stories in the sprint.
    pub total: usize,
    /// Stories still open.
    pub open: usize,
    /// Stories closed.
    pub closed: usize,
    /// Closed ratio as a percentage.
    pub progress_pct: f64,
    /// Per-assignee accumulators, keyed by username in first-seen order.
    pub per_user: OrderedMap<UserStat>,
}

/// Summary of one sprint group in the project-wide statistics report.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    /// Points across the whole group.
    pub total_points: f64,
    /// Points on stories that are still open.
    pub open_points: f64,
    /// Stories still open.
    pub open: usize,
    /// Stories closed.
    pub closed: usize,
    /// Closed ratio as a percentage.
    pub progress_pct: f64,
}

/// Closed-over-total as a percentage, `0` for an empty input.
pub fn progress_pct(closed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        closed as f64 / total as f64 * 100.0
    }
}

/// Aggregate a sprint's stories into per-user statistics.
///
/// The sprint-level counters always cover the full input. The per-user
/// map covers every assignee when `all_users` is set, otherwise only
/// `user`; the rest of the fetched stories are excluded from the map,
/// not from the counters. Unassigned stories group under
/// [`UNASSIGNED`].
pub fn aggregate_sprint_user_stats(
    stories: &[UserStory],
    user: &str,
    all_users: bool,
) -> SprintUserStats {
    let total = stories.len();
    let closed = stories.iter().filter(|s| s.is_closed).count();
    let open = total - closed;

    let mut per_user = OrderedMap::new();
    for story in stories {
        let (username, full_name) = match &story.assigned_to_extra_info {
            Some(info) => (
                info.username.as_str(),
                info.full_name_display
                    .as_deref()
                    .unwrap_or(info.username.as_str()),
            ),
            None => (UNASSIGNED, UNASSIGNED),
        };
        if !all_users && username != user {
            continue;
        }

        let stat = per_user.get_or_insert_with(username, || UserStat::new(full_name));
        stat.stories += 1;
        stat.points += story.points();
        if story.is_closed {
            stat.closed += 1;
        } else {
            stat.open += 1;
        }
    }

    SprintUserStats {
        total,
        open,
        closed,
        progress_pct: progress_pct(closed, total),
        per_user,
    }
}

/// Group stories by sprint name, in order of first occurrence.
///
/// Stories without a sprint fall into the [`BACKLOG`] group.
pub fn group_by_sprint(stories: &[UserStory]) -> OrderedMap<Vec<&UserStory>> {
    let mut groups = OrderedMap::new();
    for story in stories {
        let name = story.milestone_name.as_deref().unwrap_or(BACKLOG);
        groups.get_or_insert_with(name, Vec::new).push(story);
    }
    groups
}

/// Summarise one sprint group of the statistics report.
pub fn summarize_group(stories: &[&UserStory]) -> GroupSummary {
    let total_points = stories.iter().map(|s| s.points()).sum();
    let open_points = stories
        .iter()
        .filter(|s| !s.is_closed)
        .map(|s| s.points())
        .sum();
    let closed = stories.iter().filter(|s| s.is_closed).count();
    let open = stories.len() - closed;

    GroupSummary {
        total_points,
        open_points,
        open,
        closed,
        progress_pct: progress_pct(closed, stories.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AssignedInfo;

    fn story(
        subject: &str,
        closed: bool,
        points: Option<f64>,
        assignee: Option<&str>,
        sprint: Option<&str>,
    ) -> UserStory {
        UserStory {
            subject: subject.to_string(),
            is_closed: closed,
            total_points: points,
            assigned_to_extra_info: assignee.map(|u| AssignedInfo {
                username: u.to_string(),
                full_name_display: Some(format!("{u} full")),
            }),
            milestone_name: sprint.map(String::from),
        }
    }

    #[test]
    fn test_progress_pct_guards_empty_input() {
        assert_eq!(progress_pct(0, 0), 0.0);
        assert_eq!(progress_pct(1, 2), 50.0);
        assert_eq!(progress_pct(3, 3), 100.0);
    }

    #[test]
    fn test_aggregate_all_users_scenario() {
        let stories = vec![
            story("A", false, Some(3.0), Some("alice"), None),
            story("B", true, Some(5.0), None, None),
        ];

        let stats = aggregate_sprint_user_stats(&stories, "alice", true);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.open, 1);
        assert_eq!(stats.closed, 1);
        assert_eq!(stats.progress_pct, 50.0);

        // Key order is first-seen, not alphabetical.
        let keys: Vec<&str> = stats.per_user.keys().collect();
        assert_eq!(keys, vec!["alice", UNASSIGNED]);

        let alice = stats.per_user.get("alice").unwrap();
        assert_eq!(alice.stories, 1);
        assert_eq!(alice.points, 3.0);
        assert_eq!(alice.open, 1);
        assert_eq!(alice.closed, 0);

        let unassigned = stats.per_user.get(UNASSIGNED).unwrap();
        assert_eq!(unassigned.stories, 1);
        assert_eq!(unassigned.points, 5.0);
        assert_eq!(unassigned.open, 0);
        assert_eq!(unassigned.closed, 1);
        assert_eq!(unassigned.full_name, UNASSIGNED);
    }

    #[test]
    fn test_aggregate_single_user_keeps_sprint_totals() {
        let stories = vec![
            story("A", false, Some(3.0), Some("alice"), None),
            story("B", true, Some(5.0), Some("bob"), None),
            story("C", true, None, None, None),
        ];

        let stats = aggregate_sprint_user_stats(&stories, "alice", false);

        // Counters span the whole sprint; the map holds only alice.
        assert_eq!(stats.total, 3);
        assert_eq!(stats.closed, 2);
        assert!((stats.progress_pct - 66.66666666666667).abs() < 1e-9);
        let keys: Vec<&str> = stats.per_user.keys().collect();
        assert_eq!(keys, vec!["alice"]);
    }

    #[test]
    fn test_aggregate_missing_points_count_as_zero() {
        let stories = vec![story("A", false, None, Some("alice"), None)];
        let stats = aggregate_sprint_user_stats(&stories, "alice", true);
        assert_eq!(stats.per_user.get("alice").unwrap().points, 0.0);
    }

    #[test]
    fn test_aggregate_empty_input() {
        let stats = aggregate_sprint_user_stats(&[], "alice", true);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.progress_pct, 0.0);
        assert!(stats.per_user.is_empty());
    }

    #[test]
    fn test_group_order_is_first_occurrence() {
        let stories = vec![
            story("A", false, None, None, Some("X")),
            story("B", false, None, None, Some("Y")),
            story("C", false, None, None, Some("X")),
        ];

        let groups = group_by_sprint(&stories);
        let keys: Vec<&str> = groups.keys().collect();
        assert_eq!(keys, vec!["X", "Y"]);
        assert_eq!(groups.get("X").unwrap().len(), 2);
        assert_eq!(groups.get("Y").unwrap().len(), 1);
    }

    #[test]
    fn test_group_missing_sprint_is_backlog() {
        let stories = vec![
            story("A", false, None, None, None),
            story("B", false, None, None, Some("X")),
        ];

        let groups = group_by_sprint(&stories);
        let keys: Vec<&str> = groups.keys().collect();
        assert_eq!(keys, vec![BACKLOG, "X"]);
    }

    #[test]
    fn test_summarize_group_points_split() {
        let stories = vec![
            story("A", false, Some(3.0), None, None),
            story("B", true, Some(5.0), None, None),
            story("C", false, None, None, None),
        ];
        let refs: Vec<&UserStory> = stories.iter().collect();

        let summary = summarize_group(&refs);
        assert_eq!(summary.total_points, 8.0);
        assert_eq!(summary.open_points, 3.0);
        assert_eq!(summary.open, 2);
        assert_eq!(summary.closed, 1);
        assert!((summary.progress_pct - 33.333333333333336).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_empty_group() {
        let summary = summarize_group(&[]);
        assert_eq!(summary.progress_pct, 0.0);
        assert_eq!(summary.total_points, 0.0);
    }

    #[test]
    fn test_user_stat_progress() {
        let stories = vec![
            story("A", true, None, Some("alice"), None),
            story("B", false, None, Some("alice"), None),
        ];
        let stats = aggregate_sprint_user_stats(&stories, "alice", false);
        let alice = stats.per_user.get("alice").unwrap();
        assert_eq!(alice.progress_pct(), 50.0);
    }

    #[test]
    fn test_ordered_map_insertion_semantics() {
        let mut map: OrderedMap<u32> = OrderedMap::new();
        assert!(map.is_empty());

        *map.get_or_insert_with("b", || 1) += 1;
        *map.get_or_insert_with("a", || 10) += 1;
        *map.get_or_insert_with("b", || 99) += 1;

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("b"), Some(&3));
        assert_eq!(map.get("a"), Some(&11));
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
