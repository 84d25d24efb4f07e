use crate::types::problem::Problem;
use std::collections::HashMap;

/// Keeps the most recent version of each problem across the processed
/// commits.
///
/// Freshness is the parsed submission timestamp. A version without one is
/// treated as older than any dated version and never displaces a stored
/// record; equal timestamps keep the record stored first.
#[derive(Debug, Default)]
pub struct Reconciler {
    latest: HashMap<String, Problem>,
    order: Vec<String>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, problem: Problem) {
        match self.latest.get(&problem.name) {
            Some(existing) => {
                if is_newer(&problem, existing) {
                    tracing::info!(
                        "{} was resubmitted, keeping the version from commit {}",
                        problem.name,
                        problem.commit_sha
                    );
                    self.latest.insert(problem.name.clone(), problem);
                } else {
                    tracing::debug!(
                        "discarding stale version of {} from commit {}",
                        problem.name,
                        problem.commit_sha
                    );
                }
            }
            None => {
                self.order.push(problem.name.clone());
                self.latest.insert(problem.name.clone(), problem);
            }
        }
    }

    /// Returns the surviving problems in first-seen order.
    pub fn into_problems(self) -> Vec<Problem> {
        let Reconciler { mut latest, order } = self;
        order
            .iter()
            .filter_map(|name| latest.remove(name))
            .collect()
    }
}

fn is_newer(candidate: &Problem, existing: &Problem) -> bool {
    match (candidate.submitted_at, existing.submitted_at) {
        (Some(candidate), Some(existing)) => candidate > existing,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn problem(name: &str, submitted_at: Option<(i32, u32, u32)>, commit_sha: &str) -> Problem {
        Problem {
            name: String::from(name),
            description: String::from("# description"),
            code_blocks: Vec::new(),
            difficulty: String::from("Easy"),
            site: String::from("siteA"),
            problem_url: None,
            submitted_at: submitted_at
                .map(|(y, m, d)| Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()),
            commit_sha: String::from(commit_sha),
            commit_url: format!("https://github.com/o/r/commit/{}", commit_sha),
        }
    }

    #[test]
    fn the_latest_submission_wins_in_either_order() {
        let january = problem("two-sum", Some((2024, 1, 1)), "aaa");
        let february = problem("two-sum", Some((2024, 2, 1)), "bbb");

        let mut reconciler = Reconciler::new();
        reconciler.observe(january.clone());
        reconciler.observe(february.clone());
        let kept = reconciler.into_problems();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].commit_sha, "bbb");

        let mut reconciler = Reconciler::new();
        reconciler.observe(february);
        reconciler.observe(january);
        let kept = reconciler.into_problems();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].commit_sha, "bbb");
    }

    #[test]
    fn equal_timestamps_keep_the_first_stored_version() {
        let mut reconciler = Reconciler::new();
        reconciler.observe(problem("two-sum", Some((2024, 1, 1)), "aaa"));
        reconciler.observe(problem("two-sum", Some((2024, 1, 1)), "bbb"));

        let kept = reconciler.into_problems();
        assert_eq!(kept[0].commit_sha, "aaa");
    }

    #[test]
    fn an_undated_version_never_displaces_a_dated_one() {
        let mut reconciler = Reconciler::new();
        reconciler.observe(problem("two-sum", Some((2024, 1, 1)), "aaa"));
        reconciler.observe(problem("two-sum", None, "bbb"));

        let kept = reconciler.into_problems();
        assert_eq!(kept[0].commit_sha, "aaa");
    }

    #[test]
    fn a_dated_version_displaces_an_undated_one() {
        let mut reconciler = Reconciler::new();
        reconciler.observe(problem("two-sum", None, "aaa"));
        reconciler.observe(problem("two-sum", Some((2024, 1, 1)), "bbb"));

        let kept = reconciler.into_problems();
        assert_eq!(kept[0].commit_sha, "bbb");
    }

    #[test]
    fn distinct_problems_keep_their_first_seen_order() {
        let mut reconciler = Reconciler::new();
        reconciler.observe(problem("two-sum", Some((2024, 1, 1)), "aaa"));
        reconciler.observe(problem("three-sum", Some((2024, 1, 2)), "bbb"));
        reconciler.observe(problem("four-sum", None, "ccc"));

        let names: Vec<String> = reconciler
            .into_problems()
            .into_iter()
            .map(|problem| problem.name)
            .collect();
        assert_eq!(names, vec!["two-sum", "three-sum", "four-sum"]);
    }
}
