use std::collections::HashMap;

use stagewatch_models::Problem;

use super::observed::PodSnapshot;
use super::probes::ProblemProbe;

/// Problems keyed by their literal message, with occurrence counts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProblemSet {
    counts: HashMap<String, u32>,
}

impl ProblemSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, message: impl Into<String>) {
        *self.counts.entry(message.into()).or_insert(0) += 1;
    }

    /// Add every count of `other` into this set.
    pub fn merge(&mut self, other: ProblemSet) {
        for (message, count) in other.counts {
            *self.counts.entry(message).or_insert(0) += count;
        }
    }

    pub fn count(&self, message: &str) -> u32 {
        self.counts.get(message).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Problems in unspecified order.
    pub fn items(&self) -> Vec<Problem> {
        self.counts
            .iter()
            .map(|(message, count)| Problem {
                message: message.clone(),
                count: *count,
            })
            .collect()
    }

    /// Problems ordered by message, so identical input yields an identical payload.
    pub fn into_sorted_vec(self) -> Vec<Problem> {
        let mut out: Vec<Problem> = self
            .counts
            .into_iter()
            .map(|(message, count)| Problem { message, count })
            .collect();
        out.sort_by(|a, b| a.message.cmp(&b.message));
        out
    }
}

/// Run every probe against every pod and count the resulting messages.
pub fn aggregate(
    pods: &[PodSnapshot],
    probes: &[Box<dyn ProblemProbe>],
) -> ProblemSet {
    let mut set = ProblemSet::new();
    for pod in pods {
        for probe in probes {
            if let Some(problem) = probe.get_problem(pod) {
                set.add(problem.message);
            }
        }
    }
    set
}
