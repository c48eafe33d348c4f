#[cfg(test)]
mod tests {
    use stagewatch_models::{RevisionStatus, RolloutStatus};

    use crate::status::condition::{Condition, Truth};
    use crate::status::observed::RevisionSnapshot;
    use crate::status::revision::{RevisionState, classify_revision, fold_rollout};
    use crate::status::rollout::RolloutState;

    fn revision(observed_generation: i64, conditions: Vec<Condition>) -> RevisionSnapshot {
        RevisionSnapshot {
            name: "myapp-00001".into(),
            observed_generation,
            revision_number: Ok(1),
            workload_name: "myapp".into(),
            conditions,
            containers: vec![],
        }
    }

    fn state(status: RevisionStatus, reason: &str) -> RevisionState {
        RevisionState {
            status,
            reason: reason.into(),
        }
    }

    #[test]
    fn classify_revision_table() {
        let cases = vec![
            (
                "status is not observed",
                revision(0, vec![Condition::new("Ready", Truth::True)]),
                state(RevisionStatus::Waiting, "Deploying"),
            ),
            (
                "deployment has timed out",
                revision(
                    1,
                    vec![
                        Condition::new("Active", Truth::False)
                            .with_reason("TimedOut")
                            .with_message("Timed out message."),
                    ],
                ),
                state(
                    RevisionStatus::Unhealthy,
                    "Timed out message. This is usually due to a failing health check",
                ),
            ),
            (
                "ready state is unknown and deploying",
                revision(
                    1,
                    vec![
                        Condition::new("Active", Truth::True),
                        Condition::new("Ready", Truth::Unknown).with_reason("Deploying"),
                    ],
                ),
                state(RevisionStatus::Waiting, "Deploying"),
            ),
            (
                "ready state is unknown and resolving digests",
                revision(
                    1,
                    vec![
                        Condition::new("Active", Truth::True),
                        Condition::new("Ready", Truth::Unknown)
                            .with_reason("ResolvingDigests"),
                    ],
                ),
                state(RevisionStatus::Waiting, "Deploying"),
            ),
            (
                "ready state is unknown",
                revision(
                    1,
                    vec![Condition::new("Ready", Truth::Unknown).with_message("msg")],
                ),
                state(RevisionStatus::Unknown, "msg"),
            ),
            (
                "container is not healthy",
                revision(
                    1,
                    vec![
                        Condition::new("ContainerHealthy", Truth::False)
                            .with_message("Failed to resolve image to digest..."),
                    ],
                ),
                state(
                    RevisionStatus::Unhealthy,
                    "Failed to resolve image to digest...",
                ),
            ),
            (
                "ready is true",
                revision(1, vec![Condition::new("Ready", Truth::True)]),
                state(RevisionStatus::Ready, ""),
            ),
            (
                "ready is false",
                revision(
                    1,
                    vec![Condition::new("Ready", Truth::False).with_message("msg")],
                ),
                state(RevisionStatus::Unhealthy, "msg"),
            ),
            (
                "no ready condition",
                revision(1, vec![Condition::new("Active", Truth::True)]),
                state(RevisionStatus::Unknown, ""),
            ),
            (
                "no conditions at all",
                revision(1, vec![]),
                state(RevisionStatus::Unknown, ""),
            ),
        ];

        for (name, rev, expected) in cases {
            assert_eq!(classify_revision(&rev), expected, "when {}", name);
        }
    }

    #[test]
    fn ready_with_unrelated_conditions_is_ready() {
        let rev = revision(
            3,
            vec![
                Condition::new("Active", Truth::True),
                Condition::new("ConfigurationsReady", Truth::Unknown).with_reason("Odd"),
                Condition::new("SomethingNew", Truth::False).with_message("ignored"),
                Condition::new("Ready", Truth::True),
                Condition::new("ContainerHealthy", Truth::True),
                Condition::new("Active", Truth::Unknown).with_reason("NoTraffic"),
            ],
        );
        assert_eq!(classify_revision(&rev).status, RevisionStatus::Ready);
    }

    #[test]
    fn unhealthy_container_wins_even_when_reported_after_ready() {
        let rev = revision(
            1,
            vec![
                Condition::new("Ready", Truth::True),
                Condition::new("ContainerHealthy", Truth::False).with_message("bad"),
            ],
        );
        assert_eq!(
            classify_revision(&rev),
            state(RevisionStatus::Unhealthy, "bad")
        );
    }

    #[test]
    fn active_false_without_timeout_falls_through_to_ready() {
        let rev = revision(
            1,
            vec![
                Condition::new("Active", Truth::False).with_reason("NoTraffic"),
                Condition::new("Ready", Truth::True),
            ],
        );
        assert_eq!(classify_revision(&rev).status, RevisionStatus::Ready);
    }

    fn rollout(status: RolloutStatus, reason: &str) -> RolloutState {
        RolloutState {
            status,
            reason: reason.into(),
        }
    }

    #[test]
    fn fold_in_progress_rollout_makes_ready_revision_wait() {
        let out = fold_rollout(
            state(RevisionStatus::Ready, ""),
            &rollout(RolloutStatus::InProgress, "1/2 new replicas have been updated"),
        );
        assert_eq!(
            out,
            state(RevisionStatus::Waiting, "1/2 new replicas have been updated")
        );
    }

    #[test]
    fn fold_failed_rollout_makes_unknown_revision_unhealthy() {
        let out = fold_rollout(
            state(RevisionStatus::Unknown, "msg"),
            &rollout(RolloutStatus::Failed, "Deployment timed out"),
        );
        assert_eq!(out, state(RevisionStatus::Unhealthy, "Deployment timed out"));
    }

    #[test]
    fn fold_keeps_revision_status_for_complete_rollout() {
        let ready = state(RevisionStatus::Ready, "");
        assert_eq!(
            fold_rollout(
                ready.clone(),
                &rollout(RolloutStatus::Complete, "Successfully rolled out")
            ),
            ready
        );
    }

    #[test]
    fn fold_never_overrides_disqualified_revision() {
        let unhealthy = state(RevisionStatus::Unhealthy, "crash");
        let waiting = state(RevisionStatus::Waiting, "Deploying");
        let failed = rollout(RolloutStatus::Failed, "Deployment timed out");
        assert_eq!(fold_rollout(unhealthy.clone(), &failed), unhealthy);
        assert_eq!(fold_rollout(waiting.clone(), &failed), waiting);
    }
}
