mod common;

use chrono::Utc;
use serde_json::json;
use stagewatch_controller::snapshot::{
    pod_snapshot, revision_snapshot, route_traffic, workload_snapshot,
};
use stagewatch_controller::status::{
    KnativeObservation, RevisionObservation, aggregate, assemble_knative,
    classify_rollout, default_probes,
};
use stagewatch_models::{RevisionStatus, RolloutStatus};

fn observation() -> KnativeObservation {
    let rev0 = revision_snapshot(&common::revision("rev0", "my/image:0.0.1", 0, "True")).unwrap();
    let rev1 = revision_snapshot(&common::revision("rev1", "my/image:0.0.2", 1, "True")).unwrap();
    let traffic = route_traffic(&common::route(json!([
        {"revisionName": "rev0", "percent": 90},
        {"revisionName": "rev1", "percent": 10, "tag": "canary"}
    ])))
    .unwrap();

    KnativeObservation {
        name: "myapp".into(),
        revision_number: Ok(1),
        latest_created_revision_name: "rev1".into(),
        latest_ready_revision_name: "rev1".into(),
        revisions: vec![
            RevisionObservation {
                revision: rev0,
                workload: None,
            },
            RevisionObservation {
                revision: rev1,
                workload: Some(workload_snapshot(&common::deployment(
                    "rev1-deployment",
                    1,
                    1,
                    1,
                    1,
                ))),
            },
        ],
        traffic,
    }
}

#[test]
fn two_revision_round_trip() {
    let status = assemble_knative(&observation(), Default::default()).unwrap();

    assert_eq!(status.revisions[0].docker_image, "my/image:0.0.1");
    assert_eq!(status.revisions[0].revision_number, 0);
    assert_eq!(status.revisions[1].docker_image, "my/image:0.0.2");
    assert_eq!(status.revisions[1].revision_number, 1);
    assert_eq!(status.revisions[1].available_replicas, 1);
    assert_eq!(status.revisions[1].status, RevisionStatus::Ready);

    let traffic: Vec<_> = status
        .traffic
        .iter()
        .map(|t| (t.revision_name.as_str(), t.percent, t.tag.as_deref()))
        .collect();
    assert_eq!(
        traffic,
        vec![("rev0", Some(90), None), ("rev1", Some(10), Some("canary"))]
    );
    assert_eq!(status.rollout_status, RolloutStatus::Complete);

    let body = serde_json::to_value(&status).unwrap();
    assert_eq!(body["revisions"][0]["dockerImage"], "my/image:0.0.1");
    assert_eq!(body["revisions"][1]["availableReplicas"], 1);
    assert_eq!(body["traffic"][1]["tag"], "canary");
}

#[test]
fn stale_deployment_waits_for_details() {
    let w = workload_snapshot(&common::deployment("myapp", 2, 1, 3, 3));
    let rollout = classify_rollout(&w);
    assert_eq!(rollout.status, RolloutStatus::InProgress);
    assert_eq!(rollout.reason, "Waiting for deployment details");
}

#[test]
fn crashing_pods_are_counted_once_per_message() {
    let pods: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|n| pod_snapshot(&common::crashing_pod(n)))
        .collect();
    let problems = aggregate(&pods, &default_probes(Utc::now()));
    assert_eq!(problems.len(), 1);
    assert_eq!(problems.count("CrashLoopBackOff: back-off restarting"), 3);

    let status = assemble_knative(&observation(), problems).unwrap();
    assert_eq!(status.problems.len(), 1);
    assert_eq!(status.problems[0].count, 3);
}
