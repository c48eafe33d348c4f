#![allow(dead_code)]

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Pod;
use kube::core::DynamicObject;
use serde_json::{Value, json};

pub fn revision(name: &str, image: &str, number: i64, ready: &str) -> DynamicObject {
    serde_json::from_value(json!({
        "apiVersion": "serving.knative.dev/v1",
        "kind": "Revision",
        "metadata": {
            "name": name,
            "namespace": "apps",
            "labels": {
                "stagewatch.dev/app": "myapp",
                "stagewatch.dev/deployment": "myapp",
                "serving.knative.dev/configuration": "myapp"
            },
            "annotations": {"stagewatch.dev/revision": number.to_string()}
        },
        "spec": {"containers": [{"name": "myapp", "image": image}]},
        "status": {
            "observedGeneration": 1,
            "conditions": [{"type": "Ready", "status": ready}]
        }
    }))
    .unwrap()
}

pub fn route(traffic: Value) -> DynamicObject {
    serde_json::from_value(json!({
        "apiVersion": "serving.knative.dev/v1",
        "kind": "Route",
        "metadata": {"name": "myapp", "namespace": "apps"},
        "status": {"traffic": traffic}
    }))
    .unwrap()
}

pub fn deployment(
    name: &str,
    generation: i64,
    observed_generation: i64,
    replicas: i32,
    available: i32,
) -> Deployment {
    serde_json::from_value(json!({
        "metadata": {"name": name, "namespace": "apps", "generation": generation},
        "spec": {
            "replicas": replicas,
            "selector": {},
            "template": {"spec": {"containers": [{"name": name, "image": "my/image:0.0.2"}]}}
        },
        "status": {
            "observedGeneration": observed_generation,
            "replicas": replicas,
            "updatedReplicas": replicas,
            "availableReplicas": available
        }
    }))
    .unwrap()
}

pub fn crashing_pod(name: &str) -> Pod {
    serde_json::from_value(json!({
        "metadata": {"name": name},
        "status": {
            "phase": "Running",
            "containerStatuses": [{
                "name": "myapp", "ready": false, "restartCount": 5,
                "image": "my/image:0.0.2", "imageID": "",
                "state": {"waiting": {"reason": "CrashLoopBackOff", "message": "back-off restarting"}}
            }]
        }
    }))
    .unwrap()
}
