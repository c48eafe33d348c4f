//! Typed access to the labels and annotations stagewatch relies on.

use std::collections::BTreeMap;
use std::num::ParseIntError;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use thiserror::Error;

/// Present on every object that belongs to a managed app.
pub const APP_LABEL: &str = "stagewatch.dev/app";
/// Name of the deployment (app) an object belongs to.
pub const DEPLOYMENT_LABEL: &str = "stagewatch.dev/deployment";
/// Platform revision number stamped on configurations and revisions.
pub const REVISION_ANNOTATION: &str = "stagewatch.dev/revision";
/// Rollout revision maintained by the Deployment controller.
pub const ROLLOUT_REVISION_ANNOTATION: &str = "deployment.kubernetes.io/revision";

pub const KNATIVE_REVISION_LABEL: &str = "serving.knative.dev/revision";
pub const KNATIVE_CONFIGURATION_LABEL: &str = "serving.knative.dev/configuration";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkerError {
    #[error("annotation {key} is missing")]
    Missing { key: &'static str },
    #[error("annotation {key} has invalid value {value:?}")]
    Invalid {
        key: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Whether an object carries the ownership label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OwnershipMarker {
    pub present: bool,
}

impl OwnershipMarker {
    pub fn from_meta(meta: &ObjectMeta) -> Self {
        Self {
            present: meta
                .labels
                .as_ref()
                .is_some_and(|l| l.contains_key(APP_LABEL)),
        }
    }
}

/// Platform revision number read from [`REVISION_ANNOTATION`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevisionNumber(pub i64);

impl RevisionNumber {
    pub fn from_annotations(
        annotations: Option<&BTreeMap<String, String>>,
    ) -> Result<Self, MarkerError> {
        let raw = annotations
            .and_then(|a| a.get(REVISION_ANNOTATION))
            .ok_or(MarkerError::Missing {
                key: REVISION_ANNOTATION,
            })?;
        raw.trim()
            .parse::<i64>()
            .map(RevisionNumber)
            .map_err(|source| MarkerError::Invalid {
                key: REVISION_ANNOTATION,
                value: raw.clone(),
                source,
            })
    }

    pub fn from_meta(meta: &ObjectMeta) -> Result<i64, MarkerError> {
        Self::from_annotations(meta.annotations.as_ref()).map(|n| n.0)
    }
}

/// Rollout revision of a Deployment; 0 when absent or unparsable.
pub fn rollout_revision(meta: &ObjectMeta) -> i64 {
    meta.annotations
        .as_ref()
        .and_then(|a| a.get(ROLLOUT_REVISION_ANNOTATION))
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

fn label<'a>(meta: &'a ObjectMeta, key: &str) -> Option<&'a str> {
    meta.labels
        .as_ref()
        .and_then(|l| l.get(key))
        .map(String::as_str)
}

/// Owning deployment name, empty when the label is absent.
pub fn deployment_name(meta: &ObjectMeta) -> &str {
    label(meta, DEPLOYMENT_LABEL).unwrap_or("")
}

pub fn configuration_name(meta: &ObjectMeta) -> Option<&str> {
    label(meta, KNATIVE_CONFIGURATION_LABEL)
}

/// Label selector matching every object of one deployment.
pub fn deployment_selector(name: &str) -> String {
    format!("{}={}", DEPLOYMENT_LABEL, name)
}

/// Label selector for the Deployment backing a Knative revision.
pub fn revision_selector(revision: &str) -> String {
    format!("{}={}", KNATIVE_REVISION_LABEL, revision)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(labels: &[(&str, &str)], annotations: &[(&str, &str)]) -> ObjectMeta {
        let to_map = |pairs: &[(&str, &str)]| {
            (!pairs.is_empty()).then(|| {
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect::<BTreeMap<_, _>>()
            })
        };
        ObjectMeta {
            labels: to_map(labels),
            annotations: to_map(annotations),
            ..Default::default()
        }
    }

    #[test]
    fn ownership_marker_requires_app_label() {
        assert!(OwnershipMarker::from_meta(&meta(&[(APP_LABEL, "x")], &[])).present);
        assert!(!OwnershipMarker::from_meta(&meta(&[("app", "x")], &[])).present);
        assert!(!OwnershipMarker::from_meta(&ObjectMeta::default()).present);
    }

    #[test]
    fn revision_number_parses_annotation() {
        let m = meta(&[], &[(REVISION_ANNOTATION, "42")]);
        assert_eq!(RevisionNumber::from_meta(&m), Ok(42));
        let zero = meta(&[], &[(REVISION_ANNOTATION, "0")]);
        assert_eq!(RevisionNumber::from_meta(&zero), Ok(0));
    }

    #[test]
    fn revision_number_missing_is_explicit() {
        assert_eq!(
            RevisionNumber::from_meta(&ObjectMeta::default()),
            Err(MarkerError::Missing {
                key: REVISION_ANNOTATION
            })
        );
    }

    #[test]
    fn revision_number_invalid_keeps_value() {
        let m = meta(&[], &[(REVISION_ANNOTATION, "abc")]);
        match RevisionNumber::from_meta(&m) {
            Err(MarkerError::Invalid { value, .. }) => assert_eq!(value, "abc"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rollout_revision_defaults_to_zero() {
        assert_eq!(rollout_revision(&ObjectMeta::default()), 0);
        let bad = meta(&[], &[(ROLLOUT_REVISION_ANNOTATION, "x")]);
        assert_eq!(rollout_revision(&bad), 0);
        let good = meta(&[], &[(ROLLOUT_REVISION_ANNOTATION, "7")]);
        assert_eq!(rollout_revision(&good), 7);
    }

    #[test]
    fn selectors_use_label_keys() {
        assert_eq!(deployment_selector("myapp"), "stagewatch.dev/deployment=myapp");
        assert_eq!(
            revision_selector("myapp-00001"),
            "serving.knative.dev/revision=myapp-00001"
        );
        assert_eq!(deployment_name(&meta(&[(DEPLOYMENT_LABEL, "myapp")], &[])), "myapp");
        assert_eq!(deployment_name(&ObjectMeta::default()), "");
    }
}
