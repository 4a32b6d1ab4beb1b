// crates/policy-test-suite/tests/common/mod.rs
// ============================================================================
// Module: Suite Test Fixtures
// Description: On-disk suite layouts and a label-checking stub client.
// Purpose: Exercise discovery, verification, and reporting against real files.
// Dependencies: policy-test-core, serde_json, tempfile
// ============================================================================

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_docs_in_private_items,
    missing_docs,
    reason = "Shared test fixtures are used selectively by each test binary."
)]

use std::fs;
use std::path::Path;

use policy_test_core::Client;
use policy_test_core::ClientError;
use policy_test_core::Constraint;
use policy_test_core::ConstraintHandle;
use policy_test_core::Object;
use policy_test_core::ReviewResponse;
use policy_test_core::RunContext;
use policy_test_core::Template;
use policy_test_core::TemplateHandle;
use policy_test_core::Violation;
use tempfile::TempDir;

pub const LABELS_SUITE: &str = "\
kind: Suite
apiVersion: test.gatekeeper.sh/v1alpha1
tests:
- name: required-labels
  template: template.yaml
  constraint: constraint.yaml
  cases:
  - name: labeled-namespace
    allow: labeled.yaml
  - name: unlabeled-namespace
    deny: unlabeled.yaml
    assertions:
    - violations: 1
      message: owner
";

pub const TEMPLATE_YAML: &str = "\
apiVersion: templates.gatekeeper.sh/v1
kind: ConstraintTemplate
metadata:
  name: k8srequiredlabels
";

pub const CONSTRAINT_YAML: &str = "\
apiVersion: constraints.gatekeeper.sh/v1beta1
kind: K8sRequiredLabels
metadata:
  name: must-have-owner
";

pub const LABELED_YAML: &str = "\
apiVersion: v1
kind: Namespace
metadata:
  name: payments
  labels:
    owner: team-a
";

pub const UNLABELED_YAML: &str = "\
apiVersion: v1
kind: Namespace
metadata:
  name: scratch
";

/// Writes `contents` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Writes a complete required-labels suite with its artifacts under `dir`.
pub fn write_labels_suite(root: &Path, dir: &str) {
    write_file(root, &format!("{dir}/suite.yaml"), LABELS_SUITE);
    write_file(root, &format!("{dir}/template.yaml"), TEMPLATE_YAML);
    write_file(root, &format!("{dir}/constraint.yaml"), CONSTRAINT_YAML);
    write_file(root, &format!("{dir}/labeled.yaml"), LABELED_YAML);
    write_file(root, &format!("{dir}/unlabeled.yaml"), UNLABELED_YAML);
}

/// Temporary root holding one required-labels suite under `policies/labels`.
pub fn labels_root() -> TempDir {
    let root = tempfile::tempdir().unwrap();
    write_labels_suite(root.path(), "policies/labels");
    root
}

/// Stub engine: constraints bound to a known template deny objects that
/// lack an `owner` label.
#[derive(Debug, Default)]
pub struct LabelClient {
    templates: Vec<String>,
    constraints: Vec<String>,
}

impl Client for LabelClient {
    fn add_template(
        &mut self,
        _ctx: &RunContext,
        template: &Template,
    ) -> Result<TemplateHandle, ClientError> {
        let kind = template.object().name().to_string();
        self.templates.push(kind.clone());
        Ok(TemplateHandle {
            kind,
        })
    }

    fn add_constraint(
        &mut self,
        _ctx: &RunContext,
        constraint: &Constraint,
    ) -> Result<ConstraintHandle, ClientError> {
        let object = constraint.object();
        let kind = object.kind().to_string();
        if !self.templates.contains(&kind.to_lowercase()) {
            return Err(ClientError::Failed(format!("no template defines kind {kind}")));
        }
        self.constraints.push(object.name().to_string());
        Ok(ConstraintHandle {
            kind,
            name: object.name().to_string(),
        })
    }

    fn review(&self, ctx: &RunContext, object: &Object) -> Result<ReviewResponse, ClientError> {
        if ctx.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        if object.as_value().pointer("/metadata/labels/owner").is_some() {
            return Ok(ReviewResponse::default());
        }
        let violations = self
            .constraints
            .iter()
            .map(|name| Violation {
                msg: "you must provide labels: {\"owner\"}".to_string(),
                constraint: Some(name.clone()),
            })
            .collect();
        Ok(ReviewResponse::new(violations))
    }
}

/// Factory producing fresh label clients.
pub fn label_factory() -> Result<LabelClient, ClientError> {
    Ok(LabelClient::default())
}
