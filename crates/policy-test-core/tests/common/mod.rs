// crates/policy-test-core/tests/common/mod.rs
// ============================================================================
// Module: Runner Test Fixtures
// Description: Recording stub client and in-memory suite fixtures.
// Purpose: Let runner tests assert exactly which client calls happened.
// Dependencies: policy-test-core
// ============================================================================

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_docs_in_private_items,
    missing_docs,
    reason = "Shared test fixtures are used selectively by each test binary."
)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use policy_test_core::Client;
use policy_test_core::ClientError;
use policy_test_core::Constraint;
use policy_test_core::ConstraintHandle;
use policy_test_core::InMemoryFileStore;
use policy_test_core::Object;
use policy_test_core::ReviewResponse;
use policy_test_core::RunContext;
use policy_test_core::Template;
use policy_test_core::TemplateHandle;
use policy_test_core::Violation;

pub const SUITE_PATH: &str = "policies/required-labels/suite.yaml";

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

/// Returns a YAML object whose `metadata.name` is `name`.
pub fn object_yaml(name: &str) -> String {
    format!("apiVersion: v1\nkind: Namespace\nmetadata:\n  name: {name}\n")
}

/// Store holding the template, the constraint, and the named objects under
/// the suite directory.
pub fn fixture_store(objects: &[&str]) -> InMemoryFileStore {
    let mut store = InMemoryFileStore::new()
        .with_file("policies/required-labels/template.yaml", TEMPLATE_YAML)
        .with_file("policies/required-labels/constraint.yaml", CONSTRAINT_YAML);
    for name in objects {
        store.insert(&format!("policies/required-labels/{name}.yaml"), object_yaml(name));
    }
    store
}

/// Client call recorded by the stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    NewClient { client: usize },
    AddTemplate { client: usize, name: String },
    AddConstraint { client: usize, name: String },
    Review { client: usize, object: String },
}

/// Shared, ordered log of stub calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn clients_created(&self) -> usize {
        self.calls().iter().filter(|call| matches!(call, Call::NewClient { .. })).count()
    }

    pub fn reviews(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Review { object, .. } => Some(object),
                _ => None,
            })
            .collect()
    }
}

/// Scripted behavior shared by every stub client built by a factory.
#[derive(Debug, Clone, Default)]
pub struct StubBehavior {
    pub fail_factory: bool,
    pub reject_template: Option<String>,
    pub reject_constraint: Option<String>,
    pub review_error: Option<String>,
    pub review_delay: Option<Duration>,
    /// Violations returned per object `metadata.name`.
    pub violations: BTreeMap<String, Vec<Violation>>,
}

impl StubBehavior {
    pub fn deny(mut self, object: &str, messages: &[&str]) -> Self {
        self.violations.insert(
            object.to_string(),
            messages.iter().map(|msg| Violation::new(*msg)).collect(),
        );
        self
    }
}

/// Stub client recording every call into a shared log.
#[derive(Debug)]
pub struct StubClient {
    id: usize,
    log: CallLog,
    behavior: Arc<StubBehavior>,
    templates: Vec<String>,
    constraints: Vec<String>,
}

impl Client for StubClient {
    fn add_template(
        &mut self,
        _ctx: &RunContext,
        template: &Template,
    ) -> Result<TemplateHandle, ClientError> {
        let name = template.object().name().to_string();
        self.log.push(Call::AddTemplate {
            client: self.id,
            name: name.clone(),
        });
        if let Some(reason) = &self.behavior.reject_template {
            return Err(ClientError::Failed(reason.clone()));
        }
        self.templates.push(name.clone());
        Ok(TemplateHandle {
            kind: name,
        })
    }

    fn add_constraint(
        &mut self,
        _ctx: &RunContext,
        constraint: &Constraint,
    ) -> Result<ConstraintHandle, ClientError> {
        let name = constraint.object().name().to_string();
        self.log.push(Call::AddConstraint {
            client: self.id,
            name: name.clone(),
        });
        if let Some(reason) = &self.behavior.reject_constraint {
            return Err(ClientError::Failed(reason.clone()));
        }
        if self.templates.is_empty() {
            return Err(ClientError::Failed("no template registered".to_string()));
        }
        self.constraints.push(name.clone());
        Ok(ConstraintHandle {
            kind: constraint.object().kind().to_string(),
            name,
        })
    }

    fn review(&self, ctx: &RunContext, object: &Object) -> Result<ReviewResponse, ClientError> {
        self.log.push(Call::Review {
            client: self.id,
            object: object.name().to_string(),
        });
        if let Some(delay) = self.behavior.review_delay {
            thread::sleep(delay);
        }
        if ctx.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        if let Some(reason) = &self.behavior.review_error {
            return Err(ClientError::Failed(reason.clone()));
        }
        let violations = self.behavior.violations.get(object.name()).cloned().unwrap_or_default();
        Ok(ReviewResponse::new(violations))
    }
}

/// Returns a factory building stub clients that share `behavior` and `log`.
pub fn stub_factory(
    behavior: StubBehavior,
    log: &CallLog,
) -> impl Fn() -> Result<StubClient, ClientError> + use<> {
    let behavior = Arc::new(behavior);
    let log = log.clone();
    move || {
        let id = log.clients_created();
        log.push(Call::NewClient {
            client: id,
        });
        if behavior.fail_factory {
            return Err(ClientError::Failed("engine unavailable".to_string()));
        }
        Ok(StubClient {
            id,
            log: log.clone(),
            behavior: Arc::clone(&behavior),
            templates: Vec::new(),
            constraints: Vec::new(),
        })
    }
}
