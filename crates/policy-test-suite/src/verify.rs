// crates/policy-test-suite/src/verify.rs
// ============================================================================
// Module: Suite Verification
// Description: Config-driven discovery and execution of multiple suites.
// Purpose: Run every suite under a configured target with one filter and context.
// Dependencies: policy-test-config, policy-test-core, thiserror
// ============================================================================

//! ## Overview
//! A [`Verifier`] opens the configured suite root, parses the filter once,
//! and runs each discovered suite through a single [`Runner`]. Suites run in
//! path order and share one [`RunContext`], so a timeout covers the whole
//! verification rather than each suite.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use policy_test_config::ConfigError;
use policy_test_config::VerifyConfig;
use policy_test_core::ClientFactory;
use policy_test_core::FilterError;
use policy_test_core::NameFilter;
use policy_test_core::NoopObserver;
use policy_test_core::RunContext;
use policy_test_core::RunObserver;
use policy_test_core::Runner;
use policy_test_core::StoreError;
use policy_test_core::SuiteResult;
use thiserror::Error;

use crate::loader::SuiteError;
use crate::loader::discover_suites;
use crate::store::DirectoryStore;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Verification setup and discovery errors.
///
/// Test and case failures are not errors; they live in the returned results.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Suite root could not be opened.
    #[error("opening suite root: {0}")]
    Root(#[from] StoreError),
    /// Filter expression is malformed.
    #[error("invalid filter: {0}")]
    Filter(#[from] FilterError),
    /// Suite discovery failed.
    #[error(transparent)]
    Suite(#[from] SuiteError),
}

// ============================================================================
// SECTION: Verifier
// ============================================================================

/// Runs every suite selected by a [`VerifyConfig`].
pub struct Verifier<F, O = NoopObserver> {
    /// Verification settings.
    config: VerifyConfig,
    /// Parsed name filter.
    filter: NameFilter,
    /// Runner over the suite root.
    runner: Runner<DirectoryStore, F, O>,
}

impl<F> Verifier<F>
where
    F: ClientFactory,
{
    /// Creates a verifier from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError`] when the configuration is invalid, the suite
    /// root cannot be opened, or the filter is malformed.
    pub fn new(config: VerifyConfig, new_client: F) -> Result<Self, VerifyError> {
        config.validate()?;
        let store = DirectoryStore::open(&config.suites.root, config.limits.max_file_bytes)?;
        let filter = NameFilter::parse(&config.run.filter)?;
        Ok(Self {
            config,
            filter,
            runner: Runner::new(store, new_client),
        })
    }

    /// Loads configuration from `path` (or the default location) and creates a verifier.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError`] when loading the configuration or setup fails.
    pub fn from_config_file(path: Option<&Path>, new_client: F) -> Result<Self, VerifyError> {
        Self::new(VerifyConfig::load(path)?, new_client)
    }
}

impl<F, O> Verifier<F, O>
where
    F: ClientFactory,
    O: RunObserver,
{
    /// Replaces the event observer.
    #[must_use]
    pub fn with_observer<P: RunObserver>(self, observer: P) -> Verifier<F, P> {
        Verifier {
            config: self.config,
            filter: self.filter,
            runner: self.runner.with_observer(observer),
        }
    }

    /// Returns the verification settings.
    #[must_use]
    pub const fn config(&self) -> &VerifyConfig {
        &self.config
    }

    /// Consumes the verifier and returns its observer.
    #[must_use]
    pub fn into_observer(self) -> O {
        self.runner.into_observer()
    }

    /// Builds a fresh run context carrying the configured timeout.
    #[must_use]
    pub fn context(&self) -> RunContext {
        let ctx = RunContext::new();
        match self.config.run.timeout() {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }

    /// Discovers and runs every configured suite with a fresh context.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError`] when discovery fails.
    pub fn verify(&self) -> Result<Vec<SuiteResult>, VerifyError> {
        self.verify_with(&self.context())
    }

    /// Discovers and runs every configured suite under `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError`] when discovery fails. No suite runs unless
    /// discovery of all suites succeeded.
    pub fn verify_with(&self, ctx: &RunContext) -> Result<Vec<SuiteResult>, VerifyError> {
        let suites = discover_suites(
            self.runner.store(),
            &self.config.suites.target,
            self.config.suites.recursive,
        )?;
        Ok(suites
            .iter()
            .map(|file| self.runner.run(ctx, &self.filter, &file.path, &file.suite))
            .collect())
    }
}
