//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext wiring the router to in-process stub collaborators
//! - Stub fetcher and extraction service that record their calls
//!
//! No network access is needed; nothing here talks to Wikipedia or a real
//! extraction service.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use ingest_core::{
    CollaboratorError, DocumentFetcher, ExtractedCard, ExtractionOptions, ExtractionService,
    MemoryPreferences, Orchestrator, RawExternalContent, StaticCredential,
};

use flashcard_ingest_backend::{router, AppState};

/// Fetcher returning a canned article, or a canned failure.
#[derive(Default)]
pub struct StubFetcher {
    pub calls: AtomicUsize,
    pub fail_with: Option<String>,
}

#[async_trait]
impl DocumentFetcher for StubFetcher {
    async fn fetch(&self, reference: &str) -> Result<RawExternalContent, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(message) => Err(CollaboratorError::new(message.clone())),
            None => Ok(RawExternalContent {
                title: format!("Article at {}", reference),
                content: fixtures::ARTICLE_TEXT.to_string(),
            }),
        }
    }
}

/// Extraction service returning canned cards and recording each call.
#[derive(Default)]
pub struct StubExtractor {
    pub calls: Mutex<Vec<ExtractCall>>,
    pub fail_with: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractCall {
    pub text: String,
    pub options: ExtractionOptions,
    pub simulated: bool,
}

#[async_trait]
impl ExtractionService for StubExtractor {
    async fn extract(
        &self,
        text: &str,
        options: &ExtractionOptions,
        simulated: bool,
    ) -> Result<Vec<ExtractedCard>, CollaboratorError> {
        self.calls.lock().unwrap().push(ExtractCall {
            text: text.to_string(),
            options: options.clone(),
            simulated,
        });
        match &self.fail_with {
            Some(message) => Err(CollaboratorError::new(message.clone())),
            None => Ok(fixtures::extracted_cards(3)),
        }
    }
}

/// Test context holding the router and handles on every stub.
pub struct TestContext {
    pub fetcher: Arc<StubFetcher>,
    pub extractor: Arc<StubExtractor>,
    pub preferences: Arc<MemoryPreferences>,
    pub state: AppState,
    app: Router,
}

impl TestContext {
    /// Context with a configured credential and well-behaved stubs.
    pub fn new() -> Self {
        Self::build(StubFetcher::default(), StubExtractor::default(), Some("test-key"))
    }

    /// Context whose extraction credential is missing.
    pub fn without_credential() -> Self {
        Self::build(StubFetcher::default(), StubExtractor::default(), None)
    }

    pub fn build(fetcher: StubFetcher, extractor: StubExtractor, credential: Option<&str>) -> Self {
        let fetcher = Arc::new(fetcher);
        let extractor = Arc::new(extractor);
        let preferences = Arc::new(MemoryPreferences::new());

        let orchestrator = Orchestrator::new(
            fetcher.clone(),
            extractor.clone(),
            preferences.clone(),
            Arc::new(StaticCredential::new(credential.map(str::to_string))),
        );

        let state = AppState {
            orchestrator: Arc::new(orchestrator),
            preferences: preferences.clone(),
        };
        let app = router(state.clone());

        Self {
            fetcher,
            extractor,
            preferences,
            state,
            app,
        }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).unwrap()
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetcher.calls.load(Ordering::SeqCst)
    }

    pub fn extract_calls(&self) -> Vec<ExtractCall> {
        self.extractor.calls.lock().unwrap().clone()
    }
}
