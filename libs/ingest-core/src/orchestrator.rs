//! Ingestion orchestrator.
//!
//! Routes a request through validation, the document fetcher and the
//! extraction service (submit), or straight to an importer (import), and
//! reports progress on a watch channel of [`IngestStatus`] snapshots.
//!
//! Only one attempt runs at a time. A second request while one is in flight
//! is rejected with [`IngestError::Busy`] and leaves the status untouched.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::watch;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{ErrorReport, IngestError, Result};
use crate::import::{self, IdAllocator};
use crate::ports::{
    is_truthy, CredentialSource, DocumentFetcher, ExtractionService, PreferenceStore,
    SIMULATED_MODE_KEY,
};
use crate::source::{derive_title, SourcePolicy};
use crate::types::{Card, Collection, ExtractedCard, ExtractionOptions, ImportKind};

/// Title given to collections built from pasted text.
pub const TEXT_TITLE: &str = "Custom Text";

/// Source marker for collections built from pasted text.
pub const TEXT_SOURCE: &str = "text-input";

/// Where an attempt currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestState {
    #[default]
    Idle,
    Validating,
    Fetching,
    Extracting,
    Reading,
    Parsing,
    Done,
    Error,
}

/// Snapshot of the caller-visible channels.
///
/// `result` and `error` are never both set; `loading` is false whenever
/// either is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestStatus {
    pub state: IngestState,
    pub loading: bool,
    pub result: Option<Collection>,
    pub error: Option<ErrorReport>,
}

pub struct Orchestrator {
    fetcher: Arc<dyn DocumentFetcher>,
    extractor: Arc<dyn ExtractionService>,
    preferences: Arc<dyn PreferenceStore>,
    credentials: Arc<dyn CredentialSource>,
    policy: SourcePolicy,
    busy: AtomicBool,
    status: watch::Sender<IngestStatus>,
}

impl Orchestrator {
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        extractor: Arc<dyn ExtractionService>,
        preferences: Arc<dyn PreferenceStore>,
        credentials: Arc<dyn CredentialSource>,
    ) -> Self {
        let (status, _) = watch::channel(IngestStatus::default());
        Self {
            fetcher,
            extractor,
            preferences,
            credentials,
            policy: SourcePolicy::default(),
            busy: AtomicBool::new(false),
            status,
        }
    }

    /// Replace the host allow-list used in URL mode.
    pub fn with_source_policy(mut self, policy: SourcePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn source_policy(&self) -> &SourcePolicy {
        &self.policy
    }

    /// Current snapshot of the status channel.
    pub fn status(&self) -> IngestStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<IngestStatus> {
        self.status.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Generate flashcards from a Wikipedia URL or pasted text.
    pub async fn submit(&self, input: &str, is_url_mode: bool) -> Result<Collection> {
        self.submit_with_options(input, is_url_mode, &ExtractionOptions::default())
            .await
    }

    pub async fn submit_with_options(
        &self,
        input: &str,
        is_url_mode: bool,
        options: &ExtractionOptions,
    ) -> Result<Collection> {
        let attempt = Attempt::begin(self)?;
        let span = tracing::info_span!("submit", attempt = %attempt.id, url_mode = is_url_mode);
        let outcome = self
            .run_submit(&attempt, input, is_url_mode, options)
            .instrument(span.clone())
            .await;
        span.in_scope(|| attempt.finish(outcome))
    }

    async fn run_submit(
        &self,
        attempt: &Attempt<'_>,
        input: &str,
        is_url_mode: bool,
        options: &ExtractionOptions,
    ) -> Result<Collection> {
        // Read once; later preference changes do not affect this attempt.
        let simulated = self.simulated_mode();

        let input = input.trim();
        if input.is_empty() {
            return Err(IngestError::EmptyInput);
        }

        let has_credential = self
            .credentials
            .credential()
            .is_some_and(|value| !value.trim().is_empty());
        if !has_credential {
            return Err(IngestError::MissingCredential);
        }

        attempt.start_loading();

        let (text, title, source) = if is_url_mode {
            if !self.policy.is_valid(input) {
                return Err(IngestError::InvalidSource {
                    reference: input.to_string(),
                });
            }

            attempt.enter(IngestState::Fetching);
            tracing::info!(reference = input, "fetching article");
            let article = self
                .fetcher
                .fetch(input)
                .await
                .map_err(|e| IngestError::Fetch(e.to_string()))?;

            if article.content.trim().is_empty() {
                return Err(IngestError::Fetch(
                    "the article has no readable content".to_string(),
                ));
            }

            (article.content, derive_title(input), input.to_string())
        } else {
            (
                input.to_string(),
                TEXT_TITLE.to_string(),
                TEXT_SOURCE.to_string(),
            )
        };

        attempt.enter(IngestState::Extracting);
        tracing::info!(chars = text.len(), simulated, "extracting flashcards");
        let extracted = self
            .extractor
            .extract(&text, options, simulated)
            .await
            .map_err(|e| IngestError::Extraction(e.to_string()))?;

        Collection::new(title, source, normalize_extracted(extracted))
    }

    /// Import a file of the declared kind.
    pub fn import(&self, kind: ImportKind, raw: &str, file_name: &str) -> Result<Collection> {
        let attempt = Attempt::begin(self)?;
        let span = tracing::info_span!("import", attempt = %attempt.id, kind = kind.as_str(), file = file_name);
        let _guard = span.enter();

        attempt.start_loading();
        attempt.enter(IngestState::Parsing);
        attempt.finish(import::parse(kind, raw, file_name))
    }

    pub fn import_structured(&self, raw: &str, file_name: &str) -> Result<Collection> {
        self.import(ImportKind::Structured, raw, file_name)
    }

    pub fn import_tabular(&self, raw: &str, file_name: &str) -> Result<Collection> {
        self.import(ImportKind::Tabular, raw, file_name)
    }

    /// Import a file read from an async source.
    pub async fn import_reader<R>(
        &self,
        kind: ImportKind,
        mut reader: R,
        file_name: &str,
    ) -> Result<Collection>
    where
        R: AsyncRead + Unpin + Send,
    {
        let attempt = Attempt::begin(self)?;
        let span = tracing::info_span!("import", attempt = %attempt.id, kind = kind.as_str(), file = file_name);

        attempt.start_loading();
        attempt.enter(IngestState::Reading);

        let mut raw = String::new();
        let outcome = match reader.read_to_string(&mut raw).instrument(span.clone()).await {
            Ok(_) => {
                attempt.enter(IngestState::Parsing);
                import::parse(kind, &raw, file_name)
            }
            Err(e) => Err(IngestError::Read(e.to_string())),
        };

        span.in_scope(|| attempt.finish(outcome))
    }

    fn simulated_mode(&self) -> bool {
        self.preferences
            .get(SIMULATED_MODE_KEY)
            .is_some_and(|value| is_truthy(&value))
    }
}

/// One in-flight attempt. Holds the busy flag until finished or dropped.
struct Attempt<'a> {
    orchestrator: &'a Orchestrator,
    id: Uuid,
    finished: bool,
}

impl<'a> Attempt<'a> {
    fn begin(orchestrator: &'a Orchestrator) -> Result<Self> {
        if orchestrator
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("rejected ingestion request while another is in flight");
            return Err(IngestError::Busy);
        }

        orchestrator.status.send_replace(IngestStatus {
            state: IngestState::Validating,
            ..IngestStatus::default()
        });

        Ok(Self {
            orchestrator,
            id: Uuid::new_v4(),
            finished: false,
        })
    }

    fn start_loading(&self) {
        self.orchestrator.status.send_modify(|s| s.loading = true);
    }

    fn enter(&self, state: IngestState) {
        tracing::debug!(?state, "ingest state");
        self.orchestrator.status.send_modify(|s| s.state = state);
    }

    /// Publish the outcome and clear loading in one snapshot.
    fn finish(mut self, outcome: Result<Collection>) -> Result<Collection> {
        let snapshot = match &outcome {
            Ok(collection) => {
                tracing::info!(cards = collection.cards.len(), title = %collection.title, "ingestion finished");
                IngestStatus {
                    state: IngestState::Done,
                    loading: false,
                    result: Some(collection.clone()),
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "ingestion failed");
                IngestStatus {
                    state: IngestState::Error,
                    loading: false,
                    result: None,
                    error: Some(e.report()),
                }
            }
        };

        self.orchestrator.status.send_replace(snapshot);
        self.finished = true;
        self.orchestrator.busy.store(false, Ordering::Release);
        outcome
    }
}

impl Drop for Attempt<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        // The attempt future was dropped before it completed.
        let error = IngestError::Unexpected("ingestion was cancelled".to_string());
        tracing::warn!(attempt = %self.id, "ingestion cancelled");
        self.orchestrator.status.send_replace(IngestStatus {
            state: IngestState::Error,
            loading: false,
            result: None,
            error: Some(error.report()),
        });
        self.orchestrator.busy.store(false, Ordering::Release);
    }
}

/// Trim extracted pairs, drop incomplete ones and settle ids.
///
/// Ids supplied by the service are kept when unique; the rest become
/// `generated-<n>` by position among the kept cards.
fn normalize_extracted(extracted: Vec<ExtractedCard>) -> Vec<Card> {
    let mut explicit = HashSet::new();
    let mut kept = Vec::with_capacity(extracted.len());

    for (idx, card) in extracted.into_iter().enumerate() {
        let question = card.question.trim();
        let answer = card.answer.trim();
        if question.is_empty() || answer.is_empty() {
            tracing::warn!(position = idx + 1, "dropping extracted card with an empty side");
            continue;
        }

        let id = card
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty() && explicit.insert(id.clone()));

        kept.push((id, question.to_string(), answer.to_string()));
    }

    let mut ids = IdAllocator::new("generated", explicit);
    kept.into_iter()
        .enumerate()
        .map(|(idx, (id, question, answer))| Card {
            id: id.unwrap_or_else(|| ids.next(idx + 1)),
            question,
            answer,
        })
        .collect()
}
