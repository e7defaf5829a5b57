//! Reference-data gateway quote source.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use curvefeed_config::{GatewaySettings, Validate};
use curvefeed_traits::wire::ReferenceResponse;
use curvefeed_traits::{QuoteBatch, QuoteRequest, QuoteSource, SourceType, TraitError};

use crate::transport::{HttpAuth, HttpRequest, HttpTransport, ReqwestTransport};

/// Longest body excerpt carried into error messages.
const BODY_EXCERPT_LEN: usize = 200;

/// Quote source that posts batched reference requests to the gateway.
///
/// Requests larger than the configured batch size are split; the chunks are
/// sent in order and the first failing chunk fails the whole fetch.
pub struct GatewayQuoteSource {
    settings: GatewaySettings,
    auth: HttpAuth,
    transport: Arc<dyn HttpTransport>,
}

impl GatewayQuoteSource {
    /// Creates a source over reqwest, reading the token from the configured
    /// environment variable.
    pub fn new(settings: GatewaySettings) -> Result<Self, TraitError> {
        let auth = HttpAuth::bearer(settings.token_from_env());
        Self::with_transport(settings, auth, Arc::new(ReqwestTransport::new()))
    }

    /// Creates a source over any transport.
    pub fn with_transport(
        settings: GatewaySettings,
        auth: HttpAuth,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, TraitError> {
        if let Some(error) = settings.validate().into_iter().next() {
            return Err(TraitError::InvalidInput(error.to_string()));
        }
        Ok(Self {
            settings,
            auth,
            transport,
        })
    }

    /// The settings.
    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    async fn fetch_chunk(&self, chunk: &QuoteRequest) -> Result<QuoteBatch, TraitError> {
        let body = serde_json::to_string(chunk)
            .map_err(|e| TraitError::SerializationError(e.to_string()))?;
        let request = HttpRequest::post_json(self.settings.reference_url(), body)
            .with_auth(&self.auth)
            .with_timeout_ms(self.settings.timeout_ms);

        let response = self.transport.execute(request).await?;
        match response.status {
            401 | 403 => {
                return Err(TraitError::AuthenticationFailed(excerpt(&response.body)));
            }
            _ if !response.is_success() => {
                return Err(TraitError::HttpStatus {
                    status: response.status,
                    message: excerpt(&response.body),
                });
            }
            _ => {}
        }

        ReferenceResponse::from_json(&response.body)?.into_batch()
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_LEN).collect()
}

#[async_trait]
impl QuoteSource for GatewayQuoteSource {
    fn source_type(&self) -> SourceType {
        SourceType::Snapshot
    }

    fn name(&self) -> &str {
        "gateway"
    }

    async fn fetch_quotes(&self, request: &QuoteRequest) -> Result<QuoteBatch, TraitError> {
        if request.is_empty() {
            return Ok(QuoteBatch::default());
        }

        let chunks = request.chunks(self.settings.max_batch_size);
        let total = chunks.len();
        let mut batch = QuoteBatch::default();
        for (i, chunk) in chunks.iter().enumerate() {
            debug!(
                chunk = i + 1,
                of = total,
                securities = chunk.len(),
                "posting reference request"
            );
            match self.fetch_chunk(chunk).await {
                Ok(part) => batch.extend(part),
                Err(e) => {
                    warn!(chunk = i + 1, of = total, "reference request failed: {}", e);
                    return Err(e);
                }
            }
        }
        Ok(batch)
    }
}

impl std::fmt::Debug for GatewayQuoteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayQuoteSource")
            .field("url", &self.settings.reference_url())
            .field("authenticated", &(self.auth != HttpAuth::None))
            .finish()
    }
}
