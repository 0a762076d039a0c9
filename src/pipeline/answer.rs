//! Answer composition: selected pages in, grounded [`ChatResult`] out.
//!
//! ## Message Layout
//!
//! The request contains (in order):
//! 1. **System message** — the construction-assistant rules.
//! 2. **User message** — the question verbatim.
//! 3. **Per selected page** — its context block, then the rendered page image
//!    as a base64 PNG attachment, so the model can correlate what it sees
//!    with the text that introduced it.
//! 4. **Closing instruction** — asks for an answer grounded in the images.
//!
//! ## Failure Boundaries
//!
//! An unreadable page image degrades the request instead of failing it: the
//! context block still goes out, the page is just excluded from
//! `pages_analyzed`. A failed model invocation never escapes either — it is
//! converted to a [`ChatResult`] carrying the error text at confidence 0.0,
//! so transport code can stay oblivious to provider weather.

use crate::config::ServiceConfig;
use crate::error::BlueprintError;
use crate::prompts::{build_page_context, CLOSING_INSTRUCTION, SYSTEM_PROMPT};
use crate::types::{ChatResult, Page, Source};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider, ProviderFactory};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default model when Gemini is selected implicitly via `GEMINI_API_KEY`.
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Preview length for source citations, in characters.
const PREVIEW_CHARS: usize = 200;
/// How many measurements a source citation carries.
const SOURCE_MEASUREMENTS: usize = 5;

/// The seam between answer composition and the concrete model.
///
/// Production wraps an `edgequake_llm` provider; tests substitute a stub so
/// the whole chat path runs without network access.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Run one completion. `Err` carries a human-readable failure reason.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<String, String>;
}

/// [`VisionModel`] backed by a real `edgequake_llm` provider.
pub struct ProviderVisionModel {
    provider: Arc<dyn LLMProvider>,
}

impl ProviderVisionModel {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl VisionModel for ProviderVisionModel {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<String, String> {
        match self.provider.chat(messages, Some(options)).await {
            Ok(response) => {
                debug!(
                    input_tokens = response.prompt_tokens,
                    output_tokens = response.completion_tokens,
                    "model completion finished"
                );
                Ok(response.content)
            }
            Err(e) => Err(format!("{}", e)),
        }
    }
}

/// Resolve the vision provider, in priority order:
///
/// 1. **Pre-built provider** (`config.provider`) — used as-is; the test and
///    embedding path.
/// 2. **Named provider + model** (`config.provider_name`) — instantiated via
///    [`ProviderFactory::create_llm_provider`], which reads the matching API
///    key from the environment.
/// 3. **`GEMINI_API_KEY`** — construction-drawing reading leans on Gemini's
///    vision quality, so its key alone selects Gemini with the default model.
/// 4. **Full auto-detection** ([`ProviderFactory::from_env`]) — the factory
///    scans all known API key variables.
///
/// Failing every step is fatal at startup rather than at first request.
pub fn resolve_provider(config: &ServiceConfig) -> Result<Arc<dyn LLMProvider>, BlueprintError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL);
        return create_vision_provider(name, model);
    }

    if std::env::var("GEMINI_API_KEY").is_ok() {
        let model = config.model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL);
        return create_vision_provider("gemini", model);
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| BlueprintError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No vision provider could be auto-detected from environment.\n\
                Set GEMINI_API_KEY, OPENAI_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}

/// Instantiate a named provider with the given model.
fn create_vision_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, BlueprintError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        BlueprintError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Answer a question against the already ranked pages.
///
/// `relevant_pages` must be non-empty; the caller handles the no-match case.
/// Always returns a `ChatResult` — model failure yields the error text at
/// confidence 0.0 with empty sources.
pub async fn answer_question(
    model: &dyn VisionModel,
    question: &str,
    relevant_pages: &[&Page],
    config: &ServiceConfig,
) -> ChatResult {
    let mut messages = vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(question),
    ];

    // Pages whose image actually made it into the request.
    let mut pages_analyzed: Vec<usize> = Vec::new();

    for page in relevant_pages {
        messages.push(ChatMessage::user(build_page_context(
            page,
            config.text_snippet_chars,
        )));

        match std::fs::read(&page.image_path) {
            Ok(png_bytes) => {
                let b64 = STANDARD.encode(&png_bytes);
                let image = ImageData::new(b64, "image/png").with_detail("high");
                messages.push(ChatMessage::user_with_images("", vec![image]));
                pages_analyzed.push(page.page_number);
            }
            Err(e) => {
                warn!(
                    page = page.page_number,
                    path = %page.image_path.display(),
                    error = %e,
                    "page image unreadable, sending text context only"
                );
            }
        }
    }

    messages.push(ChatMessage::user(CLOSING_INSTRUCTION));

    let options = CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    };

    match model.complete(&messages, &options).await {
        Ok(response) => {
            let confidence = estimate_confidence(&response, relevant_pages);
            ChatResult {
                sources: build_sources(relevant_pages),
                pages_analyzed,
                confidence,
                response,
            }
        }
        Err(e) => {
            warn!(error = %e, "model invocation failed");
            ChatResult {
                response: format!("Error processing question: {}", e),
                sources: Vec::new(),
                confidence: 0.0,
                pages_analyzed: Vec::new(),
            }
        }
    }
}

/// Heuristic confidence score for a model response.
///
/// Starts at 0.5 and applies independent adjustments:
/// * +0.2 if the response cites any supplied page by number;
/// * +0.15 if it quotes a measurement extracted from the supplied pages
///   (case-sensitive, since measurement literals are symbols not prose);
/// * +0.1 if it uses visual-observation language;
/// * −0.2 if it hedges with uncertainty phrases.
///
/// The result is clamped to `[0.1, 1.0]`.
pub fn estimate_confidence(response: &str, pages: &[&Page]) -> f32 {
    let response_lower = response.to_lowercase();
    let mut confidence = 0.5f32;

    if pages
        .iter()
        .any(|p| response_lower.contains(&format!("page {}", p.page_number)))
    {
        confidence += 0.2;
    }

    if pages
        .iter()
        .flat_map(|p| p.metadata.measurements.iter())
        .any(|m| response.contains(m.as_str()))
    {
        confidence += 0.15;
    }

    const VISION_INDICATORS: &[&str] =
        &["drawing", "image", "can see", "visible", "shown", "depicted"];
    if VISION_INDICATORS.iter().any(|w| response_lower.contains(w)) {
        confidence += 0.1;
    }

    const UNCERTAINTY_PHRASES: &[&str] = &[
        "not clear",
        "cannot see",
        "not visible",
        "unclear",
        "not specified",
    ];
    if UNCERTAINTY_PHRASES
        .iter()
        .any(|w| response_lower.contains(w))
    {
        confidence -= 0.2;
    }

    confidence.clamp(0.1, 1.0)
}

/// Build source citations for the pages that informed the answer.
pub fn build_sources(pages: &[&Page]) -> Vec<Source> {
    pages
        .iter()
        .map(|page| {
            // Ellipsis only when something was actually cut off.
            let content_preview = if page.text.chars().count() > PREVIEW_CHARS {
                let snippet: String = page.text.chars().take(PREVIEW_CHARS).collect();
                format!("{snippet}...")
            } else {
                page.text.clone()
            };
            Source {
                page: page.page_number,
                drawing_type: page.page_type.label().to_string(),
                content_preview,
                has_image: page.image_path.exists(),
                rooms: page.metadata.rooms.clone(),
                measurements: page
                    .metadata
                    .measurements
                    .iter()
                    .take(SOURCE_MEASUREMENTS)
                    .cloned()
                    .collect(),
            }
        })
        .collect()
}
