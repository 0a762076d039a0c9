//! Service configuration.
//!
//! All behaviour is controlled through [`ServiceConfig`], built via its
//! [`ServiceConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share the config across handlers, serialise it for logging,
//! and diff two deployments to understand why their answers differ.

use crate::error::BlueprintError;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for the document-chat service.
///
/// Built via [`ServiceConfig::builder()`] or [`ServiceConfig::default()`].
///
/// # Example
/// ```rust
/// use blueprint_chat::ServiceConfig;
///
/// let config = ServiceConfig::builder()
///     .image_dir("temp_images")
///     .model("gemini-2.0-flash")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ServiceConfig {
    /// Directory where rendered page images are written. Default: `temp_images`.
    ///
    /// Images are named `{document_id}_page_{page_number}.png`. The directory
    /// is created on first ingestion and is never cleaned up by the service.
    pub image_dir: PathBuf,

    /// Maximum rendered image dimension (width or height) in pixels. Default: 2000.
    ///
    /// Construction sheets are routinely A1/A0; an uncapped render of a
    /// 36"×24" sheet would exhaust memory long before it helped the model.
    /// Capping the longest edge keeps every page near the resolution sweet
    /// spot for vision models.
    pub max_rendered_pixels: u32,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Provider name (e.g. "gemini", "openai"). If None along with
    /// `provider`, the provider is auto-detected from the environment.
    pub provider_name: Option<String>,

    /// Vision model identifier, e.g. "gemini-2.0-flash".
    /// If None, uses the provider default.
    pub model: Option<String>,

    /// Sampling temperature for the model. Default: 0.1.
    ///
    /// Answers must be faithful to what is on the drawings; low temperature
    /// keeps the model from inventing dimensions.
    pub temperature: f32,

    /// Maximum tokens the model may generate per answer. Default: 2048.
    pub max_tokens: usize,

    /// How many top-scoring pages the ranker forwards to the model. Default: 3.
    pub top_pages: usize,

    /// Page-text truncation length for the per-page context block. Default: 500.
    pub text_snippet_chars: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("temp_images"),
            max_rendered_pixels: 2000,
            provider: None,
            provider_name: None,
            model: None,
            temperature: 0.1,
            max_tokens: 2048,
            top_pages: 3,
            text_snippet_chars: 500,
        }
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("image_dir", &self.image_dir)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("provider_name", &self.provider_name)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("top_pages", &self.top_pages)
            .field("text_snippet_chars", &self.text_snippet_chars)
            .finish()
    }
}

impl ServiceConfig {
    /// Create a new builder for `ServiceConfig`.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder {
            config: Self::default(),
        }
    }

    /// Image file path for a given document page.
    pub fn page_image_path(&self, document_id: &str, page_number: usize) -> PathBuf {
        self.image_dir
            .join(format!("{document_id}_page_{page_number}.png"))
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    pub fn image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.image_dir = dir.into();
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn top_pages(mut self, n: usize) -> Self {
        self.config.top_pages = n.max(1);
        self
    }

    pub fn text_snippet_chars(mut self, n: usize) -> Self {
        self.config.text_snippet_chars = n;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ServiceConfig, BlueprintError> {
        let c = &self.config;
        if c.top_pages == 0 {
            return Err(BlueprintError::InvalidConfig(
                "top_pages must be ≥ 1".into(),
            ));
        }
        if c.text_snippet_chars == 0 {
            return Err(BlueprintError::InvalidConfig(
                "text_snippet_chars must be ≥ 1".into(),
            ));
        }
        if c.image_dir.as_os_str().is_empty() {
            return Err(BlueprintError::InvalidConfig(
                "image_dir must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ServiceConfig::builder().build().unwrap();
        assert_eq!(config.top_pages, 3);
        assert_eq!(config.text_snippet_chars, 500);
        assert_eq!(config.max_rendered_pixels, 2000);
    }

    #[test]
    fn top_pages_setter_clamps_to_one() {
        let config = ServiceConfig::builder().top_pages(0).build().unwrap();
        assert_eq!(config.top_pages, 1);
    }

    #[test]
    fn page_image_path_follows_naming_scheme() {
        let config = ServiceConfig::builder().image_dir("/tmp/imgs").build().unwrap();
        assert_eq!(
            config.page_image_path("doc-1", 4),
            PathBuf::from("/tmp/imgs/doc-1_page_4.png")
        );
    }

    #[test]
    fn empty_image_dir_rejected() {
        let err = ServiceConfig::builder().image_dir("").build();
        assert!(err.is_err());
    }
}
