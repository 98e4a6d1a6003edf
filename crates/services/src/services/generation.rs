use std::sync::Arc;

use async_trait::async_trait;
use db::models::order::{GeneratedContent, Order, OrderError, Template, WeddingDetails};
use db::store::OrderStore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::config::GenerationConfig;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error("Wedding details are incomplete; save couple names, date and venue first")]
    DetailsMissing,
    #[error("Content generation request failed: {0}")]
    Upstream(String),
    #[error("Content generation returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Seam to the external text-generation service: one prompt in, the raw
/// completion text out. The service is treated as untrusted and slow.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// OpenAI-compatible chat completions client. The configured timeout bounds
/// the whole request; a timeout surfaces as an Upstream failure like any
/// other transport error.
pub struct OpenAiCompletionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompletionClient {
    pub fn new(config: &GenerationConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let request_body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            response_format: ResponseFormat {
                format: "json_object".to_string(),
            },
        };

        let response = self
            .client
            .post(chat_completions_url(&self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|err| GenerationError::Upstream(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = parse_api_error(&body)
                .unwrap_or_else(|| format!("completion request returned status {status}"));
            return Err(GenerationError::Upstream(message));
        }

        let data = response
            .json::<ChatResponse>()
            .await
            .map_err(|err| GenerationError::InvalidResponse(err.to_string()))?;

        data.choices
            .iter()
            .find_map(|choice| choice.message.as_ref()?.content.as_ref())
            .map(|content| content.to_string())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::InvalidResponse("completion contained no content".to_string())
            })
    }
}

/// Turns an order's saved details into generated site copy. One outbound
/// call per invocation; on any failure the order is left exactly as it was.
#[derive(Clone)]
pub struct GenerationService {
    client: Arc<dyn CompletionClient>,
}

impl GenerationService {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    pub async fn generate(
        &self,
        store: &dyn OrderStore,
        order_id: i64,
    ) -> Result<Order, GenerationError> {
        let order = store
            .get_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;
        let details = order
            .wedding_details
            .as_ref()
            .filter(|details| details.has_required_fields())
            .ok_or(GenerationError::DetailsMissing)?;

        let prompt = build_prompt(details, order.template.as_ref());
        tracing::debug!(order_id, "Requesting site copy from generation service");
        let raw = self.client.complete(&prompt).await?;
        let content = parse_generated_content(&raw)?;

        let updated = store.complete_generation(order.id, content).await?;
        tracing::info!(order_id, "Generated site content");
        Ok(updated)
    }
}

/// Deterministic prompt assembly: identical details and template always
/// produce an identical prompt.
fn build_prompt(details: &WeddingDetails, template: Option<&Template>) -> String {
    let couple = details.couple_names.as_deref().unwrap_or_default();
    let date = details.wedding_date.as_deref().unwrap_or_default();
    let time = details
        .wedding_time
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or("TBA");
    let venue = details.venue.as_deref().unwrap_or_default();
    let address = details
        .venue_address
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or("Address TBA");
    let story = details
        .love_story
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or("Write a romantic intro about destiny and shared dreams.");

    format!(
        "You are a professional wedding website copywriter. Generate content for a wedding \
website inspired by high-end vertical mobile invitations.\n\
Details:\n\
- Couple: {couple}\n\
- Date: {date} at {time}\n\
- Venue: {venue} ({address})\n\
- Love Story: {story}\n\
- Tone: {tone}\n\
\n\
Return ONLY a JSON object:\n\
- welcomeMessage: Short, catchy (e.g., \"The Beginning of Forever\")\n\
- ourStory: 2 short, beautiful paragraphs.\n\
- venueDetails: Descriptive blurb about the location.\n\
- rsvpMessage: Urgent but polite CTA.\n\
- seoTitle: Professional SEO title.\n\
- seoDescription: Elegant meta description.\n\
- schemaMarkup: Stringified JSON-LD WeddingEvent.\n\
- agendaIntro: Short line introducing the schedule.\n\
- detailsIntro: Short line introducing dress code and logistics.\n\
- closingMessage: A warm, emotional closing thank-you message.",
        tone = tone_for_template(template),
    )
}

fn tone_for_template(template: Option<&Template>) -> &'static str {
    match template {
        Some(Template::SageGreen) => "Organic, Warm, Natural",
        Some(Template::OldMoney) => "Classic, Formal, Sophisticated",
        Some(Template::Minimalist) => "Clean, Modern, Understated",
        Some(Template::LuxuryGold) => "Opulent, Glamorous, Refined",
        Some(Template::Botanical) => "Romantic, Fresh, Garden-Inspired",
        None => "Modern, Warm, Elegant",
    }
}

fn parse_generated_content(raw: &str) -> Result<GeneratedContent, GenerationError> {
    serde_json::from_str(strip_code_fences(raw))
        .map_err(|err| GenerationError::InvalidResponse(err.to_string()))
}

// Models occasionally wrap the object in a markdown fence despite the
// json_object directive.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    inner.trim()
}

fn chat_completions_url(base: &str) -> String {
    let trimmed = base.trim_end_matches('/');
    if trimmed.ends_with("/v1") {
        format!("{trimmed}/chat/completions")
    } else {
        format!("{trimmed}/v1/chat/completions")
    }
}

fn parse_api_error(body: &str) -> Option<String> {
    let parsed: ApiErrorResponse = serde_json::from_str(body).ok()?;
    parsed.error.and_then(|err| err.message)
}
