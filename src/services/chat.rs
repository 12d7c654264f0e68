use reqwest::{Client, Url};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::AiConfig;
use crate::database::models::Product;

const CHAT_COMPLETIONS_PATH: &str = "chat/completions";

/// Products embedded in the system prompt
pub const PROMPT_PRODUCT_LIMIT: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("invalid completion base url: {0}")]
    BaseUrl(#[from] url::ParseError),
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("completion service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("completion service returned no content")]
    EmptyResponse,
}

/// One role-tagged message of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// Product details the prompt needs, whether sent by the client or loaded from the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub name: String,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: Some(product.price),
            description: product.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreContext {
    #[serde(default)]
    pub store_name: Option<String>,
    #[serde(default)]
    pub store_slug: Option<String>,
    #[serde(default)]
    pub products: Vec<ProductSummary>,
}

/// Build the message list: system prompt, prior history, then the new user message
pub fn build_messages(context: &StoreContext, history: &[ChatMessage], message: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system_prompt(context)));
    messages.extend(history.iter().cloned());
    messages.push(ChatMessage::user(message));
    messages
}

fn system_prompt(context: &StoreContext) -> String {
    let store = context.store_name.as_deref().unwrap_or("this store");
    let mut prompt = format!(
        "You are a helpful shopping assistant for {store}. \
         Answer questions about products, help customers find what they need, \
         and keep replies short and friendly."
    );

    if !context.products.is_empty() {
        prompt.push_str("\n\nAvailable products:");
        for product in context.products.iter().take(PROMPT_PRODUCT_LIMIT) {
            prompt.push_str("\n- ");
            prompt.push_str(&product.name);
            if let Some(price) = product.price {
                prompt.push_str(&format!(" (${price})"));
            }
            if let Some(description) = product.description.as_deref().filter(|d| !d.is_empty()) {
                prompt.push_str(": ");
                prompt.push_str(description);
            }
        }
    }

    prompt
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completion endpoint.
///
/// Stateless per call; sampling parameters are fixed by configuration.
#[derive(Clone)]
pub struct CompletionClient {
    http: Client,
    url: Url,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl CompletionClient {
    pub fn from_config(config: &AiConfig) -> Result<Self, ChatError> {
        let mut base = Url::parse(&config.base_url)?;
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path().trim_end_matches('/')));
        }

        Ok(Self {
            http: Client::builder().build()?,
            url: base.join(CHAT_COMPLETIONS_PATH)?,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.url
    }

    /// Send the conversation and return the first choice's text
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let body = CompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let mut request = self.http.post(self.url.clone()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status { status: status.as_u16(), body });
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ChatError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str) -> ProductSummary {
        ProductSummary { name: name.to_string(), price: Some(Decimal::new(1999, 2)), description: None }
    }

    #[test]
    fn messages_wrap_history_between_system_and_user() {
        let history = vec![
            ChatMessage::user("hi"),
            ChatMessage { role: "assistant".to_string(), content: "hello!".to_string() },
        ];
        let messages = build_messages(&StoreContext::default(), &history, "any mugs?");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1..3], history[..]);
        assert_eq!(messages[3], ChatMessage::user("any mugs?"));
    }

    #[test]
    fn prompt_embeds_at_most_five_products() {
        let context = StoreContext {
            store_name: Some("Acme".to_string()),
            store_slug: None,
            products: (1..=7).map(|i| product(&format!("Item {i}"))).collect(),
        };
        let prompt = system_prompt(&context);

        assert!(prompt.contains("Acme"));
        assert!(prompt.contains("- Item 5 ($19.99)"));
        assert!(!prompt.contains("Item 6"));
    }

    #[test]
    fn prompt_without_products_has_no_product_section() {
        let prompt = system_prompt(&StoreContext::default());
        assert!(!prompt.contains("Available products"));
    }

    #[test]
    fn endpoint_is_joined_onto_base_url() {
        let mut config = crate::config::AppConfig::development().ai;
        config.base_url = "http://127.0.0.1:9999/v1".to_string();
        let client = CompletionClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://127.0.0.1:9999/v1/chat/completions");
    }
}
