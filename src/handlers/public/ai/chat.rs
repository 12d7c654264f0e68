// handlers/public/ai/chat.rs - POST /api/ai/chat handler

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::database::models::ProductQuery;
use crate::error::ApiError;
use crate::middleware::request::required;
use crate::middleware::{ApiResponse, ApiResult, Validate, ValidJson};
use crate::services::chat::{build_messages, ChatMessage, ProductSummary, StoreContext, PROMPT_PRODUCT_LIMIT};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(default)]
    pub store_context: Option<StoreContext>,
    #[serde(default)]
    pub conversation_history: Option<Vec<ChatMessage>>,
}

pub struct ChatInput {
    message: String,
    context: StoreContext,
    history: Vec<ChatMessage>,
}

impl Validate for ChatRequest {
    type Output = ChatInput;

    fn validate(self) -> Result<ChatInput, ApiError> {
        Ok(ChatInput {
            message: required(self.message, "message")?,
            context: self.store_context.unwrap_or_default(),
            history: self.conversation_history.unwrap_or_default(),
        })
    }
}

#[derive(Serialize)]
pub struct ChatReply {
    pub response: String,
}

/// POST /api/ai/chat - Ask the store assistant a question
///
/// Expected Input:
/// ```json
/// {
///   "message": "Do you have any mugs?",
///   "storeContext": {                       // optional
///     "storeName": "Acme",
///     "storeSlug": "acme",
///     "products": [{ "name": "Mug", "price": "12.00" }]
///   },
///   "conversationHistory": [                // optional
///     { "role": "user", "content": "hi" },
///     { "role": "assistant", "content": "Hello!" }
///   ]
/// }
/// ```
///
/// When `storeContext` names a store but carries no products, up to five of
/// the store's active products are loaded for the prompt.
///
/// Output: `{ "success": true, "data": { "response": "..." } }`
pub async fn chat_post(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<ChatRequest>,
) -> ApiResult<ChatReply> {
    let ChatInput {
        message,
        mut context,
        history,
    } = input;

    if context.products.is_empty() {
        if let Some(slug) = context.store_slug.clone() {
            load_store_products(&state, &slug, &mut context).await?;
        }
    }

    let messages = build_messages(&context, &history, &message);
    let response = state.chat().complete(&messages).await?;

    Ok(ApiResponse::success(ChatReply { response }))
}

async fn load_store_products(state: &AppState, slug: &str, context: &mut StoreContext) -> Result<(), ApiError> {
    let Some(store) = state.gateway().find_store_by_slug(slug).await?.filter(|s| s.is_active) else {
        tracing::debug!("Chat context names unknown store '{}'", slug);
        return Ok(());
    };

    let query = ProductQuery {
        limit: PROMPT_PRODUCT_LIMIT as i64,
        ..ProductQuery::default()
    };
    let products = state.gateway().list_products(store.id, &query).await?;

    context.products = products.iter().map(ProductSummary::from).collect();
    context.store_name.get_or_insert(store.name);
    Ok(())
}
