//! OpenAI-backed [`Advisor`] implementation.
//!
//! All four advisory operations go through the Chat Completions API. The
//! structured operations request `json_object` output and run the result
//! through the lenient `Raw*` deserializers in [`types`](super::types).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::config::OpenAiConfig;

use super::error::AiError;
use super::types::{
    ChatTurn, DepositCalcRequest, DepositPlan, EstimateRequest, ProductRecommendations,
    ProjectEstimate, RawDepositPlan, RawProductRecommendations, RawProjectEstimate,
    RecommendationRequest,
};
use super::Advisor;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Number of prior exchanges replayed to the model per chat request.
const CHAT_HISTORY_WINDOW: usize = 10;

const CHAT_SYSTEM_PROMPT: &str = "You are the assistant for Sterling Contractors, a Uganda-based \
construction company and hardware supplier. Help visitors with construction questions, product \
selection, and project planning. Be concise and practical. If asked about pricing or timelines, \
give realistic ranges and suggest contacting the team for a firm quote.";

/// OpenAI Chat Completions client.
#[derive(Clone)]
pub struct OpenAiAdvisor {
    inner: Arc<OpenAiAdvisorInner>,
}

struct OpenAiAdvisorInner {
    client: reqwest::Client,
    model: String,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format: &'static str,
}

#[derive(Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(rename = "type", default)]
    error_type: Option<String>,
    message: String,
}

impl OpenAiAdvisor {
    /// Create a new client.
    ///
    /// # Panics
    ///
    /// Panics if the API key contains invalid header characters.
    #[must_use]
    pub fn new(config: &OpenAiConfig) -> Self {
        let api_key = config.api_key.expose_secret();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .expect("Invalid API key for header"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(OpenAiAdvisorInner {
                client,
                model: config.model.clone(),
            }),
        }
    }

    #[instrument(skip(self, messages), fields(model = %self.inner.model))]
    async fn complete(
        &self,
        messages: Vec<WireMessage>,
        json_output: bool,
    ) -> Result<String, AiError> {
        let request = CompletionRequest {
            model: &self.inner.model,
            max_tokens: DEFAULT_MAX_TOKENS,
            messages,
            response_format: json_output.then_some(ResponseFormat {
                format: "json_object",
            }),
        };

        let response = self
            .inner
            .client
            .post(OPENAI_API_URL)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(handle_error_status(status, response).await);
        }

        let body: CompletionResponse = {
            let text = response.text().await?;
            serde_json::from_str(&text)
                .map_err(|e| AiError::Parse(format!("Failed to parse response envelope: {e}")))?
        };

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AiError::Parse("completion contained no content".to_owned()))
    }

    async fn complete_as<T: DeserializeOwned>(
        &self,
        system: &str,
        user: String,
    ) -> Result<T, AiError> {
        let content = self
            .complete(
                vec![
                    WireMessage {
                        role: "system",
                        content: system.to_owned(),
                    },
                    WireMessage {
                        role: "user",
                        content: user,
                    },
                ],
                true,
            )
            .await?;

        serde_json::from_str(&content)
            .map_err(|e| AiError::Parse(format!("Completion was not the expected JSON: {e}")))
    }
}

async fn handle_error_status(status: reqwest::StatusCode, response: reqwest::Response) -> AiError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return AiError::RateLimited(retry_after);
    }

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return AiError::Unauthorized;
    }

    match response.text().await {
        Ok(body) => {
            if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                AiError::Api {
                    error_type: api_error
                        .error
                        .error_type
                        .unwrap_or_else(|| "unknown".to_owned()),
                    message: api_error.error.message,
                }
            } else {
                AiError::Api {
                    error_type: "unknown".to_owned(),
                    message: body,
                }
            }
        }
        Err(e) => AiError::Http(e),
    }
}

fn optional(label: &str, value: Option<&str>) -> String {
    value.map_or_else(String::new, |v| format!("\n{label}: {v}"))
}

#[async_trait]
impl Advisor for OpenAiAdvisor {
    async fn project_estimate(
        &self,
        request: EstimateRequest,
    ) -> Result<ProjectEstimate, AiError> {
        let system = "You are a construction cost estimator for the Ugandan market. Respond with \
a JSON object: estimatedCost (number, USD), breakdown (array of {item, cost}), confidence \
(0 to 1), timeline (string), recommendations (array of strings).";
        let user = format!(
            "Estimate this project.\nType: {}\nDescription: {}{}{}{}",
            request.project_type,
            request.description,
            optional("Size", request.size.as_deref()),
            optional("Location", request.location.as_deref()),
            optional("Timeline", request.timeline.as_deref()),
        );

        let raw: RawProjectEstimate = self.complete_as(system, user).await?;
        Ok(raw.coerce())
    }

    async fn product_recommendations(
        &self,
        request: RecommendationRequest,
    ) -> Result<ProductRecommendations, AiError> {
        let system = "You recommend construction materials and hardware for projects. Respond \
with a JSON object: recommendations (array of {name, reason}), totalEstimatedCost (number, USD).";
        let budget = request.budget.map(|b| b.to_string());
        let user = format!(
            "Recommend products for this project.\nType: {}{}{}",
            request.project_type,
            optional("Budget", budget.as_deref()),
            optional("Preferences", request.preferences.as_deref()),
        );

        let raw: RawProductRecommendations = self.complete_as(system, user).await?;
        Ok(raw.coerce())
    }

    async fn chat_reply(&self, message: &str, history: &[ChatTurn]) -> Result<String, AiError> {
        let mut messages = vec![WireMessage {
            role: "system",
            content: CHAT_SYSTEM_PROMPT.to_owned(),
        }];

        let start = history.len().saturating_sub(CHAT_HISTORY_WINDOW);
        for turn in &history[start..] {
            messages.push(WireMessage {
                role: "user",
                content: turn.message.clone(),
            });
            messages.push(WireMessage {
                role: "assistant",
                content: turn.response.clone(),
            });
        }
        messages.push(WireMessage {
            role: "user",
            content: message.to_owned(),
        });

        self.complete(messages, false).await
    }

    async fn deposit_plan(&self, request: DepositCalcRequest) -> Result<DepositPlan, AiError> {
        let system = "You advise on construction project deposits. Respond with a JSON object: \
recommendedDeposit (number, same currency as the budget), percentage (number), reasoning \
(string), paymentSchedule (array of {milestone, amount}).";
        let user = format!(
            "Suggest a deposit plan.\nProject type: {}\nBudget: {}{}{}",
            request.project_type,
            request.budget,
            optional("Complexity", request.complexity.as_deref()),
            optional("Timeline", request.timeline.as_deref()),
        );

        let raw: RawDepositPlan = self.complete_as(system, user).await?;
        raw.coerce()
            .ok_or_else(|| AiError::Parse("deposit plan had no usable amount".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_formats_label() {
        assert_eq!(optional("Size", Some("200sqm")), "\nSize: 200sqm");
        assert_eq!(optional("Size", None), "");
    }

    #[test]
    fn test_advisor_is_clone_send_sync() {
        fn assert_clone<T: Clone>() {}
        fn assert_send_sync<T: Send + Sync>() {}
        assert_clone::<OpenAiAdvisor>();
        assert_send_sync::<OpenAiAdvisor>();
    }

    #[test]
    fn test_json_request_shape() {
        let request = CompletionRequest {
            model: "gpt-4o",
            max_tokens: DEFAULT_MAX_TOKENS,
            messages: vec![WireMessage {
                role: "user",
                content: "hi".to_owned(),
            }],
            response_format: Some(ResponseFormat {
                format: "json_object",
            }),
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
