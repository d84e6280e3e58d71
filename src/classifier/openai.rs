//! Classifier backed by an OpenAI-compatible chat-completions endpoint.
//!
//! The model is asked for a strict JSON-schema answer whose field names match
//! [`Classification`], so the reply content deserializes directly.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, instrument};

use super::{Classification, ClassifyError, Classifier};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f32 = 0.3;

const SYSTEM_PROMPT: &str =
    "You are an expert in anime plots. Answer precisely and only in the requested structure.";

pub struct OpenAiClassifier {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: Value,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl OpenAiClassifier {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, title: &str, description: &str) -> ChatRequest<'_> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(title, description),
                },
            ],
            temperature: TEMPERATURE,
            response_format: response_schema(),
        }
    }
}

#[async_trait]
impl Classifier for OpenAiClassifier {
    #[instrument(skip(self, description), fields(model = %self.model))]
    async fn classify(
        &self,
        title: &str,
        description: &str,
    ) -> Result<Classification, ClassifyError> {
        let api_key = self.api_key.as_deref().ok_or(ClassifyError::MissingApiKey)?;

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&self.request_body(title, description))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|parsed| parsed.error.message)
                .unwrap_or(body);
            return Err(ClassifyError::Http { status, message });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ClassifyError::EmptyResponse)?;

        debug!(answer = %content, "model answered");
        Ok(serde_json::from_str(&content)?)
    }
}

fn build_prompt(title: &str, description: &str) -> String {
    format!(
        "Read the anime description and answer the questions.\n\n\
         Title: {title}\n\n\
         Description: {description}\n\n\
         1. heroGender: the gender of the lead character. \"male\" for a boy or man, \
         \"female\" for a girl or woman, \"unknown\" when unclear, when there are several \
         leads of different genders, or when there is not enough information.\n\
         2. violence: \"yes\" ONLY if battles, killings, wars, combat or physical violence \
         are explicitly mentioned. A death, tragedy, illness or accident without violence \
         is \"no\".\n\
         3. mystical: \"yes\" if magic, the supernatural, mysticism or sorcery is mentioned, \
         otherwise \"no\".\n\
         4. romanceFocus: \"yes\" if the development of a romantic relationship is the MAIN \
         focus of the plot; \"no\" if the core is career, hobby, sport, work, study or \
         adventure and romance stays in the background.\n\
         5. approximateAge: the age of the lead if the description states it. Otherwise \
         estimate it as a number or a range such as \"18-25\" from the plot, the characters' \
         actions, and whether they work, go to school or attend university."
    )
}

fn response_schema() -> Value {
    let answer = json!({"type": "string", "enum": ["yes", "no"]});
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "anime_classification",
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "heroGender": {"type": "string", "enum": ["male", "female", "unknown"]},
                    "violence": answer,
                    "mystical": answer,
                    "romanceFocus": answer,
                    "approximateAge": {"type": "string"}
                },
                "required": ["heroGender", "violence", "mystical", "romanceFocus", "approximateAge"],
                "additionalProperties": false
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let classifier = OpenAiClassifier::new(Some("key".to_string())).with_model("test-model");
        let body = serde_json::to_value(classifier.request_body("Монстр", "Врач спасает мальчика."))
            .unwrap();

        assert_eq!(body["model"], "test-model");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        let prompt = body["messages"][1]["content"].as_str().unwrap();
        assert!(prompt.contains("Title: Монстр"));
        assert!(prompt.contains("Description: Врач спасает мальчика."));
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(
            body["response_format"]["json_schema"]["schema"]["required"]
                .as_array()
                .unwrap()
                .len(),
            5
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let classifier = OpenAiClassifier::new(None).with_base_url("http://localhost:1234/v1/");
        assert_eq!(classifier.base_url, "http://localhost:1234/v1");
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let classifier = OpenAiClassifier::new(None).with_base_url("http://127.0.0.1:9");
        let err = classifier.classify("t", "d").await.unwrap_err();
        assert!(matches!(err, ClassifyError::MissingApiKey));
    }
}
