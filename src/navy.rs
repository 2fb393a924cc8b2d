//! HTTP client for the navy generative API.

use log::{debug, error};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{BotError, Result};

/// Model for image generation.
const IMAGE_MODEL: &str = "dall-e-3";

/// Output size requested from the image endpoint.
const IMAGE_SIZE: &str = "1024x1024";

/// Model for chat completions.
const CHAT_MODEL: &str = "gpt-4o";

/// Voice used by the text-to-speech endpoint.
const TTS_VOICE: &str = "will";

/// Canned reply used when the chat endpoint answers without any content.
const FALLBACK_REPLY: &str = "I'm not sure how to respond to that.";

/// Request payload for image generation
#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    prompt: &'a str,
    model: &'static str,
    n: u32,
    size: &'static str,
}

/// Response from the image endpoint
#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

/// One generated image in the response
#[derive(Debug, Deserialize)]
struct ImageDatum {
    #[serde(default)]
    url: Option<String>,
}

/// Request payload for speech synthesis
#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    voice: &'static str,
}

/// Request payload for chat completion
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'static str,
    messages: Vec<RequestMessage<'a>>,
}

/// Message in a chat request
#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Response from the chat endpoint
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

/// Choice in the response
#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

/// Message in the response
#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for the navy API, shared read-only across all in-flight events.
pub struct NavyClient {
    api_key: String,
    base_url: String,
    system_prompt: String,
    client: reqwest::Client,
}

impl NavyClient {
    #[must_use]
    pub fn new(api_key: String, base_url: String, system_prompt: String) -> Self {
        Self {
            api_key,
            base_url,
            system_prompt,
            client: reqwest::Client::new(),
        }
    }

    /// Generate an image and return its URL.
    pub async fn generate_image(&self, prompt: &str) -> Result<Url> {
        debug!("Requesting image generation ({} char prompt)", prompt.len());

        let request = ImageRequest {
            prompt,
            model: IMAGE_MODEL,
            n: 1,
            size: IMAGE_SIZE,
        };

        let response = self
            .client
            .post(format!("{}/v1/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
            return Err(BotError::Api { status, message });
        }

        let raw = response.text().await?;
        parse_image_response(&raw)
    }

    /// Synthesize speech and return the raw bytes of an MP3 container.
    pub async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>> {
        debug!("Requesting speech synthesis ({} char text)", text.len());

        let request = SpeechRequest {
            text,
            voice: TTS_VOICE,
        };

        let response = self
            .client
            .post(format!("{}/tts", self.base_url))
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
            return Err(BotError::Api { status, message });
        }

        let audio = response.bytes().await?;
        debug!("Received {} bytes of audio", audio.len());
        Ok(audio.to_vec())
    }

    /// Complete a chat turn: the configured system persona plus one user message.
    pub async fn chat_complete(&self, prompt: &str) -> Result<String> {
        debug!("Requesting chat completion ({} char prompt)", prompt.len());

        let request = ChatRequest {
            model: CHAT_MODEL,
            messages: vec![
                RequestMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                RequestMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
            return Err(BotError::Api { status, message });
        }

        let raw = response.text().await?;
        parse_chat_response(&raw)
    }
}

/// Extract `data[0].url` from an image generation response body.
fn parse_image_response(raw: &str) -> Result<Url> {
    let parsed: ImageResponse =
        serde_json::from_str(raw).map_err(|e| BotError::MalformedResponse(e.to_string()))?;

    let url = parsed
        .data
        .first()
        .and_then(|datum| datum.url.as_deref())
        .ok_or(BotError::MissingField("data[0].url"))?;

    Ok(Url::parse(url)?)
}

/// Extract `choices[0].message.content` from a chat completion response body.
///
/// The body arrives as raw text so that an unparseable payload can be logged
/// verbatim for diagnosis. A well-formed body with no content is not an
/// error; it yields the canned fallback reply.
fn parse_chat_response(raw: &str) -> Result<String> {
    let parsed: ChatResponse = match serde_json::from_str(raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!("Chat completion body is not valid JSON: {}", raw);
            return Err(BotError::MalformedResponse(e.to_string()));
        }
    };

    Ok(parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_else(|| FALLBACK_REPLY.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_response_yields_url() -> Result<()> {
        let raw = r#"{"data":[{"url":"https://cdn.example.com/img/abc.png"}]}"#;
        let url = parse_image_response(raw)?;
        assert_eq!(url.as_str(), "https://cdn.example.com/img/abc.png");
        Ok(())
    }

    #[test]
    fn image_response_without_url_is_missing_field() {
        let raw = r#"{"data":[{"revised_prompt":"a cat"}]}"#;
        assert!(matches!(
            parse_image_response(raw),
            Err(BotError::MissingField("data[0].url"))
        ));
    }

    #[test]
    fn image_response_with_empty_data_is_missing_field() {
        assert!(matches!(
            parse_image_response(r#"{"data":[]}"#),
            Err(BotError::MissingField("data[0].url"))
        ));
        assert!(matches!(
            parse_image_response("{}"),
            Err(BotError::MissingField("data[0].url"))
        ));
    }

    #[test]
    fn image_response_with_bad_url_is_invalid_url() {
        let raw = r#"{"data":[{"url":"not a url"}]}"#;
        assert!(matches!(
            parse_image_response(raw),
            Err(BotError::InvalidUrl(_))
        ));
    }

    #[test]
    fn unparseable_image_body_is_malformed() {
        assert!(matches!(
            parse_image_response("<html>bad gateway</html>"),
            Err(BotError::MalformedResponse(_))
        ));
    }

    #[test]
    fn chat_response_yields_content() -> Result<()> {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"4"}}]}"#;
        assert_eq!(parse_chat_response(raw)?, "4");
        Ok(())
    }

    #[test]
    fn chat_response_without_content_yields_fallback() -> Result<()> {
        let raw = r#"{"choices":[{"message":{"role":"assistant"}}]}"#;
        assert_eq!(parse_chat_response(raw)?, FALLBACK_REPLY);

        let raw = r#"{"choices":[]}"#;
        assert_eq!(parse_chat_response(raw)?, FALLBACK_REPLY);
        Ok(())
    }

    #[test]
    fn unparseable_chat_body_is_malformed() {
        assert!(matches!(
            parse_chat_response("upstream exploded"),
            Err(BotError::MalformedResponse(_))
        ));
    }
}
