use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::config::CONFIG;
use crate::llm::error::{classify_api_error, StudioError};
use crate::llm::media::{GeneratedImage, ImageFile};
use crate::utils::http::get_http_client;
use crate::utils::timing::log_llm_timing;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    parts: Option<Vec<GeminiPart>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct ImagenResponse {
    predictions: Option<Vec<ImagenPrediction>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImagenPrediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
    rai_filtered_reason: Option<String>,
}

const SAFETY_FINISH_REASONS: [&str; 8] = [
    "SAFETY",
    "IMAGE_SAFETY",
    "PROHIBITED_CONTENT",
    "IMAGE_PROHIBITED_CONTENT",
    "BLOCKLIST",
    "SPII",
    "RECITATION",
    "IMAGE_RECITATION",
];

fn build_safety_settings() -> Vec<Value> {
    let threshold = match CONFIG.gemini_safety_settings.as_str() {
        "standard" => "BLOCK_MEDIUM_AND_ABOVE",
        _ => "OFF",
    };

    vec![
        json!({ "category": "HARM_CATEGORY_HARASSMENT", "threshold": threshold }),
        json!({ "category": "HARM_CATEGORY_HATE_SPEECH", "threshold": threshold }),
        json!({ "category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": threshold }),
        json!({ "category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": threshold }),
    ]
}

pub fn text_part(text: &str) -> Value {
    json!({ "text": text })
}

pub fn inline_image_part(image: &ImageFile) -> Value {
    json!({
        "inlineData": {
            "mimeType": image.mime_type,
            "data": image.base64()
        }
    })
}

fn truncate_for_log(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}... (truncated)")
}

fn summarize_parts(parts: &[Value]) -> Vec<Value> {
    parts
        .iter()
        .map(|part| {
            if let Some(text) = part.get("text").and_then(|value| value.as_str()) {
                json!({ "text": truncate_for_log(text, 200) })
            } else if let Some(inline_data) = part.get("inlineData") {
                let mime_type = inline_data
                    .get("mimeType")
                    .and_then(|value| value.as_str())
                    .unwrap_or("unknown");
                let data_len = inline_data
                    .get("data")
                    .and_then(|value| value.as_str())
                    .map(|value| value.len())
                    .unwrap_or(0);
                json!({ "inlineData": { "mimeType": mime_type, "dataLen": data_len } })
            } else {
                json!({ "unknownPart": true })
            }
        })
        .collect()
}

fn summarize_payload(payload: &Value) -> Value {
    let mut summary = Map::new();

    if let Some(contents) = payload.get("contents").and_then(|value| value.as_array()) {
        let summarized = contents
            .iter()
            .map(|content| {
                let parts = content
                    .get("parts")
                    .and_then(|value| value.as_array())
                    .map(|parts| summarize_parts(parts))
                    .unwrap_or_default();
                json!({ "parts": parts })
            })
            .collect::<Vec<_>>();
        summary.insert("contents".to_string(), Value::Array(summarized));
    }

    if let Some(config) = payload.get("generationConfig") {
        let mut config = config.clone();
        if let Some(object) = config.as_object_mut() {
            if object.remove("responseSchema").is_some() {
                object.insert("responseSchema".to_string(), json!("<schema>"));
            }
        }
        summary.insert("generationConfig".to_string(), config);
    }

    if let Some(instances) = payload.get("instances") {
        summary.insert("instances".to_string(), instances.clone());
    }

    Value::Object(summary)
}

impl GeminiResponse {
    fn first_candidate(&self) -> Option<&GeminiCandidate> {
        self.candidates.as_deref().and_then(|candidates| candidates.first())
    }

    /// A prompt-level block or a safety-type stop reason. Other stop reasons
    /// such as `MAX_TOKENS` fall through to the empty or unreadable checks.
    pub fn block_reason(&self) -> Option<String> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.clone())
        {
            return Some(reason);
        }
        let reason = self.first_candidate()?.finish_reason.as_deref()?;
        SAFETY_FINISH_REASONS
            .contains(&reason)
            .then(|| reason.to_string())
    }

    pub fn text(&self) -> String {
        let mut text_parts = Vec::new();
        for candidate in self.candidates.as_deref().unwrap_or(&[]) {
            let parts = candidate
                .content
                .as_ref()
                .and_then(|content| content.parts.as_deref())
                .unwrap_or(&[]);
            for part in parts {
                if let GeminiPart::Text { text } = part {
                    if !text.trim().is_empty() {
                        text_parts.push(text.as_str());
                    }
                }
            }
        }
        text_parts.join("\n")
    }

    pub fn images(&self) -> Vec<GeneratedImage> {
        let mut images = Vec::new();
        let Some(candidate) = self.first_candidate() else {
            return images;
        };
        let parts = candidate
            .content
            .as_ref()
            .and_then(|content| content.parts.as_deref())
            .unwrap_or(&[]);
        for part in parts {
            if let GeminiPart::InlineData { inline_data } = part {
                if let Some(image) =
                    GeneratedImage::from_base64(&inline_data.data, &inline_data.mime_type)
                {
                    images.push(image);
                }
            }
        }
        images
    }

    fn summary(&self) -> Value {
        json!({
            "candidates": self.candidates.as_ref().map(|candidates| candidates.len()).unwrap_or(0),
            "finishReason": self.first_candidate().and_then(|candidate| candidate.finish_reason.clone()),
            "textPreview": truncate_for_log(&self.text(), 200),
        })
    }
}

/// Strips a Markdown code fence some models wrap around JSON output.
fn strip_json_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

pub fn parse_json_text<T: DeserializeOwned>(text: &str) -> Result<T, StudioError> {
    let body = strip_json_fence(text);
    if body.is_empty() {
        return Err(StudioError::EmptyResult(
            "The AI returned an empty response.".to_string(),
        ));
    }
    serde_json::from_str(body).map_err(|err| StudioError::InvalidResponse(err.to_string()))
}

async fn post_json(url: &str, payload: &Value) -> Result<reqwest::Response, StudioError> {
    if !CONFIG.has_api_key() {
        return Err(StudioError::MissingApiKey);
    }
    send_request(
        get_http_client(),
        url,
        &CONFIG.gemini_api_key,
        Duration::from_secs(CONFIG.gemini_timeout_seconds),
        payload,
    )
    .await
}

/// Sends exactly once. Failures are returned to the caller as they are.
async fn send_request(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    timeout: Duration,
    payload: &Value,
) -> Result<reqwest::Response, StudioError> {
    let response = client
        .post(url)
        .header("x-goog-api-key", api_key)
        .timeout(timeout)
        .json(payload)
        .send()
        .await
        .map_err(|err| {
            warn!(
                "Gemini request failed to send: {} (timeout={}, connect={})",
                err,
                err.is_timeout(),
                err.is_connect()
            );
            StudioError::Network(err.to_string())
        })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(
        "Gemini API error: status={}, body={}",
        status,
        truncate_for_log(&body, 2000)
    );
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(StudioError::RateLimited);
    }
    Err(classify_api_error(&body))
}

async fn call_generate_content(
    model: &str,
    payload: Value,
    operation: &str,
) -> Result<GeminiResponse, StudioError> {
    let url = format!("{}/models/{}:generateContent", CONFIG.gemini_base_url, model);

    if tracing::enabled!(tracing::Level::DEBUG) {
        debug!(target: "llm.gemini", model = model, operation = operation, payload = %summarize_payload(&payload));
    }

    log_llm_timing("gemini", model, operation, None, || async {
        let response = post_json(&url, &payload).await?;
        let value = response
            .json::<GeminiResponse>()
            .await
            .map_err(|err| StudioError::InvalidResponse(err.to_string()))?;
        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(target: "llm.gemini", model = model, response = %value.summary());
        }
        Ok(value)
    })
    .await
}

/// Sends parts to a text model and parses the constrained JSON answer.
pub async fn generate_json<T: DeserializeOwned>(
    model: &str,
    parts: Vec<Value>,
    response_schema: Value,
    operation: &str,
) -> Result<T, StudioError> {
    let payload = json!({
        "contents": [{ "role": "user", "parts": parts }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema,
        },
        "safetySettings": build_safety_settings(),
    });

    let response = call_generate_content(model, payload, operation).await?;
    if let Some(reason) = response.block_reason() {
        return Err(StudioError::Blocked { reason });
    }
    parse_json_text(&response.text())
}

/// Sends parts to an image model and returns the inline images of the first candidate.
pub async fn generate_images(
    model: &str,
    parts: Vec<Value>,
    operation: &str,
    empty_message: &str,
) -> Result<Vec<GeneratedImage>, StudioError> {
    let payload = json!({
        "contents": [{ "role": "user", "parts": parts }],
        "generationConfig": { "responseModalities": ["IMAGE"] },
        "safetySettings": build_safety_settings(),
    });

    let response = call_generate_content(model, payload, operation).await?;
    images_from_response(&response, empty_message)
}

fn images_from_response(
    response: &GeminiResponse,
    empty_message: &str,
) -> Result<Vec<GeneratedImage>, StudioError> {
    if let Some(reason) = response.block_reason() {
        return Err(StudioError::Blocked { reason });
    }
    let images = response.images();
    if images.is_empty() {
        return Err(StudioError::EmptyResult(empty_message.to_string()));
    }
    Ok(images)
}

/// Imagen accepts fewer aspect ratios than the export presets offer.
pub fn imagen_aspect_ratio(aspect_ratio: &str) -> &'static str {
    match aspect_ratio {
        "16:9" => "16:9",
        "9:16" => "9:16",
        "4:5" => "3:4",
        "3:2" => "4:3",
        _ => "1:1",
    }
}

/// Text-to-image through the Imagen `predict` endpoint.
pub async fn predict_images(
    model: &str,
    prompt: &str,
    sample_count: u32,
    aspect_ratio: &str,
) -> Result<Vec<GeneratedImage>, StudioError> {
    let url = format!("{}/models/{}:predict", CONFIG.gemini_base_url, model);
    let payload = json!({
        "instances": [{ "prompt": prompt }],
        "parameters": {
            "sampleCount": sample_count,
            "aspectRatio": imagen_aspect_ratio(aspect_ratio),
            "outputOptions": { "mimeType": "image/jpeg" },
        },
    });

    if tracing::enabled!(tracing::Level::DEBUG) {
        debug!(target: "llm.gemini", model = model, payload = %summarize_payload(&payload));
    }

    let response = log_llm_timing("imagen", model, "predict_images", None, || async {
        let response = post_json(&url, &payload).await?;
        response
            .json::<ImagenResponse>()
            .await
            .map_err(|err| StudioError::InvalidResponse(err.to_string()))
    })
    .await?;

    imagen_images(response)
}

fn imagen_images(response: ImagenResponse) -> Result<Vec<GeneratedImage>, StudioError> {
    let predictions = response.predictions.unwrap_or_default();
    let mut filtered_reason = None;
    let mut images = Vec::new();
    for prediction in predictions {
        match prediction.bytes_base64_encoded.as_deref() {
            Some(data) => {
                let mime_type = prediction.mime_type.as_deref().unwrap_or("image/jpeg");
                if let Some(image) = GeneratedImage::from_base64(data, mime_type) {
                    images.push(image);
                }
            }
            None => {
                if prediction.rai_filtered_reason.is_some() {
                    filtered_reason = prediction.rai_filtered_reason;
                }
            }
        }
    }

    if images.is_empty() {
        if let Some(reason) = filtered_reason {
            return Err(StudioError::Blocked { reason });
        }
        return Err(StudioError::EmptyResult(
            "Generation succeeded, but the AI did not return any images.".to_string(),
        ));
    }
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose, Engine as _};

    fn response(value: Value) -> GeminiResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn safety_finish_reason_blocks() {
        let parsed = response(json!({
            "candidates": [{ "finishReason": "IMAGE_SAFETY", "content": { "parts": [] } }]
        }));
        let err = images_from_response(&parsed, "none").unwrap_err();
        assert_eq!(
            err,
            StudioError::Blocked {
                reason: "IMAGE_SAFETY".to_string()
            }
        );
    }

    #[test]
    fn non_safety_finish_reasons_are_not_blocks() {
        let parsed = response(json!({
            "candidates": [{ "finishReason": "MAX_TOKENS", "content": { "parts": [{ "text": "[\"hero" }] } }]
        }));
        assert_eq!(parsed.block_reason(), None);
        let err = images_from_response(&parsed, "no image was returned").unwrap_err();
        assert_eq!(err, StudioError::EmptyResult("no image was returned".to_string()));
        assert!(matches!(
            parse_json_text::<Vec<String>>(&parsed.text()).unwrap_err(),
            StudioError::InvalidResponse(_)
        ));
    }

    #[test]
    fn single_request_on_server_error() {
        use std::io::{Read, Write};
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let server_hits = hits.clone();
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                server_hits.fetch_add(1, Ordering::SeqCst);
                let mut request = Vec::new();
                let mut buffer = [0u8; 4096];
                loop {
                    let read = stream.read(&mut buffer).unwrap_or(0);
                    if read == 0 {
                        break;
                    }
                    request.extend_from_slice(&buffer[..read]);
                    let text = String::from_utf8_lossy(&request).to_string();
                    if let Some(header_end) = text.find("\r\n\r\n") {
                        let length = text[..header_end]
                            .lines()
                            .find_map(|line| {
                                let (name, value) = line.split_once(':')?;
                                name.eq_ignore_ascii_case("content-length")
                                    .then(|| value.trim().parse::<usize>().ok())
                                    .flatten()
                            })
                            .unwrap_or(0);
                        if request.len() >= header_end + 4 + length {
                            break;
                        }
                    }
                }
                let body = r#"{"error":{"code":500,"message":"boom"}}"#;
                let reply = format!(
                    "HTTP/1.1 500 Internal Server Error\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                stream.write_all(reply.as_bytes()).ok();
            }
        });

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let err = runtime.block_on(async {
            let client = reqwest::Client::builder().no_proxy().build().unwrap();
            send_request(
                &client,
                &format!("http://{address}/models/test:generateContent"),
                "test-key",
                Duration::from_secs(5),
                &json!({ "contents": [] }),
            )
            .await
            .unwrap_err()
        });

        assert_eq!(
            err,
            StudioError::Api {
                message: "AI Error: boom".to_string()
            }
        );
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn prompt_feedback_block_is_reported() {
        let parsed = response(json!({ "promptFeedback": { "blockReason": "PROHIBITED_CONTENT" } }));
        assert_eq!(parsed.block_reason().as_deref(), Some("PROHIBITED_CONTENT"));
    }

    #[test]
    fn stop_without_images_is_an_empty_result() {
        let parsed = response(json!({
            "candidates": [{ "finishReason": "STOP", "content": { "parts": [{ "text": "I cannot draw that." }] } }]
        }));
        let err = images_from_response(&parsed, "no image was returned").unwrap_err();
        assert_eq!(err, StudioError::EmptyResult("no image was returned".to_string()));
    }

    #[test]
    fn inline_images_are_decoded() {
        let data = general_purpose::STANDARD.encode(b"\x89PNG\r\n\x1a\nrest");
        let parsed = response(json!({
            "candidates": [{
                "finishReason": "STOP",
                "content": { "parts": [
                    { "text": "Here you go" },
                    { "inlineData": { "mimeType": "image/png", "data": data } }
                ] }
            }]
        }));
        let images = images_from_response(&parsed, "none").unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].mime_type, "image/png");
        assert_eq!(parsed.text(), "Here you go");
    }

    #[test]
    fn json_text_tolerates_code_fences() {
        let value: Vec<String> = parse_json_text("```json\n[\"hero-45\", \"levitation\"]\n```").unwrap();
        assert_eq!(value, vec!["hero-45".to_string(), "levitation".to_string()]);
        let err = parse_json_text::<Vec<String>>("   ").unwrap_err();
        assert!(matches!(err, StudioError::EmptyResult(_)));
        let err = parse_json_text::<Vec<String>>("not json").unwrap_err();
        assert!(matches!(err, StudioError::InvalidResponse(_)));
    }

    #[test]
    fn imagen_filtered_predictions_are_blocked() {
        let parsed: ImagenResponse = serde_json::from_value(json!({
            "predictions": [{ "raiFilteredReason": "Filtered for safety" }]
        }))
        .unwrap();
        let err = imagen_images(parsed).unwrap_err();
        assert!(matches!(err, StudioError::Blocked { .. }));

        let parsed: ImagenResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(imagen_images(parsed).unwrap_err(), StudioError::EmptyResult(_)));
    }

    #[test]
    fn unsupported_imagen_ratios_are_mapped() {
        assert_eq!(imagen_aspect_ratio("4:5"), "3:4");
        assert_eq!(imagen_aspect_ratio("3:2"), "4:3");
        assert_eq!(imagen_aspect_ratio("16:9"), "16:9");
    }

    #[test]
    fn payload_summary_hides_image_data() {
        let payload = json!({
            "contents": [{ "parts": [{ "inlineData": { "mimeType": "image/png", "data": "QUJD" } }] }],
            "generationConfig": { "responseSchema": { "type": "ARRAY" } }
        });
        let summary = summarize_payload(&payload);
        assert_eq!(summary["contents"][0]["parts"][0]["inlineData"]["dataLen"], 4);
        assert_eq!(summary["generationConfig"]["responseSchema"], "<schema>");
    }
}
