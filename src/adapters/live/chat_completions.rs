//! Live adapter for OpenAI-compatible chat completion endpoints.

use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::error::NamingError;
use crate::ports::vision_namer::{NamingRequest, SuggestFuture, VisionNamer};

/// Live namer that posts a vision chat request to a configured endpoint.
pub struct ChatCompletionsNamer {
    client: Client,
    api_url: String,
    api_key: String,
}

impl ChatCompletionsNamer {
    /// Create a namer for the given endpoint and API key.
    #[must_use]
    pub fn new(api_url: String, api_key: String) -> Self {
        Self::with_client(Client::new(), api_url, api_key)
    }

    /// Create a namer that sends through an already configured client.
    #[must_use]
    pub fn with_client(client: Client, api_url: String, api_key: String) -> Self {
        Self { client, api_url, api_key }
    }
}

/// JSON body for a single-message vision request with a low-detail image.
pub(crate) fn request_body(request: &NamingRequest) -> serde_json::Value {
    serde_json::json!({
        "model": request.model,
        "messages": [{
            "role": "user",
            "content": [
                { "type": "text", "text": request.prompt },
                { "type": "image_url", "image_url": { "url": request.data_uri, "detail": "low" } }
            ]
        }],
        "max_tokens": request.max_tokens,
    })
}

/// Pull `choices[0].message.content` out of a response body, trimmed.
///
/// A missing or non-string content yields an empty string.
pub(crate) fn extract_content(response_text: &str) -> Result<String, NamingError> {
    let parsed: ChatResponse = serde_json::from_str(response_text).map_err(|e| {
        NamingError::Api { status: 200, body: format!("Failed to parse response: {e}") }
    })?;
    Ok(parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .map(|content| content.trim().to_string())
        .unwrap_or_default())
}

impl VisionNamer for ChatCompletionsNamer {
    fn suggest_name(
        &self,
        request: &NamingRequest,
        cancel: CancellationToken,
    ) -> SuggestFuture<'_> {
        let body = request_body(request);
        Box::pin(async move {
            let call = async {
                let response = self
                    .client
                    .post(&self.api_url)
                    .header("Authorization", format!("Bearer {}", self.api_key))
                    .json(&body)
                    .send()
                    .await?;

                let status = response.status();
                let response_text = response.text().await?;
                tracing::debug!(status = status.as_u16(), "naming API responded");

                if !status.is_success() {
                    return Err(NamingError::Api { status: status.as_u16(), body: response_text });
                }
                extract_content(&response_text)
            };

            // Dropping `call` here aborts the request and releases its connection.
            tokio::select! {
                biased;
                () = cancel.cancelled() => Err(NamingError::Cancelled),
                result = call => result,
            }
        })
    }
}

// --- Chat completion response types ---

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_matches_wire_format() {
        let request = NamingRequest::new("gpt-4o", "Name this", "data:image/jpeg;base64,AA==".into());
        let body = request_body(&request);
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 50);
        assert_eq!(body["messages"][0]["role"], "user");
        let content = &body["messages"][0]["content"];
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[0]["text"], "Name this");
        assert_eq!(content[1]["type"], "image_url");
        assert_eq!(content[1]["image_url"]["url"], "data:image/jpeg;base64,AA==");
        assert_eq!(content[1]["image_url"]["detail"], "low");
    }

    #[test]
    fn extracts_trimmed_content() {
        let text = r#"{"choices":[{"message":{"role":"assistant","content":"  red-car \n"}}]}"#;
        assert_eq!(extract_content(text).unwrap(), "red-car");
    }

    #[test]
    fn missing_content_is_empty() {
        assert_eq!(extract_content(r#"{"choices":[]}"#).unwrap(), "");
        assert_eq!(extract_content(r"{}").unwrap(), "");
        assert_eq!(extract_content(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap(), "");
        assert_eq!(extract_content(r#"{"choices":[{}]}"#).unwrap(), "");
    }

    #[test]
    fn malformed_json_is_api_error() {
        assert!(matches!(extract_content("not json"), Err(NamingError::Api { status: 200, .. })));
    }

    #[tokio::test]
    async fn cancelled_token_aborts_before_connecting() {
        // Unroutable address; the pre-cancelled token must win the select.
        let namer = ChatCompletionsNamer::new("http://10.255.255.1/v1".into(), "key".into());
        let request = NamingRequest::new("gpt-4o", "p", String::new());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = namer.suggest_name(&request, cancel).await;
        assert!(matches!(result, Err(NamingError::Cancelled)));
    }

    /// Serve one HTTP exchange on loopback; yields the raw request text.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/v1/chat/completions", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "client closed before sending a full request");
                raw.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())?
                        })
                        .unwrap_or(0);
                    if raw.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&raw).to_string()
        });
        (url, handle)
    }

    fn loopback_namer(url: String) -> ChatCompletionsNamer {
        let client = Client::builder().no_proxy().build().unwrap();
        ChatCompletionsNamer::with_client(client, url, "sk-test".into())
    }

    #[tokio::test]
    async fn non_success_status_is_api_error_with_body() {
        let (url, server) = serve_once("503 Service Unavailable", "overloaded").await;
        let request =
            NamingRequest::new("gpt-4o", "Name this", "data:image/jpeg;base64,AA==".into());

        let result = loopback_namer(url).suggest_name(&request, CancellationToken::new()).await;
        match result {
            Err(NamingError::Api { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }

        let sent = server.await.unwrap();
        assert!(sent.starts_with("POST /v1/chat/completions HTTP/1.1"));
        assert!(sent.to_ascii_lowercase().contains("authorization: bearer sk-test"));
        assert!(sent.contains(r#""detail":"low""#));
        assert!(sent.contains(r#""url":"data:image/jpeg;base64,AA==""#));
        assert!(sent.contains(r#""max_tokens":50"#));
    }

    #[tokio::test]
    async fn success_without_choices_is_empty_response() {
        let (url, server) = serve_once("200 OK", r#"{"choices":[]}"#).await;
        let namer = loopback_namer(url);
        let request =
            NamingRequest::new("gpt-4o", "Name this", "data:image/jpeg;base64,AA==".into());

        let err = crate::naming::request_name(
            &namer,
            &request,
            std::time::Duration::from_secs(10),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, NamingError::EmptyResponse));
        assert!(server.await.unwrap().contains("content-type: application/json"));
    }

    #[tokio::test]
    async fn success_content_is_returned_trimmed() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":" Sunset Over Bay \n"}}]}"#,
        )
        .await;
        let request = NamingRequest::new("gpt-4o", "p", "data:image/png;base64,AA==".into());

        let text =
            loopback_namer(url).suggest_name(&request, CancellationToken::new()).await.unwrap();
        assert_eq!(text, "Sunset Over Bay");
        server.await.unwrap();
    }
}
