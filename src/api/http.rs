//! HTTP client for the session backend

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::client::{SessionApi, UploadFile};
use crate::api::error::ApiError;
use crate::config::ApiConfig;
use crate::data::{
    ChatReply, Document, DocumentRecord, Message, MessageRecord, Session, SessionId,
    SessionRecord, UploadReceipt,
};

#[derive(Serialize)]
struct SessionNameRequest<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    query: &'a str,
}

/// FastAPI error body
#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

#[derive(Clone)]
pub struct HttpApi {
    base_url: String,
    client: Client,
}

impl HttpApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Self::with_client(&config.base_url, client)
    }

    pub fn with_client(base_url: &str, client: Client) -> Result<Self, ApiError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "API URL must start with http:// or https://, got '{base_url}'"
            )));
        }
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| match body.detail {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .unwrap_or(text);
            tracing::debug!(status = status.as_u16(), detail = %detail, "Backend request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl SessionApi for HttpApi {
    async fn list_sessions(&self) -> Result<Vec<Session>, ApiError> {
        let records: Vec<SessionRecord> = self.fetch(self.client.get(self.url("/sessions"))).await?;
        Ok(records.into_iter().map(Session::from).collect())
    }

    async fn create_session(&self, name: &str) -> Result<Session, ApiError> {
        let request = self
            .client
            .post(self.url("/sessions"))
            .json(&SessionNameRequest { name });
        let record: SessionRecord = self.fetch(request).await?;
        Ok(record.into())
    }

    async fn rename_session(&self, id: SessionId, name: &str) -> Result<Session, ApiError> {
        let request = self
            .client
            .patch(self.url(&format!("/sessions/{id}")))
            .json(&SessionNameRequest { name });
        let record: SessionRecord = self.fetch(request).await?;
        Ok(record.into())
    }

    async fn get_session(&self, id: SessionId) -> Result<Session, ApiError> {
        let record: SessionRecord = self
            .fetch(self.client.get(self.url(&format!("/sessions/{id}"))))
            .await?;
        Ok(record.into())
    }

    async fn get_documents(&self, id: SessionId) -> Result<Vec<Document>, ApiError> {
        let records: Vec<DocumentRecord> = self
            .fetch(self.client.get(self.url(&format!("/sessions/{id}/documents"))))
            .await?;
        Ok(records.into_iter().map(Document::from).collect())
    }

    async fn get_messages(&self, id: SessionId) -> Result<Vec<Message>, ApiError> {
        let records: Vec<MessageRecord> = self
            .fetch(self.client.get(self.url(&format!("/sessions/{id}/messages"))))
            .await?;
        Ok(records.into_iter().map(Message::from).collect())
    }

    async fn upload_document(
        &self,
        id: SessionId,
        file: UploadFile,
    ) -> Result<UploadReceipt, ApiError> {
        let mime = mime_guess::from_path(&file.filename).first_or_octet_stream();
        let part = Part::bytes(file.bytes)
            .file_name(file.filename)
            .mime_str(mime.essence_str())?;
        let form = Form::new().part("file", part);

        let request = self
            .client
            .post(self.url(&format!("/sessions/{id}/upload")))
            .multipart(form);
        self.fetch(request).await
    }

    async fn send_chat(&self, id: SessionId, text: &str) -> Result<ChatReply, ApiError> {
        let request = self
            .client
            .post(self.url(&format!("/sessions/{id}/chat")))
            .json(&ChatRequest { query: text });
        self.fetch(request).await
    }
}
