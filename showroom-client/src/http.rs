// showroom-client/src/http.rs
// HTTP 客户端 - 远程目录与上传服务

use crate::auth::Credential;
use crate::media::LocalFile;
use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// 服务端返回的错误响应格式
///
/// The catalog service is loose about this: `code` is optional and the text
/// may arrive as `message` or `error`.
#[derive(Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default, alias = "error")]
    message: Option<String>,
    #[serde(default)]
    details: Option<serde_json::Value>,
}

/// Upload service reply
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Multipart field name expected by the upload service
pub const UPLOAD_FIELD: &str = "Image";

/// 网络 HTTP 客户端
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(req: RequestBuilder, credential: Option<&Credential>) -> RequestBuilder {
        match credential {
            Some(c) => req.header(reqwest::header::AUTHORIZATION, c.bearer()),
            None => req,
        }
    }

    async fn error_from(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return e.into(),
        };
        // 尝试解析为 API 错误响应
        let parsed = serde_json::from_str::<ApiErrorResponse>(&text).ok();
        if let Some(ApiErrorResponse {
            code: Some(code),
            message,
            details,
        }) = parsed
        {
            return ClientError::Api {
                code,
                message: message.unwrap_or_else(|| status.to_string()),
                details,
            };
        }
        let message = parsed
            .and_then(|p| p.message)
            .unwrap_or(if text.is_empty() { status.to_string() } else { text });
        // 降级到状态码映射
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(message)
            }
            _ => ClientError::Internal(format!("{}: {}", status, message)),
        }
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        credential: Option<&Credential>,
    ) -> ClientResult<T> {
        let req = Self::authorize(self.client.post(self.url(path)).json(body), credential);
        Self::handle_response(req.send().await?).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        credential: Option<&Credential>,
    ) -> ClientResult<T> {
        let req = Self::authorize(self.client.put(self.url(path)).json(body), credential);
        Self::handle_response(req.send().await?).await
    }

    /// DELETE; the confirmation body is ignored
    pub async fn delete(&self, path: &str, credential: Option<&Credential>) -> ClientResult<()> {
        let req = Self::authorize(self.client.delete(self.url(path)), credential);
        let response = req.send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }

    /// Upload one file as a single-part multipart body
    pub async fn upload(
        &self,
        path: &str,
        file: &LocalFile,
        credential: Option<&Credential>,
    ) -> ClientResult<UploadResponse> {
        let part = reqwest::multipart::Part::bytes(file.data().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.content_type())?;
        let form = reqwest::multipart::Form::new().part(UPLOAD_FIELD, part);

        let req = Self::authorize(self.client.post(self.url(path)).multipart(form), credential);
        let response: UploadResponse = Self::handle_response(req.send().await?).await?;
        if response.url.trim().is_empty() {
            return Err(ClientError::InvalidResponse(
                "upload response has an empty url".into(),
            ));
        }
        Ok(response)
    }
}
