//! Live adapter for the `TaskApi` and `CategoryApi` ports over HTTP.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;

use crate::config::Config;
use crate::error::ApiError;
use crate::ports::tasks::CreatedTask;
use crate::ports::{ApiFuture, CategoryApi, NewTask, TaskApi};
use crate::wizard::form::Category;
use crate::wizard::photos::SelectedFile;

/// Backend client speaking JSON, with multipart photo uploads.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

/// Error body returned by the backend.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "detail", alias = "error")]
    message: String,
}

impl HttpApi {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.api_url)
            .map_err(|e| ApiError::InvalidResponse(format!("invalid API URL: {e}")))?;
        let client = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self { client, base_url, token: config.api_token.clone() })
    }

    fn url(&self, endpoint: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(endpoint)
            .map_err(|e| ApiError::InvalidResponse(format!("invalid endpoint {endpoint}: {e}")))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Returns the body text of a successful response, or the matching error.
async fn read_body(response: Response) -> Result<String, ApiError> {
    let status = response.status();
    let text = response.text().await?;
    if status.is_success() {
        return Ok(text);
    }
    let message = serde_json::from_str::<ErrorBody>(&text).map(|e| e.message).unwrap_or(text);
    Err(ApiError::status(status, message))
}

impl TaskApi for HttpApi {
    fn create_task<'a>(&'a self, task: &'a NewTask) -> ApiFuture<'a, String> {
        Box::pin(async move {
            let url = self.url("tasks/")?;
            let response = self.authorize(self.client.post(url)).json(task).send().await?;
            let body = read_body(response).await?;
            let created: CreatedTask = serde_json::from_str(&body).map_err(|e| {
                ApiError::InvalidResponse(format!("task creation response has no id: {e}"))
            })?;
            Ok(created.id())
        })
    }

    fn attach_photo<'a>(&'a self, file: &'a SelectedFile, task_id: &'a str) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            let url = self.url(&format!("tasks/{task_id}/photos/"))?;
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str(&file.mime)?;
            let form = Form::new().part("photo", part);
            let response = self.authorize(self.client.post(url)).multipart(form).send().await?;
            read_body(response).await?;
            Ok(())
        })
    }
}

impl CategoryApi for HttpApi {
    fn fetch_categories(&self) -> ApiFuture<'_, Vec<Category>> {
        Box::pin(async move {
            let url = self.url("categories/")?;
            let response = self.authorize(self.client.get(url)).send().await?;
            let body = read_body(response).await?;
            Ok(serde_json::from_str(&body)?)
        })
    }
}
