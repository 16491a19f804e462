//! CMS FilePicker backend
//!
//! Uploads go through the legacy admin form endpoint. Each upload needs a
//! request token scraped from the admin page markup; the token lives for a
//! few seconds and is single-use, so it is fetched inside every
//! [`upload`](UploadBackend::upload) call and never kept on the backend.

use crate::backend::{checked_body, BackendContext, BackendKind, UploadBackend};
use crate::error::{CliError, Result};
use crate::upload::{UploadResult, UploadTask};
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, info};
use vfm_common::policy;

/// Attribute orders seen for the hidden token input, tried in sequence.
const TOKEN_PATTERNS: &[&str] = &[
    r#"id="fileUploadRequestToken"\s+value="([^"]+)""#,
    r#"value="([^"]+)"\s+id="fileUploadRequestToken""#,
    r#"fileUploadRequestToken[^>]*value="([^"]+)""#,
];

static TOKEN_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    TOKEN_PATTERNS
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
});

#[derive(Debug, Deserialize)]
struct FilePickerResponse {
    #[serde(rename = "fileNameInserted", default)]
    file_name_inserted: Option<String>,
    #[serde(default)]
    mensagem: Option<String>,
}

/// Token-gated form upload backend
pub struct CmsBackend {
    ctx: BackendContext,
}

impl CmsBackend {
    pub fn new(ctx: BackendContext) -> Self {
        Self { ctx }
    }

    /// Fetch a fresh request token from the admin page
    async fn fetch_request_token(&self) -> Result<String> {
        let url = self.ctx.endpoints.request_token_url();
        debug!(url = %url, "Fetching request token");

        let request = self.ctx.session.apply_auth(self.ctx.client.post(&url));
        let markup = checked_body(request.send().await?).await?;

        extract_request_token(&markup)
            .ok_or_else(|| CliError::auth_expired("could not obtain upload token"))
    }

    async fn try_upload(&self, task: &UploadTask) -> Result<String> {
        let token = self.fetch_request_token().await?;
        let content = tokio::fs::read(task.path()).await?;
        let mime = policy::mime_for_extension(task.extension());

        let part = Part::bytes(content)
            .file_name(task.name().to_string())
            .mime_str(mime.as_ref())?;
        let form = Form::new().text("requestToken", token).part("FileData", part);

        let request = self
            .ctx
            .client
            .post(self.ctx.endpoints.file_picker_upload_url())
            .header(ACCEPT, "*/*")
            .header("X-Requested-With", "XMLHttpRequest")
            .multipart(form);
        let body = checked_body(self.ctx.session.apply_auth(request).send().await?).await?;

        let response: FilePickerResponse = serde_json::from_str(&body).map_err(|e| {
            CliError::rejected(format!("unexpected FilePicker response ({}): {}", e, body))
        })?;

        match response.file_name_inserted.filter(|name| !name.is_empty()) {
            Some(inserted) => {
                debug!(inserted = %inserted, message = ?response.mensagem, "FilePicker accepted file");
                Ok(self.ctx.endpoints.arquivos_url(&inserted))
            }
            None => Err(CliError::rejected(
                response
                    .mensagem
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "FilePicker returned no file name".to_string()),
            )),
        }
    }
}

#[async_trait]
impl UploadBackend for CmsBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Cms
    }

    async fn upload(&self, task: &UploadTask) -> UploadResult {
        info!(file = task.name(), size = task.size(), "Uploading via CMS FilePicker");
        let outcome = self.try_upload(task).await;
        self.ctx.finish(self.kind(), task, outcome).await
    }

    fn supports_exists(&self) -> bool {
        true
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        let form = Form::new().text(name.to_string(), name.to_string());
        let request = self
            .ctx
            .client
            .post(self.ctx.endpoints.file_exists_url())
            .header(ACCEPT, "*/*")
            .multipart(form);
        let body = checked_body(self.ctx.session.apply_auth(request).send().await?).await?;

        let listing: HashMap<String, serde_json::Value> = serde_json::from_str(&body)?;
        let exists = listing.contains_key(name);

        debug!(file = name, exists, "FilePicker existence check");
        Ok(exists)
    }
}

/// Pull the request token out of the admin page markup
pub fn extract_request_token(markup: &str) -> Option<String> {
    TOKEN_REGEXES.iter().find_map(|re| {
        re.captures(markup)
            .and_then(|caps| caps.get(1))
            .map(|token| token.as_str().to_string())
    })
}
