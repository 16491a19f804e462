//! GraphQL multipart backend
//!
//! Follows the GraphQL multipart request convention: an `operations` field
//! with the mutation, a `map` field binding file part `0` to
//! `variables.file`, then the file itself. The asset name is generated
//! remotely, so there is no existence check.

use crate::backend::{checked_body, BackendContext, BackendKind, UploadBackend};
use crate::error::{CliError, Result};
use crate::upload::{UploadResult, UploadTask};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use vfm_common::policy;

const UPLOAD_MUTATION: &str = "mutation uploadFile($file: Upload!, $bucket: String) {
  uploadFile(file: $file, bucket: $bucket) {
    fileUrl
    mimetype
    encoding
  }
}";

const UPLOAD_BUCKET: &str = "images";

/// Name of the multipart part carrying the file
const FILE_PART: &str = "0";

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<UploadData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    #[serde(rename = "uploadFile", default)]
    upload_file: Option<UploadedFile>,
}

#[derive(Debug, Deserialize)]
struct UploadedFile {
    #[serde(rename = "fileUrl", default)]
    file_url: Option<String>,
    #[serde(default)]
    mimetype: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

/// Specification-based multipart upload backend
pub struct GraphqlBackend {
    ctx: BackendContext,
}

impl GraphqlBackend {
    pub fn new(ctx: BackendContext) -> Self {
        Self { ctx }
    }

    fn build_form(task: &UploadTask, content: Vec<u8>) -> Result<Form> {
        let operations = json!({
            "query": UPLOAD_MUTATION,
            "variables": { "file": null, "bucket": UPLOAD_BUCKET },
        });
        let map = json!({ "0": ["variables.file"] });

        let mime = policy::mime_for_extension(task.extension());
        let part = Part::bytes(content)
            .file_name(task.name().to_string())
            .mime_str(mime.as_ref())?;

        Ok(Form::new()
            .text("operations", operations.to_string())
            .text("map", map.to_string())
            .part(FILE_PART, part))
    }

    async fn try_upload(&self, task: &UploadTask) -> Result<String> {
        let content = tokio::fs::read(task.path()).await?;
        let form = Self::build_form(task, content)?;

        let request = self
            .ctx
            .client
            .post(self.ctx.endpoints.graphql_url())
            .header(ACCEPT, "application/json")
            .multipart(form);
        let body = checked_body(self.ctx.session.apply_auth(request).send().await?).await?;

        parse_upload_response(&body)
    }
}

#[async_trait]
impl UploadBackend for GraphqlBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Graphql
    }

    async fn upload(&self, task: &UploadTask) -> UploadResult {
        info!(file = task.name(), size = task.size(), "Uploading via GraphQL");
        let outcome = self.try_upload(task).await;
        self.ctx.finish(self.kind(), task, outcome).await
    }
}

/// Extract the generated asset URL from a GraphQL response body
fn parse_upload_response(body: &str) -> Result<String> {
    let response: GraphqlResponse = serde_json::from_str(body).map_err(|e| {
        CliError::rejected(format!("unexpected GraphQL response ({}): {}", e, body))
    })?;

    if let Some(first) = response.errors.into_iter().next() {
        return Err(CliError::rejected(format!("GraphQL error: {}", first.message)));
    }

    let uploaded = response.data.and_then(|d| d.upload_file);
    if let Some(ref file) = uploaded {
        debug!(mimetype = ?file.mimetype, "GraphQL accepted file");
    }

    uploaded
        .and_then(|file| file.file_url)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| CliError::rejected("no fileUrl in GraphQL response"))
}
