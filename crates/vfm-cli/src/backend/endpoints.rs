//! Endpoint URL builders
//!
//! Every backend URL is derived from three per-account base URLs, each of
//! which can be overridden through [`Config`](crate::config::Config).

use crate::config::Config;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes left as-is in a single path segment: unreserved characters plus the
/// sub-delimiters `$ & + : = @`. Everything else, `/ ; , ?` included, is
/// escaped.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b':')
    .remove(b'=')
    .remove(b'@');

/// Base URLs for one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    admin_base: String,
    graphql_base: String,
    assets_base: String,
}

impl Endpoints {
    /// Production endpoints for `account`
    pub fn for_account(account: &str) -> Self {
        Self {
            admin_base: format!("https://{}.vtexcommercestable.com.br", account),
            graphql_base: format!("https://{}.myvtex.com", account),
            assets_base: format!("https://{}.vtexassets.com", account),
        }
    }

    /// Endpoints for `account` with any overrides from `config` applied
    pub fn from_config(config: &Config, account: &str) -> Self {
        let defaults = Self::for_account(account);

        Self {
            admin_base: pick(config.admin_url.as_deref(), defaults.admin_base),
            graphql_base: pick(config.graphql_url.as_deref(), defaults.graphql_base),
            assets_base: pick(config.assets_url.as_deref(), defaults.assets_base),
        }
    }

    /// CMS page whose markup carries the single-use request token
    pub fn request_token_url(&self) -> String {
        format!("{}/admin/a/PortalManagement/AddFile?fileType=images", self.admin_base)
    }

    /// CMS FilePicker upload form target
    pub fn file_picker_upload_url(&self) -> String {
        format!("{}/admin/a/FilePicker/UploadFile", self.admin_base)
    }

    /// CMS FilePicker existence check
    pub fn file_exists_url(&self) -> String {
        format!("{}/admin/a/FilePicker/FileExists?changedFileName=", self.admin_base)
    }

    /// Private GraphQL endpoint used for multipart uploads
    pub fn graphql_url(&self) -> String {
        format!("{}/_v/private/graphql/v1", self.graphql_base)
    }

    /// Public URL of a CMS file, with the name escaped as one path segment
    pub fn arquivos_url(&self, file_name: &str) -> String {
        format!(
            "{}/arquivos/{}",
            self.assets_base,
            utf8_percent_encode(file_name, PATH_SEGMENT)
        )
    }

    /// Display-only destination for GraphQL uploads, whose name is generated remotely
    pub fn generated_asset_placeholder(&self) -> String {
        format!("{}/assets/.../[generated]", self.assets_base)
    }
}

fn pick(override_url: Option<&str>, default: String) -> String {
    match override_url {
        Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
        _ => default,
    }
}
