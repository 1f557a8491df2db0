// Minimal client for Cloudinary's signed upload API.
// https://cloudinary.com/documentation/upload_images#generating_authentication_signatures

use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

pub mod models;

use reqwest::{multipart, Client};
use sha1::{Digest, Sha1};

use crate::models::{Transformation, UploadResponse};

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";
const DEFAULT_DELIVERY_BASE: &str = "https://res.cloudinary.com";

#[derive(Debug, Clone)]
pub struct CloudinaryOptions {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Debug)]
pub enum CloudinaryError {
    Request(reqwest::Error),
    Api { status: u16, body: String },
    Parse(reqwest::Error),
}

impl fmt::Display for CloudinaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloudinaryError::Request(e) => write!(f, "request to Cloudinary failed: {}", e),
            CloudinaryError::Api { status, body } => {
                write!(f, "Cloudinary returned an error ({}): {}", status, body)
            }
            CloudinaryError::Parse(e) => write!(f, "failed to parse Cloudinary response: {}", e),
        }
    }
}

impl std::error::Error for CloudinaryError {}

/// Parameters of a single image upload.
#[derive(Debug, Clone, Default)]
pub struct UploadParams {
    pub public_id: String,
    pub tags: Vec<String>,
    pub overwrite: bool,
}

#[derive(Debug, Clone)]
pub struct CloudinaryService {
    options: CloudinaryOptions,
    api_base: String,
    client: Client,
}

impl CloudinaryService {
    pub fn new(options: CloudinaryOptions) -> Self {
        Self {
            options,
            api_base: DEFAULT_API_BASE.to_string(),
            client: Client::new(),
        }
    }

    /// Point uploads at a different API host (used against local fakes).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn cloud_name(&self) -> &str {
        &self.options.cloud_name
    }

    pub async fn upload_image(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        params: &UploadParams,
    ) -> Result<UploadResponse, CloudinaryError> {
        let url = format!(
            "{base}/{cloud}/image/upload",
            base = self.api_base,
            cloud = self.options.cloud_name
        );

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let signed = signed_params(params, timestamp);
        let signature = sign(&signed, &self.options.api_secret);

        let mut form = multipart::Form::new()
            .part(
                "file",
                multipart::Part::bytes(bytes).file_name(file_name.to_string()),
            )
            .text("api_key", self.options.api_key.clone())
            .text("signature", signature);
        for (key, value) in signed {
            form = form.text(key, value);
        }

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(CloudinaryError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CloudinaryError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<UploadResponse>()
            .await
            .map_err(CloudinaryError::Parse)
    }

    /// Delivery URL for an uploaded image with a transformation applied.
    pub fn build_url(
        &self,
        public_id: &str,
        transformation: &Transformation,
        version: Option<u64>,
    ) -> String {
        build_delivery_url(&self.options.cloud_name, public_id, transformation, version)
    }
}

pub fn build_delivery_url(
    cloud_name: &str,
    public_id: &str,
    transformation: &Transformation,
    version: Option<u64>,
) -> String {
    let mut url = format!("{}/{}/image/upload", DEFAULT_DELIVERY_BASE, cloud_name);
    let transformation = transformation.to_string();
    if !transformation.is_empty() {
        url.push('/');
        url.push_str(&transformation);
    }
    if let Some(version) = version {
        url.push_str(&format!("/v{}", version));
    }
    url.push('/');
    url.push_str(public_id);
    url
}

fn signed_params(params: &UploadParams, timestamp: u64) -> BTreeMap<&'static str, String> {
    let mut signed = BTreeMap::new();
    signed.insert("public_id", params.public_id.clone());
    signed.insert("timestamp", timestamp.to_string());
    if params.overwrite {
        signed.insert("overwrite", "true".to_string());
    }
    if !params.tags.is_empty() {
        signed.insert("tags", params.tags.join(","));
    }
    signed
}

fn string_to_sign(params: &BTreeMap<&'static str, String>) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

fn sign(params: &BTreeMap<&'static str, String>, api_secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(string_to_sign(params).as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
