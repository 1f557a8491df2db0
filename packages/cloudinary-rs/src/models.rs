use std::fmt;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub public_id: String,
    pub version: u64,
    pub secure_url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub format: Option<String>,
}

/// Image transformation rendered into the delivery URL (`c_fill,h_250,w_250`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transformation {
    pub crop: Option<String>,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

impl Transformation {
    pub fn fill(width: u32, height: u32) -> Self {
        Self {
            crop: Some("fill".to_string()),
            height: Some(height),
            width: Some(width),
        }
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(crop) = &self.crop {
            parts.push(format!("c_{}", crop));
        }
        if let Some(height) = self.height {
            parts.push(format!("h_{}", height));
        }
        if let Some(width) = self.width {
            parts.push(format!("w_{}", width));
        }
        write!(f, "{}", parts.join(","))
    }
}
