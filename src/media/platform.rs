use crate::error::ApiError;
use std::{fmt, str::FromStr};

/// Platforms with a registered extraction capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    TikTok,
    Instagram,
    YouTube,
    Twitter,
    Facebook,
}

impl Platform {
    #[allow(dead_code)]
    pub const ALL: [Platform; 5] = [
        Platform::TikTok,
        Platform::Instagram,
        Platform::YouTube,
        Platform::Twitter,
        Platform::Facebook,
    ];

    /// Resolve a caller-supplied identifier. Matching is case-insensitive and
    /// `x` is the only alias (for `twitter`).
    pub fn resolve(name: &str) -> Result<Self, ApiError> {
        match name.to_lowercase().as_str() {
            "tiktok" => Ok(Platform::TikTok),
            "instagram" => Ok(Platform::Instagram),
            "youtube" => Ok(Platform::YouTube),
            "twitter" | "x" => Ok(Platform::Twitter),
            "facebook" => Ok(Platform::Facebook),
            _ => Err(ApiError::UnsupportedPlatform(name.to_string())),
        }
    }

    /// Path of the extraction endpoint serving this platform.
    pub fn endpoint(self) -> &'static str {
        match self {
            Platform::TikTok => "ttdl",
            Platform::Instagram => "igdl",
            Platform::YouTube => "youtube",
            Platform::Twitter => "twitter",
            Platform::Facebook => "fbdown",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::TikTok => "tiktok",
            Platform::Instagram => "instagram",
            Platform::YouTube => "youtube",
            Platform::Twitter => "twitter",
            Platform::Facebook => "facebook",
        }
    }
}

impl FromStr for Platform {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::resolve(s)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
