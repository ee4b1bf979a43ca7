use super::platform::Platform;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Placeholder for attributes a platform does not supply.
pub const NOT_AVAILABLE: &str = "N/A";

/// The single response shape returned for every platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMedia {
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub audio_url: String,
    pub thumbnail_url: String,
    pub creator: String,
    pub channel_name: String,
    pub channel_url: String,
    pub views: String,
}

impl Default for NormalizedMedia {
    fn default() -> Self {
        let na = || NOT_AVAILABLE.to_string();
        Self {
            title: na(),
            description: na(),
            video_url: na(),
            audio_url: na(),
            thumbnail_url: na(),
            creator: na(),
            channel_name: na(),
            channel_url: na(),
            views: na(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TikTokData {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub video: Vec<Option<String>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub audio: Vec<Option<String>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub creator: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct YouTubeData {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mp4: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mp3: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub channel: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub views: Option<String>,
}

/// One `{quality: link}` entry of a tweet's video list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TwitterVariant {
    #[serde(default, deserialize_with = "lenient_string")]
    pub hd: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sd: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TwitterData {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_variants")]
    pub url: Vec<TwitterVariant>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FacebookData {
    #[serde(rename = "HD", default, deserialize_with = "lenient_string")]
    pub hd: Option<String>,
    #[serde(rename = "Normal_video", default, deserialize_with = "lenient_string")]
    pub normal_video: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InstagramItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub wm: Option<String>,
}

/// Raw extraction result, tagged by the platform that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawMedia {
    TikTok(TikTokData),
    YouTube(YouTubeData),
    Twitter(TwitterData),
    Facebook(FacebookData),
    Instagram(Vec<InstagramItem>),
}

impl RawMedia {
    /// Decode an extractor payload into the shape expected for `platform`.
    /// Payloads that do not match the shape decode to an empty record.
    pub fn from_value(platform: Platform, value: Value) -> Self {
        match platform {
            Platform::TikTok => RawMedia::TikTok(decode(value)),
            Platform::YouTube => RawMedia::YouTube(decode(value)),
            Platform::Twitter => RawMedia::Twitter(decode(value)),
            Platform::Facebook => RawMedia::Facebook(decode(value)),
            Platform::Instagram => RawMedia::Instagram(match value {
                Value::Array(items) => items
                    .into_iter()
                    .map(decode::<InstagramItem>)
                    .collect(),
                _ => Vec::new(),
            }),
        }
    }

    #[allow(dead_code)]
    pub fn platform(&self) -> Platform {
        match self {
            RawMedia::TikTok(_) => Platform::TikTok,
            RawMedia::YouTube(_) => Platform::YouTube,
            RawMedia::Twitter(_) => Platform::Twitter,
            RawMedia::Facebook(_) => Platform::Facebook,
            RawMedia::Instagram(_) => Platform::Instagram,
        }
    }
}

fn decode<T: DeserializeOwned + Default>(value: Value) -> T {
    if !value.is_object() {
        return T::default();
    }
    serde_json::from_value(value).unwrap_or_default()
}

/// Strings are kept, numbers are stringified, empty strings and every other
/// JSON type count as absent.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar))
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Ok(items.iter().map(scalar).collect()),
        _ => Ok(Vec::new()),
    }
}

fn lenient_variants<'de, D>(deserializer: D) -> Result<Vec<TwitterVariant>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Ok(items
            .into_iter()
            .map(decode::<TwitterVariant>)
            .collect()),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_record_is_all_sentinel() {
        let value = serde_json::to_value(NormalizedMedia::default()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 9);
        for key in [
            "title",
            "description",
            "videoUrl",
            "audioUrl",
            "thumbnailUrl",
            "creator",
            "channelName",
            "channelUrl",
            "views",
        ] {
            assert_eq!(object[key], NOT_AVAILABLE, "field {key}");
        }
    }

    #[test]
    fn test_lenient_scalars() {
        let raw = RawMedia::from_value(
            Platform::YouTube,
            json!({"title": "", "views": 1200, "name": true, "mp4": null, "extra": "x"}),
        );
        let RawMedia::YouTube(data) = raw else {
            panic!("expected youtube data");
        };
        assert_eq!(data.title, None);
        assert_eq!(data.views.as_deref(), Some("1200"));
        assert_eq!(data.name, None);
        assert_eq!(data.mp4, None);
    }

    #[test]
    fn test_non_object_payload_decodes_empty() {
        assert_eq!(
            RawMedia::from_value(Platform::TikTok, json!("nope")),
            RawMedia::TikTok(TikTokData::default())
        );
        assert_eq!(
            RawMedia::from_value(Platform::Instagram, json!({"url": "x"})),
            RawMedia::Instagram(Vec::new())
        );
    }

    #[test]
    fn test_twitter_variants_tolerate_junk_entries() {
        let raw = RawMedia::from_value(
            Platform::Twitter,
            json!({"url": [42, {"sd": "s1"}, {"hd": "h1", "sd": "s2"}]}),
        );
        let RawMedia::Twitter(data) = raw else {
            panic!("expected twitter data");
        };
        assert_eq!(data.url.len(), 3);
        assert_eq!(data.url[0], TwitterVariant::default());
        assert_eq!(data.url[2].hd.as_deref(), Some("h1"));
    }

    #[test]
    fn test_platform_tag() {
        for platform in Platform::ALL {
            assert_eq!(RawMedia::from_value(platform, json!({})).platform(), platform);
        }
    }
}
