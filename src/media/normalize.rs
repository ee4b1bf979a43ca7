use super::{
    platform::Platform,
    types::{NormalizedMedia, RawMedia, NOT_AVAILABLE},
};
use crate::error::ApiError;
use serde_json::Value;

fn or_na(value: Option<&String>) -> String {
    value
        .cloned()
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// First element of a link list; an empty first element does not fall
/// through to later ones.
fn first(list: &[Option<String>]) -> Option<&String> {
    list.first().and_then(Option::as_ref)
}

/// Map a platform's raw shape onto the fixed output record. Fields the
/// platform does not provide keep their "N/A" default.
pub fn normalize(raw: &RawMedia) -> NormalizedMedia {
    let base = NormalizedMedia::default();

    match raw {
        RawMedia::TikTok(data) => NormalizedMedia {
            title: or_na(data.title.as_ref()),
            video_url: or_na(first(&data.video)),
            audio_url: or_na(first(&data.audio)),
            thumbnail_url: or_na(data.thumbnail.as_ref()),
            creator: or_na(data.creator.as_ref()),
            ..base
        },
        RawMedia::YouTube(data) => NormalizedMedia {
            title: or_na(data.title.as_ref()),
            description: or_na(data.description.as_ref()),
            video_url: or_na(data.mp4.as_ref()),
            audio_url: or_na(data.mp3.as_ref()),
            thumbnail_url: or_na(data.thumbnail.as_ref()),
            channel_name: or_na(data.name.as_ref()),
            channel_url: or_na(data.channel.as_ref()),
            views: or_na(data.views.as_ref()),
            ..base
        },
        RawMedia::Twitter(data) => {
            let hd = data.url.iter().find_map(|variant| variant.hd.as_ref());
            let sd = data.url.iter().find_map(|variant| variant.sd.as_ref());
            NormalizedMedia {
                title: or_na(data.title.as_ref()),
                video_url: or_na(hd.or(sd)),
                ..base
            }
        }
        RawMedia::Facebook(data) => NormalizedMedia {
            video_url: or_na(data.hd.as_ref().or(data.normal_video.as_ref())),
            ..base
        },
        RawMedia::Instagram(items) => match items.first() {
            Some(item) => NormalizedMedia {
                thumbnail_url: or_na(item.thumbnail.as_ref()),
                video_url: or_na(item.url.as_ref()),
                creator: or_na(item.wm.as_ref()),
                ..base
            },
            None => base,
        },
    }
}

/// Normalize an untyped payload keyed by a caller-supplied platform name.
/// Request handling goes through `MediaService::download`; this is the
/// string-keyed entry point for callers holding an untyped payload.
#[allow(dead_code)]
pub fn normalize_value(platform: &str, data: Value) -> Result<NormalizedMedia, ApiError> {
    let platform = Platform::resolve(platform)?;
    Ok(normalize(&RawMedia::from_value(platform, data)))
}
