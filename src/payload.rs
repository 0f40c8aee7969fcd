use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::{Result, SendError};
use crate::google::{
    AndroidConfig, AndroidNotification, ApnsConfig, ApnsFcmOptions, FCMMessage, Message,
    Notification, WebpushConfig, WebpushNotification,
};

/// What the caller wants delivered to one device.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRequest {
    pub device_token: String,
    pub title: String,
    pub body: String,
    pub icon: Option<String>,
    /// Must be a JSON object when non-empty.
    pub data: Option<Value>,
}

impl NotificationRequest {
    pub fn new(
        device_token: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            device_token: device_token.into(),
            title: title.into(),
            body: body.into(),
            icon: None,
            data: None,
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Turns icon paths into absolute URLs.
#[derive(Debug, Clone, Default)]
pub struct IconResolver {
    base_url: Option<String>,
}

impl IconResolver {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }

    /// `http(s)` and protocol-relative URLs pass through; anything else is
    /// appended to the base URL.
    pub fn resolve(&self, icon: &str) -> Result<String> {
        let is_web_url = reqwest::Url::parse(icon)
            .is_ok_and(|url| matches!(url.scheme(), "http" | "https"));
        if is_web_url || icon.starts_with("//") {
            return Ok(icon.to_string());
        }

        match self.base_url.as_deref() {
            Some(base) => Ok(format!(
                "{}/{}",
                base.trim_end_matches('/'),
                icon.trim_start_matches('/')
            )),
            None => Err(SendError::InvalidIcon(icon.to_string())),
        }
    }
}

pub fn build_message(req: &NotificationRequest, icons: &IconResolver) -> Result<FCMMessage> {
    let mut message = Message {
        token: req.device_token.clone(),
        notification: Notification {
            title: req.title.clone(),
            body: req.body.clone(),
        },
        webpush: None,
        android: None,
        apns: None,
        data: None,
    };

    if let Some(icon) = req.icon.as_deref().filter(|i| !i.is_empty()) {
        let icon_url = icons.resolve(icon)?;

        message.webpush = Some(WebpushConfig {
            notification: WebpushNotification {
                icon: icon_url.clone(),
            },
        });
        message.android = Some(AndroidConfig {
            notification: AndroidNotification {
                image: icon_url.clone(),
            },
        });
        // APNs has no icon field, the image is the closest match
        message.apns = Some(ApnsConfig {
            fcm_options: ApnsFcmOptions { image: icon_url },
        });
    }

    if let Some(data) = req.data.as_ref() {
        message.data = data_map(data)?;
    }

    Ok(FCMMessage {
        validate_only: None,
        message,
    })
}

fn data_map(data: &Value) -> Result<Option<BTreeMap<String, String>>> {
    match data {
        Value::Null => Ok(None),
        Value::Array(items) if items.is_empty() => Ok(None),
        Value::Object(map) if map.is_empty() => Ok(None),
        Value::Object(map) if !is_sequential(map) => Ok(Some(
            map.iter()
                .map(|(k, v)| (k.clone(), stringify(v)))
                .collect(),
        )),
        _ => Err(SendError::NonAssociativeData),
    }
}

/// True when the keys are exactly "0".."n-1", i.e. a list wearing a map's clothes.
fn is_sequential(map: &Map<String, Value>) -> bool {
    map.keys().all(|k| match k.parse::<usize>() {
        Ok(i) => i < map.len() && i.to_string() == *k,
        Err(_) => false,
    })
}

// FCM only accepts string values in `data`.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
