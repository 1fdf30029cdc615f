//! Minimal webservice client: enough to look up a media's customization block.

use anyhow::{Context, Result, bail, ensure};
use media_model::{MediaContainer, MediaCustomization, WebserviceResponse};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_HOST: &str = "https://cdn.streamlike.com";
pub const MEDIA_ENDPOINT: &str = "/ws/media";

/// Gives `host` an explicit protocol.
///
/// `http://` is upgraded when `force_https` is set; bare and protocol-relative
/// hosts get `https:`.
pub fn fix_host(host: &str, force_https: bool) -> String {
    let host = host.trim();
    if let Some(rest) = host.strip_prefix("http://") {
        if force_https {
            return format!("https://{rest}");
        }
    }
    if host.starts_with("http") {
        return host.to_string();
    }
    if host.starts_with("//") {
        return format!("https:{host}");
    }
    format!("https://{host}")
}

/// Joins `endpoint` onto `host` (or [`DEFAULT_HOST`]) and appends `params`.
///
/// `null` values are skipped; arrays expand to repeated `key[]` pairs.
pub fn build_url(endpoint: &str, params: &Map<String, Value>, host: Option<&str>) -> Result<Url> {
    let base = fix_host(host.unwrap_or(DEFAULT_HOST), true);
    let mut url = Url::parse(&base)
        .with_context(|| format!("invalid host {base}"))?
        .join(endpoint)
        .with_context(|| format!("invalid endpoint {endpoint}"))?;

    let mut pairs: Vec<(String, String)> = Vec::new();
    for (key, value) in params {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                let array_key = format!("{key}[]");
                pairs.extend(items.iter().map(|item| (array_key.clone(), query_value(item))));
            }
            other => pairs.push((key.clone(), query_value(other))),
        }
    }
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(&pairs);
    }
    debug!(url = %url, "built webservice url");
    Ok(url)
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Unwraps the `{status, info, data}` envelope when `value` carries one;
/// otherwise deserializes `value` directly.
pub fn unwrap_payload<T: DeserializeOwned>(value: Value) -> Result<T> {
    if !is_envelope(&value) {
        return serde_json::from_value(value).context("unexpected webservice payload");
    }
    let envelope: WebserviceResponse<Value> =
        serde_json::from_value(value).context("malformed webservice envelope")?;
    if !envelope.is_success() {
        let info = envelope.info.trim();
        warn!(status = envelope.status, info, "webservice error");
        if info.is_empty() {
            bail!("Webservice error");
        }
        bail!("{info}");
    }
    serde_json::from_value(envelope.data.unwrap_or(Value::Null))
        .context("unexpected webservice data")
}

fn is_envelope(value: &Value) -> bool {
    let Value::Object(obj) = value else {
        return false;
    };
    obj.get("status").is_some_and(Value::is_number)
        && obj.get("info").is_some_and(Value::is_string)
        && obj.contains_key("data")
}

pub async fn fetch_data<T: DeserializeOwned>(client: &reqwest::Client, url: &Url) -> Result<T> {
    debug!(url = %url, "fetching webservice data");
    let response = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("request to {url} failed"))?;
    let status = response.status();
    if !status.is_success() {
        bail!("HTTP error! Status: {}", status.as_u16());
    }
    let body = response.text().await.context("reading webservice body")?;
    let value: Value = serde_json::from_str(&body).context("webservice body is not JSON")?;
    unwrap_payload(value)
}

pub async fn get_media(
    client: &reqwest::Client,
    host: Option<&str>,
    media_id: &str,
) -> Result<MediaContainer> {
    let media_id = media_id.trim();
    ensure!(!media_id.is_empty(), "Missing identifier parameter");
    let mut params = Map::new();
    params.insert("media_id".into(), Value::String(media_id.to_string()));
    let url = build_url(MEDIA_ENDPOINT, &params, host)?;
    fetch_data(client, &url)
        .await
        .with_context(|| format!("loading media {media_id}"))
}

pub async fn get_media_customization(
    client: &reqwest::Client,
    host: Option<&str>,
    media_id: &str,
) -> Result<MediaCustomization> {
    let container = get_media(client, host, media_id).await?;
    Ok(container.media.metadata.customization)
}
