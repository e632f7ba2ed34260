use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::{error, warn};

use crate::{
    config::BotConfig,
    error::{ApplicationError, ApplicationResult},
};

pub(crate) fn build_client(config: &BotConfig) -> ApplicationResult<Client> {
    Ok(reqwest::ClientBuilder::new()
        .timeout(config.http_timeout())
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Sends the request built by `request` up to `retries` times and returns
/// the body. `Ok(None)` when the server answers 404.
///
/// `label` is what gets logged, never the full url, since some APIs take
/// their token as a query parameter.
#[tracing::instrument(skip(request))]
pub(crate) async fn get_text<F>(
    label: &str,
    retries: u32,
    request: F,
) -> ApplicationResult<Option<String>>
where
    F: Fn() -> RequestBuilder,
{
    let retries = retries.max(1);
    let mut first_error = None;
    for attempt in 1..=retries {
        let response = request()
            .send()
            .await
            .and_then(|resp| {
                if resp.status() == StatusCode::NOT_FOUND {
                    Ok(None)
                } else {
                    resp.error_for_status().map(Some)
                }
            });

        let result = match response {
            Ok(Some(resp)) => resp.text().await.map(Some),
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        };

        match result {
            Ok(text) => return Ok(text),
            Err(e) => {
                if attempt == retries {
                    error!("Failed to get {} (attempt {}/{}): {}", label, attempt, retries, e);
                } else {
                    warn!("Failed to get {} (attempt {}/{}): {}", label, attempt, retries, e);
                }
                first_error.get_or_insert(e);
            }
        }
    }
    match first_error {
        Some(e) => Err(e.into()),
        None => Err(ApplicationError::NoRequestAttempted(label.to_string())),
    }
}
