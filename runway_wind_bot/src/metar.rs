use reqwest::Client;
use runway_wind::{
    WindObservation,
    metar::{SpeedBasis, find_wind_in_metar},
};
use serde::Deserialize;
use serde_with::serde_as;
use tracing::debug;
use tracing_unwrap::ResultExt;

use crate::{config::BotConfig, error::ApplicationResult, http::get_text, util::LenientNumber};

const CHECKWX_URL: &str = "https://api.checkwx.com/metar";

#[derive(Debug, Deserialize)]
struct CheckWxResponse {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

/// The parts of a CheckWX decoded METAR that the report uses.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct DecodedMetar {
    pub raw_text: Option<String>,
    pub wind: Option<DecodedWind>,
    pub barometer: Option<Barometer>,
    pub humidity: Option<Humidity>,
    pub temperature: Option<Temperature>,
    pub dewpoint: Option<Temperature>,
    pub visibility: Option<Visibility>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct DecodedWind {
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub degrees: Option<f64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub speed_kts: Option<f64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub gust_kts: Option<f64>,
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Barometer {
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub hpa: Option<f64>,
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Humidity {
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub percent: Option<f64>,
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Temperature {
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub celsius: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Visibility {
    /// CheckWX sends this as text like "10,000" as often as a number.
    #[serde(default)]
    pub meters: Option<serde_json::Value>,
}

impl DecodedMetar {
    pub fn from_raw(raw: &str) -> Self {
        Self {
            raw_text: Some(raw.trim().to_string()),
            ..Self::default()
        }
    }

    /// The wind to resolve runways against.
    ///
    /// Uses the decoded wind object when it has both direction and speed,
    /// otherwise falls back to the wind group of the raw METAR text.
    /// `Ok(None)` means there is no usable wind, e.g. variable wind.
    pub fn wind_observation(&self, basis: SpeedBasis) -> ApplicationResult<Option<WindObservation>> {
        if let Some(DecodedWind {
            degrees: Some(degrees),
            speed_kts: Some(speed),
            gust_kts,
        }) = &self.wind
        {
            let speed = match basis {
                SpeedBasis::Sustained => *speed,
                SpeedBasis::Gust => gust_kts.unwrap_or(*speed),
            };
            return Ok(Some(WindObservation::new(*degrees, speed)?));
        }

        let Some(raw) = self.raw_text.as_deref() else {
            debug!("No decoded wind and no raw METAR");
            return Ok(None);
        };
        match find_wind_in_metar(raw).ok_or_log() {
            Some(wind) => Ok(wind.observation(basis)?),
            None => Ok(None),
        }
    }

    /// The `dddVddd` group of the raw METAR, if it reports one.
    pub fn varying_sector(&self) -> Option<(u16, u16)> {
        find_wind_in_metar(self.raw_text.as_deref()?).ok()?.varying
    }
}

pub(crate) async fn fetch_decoded_metar(
    client: &Client,
    config: &BotConfig,
    icao: &str,
) -> ApplicationResult<Option<DecodedMetar>> {
    let api_key = config.checkwx_api_key()?;
    let url = format!("{CHECKWX_URL}/{icao}/decoded");
    let Some(body) = get_text("CheckWX METAR", config.http_retries(), || {
        client.get(&url).header("X-API-Key", api_key)
    })
    .await?
    else {
        return Ok(None);
    };
    parse_checkwx_response(&body)
}

/// CheckWX puts plain strings like "EPXX Invalid Station ICAO" into `data`
/// for unknown stations, those entries are skipped.
fn parse_checkwx_response(body: &str) -> ApplicationResult<Option<DecodedMetar>> {
    let response: CheckWxResponse = serde_json::from_str(body)?;
    Ok(response
        .data
        .into_iter()
        .filter(serde_json::Value::is_object)
        .map(serde_json::from_value::<DecodedMetar>)
        .find_map(Result::ok_or_log))
}
