use std::{fs::File, io::BufReader, path::Path};

use reqwest::Client;
use runway_wind::{RunwayEnd, RunwayStrip};
use serde::Deserialize;
use serde_with::serde_as;

use crate::{config::BotConfig, error::ApplicationResult, http::get_text, util::LenientNumber};

const AIRPORTDB_URL: &str = "https://airportdb.io/api/v1/airport";

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Airport {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub iata_code: Option<String>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub elevation_ft: Option<f64>,
    #[serde(default)]
    pub wikipedia_link: Option<String>,
    #[serde(default)]
    pub runways: Vec<AirportRunway>,
}

/// One strip as AirportDB lists it, "le" is the low end, "he" the high end.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AirportRunway {
    pub le_ident: String,
    pub he_ident: String,
    #[serde_as(as = "LenientNumber")]
    #[serde(default, rename = "le_heading_degT")]
    pub le_heading_deg_t: Option<f64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default, rename = "he_heading_degT")]
    pub he_heading_deg_t: Option<f64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub le_elevation_ft: Option<f64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub he_elevation_ft: Option<f64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub le_displaced_threshold_ft: Option<f64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub he_displaced_threshold_ft: Option<f64>,
    #[serde(default)]
    pub le_ils: Option<Ils>,
    #[serde(default)]
    pub he_ils: Option<Ils>,
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Ils {
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub freq: Option<f64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub course: Option<f64>,
}

/// Display data of one runway end, borrowed from its strip.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RunwayEndInfo<'a> {
    pub identifier: &'a str,
    pub heading_deg_t: Option<f64>,
    pub elevation_ft: Option<f64>,
    pub displaced_threshold_ft: Option<f64>,
    pub ils: Option<&'a Ils>,
}

impl Airport {
    /// AirportDB answers unknown codes with an object without a name.
    pub fn is_known(&self) -> bool {
        self.name.as_deref().is_some_and(|name| !name.is_empty())
    }

    pub fn strips(&self) -> Vec<RunwayStrip> {
        self.runways.iter().map(AirportRunway::strip).collect()
    }

    pub fn runway_end_count(&self) -> usize {
        self.runways.len() * 2
    }
}

impl AirportRunway {
    pub fn strip(&self) -> RunwayStrip {
        RunwayStrip::new(
            RunwayEnd {
                identifier: self.le_ident.clone(),
                heading_deg_t: self.le_heading_deg_t,
            },
            RunwayEnd {
                identifier: self.he_ident.clone(),
                heading_deg_t: self.he_heading_deg_t,
            },
        )
    }

    pub fn ends(&self) -> [RunwayEndInfo<'_>; 2] {
        [
            RunwayEndInfo {
                identifier: &self.le_ident,
                heading_deg_t: self.le_heading_deg_t,
                elevation_ft: self.le_elevation_ft,
                displaced_threshold_ft: self.le_displaced_threshold_ft,
                ils: self.le_ils.as_ref(),
            },
            RunwayEndInfo {
                identifier: &self.he_ident,
                heading_deg_t: self.he_heading_deg_t,
                elevation_ft: self.he_elevation_ft,
                displaced_threshold_ft: self.he_displaced_threshold_ft,
                ils: self.he_ils.as_ref(),
            },
        ]
    }
}

pub(crate) async fn fetch_airport(
    client: &Client,
    config: &BotConfig,
    icao: &str,
) -> ApplicationResult<Option<Airport>> {
    let token = config.airportdb_api_token()?;
    let url = format!("{AIRPORTDB_URL}/{icao}");
    let Some(body) = get_text("AirportDB airport", config.http_retries(), || {
        client.get(&url).query(&[("apiToken", token)])
    })
    .await?
    else {
        return Ok(None);
    };
    parse_airport(&body)
}

pub(crate) fn load_airport_file(path: &Path) -> ApplicationResult<Option<Airport>> {
    let reader = BufReader::new(File::open(path)?);
    let airport: Airport = serde_json::from_reader(reader)?;
    Ok(Some(airport).filter(Airport::is_known))
}

fn parse_airport(body: &str) -> ApplicationResult<Option<Airport>> {
    let airport: Airport = serde_json::from_str(body)?;
    Ok(Some(airport).filter(Airport::is_known))
}
