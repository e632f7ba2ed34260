use indexmap::IndexMap;
use itertools::Itertools;
use jiff::Zoned;
use runway_wind::{
    CrosswindSide, Resolution, RunwayClassification, SafetyBand, SafetyThresholds, SkipReason,
    SkippedRunwayEnd, WindObservation, WindStatus,
};
use serde::Serialize;

use crate::{
    airport::{Airport, RunwayEndInfo},
    error::ApplicationResult,
    metar::DecodedMetar,
    util::feet_to_meters,
};

const NOT_AVAILABLE: &str = "n/a";

/// Everything the `info` command prints for one airport.
pub(crate) struct InfoReport<'a> {
    pub icao: &'a str,
    pub airport: &'a Airport,
    pub metar: &'a DecodedMetar,
    pub resolution: Option<&'a Resolution>,
    pub thresholds: &'a SafetyThresholds,
    pub generated: String,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    icao: &'a str,
    airport: Option<&'a str>,
    wind: Option<&'a WindObservation>,
    runways: IndexMap<&'a str, JsonRunway<'a>>,
    skipped: &'a [SkippedRunwayEnd],
    generated: &'a str,
}

#[derive(Debug, Serialize)]
struct JsonRunway<'a> {
    #[serde(flatten)]
    classification: &'a RunwayClassification,
    safety: SafetyBand,
}

pub(crate) fn generated_at(timezone: &str) -> ApplicationResult<String> {
    Ok(Zoned::now()
        .in_tz(timezone)?
        .strftime("%H:%M %d/%m/%Y")
        .to_string())
}

pub(crate) fn airport_not_found(icao: &str) -> String {
    format!("Airport {icao} is not in the database, or there is no weather for it.")
}

impl InfoReport<'_> {
    pub fn render_text(&self) -> String {
        [
            self.airport_section(),
            self.weather_section(),
            self.runway_section(),
        ]
        .join("\n\n")
    }

    pub fn render_json(&self) -> ApplicationResult<String> {
        let runways: IndexMap<&str, JsonRunway<'_>> = self
            .resolution
            .map(|resolution| {
                resolution
                    .classifications
                    .iter()
                    .map(|(ident, classification)| {
                        (
                            ident.as_str(),
                            JsonRunway {
                                classification,
                                safety: classification.safety(self.thresholds),
                            },
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();
        let report = JsonReport {
            icao: self.icao,
            airport: self.airport.name.as_deref(),
            wind: self.resolution.map(|resolution| &resolution.wind),
            runways,
            skipped: self
                .resolution
                .map(|resolution| resolution.skipped.as_slice())
                .unwrap_or_default(),
            generated: &self.generated,
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    fn airport_section(&self) -> String {
        let airport = self.airport;
        [
            format!(
                "== {} {} ==",
                self.icao,
                airport.name.as_deref().unwrap_or_default()
            ),
            format!(
                "IATA code: {}",
                airport
                    .iata_code
                    .as_deref()
                    .filter(|code| !code.is_empty())
                    .unwrap_or(NOT_AVAILABLE)
            ),
            format!("Elevation: {}", format_elevation(airport.elevation_ft)),
            format!("Runway ends: {}", airport.runway_end_count()),
            format!(
                "Wikipedia: {}",
                airport
                    .wikipedia_link
                    .as_deref()
                    .filter(|link| !link.is_empty())
                    .unwrap_or(NOT_AVAILABLE)
            ),
        ]
        .join("\n")
    }

    fn weather_section(&self) -> String {
        let metar = self.metar;
        [
            "== Weather ==".to_string(),
            format!(
                "RAW: {}",
                metar.raw_text.as_deref().unwrap_or(NOT_AVAILABLE)
            ),
            format!(
                "Pressure: {}",
                format_value(metar.barometer.as_ref().and_then(|b| b.hpa), "hPa")
            ),
            format!(
                "Humidity: {}",
                format_value(metar.humidity.as_ref().and_then(|h| h.percent), "%")
            ),
            format!(
                "Temperature: {}",
                format_value(metar.temperature.as_ref().and_then(|t| t.celsius), "°C")
            ),
            format!(
                "Dew point: {}",
                format_value(metar.dewpoint.as_ref().and_then(|t| t.celsius), "°C")
            ),
            format!("Visibility: {}", self.visibility_text()),
            format!("Wind: {}", self.wind_text()),
        ]
        .join("\n")
    }

    fn visibility_text(&self) -> String {
        match self.metar.visibility.as_ref().and_then(|v| v.meters.as_ref()) {
            Some(serde_json::Value::String(meters)) if !meters.is_empty() => format!("{meters} m"),
            Some(serde_json::Value::Number(meters)) => format!("{meters} m"),
            _ => NOT_AVAILABLE.to_string(),
        }
    }

    fn wind_text(&self) -> String {
        let gust = self
            .metar
            .wind
            .as_ref()
            .and_then(|wind| wind.gust_kts)
            .map(|gust| format!(" (gusts {gust}kts)"))
            .unwrap_or_default();
        let varying = self
            .metar
            .varying_sector()
            .map(|(from, to)| format!(", varying {from:03}° to {to:03}°"))
            .unwrap_or_default();
        match self.resolution {
            Some(resolution) => format!(
                "{}° / {}kts{gust}{varying}",
                resolution.wind.direction_deg(),
                resolution.wind.speed_knots()
            ),
            None => format!("no usable wind{varying}"),
        }
    }

    fn runway_section(&self) -> String {
        let Some(resolution) = self.resolution else {
            return [
                "== Runways ==".to_string(),
                "No wind data, runway winds are unavailable.".to_string(),
                format!("Generated {}", self.generated),
            ]
            .join("\n");
        };

        let runways = self
            .airport
            .runways
            .iter()
            .flat_map(|runway| runway.ends())
            .map(|end| self.runway_end_text(resolution, &end))
            .join("\n\n");

        [
            "== Runways ==".to_string(),
            runways,
            format!("Generated {}", self.generated),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .join("\n")
    }

    fn runway_end_text(&self, resolution: &Resolution, end: &RunwayEndInfo<'_>) -> String {
        let (title, wind) = match resolution.classifications.get(end.identifier) {
            Some(classification) => (
                format!(
                    "Runway {} {} {}",
                    end.identifier,
                    safety_marker(classification.safety(self.thresholds)),
                    format_wind_components(classification)
                ),
                describe_wind(classification),
            ),
            None => (
                format!("Runway {}", end.identifier),
                skipped_reason(&resolution.skipped, end.identifier),
            ),
        };

        [
            title,
            format!("  Wind: {wind}"),
            format!("  Elevation: {}", format_elevation(end.elevation_ft)),
            format!(
                "  Heading: {}",
                format_value(end.heading_deg_t, "°")
            ),
            format!(
                "  Displaced threshold: {}",
                match end.displaced_threshold_ft {
                    Some(ft) if ft > 0.0 => format_elevation(Some(ft)),
                    _ => "none".to_string(),
                }
            ),
            format!(
                "  ILS: {}",
                match end.ils {
                    Some(ils) => format!(
                        "{} / {}",
                        format_value(ils.freq, ""),
                        format_value(ils.course, "°")
                    ),
                    None => "none".to_string(),
                }
            ),
        ]
        .join("\n")
    }
}

fn skipped_reason(skipped: &[SkippedRunwayEnd], identifier: &str) -> String {
    match skipped.iter().find(|s| s.identifier == identifier) {
        Some(s) => match s.reason {
            SkipReason::MissingHeading => "no heading data".to_string(),
            SkipReason::DuplicateIdentifier => "duplicate runway identifier".to_string(),
        },
        None => NOT_AVAILABLE.to_string(),
    }
}

fn safety_marker(band: SafetyBand) -> &'static str {
    match band {
        SafetyBand::Safe => "🟩",
        SafetyBand::Caution => "⚠️",
        SafetyBand::Unsafe => "🟥",
    }
}

fn describe_wind(classification: &RunwayClassification) -> String {
    match classification.status {
        WindStatus::Headwind => format!("headwind, {}kts", classification.head_tail_knots()),
        WindStatus::Tailwind => format!("tailwind, {}kts", classification.head_tail_knots()),
        WindStatus::Crosswind => {
            let side = match classification.cross_side {
                Some(CrosswindSide::Left) => " from the left",
                Some(CrosswindSide::Right) => " from the right",
                None => "",
            };
            format!(
                "crosswind, {}kts{side}",
                classification.cross_component_knots
            )
        }
    }
}

/// Compact arrows: head/tail first, then the cross component pointing the
/// way the wind pushes. Always eight characters wide below 100 kt.
fn format_wind_components(classification: &RunwayClassification) -> String {
    const CALM_THRESHOLD: f64 = 1.0;
    const CALM: &str = "○";
    const HEADWIND: &str = "↑";
    const TAILWIND: &str = "↓";
    const INWARD_FROM_LEFT: &str = "→";
    const INWARD_FROM_RIGHT: &str = "←";

    let longitudinal = if classification.headwind_knots() > CALM_THRESHOLD {
        format!("{HEADWIND}{:>2.0}", classification.headwind_knots())
    } else if classification.tailwind_knots() > CALM_THRESHOLD {
        format!("{TAILWIND}{:>2.0}", classification.tailwind_knots())
    } else {
        format!("{CALM}  ")
    };

    let cross = if classification.cross_component_knots > CALM_THRESHOLD {
        match classification.cross_side {
            Some(CrosswindSide::Left) => {
                format!("{INWARD_FROM_LEFT}{:>2.0} ", classification.cross_component_knots)
            }
            Some(CrosswindSide::Right) => {
                format!(" {:>2.0}{INWARD_FROM_RIGHT}", classification.cross_component_knots)
            }
            None => format!(" {CALM}  "),
        }
    } else {
        format!(" {CALM}  ")
    };

    format!("{longitudinal} {cross}")
}

fn format_value(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(value) => format!("{value}{unit}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn format_elevation(feet: Option<f64>) -> String {
    match feet {
        Some(feet) => format!("{feet}ft / {}m", feet_to_meters(feet)),
        None => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use runway_wind::{metar::SpeedBasis, resolve};

    use super::*;
    use crate::airport::tests::make_test_airport;

    fn classify(direction: f64, speed: f64, heading: f64) -> RunwayClassification {
        RunwayClassification::from_wind(&WindObservation::new(direction, speed).unwrap(), heading)
    }

    fn render(metar: &DecodedMetar, json: bool) -> String {
        let airport = make_test_airport();
        let wind = metar.wind_observation(SpeedBasis::Sustained).unwrap();
        let resolution = resolve(wind.as_ref(), Some(airport.strips().as_slice())).unwrap();
        let report = InfoReport {
            icao: "EPKK",
            airport: &airport,
            metar,
            resolution: resolution.as_ref(),
            thresholds: &SafetyThresholds::default(),
            generated: "12:30 16/10/2026".to_string(),
        };
        if json {
            report.render_json().unwrap()
        } else {
            report.render_text()
        }
    }

    #[test]
    fn test_wind_components_keep_width() {
        let calm = RunwayClassification::from_wind(&WindObservation::calm(), 90.0);
        let head = classify(90.0, 20.0, 90.0);
        let left = classify(0.0, 12.0, 90.0);
        let right = classify(180.0, 12.0, 90.0);
        assert_eq!(format_wind_components(&calm), "○    ○  ");
        assert_eq!(format_wind_components(&head), "↑20  ○  ");
        assert_eq!(format_wind_components(&left), "○   →12 ");
        assert_eq!(format_wind_components(&right), "○    12←");
        for c in [calm, head, left, right] {
            assert_eq!(format_wind_components(&c).chars().count(), 8);
        }
    }

    #[test]
    fn test_describe_wind() {
        assert_eq!(describe_wind(&classify(90.0, 20.0, 90.0)), "headwind, 20kts");
        assert_eq!(describe_wind(&classify(270.0, 15.0, 90.0)), "tailwind, 15kts");
        assert_eq!(
            describe_wind(&classify(180.0, 12.0, 90.0)),
            "crosswind, 12kts from the right"
        );
    }

    #[test]
    fn test_safety_markers() {
        let thresholds = SafetyThresholds::default();
        assert_eq!(safety_marker(classify(270.0, 15.0, 90.0).safety(&thresholds)), "🟥");
        assert_eq!(safety_marker(classify(180.0, 12.0, 90.0).safety(&thresholds)), "⚠️");
        assert_eq!(safety_marker(classify(90.0, 12.0, 90.0).safety(&thresholds)), "🟩");
    }

    #[test]
    fn test_render_text_report() {
        let metar = DecodedMetar::from_raw("EPKK 161230Z 25412KT 9999 FEW030 14/06 Q1018");
        let text = render(&metar, false);

        assert!(text.contains("== EPKK Kraków John Paul II International Airport =="));
        assert!(text.contains("Elevation: 791ft / 241m"));
        assert!(text.contains("Runway ends: 4"));
        assert!(text.contains("Wind: 254° / 12kts"));
        assert!(text.contains("Runway 25 🟩 ↑12  ○  \n  Wind: headwind, 12kts"));
        assert!(text.contains("Runway 07 🟥 ↓12  ○  \n  Wind: tailwind, 12kts"));
        assert!(text.contains("  Displaced threshold: 492ft / 150m"));
        assert!(text.contains("  ILS: 109.9 / 74°"));
        assert!(text.contains("Runway H1\n  Wind: no heading data"));
        assert!(text.ends_with("Generated 12:30 16/10/2026"));
    }

    #[test]
    fn test_render_varying_wind() {
        let metar = DecodedMetar::from_raw("EPKK 161230Z 25412KT 220V280 9999 FEW030 14/06 Q1018");
        let text = render(&metar, false);
        assert!(text.contains("Wind: 254° / 12kts, varying 220° to 280°\n"));

        let light = DecodedMetar::from_raw("EPKK 161230Z VRB05KT 050V110 9999 FEW030 14/06 Q1018");
        assert!(render(&light, false).contains("Wind: no usable wind, varying 050° to 110°"));
    }

    #[test]
    fn test_skipped_reason_wording() {
        let skipped = [
            SkippedRunwayEnd {
                identifier: "H1".to_string(),
                reason: SkipReason::MissingHeading,
            },
            SkippedRunwayEnd {
                identifier: "07".to_string(),
                reason: SkipReason::DuplicateIdentifier,
            },
        ];
        assert_eq!(skipped_reason(&skipped, "H1"), "no heading data");
        assert_eq!(skipped_reason(&skipped, "07"), "duplicate runway identifier");
        assert_eq!(skipped_reason(&skipped, "25"), NOT_AVAILABLE);
    }

    #[test]
    fn test_render_without_wind() {
        let metar = DecodedMetar::from_raw("EPKK 161230Z VRB05KT 9999 FEW030 14/06 Q1018");
        let text = render(&metar, false);
        assert!(text.contains("Wind: no usable wind"));
        assert!(text.contains("No wind data, runway winds are unavailable."));
    }

    #[test]
    fn test_render_json_report() {
        let metar = DecodedMetar::from_raw("EPKK 161230Z 16412KT 9999 FEW030 14/06 Q1018");
        let json: serde_json::Value = serde_json::from_str(&render(&metar, true)).unwrap();

        assert_eq!(json["icao"], "EPKK");
        assert_eq!(json["runways"]["07"]["status"], "crosswind");
        assert_eq!(json["runways"]["07"]["cross_side"], "right");
        assert_eq!(json["runways"]["07"]["safety"], "caution");
        assert_eq!(json["runways"]["25"]["cross_side"], "left");
        assert_eq!(json["skipped"][0]["identifier"], "H1");
        assert_eq!(json["skipped"][0]["reason"], "missing_heading");
    }
}
