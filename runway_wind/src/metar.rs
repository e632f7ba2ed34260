use std::str::FromStr;

use nom::{
    Finish, IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take, take_while_m_n},
    character::complete::{char, u32},
    combinator::{all_consuming, map_parser, map_res, opt, value},
    sequence::{preceded, separated_pair},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{ResolverError, ResolverResult},
    wind::WindObservation,
};

const KNOTS_PER_METER_PER_SECOND: f64 = 1.943_844;
const KNOTS_PER_KILOMETER_PER_HOUR: f64 = 0.539_957;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindDirection {
    Heading(u16),
    Variable,
    /// `///` from an automatic station that could not measure direction.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedUnit {
    Knots,
    MetersPerSecond,
    KilometersPerHour,
}

impl SpeedUnit {
    pub fn to_knots(self, value: u32) -> f64 {
        let value = f64::from(value);
        match self {
            Self::Knots => value,
            Self::MetersPerSecond => value * KNOTS_PER_METER_PER_SECOND,
            Self::KilometersPerHour => value * KNOTS_PER_KILOMETER_PER_HOUR,
        }
    }
}

/// Which speed of a gusting wind to feed into the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedBasis {
    #[default]
    Sustained,
    Gust,
}

/// The wind group of a METAR, e.g. `27015G25KT 240V300`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetarWind {
    pub direction: WindDirection,
    pub speed: Option<u32>,
    pub gust: Option<u32>,
    pub unit: SpeedUnit,
    pub varying: Option<(u16, u16)>,
}

impl MetarWind {
    pub fn speed_knots(&self) -> Option<f64> {
        self.speed.map(|s| self.unit.to_knots(s))
    }

    pub fn gust_knots(&self) -> Option<f64> {
        self.gust.map(|g| self.unit.to_knots(g))
    }

    /// Turns the group into something the resolver can use.
    ///
    /// `Ok(None)` when the group has no usable direction or speed. Calm
    /// wind reported as `VRB00KT` still counts as calm.
    pub fn observation(&self, basis: SpeedBasis) -> ResolverResult<Option<WindObservation>> {
        let Some(sustained) = self.speed_knots() else {
            debug!(wind = ?self, "METAR wind has no speed");
            return Ok(None);
        };
        let speed = match basis {
            SpeedBasis::Sustained => sustained,
            SpeedBasis::Gust => self.gust_knots().unwrap_or(sustained),
        };
        match self.direction {
            WindDirection::Heading(direction) => {
                WindObservation::new(f64::from(direction), speed).map(Some)
            }
            WindDirection::Variable | WindDirection::Unknown if speed == 0.0 => {
                Ok(Some(WindObservation::calm()))
            }
            WindDirection::Variable | WindDirection::Unknown => {
                debug!(wind = ?self, "METAR wind has no resolvable direction");
                Ok(None)
            }
        }
    }
}

impl FromStr for MetarWind {
    type Err = ResolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (_, wind) = all_consuming(nom_metar_wind)
            .parse(s.trim())
            .finish()
            .map_err(|e| nom::error::Error::new(e.input.to_string(), e.code))?;
        Ok(wind)
    }
}

/// Finds the wind group in a full METAR, including the variable sector
/// that may follow it.
pub fn find_wind_in_metar(raw: &str) -> ResolverResult<MetarWind> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    for (index, &token) in tokens.iter().enumerate() {
        let Ok((_, mut wind)) = all_consuming(nom_wind_group).parse(token).finish() else {
            continue;
        };
        if let Some(&next) = tokens.get(index + 1)
            && let Ok((_, sector)) = all_consuming(nom_varying_sector).parse(next).finish()
        {
            wind.varying = Some(sector);
        }
        return Ok(wind);
    }
    Err(ResolverError::MissingWindGroup(raw.to_string()))
}

pub fn nom_metar_wind(input: &str) -> IResult<&str, MetarWind> {
    (nom_wind_group, opt(preceded(char(' '), nom_varying_sector)))
        .map(|(wind, varying)| MetarWind { varying, ..wind })
        .parse(input)
}

fn nom_wind_group(input: &str) -> IResult<&str, MetarWind> {
    (
        nom_wind_direction,
        nom_speed,
        opt(preceded(char('G'), nom_speed)),
        nom_speed_unit,
    )
        .map(|(direction, speed, gust, unit)| MetarWind {
            direction,
            speed,
            gust: gust.flatten(),
            unit,
            varying: None,
        })
        .parse(input)
}

fn nom_wind_direction(input: &str) -> IResult<&str, WindDirection> {
    alt((
        value(WindDirection::Variable, tag("VRB")),
        value(WindDirection::Unknown, tag("///")),
        map_res(nom_three_digits, |degrees| {
            if degrees <= 360 {
                Ok(WindDirection::Heading(degrees))
            } else {
                Err("Wind direction above 360")
            }
        }),
    ))
    .parse(input)
}

fn nom_speed(input: &str) -> IResult<&str, Option<u32>> {
    alt((
        value(None, tag("//")),
        map_res(
            take_while_m_n(2, 3, |c: char| c.is_ascii_digit()),
            |digits: &str| digits.parse::<u32>().map(Some),
        ),
    ))
    .parse(input)
}

fn nom_speed_unit(input: &str) -> IResult<&str, SpeedUnit> {
    alt((
        value(SpeedUnit::Knots, tag("KT")),
        value(SpeedUnit::MetersPerSecond, tag("MPS")),
        value(SpeedUnit::KilometersPerHour, tag("KMH")),
    ))
    .parse(input)
}

fn nom_varying_sector(input: &str) -> IResult<&str, (u16, u16)> {
    separated_pair(nom_three_digits, char('V'), nom_three_digits).parse(input)
}

fn nom_three_digits(input: &str) -> IResult<&str, u16> {
    map_parser(take(3usize), all_consuming(u32))
        .map_res(u16::try_from)
        .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wind_groups() {
        assert_eq!(
            "27015G25KT".parse::<MetarWind>().unwrap(),
            MetarWind {
                direction: WindDirection::Heading(270),
                speed: Some(15),
                gust: Some(25),
                unit: SpeedUnit::Knots,
                varying: None,
            }
        );
        assert_eq!(
            "VRB03KT".parse::<MetarWind>().unwrap().direction,
            WindDirection::Variable
        );
        assert_eq!(
            "30009KT 250V330".parse::<MetarWind>().unwrap().varying,
            Some((250, 330))
        );
        let unknown = "/////KT".parse::<MetarWind>().unwrap();
        assert_eq!(unknown.direction, WindDirection::Unknown);
        assert_eq!(unknown.speed, None);
        assert_eq!("240105KT".parse::<MetarWind>().unwrap().speed, Some(105));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!("9999".parse::<MetarWind>().is_err());
        assert!("37010KT".parse::<MetarWind>().is_err());
        assert!("27015".parse::<MetarWind>().is_err());
        assert!(matches!(
            "Q1013".parse::<MetarWind>(),
            Err(ResolverError::MetarParse(_))
        ));
    }

    #[test]
    fn test_unit_conversion() {
        let mps = "24008MPS".parse::<MetarWind>().unwrap();
        assert_eq!(mps.unit, SpeedUnit::MetersPerSecond);
        assert!((mps.speed_knots().unwrap() - 15.55).abs() < 0.01);

        let kmh = "24020KMH".parse::<MetarWind>().unwrap();
        assert!((kmh.speed_knots().unwrap() - 10.8).abs() < 0.01);
    }

    #[test]
    fn test_find_wind_in_metars() {
        let input = include_str!("../test.metars");
        for line in input.lines().filter(|l| !l.trim().is_empty()) {
            let wind = find_wind_in_metar(line)
                .unwrap_or_else(|e| panic!("Failed to find wind in '{line}': {e}"));
            assert!(matches!(
                wind.unit,
                SpeedUnit::Knots | SpeedUnit::MetersPerSecond
            ));
        }
    }

    #[test]
    fn test_find_wind_with_sector() {
        let wind =
            find_wind_in_metar("ENMH 220550Z AUTO 30009KT 250V330 9999 BKN028/// 07/02 Q1016")
                .unwrap();
        assert_eq!(wind.direction, WindDirection::Heading(300));
        assert_eq!(wind.varying, Some((250, 330)));
    }

    #[test]
    fn test_missing_wind_group() {
        assert!(matches!(
            find_wind_in_metar("EPKK 081200Z 9999 SCT020 10/05 Q1013"),
            Err(ResolverError::MissingWindGroup(_))
        ));
    }

    #[test]
    fn test_observation() {
        let gusty = "27015G25KT".parse::<MetarWind>().unwrap();
        let sustained = gusty.observation(SpeedBasis::Sustained).unwrap().unwrap();
        assert_eq!(sustained.direction_deg(), 270.0);
        assert_eq!(sustained.speed_knots(), 15.0);
        let gust = gusty.observation(SpeedBasis::Gust).unwrap().unwrap();
        assert_eq!(gust.speed_knots(), 25.0);

        let calm = "00000KT".parse::<MetarWind>().unwrap();
        assert_eq!(
            calm.observation(SpeedBasis::Sustained).unwrap(),
            Some(WindObservation::calm())
        );
        let calm_vrb = "VRB00KT".parse::<MetarWind>().unwrap();
        assert_eq!(
            calm_vrb.observation(SpeedBasis::Gust).unwrap(),
            Some(WindObservation::calm())
        );

        let variable = "VRB03KT".parse::<MetarWind>().unwrap();
        assert_eq!(variable.observation(SpeedBasis::Sustained).unwrap(), None);
        let unknown = "/////KT".parse::<MetarWind>().unwrap();
        assert_eq!(unknown.observation(SpeedBasis::Sustained).unwrap(), None);
    }
}
