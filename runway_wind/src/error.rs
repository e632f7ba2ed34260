use thiserror::Error;

pub type ResolverResult<T> = Result<T, ResolverError>;

#[derive(Debug, Error, PartialEq)]
pub enum ResolverError {
    #[error("Invalid wind measurement, {field} is {value}")]
    InvalidMeasurement { field: MeasurementField, value: f64 },
    #[error("Failed to parse METAR: {0}")]
    MetarParse(#[from] nom::error::Error<String>),
    #[error("No wind group found in METAR: {0}")]
    MissingWindGroup(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementField {
    Direction,
    Speed,
}

impl std::fmt::Display for MeasurementField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Direction => "wind direction",
            Self::Speed => "wind speed",
        })
    }
}
