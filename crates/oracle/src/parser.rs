use thiserror::Error;

/// Typed fields of a sharing-stage oracle response.
#[derive(Debug, Clone, PartialEq)]
pub struct SharingDecision {
    pub emotion: f64,
    pub willingness: f64,
    pub credibility: f64,
    pub share_to: Vec<u64>,
}

impl Default for SharingDecision {
    /// Neutral fallback used whenever a response fails to parse.
    fn default() -> Self {
        Self {
            emotion: 0.5,
            willingness: 0.5,
            credibility: 0.5,
            share_to: Vec::new(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("expected 4 semicolon-separated fields, got {0}")]
    MissingFields(usize),
    #[error("field {0} has no value after ':'")]
    MissingValue(usize),
    #[error("field {0} is not a number: {1:?}")]
    InvalidNumber(usize, String),
    #[error("share list is not a JSON array of ids: {0:?}")]
    InvalidShareList(String),
}

/// Parse the expected sharing-response shape:
///
/// `Emotion: <f>; Willingness: <f>; Credibility: <f>; Share_to: [ids]`
///
/// Field order is fixed; labels are not validated, only the values. Any
/// deviation (including the transport sentinel "none") is a [`ParseError`];
/// callers substitute [`SharingDecision::default`] and keep going.
pub fn parse_sharing_response(text: &str) -> Result<SharingDecision, ParseError> {
    let parts: Vec<&str> = text.split(';').collect();
    if parts.len() < 4 {
        return Err(ParseError::MissingFields(parts.len()));
    }

    let emotion = parse_float_field(parts[0], 0)?;
    let willingness = parse_float_field(parts[1], 1)?;
    let credibility = parse_float_field(parts[2], 2)?;

    let share_part = field_value(parts[3], 3)?;
    let share_to: Vec<u64> = serde_json::from_str(share_part)
        .map_err(|_| ParseError::InvalidShareList(share_part.to_string()))?;

    Ok(SharingDecision {
        emotion,
        willingness,
        credibility,
        share_to,
    })
}

fn field_value(part: &str, index: usize) -> Result<&str, ParseError> {
    part.splitn(2, ':')
        .nth(1)
        .map(str::trim)
        .ok_or(ParseError::MissingValue(index))
}

fn parse_float_field(part: &str, index: usize) -> Result<f64, ParseError> {
    let value = field_value(part, index)?;
    value
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidNumber(index, value.to_string()))
}
