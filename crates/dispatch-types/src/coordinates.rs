//! Coordinate pair validation.
//!
//! Clients submit origins and destinations as `[latitude, longitude]`
//! sequences of decimal strings. A pair is accepted only when it has exactly
//! two elements, both are plain decimal numbers, the latitude lies in
//! `[-90, 90]` and the longitude in `[-180, 180]`.

use thiserror::Error;

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// The only classification a coordinate failure carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CoordinateError {
	#[error("invalid coordinates")]
	InvalidCoordinates,
}

impl CoordinateError {
	/// Machine-readable error code.
	pub fn code(&self) -> &'static str {
		match self {
			CoordinateError::InvalidCoordinates => "invalid_coordinates",
		}
	}
}

/// A validated `(latitude, longitude)` pair.
///
/// Keeps the submitted text so the distance provider receives exactly what
/// the client sent, joined as `"lat,lng"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
	latitude: f64,
	longitude: f64,
	location: String,
}

impl Coordinates {
	pub fn latitude(&self) -> f64 {
		self.latitude
	}

	pub fn longitude(&self) -> f64 {
		self.longitude
	}

	/// Location string in the `"lat,lng"` form expected by mapping providers.
	pub fn as_location(&self) -> &str {
		&self.location
	}
}

/// Validates an ordered `[latitude, longitude]` pair.
pub fn validate_pair<S: AsRef<str>>(pair: &[S]) -> Result<Coordinates, CoordinateError> {
	let [latitude, longitude] = pair else {
		return Err(CoordinateError::InvalidCoordinates);
	};
	let (latitude, longitude) = (latitude.as_ref(), longitude.as_ref());

	let lat = parse_in_range(latitude, MIN_LATITUDE, MAX_LATITUDE)?;
	let lng = parse_in_range(longitude, MIN_LONGITUDE, MAX_LONGITUDE)?;

	Ok(Coordinates {
		latitude: lat,
		longitude: lng,
		location: format!("{},{}", latitude, longitude),
	})
}

/// Boolean form of [`validate_pair`].
pub fn is_valid_pair<S: AsRef<str>>(pair: &[S]) -> bool {
	validate_pair(pair).is_ok()
}

fn parse_in_range(value: &str, min: f64, max: f64) -> Result<f64, CoordinateError> {
	if !is_plain_decimal(value) {
		return Err(CoordinateError::InvalidCoordinates);
	}
	let parsed: f64 = value
		.parse()
		.map_err(|_| CoordinateError::InvalidCoordinates)?;
	if (min..=max).contains(&parsed) {
		Ok(parsed)
	} else {
		Err(CoordinateError::InvalidCoordinates)
	}
}

/// Accepts `[+-]digits[.digits]` only, with no leading zeros in the integer
/// part. Rejects exponents, `inf`, `NaN`, whitespace and bare dots that
/// `f64::from_str` would otherwise allow.
fn is_plain_decimal(value: &str) -> bool {
	let unsigned = value
		.strip_prefix('-')
		.or_else(|| value.strip_prefix('+'))
		.unwrap_or(value);

	let (integer, fraction) = match unsigned.split_once('.') {
		Some((integer, fraction)) => (integer, Some(fraction)),
		None => (unsigned, None),
	};

	let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

	let no_leading_zero = integer == "0" || !integer.starts_with('0');

	all_digits(integer) && no_leading_zero && fraction.is_none_or(all_digits)
}
