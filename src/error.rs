//! Client-level error types shared across the request pipeline and resource services.

// crates.io
use time::OffsetDateTime;
// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Relative path could not be resolved against the configured base URL.
	#[error("Failed to resolve the request URL.")]
	Url(#[from] url::ParseError),
	/// Request body could not be JSON-encoded.
	#[error("Failed to encode the request body as JSON.")]
	Encode(#[source] serde_json::Error),
	/// Transport failure (DNS, TCP, TLS, redirect policy).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The caller's cancellation token was already done when the transport failed.
	#[error("Request was cancelled by the caller.")]
	Cancelled,
	/// HTTP 202; see [`Accepted`]. Not a hard failure, retry the operation later.
	#[error(transparent)]
	Accepted(#[from] Accepted),
	/// The API rejected the request with a non-2xx status; see [`ApiError`].
	#[error(transparent)]
	Api(Box<ApiError>),
	/// Response body was present but was not the JSON the caller asked for.
	#[error("Failed to decode the response body.")]
	Decode(#[source] serde_path_to_error::Error<serde_json::Error>),
}
impl From<ApiError> for Error {
	fn from(e: ApiError) -> Self {
		Self::Api(Box::new(e))
	}
}

/// Configuration and validation failures raised before a request leaves the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Configured base or upload URL is missing its trailing slash.
	#[error("{kind} URL must have a trailing slash, but {url} does not.")]
	MissingTrailingSlash {
		/// Which configured URL failed validation ("Base" or "Upload").
		kind: &'static str,
		/// Offending URL.
		url: Box<Url>,
	},
	/// A resource method was called without its addressing identifier.
	#[error("A {what} is required to address this resource.")]
	MissingIdentifier {
		/// Human-readable identifier name, e.g. "UUID".
		what: &'static str,
	},
	/// Caller-supplied upload media type is not a valid header value.
	#[error("Media type {media_type:?} is not a valid header value.")]
	InvalidMediaType {
		/// Rejected media type string.
		media_type: String,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure. Any URL attached to the source
	/// error has had its `client_secret` query parameter redacted.
	#[error("Network error occurred while calling the PavedRoad API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// I/O failure while copying a raw response body.
	#[error("I/O error occurred while copying the response body.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(mut e: ReqwestError) -> Self {
		// Secrets must never reach logs through the error chain.
		if let Some(url) = e.url_mut() {
			sanitize_url(url);
		}

		Self::network(e)
	}
}

/// HTTP 202 Accepted condition.
///
/// A job was scheduled on the PavedRoad side to process the information needed and cache it.
/// Technically not a real error; results are not ready yet but should be available soon, so
/// the request can be repeated after some time. `raw` carries the literal response body for
/// caller inspection.
#[derive(Debug, Default, ThisError)]
#[error("Job was scheduled on the PavedRoad side; try again later.")]
pub struct Accepted {
	/// Raw response body.
	pub raw: Vec<u8>,
}

/// Reports one or more errors caused by an API request.
///
/// API error responses are expected to have either no body or a JSON body matching the
/// documented client-error shape; anything else is silently ignored and leaves the structured
/// fields empty.
#[derive(Debug, ThisError)]
#[error("{} {}: {} {} {:?}", method, url, status.as_u16(), message, errors)]
pub struct ApiError {
	/// HTTP method of the request that caused this error.
	pub method: Method,
	/// Request URL with the `client_secret` query parameter redacted.
	pub url: Url,
	/// HTTP status code of the response.
	pub status: StatusCode,
	/// Top-level error message.
	pub message: String,
	/// Field-level detail on individual errors.
	pub errors: Vec<ResourceError>,
	/// Only populated on certain kinds of errors, such as code 451.
	pub block: Option<Block>,
	/// Pointer to content that might help resolve the error.
	pub documentation_url: Option<String>,
}
impl ApiError {
	pub(crate) fn new(method: Method, mut url: Url, status: StatusCode, body: ApiErrorBody) -> Self {
		sanitize_url(&mut url);

		Self {
			method,
			url,
			status,
			message: body.message,
			errors: body.errors,
			block: body.block,
			documentation_url: body.documentation_url,
		}
	}
}

/// Wire shape of a structured PavedRoad error body.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
	#[serde(default)]
	pub message: String,
	#[serde(default)]
	pub errors: Vec<ResourceError>,
	#[serde(default)]
	pub block: Option<Block>,
	#[serde(default)]
	pub documentation_url: Option<String>,
}

/// More detail on an individual error inside an [`ApiError`].
///
/// Validation error codes include `missing`, `missing_field`, `invalid`, `already_exists`,
/// and `custom`; errors with code `custom` always populate `message`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, ThisError)]
#[error("{code} error caused by {field} field on {resource} resource.")]
pub struct ResourceError {
	/// Resource on which the error occurred.
	#[serde(default)]
	pub resource: String,
	/// Field on which the error occurred.
	#[serde(default)]
	pub field: String,
	/// Validation error code.
	#[serde(default)]
	pub code: String,
	/// Message describing the error.
	#[serde(default)]
	pub message: String,
}

/// Abuse-block detail attached to certain API errors.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Block {
	/// Reason the resource was blocked.
	#[serde(default)]
	pub reason: String,
	/// When the block was created.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
}

/// Redacts the `client_secret` query parameter in place; other parameters are untouched.
pub fn sanitize_url(url: &mut Url) {
	if !url.query_pairs().any(|(k, _)| k == "client_secret") {
		return;
	}

	let pairs = url
		.query_pairs()
		.map(|(k, v)| {
			let v = if k == "client_secret" { "REDACTED".into() } else { v.into_owned() };

			(k.into_owned(), v)
		})
		.collect::<Vec<_>>();

	url.query_pairs_mut().clear().extend_pairs(pairs);
}

/// Determines the boolean result from a PavedRoad API response.
///
/// Several API methods signal their result purely through the HTTP status code: a 2xx means
/// true, a 404 means false. This helper hides the 404 error in that one case; any other
/// error is passed through as-is.
pub fn bool_from_response<T>(result: Result<T>) -> Result<bool> {
	match result {
		Ok(_) => Ok(true),
		Err(Error::Api(e)) if e.status == StatusCode::NOT_FOUND => Ok(false),
		Err(e) => Err(e),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn api_error(status: StatusCode) -> Error {
		ApiError::new(
			Method::GET,
			Url::parse("https://api.pavedroad.io/api/v1/namespace/pavedroad.io/prTokens/x")
				.expect("Failed to parse test URL."),
			status,
			ApiErrorBody::default(),
		)
		.into()
	}

	#[test]
	fn sanitize_url_redacts_client_secret_only() {
		let mut url = Url::parse("https://example.com/cb?client_secret=topsecret&state=ok")
			.expect("Failed to parse test URL.");

		sanitize_url(&mut url);

		assert_eq!(url.query(), Some("client_secret=REDACTED&state=ok"));
	}

	#[test]
	fn sanitize_url_leaves_secretless_urls_untouched() {
		let mut url =
			Url::parse("https://example.com/cb?state=ok").expect("Failed to parse test URL.");

		sanitize_url(&mut url);

		assert_eq!(url.query(), Some("state=ok"));
	}

	#[test]
	fn bool_from_response_hides_not_found_only() {
		assert!(matches!(bool_from_response(Ok(())), Ok(true)));
		assert!(matches!(bool_from_response::<()>(Err(api_error(StatusCode::NOT_FOUND))), Ok(false)));
		assert!(matches!(
			bool_from_response::<()>(Err(api_error(StatusCode::BAD_REQUEST))),
			Err(Error::Api(e)) if e.status == StatusCode::BAD_REQUEST,
		));
	}

	#[test]
	fn error_body_decodes_field_level_detail() {
		let body = serde_json::from_str::<ApiErrorBody>(
			"{\"message\":\"m\",\"errors\":[{\"resource\":\"r\",\"field\":\"f\",\"code\":\"c\"}]}",
		)
		.expect("Failed to decode structured error body.");

		assert_eq!(body.message, "m");
		assert_eq!(body.errors.len(), 1);
		assert_eq!(body.errors[0].resource, "r");
		assert_eq!(body.errors[0].field, "f");
		assert_eq!(body.errors[0].code, "c");
		assert!(body.errors[0].message.is_empty());
	}

	#[test]
	fn api_error_display_redacts_request_url() {
		let err = ApiError::new(
			Method::GET,
			Url::parse("https://example.com/x?client_secret=topsecret")
				.expect("Failed to parse test URL."),
			StatusCode::FORBIDDEN,
			ApiErrorBody { message: "blocked".into(), ..Default::default() },
		);
		let rendered = err.to_string();

		assert!(rendered.contains("REDACTED"));
		assert!(!rendered.contains("topsecret"));
		assert!(rendered.contains("403"));
		assert!(rendered.contains("blocked"));
	}
}
