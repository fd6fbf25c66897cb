//! PavedRoad API client: configuration, request construction, and the dispatch pipeline.

// std
use std::io::Write;
// self
use crate::{
	_prelude::*,
	error::{Accepted, ApiError, ApiErrorBody, ConfigError, TransportError},
	resource::{TokensService, UserIdMappersService},
	response::Response,
	transport::{HttpTransport, Transport},
};

/// Default base URL for API requests. PavedRoad APIs follow kubernetes conventions, so every
/// resource path is relative to `/api/v1/namespace/{namespace}/`; the default namespace is
/// `pavedroad.io`.
pub const DEFAULT_BASE_URL: &str = "https://api.pavedroad.io/api/v1/namespace/pavedroad.io/";
/// Default base URL for uploading files.
pub const DEFAULT_UPLOAD_URL: &str = "https://uploads.pavedroad.io/";
/// Versioned media type requested from the API via the `Accept` header.
pub const MEDIA_TYPE_V3: &str = "application/vnd.pavedroad.v3+json";
/// Media type applied to uploads when the caller does not specify one.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";
/// User agent sent with requests unless reconfigured.
pub const DEFAULT_USER_AGENT: &str = "pavedroad-client";

/// A `Client` manages communication with the PavedRoad API.
///
/// Configuration is fixed at construction time via the consuming `with_*` methods; after
/// that the client is read-only and safe to share across tasks issuing independent requests.
/// The client performs no retries and enforces no timeouts of its own; configure those on
/// the transport.
#[derive(Clone)]
pub struct Client {
	transport: Arc<dyn Transport>,
	/// Base URL for API requests. Defaults to the public PavedRoad API, but can be set to a
	/// domain endpoint for on-premise installations. Must always carry a trailing slash.
	pub base_url: Url,
	/// Base URL for uploading files. Must always carry a trailing slash.
	pub upload_url: Url,
	/// User agent used when communicating with the PavedRoad API. `None` or an empty string
	/// omits the header entirely.
	pub user_agent: Option<String>,
}
impl Client {
	/// Creates a client for the public PavedRoad API backed by a stock reqwest transport.
	///
	/// To issue authenticated requests, install a
	/// [`BasicAuthTransport`](crate::transport::BasicAuthTransport) via
	/// [`with_transport`](Client::with_transport).
	pub fn new() -> Self {
		Self {
			transport: Arc::new(HttpTransport::default()),
			base_url: Url::parse(DEFAULT_BASE_URL).expect("Default base URL is valid."),
			upload_url: Url::parse(DEFAULT_UPLOAD_URL).expect("Default upload URL is valid."),
			user_agent: Some(DEFAULT_USER_AGENT.into()),
		}
	}

	/// Replaces the transport used for every outbound request.
	pub fn with_transport<T>(mut self, transport: T) -> Self
	where
		T: Transport,
	{
		self.transport = Arc::new(transport);

		self
	}

	/// Replaces the base URL; the URL path must end with a trailing slash.
	pub fn with_base_url(mut self, base_url: Url) -> Self {
		self.base_url = base_url;

		self
	}

	/// Replaces the upload URL; the URL path must end with a trailing slash.
	pub fn with_upload_url(mut self, upload_url: Url) -> Self {
		self.upload_url = upload_url;

		self
	}

	/// Replaces the user agent; an empty string omits the header entirely.
	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());

		self
	}

	/// Token resource methods.
	pub fn tokens(&self) -> TokensService<'_> {
		TokensService::new(self)
	}

	/// Credential-to-internal-user-id mapping resource methods.
	pub fn user_id_mappers(&self) -> UserIdMappersService<'_> {
		UserIdMappersService::new(self)
	}

	/// Creates an API request.
	///
	/// `path` is resolved relative to [`base_url`](Client::base_url) and should be specified
	/// without a preceding slash; resolution is always relative, never absolute, so a request
	/// can never silently escape the configured host. A `Some` body is JSON-encoded into the
	/// request payload with `Content-Type: application/json`; `None` yields a request with no
	/// payload.
	pub fn request<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<ReqwestRequest>
	where
		B: ?Sized + Serialize,
	{
		let url = self.resolve(&self.base_url, "Base", path)?;
		let mut request = ReqwestRequest::new(method, url);

		if let Some(body) = body {
			let buf = serde_json::to_vec(body).map_err(Error::Encode)?;

			*request.body_mut() = Some(buf.into());
			request
				.headers_mut()
				.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
		}

		request.headers_mut().insert(header::ACCEPT, HeaderValue::from_static(MEDIA_TYPE_V3));
		self.apply_user_agent(request.headers_mut());

		Ok(request)
	}

	/// Creates an upload request.
	///
	/// `path` is resolved relative to [`upload_url`](Client::upload_url) and should be
	/// specified without a preceding slash. `size` becomes the explicit `Content-Length`;
	/// when `media_type` is absent or empty, `application/octet-stream` is used.
	pub fn upload_request(
		&self,
		path: &str,
		payload: impl Into<ReqwestBody>,
		size: u64,
		media_type: Option<&str>,
	) -> Result<ReqwestRequest> {
		let url = self.resolve(&self.upload_url, "Upload", path)?;
		let mut request = ReqwestRequest::new(Method::POST, url);

		*request.body_mut() = Some(payload.into());

		let media_type = media_type.filter(|m| !m.is_empty()).unwrap_or(DEFAULT_MEDIA_TYPE);
		let content_type = HeaderValue::from_str(media_type).map_err(|_| {
			ConfigError::InvalidMediaType { media_type: media_type.into() }
		})?;
		let headers = request.headers_mut();

		headers.insert(header::CONTENT_TYPE, content_type);
		headers.insert(header::CONTENT_LENGTH, HeaderValue::from(size));
		headers.insert(header::ACCEPT, HeaderValue::from_static(MEDIA_TYPE_V3));
		self.apply_user_agent(request.headers_mut());

		Ok(request)
	}

	/// Sends an API request, classifies the response, and JSON-decodes the body into `T`.
	///
	/// Returns `None` for a successful response with an empty body. If the transport fails
	/// while `cancel` is already cancelled, [`Error::Cancelled`] is surfaced instead of the
	/// transport error; cancellation is only consulted at that point, never mid-flight. A 202
	/// status surfaces [`Error::Accepted`] carrying the raw body, and any other non-2xx
	/// status surfaces [`Error::Api`].
	pub async fn send<T>(
		&self,
		cancel: &CancellationToken,
		request: ReqwestRequest,
	) -> Result<(Option<T>, Response)>
	where
		T: DeserializeOwned,
	{
		let (response, body) = self.dispatch(cancel, request).await?;

		if body.is_empty() {
			// An empty body on success is not a decode failure.
			return Ok((None, response));
		}

		let mut deserializer = serde_json::Deserializer::from_slice(&body);
		let value = serde_path_to_error::deserialize(&mut deserializer).map_err(Error::Decode)?;

		Ok((Some(value), response))
	}

	/// Sends an API request and copies the raw response body verbatim into `target`, without
	/// attempting to decode it. Classification rules match [`send`](Client::send).
	pub async fn send_raw<W>(
		&self,
		cancel: &CancellationToken,
		request: ReqwestRequest,
		target: &mut W,
	) -> Result<Response>
	where
		W: ?Sized + Write,
	{
		let (response, body) = self.dispatch(cancel, request).await?;

		target.write_all(&body).map_err(TransportError::Io)?;

		Ok(response)
	}

	/// Sends an API request and discards any successful response body after classification.
	pub async fn send_unit(
		&self,
		cancel: &CancellationToken,
		request: ReqwestRequest,
	) -> Result<Response> {
		let (response, _) = self.dispatch(cancel, request).await?;

		Ok(response)
	}

	async fn dispatch(
		&self,
		cancel: &CancellationToken,
		request: ReqwestRequest,
	) -> Result<(Response, Vec<u8>)> {
		let method = request.method().clone();
		let url = request.url().clone();

		#[cfg(feature = "tracing")]
		tracing::debug!(%method, path = url.path(), "dispatching request");

		let raw = match self.transport.send(request).await {
			Ok(raw) => raw,
			Err(e) => {
				// The caller's cancellation is probably the more useful signal than whatever
				// the transport tripped over on the way down.
				if cancel.is_cancelled() {
					return Err(Error::Cancelled);
				}

				return Err(TransportError::from(e).into());
			},
		};
		let response = Response::new(&raw);
		let body = raw.bytes().await.map_err(TransportError::from)?.to_vec();

		if response.status == StatusCode::ACCEPTED {
			#[cfg(feature = "tracing")]
			tracing::debug!(path = url.path(), "job accepted for asynchronous processing");

			return Err(Accepted { raw: body }.into());
		}
		if !response.status.is_success() {
			// A body that is not valid JSON is silently ignored, leaving the structured
			// fields empty.
			let detail = serde_json::from_slice::<ApiErrorBody>(&body).unwrap_or_default();

			#[cfg(feature = "tracing")]
			tracing::debug!(%method, status = response.status.as_u16(), "request rejected");

			return Err(ApiError::new(method, url, response.status, detail).into());
		}

		Ok((response, body))
	}

	fn resolve(&self, root: &Url, kind: &'static str, path: &str) -> Result<Url> {
		if !root.path().ends_with('/') {
			return Err(
				ConfigError::MissingTrailingSlash { kind, url: Box::new(root.clone()) }.into()
			);
		}

		Ok(root.join(path)?)
	}

	fn apply_user_agent(&self, headers: &mut HeaderMap) {
		if let Some(agent) = self.user_agent.as_deref().filter(|agent| !agent.is_empty())
			&& let Ok(value) = HeaderValue::from_str(agent)
		{
			headers.insert(header::USER_AGENT, value);
		}
	}
}
impl Default for Client {
	fn default() -> Self {
		Self::new()
	}
}
impl Debug for Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("base_url", &self.base_url.as_str())
			.field("upload_url", &self.upload_url.as_str())
			.field("user_agent", &self.user_agent)
			.finish()
	}
}

/// Appends percent-encoded query pairs to a relative path; an empty set leaves the path
/// untouched.
pub(crate) fn add_options(path: &str, pairs: &[(&str, String)]) -> String {
	if pairs.is_empty() {
		return path.into();
	}

	let query = url::form_urlencoded::Serializer::new(String::new())
		.extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())))
		.finish();

	format!("{path}?{query}")
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::ConfigError;

	#[derive(Debug, Deserialize, PartialEq, Eq, Serialize)]
	struct Payload {
		name: String,
		count: u32,
	}

	fn body_bytes(request: &ReqwestRequest) -> &[u8] {
		request
			.body()
			.and_then(ReqwestBody::as_bytes)
			.expect("Request body should be a buffered payload.")
	}

	#[test]
	fn base_url_without_trailing_slash_fails() {
		let client = Client::new().with_base_url(
			Url::parse("https://api.example.com/api/v1").expect("Failed to parse test URL."),
		);
		let err = client
			.request(Method::GET, "prTokens/", None::<&()>)
			.expect_err("Construction should fail without a trailing slash.");

		assert!(matches!(
			err,
			Error::Config(ConfigError::MissingTrailingSlash { kind: "Base", .. }),
		));
	}

	#[test]
	fn relative_path_resolves_against_base_url() {
		let request = Client::new()
			.request(Method::GET, "prTokens/123", None::<&()>)
			.expect("Request construction should succeed.");

		assert_eq!(
			request.url().as_str(),
			"https://api.pavedroad.io/api/v1/namespace/pavedroad.io/prTokens/123",
		);
	}

	#[test]
	fn body_round_trips_through_the_payload() {
		let payload = Payload { name: "n".into(), count: 7 };
		let request = Client::new()
			.request(Method::POST, "prTokens/", Some(&payload))
			.expect("Request construction should succeed.");
		let decoded = serde_json::from_slice::<Payload>(body_bytes(&request))
			.expect("Payload should decode back from the request body.");

		assert_eq!(decoded, payload);
		assert_eq!(
			request.headers().get(header::CONTENT_TYPE).map(HeaderValue::as_bytes),
			Some(b"application/json".as_slice()),
		);
	}

	#[test]
	fn absent_body_sets_no_payload_or_content_type() {
		let request = Client::new()
			.request(Method::GET, "prTokens/", None::<&()>)
			.expect("Request construction should succeed.");

		assert!(request.body().is_none());
		assert!(request.headers().get(header::CONTENT_TYPE).is_none());
		assert_eq!(
			request.headers().get(header::ACCEPT).map(HeaderValue::as_bytes),
			Some(MEDIA_TYPE_V3.as_bytes()),
		);
		assert_eq!(
			request.headers().get(header::USER_AGENT).map(HeaderValue::as_bytes),
			Some(DEFAULT_USER_AGENT.as_bytes()),
		);
	}

	#[test]
	fn empty_user_agent_is_omitted_entirely() {
		let request = Client::new()
			.with_user_agent("")
			.request(Method::GET, "prTokens/", None::<&()>)
			.expect("Request construction should succeed.");

		assert!(request.headers().get(header::USER_AGENT).is_none());
	}

	#[test]
	fn upload_request_defaults_the_media_type() {
		let payload = b"binary".to_vec();
		let request = Client::new()
			.upload_request("artifacts/a.bin", payload, 6, None)
			.expect("Upload request construction should succeed.");

		assert_eq!(request.method(), Method::POST);
		assert_eq!(request.url().as_str(), "https://uploads.pavedroad.io/artifacts/a.bin");
		assert_eq!(
			request.headers().get(header::CONTENT_TYPE).map(HeaderValue::as_bytes),
			Some(DEFAULT_MEDIA_TYPE.as_bytes()),
		);
		assert_eq!(
			request.headers().get(header::CONTENT_LENGTH).map(HeaderValue::as_bytes),
			Some(b"6".as_slice()),
		);
	}

	#[test]
	fn upload_url_without_trailing_slash_fails() {
		let client = Client::new().with_upload_url(
			Url::parse("https://uploads.example.com/files").expect("Failed to parse test URL."),
		);
		let err = client
			.upload_request("a.bin", Vec::<u8>::new(), 0, Some("image/png"))
			.expect_err("Construction should fail without a trailing slash.");

		assert!(matches!(
			err,
			Error::Config(ConfigError::MissingTrailingSlash { kind: "Upload", .. }),
		));
	}

	#[test]
	fn add_options_encodes_pairs() {
		assert_eq!(add_options("prTokensLIST/", &[]), "prTokensLIST/");
		assert_eq!(
			add_options("prTokensLIST/", &[("since", "42".into()), ("per_page", "10".into())]),
			"prTokensLIST/?since=42&per_page=10",
		);
	}
}
