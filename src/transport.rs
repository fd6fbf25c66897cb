//! Transport seam between the client and the HTTP stack.
//!
//! [`Transport`] is the client's only dependency on an HTTP implementation. The stock
//! [`HttpTransport`] forwards requests to a [`ReqwestClient`] untouched, while
//! [`BasicAuthTransport`] authenticates every outgoing request with HTTP Basic credentials
//! and, when configured, the `X-PavedRoad-OTP` second-factor header. Transports perform no
//! retries and enforce no timeouts; configure those on the underlying [`ReqwestClient`].

// std
use std::ops::Deref;
// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::_prelude::*;

/// Header carrying the one-time password for accounts with two-factor authentication
/// enabled, spelled `X-PavedRoad-OTP` on the wire.
pub const HEADER_OTP: HeaderName = HeaderName::from_static("x-pavedroad-otp");

/// Boxed response future returned by [`Transport::send`].
pub type TransportFuture<'t> =
	Pin<Box<dyn Future<Output = Result<ReqwestResponse, ReqwestError>> + 't + Send>>;

/// Abstraction over HTTP stacks capable of executing a single PavedRoad API request.
///
/// Implementations receive the request by value: ownership moves to the transport, so any
/// header injection performed here can never alias a request still held by the caller.
pub trait Transport
where
	Self: 'static + Send + Sync,
{
	/// Executes one request and resolves to the raw response.
	fn send(&self, request: ReqwestRequest) -> TransportFuture<'_>;
}

/// Plain transport that forwards requests to a [`ReqwestClient`] without modification.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport(pub ReqwestClient);
impl HttpTransport {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl AsRef<ReqwestClient> for HttpTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for HttpTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl Transport for HttpTransport {
	fn send(&self, request: ReqwestRequest) -> TransportFuture<'_> {
		Box::pin(self.0.execute(request))
	}
}

/// Transport that authenticates all requests using HTTP Basic Authentication.
///
/// Additionally supports accounts with two-factor authentication enabled via
/// [`with_otp`](BasicAuthTransport::with_otp).
#[derive(Clone)]
pub struct BasicAuthTransport {
	username: String,
	password: String,
	otp: Option<String>,
	inner: ReqwestClient,
}
impl BasicAuthTransport {
	/// Creates a transport for the provided PavedRoad username and password, backed by a
	/// stock [`ReqwestClient`].
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self {
			username: username.into(),
			password: password.into(),
			otp: None,
			inner: ReqwestClient::default(),
		}
	}

	/// Sets the one-time password sent with every request.
	pub fn with_otp(mut self, otp: impl Into<String>) -> Self {
		self.otp = Some(otp.into());

		self
	}

	/// Replaces the underlying [`ReqwestClient`].
	pub fn with_client(mut self, client: ReqwestClient) -> Self {
		self.inner = client;

		self
	}

	fn authorization(&self) -> HeaderValue {
		let encoded =
			format!("Basic {}", STANDARD.encode(format!("{}:{}", self.username, self.password)));
		// Base64 output is always a valid header value.
		let mut value = HeaderValue::from_str(&encoded)
			.expect("Encoded Basic credentials are a valid header value.");

		value.set_sensitive(true);

		value
	}
}
impl Transport for BasicAuthTransport {
	fn send(&self, mut request: ReqwestRequest) -> TransportFuture<'_> {
		request.headers_mut().insert(header::AUTHORIZATION, self.authorization());

		if let Some(otp) = &self.otp
			&& let Ok(value) = HeaderValue::from_str(otp)
		{
			request.headers_mut().insert(HEADER_OTP, value);
		}

		Box::pin(self.inner.execute(request))
	}
}
impl Debug for BasicAuthTransport {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BasicAuthTransport")
			.field("username", &self.username)
			.field("otp_set", &self.otp.is_some())
			.finish()
	}
}
