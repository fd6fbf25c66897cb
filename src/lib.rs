//! Rust client for the PavedRoad REST API: typed resources, lenient pagination parsing, and
//! transport-aware error classification in one crate.
//!
//! PavedRoad APIs follow kubernetes conventions: every resource lives under
//! `/api/v1/namespace/{namespace}/` and is addressed by UUID. The [`client::Client`] builds
//! requests relative to that root, attaches the versioned `Accept` media type, and classifies
//! responses into the typed errors in [`error`]. Resource method sets live in [`resource`].

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod client;
pub mod error;
pub mod resource;
pub mod response;
pub mod transport;

mod _prelude {
	// std
	pub use std::{
		fmt::{Debug, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	// crates.io
	pub use reqwest::{
		Body as ReqwestBody, Client as ReqwestClient, Error as ReqwestError, Method,
		Request as ReqwestRequest, Response as ReqwestResponse, StatusCode,
		header::{self, HeaderMap, HeaderName, HeaderValue},
	};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use tokio_util::sync::CancellationToken;
	pub use url::Url;

	// self
	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use tokio_util;
pub use url;
#[cfg(test)] use {httpmock as _, tokio as _};
