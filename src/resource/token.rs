//! Access to the `prTokens` microservice, which stores tokens for reaching 3rd-party sites.
//!
//! HTTP verbs translate into the following methods:
//!
//! | Verb     | Method    |
//! |----------|-----------|
//! | `POST`   | `create`  |
//! | `GET`    | `get`     |
//! | `GET /`  | `list`    |
//! | `PUT`    | `replace` |
//! | `PATCH`  | `edit`    |
//! | `DELETE` | `delete`  |

// self
use crate::{
	_prelude::*,
	client::{Client, add_options},
	error::{ConfigError, bool_from_response},
	resource::ListOptions,
	response::Response,
};

const TOKEN_RESOURCE: &str = "prTokens";
const TOKEN_RESOURCE_LIST: &str = "prTokensLIST";

/// Handles communication with the token-related methods of the PavedRoad API.
#[derive(Clone, Copy, Debug)]
pub struct TokensService<'c> {
	client: &'c Client,
}
impl<'c> TokensService<'c> {
	pub(crate) fn new(client: &'c Client) -> Self {
		Self { client }
	}

	/// Creates a token. PavedRoad API endpoint `prTokens/`.
	///
	/// Returns the stored token as echoed back by the service, or `None` when the service
	/// responds with an empty body.
	pub async fn create(
		&self,
		cancel: &CancellationToken,
		token: &Token,
	) -> Result<(Option<Token>, Response)> {
		let path = format!("{TOKEN_RESOURCE}/");
		let request = self.client.request(Method::POST, &path, Some(token))?;

		self.client.send(cancel, request).await
	}

	/// Fetches a token by UUID. PavedRoad API endpoint `prTokens/{uuid}`.
	pub async fn get(
		&self,
		cancel: &CancellationToken,
		uuid: &str,
	) -> Result<(Option<Token>, Response)> {
		let request = self.client.request(Method::GET, &item_path(uuid)?, None::<&()>)?;

		self.client.send(cancel, request).await
	}

	/// Lists tokens. PavedRoad API endpoint `prTokensLIST/`.
	pub async fn list(
		&self,
		cancel: &CancellationToken,
		options: &TokenListOptions,
	) -> Result<(Vec<Token>, Response)> {
		let path = add_options(&format!("{TOKEN_RESOURCE_LIST}/"), &options.query_pairs());
		let request = self.client.request(Method::GET, &path, None::<&()>)?;
		let (tokens, response) = self.client.send(cancel, request).await?;

		Ok((tokens.unwrap_or_default(), response))
	}

	/// Replaces a token by UUID. PavedRoad API endpoint `prTokens/{uuid}`.
	pub async fn replace(
		&self,
		cancel: &CancellationToken,
		token: &Token,
		uuid: &str,
	) -> Result<(Option<Token>, Response)> {
		let request = self.client.request(Method::PUT, &item_path(uuid)?, Some(token))?;

		self.client.send(cancel, request).await
	}

	/// Partially updates a token by UUID. PavedRoad API endpoint `prTokens/{uuid}`.
	pub async fn edit(
		&self,
		cancel: &CancellationToken,
		token: &Token,
		uuid: &str,
	) -> Result<(Option<Token>, Response)> {
		let request = self.client.request(Method::PATCH, &item_path(uuid)?, Some(token))?;

		self.client.send(cancel, request).await
	}

	/// Deletes a token by UUID. PavedRoad API endpoint `prTokens/{uuid}`.
	pub async fn delete(&self, cancel: &CancellationToken, uuid: &str) -> Result<Response> {
		let request = self.client.request(Method::DELETE, &item_path(uuid)?, None::<&()>)?;

		self.client.send_unit(cancel, request).await
	}

	/// Returns whether a token exists; the API signals existence purely via the status code.
	pub async fn exists(&self, cancel: &CancellationToken, uuid: &str) -> Result<bool> {
		let request = self.client.request(Method::GET, &item_path(uuid)?, None::<&()>)?;

		bool_from_response(self.client.send_unit(cancel, request).await)
	}
}

fn item_path(uuid: &str) -> Result<String> {
	if uuid.is_empty() {
		return Err(ConfigError::MissingIdentifier { what: "UUID" }.into());
	}

	Ok(format!("{TOKEN_RESOURCE}/{uuid}"))
}

/// A token for accessing 3rd-party services.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
	/// Schema version of the stored object.
	pub api_version: String,
	/// Object kind discriminator.
	pub kind: String,
	/// Token metadata, including the secret itself.
	pub metadata: Metadata,
	/// Creation timestamp as reported by the service.
	#[serde(default)]
	pub created: String,
	/// Last-update timestamp as reported by the service.
	#[serde(default)]
	pub updated: String,
	/// Whether the token is currently active.
	pub active: bool,
}

/// Metadata stored alongside a [`Token`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
	/// Display name for the token.
	pub name: String,
	/// Namespace the token belongs to.
	pub namespace: String,
	/// UUID identifying the token.
	pub uid: String,
	/// 3rd-party site the token grants access to.
	pub site: String,
	/// Endpoint of the 3rd-party service.
	pub end_point: String,
	/// The token secret itself.
	pub token: String,
	/// Scopes the token was granted.
	pub scope: Vec<String>,
}

/// Optional parameters for [`TokensService::list`].
///
/// Pagination is powered exclusively by `since`; [`ListOptions::page`] controls an
/// undocumented PavedRoad API parameter.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokenListOptions {
	/// ID of the last token seen.
	pub since: Option<i64>,
	/// Shared pagination options.
	pub list: ListOptions,
}
impl TokenListOptions {
	pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = Vec::new();

		if let Some(since) = self.since {
			pairs.push(("since", since.to_string()));
		}

		self.list.push_pairs(&mut pairs);

		pairs
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_uses_camel_case_wire_names() {
		let token = Token {
			api_version: "v1".into(),
			kind: "prToken".into(),
			metadata: Metadata { end_point: "https://api.github.com".into(), ..Default::default() },
			active: true,
			..Default::default()
		};
		let value = serde_json::to_value(&token).expect("Token should serialize.");

		assert_eq!(value["apiVersion"], "v1");
		assert_eq!(value["metadata"]["endPoint"], "https://api.github.com");
		assert_eq!(value["active"], true);
	}

	#[test]
	fn empty_uuid_is_a_configuration_error() {
		let err = item_path("").expect_err("An empty UUID must be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::MissingIdentifier { what: "UUID" })));
	}

	#[test]
	fn list_options_combine_since_and_pagination() {
		let options = TokenListOptions {
			since: Some(42),
			list: ListOptions { page: None, per_page: Some(10) },
		};

		assert_eq!(options.query_pairs(), [("since", "42".to_string()), ("per_page", "10".to_string())]);
	}
}
