//! Access to the `prUserIdMappers` microservice, which translates 3rd-party site credentials
//! into internal user ids.
//!
//! HTTP verbs translate into the following methods, keyed by credential:
//!
//! | Verb     | Key                   | Method    |
//! |----------|-----------------------|-----------|
//! | `POST`   |                       | `create`  |
//! | `GET`    | `/credential`         | `get`     |
//! | `GET`    | `/prUserIdMappersLIST`| `list`    |
//! | `PUT`    | `/credential`         | `replace` |
//! | `PATCH`  | `/credential`         | `edit`    |
//! | `DELETE` | `/credential`         | `delete`  |

// self
use crate::{
	_prelude::*,
	client::{Client, add_options},
	error::{ConfigError, bool_from_response},
	resource::ListOptions,
	response::Response,
};

const MAPPER_RESOURCE: &str = "prUserIdMappers";
const MAPPER_RESOURCE_LIST: &str = "prUserIdMappersLIST";

/// Handles communication with the user-id-mapping methods of the PavedRoad API.
#[derive(Clone, Copy, Debug)]
pub struct UserIdMappersService<'c> {
	client: &'c Client,
}
impl<'c> UserIdMappersService<'c> {
	pub(crate) fn new(client: &'c Client) -> Self {
		Self { client }
	}

	/// Creates a mapping. PavedRoad API endpoint `prUserIdMappers/`.
	pub async fn create(
		&self,
		cancel: &CancellationToken,
		mapper: &UserIdMapper,
	) -> Result<(Option<UserIdMapper>, Response)> {
		let path = format!("{MAPPER_RESOURCE}/");
		let request = self.client.request(Method::POST, &path, Some(mapper))?;

		self.client.send(cancel, request).await
	}

	/// Fetches a mapping by credential. PavedRoad API endpoint `prUserIdMappers/{credential}`.
	pub async fn get(
		&self,
		cancel: &CancellationToken,
		credential: &str,
	) -> Result<(Option<UserIdMapper>, Response)> {
		let request = self.client.request(Method::GET, &item_path(credential)?, None::<&()>)?;

		self.client.send(cancel, request).await
	}

	/// Lists mappings. PavedRoad API endpoint `prUserIdMappersLIST/`.
	pub async fn list(
		&self,
		cancel: &CancellationToken,
		options: &UserIdMapperListOptions,
	) -> Result<(Vec<UserIdMapper>, Response)> {
		let path = add_options(&format!("{MAPPER_RESOURCE_LIST}/"), &options.query_pairs());
		let request = self.client.request(Method::GET, &path, None::<&()>)?;
		let (mappers, response) = self.client.send(cancel, request).await?;

		Ok((mappers.unwrap_or_default(), response))
	}

	/// Replaces a mapping by credential. PavedRoad API endpoint `prUserIdMappers/{credential}`.
	pub async fn replace(
		&self,
		cancel: &CancellationToken,
		mapper: &UserIdMapper,
		credential: &str,
	) -> Result<(Option<UserIdMapper>, Response)> {
		let request = self.client.request(Method::PUT, &item_path(credential)?, Some(mapper))?;

		self.client.send(cancel, request).await
	}

	/// Partially updates a mapping by credential. PavedRoad API endpoint
	/// `prUserIdMappers/{credential}`.
	pub async fn edit(
		&self,
		cancel: &CancellationToken,
		mapper: &UserIdMapper,
		credential: &str,
	) -> Result<(Option<UserIdMapper>, Response)> {
		let request = self.client.request(Method::PATCH, &item_path(credential)?, Some(mapper))?;

		self.client.send(cancel, request).await
	}

	/// Deletes a mapping by credential. PavedRoad API endpoint `prUserIdMappers/{credential}`.
	pub async fn delete(&self, cancel: &CancellationToken, credential: &str) -> Result<Response> {
		let request = self.client.request(Method::DELETE, &item_path(credential)?, None::<&()>)?;

		self.client.send_unit(cancel, request).await
	}

	/// Returns whether a mapping exists for the credential.
	pub async fn exists(&self, cancel: &CancellationToken, credential: &str) -> Result<bool> {
		let request = self.client.request(Method::GET, &item_path(credential)?, None::<&()>)?;

		bool_from_response(self.client.send_unit(cancel, request).await)
	}
}

fn item_path(credential: &str) -> Result<String> {
	if credential.is_empty() {
		return Err(ConfigError::MissingIdentifier { what: "credential" }.into());
	}

	Ok(format!("{MAPPER_RESOURCE}/{credential}"))
}

/// A mapping from a 3rd-party site credential to an internal user id.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdMapper {
	/// Schema version of the stored object.
	pub api_version: String,
	/// Version of this particular object.
	pub obj_version: String,
	/// Object kind discriminator.
	pub kind: String,
	/// 3rd-party credential being mapped, carried as `login` on the wire.
	#[serde(rename = "login")]
	pub credential: String,
	/// Internal user id the credential resolves to.
	#[serde(rename = "userUUID")]
	pub user_uuid: String,
	/// Number of logins recorded for this credential.
	pub login_count: i64,
	/// Creation timestamp as reported by the service.
	#[serde(default)]
	pub created: String,
	/// Last-update timestamp as reported by the service.
	#[serde(default)]
	pub updated: String,
	/// Activation state; the wire format carries this as a string.
	pub active: String,
}

/// Optional parameters for [`UserIdMappersService::list`].
///
/// Pagination is powered exclusively by `since`; [`ListOptions::page`] controls an
/// undocumented PavedRoad API parameter.
#[derive(Clone, Copy, Debug, Default)]
pub struct UserIdMapperListOptions {
	/// ID of the last mapping seen.
	pub since: Option<i64>,
	/// Shared pagination options.
	pub list: ListOptions,
}
impl UserIdMapperListOptions {
	pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = Vec::new();

		if let Some(since) = self.since {
			pairs.push(("since", since.to_string()));
		}

		self.list.push_pairs(&mut pairs);

		pairs
	}
}
