//! Resource services layered over the request pipeline.
//!
//! Each service holds an explicit reference to the [`Client`](crate::client::Client) it
//! calls through and is obtained from the client's accessor methods; services own no state
//! of their own.

pub mod token;
pub mod user_id_mapper;

pub use token::*;
pub use user_id_mapper::*;

/// Optional parameters shared by List methods that support pagination.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListOptions {
	/// For paginated result sets, page of results to retrieve.
	pub page: Option<u32>,
	/// For paginated result sets, the number of results to include per page.
	pub per_page: Option<u32>,
}
impl ListOptions {
	pub(crate) fn push_pairs(&self, pairs: &mut Vec<(&'static str, String)>) {
		if let Some(page) = self.page {
			pairs.push(("page", page.to_string()));
		}
		if let Some(per_page) = self.per_page {
			pairs.push(("per_page", per_page.to_string()));
		}
	}
}
