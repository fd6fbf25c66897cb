//! Response wrapper exposing pagination metadata parsed from the `Link` header.

// self
use crate::_prelude::*;

/// A PavedRoad API response.
///
/// Wraps the interesting parts of the raw HTTP response and provides convenient access to
/// pagination links. The page fields are `None` for responses that are not part of a
/// paginated set, or for which there are no further pages in that direction.
///
/// Parsing is deliberately lenient for compatibility with the upstream API: malformed `Link`
/// entries are skipped without error, leaving the corresponding field unset. That policy can
/// mask upstream pagination bugs, so treat an unexpectedly absent page as suspect rather
/// than authoritative.
#[derive(Clone, Debug, Default)]
pub struct Response {
	/// HTTP status code of the response.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Page number of the first page of results.
	pub first_page: Option<u32>,
	/// Page number of the previous page of results.
	pub prev_page: Option<u32>,
	/// Page number of the next page of results.
	pub next_page: Option<u32>,
	/// Page number of the last page of results.
	pub last_page: Option<u32>,
}
impl Response {
	pub(crate) fn new(raw: &ReqwestResponse) -> Self {
		let mut response =
			Self { status: raw.status(), headers: raw.headers().clone(), ..Default::default() };

		response.populate_page_values();

		response
	}

	// Parses the first `Link` header value: comma-separated `<url>; rel="name"` entries,
	// extracting the `page` query parameter for the first/prev/next/last relations. Every
	// malformed entry is skipped so upstream quirks never fail an otherwise successful call.
	fn populate_page_values(&mut self) {
		let Some(links) = self.headers.get(header::LINK).and_then(|value| value.to_str().ok())
		else {
			return;
		};

		for link in links.split(',') {
			let segments = link.trim().split(';').collect::<Vec<_>>();

			// A link must at least have an href and a rel.
			if segments.len() < 2 {
				continue;
			}

			let Some(href) =
				segments[0].strip_prefix('<').and_then(|href| href.strip_suffix('>'))
			else {
				continue;
			};
			let Ok(url) = Url::parse(href) else {
				continue;
			};
			let Some(page) =
				url.query_pairs().find_map(|(k, v)| (k == "page").then(|| v.into_owned()))
			else {
				continue;
			};

			if page.is_empty() {
				continue;
			}

			for segment in &segments[1..] {
				match segment.trim() {
					r#"rel="next""# => self.next_page = page.parse().ok(),
					r#"rel="prev""# => self.prev_page = page.parse().ok(),
					r#"rel="first""# => self.first_page = page.parse().ok(),
					r#"rel="last""# => self.last_page = page.parse().ok(),
					_ => (),
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn parsed(link: &str) -> Response {
		let mut response = Response::default();

		response
			.headers
			.insert(header::LINK, HeaderValue::from_str(link).expect("Link header should parse."));
		response.populate_page_values();

		response
	}

	#[test]
	fn all_four_relations_are_extracted() {
		let response = parsed(
			"<https://api.pavedroad.io/prTokensLIST/?page=1>; rel=\"first\", \
			 <https://api.pavedroad.io/prTokensLIST/?page=2>; rel=\"prev\", \
			 <https://api.pavedroad.io/prTokensLIST/?page=4>; rel=\"next\", \
			 <https://api.pavedroad.io/prTokensLIST/?page=9>; rel=\"last\"",
		);

		assert_eq!(response.first_page, Some(1));
		assert_eq!(response.prev_page, Some(2));
		assert_eq!(response.next_page, Some(4));
		assert_eq!(response.last_page, Some(9));
	}

	#[test]
	fn missing_rel_is_skipped() {
		let response = parsed("<https://api.pavedroad.io/?page=3>");

		assert_eq!(response.next_page, None);
	}

	#[test]
	fn malformed_brackets_are_skipped() {
		let response = parsed("https://api.pavedroad.io/?page=3; rel=\"next\"");

		assert_eq!(response.next_page, None);
	}

	#[test]
	fn unparseable_url_is_skipped() {
		let response = parsed("<not a url>; rel=\"next\"");

		assert_eq!(response.next_page, None);
	}

	#[test]
	fn missing_page_parameter_is_skipped() {
		let response = parsed("<https://api.pavedroad.io/?per_page=10>; rel=\"next\"");

		assert_eq!(response.next_page, None);
	}

	#[test]
	fn non_numeric_page_leaves_field_unset() {
		let response = parsed("<https://api.pavedroad.io/?page=abc>; rel=\"next\"");

		assert_eq!(response.next_page, None);
	}

	#[test]
	fn one_bad_entry_does_not_poison_the_rest() {
		let response = parsed(
			"<https://api.pavedroad.io/?page=oops>; rel=\"prev\", \
			 <https://api.pavedroad.io/?page=7>; rel=\"next\"",
		);

		assert_eq!(response.prev_page, None);
		assert_eq!(response.next_page, Some(7));
	}

	#[test]
	fn unknown_relations_are_ignored() {
		let response = parsed("<https://api.pavedroad.io/?page=2>; rel=\"related\"");

		assert_eq!(
			(response.first_page, response.prev_page, response.next_page, response.last_page),
			(None, None, None, None),
		);
	}
}
