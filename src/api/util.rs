//! URL construction helpers.

use url::Url;

use super::types::Resource;

/// Builds the request URL for `resource`.
///
/// `id` is appended as an escaped path segment (`/article/{id}`); `params` are appended
/// in order as query parameters. Returns `None` when `base_url` is not a valid URL.
pub fn build_url(
    base_url: &str,
    resource: Resource,
    id: Option<&str>,
    params: &[(String, String)],
) -> Option<Url> {
    let mut url = Url::parse(base_url.trim_end_matches('/')).ok()?;

    {
        let mut segments = url.path_segments_mut().ok()?;
        segments.pop_if_empty().push(resource.path());
        if let Some(id) = id {
            segments.push(id);
        }
    }

    if !params.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }

    Some(url)
}
