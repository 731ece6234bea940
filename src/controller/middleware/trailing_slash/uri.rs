//! Read and rewrite access to the URI of an intercepted request.
//!
//! The middleware only ever needs two things from a URI: its path, and a way
//! to serialize it back with a different path while every other component
//! (scheme, authority, query, fragment) stays byte for byte the same.
use axum::http::{uri::PathAndQuery, Request, Uri};

use crate::Result;

/// URI components the trailing slash middleware reads and rewrites.
pub trait RequestUri {
    /// The path component, possibly empty.
    fn path(&self) -> &str;

    /// The raw query string, without the leading `?`.
    fn query(&self) -> Option<&str>;

    /// The raw fragment, without the leading `#`.
    fn fragment(&self) -> Option<&str> {
        None
    }

    /// Whether the URI has a path component at all.
    ///
    /// Authority-form targets (`CONNECT example.com:443`) only name a host,
    /// so there is nothing to canonicalize.
    fn has_path(&self) -> bool {
        true
    }

    /// Serializes the URI with its path replaced by `path`.
    ///
    /// # Errors
    /// When the resulting URI cannot be represented.
    fn replace_path(&self, path: &str) -> Result<String>;
}

/// A request that exposes a [`RequestUri`].
pub trait InterceptedRequest {
    type Uri: RequestUri + ?Sized;

    fn uri(&self) -> &Self::Uri;
}

impl<B> InterceptedRequest for Request<B> {
    type Uri = Uri;

    fn uri(&self) -> &Self::Uri {
        Request::uri(self)
    }
}

impl InterceptedRequest for Uri {
    type Uri = Self;

    fn uri(&self) -> &Self::Uri {
        self
    }
}

impl RequestUri for Uri {
    fn path(&self) -> &str {
        Self::path(self)
    }

    fn query(&self) -> Option<&str> {
        Self::query(self)
    }

    fn has_path(&self) -> bool {
        self.authority().is_none() || self.scheme().is_some()
    }

    fn replace_path(&self, path: &str) -> Result<String> {
        let path_and_query = match Self::query(self) {
            Some(query) => format!("{path}?{query}"),
            None => path.to_string(),
        };

        let mut parts = self.clone().into_parts();
        parts.path_and_query = Some(PathAndQuery::try_from(path_and_query)?);
        Ok(Self::from_parts(parts)?.to_string())
    }
}

/// A borrowed view over a raw URI string, fragment included.
///
/// `http::Uri` drops fragments, so callers that keep the full URI the client
/// sent (for example from a rewritten `Referer`, or a proxied absolute URI)
/// can use this type instead. Splitting never fails: every string is a valid
/// `RawUri`, at worst one made of a path only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawUri<'a> {
    prefix: &'a str,
    path: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

impl<'a> RawUri<'a> {
    /// Splits `raw` into scheme and authority, path, query and fragment.
    ///
    /// # Example
    ///
    /// ```rust
    /// use loco_trailing_slash::controller::middleware::trailing_slash::{RawUri, RequestUri};
    ///
    /// let uri = RawUri::parse("https://example.com/path?foo=bar#section");
    /// assert_eq!(uri.path(), "/path");
    /// assert_eq!(uri.query(), Some("foo=bar"));
    /// assert_eq!(uri.fragment(), Some("section"));
    /// ```
    #[must_use]
    pub fn parse(raw: &'a str) -> Self {
        let (rest, fragment) = match raw.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (raw, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((rest, query)) => (rest, Some(query)),
            None => (rest, None),
        };
        let (prefix, path) = rest.split_at(authority_end(rest));

        Self {
            prefix,
            path,
            query,
            fragment,
        }
    }
}

/// Byte offset where the path starts, `0` when there is no `scheme://host`.
fn authority_end(rest: &str) -> usize {
    let Some(scheme_end) = rest.find("://") else {
        return 0;
    };
    // a `/` before `://` means the `://` sits inside the path
    if rest[..scheme_end].contains('/') {
        return 0;
    }
    let authority_start = scheme_end + 3;
    rest[authority_start..]
        .find('/')
        .map_or(rest.len(), |offset| authority_start + offset)
}

impl<'a> InterceptedRequest for RawUri<'a> {
    type Uri = Self;

    fn uri(&self) -> &Self::Uri {
        self
    }
}

impl RequestUri for RawUri<'_> {
    fn path(&self) -> &str {
        self.path
    }

    fn query(&self) -> Option<&str> {
        self.query
    }

    fn fragment(&self) -> Option<&str> {
        self.fragment
    }

    fn replace_path(&self, path: &str) -> Result<String> {
        let mut location = format!("{}{path}", self.prefix);
        if let Some(query) = self.query {
            location.push('?');
            location.push_str(query);
        }
        if let Some(fragment) = self.fragment {
            location.push('#');
            location.push_str(fragment);
        }
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("/path", "/path/", "/path/")]
    #[case("/path?foo=bar", "/path/", "/path/?foo=bar")]
    #[case("/path?q=a%20b&x=%2F", "/path/", "/path/?q=a%20b&x=%2F")]
    #[case("http://example.com/path?foo=bar", "/path/", "http://example.com/path/?foo=bar")]
    #[case("https://example.com:8443/a", "/a/", "https://example.com:8443/a/")]
    fn can_replace_http_uri_path(#[case] uri: &str, #[case] path: &str, #[case] expected: &str) {
        let uri: Uri = uri.parse().expect("valid uri");
        assert_eq!(uri.replace_path(path).expect("replace path"), expected);
    }

    #[test]
    fn http_uri_has_no_fragment() {
        let uri: Uri = "/path?foo=bar".parse().expect("valid uri");
        assert_eq!(RequestUri::fragment(&uri), None);
        assert_eq!(RequestUri::query(&uri), Some("foo=bar"));
    }

    #[rstest]
    #[case("/path", true)]
    #[case("*", true)]
    #[case("http://example.com", true)]
    #[case("example.com:443", false)]
    fn http_uri_has_path(#[case] uri: &str, #[case] expected: bool) {
        let uri: Uri = uri.parse().expect("valid uri");
        assert_eq!(uri.has_path(), expected);
    }

    #[test]
    fn http_uri_rejects_invalid_path() {
        let uri: Uri = "/path".parse().expect("valid uri");
        assert!(uri.replace_path("/with space/").is_err());
    }

    #[rstest]
    #[case("", "", None, None)]
    #[case("/path", "/path", None, None)]
    #[case("/path?foo=bar#section", "/path", Some("foo=bar"), Some("section"))]
    #[case("/path#frag?not-a-query", "/path", None, Some("frag?not-a-query"))]
    #[case("?only=query", "", Some("only=query"), None)]
    #[case("https://example.com", "", None, None)]
    #[case("https://example.com/a/b?c", "/a/b", Some("c"), None)]
    #[case("/redirect/http://example.com", "/redirect/http://example.com", None, None)]
    fn can_parse_raw_uri(
        #[case] raw: &str,
        #[case] path: &str,
        #[case] query: Option<&str>,
        #[case] fragment: Option<&str>,
    ) {
        let uri = RawUri::parse(raw);
        assert_eq!(uri.path(), path);
        assert_eq!(uri.query(), query);
        assert_eq!(uri.fragment(), fragment);
    }

    #[rstest]
    #[case("/path?foo=bar#section", "/path/", "/path/?foo=bar#section")]
    #[case("", "/", "/")]
    #[case("?x=1", "/", "/?x=1")]
    #[case("/p?#", "/p/", "/p/?#")]
    #[case("https://example.com/a?b#c", "/a/", "https://example.com/a/?b#c")]
    fn can_replace_raw_uri_path(#[case] raw: &str, #[case] path: &str, #[case] expected: &str) {
        let uri = RawUri::parse(raw);
        assert_eq!(uri.replace_path(path).expect("replace path"), expected);
    }
}
