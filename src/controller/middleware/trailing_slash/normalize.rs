//! Path canonicalization rules for the trailing slash middleware.
//!
//! A path is considered canonical when it ends with `/`, or when its last
//! segment carries a file extension (`/robots.txt`, `/assets/app.min.js`).
//! Everything else gets a `/` appended.
use std::borrow::Cow;

const SLASH: char = '/';
const DOT: char = '.';

/// The outcome of inspecting a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The path starts with one of the configured exempt prefixes.
    Exempt,
    /// The path is already in its canonical form.
    AlreadyNormalized,
    /// The path should be redirected to the contained canonical form.
    NeedsRedirect(String),
}

/// Returns the canonical form of `path`.
///
/// * `""` becomes `"/"`
/// * `"/"` and any other single byte path are returned as is
/// * paths that neither end with `/` nor carry an extension get a `/`
///   appended
///
/// The function is idempotent: `normalize(&normalize(p)) == normalize(p)`.
///
/// # Example
///
/// ```rust
/// use loco_trailing_slash::controller::middleware::trailing_slash::normalize;
///
/// assert_eq!(normalize(""), "/");
/// assert_eq!(normalize("/path"), "/path/");
/// assert_eq!(normalize("/path/"), "/path/");
/// assert_eq!(normalize("/file.txt"), "/file.txt");
/// ```
#[must_use]
pub fn normalize(path: &str) -> Cow<'_, str> {
    if path.is_empty() {
        return Cow::Borrowed("/");
    }

    if path.len() > 1 && !path.ends_with(SLASH) && extension(path).is_none() {
        return Cow::Owned(format!("{path}{SLASH}"));
    }

    Cow::Borrowed(path)
}

/// Returns the file extension of the last segment of `path`, if any.
///
/// The extension is whatever follows the last `.` of the last segment.
/// Multi-dot names keep only the final part (`archive.tar.gz` -> `gz`), a
/// dotfile is all extension (`.env` -> `env`) and a segment ending with a dot
/// has none.
#[must_use]
pub fn extension(path: &str) -> Option<&str> {
    let segment = path.rsplit_once(SLASH).map_or(path, |(_, segment)| segment);
    segment
        .rsplit_once(DOT)
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// Returns `true` when `path` literally starts with any of `prefixes`.
///
/// Matching is a plain character prefix test and is not segment aware:
/// `/admin` exempts `/administrators` as well.
#[must_use]
pub fn is_exempt<S: AsRef<str>>(path: &str, prefixes: &[S]) -> bool {
    prefixes
        .iter()
        .any(|prefix| path.starts_with(prefix.as_ref()))
}

/// Combines exemption and normalization into a single [`Decision`].
#[must_use]
pub fn decide<S: AsRef<str>>(path: &str, prefixes: &[S]) -> Decision {
    if is_exempt(path, prefixes) {
        return Decision::Exempt;
    }

    let normalized = normalize(path);
    if normalized == path {
        Decision::AlreadyNormalized
    } else {
        Decision::NeedsRedirect(normalized.into_owned())
    }
}
