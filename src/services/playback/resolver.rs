//! Media source resolution.
//!
//! Maps a [`MediaRef`]'s source path, whatever its origin, to an absolute
//! URL the media element can fetch. Rules apply in priority order:
//!
//! 1. already-absolute URLs pass through untouched
//! 2. paths under the CDN prefix move to the CDN host, prefix stripped
//! 3. paths under the uploads prefix move to the uploads host, prefix stripped
//! 4. anything else is resolved against the application origin
//!
//! Resolution never fails, and applying it to its own output is a no-op.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::config::ResolverConfig;

use super::{MediaRef, PlaybackError};

/// A URI scheme (`https:`, `blob:`, `data:` ...). Single-letter schemes are
/// left out so drive letters are not mistaken for one.
static ABSOLUTE_URL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]+:").ok());

/// Which rule produced a resolved URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Input was already absolute
    Absolute,
    /// Rewritten onto the CDN host
    Cdn,
    /// Rewritten onto the uploads host
    Uploads,
    /// Fell through to the application origin
    Origin,
}

/// Rewrites media source paths into fetchable URLs.
#[derive(Debug, Clone, Default)]
pub struct SourceResolver {
    config: ResolverConfig,
}

impl SourceResolver {
    /// Create a resolver from configuration
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// The rules this resolver applies
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a media ref's source to an absolute URL.
    pub fn resolve(&self, item: &MediaRef) -> String {
        self.resolve_path(&item.source_path).0
    }

    /// Resolve the selected item, or return an empty string when nothing is selected.
    pub fn resolve_selected(&self, item: Option<&MediaRef>) -> String {
        item.map(|item| self.resolve(item)).unwrap_or_default()
    }

    /// Resolve a raw source path, reporting which rule applied.
    pub fn resolve_path(&self, source_path: &str) -> (String, Resolution) {
        let path = source_path.trim();

        if is_absolute(path) {
            return (path.to_string(), Resolution::Absolute);
        }

        if let Some(rest) = path.strip_prefix("//") {
            return (format!("https://{rest}"), Resolution::Absolute);
        }

        if let Some(rest) = strip_path_prefix(path, &self.config.cdn_prefix) {
            return (join(&self.config.cdn_host, rest), Resolution::Cdn);
        }

        if let Some(rest) = strip_path_prefix(path, &self.config.uploads_prefix) {
            return (join(&self.config.uploads_host, rest), Resolution::Uploads);
        }

        let fallthrough = PlaybackError::ResolutionFallthrough {
            source_path: path.to_string(),
        };
        debug!(origin = %self.config.app_origin, "{fallthrough}");

        (join(&self.config.app_origin, path), Resolution::Origin)
    }
}

fn is_absolute(path: &str) -> bool {
    match ABSOLUTE_URL.as_ref() {
        Some(pattern) => pattern.is_match(path),
        None => path
            .split_once(':')
            .is_some_and(|(scheme, _)| scheme.len() > 1 && !scheme.contains('/')),
    }
}

/// Strips `prefix` from `path`, tolerating a missing leading slash on either side.
fn strip_path_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        return None;
    }

    let rest = path.trim_start_matches('/').strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Joins a base URL and a path with exactly one slash between them.
fn join(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{base}/")
    } else {
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> SourceResolver {
        SourceResolver::new(ResolverConfig {
            cdn_prefix: "/cdn-uploads/".to_string(),
            cdn_host: "https://cdn.party.test".to_string(),
            uploads_prefix: "/uploads/".to_string(),
            uploads_host: "https://uploads.party.test".to_string(),
            app_origin: "https://party.test".to_string(),
        })
    }

    #[test]
    fn uploads_path_moves_to_uploads_host() {
        let item = MediaRef::new("e1", "/uploads/media-uploads/x.mp3");

        assert_eq!(
            resolver().resolve(&item),
            "https://uploads.party.test/media-uploads/x.mp3"
        );
    }

    #[test]
    fn cdn_prefix_takes_priority() {
        let (url, rule) = resolver().resolve_path("/cdn-uploads/covers/a.mp3");

        assert_eq!(url, "https://cdn.party.test/covers/a.mp3");
        assert_eq!(rule, Resolution::Cdn);
    }

    #[test]
    fn absolute_urls_pass_through() {
        for url in [
            "https://media.example.com/a.mp3",
            "http://localhost:8080/uploads/a.mp3",
            "blob:https://app.listenparty.app/550e8400-e29b-41d4-a716-446655440000",
            "data:audio/mpeg;base64,SUQzBAAAAAAA",
            "mediastream:5f2c1a",
        ] {
            assert_eq!(resolver().resolve_path(url), (url.to_string(), Resolution::Absolute));
        }
    }

    #[test]
    fn scheme_lookalikes_still_resolve_against_origin() {
        for (path, expected) in [
            ("c:/music/a.mp3", "https://party.test/c:/music/a.mp3"),
            ("/clips/intro:v2.mp3", "https://party.test/clips/intro:v2.mp3"),
        ] {
            assert_eq!(resolver().resolve_path(path), (expected.to_string(), Resolution::Origin));
        }
    }

    #[test]
    fn protocol_relative_urls_get_https() {
        let (url, rule) = resolver().resolve_path("//media.example.com/a.mp3");

        assert_eq!(url, "https://media.example.com/a.mp3");
        assert_eq!(rule, Resolution::Absolute);
    }

    #[test]
    fn unknown_paths_fall_through_to_origin() {
        let (url, rule) = resolver().resolve_path("static/jingle.mp3");

        assert_eq!(url, "https://party.test/static/jingle.mp3");
        assert_eq!(rule, Resolution::Origin);
    }

    #[test]
    fn lookalike_prefix_is_not_an_upload() {
        let (url, rule) = resolver().resolve_path("/uploadsx/a.mp3");

        assert_eq!(url, "https://party.test/uploadsx/a.mp3");
        assert_eq!(rule, Resolution::Origin);
    }

    #[test]
    fn resolution_is_idempotent_for_every_path_class() {
        let resolver = resolver();

        for path in [
            "/cdn-uploads/x.mp3",
            "/uploads/media-uploads/x.mp3",
            "/podcasts/x.mp3",
            "relative/x.mp3",
        ] {
            let (once, _) = resolver.resolve_path(path);
            let (twice, rule) = resolver.resolve_path(&once);

            assert_eq!(once, twice, "path {path}");
            assert_eq!(rule, Resolution::Absolute);
        }
    }

    #[test]
    fn nothing_selected_resolves_to_empty() {
        assert_eq!(resolver().resolve_selected(None), "");
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let (url, _) = resolver().resolve_path("  /uploads/a.mp3\n");

        assert_eq!(url, "https://uploads.party.test/a.mp3");
    }
}
