//! Image link normalization.
//!
//! Lessons store a bare filename or relative path under `image` (older data
//! uses `icon`). Clients need an absolute URL they can fetch from `/images`,
//! built from the origin of the request being answered.

use serde_json::Value;
use std::fmt;
use url::Url;

use super::error::LessonError;
use crate::domains::store::Document;

/// Path prefix every image link lives under.
pub const IMAGES_PREFIX: &str = "images/";

const IMAGE_FIELD: &str = "image";
const ICON_FIELD: &str = "icon";

/// Scheme and authority of a request, e.g. `http://localhost:3000`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin(String);

impl Origin {
    /// Parse a full origin such as `https://example.com:8443`.
    ///
    /// Any path, query or fragment is discarded.
    pub fn parse(raw: &str) -> Result<Self, LessonError> {
        let url = Url::parse(raw.trim()).map_err(|e| LessonError::invalid_origin(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(LessonError::invalid_origin(format!(
                    "unsupported scheme '{}'",
                    other
                )));
            }
        }

        match url.origin() {
            url::Origin::Tuple(..) => Ok(Self(url.origin().ascii_serialization())),
            url::Origin::Opaque(_) => Err(LessonError::invalid_origin(raw)),
        }
    }

    /// Build an origin from a scheme and a `Host` header value.
    pub fn from_parts(scheme: &str, host: &str) -> Result<Self, LessonError> {
        if host.is_empty() || host.contains(['/', '?', '#', '@']) {
            return Err(LessonError::invalid_origin(format!("bad host '{}'", host)));
        }
        Self::parse(&format!("{}://{}", scheme, host))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Absolute URL for a path relative to this origin.
    pub fn join(&self, relative: &str) -> String {
        format!("{}/{}", self.0, relative.trim_start_matches('/'))
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rewrites `image`/`icon` into an absolute `image` URL.
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    placeholder: String,
}

impl ImageNormalizer {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
        }
    }

    /// Relative path (always under [`IMAGES_PREFIX`]) the document's image resolves to.
    pub fn image_path(&self, document: &Document) -> String {
        let Some(stored) = stored_image(document) else {
            return format!("{}{}", IMAGES_PREFIX, self.placeholder);
        };

        let path = absolute_url_path(stored).unwrap_or_else(|| stored.to_string());
        let path = path.trim_start_matches(['/', '\\']);

        if path.starts_with(IMAGES_PREFIX) {
            path.to_string()
        } else {
            format!("{}{}", IMAGES_PREFIX, path)
        }
    }

    /// Derive a copy of `document` whose `image` is absolute and which has no `icon`.
    pub fn normalize(&self, document: &Document, origin: &Origin) -> Document {
        let image = origin.join(&self.image_path(document));

        let mut normalized = document.clone();
        normalized.remove(ICON_FIELD);
        normalized.insert(IMAGE_FIELD.to_string(), Value::String(image));
        normalized
    }

    pub fn normalize_all(&self, documents: &[Document], origin: &Origin) -> Vec<Document> {
        documents
            .iter()
            .map(|document| self.normalize(document, origin))
            .collect()
    }
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self::new("placeholder.png")
    }
}

/// `image` if it holds a usable value, otherwise `icon`.
fn stored_image(document: &Document) -> Option<&str> {
    [IMAGE_FIELD, ICON_FIELD].into_iter().find_map(|field| {
        document
            .get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    })
}

/// The decoded path of an already absolute http(s) URL.
fn absolute_url_path(value: &str) -> Option<String> {
    let lowered = value.to_ascii_lowercase();
    if !(lowered.starts_with("http://") || lowered.starts_with("https://")) {
        return None;
    }
    let url = Url::parse(value).ok()?;
    let path = url.path();
    Some(
        urlencoding::decode(path)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| path.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn origin() -> Origin {
        Origin::parse("http://localhost:3000").unwrap()
    }

    #[test]
    fn test_missing_image_uses_placeholder() {
        let normalizer = ImageNormalizer::default();
        for input in [
            json!({ "subject": "Math" }),
            json!({ "subject": "Math", "image": null }),
            json!({ "subject": "Math", "image": "", "icon": "  " }),
            json!({ "subject": "Math", "image": 42 }),
        ] {
            let out = normalizer.normalize(&doc(input), &origin());
            assert_eq!(out["image"], json!("http://localhost:3000/images/placeholder.png"));
            assert!(!out.contains_key("icon"));
        }
    }

    #[test]
    fn test_icon_is_moved_to_image() {
        let normalizer = ImageNormalizer::default();
        let out = normalizer.normalize(&doc(json!({ "icon": "foo.png" })), &origin());

        assert_eq!(out["image"], json!("http://localhost:3000/images/foo.png"));
        assert!(!out.contains_key("icon"));
    }

    #[test]
    fn test_image_preferred_over_icon() {
        let normalizer = ImageNormalizer::default();
        let out = normalizer.normalize(
            &doc(json!({ "image": "math.png", "icon": "other.png" })),
            &origin(),
        );

        assert_eq!(out["image"], json!("http://localhost:3000/images/math.png"));
        assert!(!out.contains_key("icon"));
    }

    #[test]
    fn test_leading_separators_and_prefix() {
        let normalizer = ImageNormalizer::default();
        let cases = [
            ("/foo.png", "images/foo.png"),
            ("//foo.png", "images/foo.png"),
            ("\\foo.png", "images/foo.png"),
            ("images/foo.png", "images/foo.png"),
            ("/images/foo.png", "images/foo.png"),
            ("art/foo.png", "images/art/foo.png"),
        ];
        for (stored, expected) in cases {
            assert_eq!(
                normalizer.image_path(&doc(json!({ "image": stored }))),
                expected,
                "{stored}"
            );
        }
    }

    #[test]
    fn test_normalizing_twice_only_changes_origin() {
        let normalizer = ImageNormalizer::default();
        let first = normalizer.normalize(&doc(json!({ "icon": "foo.png", "id": 1 })), &origin());

        let again = normalizer.normalize(&first, &origin());
        assert_eq!(again, first);

        let elsewhere = Origin::parse("https://lessons.example.com").unwrap();
        let moved = normalizer.normalize(&first, &elsewhere);
        assert_eq!(moved["image"], json!("https://lessons.example.com/images/foo.png"));
        assert_eq!(moved["id"], json!(1));
    }

    #[test]
    fn test_normalizing_twice_keeps_encoded_names() {
        let normalizer = ImageNormalizer::default();
        for name in ["my pic.png", "café.png"] {
            let once = normalizer.normalize(&doc(json!({ "image": name })), &origin());
            let twice = normalizer.normalize(&once, &origin());
            assert_eq!(once["image"], twice["image"], "{}", name);
        }

        let once = normalizer.normalize(&doc(json!({ "image": "my pic.png" })), &origin());
        assert_eq!(once["image"], json!("http://localhost:3000/images/my pic.png"));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let normalizer = ImageNormalizer::default();
        let input = doc(json!({ "icon": "foo.png", "subject": "Art" }));
        let snapshot = input.clone();

        let _ = normalizer.normalize(&input, &origin());
        assert_eq!(input, snapshot);
    }

    #[test]
    fn test_custom_placeholder() {
        let normalizer = ImageNormalizer::new("missing.jpg");
        let out = normalizer.normalize(&Document::new(), &origin());
        assert_eq!(out["image"], json!("http://localhost:3000/images/missing.jpg"));
    }

    #[test]
    fn test_origin_parsing() {
        assert_eq!(
            Origin::parse("http://localhost:3000/some/path?x=1").unwrap().as_str(),
            "http://localhost:3000"
        );
        assert_eq!(
            Origin::from_parts("https", "Example.COM").unwrap().as_str(),
            "https://example.com"
        );
        assert!(Origin::parse("ftp://example.com").is_err());
        assert!(Origin::parse("not a url").is_err());
        assert!(Origin::from_parts("http", "").is_err());
        assert!(Origin::from_parts("http", "evil.com/path").is_err());
    }
}
