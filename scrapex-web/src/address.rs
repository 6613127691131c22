//! User-entered page addresses.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::fmt;
use url::Url;

/// Characters left untouched by `encodeURIComponent`; everything else is escaped.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A normalized target address.
///
/// Input is trimmed and gets an `https://` prefix when it carries neither
/// `http://` nor `https://`. The value never changes afterwards.
///
/// ```
/// use scrapex_web::Address;
///
/// let addr = Address::new("example.com");
/// assert_eq!(addr.as_str(), "https://example.com");
/// assert_eq!(addr.resolve("/about"), "https://example.com/about");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    raw: String,
    base: Option<Url>,
}

impl Address {
    pub fn new(input: &str) -> Self {
        let input = input.trim();
        let raw = if has_http_scheme(input) {
            input.to_string()
        } else {
            format!("https://{input}")
        };
        let base = Url::parse(&raw).ok();
        Self { raw, base }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The address escaped the way `encodeURIComponent` would.
    pub fn encoded(&self) -> String {
        utf8_percent_encode(&self.raw, URI_COMPONENT).to_string()
    }

    /// Rewrite a root-relative reference against this address.
    ///
    /// `/path` is glued to the origin and `//host/path` inherits the scheme.
    /// Anything else, or any reference when the address itself does not
    /// parse, comes back unchanged.
    pub fn resolve(&self, reference: &str) -> String {
        let Some(base) = &self.base else {
            return reference.to_string();
        };
        if reference.starts_with("//") {
            return base
                .join(reference)
                .map(String::from)
                .unwrap_or_else(|_| reference.to_string());
        }
        if reference.starts_with('/') {
            let origin = base.origin();
            if origin.is_tuple() {
                return format!("{}{}", origin.ascii_serialization(), reference);
            }
        }
        reference.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

fn has_http_scheme(input: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        input
            .get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
    })
}
