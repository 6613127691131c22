//! Relay endpoints that fetch a page on our behalf.

use crate::address::Address;
use serde::{Deserialize, Serialize};

/// How the target address is spliced onto a relay's base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertionStyle {
    /// Base followed by the URI-component-encoded address.
    Append,
    /// Base followed by the address as-is.
    Prepend,
}

/// A named relay. The position in the configured list is its priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayEndpoint {
    pub name: String,
    pub base_url: String,
    pub style: InsertionStyle,
}

impl RelayEndpoint {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, style: InsertionStyle) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            style,
        }
    }

    /// Build the URL to request for `address`.
    ///
    /// `encoded` is `address.encoded()`, computed once per fetch by the caller.
    ///
    /// ```
    /// use scrapex_web::{Address, InsertionStyle, RelayEndpoint};
    ///
    /// let addr = Address::new("example.com");
    /// let encoded = addr.encoded();
    ///
    /// let append = RelayEndpoint::new("a", "https://relay.test/raw?url=", InsertionStyle::Append);
    /// assert_eq!(
    ///     append.request_url(&addr, &encoded),
    ///     "https://relay.test/raw?url=https%3A%2F%2Fexample.com"
    /// );
    ///
    /// let prepend = RelayEndpoint::new("p", "https://relay.test/", InsertionStyle::Prepend);
    /// assert_eq!(
    ///     prepend.request_url(&addr, &encoded),
    ///     "https://relay.test/https://example.com"
    /// );
    /// ```
    pub fn request_url(&self, address: &Address, encoded: &str) -> String {
        match self.style {
            InsertionStyle::Append => format!("{}{}", self.base_url, encoded),
            InsertionStyle::Prepend => format!("{}{}", self.base_url, address.as_str()),
        }
    }
}

/// The built-in relay list, in fallback order.
pub fn default_relays() -> Vec<RelayEndpoint> {
    vec![
        RelayEndpoint::new(
            "allOrigins",
            "https://api.allorigins.win/raw?url=",
            InsertionStyle::Append,
        ),
        RelayEndpoint::new(
            "corsAnywhere",
            "https://cors-anywhere.herokuapp.com/",
            InsertionStyle::Prepend,
        ),
        RelayEndpoint::new("corsproxy", "https://corsproxy.io/?", InsertionStyle::Append),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_order_is_stable() {
        let names: Vec<_> = default_relays().into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["allOrigins", "corsAnywhere", "corsproxy"]);
    }

    #[test]
    fn builds_urls_for_each_default_relay() {
        let addr = Address::new("example.com/a?b=c");
        let encoded = addr.encoded();
        let urls: Vec<_> = default_relays()
            .iter()
            .map(|r| r.request_url(&addr, &encoded))
            .collect();

        assert_eq!(
            urls,
            [
                "https://api.allorigins.win/raw?url=https%3A%2F%2Fexample.com%2Fa%3Fb%3Dc",
                "https://cors-anywhere.herokuapp.com/https://example.com/a?b=c",
                "https://corsproxy.io/?https%3A%2F%2Fexample.com%2Fa%3Fb%3Dc",
            ]
        );
    }

    #[test]
    fn styles_deserialize_from_lowercase() {
        let relay: RelayEndpoint = serde_json::from_str(
            r#"{"name":"mine","base_url":"https://r.test/?u=","style":"append"}"#,
        )
        .unwrap();
        assert_eq!(relay.style, InsertionStyle::Append);
    }
}
