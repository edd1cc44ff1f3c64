//! Credits shown for base map providers.

use serde::{Deserialize, Serialize};

/// Credit line of a tile provider with an optional link to its terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

impl Attribution {
    /// Creates a credit line.
    pub fn new(text: impl Into<String>, url: Option<String>) -> Self {
        Self {
            text: text.into(),
            url,
        }
    }

    /// Text to display.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Link target, if any.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_is_optional_in_json() {
        let attribution: Attribution = serde_json::from_str(r#"{"text": "© Tiles Inc"}"#).unwrap();
        assert_eq!(attribution.text(), "© Tiles Inc");
        assert_eq!(attribution.url(), None);
        assert_eq!(
            serde_json::to_string(&attribution).unwrap(),
            r#"{"text":"© Tiles Inc"}"#
        );
    }
}
