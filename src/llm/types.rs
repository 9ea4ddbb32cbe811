//! Generation options shared by all chat providers.

use serde::{Deserialize, Serialize};

/// Options controlling a single chat request.
///
/// # Examples
///
/// ```
/// use hyde_rag::llm::types::RequestOptions;
///
/// let opts = RequestOptions::new()
///     .with_temperature(0.5)
///     .with_json_mode(true);
///
/// assert_eq!(opts.temperature, Some(0.5));
/// assert!(opts.json_mode);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions {
    /// Maximum tokens to generate. `None` leaves it to the provider.
    pub max_tokens: Option<usize>,
    /// Sampling temperature. `None` leaves it to the provider.
    pub temperature: Option<f64>,
    /// Ask the provider to constrain the reply to a single JSON object.
    pub json_mode: bool,
}

impl RequestOptions {
    /// Create request options with provider defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Enable or disable JSON-object output.
    pub fn with_json_mode(mut self, json_mode: bool) -> Self {
        self.json_mode = json_mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_everything_to_provider() {
        let opts = RequestOptions::new();
        assert!(opts.max_tokens.is_none());
        assert!(opts.temperature.is_none());
        assert!(!opts.json_mode);
    }

    #[test]
    fn builder_chain() {
        let opts = RequestOptions::new()
            .with_max_tokens(256)
            .with_temperature(0.2)
            .with_json_mode(true);
        assert_eq!(opts.max_tokens, Some(256));
        assert_eq!(opts.temperature, Some(0.2));
        assert!(opts.json_mode);
    }
}
