use crate::quote::Quote;
use serde::{Deserialize, Serialize};

/// Display name the webhook reply is posted under.
pub const SLACK_USERNAME: &str = "quotebot";

/// The JSON payload returned to the chat slash-command webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackQuoteResponse {
    pub text: String,
    pub username: String,
    pub mrkdwn: bool, // Lets the client render the italic attribution.
}

impl SlackQuoteResponse {
    pub fn from_quote(quote: &Quote) -> Self {
        Self {
            text: format!("{}\n-_{}_", quote.quote, quote.person),
            username: SLACK_USERNAME.to_string(),
            mrkdwn: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_quote_with_italic_attribution() {
        let quote = Quote { id: 1, quote: "Hello".into(), person: "Grace".into() };
        let response = SlackQuoteResponse::from_quote(&quote);

        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"text":"Hello\n-_Grace_","username":"quotebot","mrkdwn":true}"#
        );
    }
}
