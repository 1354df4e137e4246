//! Move provider backed by a language model.

use super::{MoveProvider, ProviderError};
use crate::config::AppConfig;
use crate::llm_client::{LlmClient, LlmErrorKind};
use serde::Deserialize;
use tictactoe_core::{Board, HUMAN_MARK, MoveSuggestion};
use tracing::{debug, info, instrument, warn};

const SYSTEM_PROMPT: &str = "You are playing tic-tac-toe. Cells are indexed 0-8, \
left-to-right, top-to-bottom. Reply with only a JSON object: \
{\"move\": <index of an empty cell>, \"comment\": \"<max 2 words>\"}";

/// Asks a language model for the automated player's move.
///
/// Without a client (no API key found) every request fails with
/// `Unavailable`, which the controller turns into a fallback move.
#[derive(Debug, Clone)]
pub struct LlmMoveProvider {
    client: Option<LlmClient>,
    name: String,
}

impl LlmMoveProvider {
    /// Creates a provider using `client`.
    pub fn new(client: LlmClient) -> Self {
        let name = format!(
            "{}:{}",
            client.config().provider(),
            client.config().model()
        );
        Self {
            client: Some(client),
            name,
        }
    }

    /// Creates a provider with no client.
    pub fn unconfigured() -> Self {
        Self {
            client: None,
            name: "unconfigured".to_string(),
        }
    }

    /// Builds a provider from application config and environment credentials.
    ///
    /// A missing key is logged and yields an unconfigured provider.
    #[instrument(skip(config), fields(provider = %config.llm_provider()))]
    pub fn from_config(config: &AppConfig) -> Self {
        match config.create_llm_config() {
            Ok(llm_config) => {
                info!(model = %llm_config.model(), "LLM move provider configured");
                Self::new(LlmClient::new(llm_config))
            }
            Err(e) => {
                warn!(error = %e, "No LLM credentials, automated moves will use the fallback");
                Self::unconfigured()
            }
        }
    }

    /// True when a client is present.
    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }
}

/// Builds the user prompt for `board`.
fn build_prompt(board: &Board) -> String {
    let cells = serde_json::to_string(&board.as_symbols()).unwrap_or_default();
    format!("Play {}. Board:{}. Win or Block.", HUMAN_MARK.opponent(), cells)
}

#[derive(Debug, Deserialize)]
struct Reply {
    #[serde(rename = "move")]
    index: i64,
    #[serde(default)]
    comment: String,
}

/// Parses a model reply into a suggestion.
///
/// Accepts the JSON object bare, inside a code fence, or surrounded by prose.
/// Range and occupancy are not checked here.
pub fn parse_suggestion(text: &str) -> Result<MoveSuggestion, ProviderError> {
    let start = text.find('{');
    let end = text.rfind('}');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => {
            return Err(ProviderError::malformed(format!(
                "No JSON object in reply: {}",
                text
            )));
        }
    };

    let reply: Reply = serde_json::from_str(json)
        .map_err(|e| ProviderError::malformed(format!("Unreadable reply {}: {}", json, e)))?;

    let index = usize::try_from(reply.index)
        .map_err(|_| ProviderError::malformed(format!("Negative move {}", reply.index)))?;

    Ok(MoveSuggestion::new(index, reply.comment.trim()))
}

#[async_trait::async_trait]
impl MoveProvider for LlmMoveProvider {
    #[instrument(skip(self, board), fields(provider = %self.name))]
    async fn propose_move(&self, board: &Board) -> Result<MoveSuggestion, ProviderError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| ProviderError::unavailable("No API key configured"))?;

        let prompt = build_prompt(board);
        debug!(%prompt, "Asking model for a move");

        let text = client
            .generate(SYSTEM_PROMPT, &prompt)
            .await
            .map_err(|e| match e.kind {
                LlmErrorKind::Transport => ProviderError::transport(e.message),
                LlmErrorKind::EmptyResponse => ProviderError::malformed(e.message),
            })?;

        let suggestion = parse_suggestion(&text)?;
        info!(index = suggestion.index, annotation = %suggestion.annotation, "Model suggested a move");
        Ok(suggestion)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderErrorKind;
    use tictactoe_core::Mark;

    #[test]
    fn test_prompt_matches_compact_format() {
        let board = Board::empty().place(0, Mark::X).unwrap();
        assert_eq!(
            build_prompt(&board),
            r#"Play O. Board:["X",null,null,null,null,null,null,null,null]. Win or Block."#
        );
    }

    #[test]
    fn test_parse_bare_json() {
        let s = parse_suggestion(r#"{"move": 4, "comment": "Center!"}"#).unwrap();
        assert_eq!(s, MoveSuggestion::new(4, "Center!"));
    }

    #[test]
    fn test_parse_fenced_json_with_prose() {
        let text = "Sure, here you go:\n```json\n{\"move\": 2, \"comment\": \" Block \"}\n```";
        let s = parse_suggestion(text).unwrap();
        assert_eq!(s, MoveSuggestion::new(2, "Block"));
    }

    #[test]
    fn test_parse_without_comment() {
        let s = parse_suggestion(r#"{"move": 7}"#).unwrap();
        assert_eq!(s.index, 7);
        assert!(s.annotation.is_empty());
    }

    #[test]
    fn test_out_of_range_move_is_left_for_the_caller() {
        let s = parse_suggestion(r#"{"move": 11, "comment": "hm"}"#).unwrap();
        assert_eq!(s.index, 11);
    }

    #[test]
    fn test_malformed_replies() {
        for text in [
            "I'll take the center.",
            r#"{"comment": "no move"}"#,
            r#"{"move": "four"}"#,
            r#"{"move": -1}"#,
            "} backwards {",
        ] {
            let err = parse_suggestion(text).unwrap_err();
            assert_eq!(err.kind, ProviderErrorKind::MalformedResponse, "{text}");
        }
    }

    #[tokio::test]
    async fn test_unconfigured_provider_is_unavailable() {
        let provider = LlmMoveProvider::unconfigured();
        assert!(!provider.is_configured());
        let err = provider.propose_move(&Board::empty()).await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Unavailable);
    }
}
