//! Integration tests for the LLM move provider.
//!
//! Live tests need API keys and run only with `--features api`.

use tictactoe_arcade::llm_client::{LlmClient, LlmConfig, LlmProvider};
use tictactoe_arcade::{
    Board, FALLBACK_ANNOTATION, FallbackPicker, LlmMoveProvider, Mark, MoveProvider, MoveSource,
    ProviderErrorKind, choose_move,
};
use tracing::instrument;

fn midgame_board() -> Board {
    // X X _ / _ O _ / _ _ _ : O must block at 2
    Board::empty()
        .place(0, Mark::X)
        .and_then(|b| b.place(4, Mark::O))
        .and_then(|b| b.place(1, Mark::X))
        .unwrap()
}

async fn assert_playable_reply(provider: LlmMoveProvider) {
    let board = midgame_board();
    let suggestion = provider
        .propose_move(&board)
        .await
        .expect("Failed to get a move");

    eprintln!("{} suggested {:?}", provider.name(), suggestion);
    assert!(suggestion.index < 9, "Index should be on the board");
}

#[tokio::test]
async fn test_unconfigured_provider_falls_back() {
    let provider = LlmMoveProvider::unconfigured();
    let board = midgame_board();

    let err = provider.propose_move(&board).await.unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::Unavailable);

    let mut picker = FallbackPicker::seeded(3);
    let (suggestion, source) = choose_move(&provider, &board, |b| picker.pick(b))
        .await
        .unwrap();
    assert_eq!(source, MoveSource::Fallback);
    assert_eq!(suggestion.annotation, FALLBACK_ANNOTATION);
    assert!(board.is_empty(suggestion.index));
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_anthropic_move() {
    dotenvy::dotenv().ok();

    let api_key = std::env::var("ANTHROPIC_API_KEY").expect("ANTHROPIC_API_KEY not set");

    let config = LlmConfig::new(
        LlmProvider::Anthropic,
        api_key,
        "claude-3-5-haiku-20241022".to_string(),
        50,
    );

    assert_playable_reply(LlmMoveProvider::new(LlmClient::new(config))).await;
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_openai_move() {
    dotenvy::dotenv().ok();

    let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY not set");

    let config = LlmConfig::new(LlmProvider::OpenAI, api_key, "gpt-4o-mini".to_string(), 50);

    assert_playable_reply(LlmMoveProvider::new(LlmClient::new(config))).await;
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_gemini_move() {
    dotenvy::dotenv().ok();

    let api_key = std::env::var("GEMINI_API_KEY")
        .or_else(|_| std::env::var("API_KEY"))
        .expect("GEMINI_API_KEY not set");

    let config = LlmConfig::new(
        LlmProvider::Gemini,
        api_key,
        "gemini-2.5-flash".to_string(),
        50,
    );

    assert_playable_reply(LlmMoveProvider::new(LlmClient::new(config))).await;
}
