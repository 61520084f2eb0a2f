use crate::chat::responder::Responder;
use crate::domain::message::ChatMessage;

/// Messages shown for one request. Nothing carries over between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatTranscript {
    pub messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    /// Initial page load.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Case folding applied to every question before routing and echoing.
pub fn normalize_input(raw: &str) -> String {
    raw.to_lowercase()
}

/// Runs one exchange: the echoed question followed by exactly one reply.
pub async fn handle_turn(responder: &Responder, raw_input: &str) -> ChatTranscript {
    let text = normalize_input(raw_input);
    let reply = responder.reply(&text).await;

    ChatTranscript {
        messages: vec![ChatMessage::user(text), ChatMessage::bot(reply)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::trend::TrendWindows;
    use crate::chat::responder::tests::StubClient;
    use crate::domain::message::Role;
    use std::sync::Arc;

    #[tokio::test]
    async fn turn_yields_user_then_bot() {
        let responder = Responder::new(
            Arc::new(StubClient::default()),
            Arc::new(StubClient::default()),
            TrendWindows::default(),
        );

        let transcript = handle_turn(&responder, "Hello There").await;
        assert_eq!(transcript.messages.len(), 2);
        assert_eq!(transcript.messages[0].role, Role::User);
        assert_eq!(transcript.messages[0].text, "hello there");
        assert_eq!(transcript.messages[1].role, Role::Bot);
        assert_eq!(
            transcript.messages[1].text,
            "Got your question: 'hello there'. Soon more insights!"
        );
    }

    #[tokio::test]
    async fn upper_case_tickers_are_recognized() {
        let responder = Responder::new(
            Arc::new(StubClient::default().with_quote("AAPL", Ok(100.0))),
            Arc::new(StubClient::default()),
            TrendWindows::default(),
        );

        let transcript = handle_turn(&responder, "AAPL PRICE").await;
        assert_eq!(transcript.messages[1].text, "AAPL stock is at $100.00");
    }

    #[test]
    fn initial_load_is_empty() {
        assert!(ChatTranscript::empty().messages.is_empty());
    }
}
