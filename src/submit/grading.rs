//! WebSocket client for the grading service.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

use crate::models::ScoreSummary;
use crate::protocol::{ClientMessage, ServerMessage, SubmissionRequest};

use super::coordinator::SubmissionError;

/// Upper bound on the whole submit exchange, so a dead grader cannot
/// hold the UI in the submitting state forever.
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(15);

/// External service that grades a finished quiz.
#[allow(async_fn_in_trait)]
pub trait GradingService {
    async fn submit(&self, request: &SubmissionRequest) -> Result<ScoreSummary, SubmissionError>;
}

/// Grading client speaking JSON over WebSocket.
#[derive(Debug, Clone)]
pub struct WsGradingClient {
    url: String,
}

impl WsGradingClient {
    pub fn new<U: Into<String>>(url: U) -> Self {
        Self { url: url.into() }
    }

    async fn exchange(&self, request: &SubmissionRequest) -> Result<ScoreSummary, SubmissionError> {
        let (ws_stream, _) = tokio_tungstenite::connect_async(&self.url)
            .await
            .map_err(|e| SubmissionError::Network(format!("failed to connect: {}", e)))?;
        let (mut sender, mut receiver) = ws_stream.split();

        let json = serde_json::to_string(&ClientMessage::Submit {
            request: request.clone(),
        })
        .map_err(|e| SubmissionError::Invalid(e.to_string()))?;
        sender
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| SubmissionError::Network(format!("failed to send: {}", e)))?;

        while let Some(msg) = receiver.next().await {
            let text = match msg {
                Ok(Message::Text(text)) => text.to_string(),
                Ok(Message::Close(_)) => break,
                Ok(_) => continue,
                Err(e) => {
                    return Err(SubmissionError::Network(format!("connection error: {}", e)));
                }
            };

            let reply: ServerMessage = serde_json::from_str(&text)
                .map_err(|e| SubmissionError::Network(format!("unexpected reply: {}", e)))?;
            return match reply {
                ServerMessage::SubmitAck { summary } => Ok(summary),
                ServerMessage::SubmitRejected { reason } => Err(SubmissionError::Rejected(reason)),
            };
        }

        Err(SubmissionError::Network(
            "grader closed the connection without a reply".to_string(),
        ))
    }
}

impl GradingService for WsGradingClient {
    async fn submit(&self, request: &SubmissionRequest) -> Result<ScoreSummary, SubmissionError> {
        match tokio::time::timeout(SUBMIT_TIMEOUT, self.exchange(request)).await {
            Ok(result) => result,
            Err(_) => Err(SubmissionError::Network(
                "grading service timed out".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::validate_user_info;
    use tokio::net::TcpListener;

    fn request() -> SubmissionRequest {
        SubmissionRequest {
            user_info: validate_user_info("Ada", "123", "A1", "Physics").unwrap(),
            answers: Vec::new(),
            questions: Vec::new(),
            start_time_millis: 0,
            end_time_millis: 30_000,
            time_expired: false,
        }
    }

    fn summary() -> ScoreSummary {
        ScoreSummary {
            total_questions: 2,
            correct_answers: 1,
            incorrect_answers: 1,
            percentage: 50.0,
            time_spent_secs: 30,
        }
    }

    /// One-shot grading stub: accepts a connection, expects a Submit
    /// message, sends the canned reply.
    async fn spawn_grader(reply: ServerMessage) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let ws_stream = tokio_tungstenite::accept_async(stream).await.unwrap();
            let (mut sender, mut receiver) = ws_stream.split();

            while let Some(Ok(msg)) = receiver.next().await {
                if let Message::Text(text) = msg {
                    let parsed: ClientMessage = serde_json::from_str(&text).unwrap();
                    let ClientMessage::Submit { request } = parsed;
                    assert_eq!(request.user_info.name, "Ada");

                    let json = serde_json::to_string(&reply).unwrap();
                    sender.send(Message::Text(json.into())).await.unwrap();
                    break;
                }
            }
        });

        format!("ws://{}", addr)
    }

    #[tokio::test]
    async fn test_submit_returns_the_graded_summary() {
        let url = spawn_grader(ServerMessage::SubmitAck { summary: summary() }).await;
        let client = WsGradingClient::new(url);

        let graded = client.submit(&request()).await.expect("graded");
        assert_eq!(graded.correct_answers, 1);
        assert_eq!(graded.percentage, 50.0);
    }

    #[tokio::test]
    async fn test_submit_surfaces_rejection() {
        let url = spawn_grader(ServerMessage::SubmitRejected {
            reason: "unknown question".to_string(),
        })
        .await;
        let client = WsGradingClient::new(url);

        let err = client.submit(&request()).await.unwrap_err();
        match err {
            SubmissionError::Rejected(reason) => assert_eq!(reason, "unknown question"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_grader_is_a_network_error() {
        // Bind and drop to get a port nothing is listening on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = WsGradingClient::new(format!("ws://{}", addr));
        let err = client.submit(&request()).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Network(_)));
    }
}
