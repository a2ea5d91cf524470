use async_trait::async_trait;
use quiz_core::model::CallbackId;
use tokio::sync::mpsc;

use crate::error::TransportError;
use crate::events::Reply;

/// Where the dispatcher's effects go. Implemented by the chat transport.
#[async_trait]
pub trait ReplySink: Send + Sync {
    /// Tell the platform a button press was received so it stops showing a
    /// loading indicator.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the acknowledgement cannot be delivered.
    async fn acknowledge(&self, callback: &CallbackId) -> Result<(), TransportError>;

    /// Deliver one reply.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the reply cannot be delivered.
    async fn send(&self, reply: Reply) -> Result<(), TransportError>;
}

/// Effect emitted by the dispatcher, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Acknowledge(CallbackId),
    Reply(Reply),
}

/// Sink that forwards every effect into an unbounded channel, for transports
/// that deliver from a single writer task (and for tests).
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Outbound>,
}

impl ChannelSink {
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl ReplySink for ChannelSink {
    async fn acknowledge(&self, callback: &CallbackId) -> Result<(), TransportError> {
        self.tx
            .send(Outbound::Acknowledge(callback.clone()))
            .map_err(|_| TransportError::Closed)
    }

    async fn send(&self, reply: Reply) -> Result<(), TransportError> {
        self.tx
            .send(Outbound::Reply(reply))
            .map_err(|_| TransportError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::UserId;

    #[tokio::test]
    async fn forwards_in_order() {
        let (sink, mut rx) = ChannelSink::new();
        sink.acknowledge(&CallbackId::new("cb")).await.unwrap();
        sink.send(Reply::text(UserId::new(1), "hello")).await.unwrap();

        assert_eq!(
            rx.recv().await,
            Some(Outbound::Acknowledge(CallbackId::new("cb")))
        );
        assert_eq!(
            rx.recv().await,
            Some(Outbound::Reply(Reply::text(UserId::new(1), "hello")))
        );
    }

    #[tokio::test]
    async fn closed_receiver_is_reported() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        let err = sink.send(Reply::text(UserId::new(1), "x")).await.unwrap_err();
        assert!(matches!(err, TransportError::Closed));
    }
}
