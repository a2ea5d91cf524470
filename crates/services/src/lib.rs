#![forbid(unsafe_code)]

pub mod config;
pub mod dedup;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod messages;
pub mod scoring;
pub mod session_store;
pub mod sink;

pub use config::BotConfig;
pub use dedup::CallbackDeduplicator;
pub use dispatcher::Dispatcher;
pub use error::{ConfigError, ScoringError, TransportError};
pub use events::{
    CallbackAction, CallbackEvent, Command, CommandMessage, InboundEvent, Menu, Reply, Sender,
    TextMessage,
};
pub use scoring::ScoringEngine;
pub use session_store::{SessionGuard, SessionStore};
pub use sink::{ChannelSink, Outbound, ReplySink};
