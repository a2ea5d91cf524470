//! Inbound events delivered by the chat transport and the replies sent back.

use quiz_core::model::{CallbackId, Difficulty, Section, UserId};
use serde::{Deserialize, Serialize};

/// Display name of whoever sent an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMessage {
    pub chat_id: UserId,
    pub command: String,
    #[serde(default)]
    pub args: String,
    #[serde(default)]
    pub from: Sender,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMessage {
    pub chat_id: UserId,
    pub text: String,
    #[serde(default)]
    pub from: Sender,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackEvent {
    pub callback_id: CallbackId,
    pub chat_id: UserId,
    pub data: String,
    #[serde(default)]
    pub from: Sender,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InboundEvent {
    Command(CommandMessage),
    Text(TextMessage),
    Callback(CallbackEvent),
}

impl InboundEvent {
    #[must_use]
    pub fn chat_id(&self) -> UserId {
        match self {
            InboundEvent::Command(m) => m.chat_id,
            InboundEvent::Text(m) => m.chat_id,
            InboundEvent::Callback(c) => c.chat_id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::Command(_) => "command",
            InboundEvent::Text(_) => "text",
            InboundEvent::Callback(_) => "callback",
        }
    }
}

/// Slash commands the bot understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Stat,
    Unknown(String),
}

impl Command {
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim_start_matches('/') {
            "start" => Self::Start,
            "help" => Self::Help,
            "stat" => Self::Stat,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

/// Action encoded in a button's callback data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    ChoosePhysics,
    Section(Section),
    Difficulty(Difficulty),
    NextTask,
    Greet,
    Unknown(String),
}

impl CallbackAction {
    pub const CHOOSE_PHYSICS: &'static str = "choose_physics";
    pub const NEXT_TASK: &'static str = "next_task";
    pub const GREET: &'static str = "hi";

    #[must_use]
    pub fn from_token(data: &str) -> Self {
        match data {
            Self::CHOOSE_PHYSICS => Self::ChoosePhysics,
            Self::NEXT_TASK => Self::NextTask,
            Self::GREET => Self::Greet,
            other => {
                if let Ok(section) = other.parse::<Section>() {
                    Self::Section(section)
                } else if let Ok(difficulty) = other.parse::<Difficulty>() {
                    Self::Difficulty(difficulty)
                } else {
                    Self::Unknown(other.to_owned())
                }
            }
        }
    }
}

/// Named keyboard the transport renders under a reply. The dispatcher only
/// picks one; building the buttons is the transport's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Menu {
    /// "Continue" → `choose_physics`.
    Start,
    /// One button per section.
    Topic,
    /// One button per difficulty tier.
    Difficulty,
    /// `next_task` or `choose_physics`.
    NextTask,
}

impl Menu {
    /// Callback tokens of the menu's buttons, in display order.
    #[must_use]
    pub fn tokens(self) -> Vec<&'static str> {
        match self {
            Menu::Start => vec![CallbackAction::CHOOSE_PHYSICS],
            Menu::Topic => Section::ALL.iter().map(|s| s.as_str()).collect(),
            Menu::Difficulty => Difficulty::ALL.iter().map(|d| d.as_str()).collect(),
            Menu::NextTask => vec![CallbackAction::NEXT_TASK, CallbackAction::CHOOSE_PHYSICS],
        }
    }
}

/// One outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub chat_id: UserId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<Menu>,
}

impl Reply {
    #[must_use]
    pub fn text(chat_id: UserId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            menu: None,
        }
    }

    #[must_use]
    pub fn with_menu(chat_id: UserId, text: impl Into<String>, menu: Menu) -> Self {
        Self {
            chat_id,
            text: text.into(),
            menu: Some(menu),
        }
    }
}
