//! Event router and per-user quiz state machine.
//!
//! Every inbound event is classified, the user's session is locked for the
//! whole read-modify-write cycle, and the resulting replies go to the
//! `ReplySink`. Nothing here fails the caller: storage and transport errors
//! are logged and turned into the prescribed user-facing reply.

use std::sync::Arc;

use quiz_core::model::{
    Difficulty, Section, SessionPhase, SessionState, UserId, parse_answer,
};
use storage::repository::{QuestionSource, ScoreStore};

use crate::config::BotConfig;
use crate::dedup::CallbackDeduplicator;
use crate::events::{
    CallbackAction, CallbackEvent, Command, CommandMessage, InboundEvent, Menu, Reply,
    TextMessage,
};
use crate::messages;
use crate::scoring::ScoringEngine;
use crate::session_store::{SessionGuard, SessionStore};
use crate::sink::ReplySink;

pub struct Dispatcher {
    config: BotConfig,
    sessions: SessionStore,
    dedup: CallbackDeduplicator,
    questions: Arc<dyn QuestionSource>,
    scoring: ScoringEngine,
    sink: Arc<dyn ReplySink>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        config: BotConfig,
        questions: Arc<dyn QuestionSource>,
        scores: Arc<dyn ScoreStore>,
        sink: Arc<dyn ReplySink>,
    ) -> Self {
        Self {
            sessions: SessionStore::with_shards(config.session_shards),
            dedup: CallbackDeduplicator::new(config.dedup_window),
            scoring: ScoringEngine::new(scores),
            questions,
            sink,
            config,
        }
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    #[must_use]
    pub fn scoring(&self) -> &ScoringEngine {
        &self.scoring
    }

    /// Process one inbound event to completion.
    ///
    /// Safe to call concurrently; events for the same user are serialized on
    /// that user's session lock.
    pub async fn dispatch(&self, event: InboundEvent) {
        tracing::debug!(user = %event.chat_id(), kind = event.kind(), "dispatching event");
        match event {
            InboundEvent::Command(message) => self.handle_command(message).await,
            InboundEvent::Text(message) => self.handle_text(message).await,
            InboundEvent::Callback(callback) => self.handle_callback(callback).await,
        }
    }

    async fn handle_command(&self, message: CommandMessage) {
        let chat = message.chat_id;
        let reply = match Command::from_name(&message.command) {
            Command::Start => {
                Reply::with_menu(chat, messages::greeting(&message.from), Menu::Start)
            }
            Command::Help => Reply::text(chat, messages::help(&self.config.contact)),
            Command::Stat => {
                let standing = self.scoring.rank(chat).await;
                Reply::text(chat, messages::standing(standing))
            }
            Command::Unknown(name) => {
                tracing::debug!(user = %chat, command = %name, "unknown command");
                Reply::text(chat, messages::UNKNOWN_COMMAND)
            }
        };
        self.send(reply).await;
    }

    async fn handle_text(&self, message: TextMessage) {
        let chat = message.chat_id;
        tracing::info!(
            user = %chat,
            username = message.from.username.as_deref().unwrap_or(""),
            text = %message.text,
            "text message"
        );

        let Some(mut session) = self.sessions.lock_existing(chat).await else {
            self.send(Reply::text(chat, message.text)).await;
            return;
        };
        let expected = match (session.phase(), session.state()) {
            (SessionPhase::AwaitingAnswer, Some(state)) => state.pending_answer(),
            _ => None,
        };
        let Some(expected) = expected else {
            drop(session);
            self.send(Reply::text(chat, message.text)).await;
            return;
        };

        let answer = match parse_answer(&message.text) {
            Ok(answer) => answer,
            Err(err) => {
                tracing::debug!(user = %chat, error = %err, "non-numeric answer");
                self.send(Reply::text(chat, messages::NUMERIC_ANSWER)).await;
                return;
            }
        };

        let difficulty = session.state().and_then(SessionState::difficulty);
        if let Some(state) = session.state_mut() {
            state.mark_graded();
        }

        if answer == expected {
            self.send(Reply::text(chat, messages::CORRECT)).await;
            if let Err(err) = self.scoring.record_correct_answer(chat, difficulty).await {
                tracing::error!(user = %chat, error = %err, "failed to update user score");
            }
        } else {
            self.send(Reply::text(chat, messages::incorrect(expected))).await;
        }
        self.send(Reply::with_menu(chat, messages::CONTINUE, Menu::NextTask))
            .await;
    }

    async fn handle_callback(&self, callback: CallbackEvent) {
        if !self.dedup.first_delivery(&callback.callback_id) {
            tracing::debug!(
                user = %callback.chat_id,
                callback = %callback.callback_id,
                "dropping redelivered callback"
            );
            return;
        }

        if let Err(err) = self.sink.acknowledge(&callback.callback_id).await {
            tracing::warn!(callback = %callback.callback_id, error = %err, "failed to acknowledge callback");
        }

        let chat = callback.chat_id;
        match CallbackAction::from_token(&callback.data) {
            CallbackAction::ChoosePhysics => {
                self.send(Reply::with_menu(chat, messages::CHOOSE_TOPIC, Menu::Topic))
                    .await;
            }
            CallbackAction::Section(section) => self.select_section(chat, section).await,
            CallbackAction::Difficulty(difficulty) => {
                self.select_difficulty(chat, difficulty).await;
            }
            CallbackAction::NextTask => self.next_task(chat).await,
            CallbackAction::Greet => {
                self.send(Reply::text(chat, messages::hello(&callback.from)))
                    .await;
            }
            CallbackAction::Unknown(data) => {
                tracing::debug!(user = %chat, data = %data, "unknown callback data");
                self.send(Reply::text(chat, messages::UNKNOWN_ACTION)).await;
            }
        }
    }

    async fn select_section(&self, chat: UserId, section: Section) {
        let mut session = self.sessions.lock(chat).await;
        session.replace(SessionState::for_section(section));
        self.send(Reply::with_menu(
            chat,
            messages::CHOOSE_DIFFICULTY,
            Menu::Difficulty,
        ))
        .await;
        drop(session);
    }

    async fn select_difficulty(&self, chat: UserId, difficulty: Difficulty) {
        let Some(mut session) = self.sessions.lock_existing(chat).await else {
            tracing::debug!(user = %chat, "difficulty chosen without a session");
            self.ask_for_topic(chat).await;
            return;
        };
        if session.phase() == SessionPhase::Idle {
            tracing::debug!(user = %chat, "difficulty chosen without a session");
            drop(session);
            self.ask_for_topic(chat).await;
            return;
        }
        if let Some(state) = session.state_mut() {
            state.select_difficulty(difficulty);
        }
        self.send_question(&mut session).await;
    }

    async fn next_task(&self, chat: UserId) {
        let Some(mut session) = self.sessions.lock_existing(chat).await else {
            tracing::debug!(user = %chat, "next task requested without a session");
            self.ask_for_topic(chat).await;
            return;
        };
        if session.state().and_then(SessionState::topic).is_none() {
            tracing::debug!(user = %chat, "next task requested without a topic");
            drop(session);
            self.ask_for_topic(chat).await;
            return;
        }
        self.send_question(&mut session).await;
    }

    /// Fetch a question for the session's topic, send it, and store its answer.
    /// On failure the session is left as it was and the user is told.
    async fn send_question(&self, session: &mut SessionGuard) {
        let chat = session.user();
        let Some((section, difficulty)) = session.state().and_then(SessionState::topic) else {
            self.ask_for_topic(chat).await;
            return;
        };

        match self.questions.random_question(section, difficulty).await {
            Ok(question) => {
                let assigned = session
                    .state_mut()
                    .is_some_and(|state| state.assign_question(question.expected_answer));
                if !assigned {
                    tracing::warn!(user = %chat, "question fetched for a session without a topic");
                    self.ask_for_topic(chat).await;
                    return;
                }
                self.send(Reply::text(chat, question.text)).await;
            }
            Err(err) => {
                tracing::warn!(
                    user = %chat,
                    section = %section,
                    difficulty = %difficulty,
                    error = %err,
                    "error fetching task"
                );
                self.send(Reply::text(chat, messages::FETCH_FAILED)).await;
            }
        }
    }

    async fn ask_for_topic(&self, chat: UserId) {
        self.send(Reply::with_menu(chat, messages::TOPIC_FIRST, Menu::Topic))
            .await;
    }

    async fn send(&self, reply: Reply) {
        let chat = reply.chat_id;
        if let Err(err) = self.sink.send(reply).await {
            tracing::error!(user = %chat, error = %err, "send message error");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{ChannelSink, Outbound};
    use quiz_core::model::{CallbackId, Question};
    use storage::repository::{InMemoryRepository, QuestionBank};

    async fn dispatcher() -> (Dispatcher, tokio::sync::mpsc::UnboundedReceiver<Outbound>) {
        let repo = InMemoryRepository::new();
        repo.add_question(Section::Dynamics, Difficulty::Beginner, &Question::new("2+2", 4))
            .await
            .unwrap();
        let (sink, rx) = ChannelSink::new();
        let repo = Arc::new(repo);
        let dispatcher = Dispatcher::new(
            BotConfig::default(),
            repo.clone(),
            repo,
            Arc::new(sink),
        );
        (dispatcher, rx)
    }

    fn callback(id: &str, chat: i64, data: &str) -> InboundEvent {
        InboundEvent::Callback(CallbackEvent {
            callback_id: CallbackId::new(id),
            chat_id: UserId::new(chat),
            data: data.to_owned(),
            from: crate::events::Sender::default(),
        })
    }

    fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<Outbound>) -> Vec<Outbound> {
        let mut out = Vec::new();
        while let Ok(item) = rx.try_recv() {
            out.push(item);
        }
        out
    }

    #[tokio::test]
    async fn acknowledges_before_replying() {
        let (dispatcher, mut rx) = dispatcher().await;
        dispatcher.dispatch(callback("a", 1, "choose_physics")).await;

        let out = drain(&mut rx);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], Outbound::Acknowledge(CallbackId::new("a")));
        assert!(matches!(&out[1], Outbound::Reply(r) if r.menu == Some(Menu::Topic)));
    }

    #[tokio::test]
    async fn choose_physics_keeps_outstanding_question() {
        let (dispatcher, mut rx) = dispatcher().await;
        let user = UserId::new(1);
        dispatcher.dispatch(callback("a", 1, "dynamics")).await;
        dispatcher.dispatch(callback("b", 1, "beginner")).await;
        dispatcher.dispatch(callback("c", 1, "choose_physics")).await;
        drain(&mut rx);

        let state = dispatcher.sessions().get(user).await.unwrap();
        assert_eq!(state.phase(), SessionPhase::AwaitingAnswer);
    }

    #[tokio::test]
    async fn next_task_without_session_asks_for_topic() {
        let (dispatcher, mut rx) = dispatcher().await;
        dispatcher.dispatch(callback("a", 5, "next_task")).await;

        let out = drain(&mut rx);
        assert_eq!(
            out.last(),
            Some(&Outbound::Reply(Reply::with_menu(
                UserId::new(5),
                messages::TOPIC_FIRST,
                Menu::Topic
            )))
        );
        assert_eq!(dispatcher.sessions().get(UserId::new(5)).await, None);
    }

    #[tokio::test]
    async fn read_only_traffic_does_not_create_sessions() {
        let (dispatcher, mut rx) = dispatcher().await;
        for chat in 1..=10 {
            dispatcher
                .dispatch(InboundEvent::Text(TextMessage {
                    chat_id: UserId::new(chat),
                    text: "hello".into(),
                    from: crate::events::Sender::default(),
                }))
                .await;
            dispatcher
                .dispatch(InboundEvent::Command(CommandMessage {
                    chat_id: UserId::new(chat),
                    command: "stat".into(),
                    args: String::new(),
                    from: crate::events::Sender::default(),
                }))
                .await;
            dispatcher
                .dispatch(callback(&format!("d{chat}"), chat, "expert"))
                .await;
        }
        drain(&mut rx);
        assert_eq!(dispatcher.sessions().tracked_users(), 0);
    }
}
