use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{ChatId, UserId},
};

use super::{
    private_chat,
    states::{HandlerError, HandlerResult},
};
use crate::{
    config::Config,
    error::MalformedCallback,
    messenger::Messenger,
    session::{SessionStore, Status},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failed,
}

impl Outcome {
    fn tag(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failed => "failed",
        }
    }

    fn status(self) -> Status {
        match self {
            Outcome::Success => Status::Success,
            Outcome::Failed => Status::Failed,
        }
    }

    pub fn admin_notice(self, user: UserId) -> String {
        match self {
            Outcome::Success => format!("User {} successfully logged in.", user.0),
            Outcome::Failed => format!("User {} could not log in, screenshot pending.", user.0),
        }
    }
}

/// Second-tier verdicts from the `/admin` keyboard. They never touch sessions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelVerdict {
    LoggedIn,
    Dropped,
}

impl PanelVerdict {
    pub fn status_line(self) -> &'static str {
        match self {
            PanelVerdict::LoggedIn => "Status: successfully logged in.",
            PanelVerdict::Dropped => "Status: dropped.",
        }
    }
}

/// Inline button payloads. Outcome presses carry the renter id:
/// `success_<id>` / `failed_<id>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackPayload {
    Outcome { outcome: Outcome, user: UserId },
    Panel(PanelVerdict),
}

impl CallbackPayload {
    pub fn encode(self) -> String {
        match self {
            CallbackPayload::Outcome { outcome, user } => format!("{}_{}", outcome.tag(), user.0),
            CallbackPayload::Panel(PanelVerdict::LoggedIn) => "panel_ok".to_owned(),
            CallbackPayload::Panel(PanelVerdict::Dropped) => "panel_dropped".to_owned(),
        }
    }

    pub fn parse(data: &str) -> Option<Self> {
        let (tag, rest) = data.split_once('_')?;
        match tag {
            "success" | "failed" => {
                let outcome = if tag == "success" {
                    Outcome::Success
                } else {
                    Outcome::Failed
                };
                let user = UserId(rest.parse().ok()?);
                Some(CallbackPayload::Outcome { outcome, user })
            }
            "panel" => match rest {
                "ok" => Some(CallbackPayload::Panel(PanelVerdict::LoggedIn)),
                "dropped" => Some(CallbackPayload::Panel(PanelVerdict::Dropped)),
                _ => None,
            },
            _ => None,
        }
    }
}

pub struct Press {
    pub query_id: String,
    pub from: UserId,
    pub chat: ChatId,
    pub data: Option<String>,
}

/// Acknowledges the press, then applies it. Outcome presses are honoured for
/// the renter named in the payload and for the administrator only.
pub async fn route<M: Messenger + ?Sized>(
    messenger: &M,
    store: &dyn SessionStore,
    admin: UserId,
    press: Press,
) -> HandlerResult {
    messenger.answer_callback(press.query_id).await?;

    let data = press.data.unwrap_or_default();
    let Some(payload) = CallbackPayload::parse(&data) else {
        return Err(HandlerError::from(MalformedCallback(data)));
    };

    match payload {
        CallbackPayload::Outcome { outcome, user } => {
            if press.from != user && press.from != admin {
                log::warn!(
                    "user {} pressed {data:?} which belongs to user {}",
                    press.from.0,
                    user.0
                );
                return Ok(());
            }
            if !store.set_status(user, outcome.status()) {
                log::info!("press {data:?} for unknown user {}", user.0);
                return Ok(());
            }
            log::info!("user {} marked {}", user.0, outcome.tag());
            messenger
                .send_text(private_chat(admin), outcome.admin_notice(user))
                .await?;
        }
        CallbackPayload::Panel(verdict) => {
            if press.from != admin {
                log::warn!("user {} pressed an admin panel button", press.from.0);
                return Ok(());
            }
            messenger
                .send_text(press.chat, verdict.status_line().to_owned())
                .await?;
        }
    }
    Ok(())
}

pub async fn callback(
    bot: Bot,
    q: CallbackQuery,
    store: Arc<dyn SessionStore>,
    config: Arc<Config>,
) -> HandlerResult {
    let chat = q
        .message
        .as_ref()
        .map(|m| m.chat.id)
        .unwrap_or_else(|| private_chat(q.from.id));
    let press = Press {
        query_id: q.id,
        from: q.from.id,
        chat,
        data: q.data,
    };
    route(&bot, store.as_ref(), config.admin_id, press).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        messenger::testing::RecordingMessenger,
        session::{InMemSessionStore, UserSession},
    };

    const ADMIN: UserId = UserId(1);

    fn press(from: u64, data: &str) -> Press {
        Press {
            query_id: format!("q-{from}"),
            from: UserId(from),
            chat: ChatId(from as i64),
            data: Some(data.to_owned()),
        }
    }

    #[test]
    fn parses_payloads() {
        assert_eq!(
            CallbackPayload::parse("success_111"),
            Some(CallbackPayload::Outcome {
                outcome: Outcome::Success,
                user: UserId(111)
            })
        );
        assert_eq!(
            CallbackPayload::parse("failed_42"),
            Some(CallbackPayload::Outcome {
                outcome: Outcome::Failed,
                user: UserId(42)
            })
        );
        assert_eq!(
            CallbackPayload::parse("panel_dropped"),
            Some(CallbackPayload::Panel(PanelVerdict::Dropped))
        );
        assert_eq!(CallbackPayload::parse("success"), None);
        assert_eq!(CallbackPayload::parse("success_abc"), None);
        assert_eq!(CallbackPayload::parse("maybe_111"), None);
        assert_eq!(CallbackPayload::parse("panel_maybe"), None);
    }

    #[test]
    fn encode_matches_parse() {
        let payload = CallbackPayload::Outcome {
            outcome: Outcome::Failed,
            user: UserId(9),
        };
        assert_eq!(payload.encode(), "failed_9");
        assert_eq!(CallbackPayload::parse(&payload.encode()), Some(payload));
        assert_eq!(CallbackPayload::Panel(PanelVerdict::LoggedIn).encode(), "panel_ok");
    }

    #[tokio::test]
    async fn success_press_updates_status_and_notifies_admin_once() {
        let messenger = RecordingMessenger::default();
        let store = InMemSessionStore::new();
        store.set(UserId(111), UserSession::waiting("+1234567890"));

        route(&messenger, &store, ADMIN, press(111, "success_111"))
            .await
            .unwrap();

        assert_eq!(store.get(UserId(111)).unwrap().status, Status::Success);
        assert_eq!(
            messenger.texts_to(ChatId(1)),
            vec!["User 111 successfully logged in.".to_owned()]
        );
        assert_eq!(messenger.answers(), vec!["q-111".to_owned()]);
    }

    #[tokio::test]
    async fn failed_press_has_its_own_notice() {
        let messenger = RecordingMessenger::default();
        let store = InMemSessionStore::new();
        store.set(UserId(111), UserSession::waiting("+1"));

        route(&messenger, &store, ADMIN, press(111, "failed_111"))
            .await
            .unwrap();

        assert_eq!(store.get(UserId(111)).unwrap().status, Status::Failed);
        assert_eq!(
            messenger.texts_to(ChatId(1)),
            vec!["User 111 could not log in, screenshot pending.".to_owned()]
        );
    }

    #[tokio::test]
    async fn unknown_user_is_only_acknowledged() {
        let messenger = RecordingMessenger::default();
        let store = InMemSessionStore::new();

        for data in ["success_222", "failed_222"] {
            route(&messenger, &store, ADMIN, press(222, data))
                .await
                .unwrap();
        }

        assert_eq!(store.get(UserId(222)), None);
        assert!(messenger.texts_to(ChatId(1)).is_empty());
        assert_eq!(messenger.answers().len(), 2);
    }

    #[tokio::test]
    async fn admin_may_press_on_behalf_of_renter() {
        let messenger = RecordingMessenger::default();
        let store = InMemSessionStore::new();
        store.set(UserId(111), UserSession::waiting("+1"));

        route(&messenger, &store, ADMIN, press(1, "success_111"))
            .await
            .unwrap();

        assert_eq!(store.get(UserId(111)).unwrap().status, Status::Success);
    }

    #[tokio::test]
    async fn foreign_press_changes_nothing() {
        let messenger = RecordingMessenger::default();
        let store = InMemSessionStore::new();
        store.set(UserId(111), UserSession::waiting("+1"));

        route(&messenger, &store, ADMIN, press(333, "success_111"))
            .await
            .unwrap();

        assert_eq!(store.get(UserId(111)).unwrap().status, Status::Waiting);
        assert!(messenger.texts_to(ChatId(1)).is_empty());
        assert_eq!(messenger.answers(), vec!["q-333".to_owned()]);
    }

    #[tokio::test]
    async fn malformed_payload_is_acknowledged_then_reported() {
        let messenger = RecordingMessenger::default();
        let store = InMemSessionStore::new();

        let err = route(&messenger, &store, ADMIN, press(5, "garbage"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("garbage"));
        assert_eq!(messenger.answers().len(), 1);
    }

    #[tokio::test]
    async fn panel_verdict_echoes_for_admin_only() {
        let messenger = RecordingMessenger::default();
        let store = InMemSessionStore::new();

        route(&messenger, &store, ADMIN, press(1, "panel_ok"))
            .await
            .unwrap();
        route(&messenger, &store, ADMIN, press(7, "panel_dropped"))
            .await
            .unwrap();

        assert_eq!(
            messenger.texts_to(ChatId(1)),
            vec!["Status: successfully logged in.".to_owned()]
        );
        assert!(messenger.texts_to(ChatId(7)).is_empty());
        assert_eq!(messenger.answers().len(), 2);
    }
}
