//! STOMP session state for one WebSocket connection.
//!
//! The session is a small state machine: frames before `CONNECT` are rejected, `CONNECT`
//! authenticates the access token, and subscriptions decide which hub events become
//! `MESSAGE` frames. Any `ERROR` frame ends the connection.
//!
//! The session outlives single requests, so before VIP content goes out the user is
//! reloaded from the database, and no message is sent once the access token expired.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::UserTier;
use sea_orm::DatabaseConnection;

use crate::{
    model::signal::SignalEventDto,
    server::{
        data::user::UserRepository,
        middleware::auth::{load_user, strip_bearer},
        model::user::User,
        service::auth::jwt::JwtKeys,
        ws::{
            hub::SignalEvent,
            stomp::{Command, Frame},
        },
    },
};

pub const SIGNALS_TOPIC: &str = "/topic/signals";
pub const VIP_SIGNALS_TOPIC: &str = "/topic/signals/vip";

const STOMP_VERSION: &str = "1.2";
const SERVER_NAME: &str = "chamagol";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    /// Every signal event; VIP details redacted for non-VIP viewers.
    Signals,
    /// Only VIP signal events, unredacted.
    VipSignals,
}

impl Topic {
    fn destination(&self) -> &'static str {
        match self {
            Self::Signals => SIGNALS_TOPIC,
            Self::VipSignals => VIP_SIGNALS_TOPIC,
        }
    }

    fn parse(destination: &str) -> Option<Self> {
        match destination {
            SIGNALS_TOPIC => Some(Self::Signals),
            VIP_SIGNALS_TOPIC => Some(Self::VipSignals),
            _ => None,
        }
    }
}

/// Frames to send back and whether to close afterwards.
#[derive(Debug, Default, PartialEq)]
pub struct Reply {
    pub frames: Vec<Frame>,
    pub close: bool,
}

impl Reply {
    fn send(frame: Frame) -> Self {
        Self {
            frames: vec![frame],
            close: false,
        }
    }

    fn none() -> Self {
        Self::default()
    }

    fn fail(message: &str, detail: &str) -> Self {
        Self {
            frames: vec![Frame::error(message, detail)],
            close: true,
        }
    }
}

pub struct StompSession<'a> {
    db: &'a DatabaseConnection,
    jwt: &'a JwtKeys,
    user: Option<User>,
    /// `exp` of the access token presented at `CONNECT`, in Unix seconds.
    token_expires_at: i64,
    /// Subscription id chosen by the client, to topic.
    subscriptions: HashMap<String, Topic>,
}

impl<'a> StompSession<'a> {
    pub fn new(db: &'a DatabaseConnection, jwt: &'a JwtKeys) -> Self {
        Self {
            db,
            jwt,
            user: None,
            token_expires_at: 0,
            subscriptions: HashMap::new(),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Applies one client frame.
    pub async fn handle(&mut self, frame: Frame) -> Reply {
        match frame.command {
            Command::Connect | Command::Stomp => self.connect(&frame).await,
            _ if self.user.is_none() => {
                Reply::fail("Not connected", "Send CONNECT before any other frame")
            }
            Command::Subscribe => self.subscribe(&frame),
            Command::Unsubscribe => self.unsubscribe(&frame),
            Command::Disconnect => Reply {
                frames: receipt(&frame).into_iter().collect(),
                close: true,
            },
            other => Reply::fail(
                "Unsupported frame",
                &format!("{} is not supported on this server", other),
            ),
        }
    }

    async fn connect(&mut self, frame: &Frame) -> Reply {
        if self.user.is_some() {
            return Reply::fail("Already connected", "CONNECT may only be sent once");
        }

        if let Some(versions) = frame.get("accept-version") {
            if !versions.split(',').any(|v| v.trim() == STOMP_VERSION) {
                return Reply::fail(
                    "Unsupported protocol version",
                    &format!("Supported version is {}", STOMP_VERSION),
                );
            }
        }

        let token = frame
            .get("Authorization")
            .or_else(|| frame.get("authorization"))
            .and_then(strip_bearer)
            .or_else(|| frame.get("passcode"));
        let Some(token) = token else {
            return Reply::fail("Authentication required", "Missing access token");
        };

        let claims = match self.jwt.verify(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("STOMP authentication failed: {}", e);
                return Reply::fail("Authentication failed", "Invalid or expired access token");
            }
        };

        match load_user(self.db, &claims).await {
            Ok(user) => {
                tracing::debug!(user_id = user.id, "STOMP session connected");
                self.user = Some(user);
                self.token_expires_at = claims.exp;

                Reply::send(
                    Frame::new(Command::Connected)
                        .header("version", STOMP_VERSION)
                        .header("heart-beat", "0,0")
                        .header("server", SERVER_NAME),
                )
            }
            Err(e) => {
                tracing::debug!("STOMP authentication failed: {}", e);
                Reply::fail("Authentication failed", "Invalid or expired access token")
            }
        }
    }

    fn subscribe(&mut self, frame: &Frame) -> Reply {
        let (Some(id), Some(destination)) = (frame.get("id"), frame.get("destination")) else {
            return Reply::fail("Malformed frame", "SUBSCRIBE requires id and destination");
        };

        let Some(topic) = Topic::parse(destination) else {
            return Reply::fail(
                "Unknown destination",
                &format!("No such destination: {}", destination),
            );
        };

        let can_view_vip = self.user.as_ref().is_some_and(User::can_view_vip);
        if topic == Topic::VipSignals && !can_view_vip {
            return Reply::fail(
                "Access denied",
                "VIP signals require an active VIP subscription",
            );
        }

        if self.subscriptions.contains_key(id) {
            return Reply::fail(
                "Duplicate subscription",
                &format!("Subscription id {} is already in use", id),
            );
        }

        self.subscriptions.insert(id.to_string(), topic);

        Reply {
            frames: receipt(frame).into_iter().collect(),
            close: false,
        }
    }

    fn unsubscribe(&mut self, frame: &Frame) -> Reply {
        let Some(id) = frame.get("id") else {
            return Reply::fail("Malformed frame", "UNSUBSCRIBE requires id");
        };

        if self.subscriptions.remove(id).is_none() {
            return Reply::fail(
                "Unknown subscription",
                &format!("No subscription with id {}", id),
            );
        }

        match receipt(frame) {
            Some(receipt) => Reply::send(receipt),
            None => Reply::none(),
        }
    }

    /// `MESSAGE` frames for a hub event, one per matching subscription.
    ///
    /// Ends the session with an `ERROR` once the access token expired, or when a VIP
    /// event arrives after the user lost VIP access while subscribed to the VIP topic.
    pub async fn messages_for(&mut self, event: &SignalEvent, now: DateTime<Utc>) -> Reply {
        let Some(user_id) = self.user.as_ref().map(|user| user.id) else {
            return Reply::none();
        };
        if self.subscriptions.is_empty() {
            return Reply::none();
        }

        if now.timestamp() >= self.token_expires_at {
            tracing::debug!(user_id, "STOMP session token expired");
            return Reply::fail(
                "Session expired",
                "The access token expired, reconnect with a new one",
            );
        }

        if event.signal.tier == UserTier::Vip {
            if let Err(reply) = self.reload_user(user_id).await {
                return reply;
            }
        }

        let can_view_vip = self.user.as_ref().is_some_and(User::can_view_vip);

        let mut subscriptions: Vec<_> = self.subscriptions.iter().collect();
        subscriptions.sort_by(|a, b| a.0.cmp(b.0));

        let frames = subscriptions
            .into_iter()
            .filter(|(_, topic)| match topic {
                Topic::Signals => true,
                Topic::VipSignals => event.signal.tier == UserTier::Vip,
            })
            .filter_map(|(id, topic)| {
                let dto = SignalEventDto {
                    kind: event.kind,
                    signal: event.signal.clone().into_dto(can_view_vip),
                };

                match serde_json::to_string(&dto) {
                    Ok(body) => Some(
                        Frame::new(Command::Message)
                            .header("subscription", id.as_str())
                            .header("message-id", format!("{}-{}", event.sequence, id))
                            .header("destination", topic.destination())
                            .header("content-type", "application/json")
                            .body(body),
                    ),
                    Err(e) => {
                        tracing::error!("Failed to serialize signal event: {}", e);
                        None
                    }
                }
            })
            .collect();

        Reply {
            frames,
            close: false,
        }
    }

    /// Refreshes the cached user, failing when VIP access is gone but still subscribed.
    async fn reload_user(&mut self, user_id: i32) -> Result<(), Reply> {
        let user = match UserRepository::new(self.db).find_by_id(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                return Err(Reply::fail("Authentication failed", "User no longer exists"));
            }
            Err(e) => {
                tracing::error!(user_id, "Failed to reload STOMP session user: {}", e);
                return Err(Reply::fail("Internal error", "Please reconnect"));
            }
        };

        let lost_vip = !user.can_view_vip()
            && self
                .subscriptions
                .values()
                .any(|topic| *topic == Topic::VipSignals);
        self.user = Some(user);

        if lost_vip {
            tracing::debug!(user_id, "STOMP session lost VIP access");
            return Err(Reply::fail(
                "Access denied",
                "VIP signals require an active VIP subscription",
            ));
        }

        Ok(())
    }
}

/// `RECEIPT` answering a frame's `receipt` header, if it has one.
fn receipt(frame: &Frame) -> Option<Frame> {
    frame
        .get("receipt")
        .map(|id| Frame::new(Command::Receipt).header("receipt-id", id))
}
