pub use super::plan::Entity as Plan;
pub use super::refresh_token::Entity as RefreshToken;
pub use super::sale::Entity as Sale;
pub use super::signal::Entity as Signal;
pub use super::subscription::Entity as Subscription;
pub use super::user::Entity as User;
pub use super::user_token::Entity as UserToken;
pub use super::webhook_event::Entity as WebhookEvent;
