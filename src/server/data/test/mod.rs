mod plan;
mod refresh_token;
mod sale;
mod signal;
mod subscription;
mod user;
mod user_token;
mod webhook_event;
