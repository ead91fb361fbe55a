pub mod app;
pub mod config;
pub mod conversation;
pub mod dispatcher;
pub mod history;
pub mod message;
pub mod policy;
pub mod session;
pub mod tutor;
