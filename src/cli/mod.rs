pub mod app;
pub mod commands;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod info;
pub mod inputs;
pub mod inspect;
pub mod library;
pub mod output;
pub mod replay;
pub mod runtime;
pub mod show;
pub mod validate;
