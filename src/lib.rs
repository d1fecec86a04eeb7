pub mod chat_watch;
pub mod common;
pub mod controller;
pub mod danmaku;
pub mod gui;
pub mod i18n;
pub mod logging;
pub mod relay;
pub mod settings;
pub mod settings_sync;
