//! Internal utilities shared by the CLI mode handlers.

mod app_pod;

pub use self::app_pod::find_app_pod;
