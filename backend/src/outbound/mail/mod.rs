//! Notification gateway adapters: mail relay transport and local capture.

mod file_capture;
mod http_mailer;
pub mod message;

pub use file_capture::FileCaptureNotifier;
pub use http_mailer::{HttpMailer, MailerIdentity};
