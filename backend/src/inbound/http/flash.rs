//! Flash state riding the cookie session across redirects.
//!
//! The purchase workflow answers every POST with a redirect; validation
//! messages and softened notices survive the round-trip here. Values are
//! consumed on first read so a refresh never replays stale messages. The
//! wrapper keeps handlers free of framework-specific session calls, in the
//! same way a session context wrapper would for authentication.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::Error;
use crate::domain::signup::FieldMessage;

pub(crate) const FIELD_ERRORS_KEY: &str = "signup_field_errors";
pub(crate) const FORM_ERROR_KEY: &str = "signup_form_error";
pub(crate) const NOTICE_KEY: &str = "signup_notice";

/// Newtype wrapper exposing flash operations over the Actix session.
#[derive(Clone)]
pub struct FlashSession(Session);

impl FlashSession {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    fn insert<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<(), Error> {
        self.0
            .insert(key, value)
            .map_err(|err| Error::internal(format!("failed to persist flash state: {err}")))
    }

    fn take<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        let value = self
            .0
            .get::<T>(key)
            .map_err(|err| Error::internal(format!("failed to read flash state: {err}")))?;
        if value.is_some() {
            self.0.remove(key);
        }
        Ok(value)
    }

    /// Stash per-field validation messages for the form to re-display.
    pub fn push_field_errors(&self, messages: &[FieldMessage]) -> Result<(), Error> {
        self.insert(FIELD_ERRORS_KEY, &messages)
    }

    /// Stash a single form-level message (duplicate email, purchase failed).
    pub fn push_form_error(&self, message: &str) -> Result<(), Error> {
        self.insert(FORM_ERROR_KEY, &message)
    }

    /// Stash a softened notice shown on the success page.
    pub fn push_notice(&self, notice: &str) -> Result<(), Error> {
        self.insert(NOTICE_KEY, &notice)
    }

    /// Consume any stashed field messages.
    pub fn take_field_errors(&self) -> Result<Vec<FieldMessage>, Error> {
        Ok(self.take(FIELD_ERRORS_KEY)?.unwrap_or_default())
    }

    /// Consume the stashed form-level message, if any.
    pub fn take_form_error(&self) -> Result<Option<String>, Error> {
        self.take(FORM_ERROR_KEY)
    }

    /// Consume the stashed notice, if any.
    pub fn take_notice(&self) -> Result<Option<String>, Error> {
        self.take(NOTICE_KEY)
    }
}

impl FromRequest for FlashSession {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(FlashSession::new) })
    }
}
