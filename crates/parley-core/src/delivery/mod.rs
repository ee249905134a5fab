//! Outbound reply delivery seam for the Messenger channel.
//!
//! The webhook adapter hands generated replies to a `ReplyDelivery`
//! implementation. Graph API signing/sending is out of scope for this
//! service; parley-infra ships a logging implementation and tests use a
//! recording one. Same Dyn/blanket/Box layering as the agent runtime seam.

use std::future::Future;
use std::pin::Pin;

use parley_types::error::DeliveryError;

/// Delivers a generated reply back to a Messenger end-user.
pub trait ReplyDelivery: Send + Sync {
    /// Send `text` to the end-user identified by `psid`.
    fn deliver(
        &self,
        psid: &str,
        text: &str,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

/// Object-safe version of [`ReplyDelivery`] with boxed futures.
pub trait ReplyDeliveryDyn: Send + Sync {
    fn deliver_boxed<'a>(
        &'a self,
        psid: &'a str,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), DeliveryError>> + Send + 'a>>;
}

impl<T: ReplyDelivery> ReplyDeliveryDyn for T {
    fn deliver_boxed<'a>(
        &'a self,
        psid: &'a str,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), DeliveryError>> + Send + 'a>> {
        Box::pin(self.deliver(psid, text))
    }
}

/// Type-erased reply delivery.
pub struct BoxReplyDelivery {
    inner: Box<dyn ReplyDeliveryDyn + Send + Sync>,
}

impl BoxReplyDelivery {
    pub fn new<T: ReplyDelivery + 'static>(delivery: T) -> Self {
        Self {
            inner: Box::new(delivery),
        }
    }
}

impl ReplyDelivery for BoxReplyDelivery {
    async fn deliver(&self, psid: &str, text: &str) -> Result<(), DeliveryError> {
        self.inner.deliver_boxed(psid, text).await
    }
}
