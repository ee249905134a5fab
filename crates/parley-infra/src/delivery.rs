//! Outbound reply delivery implementations.

use parley_core::delivery::ReplyDelivery;
use parley_types::error::DeliveryError;
use tracing::info;

/// Logs outbound replies instead of calling the Messenger Send API.
///
/// Graph API request signing/sending is outside this service; deployments
/// that own a page access token plug a real sender into the same seam.
#[derive(Debug, Default)]
pub struct LoggingReplyDelivery;

impl LoggingReplyDelivery {
    pub fn new() -> Self {
        Self
    }
}

impl ReplyDelivery for LoggingReplyDelivery {
    async fn deliver(&self, psid: &str, text: &str) -> Result<(), DeliveryError> {
        info!(psid = %psid, chars = text.len(), "outbound messenger reply ready");
        Ok(())
    }
}
