//! Notification delivery for evaluation cycle reports.
//!
//! A cycle's events are rendered into one summary text
//! ([`report::build_report`]) and fanned out to the configured private and
//! group recipients of each bot identity ([`routing::Dispatcher`]). The only
//! built-in transport is an OneBot-compatible HTTP endpoint
//! ([`channels::onebot::OneBotChannel`]); other transports plug in through
//! [`MessageChannel`].

pub mod channels;
pub mod report;
pub mod routing;


use anyhow::Result;
use async_trait::async_trait;

/// A message transport bound to one bot identity.
///
/// Implementations deliver plain text to a single private or group
/// recipient; retry policy is the implementation's concern.
#[async_trait]
pub trait MessageChannel: Send + Sync {
    /// Delivers `text` to one private (direct) recipient.
    async fn send_private(&self, user_id: i64, text: &str) -> Result<()>;

    /// Delivers `text` to one group.
    async fn send_group(&self, group_id: i64, text: &str) -> Result<()>;

    /// Returns the channel type name (e.g., `"onebot"`).
    fn channel_type(&self) -> &str;
}
