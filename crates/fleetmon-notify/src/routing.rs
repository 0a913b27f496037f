use crate::MessageChannel;
use std::collections::HashMap;

/// Recipients for one bot identity: private (direct) user ids and group ids.
#[derive(Debug, Clone, Default)]
pub struct SendRoute {
    pub bot_id: String,
    pub private: Vec<i64>,
    pub group: Vec<i64>,
}

/// Fans one report out to every recipient of every route.
///
/// Routes referencing an unregistered bot are skipped with a log line;
/// per-recipient delivery failures are logged and do not stop the fan-out.
#[derive(Default)]
pub struct Dispatcher {
    channels: HashMap<String, Box<dyn MessageChannel>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, bot_id: impl Into<String>, channel: Box<dyn MessageChannel>) {
        self.channels.insert(bot_id.into(), channel);
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Delivers `text` along every route. Returns the number of successful
    /// sends.
    pub async fn dispatch(&self, routes: &[SendRoute], text: &str) -> usize {
        let mut delivered = 0;
        for route in routes {
            let Some(channel) = self.channels.get(&route.bot_id) else {
                tracing::error!(bot_id = %route.bot_id, "Bot not configured, skipping route");
                continue;
            };

            for user_id in &route.private {
                match channel.send_private(*user_id, text).await {
                    Ok(()) => delivered += 1,
                    Err(e) => {
                        tracing::warn!(
                            bot_id = %route.bot_id,
                            user_id,
                            error = %e,
                            "Private message delivery failed"
                        );
                    }
                }
            }
            for group_id in &route.group {
                match channel.send_group(*group_id, text).await {
                    Ok(()) => delivered += 1,
                    Err(e) => {
                        tracing::warn!(
                            bot_id = %route.bot_id,
                            group_id,
                            error = %e,
                            "Group message delivery failed"
                        );
                    }
                }
            }
        }
        delivered
    }
}
