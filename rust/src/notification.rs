//! Delivery capability for schedule-affecting events.
//!
//! The engine never notifies anyone; `Project` forwards plain text messages
//! to whichever `Notifier` the host installs.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::project::Member;

/// Something that can hand a message to a team member.
pub trait Notifier: Send + Sync {
    fn deliver(&self, message: &str, recipient: &Member);
}

/// Built-in delivery channels. Delivery writes the notice to stderr.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Email,
    Sms,
    Push,
}

impl Channel {
    pub fn label(self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "SMS",
            Channel::Push => "push notification",
        }
    }

    pub fn render(self, message: &str, recipient: &Member) -> String {
        format!(
            "Notification sent to {} by {}: {}",
            recipient.name,
            self.label(),
            message
        )
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Notifier for Channel {
    fn deliver(&self, message: &str, recipient: &Member) {
        eprintln!("{}", self.render(message, recipient));
    }
}

/// A delivered message as recorded by `Outbox`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub channel: String,
    pub recipient: String,
    pub message: String,
}

/// In-memory notifier. Clones share the same mailbox.
#[derive(Clone, Debug)]
pub struct Outbox {
    channel: Channel,
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl Outbox {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            notices: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Snapshot of everything delivered so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.notices().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for Outbox {
    fn deliver(&self, message: &str, recipient: &Member) {
        let notice = Notice {
            channel: self.channel.label().to_string(),
            recipient: recipient.name.clone(),
            message: message.to_string(),
        };
        let mut notices = self
            .notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        notices.push(notice);
    }
}
