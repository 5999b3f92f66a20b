//! Read-only view of the message the user is looking at.

/// Supplies the current message and user. Calls are synchronous and
/// must not change anything.
pub trait MailboxContext: Send + Sync {
    /// Whether a mail item is open at all.
    fn has_item(&self) -> bool;

    /// Identifier of the open message, if the host has one.
    fn message_id(&self) -> Option<String>;

    /// The signed-in user's email address.
    fn user_email(&self) -> Option<String>;
}

/// A mailbox context with fixed values.
#[derive(Debug, Clone, Default)]
pub struct StaticMailbox {
    pub message_id: Option<String>,
    pub user_email: Option<String>,
    pub has_item: bool,
}

impl StaticMailbox {
    pub fn new(message_id: Option<String>, user_email: Option<String>) -> Self {
        Self {
            has_item: message_id.is_some(),
            message_id,
            user_email,
        }
    }

    /// A context with no open item, only a user.
    pub fn without_item(user_email: Option<String>) -> Self {
        Self {
            message_id: None,
            user_email,
            has_item: false,
        }
    }
}

impl MailboxContext for StaticMailbox {
    fn has_item(&self) -> bool {
        self.has_item
    }

    fn message_id(&self) -> Option<String> {
        self.message_id.clone().filter(|id| !id.is_empty())
    }

    fn user_email(&self) -> Option<String> {
        self.user_email.clone().filter(|email| !email.is_empty())
    }
}
