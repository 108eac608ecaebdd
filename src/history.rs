use time::OffsetDateTime;

/// Monotonic message identifier derived from creation time in milliseconds.
pub type MessageId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    pub created_at: OffsetDateTime,
}

/// Append-only conversation for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    messages: Vec<Message>,
    last_id: MessageId,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> MessageId {
        self.push_at(Role::User, text.into(), OffsetDateTime::now_utc())
    }

    pub fn push_bot(&mut self, text: impl Into<String>) -> MessageId {
        self.push_at(Role::Bot, text.into(), OffsetDateTime::now_utc())
    }

    /// Appends with an explicit timestamp. Ids stay strictly increasing even
    /// when two messages share a millisecond or the clock steps back.
    pub fn push_at(&mut self, role: Role, text: String, created_at: OffsetDateTime) -> MessageId {
        let millis = u64::try_from(created_at.unix_timestamp_nanos() / 1_000_000).unwrap_or(0);
        let id = millis.max(self.last_id.saturating_add(1));
        self.last_id = id;
        self.messages.push(Message {
            id,
            role,
            text,
            created_at,
        });
        id
    }
}
