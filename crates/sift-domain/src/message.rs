//! Message module - the conversational turns shared with a generator

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Standing instructions for the generator
    System,
    /// Content supplied by the caller or synthesized by the controller
    User,
    /// Content produced by a generator
    Assistant,
}

impl Role {
    /// Wire name used by chat-style backends
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single conversational turn
///
/// Fields are private so a message cannot change once it sits in a log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    /// Create a message with an explicit role
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a generator-produced message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Role of the message author
    pub fn role(&self) -> Role {
        self.role
    }

    /// Message text
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Ordered, append-only sequence of messages
///
/// There is deliberately no way to remove, replace or reorder entries.
///
/// # Examples
///
/// ```
/// use sift_domain::{Message, MessageLog, Role};
///
/// let mut log = MessageLog::new();
/// log.push(Message::system("You extract records."));
/// log.push(Message::user("TEXT: ..."));
///
/// assert_eq!(log.len(), 2);
/// assert_eq!(log.last().map(|m| m.role()), Some(Role::User));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the end of the log
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Number of messages in the log
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the log has no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Most recently appended message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Message at a position
    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    /// Iterate over messages in order
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Borrow the messages as a slice
    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    /// Copy of the first `len` messages as a new log
    pub fn prefix(&self, len: usize) -> MessageLog {
        let end = len.min(self.messages.len());
        MessageLog {
            messages: self.messages[..end].to_vec(),
        }
    }
}

impl<'a> IntoIterator for &'a MessageLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl FromIterator<Message> for MessageLog {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        assert_eq!(Message::system("a").role(), Role::System);
        assert_eq!(Message::user("b").role(), Role::User);
        assert_eq!(Message::assistant("c").role(), Role::Assistant);
        assert_eq!(Message::user("hello").content(), "hello");
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(Role::System.to_string(), "system");
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&Message::assistant("x")).unwrap();
        assert!(json.contains("\"assistant\""));
    }

    #[test]
    fn test_log_prefix() {
        let log: MessageLog = vec![
            Message::system("s"),
            Message::user("u"),
            Message::assistant("a"),
        ]
        .into_iter()
        .collect();

        let prefix = log.prefix(2);
        assert_eq!(prefix.len(), 2);
        assert_eq!(prefix.get(1), log.get(1));

        // Asking for more than exists is clamped
        assert_eq!(log.prefix(10).len(), 3);
    }

    #[test]
    fn test_empty_log() {
        let log = MessageLog::new();
        assert!(log.is_empty());
        assert!(log.last().is_none());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: pushing never drops or reorders earlier entries
        #[test]
        fn test_log_is_append_only(contents in proptest::collection::vec(".*", 0..20)) {
            let mut log = MessageLog::new();
            let mut previous: Vec<Message> = Vec::new();

            for (i, content) in contents.iter().enumerate() {
                let message = if i % 2 == 0 {
                    Message::user(content.clone())
                } else {
                    Message::assistant(content.clone())
                };
                log.push(message.clone());

                prop_assert_eq!(log.len(), previous.len() + 1);
                prop_assert_eq!(&log.as_slice()[..previous.len()], previous.as_slice());
                previous.push(message);
            }
        }
    }
}
