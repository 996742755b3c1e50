use crate::message::TopicMessage;

/// The per-message outcome of a post.
///
/// A post always yields exactly one result per input message, in input
/// order, regardless of how many topics or providers the request spans.
#[derive(Clone, Debug)]
pub struct TopicPostResult {
    /// The message this result belongs to.
    pub message: TopicMessage,

    /// Whether posting this message failed.
    pub had_error: bool,

    /// A human-readable description of the failure, if any.
    pub error_message: Option<String>,
}

impl TopicPostResult {
    /// Creates a successful result for the given message.
    #[must_use]
    pub const fn success(message: TopicMessage) -> Self {
        Self {
            message,
            had_error: false,
            error_message: None,
        }
    }

    /// Creates a failed result for the given message.
    pub fn failure(message: TopicMessage, error_message: impl Into<String>) -> Self {
        Self {
            message,
            had_error: true,
            error_message: Some(error_message.into()),
        }
    }
}
