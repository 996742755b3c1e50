use serde::{Deserialize, Serialize};

/// A message addressed to a named topic.
///
/// Messages are immutable values; a post request is an ordered list of
/// them and results are matched back to inputs by position, so two
/// textually identical messages in one request remain distinct.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TopicMessage {
    /// The globally unique name of the topic this message is posted to.
    pub topic_name: String,

    /// The message body as text.
    pub payload: String,
}

impl TopicMessage {
    /// Creates a new `TopicMessage`.
    pub fn new(topic_name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            topic_name: topic_name.into(),
            payload: payload.into(),
        }
    }
}
