//! Search job API wire models
//!
//! Response envelopes that only exist on the wire. Job state itself decodes
//! straight into [`crate::domain::JobHandle`].

use crate::domain::{MessagePage, MessageRecord};
use serde::{Deserialize, Serialize};

/// Body of `GET <endpoint>/<id>/messages`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub messages: Vec<MessageEnvelope>,
}

impl MessagesResponse {
    /// Unwraps the envelopes into a page of records, preserving order
    pub fn into_page(self) -> MessagePage {
        self.messages.into_iter().map(|m| m.map).collect()
    }
}

/// One entry of the `messages` array
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub map: MessageRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_response_into_page_keeps_order() {
        let body = r#"{
            "fields": [{"name": "_raw"}],
            "messages": [
                {"map": {"_messagetime": "1", "_sourcehost": "a", "_source": "s", "_raw": "first"}},
                {"map": {"_messagetime": "2", "_sourcehost": "b", "_source": "s", "_raw": "second"}}
            ]
        }"#;

        let page = serde_json::from_str::<MessagesResponse>(body)
            .unwrap()
            .into_page();

        assert_eq!(page.len(), 2);
        assert_eq!(page[0].raw, "first");
        assert_eq!(page[1].source_host, "b");
    }

    #[test]
    fn test_messages_response_without_messages_is_empty() {
        let page = serde_json::from_str::<MessagesResponse>("{}")
            .unwrap()
            .into_page();
        assert!(page.is_empty());
    }
}
