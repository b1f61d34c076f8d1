use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRunRequest {
    pub agent_id: String,
    pub input: AgentRunInput,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRunInput {
    #[serde(rename = "Customer")]
    pub customer: String,
    #[serde(rename = "Timeframe")]
    pub timeframe: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentRunResponse {
    #[serde(default)]
    pub messages: Vec<AgentMessage>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMessage {
    pub role: Option<String>,
    pub content: AgentContent,
}

/// The agent replies either with a structured narrative or with
/// freeform text; the wire carries no discriminator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgentContent {
    Structured(StructuredNarrative),
    Text(String),
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuredNarrative {
    pub sections: Option<Vec<NarrativeSection>>,
    pub tag_cloud: Option<Vec<TagWeight>>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeSection {
    pub heading: Option<String>,
    pub body: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagWeight {
    pub tag: String,
    pub weight: Option<f64>,
}

impl AgentRunResponse {
    /// The narrative message is the one carrying the agent's own
    /// identity as its role, i.e. anything that is not the echoed
    /// user turn.
    pub fn narrative(&self) -> Option<&AgentMessage> {
        self.messages
            .iter()
            .rev()
            .find(|message| message.role.as_deref() != Some("user"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_uses_capitalized_input_keys() {
        let request = AgentRunRequest {
            agent_id: "feedback-narrator".to_string(),
            input: AgentRunInput {
                customer: "Acme".to_string(),
                timeframe: Some("30d".to_string()),
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["agent_id"], "feedback-narrator");
        assert_eq!(json["input"]["Customer"], "Acme");
        assert_eq!(json["input"]["Timeframe"], "30d");
    }

    #[test]
    fn structured_content_parses_untagged() {
        let payload = r#"{
            "messages": [
                {"role": "user", "content": "summarize Acme"},
                {"role": "feedback-narrator", "content": {
                    "sections": [{"heading": "Overview", "body": "Mostly positive."}],
                    "tag_cloud": [{"tag": "latency", "weight": 0.7}]
                }}
            ]
        }"#;

        let response: AgentRunResponse = serde_json::from_str(payload).unwrap();
        let narrative = response.narrative().unwrap();
        assert_eq!(narrative.role.as_deref(), Some("feedback-narrator"));
        match &narrative.content {
            AgentContent::Structured(body) => {
                let sections = body.sections.as_ref().unwrap();
                assert_eq!(sections[0].heading.as_deref(), Some("Overview"));
                assert_eq!(body.tag_cloud.as_ref().unwrap()[0].tag, "latency");
            }
            AgentContent::Text(_) => panic!("expected structured content"),
        }
    }

    #[test]
    fn freeform_content_parses_as_text() {
        let payload = r#"{"messages": [{"role": "feedback-narrator", "content": "All quiet this week."}]}"#;
        let response: AgentRunResponse = serde_json::from_str(payload).unwrap();
        match &response.narrative().unwrap().content {
            AgentContent::Text(text) => assert_eq!(text, "All quiet this week."),
            AgentContent::Structured(_) => panic!("expected text content"),
        }
    }
}
