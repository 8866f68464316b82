//! Voice-transcript parsing into structured task intents.

use chrono::NaiveDate;
use db::models::task::TaskPriority;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tracing::warn;
use ts_rs::TS;

use super::generative_api::GenerativeApiClient;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VoiceAction {
    CreateTask,
    CompleteTask,
    DeleteTask,
    ListTasks,
    #[default]
    Unknown,
}

/// Structured intent extracted from a spoken command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
pub struct VoiceIntent {
    pub action: VoiceAction,
    pub title: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
}

impl VoiceIntent {
    pub fn unknown() -> Self {
        Self {
            action: VoiceAction::Unknown,
            title: None,
            priority: None,
            due_date: None,
        }
    }
}

/// Wire shape the model is asked to produce. Kept loose so a slightly
/// malformed reply still degrades field by field instead of failing whole.
#[derive(Debug, Deserialize)]
struct RawIntent {
    action: Option<String>,
    title: Option<String>,
    priority: Option<i64>,
    due_date: Option<String>,
}

pub struct VoiceCommandService {
    client: GenerativeApiClient,
}

impl VoiceCommandService {
    pub fn new(client: GenerativeApiClient) -> Self {
        Self { client }
    }

    /// Turn a free-text transcript into a task intent.
    ///
    /// Any failure — network, missing reply, unparseable JSON — yields the
    /// unknown intent rather than an error.
    pub async fn parse_transcript(&self, transcript: &str) -> VoiceIntent {
        let prompt = build_parse_prompt(transcript);
        let response = match self.client.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "voice command parsing failed");
                return VoiceIntent::unknown();
            }
        };
        intent_from_response(&response)
    }
}

fn build_parse_prompt(transcript: &str) -> String {
    format!(
        r#"Extract the intended task action from this voice transcript.

Transcript: "{transcript}"

Respond with ONLY a JSON object of this shape:
{{
  "action": "create_task|complete_task|delete_task|list_tasks|unknown",
  "title": "task title if one was spoken, else null",
  "priority": 1-4 or null (1=low, 2=medium, 3=high, 4=urgent),
  "due_date": "YYYY-MM-DD or null"
}}"#
    )
}

/// Parse the first JSON object found in the model's reply.
pub(crate) fn intent_from_response(response: &str) -> VoiceIntent {
    let Some(json) = extract_first_json(response) else {
        return VoiceIntent::unknown();
    };
    let Ok(raw) = serde_json::from_str::<RawIntent>(json) else {
        return VoiceIntent::unknown();
    };

    let action = raw
        .action
        .as_deref()
        .and_then(|a| a.parse::<VoiceAction>().ok())
        .unwrap_or(VoiceAction::Unknown);
    if action == VoiceAction::Unknown {
        return VoiceIntent::unknown();
    }

    VoiceIntent {
        action,
        title: raw.title.filter(|t| !t.trim().is_empty()),
        priority: raw.priority.and_then(TaskPriority::from_level),
        due_date: raw
            .due_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
    }
}

/// First balanced `{...}` substring, skipping braces inside string literals.
fn extract_first_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in text.bytes().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plain_json() {
        let input = r#"{"action": "create_task"}"#;
        assert_eq!(extract_first_json(input), Some(input));
    }

    #[test]
    fn extracts_json_embedded_in_prose() {
        let input = r#"Sure! Here is the intent:
```json
{"action": "create_task", "title": "buy milk"}
```
Let me know if you need anything else."#;
        assert_eq!(
            extract_first_json(input),
            Some(r#"{"action": "create_task", "title": "buy milk"}"#)
        );
    }

    #[test]
    fn extraction_handles_nested_objects_and_braces_in_strings() {
        let input = r#"noise {"a": {"b": "}"}, "c": 1} trailing"#;
        assert_eq!(extract_first_json(input), Some(r#"{"a": {"b": "}"}, "c": 1}"#));
    }

    #[test]
    fn no_json_yields_none() {
        assert_eq!(extract_first_json("no braces here"), None);
        assert_eq!(extract_first_json("{unclosed"), None);
    }

    #[test]
    fn full_intent_parses() {
        let intent = intent_from_response(
            r#"{"action": "create_task", "title": "call dentist", "priority": 3, "due_date": "2024-07-01"}"#,
        );
        assert_eq!(intent.action, VoiceAction::CreateTask);
        assert_eq!(intent.title.as_deref(), Some("call dentist"));
        assert_eq!(intent.priority, Some(TaskPriority::High));
        assert_eq!(
            intent.due_date,
            Some(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())
        );
    }

    #[test]
    fn out_of_range_priority_and_bad_date_are_dropped() {
        let intent = intent_from_response(
            r#"{"action": "complete_task", "title": "gym", "priority": 9, "due_date": "tomorrow"}"#,
        );
        assert_eq!(intent.action, VoiceAction::CompleteTask);
        assert_eq!(intent.title.as_deref(), Some("gym"));
        assert_eq!(intent.priority, None);
        assert_eq!(intent.due_date, None);
    }

    #[test]
    fn unparseable_reply_is_unknown() {
        assert_eq!(intent_from_response("I could not parse that."), VoiceIntent::unknown());
        assert_eq!(intent_from_response("{]"), VoiceIntent::unknown());
    }

    #[test]
    fn unrecognized_action_is_unknown_with_no_fields() {
        let intent =
            intent_from_response(r#"{"action": "sing_a_song", "title": "la la la"}"#);
        assert_eq!(intent, VoiceIntent::unknown());
    }
}
