//! State formatting utilities for client display.

use serde_json::Value;

const RULE: &str = "============================================================\n";

/// State formatter for client display
pub struct StateFormatter;

impl StateFormatter {
    /// Format the state as a room/light listing.
    ///
    /// Anything that is not a room map is shown as raw JSON.
    ///
    /// # Arguments
    ///
    /// * `title` - Heading line (e.g. "Initial state", "Room update")
    /// * `state` - The shared state as received
    pub fn format_state(title: &str, state: &Value) -> String {
        let mut output = String::new();
        output.push_str("\n\n");
        output.push_str(RULE);
        output.push_str(&format!("{}:\n", title));

        match state.as_object() {
            Some(rooms) if rooms.is_empty() => output.push_str("(No rooms)\n"),
            Some(rooms) => {
                for (room, lights) in rooms {
                    output.push_str(&format!("  {}\n", room));
                    match lights.as_object() {
                        Some(lights) => {
                            for (light, value) in lights {
                                output.push_str(&format!(
                                    "    {:<10} {}\n",
                                    light,
                                    Self::format_switch(value)
                                ));
                            }
                        }
                        None => output.push_str(&format!("    {}\n", lights)),
                    }
                }
            }
            None => output.push_str(&format!("  {}\n", state)),
        }

        output.push_str(RULE);
        output
    }

    fn format_switch(value: &Value) -> String {
        match value {
            Value::Bool(true) => "on".to_string(),
            Value::Bool(false) => "off".to_string(),
            other => other.to_string(),
        }
    }

    /// Format a raw text frame that could not be parsed
    pub fn format_raw_message(text: &str) -> String {
        format!("\n[raw] {}\n", text)
    }
}
