//! Built-in date and time tool.

use async_trait::async_trait;
use chrono::{Datelike, Timelike, Utc};
use chrono_tz::America::Los_Angeles;
use serde_json::json;

use super::{Tool, ToolError};

/// Reports the current date and time in the US Pacific timezone.
///
/// Takes no arguments; whatever argument string the model sends is ignored.
#[derive(Debug, Default)]
pub struct DateTimeTool;

impl DateTimeTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for DateTimeTool {
    fn name(&self) -> &'static str {
        "getDateAndTimeTool"
    }

    async fn invoke(&self, _arguments: &str) -> Result<String, ToolError> {
        let now = Utc::now().with_timezone(&Los_Angeles);
        let payload = json!({
            "date": now.format("%Y-%m-%d").to_string(),
            "year": now.year(),
            "month": now.month(),
            "day": now.day(),
            "dayOfWeek": now.format("%A").to_string().to_uppercase(),
            "timezone": "PST",
            "formattedTime": format!("{:02}:{:02}", now.hour(), now.minute()),
        });
        Ok(serde_json::to_string(&payload)?)
    }
}
