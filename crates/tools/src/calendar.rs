//! Calendar tools: meeting scheduling and availability lookup.

use async_trait::async_trait;
use chrono::NaiveDate;
use proto::{ToolError, ToolResult};
use serde::Deserialize;
use tracing::debug;

use crate::Tool;

#[derive(Debug, Deserialize)]
struct ScheduleMeetingArgs {
    attendees: Vec<String>,
    subject: String,
    duration_minutes: i64,
    /// Preferred calendar date, `YYYY-MM-DD`.
    preferred_day: String,
    /// Start time in 24-hour format, e.g. 1330 for 1:30 PM.
    start_time: i64,
}

/// Tool that schedules a calendar meeting.
pub struct ScheduleMeetingTool;

#[async_trait]
impl Tool for ScheduleMeetingTool {
    fn name(&self) -> &str {
        "schedule_meeting"
    }

    fn description(&self) -> &str {
        "Schedule a calendar meeting with the given attendees, date, start \
         time, and duration. Use when the conversation implies setting up \
         a meeting."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "attendees": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Attendee email addresses or names"
                },
                "subject": {
                    "type": "string",
                    "description": "Title of the meeting"
                },
                "duration_minutes": {
                    "type": "integer",
                    "description": "Length of the meeting in minutes"
                },
                "preferred_day": {
                    "type": "string",
                    "description": "Preferred date, YYYY-MM-DD"
                },
                "start_time": {
                    "type": "integer",
                    "description": "Start time in 24-hour format (e.g. 1330 for 1:30 PM)"
                }
            },
            "required": ["attendees", "subject", "duration_minutes", "preferred_day", "start_time"]
        })
    }

    async fn execute(
        &self,
        call_id: &str,
        args: serde_json::Value,
    ) -> Result<ToolResult, ToolError> {
        let args: ScheduleMeetingArgs =
            serde_json::from_value(args).map_err(|e| ToolError::InvalidArgs(e.to_string()))?;

        let day = NaiveDate::parse_from_str(&args.preferred_day, "%Y-%m-%d").map_err(|e| {
            ToolError::InvalidArgs(format!("preferred_day '{}': {e}", args.preferred_day))
        })?;
        let date_str = day.format("%A, %B %d, %Y").to_string();

        debug!(subject = %args.subject, attendees = args.attendees.len(), "Scheduling meeting");

        Ok(ToolResult::success(
            call_id,
            self.name(),
            format!(
                "Meeting '{}' scheduled on {} at {} for {} minutes with {} attendees",
                args.subject,
                date_str,
                args.start_time,
                args.duration_minutes,
                args.attendees.len()
            ),
        ))
    }
}

#[derive(Debug, Deserialize)]
struct CheckCalendarArgs {
    day: String,
}

/// Tool that reports open meeting slots for a day.
///
/// Never requires approval; the middleware registers it for direct
/// execution.
pub struct CheckCalendarTool;

#[async_trait]
impl Tool for CheckCalendarTool {
    fn name(&self) -> &str {
        "check_calendar_availability"
    }

    fn description(&self) -> &str {
        "Check available meeting time slots for a specified day. The day can \
         be a natural language date (e.g. 'Monday', '2025-01-10', 'next Friday')."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "day": {
                    "type": "string",
                    "description": "The day to check availability for"
                }
            },
            "required": ["day"]
        })
    }

    async fn execute(
        &self,
        call_id: &str,
        args: serde_json::Value,
    ) -> Result<ToolResult, ToolError> {
        let args: CheckCalendarArgs =
            serde_json::from_value(args).map_err(|e| ToolError::InvalidArgs(e.to_string()))?;

        Ok(ToolResult::success(
            call_id,
            self.name(),
            format!("Available times on {}: 9:00 AM, 2:00 PM, 4:00 PM", args.day),
        ))
    }
}
