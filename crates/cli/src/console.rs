//! Console review handler — prompts the reviewer on stdin.

use async_trait::async_trait;
use proto::{ApprovalRequest, ReviewError, ReviewHandler};
use serde_json::{Value, json};
use std::io::Write;

/// Interactive review surface for terminal runs.
///
/// Renders each approval request and reads one decision per request from
/// stdin. Input that does not parse into a decision reprompts instead of
/// failing the run; only a closed stdin surfaces as an error.
pub struct ConsoleReviewHandler;

impl ConsoleReviewHandler {
    fn render(request: &ApprovalRequest) {
        println!("\n=== Approval required ===");
        println!("{}", request.description);
        println!(
            "Action: {}\nArgs: {}",
            request.action_request.action,
            serde_json::to_string_pretty(&request.action_request.args)
                .unwrap_or_else(|_| "<unprintable>".to_string())
        );
        let mut options = Vec::new();
        if request.config.allow_accept {
            options.push("accept");
        }
        if request.config.allow_ignore {
            options.push("ignore");
        }
        options.push("reject");
        if request.config.allow_edit {
            options.push("edit <json args>");
        }
        if request.config.allow_respond {
            options.push("respond <free text>");
        }
        println!("Decisions: {}", options.join(" | "));
    }

    fn read_line() -> Result<String, ReviewError> {
        print!("> ");
        std::io::stdout()
            .flush()
            .map_err(|e| ReviewError::Unavailable(e.to_string()))?;
        let mut line = String::new();
        let read = std::io::stdin()
            .read_line(&mut line)
            .map_err(|e| ReviewError::Unavailable(e.to_string()))?;
        if read == 0 {
            return Err(ReviewError::Unavailable("stdin closed".to_string()));
        }
        Ok(line)
    }
}

/// Parses one console line into the wire decision document.
///
/// `edit` takes a JSON object of replacement arguments and nests it under
/// `args.args` on the wire; `respond` takes free text as flat `args`.
pub fn decision_from_input(line: &str) -> Result<Value, ReviewError> {
    let trimmed = line.trim();
    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (trimmed, ""),
    };

    match command {
        "accept" => Ok(json!({"type": "accept"})),
        "ignore" => Ok(json!({"type": "ignore"})),
        "reject" => Ok(json!({"type": "reject"})),
        "edit" => {
            let args: Value = serde_json::from_str(rest)
                .map_err(|e| ReviewError::InvalidDecision(format!("edit args: {e}")))?;
            if !args.is_object() {
                return Err(ReviewError::InvalidDecision(
                    "edit args must be a JSON object".to_string(),
                ));
            }
            Ok(json!({"type": "edit", "args": {"args": args}}))
        }
        "respond" => {
            if rest.is_empty() {
                return Err(ReviewError::InvalidDecision(
                    "respond needs feedback text".to_string(),
                ));
            }
            Ok(json!({"type": "response", "args": rest}))
        }
        other => Err(ReviewError::InvalidDecision(format!(
            "unknown decision '{other}'"
        ))),
    }
}

#[async_trait]
impl ReviewHandler for ConsoleReviewHandler {
    async fn request_review(&self, requests: Vec<ApprovalRequest>) -> Result<Value, ReviewError> {
        // The middleware raises one request per suspension; render whatever
        // arrives and answer for the batch.
        for request in &requests {
            Self::render(request);
        }

        tokio::task::spawn_blocking(|| {
            loop {
                let line = Self::read_line()?;
                match decision_from_input(&line) {
                    Ok(decision) => return Ok(decision),
                    Err(err) => {
                        eprintln!("{err} — try again");
                    }
                }
            }
        })
        .await
        .map_err(|e| ReviewError::Unavailable(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_decisions_map_to_wire_kinds() {
        assert_eq!(
            decision_from_input("accept").expect("accept")["type"],
            "accept"
        );
        assert_eq!(
            decision_from_input("  ignore  ").expect("ignore")["type"],
            "ignore"
        );
        assert_eq!(
            decision_from_input("reject").expect("reject")["type"],
            "reject"
        );
    }

    #[test]
    fn edit_nests_replacement_args() {
        let decision =
            decision_from_input(r#"edit {"duration_minutes": 45}"#).expect("edit");
        assert_eq!(decision["type"], "edit");
        assert_eq!(decision["args"]["args"]["duration_minutes"], 45);
    }

    #[test]
    fn edit_rejects_non_object_args() {
        assert!(decision_from_input("edit 42").is_err());
        assert!(decision_from_input("edit not-json").is_err());
    }

    #[test]
    fn respond_carries_flat_free_text() {
        let decision = decision_from_input("respond Next Tuesday works").expect("respond");
        assert_eq!(decision["type"], "response");
        assert_eq!(decision["args"], "Next Tuesday works");
    }

    #[test]
    fn respond_without_text_is_invalid() {
        assert!(decision_from_input("respond").is_err());
    }

    #[test]
    fn unknown_command_is_invalid() {
        let err = decision_from_input("defer").expect_err("unknown");
        assert!(err.to_string().contains("defer"));
    }
}
