//! Request payload checks.
//!
//! Bodies are read as plain JSON objects and checked field by field so that a
//! bad payload reports every violation at once instead of the first serde error.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use botdash_store::models::{CommandPatch, NewBotStat, NewCommand, NewLog};
use botdash_types::api::FieldError;

use crate::error::{ApiError, ApiResult};

/// A JSON object request body.
#[derive(Debug)]
pub struct Payload(pub Map<String, Value>);

impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::invalid(format!("Invalid request body: {}", rejection.body_text()))
            })?;

        match value {
            Value::Object(map) => Ok(Payload(map)),
            _ => Err(ApiError::invalid("Request body must be a JSON object")),
        }
    }
}

/// Path ids must be non-negative integers.
pub fn parse_id(raw: &str, message: &str) -> ApiResult<u64> {
    raw.parse::<u64>().map_err(|_| ApiError::invalid(message))
}

pub fn new_command(payload: &Map<String, Value>) -> ApiResult<NewCommand> {
    let mut fields = Fields::new(payload);
    let name = fields.required_text("name");
    let description = fields.required_text("description");
    let usage = fields.required_text("usage");
    let active = fields.optional_bool("active").unwrap_or(true);

    fields.finish("Invalid command data")?;
    Ok(NewCommand {
        name: name.unwrap_or_default(),
        description: description.unwrap_or_default(),
        usage: usage.unwrap_or_default(),
        active,
    })
}

/// Any subset of the command fields; `id` and `createdAt` are ignored.
pub fn command_patch(payload: &Map<String, Value>) -> ApiResult<CommandPatch> {
    let mut fields = Fields::new(payload);
    let patch = CommandPatch {
        name: fields.optional_text("name"),
        description: fields.optional_text("description"),
        usage: fields.optional_text("usage"),
        active: fields.optional_bool("active"),
    };

    fields.finish("Invalid command data")?;
    Ok(patch)
}

pub fn new_log(payload: &Map<String, Value>) -> ApiResult<NewLog> {
    let mut fields = Fields::new(payload);
    let event_type = fields.required_text("eventType");
    let server = fields.required_text("server");
    let user = fields.required_text("user");
    let details = fields.required_string("details");

    fields.finish("Invalid log data")?;
    Ok(NewLog {
        event_type: event_type.unwrap_or_default(),
        server: server.unwrap_or_default(),
        user: user.unwrap_or_default(),
        details: details.unwrap_or_default(),
    })
}

/// Every field is required: statistics are replaced, never merged.
pub fn bot_stat(payload: &Map<String, Value>) -> ApiResult<NewBotStat> {
    let mut fields = Fields::new(payload);
    let uptime = fields.required_text("uptime");
    let servers = fields.required_u64("servers");
    let commands = fields.required_u64("commands");
    let memory_usage = fields.required_text("memoryUsage");
    let api_latency = fields.required_i64("apiLatency");
    let started_at = fields.required_timestamp("startedAt");
    let updated_at = fields.required_timestamp("updatedAt");

    fields.finish("Invalid stats data")?;
    let now = Utc::now();
    Ok(NewBotStat {
        uptime: uptime.unwrap_or_default(),
        servers: servers.unwrap_or_default(),
        commands: commands.unwrap_or_default(),
        memory_usage: memory_usage.unwrap_or_default(),
        api_latency: api_latency.unwrap_or_default(),
        started_at: started_at.unwrap_or(now),
        updated_at: updated_at.unwrap_or(now),
    })
}

/// Collects violations while fields are pulled out of a payload.
struct Fields<'a> {
    payload: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> Fields<'a> {
    fn new(payload: &'a Map<String, Value>) -> Self {
        Self {
            payload,
            errors: Vec::new(),
        }
    }

    fn finish(self, message: &str) -> ApiResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::schema(message, self.errors))
        }
    }

    fn fail(&mut self, field: &str, message: &str) {
        self.errors.push(FieldError::new(field, message));
    }

    fn present(&self, field: &str) -> Option<&'a Value> {
        self.payload.get(field).filter(|v| !v.is_null())
    }

    fn required_string(&mut self, field: &str) -> Option<String> {
        match self.present(field) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.fail(field, "Expected string");
                None
            }
            None => {
                self.fail(field, "Required");
                None
            }
        }
    }

    fn required_text(&mut self, field: &str) -> Option<String> {
        let value = self.required_string(field)?;
        if value.trim().is_empty() {
            self.fail(field, "Must not be empty");
            return None;
        }
        Some(value)
    }

    fn optional_text(&mut self, field: &str) -> Option<String> {
        self.present(field)?;
        self.required_text(field)
    }

    fn optional_bool(&mut self, field: &str) -> Option<bool> {
        match self.present(field)? {
            Value::Bool(b) => Some(*b),
            _ => {
                self.fail(field, "Expected boolean");
                None
            }
        }
    }

    fn required_u64(&mut self, field: &str) -> Option<u64> {
        match self.present(field) {
            Some(v) => {
                let n = v.as_u64();
                if n.is_none() {
                    self.fail(field, "Expected non-negative integer");
                }
                n
            }
            None => {
                self.fail(field, "Required");
                None
            }
        }
    }

    fn required_i64(&mut self, field: &str) -> Option<i64> {
        match self.present(field) {
            Some(v) => {
                let n = v.as_i64();
                if n.is_none() {
                    self.fail(field, "Expected integer");
                }
                n
            }
            None => {
                self.fail(field, "Required");
                None
            }
        }
    }

    fn required_timestamp(&mut self, field: &str) -> Option<DateTime<Utc>> {
        let raw = self.required_string(field)?;
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(_) => {
                self.fail(field, "Expected RFC 3339 timestamp");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    fn field_names(err: ApiError) -> Vec<String> {
        match err {
            ApiError::Validation { errors, .. } => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn command_defaults_to_active() {
        let cmd = new_command(&object(json!({
            "name": "echo", "description": "d", "usage": "/echo"
        })))
        .unwrap();
        assert!(cmd.active);
        assert_eq!(cmd.name, "echo");
    }

    #[test]
    fn command_reports_every_violation() {
        let err = new_command(&object(json!({
            "name": "", "usage": 5, "active": "yes"
        })))
        .unwrap_err();
        assert_eq!(field_names(err), vec!["name", "description", "usage", "active"]);
    }

    #[test]
    fn patch_ignores_absent_and_immutable_fields() {
        let patch = command_patch(&object(json!({
            "active": false, "id": 9, "createdAt": "2020-01-01T00:00:00Z"
        })))
        .unwrap();
        assert_eq!(
            patch,
            CommandPatch {
                active: Some(false),
                ..Default::default()
            }
        );
    }

    #[test]
    fn patch_rejects_blank_name() {
        let err = command_patch(&object(json!({ "name": "  " }))).unwrap_err();
        assert_eq!(field_names(err), vec!["name"]);
    }

    #[test]
    fn log_allows_empty_details() {
        let log = new_log(&object(json!({
            "eventType": "Info", "server": "s", "user": "u", "details": ""
        })))
        .unwrap();
        assert_eq!(log.details, "");
    }

    #[test]
    fn log_requires_all_fields() {
        let err = new_log(&object(json!({ "eventType": "Info" }))).unwrap_err();
        assert_eq!(field_names(err), vec!["server", "user", "details"]);
    }

    #[test]
    fn stats_need_complete_record() {
        let err = bot_stat(&object(json!({ "uptime": "1m", "servers": -1 }))).unwrap_err();
        assert_eq!(
            field_names(err),
            vec!["servers", "commands", "memoryUsage", "apiLatency", "startedAt", "updatedAt"]
        );
    }

    #[test]
    fn stats_parse_timestamps() {
        let stat = bot_stat(&object(json!({
            "uptime": "1m",
            "servers": 2,
            "commands": 4,
            "memoryUsage": "10.00 MB",
            "apiLatency": 33,
            "startedAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:01:00+02:00"
        })))
        .unwrap();
        assert_eq!(stat.started_at.to_rfc3339(), "2024-05-01T10:00:00+00:00");
        assert_eq!(stat.updated_at.to_rfc3339(), "2024-05-01T08:01:00+00:00");
    }

    #[test]
    fn ids_must_be_non_negative_integers() {
        assert_eq!(parse_id("12", "bad").unwrap(), 12);
        assert!(parse_id("abc", "bad").is_err());
        assert!(parse_id("-1", "bad").is_err());
        assert!(parse_id("1.5", "bad").is_err());
    }
}
