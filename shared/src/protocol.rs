use crate::date::Timestamp;
use crate::{EmployeeId, ModuleAccessMap, SessionUser};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A trait that defines the request-response relationship and metadata for an
/// API endpoint. Paths are computed per request because some endpoints embed
/// an identifier (e.g. the employee id).
pub trait ApiRequest: Serialize + DeserializeOwned {
    /// The response type returned by this request.
    type Response: Serialize + DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path (or suffix).
    fn path(&self) -> String;
}

// =========================================================
// Request Definitions
// =========================================================

/// Authenticate with email + password
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: SessionUser,
    pub token: String,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/auth/login".to_string()
    }
}

/// Fetch the per-module access snapshot for one employee
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleAccessRequest {
    pub employee_id: EmployeeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleAccessResponse {
    pub employee_id: EmployeeId,
    pub modules: ModuleAccessMap,
}

impl ApiRequest for ModuleAccessRequest {
    type Response = ModuleAccessResponse;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/employees/{}/module-access", self.employee_id)
    }
}

// =========================================================
// Socket Protocol
// =========================================================

/// Payload of the `automation-triggered` socket event.
///
/// Pushed by the server whenever a CRM automation rule fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationEvent {
    pub rule_id: String,
    pub rule_name: String,
    pub trigger_event: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opportunity_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_name: Option<String>,
    pub timestamp: Timestamp,
}

/// Envelope carried over the socket channel.
///
/// A plain struct rather than a tagged enum: the embedded JSON codec has no
/// `deserialize_any`, and only one named event exists today. The bridge checks
/// `event` against [`crate::EVENT_AUTOMATION_TRIGGERED`] and drops the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocketEnvelope {
    pub event: String,
    pub payload: AutomationEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_paths_embed_employee_id() {
        let req = ModuleAccessRequest {
            employee_id: EmployeeId::new("emp-7").unwrap(),
        };
        assert_eq!(req.path(), "/api/employees/emp-7/module-access");
    }

    #[test]
    fn envelope_round_trips() {
        let msg = SocketEnvelope {
            event: crate::EVENT_AUTOMATION_TRIGGERED.to_string(),
            payload: AutomationEvent {
                rule_id: "r1".into(),
                rule_name: "Relance".into(),
                trigger_event: "opportunity_stalled".into(),
                success: true,
                opportunity_name: None,
                pipeline_name: None,
                stage_name: None,
                timestamp: Timestamp::new(0),
            },
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(&format!("\"{}\"", crate::EVENT_AUTOMATION_TRIGGERED)));
        let back: SocketEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn event_optional_fields_default_to_none() {
        let raw = r#"{
            "rule_id": "r2",
            "rule_name": "Welcome Email",
            "trigger_event": "contact_created",
            "success": false,
            "timestamp": 1700000000000
        }"#;
        let ev: AutomationEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(ev.opportunity_name, None);
        assert_eq!(ev.pipeline_name, None);
        assert!(!ev.success);
    }
}
