use serde_json::Value;

/// Normalized result of one gateway call.
///
/// Either the gateway answered with a JSON body (whatever the HTTP status) or
/// the exchange failed below the application layer. Never both.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope {
    Received { http_status: u16, body: Value },
    TransportFailure { description: String },
}

impl ResponseEnvelope {
    pub fn received(http_status: u16, body: Value) -> Self {
        Self::Received { http_status, body }
    }

    pub fn transport_failure(description: impl Into<String>) -> Self {
        Self::TransportFailure {
            description: description.into(),
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Received { body, .. } => Some(body),
            Self::TransportFailure { .. } => None,
        }
    }
}

/// Reads a body field as text.
///
/// The gateway is loose about JSON types, so numbers are accepted as well as
/// strings. Empty strings count as absent.
pub fn text_field(body: &Value, name: &str) -> Option<String> {
    match body.get(name)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_field_accepts_strings_and_numbers() {
        let body = json!({"code": 202, "id": "T1", "reference": "", "message": null});
        assert_eq!(text_field(&body, "code").as_deref(), Some("202"));
        assert_eq!(text_field(&body, "id").as_deref(), Some("T1"));
        assert_eq!(text_field(&body, "reference"), None);
        assert_eq!(text_field(&body, "message"), None);
        assert_eq!(text_field(&body, "missing"), None);
    }

    #[test]
    fn test_transport_failure_has_no_body() {
        let envelope = ResponseEnvelope::transport_failure("connection reset");
        assert!(envelope.body().is_none());
    }
}
