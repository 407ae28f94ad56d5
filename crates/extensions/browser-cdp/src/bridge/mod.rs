//! The in-page script and the envelope it answers with.

use jobfill_protocols::PageError;
use serde::Deserialize;
use serde_json::Value;

/// Installs `window.__jobfill` once per document.
pub const BRIDGE_SOURCE: &str = include_str!("page_bridge.js");

/// Expression calling one bridge method. Evaluates to `null` when the
/// bridge is not installed in the current document.
pub fn invocation(method: &str, args: &[Value]) -> String {
    format!(
        "(typeof window.__jobfill === 'object' ? window.__jobfill.invoke({}, {}) : null)",
        Value::from(method),
        Value::from(args.to_vec())
    )
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reply {
    Ok(Value),
    Err { kind: String, message: String },
}

impl Reply {
    pub fn into_result(self) -> Result<Value, PageError> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Err { kind, message } => Err(match kind.as_str() {
                "stale" => PageError::StaleHandle(message),
                "gone" => PageError::Gone(message),
                _ => PageError::Script(message),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invocation_quotes_arguments() {
        let expr = invocation("setValue", &[json!("jf-a-1"), json!("O'Brien \"Jr\"")]);
        assert!(expr.contains(r#"invoke("setValue", ["jf-a-1","O'Brien \"Jr\""])"#));
        assert!(expr.ends_with(": null)"));
    }

    #[test]
    fn test_ok_reply() {
        let reply: Reply = serde_json::from_value(json!({"ok": [1, 2]})).unwrap();
        assert_eq!(reply.into_result().unwrap(), json!([1, 2]));

        let unit: Reply = serde_json::from_value(json!({"ok": null})).unwrap();
        assert_eq!(unit.into_result().unwrap(), Value::Null);
    }

    #[test]
    fn test_error_kinds() {
        let stale: Reply = serde_json::from_value(json!({"err": {"kind": "stale", "message": "jf-a-3"}})).unwrap();
        assert_eq!(stale.into_result(), Err(PageError::StaleHandle("jf-a-3".to_string())));

        let gone: Reply = serde_json::from_value(json!({"err": {"kind": "gone", "message": "old"}})).unwrap();
        assert!(gone.into_result().unwrap_err().is_gone());

        let other: Reply = serde_json::from_value(json!({"err": {"kind": "script", "message": "boom"}})).unwrap();
        assert_eq!(other.into_result(), Err(PageError::Script("boom".to_string())));
    }

    #[test]
    fn test_bridge_source_guards_reinstall() {
        assert!(BRIDGE_SOURCE.contains("if (window.__jobfill) return;"));
        for method in ["hasFormSignal", "controls", "listboxProbe", "attachFile"] {
            assert!(BRIDGE_SOURCE.contains(method), "{method}");
        }
    }
}
