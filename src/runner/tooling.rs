//! Tool dispatch for function calls emitted by the model.

use serde_json::{json, Value};

use crate::agent::Agent;
use crate::session::SessionState;
use crate::tools::{ToolArguments, ToolContext};
use crate::types::{FunctionCall, FunctionResponse, Part};

/// Execute each call in order, producing one function-response part per call.
///
/// Tool failures become `{"error": ...}` responses so the model can react.
pub(crate) async fn execute_calls(
    agent: &Agent,
    calls: &[FunctionCall],
    invocation_id: &str,
    state: &SessionState,
) -> Vec<Part> {
    let mut parts = Vec::with_capacity(calls.len());
    for call in calls {
        let response = match agent.tool(&call.name) {
            Some(tool) => {
                let args = ToolArguments::new(call.args.clone());
                let ctx = ToolContext {
                    invocation_id: invocation_id.to_string(),
                    function_call_id: call.id.clone(),
                    state: state.clone(),
                };
                match tool.execute(&args, &ctx).await {
                    Ok(value) => {
                        tracing::debug!(tool = %call.name, invocation_id, "tool call succeeded");
                        wrap_result(value)
                    }
                    Err(e) => {
                        tracing::warn!(
                            tool = %call.name,
                            invocation_id,
                            error = %e,
                            "tool call failed"
                        );
                        json!({ "error": e.to_string() })
                    }
                }
            }
            None => {
                tracing::warn!(tool = %call.name, invocation_id, "model called unknown tool");
                json!({ "error": format!("Tool '{}' not found", call.name) })
            }
        };
        parts.push(Part::function_response(FunctionResponse {
            id: call.id.clone(),
            name: call.name.clone(),
            response,
        }));
    }
    parts
}

/// The provider expects an object; scalars and arrays go under `result`.
fn wrap_result(value: Value) -> Value {
    match value {
        Value::Object(_) => value,
        other => json!({ "result": other }),
    }
}
