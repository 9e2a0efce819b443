use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use super::{SharedState, Tool};
use crate::error::{RpcError, RpcResult, SessionError};
use crate::render::{render, ReportView};
use crate::resolver;
use crate::session::SelectionSession;

/// Route tool calls to appropriate handlers
pub async fn handle_tool_call(
    state: &SharedState,
    tool_name: &str,
    arguments: Option<Value>,
) -> RpcResult<Value> {
    info!(tool = %tool_name, "Routing tool call");

    match tool_name {
        // Analyze view
        "reports_analyze" => handle_analyze(state, arguments).await,
        // Selection session transitions
        "selection_set_draft" => handle_set_draft(state, arguments).await,
        "selection_add" => handle_add(state, arguments).await,
        "selection_remove" => handle_remove(state, arguments).await,
        "selection_generate" => handle_generate(state, arguments).await,
        "selection_clear" => handle_clear(state, arguments).await,
        // Autocomplete
        "names_suggest" => handle_suggest(state, arguments).await,
        // Browse view
        "reports_browse_list" => handle_browse_list(state, arguments).await,
        "reports_browse_get" => handle_browse_get(state, arguments).await,
        _ => Err(RpcError::UnknownTool {
            tool_name: tool_name.to_string(),
        }),
    }
}

// ============================================================================
// Result shapes
// ============================================================================

/// Snapshot of a selection session returned by every session tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    /// Session identifier to pass back on subsequent calls.
    pub session_id: String,
    /// Pending names, in insertion order.
    pub pending_names: Vec<String>,
    /// Current free-text draft.
    pub draft_text: String,
    /// Names frozen at the last generate.
    pub generated_batch: Vec<String>,
}

impl From<&SelectionSession> for SessionView {
    fn from(session: &SelectionSession) -> Self {
        Self {
            session_id: session.id.clone(),
            pending_names: session.pending_names.clone(),
            draft_text: session.draft_text.clone(),
            generated_batch: session.generated_batch.clone(),
        }
    }
}

/// Per-name outcome of a batch generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    /// The requested name, as the user entered it.
    pub name: String,
    /// The rendered report, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportView>,
    /// A user-visible "not found" message otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result of a generate or analyze call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResult {
    /// "ok", "nothing_selected", or "empty_input".
    pub status: String,
    /// Session snapshot after the call.
    pub session: SessionView,
    /// One entry per requested name, in request order.
    pub reports: Vec<BatchEntry>,
    /// User-visible prompt for the recoverable empty states.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Source-degradation warning, when the remote fetch failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Parameters shared by the session tools.
#[derive(Debug, Deserialize)]
struct SessionParams {
    session_id: Option<String>,
}

/// Handle reports_analyze: batch free-text entry, comma/newline separated.
async fn handle_analyze(state: &SharedState, arguments: Option<Value>) -> RpcResult<Value> {
    #[derive(Deserialize)]
    struct AnalyzeParams {
        input: String,
        session_id: Option<String>,
    }

    let params: AnalyzeParams = parse_arguments("reports_analyze", arguments)?;
    let names = split_names(&params.input);

    let (snapshot, outcome) = {
        let mut sessions = state.sessions.lock().await;
        let session = sessions.get_or_create(params.session_id.as_deref());
        if names.is_empty() {
            // EmptyInput is a prompt, not a state change
            (session.clone(), Err(SessionError::EmptyInput))
        } else {
            for name in &names {
                session.add(name.clone());
            }
            let outcome = session.generate();
            (session.clone(), outcome)
        }
    };

    finish_generate(state, &snapshot, outcome).await
}

/// Handle selection_set_draft
async fn handle_set_draft(state: &SharedState, arguments: Option<Value>) -> RpcResult<Value> {
    #[derive(Deserialize)]
    struct SetDraftParams {
        text: String,
        session_id: Option<String>,
    }

    let params: SetDraftParams = parse_arguments("selection_set_draft", arguments)?;
    let mut sessions = state.sessions.lock().await;
    let session = sessions.get_or_create(params.session_id.as_deref());
    session.set_draft(params.text);
    to_value(SessionView::from(&*session))
}

/// Handle selection_add
async fn handle_add(state: &SharedState, arguments: Option<Value>) -> RpcResult<Value> {
    #[derive(Deserialize)]
    struct AddParams {
        name: String,
        session_id: Option<String>,
    }

    let params: AddParams = parse_arguments("selection_add", arguments)?;
    let mut sessions = state.sessions.lock().await;
    let session = sessions.get_or_create(params.session_id.as_deref());
    // Permissive by design: unknown names are accepted here and reported
    // as "not found" at generate time instead.
    session.add(params.name);
    to_value(SessionView::from(&*session))
}

/// Handle selection_remove
async fn handle_remove(state: &SharedState, arguments: Option<Value>) -> RpcResult<Value> {
    #[derive(Deserialize)]
    struct RemoveParams {
        name: String,
        session_id: Option<String>,
    }

    let params: RemoveParams = parse_arguments("selection_remove", arguments)?;
    let mut sessions = state.sessions.lock().await;
    let session = sessions.get_or_create(params.session_id.as_deref());
    session.remove(&params.name);
    to_value(SessionView::from(&*session))
}

/// Handle selection_generate
async fn handle_generate(state: &SharedState, arguments: Option<Value>) -> RpcResult<Value> {
    let params: SessionParams = parse_arguments("selection_generate", arguments)?;

    let (snapshot, outcome) = {
        let mut sessions = state.sessions.lock().await;
        let session = sessions.get_or_create(params.session_id.as_deref());
        let outcome = session.generate();
        (session.clone(), outcome)
    };

    finish_generate(state, &snapshot, outcome).await
}

/// Handle selection_clear
async fn handle_clear(state: &SharedState, arguments: Option<Value>) -> RpcResult<Value> {
    let params: SessionParams = parse_arguments("selection_clear", arguments)?;
    let mut sessions = state.sessions.lock().await;
    let session = sessions.get_or_create(params.session_id.as_deref());
    session.clear_all();
    to_value(SessionView::from(&*session))
}

/// Handle names_suggest
async fn handle_suggest(state: &SharedState, arguments: Option<Value>) -> RpcResult<Value> {
    #[derive(Deserialize)]
    struct SuggestParams {
        query: String,
        session_id: Option<String>,
    }

    let params: SuggestParams = parse_arguments("names_suggest", arguments)?;

    let excluded: std::collections::HashSet<String> = {
        let mut sessions = state.sessions.lock().await;
        let session = sessions.get_or_create(params.session_id.as_deref());
        session.pending_names.iter().cloned().collect()
    };

    let (known, warning) = state.known_names().await;
    let suggestions = resolver::suggest(&params.query, &known, &excluded);

    to_value(json!({
        "query": params.query,
        "suggestions": suggestions,
        "warning": warning,
    }))
}

/// Handle reports_browse_list
async fn handle_browse_list(state: &SharedState, arguments: Option<Value>) -> RpcResult<Value> {
    #[derive(Deserialize)]
    struct BrowseListParams {}

    let _params: BrowseListParams = parse_arguments("reports_browse_list", arguments)?;
    let (names, warning) = state.known_names().await;

    to_value(json!({
        "names": names,
        "warning": warning,
    }))
}

/// Handle reports_browse_get
async fn handle_browse_get(state: &SharedState, arguments: Option<Value>) -> RpcResult<Value> {
    #[derive(Deserialize)]
    struct BrowseGetParams {
        name: String,
    }

    let params: BrowseGetParams = parse_arguments("reports_browse_get", arguments)?;
    let name = params.name.trim().to_string();

    let warning = state.ensure_records(std::slice::from_ref(&name)).await;
    let entry = lookup_entry(state, &name).await;

    to_value(json!({
        "name": entry.name,
        "report": entry.report,
        "message": entry.message,
        "warning": warning,
    }))
}

// ============================================================================
// Helpers
// ============================================================================

/// Split free-text input into distinct trimmed names, preserving order.
fn split_names(input: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for piece in input.replace(',', "\n").split('\n') {
        let name = piece.trim();
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Turn a generate outcome into the common result shape, rendering the
/// frozen batch on success.
async fn finish_generate(
    state: &SharedState,
    snapshot: &SelectionSession,
    outcome: Result<Vec<String>, SessionError>,
) -> RpcResult<Value> {
    let result = match outcome {
        Ok(batch) => {
            let warning = state.ensure_records(&batch).await;
            let mut reports = Vec::with_capacity(batch.len());
            for name in &batch {
                reports.push(lookup_entry(state, name).await);
            }
            GenerateResult {
                status: "ok".to_string(),
                session: SessionView::from(snapshot),
                reports,
                message: None,
                warning,
            }
        }
        Err(e) => GenerateResult {
            status: match e {
                SessionError::NothingSelected => "nothing_selected".to_string(),
                SessionError::EmptyInput => "empty_input".to_string(),
            },
            session: SessionView::from(snapshot),
            reports: Vec::new(),
            message: Some(e.to_string()),
            warning: None,
        },
    };

    to_value(result)
}

/// Render one name into a batch entry, with a per-name not-found message.
async fn lookup_entry(state: &SharedState, name: &str) -> BatchEntry {
    match state.get_report(name).await {
        Some(record) => BatchEntry {
            name: name.to_string(),
            report: Some(render(&record)),
            message: None,
        },
        None => BatchEntry {
            name: name.to_string(),
            report: None,
            message: Some(format!("No report found for '{}'", name)),
        },
    }
}

fn parse_arguments<T: serde::de::DeserializeOwned>(
    tool_name: &str,
    arguments: Option<Value>,
) -> RpcResult<T> {
    // Tools with all-optional parameters accept missing arguments
    let args = arguments.unwrap_or_else(|| Value::Object(Default::default()));
    serde_json::from_value(args).map_err(|e| RpcError::InvalidParameters {
        tool_name: tool_name.to_string(),
        message: e.to_string(),
    })
}

fn to_value<T: Serialize>(value: T) -> RpcResult<Value> {
    serde_json::to_value(value).map_err(RpcError::Json)
}

/// Tool definitions advertised by tools/list.
pub fn tool_definitions() -> Vec<Tool> {
    let session_id_prop = json!({
        "type": "string",
        "description": "Session identifier; omit to start a new session"
    });

    vec![
        Tool {
            name: "reports_analyze".to_string(),
            description: "Analyze stocks by name: accepts comma or newline separated names, \
                          adds them to the session, and renders one report per resolved name"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "input": {
                        "type": "string",
                        "description": "Stock names, separated by commas or newlines"
                    },
                    "session_id": session_id_prop,
                },
                "required": ["input"]
            }),
        },
        Tool {
            name: "selection_set_draft".to_string(),
            description: "Replace the session's draft input text".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string", "description": "Current free-text input" },
                    "session_id": session_id_prop,
                },
                "required": ["text"]
            }),
        },
        Tool {
            name: "selection_add".to_string(),
            description: "Add a stock name to the pending selection (idempotent)".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Stock name to add" },
                    "session_id": session_id_prop,
                },
                "required": ["name"]
            }),
        },
        Tool {
            name: "selection_remove".to_string(),
            description: "Remove a stock name from the pending selection; clears the last \
                          generated batch"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Stock name to remove" },
                    "session_id": session_id_prop,
                },
                "required": ["name"]
            }),
        },
        Tool {
            name: "selection_generate".to_string(),
            description: "Freeze the pending selection and render one report per name".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "session_id": session_id_prop,
                },
                "required": []
            }),
        },
        Tool {
            name: "selection_clear".to_string(),
            description: "Clear the pending selection, draft text, and generated batch".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "session_id": session_id_prop,
                },
                "required": []
            }),
        },
        Tool {
            name: "names_suggest".to_string(),
            description: "Autocomplete company names by case-insensitive substring match, \
                          excluding names already selected"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Free-text query" },
                    "session_id": session_id_prop,
                },
                "required": ["query"]
            }),
        },
        Tool {
            name: "reports_browse_list".to_string(),
            description: "List all known company names, sorted".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
        Tool {
            name: "reports_browse_get".to_string(),
            description: "Render the report for one company by exact name".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Company name" },
                },
                "required": ["name"]
            }),
        },
    ]
}
