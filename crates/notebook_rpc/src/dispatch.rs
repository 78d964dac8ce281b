//! Request dispatch onto the note service.
//!
//! # Responsibility
//! - Decode method params into typed `Note`/`NoteSelector` payloads.
//! - Translate service failures into JSON-RPC error objects.
//!
//! # Invariants
//! - The response id always echoes the request id (null when unparsable).
//! - Logs carry method names and outcomes, never note content.

use crate::method::RpcMethod;
use crate::protocol::{error_codes, RpcError, RpcRequest, RpcResponse, JSON_RPC_VERSION};
use log::{info, warn};
use notebook_core::{
    Note, NoteRepository, NoteSelector, NoteService, NoteServiceError, SelectorError,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Instant;

/// Result of the `hello` reachability check.
pub const HELLO_RESULT: &str = "Hello there!";

/// Parses one raw JSON request and dispatches it.
pub fn handle_json<R: NoteRepository>(service: &mut NoteService<R>, raw: &str) -> RpcResponse {
    match serde_json::from_str::<RpcRequest>(raw) {
        Ok(request) => dispatch(service, request),
        Err(err) if err.is_syntax() || err.is_eof() => {
            warn!("event=rpc_call module=rpc status=error code=parse_error");
            RpcResponse::failure(
                Value::Null,
                RpcError::new(error_codes::PARSE_ERROR, format!("parse error: {err}")),
            )
        }
        Err(err) => {
            warn!("event=rpc_call module=rpc status=error code=invalid_request");
            RpcResponse::failure(
                Value::Null,
                RpcError::new(error_codes::INVALID_REQUEST, format!("invalid request: {err}")),
            )
        }
    }
}

/// Executes one request against `service`.
pub fn dispatch<R: NoteRepository>(
    service: &mut NoteService<R>,
    request: RpcRequest,
) -> RpcResponse {
    let started_at = Instant::now();
    let RpcRequest {
        jsonrpc,
        id,
        method,
        params,
    } = request;

    if jsonrpc != JSON_RPC_VERSION {
        warn!("event=rpc_call module=rpc status=error code=invalid_request jsonrpc={jsonrpc}");
        return RpcResponse::failure(
            id,
            RpcError::new(
                error_codes::INVALID_REQUEST,
                format!("unsupported jsonrpc version `{jsonrpc}`"),
            ),
        );
    }

    let Some(parsed) = RpcMethod::parse(&method) else {
        warn!("event=rpc_call module=rpc status=error code=method_not_found");
        return RpcResponse::failure(
            id,
            RpcError::new(
                error_codes::METHOD_NOT_FOUND,
                format!("method not found: {method}"),
            ),
        );
    };

    let outcome = call(service, parsed, params);
    let duration_ms = started_at.elapsed().as_millis();
    match outcome {
        Ok(result) => {
            info!("event=rpc_call module=rpc method={parsed} status=ok duration_ms={duration_ms}");
            RpcResponse::success(id, result)
        }
        Err(error) => {
            warn!(
                "event=rpc_call module=rpc method={parsed} status=error code={} duration_ms={duration_ms}",
                error.code
            );
            RpcResponse::failure(id, error)
        }
    }
}

fn call<R: NoteRepository>(
    service: &mut NoteService<R>,
    method: RpcMethod,
    params: Option<Value>,
) -> Result<Value, RpcError> {
    match method {
        RpcMethod::Hello => Ok(Value::String(HELLO_RESULT.to_string())),
        RpcMethod::CreateNote => {
            let note: Note = decode_params(params, "Note")?;
            to_result(service.create_note(&note).map_err(service_error)?)
        }
        RpcMethod::GetNotes => {
            let selector: NoteSelector = decode_params(params, "NoteSelector")?;
            to_result(service.get_notes(&selector).map_err(service_error)?)
        }
        RpcMethod::UpdateNote => {
            let note: Note = decode_params(params, "Note")?;
            to_result(service.update_note(&note).map_err(service_error)?)
        }
        RpcMethod::DeleteNotes => {
            let selector: NoteSelector = decode_params(params, "NoteSelector")?;
            to_result(service.delete_notes(&selector).map_err(service_error)?)
        }
    }
}

/// Decodes `params` as `T`; failures name the `expected` payload type in `data`.
fn decode_params<T: DeserializeOwned>(
    params: Option<Value>,
    expected: &'static str,
) -> Result<T, RpcError> {
    let params = params.ok_or_else(|| {
        RpcError::new(error_codes::INVALID_PARAMS, "invalid params: missing params object")
            .with_data(json!({ "expected": expected }))
    })?;
    serde_json::from_value(params).map_err(|err| {
        RpcError::new(error_codes::INVALID_PARAMS, format!("invalid params: {err}"))
            .with_data(json!({ "expected": expected }))
    })
}

fn to_result<T: Serialize>(value: T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|err| {
        RpcError::new(
            error_codes::INTERNAL_ERROR,
            format!("failed to encode result: {err}"),
        )
    })
}

fn service_error(err: NoteServiceError) -> RpcError {
    let code = match &err {
        NoteServiceError::MissingId
        | NoteServiceError::Validation(_)
        | NoteServiceError::Selector(SelectorError::InvalidSelector(_)) => {
            error_codes::INVALID_PARAMS
        }
        NoteServiceError::Selector(SelectorError::InternalState(_)) => error_codes::INTERNAL_ERROR,
        NoteServiceError::NotFound(_) | NoteServiceError::Repo(_) => error_codes::STORAGE_ERROR,
    };
    RpcError::new(code, err.to_string())
}
