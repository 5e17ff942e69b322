//! JSON API handlers.
//!
//! Handlers translate JSON payloads into bench operations. All bench calls
//! go through the blocking pool: transport I/O can stall for the full read
//! timeout and must not park the async runtime.

use crate::bench::{Bench, RunValues};
use crate::catalog::template::ValueMap;
use crate::server::error::{ApiError, ApiResult};
use crate::server::models::{
    value_to_string, CommandDto, CommandsQuery, CommandsResponse, CustomRequest, InstrumentDto,
    InstrumentListResponse, RunRequest, RunResponse, SetAliasRequest,
};
use crate::server::AppState;
use axum::extract::{Query, State};
use axum::Json;
use std::sync::Arc;

async fn blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
}

fn instrument_list(bench: &Bench) -> Vec<InstrumentDto> {
    bench
        .registry()
        .list()
        .iter()
        .map(|record| InstrumentDto::from_record(record, bench.catalog().has_model(&record.model)))
        .collect()
}

/// `POST /api/scan` — rediscover the bus.
pub async fn scan(State(state): State<AppState>) -> ApiResult<Json<InstrumentListResponse>> {
    let bench = Arc::clone(&state.bench);
    blocking(move || {
        bench.registry().discover()?;
        Ok(Json(InstrumentListResponse {
            ok: true,
            instruments: instrument_list(&bench),
        }))
    })
    .await
}

/// `POST /api/set_alias` — bind an alias to an instrument identity.
pub async fn set_alias(
    State(state): State<AppState>,
    Json(req): Json<SetAliasRequest>,
) -> ApiResult<Json<InstrumentListResponse>> {
    if req.alias.trim().is_empty()
        || req.vendor.trim().is_empty()
        || req.model.trim().is_empty()
        || req.serial.trim().is_empty()
    {
        return Err(ApiError::BadRequest(
            "Missing alias/vendor/model/serial".to_string(),
        ));
    }

    let bench = Arc::clone(&state.bench);
    blocking(move || {
        let ok = bench
            .registry()
            .assign_alias(&req.alias, &req.vendor, &req.model, &req.serial);
        Ok(Json(InstrumentListResponse {
            ok,
            instruments: instrument_list(&bench),
        }))
    })
    .await
}

/// `GET /api/commands_for_alias` — descriptor table for an alias's model.
pub async fn commands_for_alias(
    State(state): State<AppState>,
    Query(query): Query<CommandsQuery>,
) -> ApiResult<Json<CommandsResponse>> {
    if query.alias.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing alias".to_string()));
    }

    let bench = Arc::clone(&state.bench);
    blocking(move || {
        let (model, commands) = bench.commands_for(&query.alias)?;
        Ok(Json(CommandsResponse {
            ok: true,
            model,
            commands: commands.iter().map(CommandDto::from).collect(),
        }))
    })
    .await
}

/// `POST /api/run` — dispatch a cataloged command.
pub async fn run(
    State(state): State<AppState>,
    Json(req): Json<RunRequest>,
) -> ApiResult<Json<RunResponse>> {
    if req.alias.trim().is_empty() || req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing alias/name".to_string()));
    }

    let values = match (&req.values, &req.value) {
        (Some(map), _) => RunValues::Map(
            map.iter()
                .map(|(name, value)| (name.clone(), value_to_string(value)))
                .collect::<ValueMap>(),
        ),
        (None, Some(value)) => {
            let value = value_to_string(value);
            if value.trim().is_empty() {
                RunValues::None
            } else {
                RunValues::Single(value)
            }
        }
        (None, None) => RunValues::None,
    };

    let bench = Arc::clone(&state.bench);
    blocking(move || {
        let outcome = bench.run(req.alias.trim(), req.name.trim(), values)?;
        Ok(Json(RunResponse {
            ok: true,
            mode: outcome.mode,
            cmd: outcome.command,
            response: outcome.response,
        }))
    })
    .await
}

/// `POST /api/custom` — dispatch a raw command; `?` selects query.
pub async fn custom(
    State(state): State<AppState>,
    Json(req): Json<CustomRequest>,
) -> ApiResult<Json<RunResponse>> {
    if req.alias.trim().is_empty() || req.cmd.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing alias/cmd".to_string()));
    }

    let bench = Arc::clone(&state.bench);
    blocking(move || {
        let value = req.value.as_ref().map(value_to_string);
        let outcome = bench.run_custom(req.alias.trim(), &req.cmd, value.as_deref())?;
        Ok(Json(RunResponse {
            ok: true,
            mode: outcome.mode,
            cmd: outcome.command,
            response: outcome.response,
        }))
    })
    .await
}
