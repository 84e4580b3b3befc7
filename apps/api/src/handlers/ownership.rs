use axum::Json;
use axum::extract::{Extension, Query, State};
use sentra_core::{AppError, OrgUnitId, ProgramId, TrackedEntityId, UserIdentity};
use sentra_domain::AccessMode;

use crate::dto::{
    AccessParams, AccessResponse, HistoryParams, MessageResponse, OverrideParams,
    OwnershipHistoryEntryResponse, TransferParams,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn transfer_ownership_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<TransferParams>,
) -> ApiResult<Json<MessageResponse>> {
    let tracked_entity = TrackedEntityId::parse(&params.tracked_entity)?;
    let program = ProgramId::parse(&params.program)?;
    let org_unit = OrgUnitId::parse(&params.ou)?;

    state
        .ownership_service
        .transfer_ownership(&user, tracked_entity, program, org_unit)
        .await?;

    Ok(Json(MessageResponse {
        message: "Ownership transferred",
    }))
}

pub async fn grant_temporary_ownership_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<OverrideParams>,
) -> ApiResult<Json<MessageResponse>> {
    let tracked_entity = TrackedEntityId::parse(&params.tracked_entity)?;
    let program = ProgramId::parse(&params.program)?;

    state
        .ownership_service
        .grant_temporary_ownership(tracked_entity, program, &user, &params.reason)
        .await?;

    Ok(Json(MessageResponse {
        message: "Temporary Ownership granted",
    }))
}

pub async fn check_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<AccessParams>,
) -> ApiResult<Json<AccessResponse>> {
    let tracked_entity = TrackedEntityId::parse(&params.tracked_entity)?;
    let program = ProgramId::parse(&params.program)?;
    let mode = match params.mode.as_deref() {
        None | Some("read") => AccessMode::Read,
        Some("write") => AccessMode::Write,
        Some(other) => {
            return Err(AppError::Validation(format!("unknown access mode '{other}'")).into());
        }
    };

    let access = state
        .ownership_service
        .has_access(&user, tracked_entity, program, mode)
        .await?;

    Ok(Json(AccessResponse { access }))
}

pub async fn ownership_history_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<HistoryParams>,
) -> ApiResult<Json<Vec<OwnershipHistoryEntryResponse>>> {
    let tracked_entity = TrackedEntityId::parse(&params.tracked_entity)?;
    let program = ProgramId::parse(&params.program)?;

    state
        .ownership_service
        .require_access(&user, tracked_entity, program, AccessMode::Read)
        .await?;

    let entries = state
        .ownership_service
        .ownership_history(tracked_entity, program)
        .await?;

    Ok(Json(
        entries
            .into_iter()
            .map(|entry| OwnershipHistoryEntryResponse {
                old_org_unit: entry.old_org_unit().to_string(),
                new_org_unit: entry.new_org_unit().to_string(),
                changed_at: entry.changed_at().to_rfc3339(),
                actor: entry.actor().to_string(),
            })
            .collect(),
    ))
}
