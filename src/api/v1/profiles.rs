use crate::api::RequestContext;
use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResponse, ServiceResult};
use crate::models::profiles::{
    DEFAULT_PLAYS_LIMIT, MessageResponse, PlaysResponse, ProfileArgs, ProfileResponse,
    RecalculationResponse,
};
use crate::usecases::{performance, profiles};
use axum::Json;
use axum::extract::Query;

const SUCCESS: &str = "success";

fn profile_name(args: &mut ProfileArgs) -> ServiceResult<String> {
    args.name
        .take()
        .filter(|name| !name.is_empty())
        .ok_or(AppError::ProfilesMissingName)
}

fn with_current_profile(ctx: &RequestContext, mut args: ProfileArgs) -> Query<ProfileArgs> {
    args.name = ctx.current_profile().map(str::to_owned);
    Query(args)
}

pub async fn profile(
    ctx: RequestContext,
    Query(mut args): Query<ProfileArgs>,
) -> ServiceResponse<ProfileResponse> {
    let name = profile_name(&mut args)?;
    let stats = profiles::fetch_stats(&ctx, &name).await?;
    Ok(Json(ProfileResponse {
        status: SUCCESS,
        name: stats.name,
        playcount: stats.playcount,
        pp: stats.pp,
    }))
}

pub async fn tops(
    ctx: RequestContext,
    Query(mut args): Query<ProfileArgs>,
) -> ServiceResponse<PlaysResponse> {
    let name = profile_name(&mut args)?;
    let limit = args.limit.unwrap_or(DEFAULT_PLAYS_LIMIT);
    let plays = profiles::fetch_tops(&ctx, &name, limit).await?;
    Ok(Json(PlaysResponse {
        status: SUCCESS,
        name,
        plays,
    }))
}

pub async fn recent(
    ctx: RequestContext,
    Query(mut args): Query<ProfileArgs>,
) -> ServiceResponse<PlaysResponse> {
    let name = profile_name(&mut args)?;
    let limit = args.limit.unwrap_or(DEFAULT_PLAYS_LIMIT);
    let plays = profiles::fetch_recent(&ctx, &name, limit).await?;
    Ok(Json(PlaysResponse {
        status: SUCCESS,
        name,
        plays,
    }))
}

pub async fn wipe(
    ctx: RequestContext,
    Query(mut args): Query<ProfileArgs>,
) -> ServiceResponse<MessageResponse> {
    let name = profile_name(&mut args)?;
    profiles::wipe(&ctx, &name).await?;
    Ok(Json(MessageResponse {
        status: SUCCESS,
        message: format!("{name} has been wiped!"),
    }))
}

pub async fn recalc(ctx: RequestContext) -> ServiceResponse<RecalculationResponse> {
    let summary = performance::recalculate_all(&ctx).await?;
    Ok(Json(RecalculationResponse {
        status: SUCCESS,
        message: "recalculated every profile",
        summary,
    }))
}

pub async fn client_profile(
    ctx: RequestContext,
    Query(args): Query<ProfileArgs>,
) -> ServiceResponse<ProfileResponse> {
    let args = with_current_profile(&ctx, args);
    profile(ctx, args).await
}

pub async fn client_tops(
    ctx: RequestContext,
    Query(args): Query<ProfileArgs>,
) -> ServiceResponse<PlaysResponse> {
    let args = with_current_profile(&ctx, args);
    tops(ctx, args).await
}

pub async fn client_recent(
    ctx: RequestContext,
    Query(args): Query<ProfileArgs>,
) -> ServiceResponse<PlaysResponse> {
    let args = with_current_profile(&ctx, args);
    recent(ctx, args).await
}

pub async fn client_wipe(
    ctx: RequestContext,
    Query(args): Query<ProfileArgs>,
) -> ServiceResponse<MessageResponse> {
    let args = with_current_profile(&ctx, args);
    wipe(ctx, args).await
}
