//! HTTP routes
//!
//! Thin translation between JSON requests and hub/store calls. Mutations go
//! through the hub so they are broadcast; reads go straight to the store.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::Distribution;
use crate::hub::BroadcastHub;
use crate::stats::{HubStats, PollStats};
use crate::store::{PollId, PollSnapshot};

use super::error::ApiError;
use super::ws;

type HubState = State<Arc<BroadcastHub>>;

/// JSON body whose decode failure is reported as an `ApiError`
type Body<T> = Result<Json<T>, JsonRejection>;

#[derive(Debug, Deserialize)]
pub struct CreatePollRequest {
    pub question: String,
    pub options: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OptionRequest {
    pub poll_id: String,
    pub option_index: i64,
}

#[derive(Debug, Deserialize)]
pub struct ReactionRequest {
    pub poll_id: String,
}

#[derive(Debug, Serialize)]
pub struct Banner {
    pub message: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ServiceStats {
    pub polls: usize,
    #[serde(flatten)]
    pub hub: HubStats,
    pub fanout_ratio: f64,
}

#[derive(Debug, Serialize)]
pub struct PollList {
    pub polls: Vec<PollSnapshot>,
}

#[derive(Debug, Serialize)]
pub struct VoteReceipt {
    pub id: Uuid,
    pub poll_id: PollId,
    pub option_index: usize,
    pub vote_count: u64,
    pub vote_distribution: Distribution,
}

#[derive(Debug, Serialize)]
pub struct LikeReceipt {
    pub poll_id: PollId,
    pub like_count: u64,
}

#[derive(Debug, Serialize)]
pub struct DislikeReceipt {
    pub poll_id: PollId,
    pub dislike_count: u64,
}

#[derive(Debug, Serialize)]
pub struct OptionLikeReceipt {
    pub poll_id: PollId,
    pub option_index: usize,
    pub option_like_counts: Distribution,
}

#[derive(Debug, Serialize)]
pub struct DeleteReceipt {
    pub message: &'static str,
    pub poll_id: PollId,
}

/// Build the application router
pub fn router(hub: Arc<BroadcastHub>) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/api/stats", get(service_stats))
        .route("/api/polls", get(list_polls).post(create_poll))
        .route("/api/polls/{poll_id}", get(get_poll).delete(delete_poll))
        .route("/api/polls/{poll_id}/stats", get(poll_stats))
        .route("/api/votes", post(record_vote))
        .route("/api/likes", post(record_like))
        .route("/api/dislikes", post(record_dislike))
        .route("/api/option-likes", post(record_option_like))
        .route("/ws", get(ws::subscribe))
        .with_state(hub)
}

fn parse_id(raw: &str) -> Result<PollId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::UnknownPoll(raw.to_string()))
}

async fn banner() -> Json<Banner> {
    Json(Banner {
        message: "livepoll API is running",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn service_stats(State(hub): HubState) -> Json<ServiceStats> {
    let stats = hub.subscribers().stats();
    Json(ServiceStats {
        polls: hub.store().poll_count().await,
        fanout_ratio: stats.fanout_ratio(),
        hub: stats,
    })
}

async fn list_polls(State(hub): HubState) -> Json<PollList> {
    Json(PollList {
        polls: hub.store().list_polls().await,
    })
}

async fn get_poll(
    State(hub): HubState,
    Path(poll_id): Path<String>,
) -> Result<Json<PollSnapshot>, ApiError> {
    let snapshot = hub.store().get_poll(parse_id(&poll_id)?).await?;
    Ok(Json(snapshot))
}

async fn poll_stats(
    State(hub): HubState,
    Path(poll_id): Path<String>,
) -> Result<Json<PollStats>, ApiError> {
    let stats = hub.store().poll_stats(parse_id(&poll_id)?).await?;
    Ok(Json(stats))
}

async fn create_poll(
    State(hub): HubState,
    body: Body<CreatePollRequest>,
) -> Result<Json<PollSnapshot>, ApiError> {
    let Json(req) = body?;
    let snapshot = hub.create_poll(req.question, req.options, req.category).await?;
    Ok(Json(snapshot))
}

async fn delete_poll(
    State(hub): HubState,
    Path(poll_id): Path<String>,
) -> Result<Json<DeleteReceipt>, ApiError> {
    let commit = hub.delete_poll(parse_id(&poll_id)?).await?;
    Ok(Json(DeleteReceipt {
        message: "Poll deleted successfully",
        poll_id: commit.poll_id,
    }))
}

async fn record_vote(
    State(hub): HubState,
    body: Body<OptionRequest>,
) -> Result<Json<VoteReceipt>, ApiError> {
    let Json(req) = body?;
    let commit = hub
        .record_vote(parse_id(&req.poll_id)?, req.option_index)
        .await?;
    Ok(Json(VoteReceipt {
        id: commit.record.id,
        poll_id: commit.poll_id,
        option_index: commit.record.option_index,
        vote_count: commit.aggregate.vote_count,
        vote_distribution: commit.aggregate.vote_distribution,
    }))
}

async fn record_like(
    State(hub): HubState,
    body: Body<ReactionRequest>,
) -> Result<Json<LikeReceipt>, ApiError> {
    let Json(req) = body?;
    let commit = hub.record_like(parse_id(&req.poll_id)?).await?;
    Ok(Json(LikeReceipt {
        poll_id: commit.poll_id,
        like_count: commit.aggregate.like_count,
    }))
}

async fn record_dislike(
    State(hub): HubState,
    body: Body<ReactionRequest>,
) -> Result<Json<DislikeReceipt>, ApiError> {
    let Json(req) = body?;
    let commit = hub.record_dislike(parse_id(&req.poll_id)?).await?;
    Ok(Json(DislikeReceipt {
        poll_id: commit.poll_id,
        dislike_count: commit.aggregate.dislike_count,
    }))
}

async fn record_option_like(
    State(hub): HubState,
    body: Body<OptionRequest>,
) -> Result<Json<OptionLikeReceipt>, ApiError> {
    let Json(req) = body?;
    let commit = hub
        .record_option_like(parse_id(&req.poll_id)?, req.option_index)
        .await?;
    Ok(Json(OptionLikeReceipt {
        poll_id: commit.poll_id,
        option_index: commit.record.option_index,
        option_like_counts: commit.aggregate.option_like_counts,
    }))
}
