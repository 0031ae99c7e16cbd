//! HTTP Handlers
//!
//! Every handler reads the caller's `VoterIdentity` from request
//! extensions; the identity middleware must run in front of this router.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kernel::VoterIdentity;
use std::sync::Arc;

use crate::application::config::VoteConfig;
use crate::application::{
    CastVoteUseCase, CreatePollInput, CreatePollUseCase, DeletePollUseCase, GetPollUseCase,
    ListOwnPollsUseCase, ListVotesUseCase,
};
use crate::domain::repository::{PollRepository, VoteRepository};
use crate::domain::value_object::poll_id::PollId;
use crate::error::{VoteError, VoteResult};
use crate::presentation::dto::{
    CastVoteRequest, CreatePollRequest, PollCreatedResponse, PollListResponse, PollResponse,
    VoteCastResponse, VoteEntryResponse, VoteListResponse,
};

/// Shared state for vote handlers
#[derive(Clone)]
pub struct VoteAppState<R>
where
    R: PollRepository + VoteRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<VoteConfig>,
}

// ============================================================================
// Polls
// ============================================================================

/// GET /api/v1/polls/{id}
pub async fn get_poll<R>(
    State(state): State<VoteAppState<R>>,
    Path(poll_id): Path<i64>,
) -> VoteResult<Json<PollResponse>>
where
    R: PollRepository + VoteRepository + Clone + Send + Sync + 'static,
{
    let use_case = GetPollUseCase::new(state.repo.clone());
    let poll = use_case.execute(PollId::new(poll_id)).await?;

    Ok(Json(PollResponse::from(poll)))
}

/// GET /api/v1/polls
pub async fn list_polls<R>(
    State(state): State<VoteAppState<R>>,
    Extension(identity): Extension<VoterIdentity>,
) -> VoteResult<Json<PollListResponse>>
where
    R: PollRepository + VoteRepository + Clone + Send + Sync + 'static,
{
    let use_case = ListOwnPollsUseCase::new(state.repo.clone());
    let polls = use_case.execute(&identity).await?;

    Ok(Json(PollListResponse {
        polls: polls.into_iter().map(PollResponse::from).collect(),
    }))
}

/// POST /api/v1/polls
pub async fn create_poll<R>(
    State(state): State<VoteAppState<R>>,
    Extension(identity): Extension<VoterIdentity>,
    body: Result<Json<CreatePollRequest>, JsonRejection>,
) -> VoteResult<impl IntoResponse>
where
    R: PollRepository + VoteRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = body.map_err(|e| VoteError::InvalidPoll(e.body_text()))?;
    let use_case = CreatePollUseCase::new(state.repo.clone(), state.config.clone());
    let input = CreatePollInput {
        title: req.title,
        description: req.description,
        ticker: req.ticker,
        ballot_alphabet: req.ballot_alphabet,
    };
    let poll = use_case.execute(&identity, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(PollCreatedResponse {
            poll_id: poll.poll_id.get(),
        }),
    ))
}

/// DELETE /api/v1/polls/{id}
pub async fn delete_poll<R>(
    State(state): State<VoteAppState<R>>,
    Extension(identity): Extension<VoterIdentity>,
    Path(poll_id): Path<i64>,
) -> VoteResult<StatusCode>
where
    R: PollRepository + VoteRepository + Clone + Send + Sync + 'static,
{
    let use_case = DeletePollUseCase::new(state.repo.clone());
    use_case.execute(&identity, PollId::new(poll_id)).await?;

    Ok(StatusCode::ACCEPTED)
}

// ============================================================================
// Votes
// ============================================================================

/// POST /api/v1/polls/{id}/vote
pub async fn cast_vote<R>(
    State(state): State<VoteAppState<R>>,
    Extension(identity): Extension<VoterIdentity>,
    Path(poll_id): Path<i64>,
    body: Result<Json<CastVoteRequest>, JsonRejection>,
) -> VoteResult<impl IntoResponse>
where
    R: PollRepository + VoteRepository + Clone + Send + Sync + 'static,
{
    // Missing, null or non-string values are invalid ballots too
    let Json(req) = body.map_err(|e| VoteError::InvalidValue(e.body_text()))?;
    let use_case = CastVoteUseCase::new(state.repo.clone(), state.repo.clone());
    let vote_id = use_case
        .execute(PollId::new(poll_id), &identity, &req.value)
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(VoteCastResponse {
            vote_id: vote_id.get(),
        }),
    ))
}

/// GET /api/v1/polls/{id}/votes
pub async fn list_votes<R>(
    State(state): State<VoteAppState<R>>,
    Path(poll_id): Path<i64>,
) -> VoteResult<Json<VoteListResponse>>
where
    R: PollRepository + VoteRepository + Clone + Send + Sync + 'static,
{
    let use_case = ListVotesUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());
    let (votes, total) = use_case.execute(PollId::new(poll_id)).await?;

    Ok(Json(VoteListResponse {
        poll_id,
        total,
        votes: votes.into_iter().map(VoteEntryResponse::from).collect(),
    }))
}
