//! Unit tests for vote crate
//! Ledger integrity, poll management and the HTTP surface, all against
//! the in-memory repository.

#[cfg(test)]
mod support {
    use kernel::{PseudonymousKey, SubjectId, VoterIdentity};
    use std::sync::Arc;

    use crate::application::{CastVoteUseCase, VoteConfig};
    use crate::domain::value_object::poll_id::{PollId, VoteId};
    use crate::error::VoteResult;
    use crate::infra::memory::MemoryVoteRepository;

    pub const POLL: i64 = 42;

    pub struct Harness {
        pub repo: Arc<MemoryVoteRepository>,
        pub config: Arc<VoteConfig>,
    }

    impl Harness {
        /// Poll 42 ("BTC", yes/no) with no votes
        pub fn new() -> Self {
            let repo = MemoryVoteRepository::new();
            repo.seed_poll(POLL, "BTC", "yn").unwrap();
            Self {
                repo: Arc::new(repo),
                config: Arc::new(VoteConfig::default()),
            }
        }

        pub async fn cast(&self, poll: i64, voter: &VoterIdentity, value: &str) -> VoteResult<VoteId> {
            CastVoteUseCase::new(self.repo.clone(), self.repo.clone())
                .execute(PollId::new(poll), voter, value)
                .await
        }
    }

    pub fn anonymous(digest: &str) -> VoterIdentity {
        VoterIdentity::Pseudonymous(PseudonymousKey::from_hex_digest(digest))
    }

    pub fn user(subject: &str) -> VoterIdentity {
        VoterIdentity::Authenticated(SubjectId::new(subject).unwrap())
    }
}

#[cfg(test)]
mod ledger_tests {
    use super::support::*;
    use crate::error::VoteError;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_cast_vote_increments_counter() {
        let h = Harness::new();

        h.cast(POLL, &anonymous("a1"), "y").await.unwrap();
        h.cast(POLL, &user("sub-1"), "n").await.unwrap();

        assert_eq!(h.repo.votes_count(POLL), Some(2));
        assert_eq!(h.repo.ledger_len(POLL), 2);
    }

    #[tokio::test]
    async fn test_second_vote_is_duplicate() {
        let h = Harness::new();
        let voter = anonymous("a1");

        h.cast(POLL, &voter, "y").await.unwrap();
        let second = h.cast(POLL, &voter, "n").await;

        assert!(matches!(second, Err(VoteError::DuplicateVote)));
        assert_eq!(h.repo.votes_count(POLL), Some(1));
    }

    #[tokio::test]
    async fn test_same_voter_may_vote_on_other_polls() {
        let h = Harness::new();
        h.repo.seed_poll(43, "ETH", "yn").unwrap();
        let voter = user("sub-1");

        h.cast(POLL, &voter, "y").await.unwrap();
        h.cast(43, &voter, "y").await.unwrap();

        assert_eq!(h.repo.votes_count(POLL), Some(1));
        assert_eq!(h.repo.votes_count(43), Some(1));
    }

    #[tokio::test]
    async fn test_invalid_value_writes_nothing() {
        let h = Harness::new();

        for raw in ["", "yes", "x", "Y"] {
            let result = h.cast(POLL, &anonymous("a1"), raw).await;
            assert!(matches!(result, Err(VoteError::InvalidValue(_))), "{raw:?}");
        }

        assert_eq!(h.repo.votes_count(POLL), Some(0));
        assert_eq!(h.repo.ledger_len(POLL), 0);
        // The voter can still vote
        h.cast(POLL, &anonymous("a1"), "y").await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_poll() {
        let h = Harness::new();
        let result = h.cast(7, &anonymous("a1"), "y").await;
        assert!(matches!(result, Err(VoteError::PollNotFound(id)) if id.get() == 7));
    }

    #[tokio::test]
    async fn test_custom_alphabet() {
        let h = Harness::new();
        h.repo.seed_poll(50, "SOL", "abc").unwrap();

        h.cast(50, &anonymous("a1"), "c").await.unwrap();
        let rejected = h.cast(50, &anonymous("a2"), "y").await;

        assert!(matches!(rejected, Err(VoteError::InvalidValue(_))));
        assert_eq!(h.repo.votes_count(50), Some(1));
    }

    /// Covers how the use case surfaces a mid-cast storage fault and that
    /// a retry is not a duplicate. The undo here is the in-memory store's
    /// own; SQL atomicity of `PgVoteRepository::cast_vote` rests on its
    /// transaction and needs a database to exercise.
    #[tokio::test]
    async fn test_storage_fault_rolls_back_insert() {
        let h = Harness::new();
        let voter = anonymous("a1");
        h.cast(POLL, &anonymous("a0"), "n").await.unwrap();

        h.repo.fail_next_increment();
        let failed = h.cast(POLL, &voter, "y").await;
        assert!(matches!(failed, Err(VoteError::Storage(_))));
        assert_eq!(h.repo.votes_count(POLL), Some(1));
        assert_eq!(h.repo.ledger_len(POLL), 1);

        // Nothing was kept, so the retry is not a duplicate
        h.cast(POLL, &voter, "y").await.unwrap();
        assert_eq!(h.repo.votes_count(POLL), Some(2));
        assert_eq!(h.repo.ledger_len(POLL), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicate_votes_single_winner() {
        let h = Arc::new(Harness::new());
        let voter = anonymous("shared-address-digest");

        let tasks: Vec<_> = (0..32)
            .map(|_| {
                let h = h.clone();
                let voter = voter.clone();
                tokio::spawn(async move { h.cast(POLL, &voter, "y").await })
            })
            .collect();

        let mut succeeded = 0;
        let mut duplicates = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => succeeded += 1,
                Err(VoteError::DuplicateVote) => duplicates += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(succeeded, 1);
        assert_eq!(duplicates, 31);
        assert_eq!(h.repo.votes_count(POLL), Some(1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_distinct_voters_all_counted() {
        let h = Arc::new(Harness::new());

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let h = h.clone();
                tokio::spawn(async move { h.cast(POLL, &anonymous(&format!("addr-{i}")), "y").await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(h.repo.votes_count(POLL), Some(20));
        assert_eq!(h.repo.ledger_len(POLL), 20);
    }
}

#[cfg(test)]
mod poll_tests {
    use super::support::*;
    use crate::application::{
        CreatePollInput, CreatePollUseCase, DeletePollUseCase, ListOwnPollsUseCase,
        ListVotesUseCase,
    };
    use crate::domain::value_object::poll_id::PollId;
    use crate::error::VoteError;

    fn input(ticker: &str, alphabet: Option<&str>) -> CreatePollInput {
        CreatePollInput {
            title: "Up or down?".to_string(),
            description: Some("Closing price tomorrow".to_string()),
            ticker: ticker.to_string(),
            ballot_alphabet: alphabet.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_poll_requires_subject() {
        let h = Harness::new();
        let use_case = CreatePollUseCase::new(h.repo.clone(), h.config.clone());

        let result = use_case.execute(&anonymous("a1"), input("BTC", None)).await;
        assert!(matches!(result, Err(VoteError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_create_poll_defaults_alphabet() {
        let h = Harness::new();
        let use_case = CreatePollUseCase::new(h.repo.clone(), h.config.clone());

        let poll = use_case.execute(&user("sub-1"), input("eth", None)).await.unwrap();

        assert_eq!(poll.ballot_alphabet.as_str(), "yn");
        assert_eq!(poll.ticker.as_str(), "ETH");
        assert_eq!(poll.votes_count, 0);
        assert!(poll.poll_id.get() > POLL);
    }

    #[tokio::test]
    async fn test_create_poll_rejects_bad_alphabet() {
        let h = Harness::new();
        let use_case = CreatePollUseCase::new(h.repo.clone(), h.config.clone());

        let result = use_case.execute(&user("sub-1"), input("ETH", Some("yy"))).await;
        assert!(matches!(result, Err(VoteError::InvalidPoll(_))));
    }

    #[tokio::test]
    async fn test_list_and_delete_own_polls() {
        let h = Harness::new();
        let create = CreatePollUseCase::new(h.repo.clone(), h.config.clone());
        let owner = user("sub-1");
        let other = user("sub-2");

        let first = create.execute(&owner, input("AAA", None)).await.unwrap();
        let second = create.execute(&owner, input("BBB", None)).await.unwrap();
        create.execute(&other, input("CCC", None)).await.unwrap();

        let list = ListOwnPollsUseCase::new(h.repo.clone());
        let polls = list.execute(&owner).await.unwrap();
        let ids: Vec<_> = polls.iter().map(|p| p.poll_id).collect();
        assert_eq!(ids, vec![second.poll_id, first.poll_id]);

        let delete = DeletePollUseCase::new(h.repo.clone());
        let foreign = delete.execute(&other, first.poll_id).await;
        assert!(matches!(foreign, Err(VoteError::PollNotFound(_))));

        delete.execute(&owner, first.poll_id).await.unwrap();
        assert_eq!(list.execute(&owner).await.unwrap().len(), 1);

        let anonymous_list = list.execute(&anonymous("a1")).await;
        assert!(matches!(anonymous_list, Err(VoteError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_deleted_poll_rejects_votes() {
        let h = Harness::new();
        let create = CreatePollUseCase::new(h.repo.clone(), h.config.clone());
        let owner = user("sub-1");
        let poll = create.execute(&owner, input("AAA", None)).await.unwrap();

        h.cast(poll.poll_id.get(), &anonymous("a1"), "y").await.unwrap();
        DeletePollUseCase::new(h.repo.clone())
            .execute(&owner, poll.poll_id)
            .await
            .unwrap();

        assert_eq!(h.repo.ledger_len(poll.poll_id.get()), 0);
        let result = h.cast(poll.poll_id.get(), &anonymous("a2"), "y").await;
        assert!(matches!(result, Err(VoteError::PollNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_votes_newest_first() {
        let h = Harness::new();
        h.cast(POLL, &anonymous("a1"), "y").await.unwrap();
        h.cast(POLL, &anonymous("a2"), "n").await.unwrap();
        h.cast(POLL, &anonymous("a3"), "y").await.unwrap();

        let mut config = crate::application::VoteConfig::default();
        config.votes_list_limit = 2;
        let use_case = ListVotesUseCase::new(h.repo.clone(), h.repo.clone(), config.into());
        let (votes, total) = use_case.execute(PollId::new(POLL)).await.unwrap();

        assert_eq!(total, 3);
        let values: Vec<_> = votes.iter().map(|v| v.value.as_char()).collect();
        assert_eq!(values, vec!['y', 'n']);

        let missing = use_case.execute(PollId::new(7)).await;
        assert!(matches!(missing, Err(VoteError::PollNotFound(_))));
    }
}

#[cfg(test)]
mod error_tests {
    use crate::domain::value_object::poll_id::PollId;
    use crate::error::VoteError;
    use axum::http::StatusCode;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            VoteError::PollNotFound(PollId::new(1)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            VoteError::InvalidValue("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(VoteError::DuplicateVote.status_code(), StatusCode::CONFLICT);
        assert_eq!(VoteError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            VoteError::Storage(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_details_not_exposed() {
        let err = VoteError::Storage(sqlx::Error::Protocol("password=hunter2".into()));
        assert!(!err.to_app_error().message().contains("hunter2"));
    }
}

#[cfg(test)]
mod http_tests {
    use super::support::*;
    use crate::presentation::router::vote_router_generic;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use axum::{Extension, Router};
    use kernel::VoterIdentity;
    use tower::ServiceExt;

    fn router(h: &Harness, identity: VoterIdentity) -> Router {
        vote_router_generic((*h.repo).clone(), (*h.config).clone()).layer(Extension(identity))
    }

    fn request(method: Method, uri: &str, body: Option<&str>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_vote_then_duplicate() {
        let h = Harness::new();
        let app = router(&h, anonymous("a1"));

        let response = app
            .clone()
            .oneshot(request(Method::POST, "/api/v1/polls/42/vote", Some(r#"{"value":"y"}"#)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert!(json(response).await["voteId"].as_i64().is_some());

        let response = app
            .clone()
            .oneshot(request(Method::POST, "/api/v1/polls/42/vote", Some(r#"{"value":"n"}"#)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .oneshot(request(Method::GET, "/api/v1/polls/42", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let poll = json(response).await;
        assert_eq!(poll["votesCount"], 1);
        assert_eq!(poll["ticker"], "BTC");
        assert!(poll.get("ownerSubjectId").is_none());
    }

    #[tokio::test]
    async fn test_vote_errors() {
        let h = Harness::new();
        let app = router(&h, anonymous("a1"));

        let response = app
            .clone()
            .oneshot(request(Method::POST, "/api/v1/polls/42/vote", Some(r#"{"value":"maybe"}"#)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(request(Method::POST, "/api/v1/polls/7/vote", Some(r#"{"value":"y"}"#)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_vote_body_is_invalid_value() {
        let h = Harness::new();
        let app = router(&h, anonymous("a1"));

        for body in ["{}", r#"{"value":5}"#, r#"{"value":null}"#, "not json"] {
            let response = app
                .clone()
                .oneshot(request(Method::POST, "/api/v1/polls/42/vote", Some(body)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(json(response).await["status"], 400, "{body}");
        }

        let no_content_type = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/polls/42/vote")
            .body(Body::from(r#"{"value":"y"}"#))
            .unwrap();
        let response = app.oneshot(no_content_type).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(response).await["status"], 400);

        assert_eq!(h.repo.ledger_len(POLL), 0);
    }

    #[tokio::test]
    async fn test_malformed_poll_body_is_invalid_poll() {
        let h = Harness::new();
        let app = router(&h, user("sub-1"));

        for body in ["{}", r#"{"title":1,"ticker":"ETH"}"#] {
            let response = app
                .clone()
                .oneshot(request(Method::POST, "/api/v1/polls", Some(body)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(json(response).await["status"], 400, "{body}");
        }
    }

    #[tokio::test]
    async fn test_votes_listing_hides_voter_keys() {
        let h = Harness::new();
        h.cast(POLL, &anonymous("secret-digest"), "y").await.unwrap();

        let response = router(&h, anonymous("a2"))
            .oneshot(request(Method::GET, "/api/v1/polls/42/votes", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json(response).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["votes"][0]["value"], "y");
        assert!(!body.to_string().contains("secret-digest"));
    }

    #[tokio::test]
    async fn test_poll_management_requires_login() {
        let h = Harness::new();
        let anon = router(&h, anonymous("a1"));

        let response = anon
            .clone()
            .oneshot(request(Method::GET, "/api/v1/polls", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = anon
            .oneshot(request(
                Method::POST,
                "/api/v1/polls",
                Some(r#"{"title":"Up?","ticker":"eth"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_list_delete_poll() {
        let h = Harness::new();
        let owner = router(&h, user("sub-1"));

        let response = owner
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/v1/polls",
                Some(r#"{"title":"Up?","ticker":"eth","ballotAlphabet":"abc"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let poll_id = json(response).await["pollId"].as_i64().unwrap();

        let response = owner
            .clone()
            .oneshot(request(Method::GET, "/api/v1/polls", None))
            .await
            .unwrap();
        let list = json(response).await;
        assert_eq!(list["polls"][0]["pollId"], poll_id);
        assert_eq!(list["polls"][0]["ballotAlphabet"], "abc");

        let uri = format!("/api/v1/polls/{poll_id}");
        let response = router(&h, user("sub-2"))
            .oneshot(request(Method::DELETE, &uri, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = owner
            .oneshot(request(Method::DELETE, &uri, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }
}
