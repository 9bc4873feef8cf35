//! End-to-end tests against a running API backed by PostgreSQL and Redis
//!
//! Each test skips itself when DATABASE_URL or REDIS_URL is not set.

use integration_tests::*;
use reqwest::StatusCode;
use serde_json::json;

type TestResult = anyhow::Result<()>;

async fn register(server: &TestServer) -> anyhow::Result<(RegisterRequest, AuthResponse)> {
    let request = RegisterRequest::unique();
    let response = server.post("/api/v1/auth/register", &request).await?;
    let body: Data<AuthResponse> = assert_json(response, StatusCode::CREATED).await?;
    Ok((request, body.data))
}

async fn create_comment(
    server: &TestServer,
    token: &str,
    request: &CreateCommentRequest,
) -> anyhow::Result<CommentResponse> {
    let response = server.post_auth("/api/v1/comments", token, request).await?;
    let body: Data<CommentResponse> = assert_json(response, StatusCode::CREATED).await?;
    Ok(body.data)
}

async fn react(
    server: &TestServer,
    token: &str,
    comment_id: &str,
    kind: &str,
) -> anyhow::Result<CommentResponse> {
    let response = server
        .post_empty(&format!("/api/v1/comments/{comment_id}/{kind}"), token)
        .await?;
    let body: Data<CommentResponse> = assert_json(response, StatusCode::OK).await?;
    Ok(body.data)
}

async fn error_code(response: reqwest::Response, status: StatusCode) -> anyhow::Result<String> {
    let body: ErrorBody = assert_json(response, status).await?;
    Ok(body.error.code)
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() -> TestResult {
    if !check_test_env().await {
        return Ok(());
    }
    let server = TestServer::start().await?;

    let health: HealthResponse = assert_json(server.get("/health").await?, StatusCode::OK).await?;
    assert_eq!(health.status, "healthy");

    let ready: HealthResponse =
        assert_json(server.get("/health/ready").await?, StatusCode::OK).await?;
    assert_eq!(ready.status, "ready");
    Ok(())
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_register_and_login() -> TestResult {
    if !check_test_env().await {
        return Ok(());
    }
    let server = TestServer::start().await?;

    let (request, auth) = register(&server).await?;
    assert_eq!(auth.user.username, request.username);
    assert_eq!(auth.user.role, "user");
    assert!(auth.user.is_active);
    assert_eq!(auth.token_type, "Bearer");
    assert!(auth.expires_in > 0);

    let duplicate = server.post("/api/v1/auth/register", &request).await?;
    assert_eq!(
        error_code(duplicate, StatusCode::CONFLICT).await?,
        "EMAIL_ALREADY_EXISTS"
    );

    let login = server.post("/api/v1/auth/login", &request.login()).await?;
    let body: Data<AuthResponse> = assert_json(login, StatusCode::OK).await?;
    assert_eq!(body.data.user.id, auth.user.id);

    let mut wrong = request.login();
    wrong.password = "not-the-password".into();
    let rejected = server.post("/api/v1/auth/login", &wrong).await?;
    assert_eq!(
        error_code(rejected, StatusCode::UNAUTHORIZED).await?,
        "INVALID_CREDENTIALS"
    );
    Ok(())
}

#[tokio::test]
async fn test_register_validation() -> TestResult {
    if !check_test_env().await {
        return Ok(());
    }
    let server = TestServer::start().await?;

    let response = server
        .post(
            "/api/v1/auth/register",
            &json!({"username": "ab", "email": "not-an-email", "password": "x"}),
        )
        .await?;
    assert_eq!(
        error_code(response, StatusCode::BAD_REQUEST).await?,
        "VALIDATION_ERROR"
    );
    Ok(())
}

#[tokio::test]
async fn test_refresh_rotates_tokens() -> TestResult {
    if !check_test_env().await {
        return Ok(());
    }
    let server = TestServer::start().await?;
    let (_, auth) = register(&server).await?;

    let first = RefreshRequest {
        refresh_token: auth.refresh_token.clone(),
    };
    let rotated: Data<TokenResponse> = assert_json(
        server.post("/api/v1/auth/refresh", &first).await?,
        StatusCode::OK,
    )
    .await?;
    assert_ne!(rotated.data.refresh_token, auth.refresh_token);

    // The consumed token cannot be replayed
    let replay = server.post("/api/v1/auth/refresh", &first).await?;
    assert_status(replay, StatusCode::UNAUTHORIZED).await?;

    let me = server
        .get_auth("/api/v1/auth/me", &rotated.data.access_token)
        .await?;
    let me: Data<UserResponse> = assert_json(me, StatusCode::OK).await?;
    assert_eq!(me.data.id, auth.user.id);
    Ok(())
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() -> TestResult {
    if !check_test_env().await {
        return Ok(());
    }
    let server = TestServer::start().await?;
    let (_, auth) = register(&server).await?;

    let refresh = RefreshRequest {
        refresh_token: auth.refresh_token.clone(),
    };
    let logout = server
        .post_auth("/api/v1/auth/logout", &auth.access_token, &refresh)
        .await?;
    assert_status(logout, StatusCode::NO_CONTENT).await?;

    let after = server.post("/api/v1/auth/refresh", &refresh).await?;
    assert_status(after, StatusCode::UNAUTHORIZED).await?;
    Ok(())
}

#[tokio::test]
async fn test_me_requires_auth() -> TestResult {
    if !check_test_env().await {
        return Ok(());
    }
    let server = TestServer::start().await?;

    let missing = server.get("/api/v1/auth/me").await?;
    assert_eq!(
        error_code(missing, StatusCode::UNAUTHORIZED).await?,
        "MISSING_AUTH"
    );

    let garbage = server.get_auth("/api/v1/auth/me", "not.a.jwt").await?;
    assert_status(garbage, StatusCode::UNAUTHORIZED).await?;
    Ok(())
}

// ============================================================================
// Comments
// ============================================================================

#[tokio::test]
async fn test_comment_lifecycle() -> TestResult {
    if !check_test_env().await {
        return Ok(());
    }
    let server = TestServer::start().await?;
    let (author, auth) = register(&server).await?;
    let (_, other) = register(&server).await?;

    let comment = create_comment(
        &server,
        &auth.access_token,
        &CreateCommentRequest::top_level("  First!  "),
    )
    .await?;
    assert_eq!(comment.content, "First!");
    assert_eq!(comment.author.username, author.username);
    assert_eq!(comment.parent_comment, None);
    assert_eq!(comment.likes_count, 0);
    assert!(!comment.is_edited);

    let path = format!("/api/v1/comments/{}", comment.id);

    let forbidden = server
        .put_auth(
            &path,
            &other.access_token,
            &UpdateCommentRequest {
                content: "hijacked".into(),
            },
        )
        .await?;
    assert_eq!(
        error_code(forbidden, StatusCode::FORBIDDEN).await?,
        "NOT_COMMENT_AUTHOR"
    );

    let updated = server
        .put_auth(
            &path,
            &auth.access_token,
            &UpdateCommentRequest {
                content: "Edited".into(),
            },
        )
        .await?;
    let updated: Data<CommentResponse> = assert_json(updated, StatusCode::OK).await?;
    assert_eq!(updated.data.content, "Edited");
    assert!(updated.data.is_edited);

    let fetched: Data<CommentResponse> =
        assert_json(server.get(&path).await?, StatusCode::OK).await?;
    assert_eq!(fetched.data.content, "Edited");

    let denied = server.delete_auth(&path, &other.access_token).await?;
    assert_status(denied, StatusCode::FORBIDDEN).await?;

    let deleted = server.delete_auth(&path, &auth.access_token).await?;
    assert_status(deleted, StatusCode::NO_CONTENT).await?;

    let gone = server.get(&path).await?;
    assert_eq!(
        error_code(gone, StatusCode::NOT_FOUND).await?,
        "UNKNOWN_COMMENT"
    );
    Ok(())
}

#[tokio::test]
async fn test_create_comment_errors() -> TestResult {
    if !check_test_env().await {
        return Ok(());
    }
    let server = TestServer::start().await?;
    let (_, auth) = register(&server).await?;

    let anonymous = server
        .post("/api/v1/comments", &CreateCommentRequest::top_level("hi"))
        .await?;
    assert_status(anonymous, StatusCode::UNAUTHORIZED).await?;

    let blank = server
        .post_auth(
            "/api/v1/comments",
            &auth.access_token,
            &CreateCommentRequest::top_level("   "),
        )
        .await?;
    assert_status(blank, StatusCode::BAD_REQUEST).await?;

    let orphan = server
        .post_auth(
            "/api/v1/comments",
            &auth.access_token,
            &CreateCommentRequest::reply("hi", "1"),
        )
        .await?;
    assert_eq!(
        error_code(orphan, StatusCode::NOT_FOUND).await?,
        "UNKNOWN_PARENT_COMMENT"
    );

    let bad_id = server.get("/api/v1/comments/not-a-number").await?;
    assert_eq!(
        error_code(bad_id, StatusCode::BAD_REQUEST).await?,
        "INVALID_PATH_PARAMETER"
    );
    Ok(())
}

#[tokio::test]
async fn test_replies_are_two_levels_deep() -> TestResult {
    if !check_test_env().await {
        return Ok(());
    }
    let server = TestServer::start().await?;
    let (_, auth) = register(&server).await?;
    let token = &auth.access_token;

    let root = create_comment(&server, token, &CreateCommentRequest::top_level("root")).await?;
    let reply = create_comment(&server, token, &CreateCommentRequest::reply("reply", &root.id))
        .await?;
    assert_eq!(reply.parent_comment.as_deref(), Some(root.id.as_str()));

    let nested = server
        .post_auth(
            "/api/v1/comments",
            token,
            &CreateCommentRequest::reply("too deep", &reply.id),
        )
        .await?;
    assert_eq!(
        error_code(nested, StatusCode::BAD_REQUEST).await?,
        "NESTED_REPLY"
    );

    let root: Data<CommentResponse> = assert_json(
        server.get(&format!("/api/v1/comments/{}", root.id)).await?,
        StatusCode::OK,
    )
    .await?;
    assert_eq!(root.data.replies_count, 1);

    // Deleting the root removes its replies
    let deleted = server
        .delete_auth(&format!("/api/v1/comments/{}", root.data.id), token)
        .await?;
    assert_status(deleted, StatusCode::NO_CONTENT).await?;
    let reply_gone = server.get(&format!("/api/v1/comments/{}", reply.id)).await?;
    assert_status(reply_gone, StatusCode::NOT_FOUND).await?;
    Ok(())
}

#[tokio::test]
async fn test_list_replies_paginates() -> TestResult {
    if !check_test_env().await {
        return Ok(());
    }
    let server = TestServer::start().await?;
    let (_, auth) = register(&server).await?;
    let token = &auth.access_token;

    let root = create_comment(&server, token, &CreateCommentRequest::top_level("thread")).await?;
    for i in 0..5 {
        create_comment(
            &server,
            token,
            &CreateCommentRequest::reply(&format!("reply {i}"), &root.id),
        )
        .await?;
    }

    let first: Page<CommentResponse> = assert_json(
        server
            .get(&format!(
                "/api/v1/comments?parentComment={}&limit=2&sort=oldest",
                root.id
            ))
            .await?,
        StatusCode::OK,
    )
    .await?;
    assert_eq!(first.data.len(), 2);
    assert_eq!(first.data[0].content, "reply 0");
    assert_eq!(first.pagination.page, 1);
    assert_eq!(first.pagination.limit, 2);
    assert_eq!(first.pagination.total, 5);
    assert_eq!(first.pagination.total_pages, 3);
    assert!(first.pagination.has_next);
    assert!(!first.pagination.has_prev);

    let last: Page<CommentResponse> = assert_json(
        server
            .get(&format!(
                "/api/v1/comments?parentComment={}&limit=2&page=3&sort=oldest",
                root.id
            ))
            .await?,
        StatusCode::OK,
    )
    .await?;
    assert_eq!(last.data.len(), 1);
    assert_eq!(last.data[0].content, "reply 4");
    assert!(!last.pagination.has_next);
    assert!(last.pagination.has_prev);
    Ok(())
}

#[tokio::test]
async fn test_list_top_level_excludes_replies() -> TestResult {
    if !check_test_env().await {
        return Ok(());
    }
    let server = TestServer::start().await?;
    let (_, auth) = register(&server).await?;
    let token = &auth.access_token;

    let root = create_comment(&server, token, &CreateCommentRequest::top_level("top")).await?;
    let reply = create_comment(&server, token, &CreateCommentRequest::reply("under", &root.id))
        .await?;

    let page: Page<CommentResponse> = assert_json(
        server
            .get("/api/v1/comments?parentComment=null&sort=newest&limit=100")
            .await?,
        StatusCode::OK,
    )
    .await?;
    assert!(page.data.iter().all(|c| c.parent_comment.is_none()));
    assert!(page.data.iter().any(|c| c.id == root.id));
    assert!(page.data.iter().all(|c| c.id != reply.id));
    Ok(())
}

#[tokio::test]
async fn test_list_rejects_bad_query() -> TestResult {
    if !check_test_env().await {
        return Ok(());
    }
    let server = TestServer::start().await?;

    for query in ["page=0", "page=abc", "limit=0", "sort=sideways"] {
        let response = server.get(&format!("/api/v1/comments?{query}")).await?;
        assert_eq!(
            error_code(response, StatusCode::BAD_REQUEST).await?,
            "INVALID_QUERY_PARAMETER",
            "query {query}"
        );
    }

    // Replies of a comment that does not exist are simply an empty page
    let missing_parent: Page<CommentResponse> = assert_json(
        server.get("/api/v1/comments?parentComment=1").await?,
        StatusCode::OK,
    )
    .await?;
    assert!(missing_parent.data.is_empty());
    assert_eq!(missing_parent.pagination.total, 0);
    Ok(())
}

// ============================================================================
// Reactions
// ============================================================================

#[tokio::test]
async fn test_reaction_toggle_walkthrough() -> TestResult {
    if !check_test_env().await {
        return Ok(());
    }
    let server = TestServer::start().await?;
    let (_, author) = register(&server).await?;
    let (_, reader) = register(&server).await?;

    let comment = create_comment(
        &server,
        &author.access_token,
        &CreateCommentRequest::top_level("react to me"),
    )
    .await?;
    let token = &reader.access_token;

    let liked = react(&server, token, &comment.id, "like").await?;
    assert_eq!((liked.likes_count, liked.dislikes_count), (1, 0));
    assert_eq!(liked.user_reaction.as_deref(), Some("like"));

    // Liking again withdraws the like
    let cleared = react(&server, token, &comment.id, "like").await?;
    assert_eq!((cleared.likes_count, cleared.dislikes_count), (0, 0));
    assert_eq!(cleared.user_reaction, None);

    react(&server, token, &comment.id, "like").await?;
    let switched = react(&server, token, &comment.id, "dislike").await?;
    assert_eq!((switched.likes_count, switched.dislikes_count), (0, 1));
    assert_eq!(switched.user_reaction.as_deref(), Some("dislike"));

    // The caller sees their reaction; anonymous readers never do
    let mine: Data<CommentResponse> = assert_json(
        server
            .get_auth(&format!("/api/v1/comments/{}", comment.id), token)
            .await?,
        StatusCode::OK,
    )
    .await?;
    assert_eq!(mine.data.user_reaction.as_deref(), Some("dislike"));

    let anonymous: Data<CommentResponse> = assert_json(
        server
            .get(&format!("/api/v1/comments/{}", comment.id))
            .await?,
        StatusCode::OK,
    )
    .await?;
    assert_eq!(anonymous.data.user_reaction, None);
    assert_eq!(anonymous.data.dislikes_count, 1);
    Ok(())
}

#[tokio::test]
async fn test_react_to_missing_comment() -> TestResult {
    if !check_test_env().await {
        return Ok(());
    }
    let server = TestServer::start().await?;
    let (_, auth) = register(&server).await?;

    let response = server
        .post_empty("/api/v1/comments/1/like", &auth.access_token)
        .await?;
    assert_eq!(
        error_code(response, StatusCode::NOT_FOUND).await?,
        "UNKNOWN_COMMENT"
    );
    Ok(())
}

#[tokio::test]
async fn test_concurrent_likes_are_counted_once_each() -> TestResult {
    if !check_test_env().await {
        return Ok(());
    }
    let server = TestServer::start().await?;
    let (_, author) = register(&server).await?;
    let comment = create_comment(
        &server,
        &author.access_token,
        &CreateCommentRequest::top_level("popular"),
    )
    .await?;

    let mut tokens = Vec::new();
    for _ in 0..8 {
        tokens.push(register(&server).await?.1.access_token);
    }

    let results = futures::future::join_all(
        tokens
            .iter()
            .map(|token| react(&server, token, &comment.id, "like")),
    )
    .await;
    for result in results {
        result?;
    }

    let fetched: Data<CommentResponse> = assert_json(
        server
            .get(&format!("/api/v1/comments/{}", comment.id))
            .await?,
        StatusCode::OK,
    )
    .await?;
    assert_eq!(fetched.data.likes_count, 8);
    assert_eq!(fetched.data.dislikes_count, 0);
    Ok(())
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_update_profile() -> TestResult {
    if !check_test_env().await {
        return Ok(());
    }
    let server = TestServer::start().await?;
    let (_, auth) = register(&server).await?;
    let (taken, _) = register(&server).await?;

    let new_name = RegisterRequest::unique().username;
    let response = server
        .put_auth(
            "/api/v1/users/profile",
            &auth.access_token,
            &UpdateProfileRequest {
                username: Some(new_name.clone()),
                email: None,
            },
        )
        .await?;
    let updated: Data<UserResponse> = assert_json(response, StatusCode::OK).await?;
    assert_eq!(updated.data.username, new_name);

    let conflict = server
        .put_auth(
            "/api/v1/users/profile",
            &auth.access_token,
            &UpdateProfileRequest {
                username: Some(taken.username),
                email: None,
            },
        )
        .await?;
    assert_eq!(
        error_code(conflict, StatusCode::CONFLICT).await?,
        "USERNAME_ALREADY_EXISTS"
    );

    let empty = server
        .put_auth(
            "/api/v1/users/profile",
            &auth.access_token,
            &UpdateProfileRequest::default(),
        )
        .await?;
    assert_status(empty, StatusCode::BAD_REQUEST).await?;
    Ok(())
}

#[tokio::test]
async fn test_deactivate_blocks_access() -> TestResult {
    if !check_test_env().await {
        return Ok(());
    }
    let server = TestServer::start().await?;
    let (request, auth) = register(&server).await?;

    let response = server
        .put_empty("/api/v1/users/deactivate", &auth.access_token)
        .await?;
    assert_status(response, StatusCode::NO_CONTENT).await?;

    let me = server.get_auth("/api/v1/auth/me", &auth.access_token).await?;
    assert_eq!(
        error_code(me, StatusCode::FORBIDDEN).await?,
        "ACCOUNT_DEACTIVATED"
    );

    let login = server.post("/api/v1/auth/login", &request.login()).await?;
    assert_status(login, StatusCode::FORBIDDEN).await?;

    let refresh = server
        .post(
            "/api/v1/auth/refresh",
            &RefreshRequest {
                refresh_token: auth.refresh_token,
            },
        )
        .await?;
    assert_status(refresh, StatusCode::UNAUTHORIZED).await?;
    Ok(())
}

#[tokio::test]
async fn test_delete_account_removes_comments_and_reactions() -> TestResult {
    if !check_test_env().await {
        return Ok(());
    }
    let server = TestServer::start().await?;
    let (_, author) = register(&server).await?;
    let (_, leaving) = register(&server).await?;

    let kept = create_comment(
        &server,
        &author.access_token,
        &CreateCommentRequest::top_level("stays"),
    )
    .await?;
    let doomed = create_comment(
        &server,
        &leaving.access_token,
        &CreateCommentRequest::top_level("goes"),
    )
    .await?;
    react(&server, &leaving.access_token, &kept.id, "like").await?;

    let response = server
        .delete_auth("/api/v1/users/account", &leaving.access_token)
        .await?;
    assert_status(response, StatusCode::NO_CONTENT).await?;

    let gone = server
        .get(&format!("/api/v1/comments/{}", doomed.id))
        .await?;
    assert_status(gone, StatusCode::NOT_FOUND).await?;

    let kept: Data<CommentResponse> = assert_json(
        server.get(&format!("/api/v1/comments/{}", kept.id)).await?,
        StatusCode::OK,
    )
    .await?;
    assert_eq!(kept.data.likes_count, 0);

    let me = server
        .get_auth("/api/v1/auth/me", &leaving.access_token)
        .await?;
    assert_status(me, StatusCode::UNAUTHORIZED).await?;
    Ok(())
}
