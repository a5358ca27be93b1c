//! Axum-based HTTP server.

use std::future::Future;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use verity_store::{ArticleRecord, VoteStore};
use verity_types::{ContentRef, Timestamp};
use verity_verification::{
    ArticleDraft, ArticleEngine, UserRegistry, VerificationError, VoteKind,
};

use crate::error::RpcError;
use crate::handlers::{
    ArticleResponse, ArticleView, CreateArticleRequest, LoginRequest, MessageResponse,
    RealVoteRequest, RegisterRequest, SpamVoteRequest, UpdateStakeRequest, UserResponse,
};
use crate::metrics::RpcMetrics;

/// Everything a request handler needs.
pub struct AppState<S> {
    pub engine: ArticleEngine<S>,
    pub users: UserRegistry<S>,
    pub metrics: Option<RpcMetrics>,
}

impl<S: VoteStore> AppState<S> {
    pub fn new(store: Arc<S>, params: verity_types::VotingParams) -> Self {
        Self {
            engine: ArticleEngine::new(store.clone(), params),
            users: UserRegistry::new(store),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: RpcMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    fn observe_vote(
        &self,
        kind: VoteKind,
        result: Result<ArticleRecord, VerificationError>,
    ) -> Result<ArticleRecord, RpcError> {
        if let Some(m) = &self.metrics {
            match &result {
                Ok(_) => m.votes_accepted.with_label_values(&[kind.as_str()]).inc(),
                Err(VerificationError::Denied(reason)) => {
                    m.votes_denied.with_label_values(&[reason.as_str()]).inc()
                }
                Err(_) => {}
            }
        }
        Ok(result?)
    }
}

type Shared<S> = State<Arc<AppState<S>>>;

/// Build the application router.
pub fn router<S: VoteStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/running", get(running))
        .route("/metrics", get(metrics::<S>))
        .route(
            "/article/",
            post(create_article::<S>).get(list_articles::<S>),
        )
        .route(
            "/article/journalist/:journalist",
            get(articles_by_journalist::<S>),
        )
        .route("/article/:content_hash", get(get_article::<S>))
        .route("/article/s/:content_hash", put(real_vote::<S>))
        .route("/article/r/:content_hash", put(spam_vote::<S>))
        .route("/article/v/:content_hash", put(verify_article::<S>))
        .route(
            "/article/reset-update/:content_hash",
            put(reset_update::<S>),
        )
        .route("/users/register", post(register_user::<S>))
        .route("/users/login", post(login_user::<S>))
        .route("/users/update-stake", put(update_stake::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub struct RpcServer<S> {
    pub host: String,
    pub port: u16,
    pub state: Arc<AppState<S>>,
}

impl<S: VoteStore + 'static> RpcServer<S> {
    pub fn new(host: impl Into<String>, port: u16, state: Arc<AppState<S>>) -> Self {
        Self {
            host: host.into(),
            port,
            state,
        }
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn start<F>(self, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!(addr = %listener.local_addr()?, "HTTP API listening");
        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("HTTP API stopped");
        Ok(())
    }
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, RpcError> {
    payload
        .map(|Json(v)| v)
        .map_err(|rejection| RpcError::InvalidRequest(rejection.body_text()))
}

/// Run engine work on the blocking pool so store I/O never stalls the
/// runtime's worker threads.
async fn blocking<S, T, F>(state: &Arc<AppState<S>>, work: F) -> Result<T, RpcError>
where
    S: VoteStore + 'static,
    T: Send + 'static,
    F: FnOnce(&AppState<S>) -> Result<T, RpcError> + Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || work(&state)).await?
}

fn content_ref(raw: &str) -> Result<ContentRef, RpcError> {
    ContentRef::parse(raw).map_err(|e| RpcError::from(VerificationError::from(e)))
}

// ── Service ──────────────────────────────────────────────────────────────

async fn running() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Verity service is running".to_string(),
    })
}

async fn metrics<S: VoteStore + 'static>(
    State(state): Shared<S>,
) -> Result<impl IntoResponse, RpcError> {
    let metrics = state.metrics.as_ref().ok_or(RpcError::MetricsDisabled)?;
    let text = metrics.encode()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        text,
    ))
}

// ── Articles ─────────────────────────────────────────────────────────────

async fn create_article<S: VoteStore + 'static>(
    State(state): Shared<S>,
    payload: Result<Json<CreateArticleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ArticleResponse>), RpcError> {
    let req = body(payload)?;
    let draft = ArticleDraft {
        title: req.article_title,
        author: req.journalist,
        content_ref: req.content_hash,
        tags: req.tags,
        evidence_refs: req.ref_images,
    };
    let article = blocking(&state, move |state| {
        Ok(state.engine.create_article(draft, Timestamp::now())?)
    })
    .await?;
    if let Some(m) = &state.metrics {
        m.articles_created.inc();
    }
    Ok((
        StatusCode::CREATED,
        Json(ArticleResponse::new("Article created successfully", article)),
    ))
}

async fn list_articles<S: VoteStore + 'static>(
    State(state): Shared<S>,
) -> Result<Json<Vec<ArticleView>>, RpcError> {
    let articles = blocking(&state, |state| Ok(state.engine.list_articles()?)).await?;
    Ok(Json(articles.into_iter().map(ArticleView::from).collect()))
}

async fn articles_by_journalist<S: VoteStore + 'static>(
    State(state): Shared<S>,
    Path(journalist): Path<String>,
) -> Result<Json<Vec<ArticleView>>, RpcError> {
    let articles = blocking(&state, move |state| {
        Ok(state.engine.articles_by_author(&journalist)?)
    })
    .await?;
    Ok(Json(articles.into_iter().map(ArticleView::from).collect()))
}

async fn get_article<S: VoteStore + 'static>(
    State(state): Shared<S>,
    Path(content_hash): Path<String>,
) -> Result<Json<ArticleView>, RpcError> {
    let cref = content_ref(&content_hash)?;
    let article = blocking(&state, move |state| Ok(state.engine.find_article(&cref)?)).await?;
    Ok(Json(article.into()))
}

async fn real_vote<S: VoteStore + 'static>(
    State(state): Shared<S>,
    Path(content_hash): Path<String>,
    payload: Result<Json<RealVoteRequest>, JsonRejection>,
) -> Result<Json<ArticleResponse>, RpcError> {
    let req = body(payload)?;
    let cref = content_ref(&content_hash)?;
    let article = blocking(&state, move |state| {
        let result = state.engine.cast_real_vote(&cref, &req.wallet_address);
        state.observe_vote(VoteKind::Real, result)
    })
    .await?;
    Ok(Json(ArticleResponse::new("Vote added as validated", article)))
}

async fn spam_vote<S: VoteStore + 'static>(
    State(state): Shared<S>,
    Path(content_hash): Path<String>,
    payload: Result<Json<SpamVoteRequest>, JsonRejection>,
) -> Result<Json<ArticleResponse>, RpcError> {
    let req = body(payload)?;
    let cref = content_ref(&content_hash)?;
    let article = blocking(&state, move |state| {
        let result = state
            .engine
            .cast_spam_vote(&cref, &req.wallet_address, &req.spam_string);
        state.observe_vote(VoteKind::Spam, result)
    })
    .await?;
    Ok(Json(ArticleResponse::new("Article reported as spam", article)))
}

async fn verify_article<S: VoteStore + 'static>(
    State(state): Shared<S>,
    Path(content_hash): Path<String>,
) -> Result<Json<ArticleResponse>, RpcError> {
    let cref = content_ref(&content_hash)?;
    let (outcome, article) = blocking(&state, move |state| Ok(state.engine.verify(&cref)?)).await?;
    if let Some(m) = &state.metrics {
        m.verifications.with_label_values(&[outcome.as_str()]).inc();
    }
    Ok(Json(ArticleResponse::new(outcome.message(), article)))
}

async fn reset_update<S: VoteStore + 'static>(
    State(state): Shared<S>,
    Path(content_hash): Path<String>,
) -> Result<Json<ArticleResponse>, RpcError> {
    let cref = content_ref(&content_hash)?;
    let outcome = blocking(&state, move |state| Ok(state.engine.resolve_update(&cref)?)).await?;
    if outcome.was_removed() {
        if let Some(m) = &state.metrics {
            m.articles_removed.inc();
        }
    }
    let message = outcome.message();
    Ok(Json(ArticleResponse::new(message, outcome.into_article())))
}

// ── Users ────────────────────────────────────────────────────────────────

async fn register_user<S: VoteStore + 'static>(
    State(state): Shared<S>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), RpcError> {
    let req = body(payload)?;
    let user = blocking(&state, move |state| {
        Ok(state
            .users
            .register(&req.wallet_address, &req.uname, Timestamp::now())?)
    })
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(UserResponse::new("User registered successfully", user)),
    ))
}

async fn login_user<S: VoteStore + 'static>(
    State(state): Shared<S>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, RpcError> {
    let req = body(payload)?;
    let user = blocking(&state, move |state| Ok(state.users.login(&req.wallet_address)?)).await?;
    Ok(Json(UserResponse::new("User logged in successfully", user)))
}

async fn update_stake<S: VoteStore + 'static>(
    State(state): Shared<S>,
    payload: Result<Json<UpdateStakeRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, RpcError> {
    let req = body(payload)?;
    let user = blocking(&state, move |state| {
        Ok(state.users.update_stake(&req.wallet_address, req.dnt_stake)?)
    })
    .await?;
    Ok(Json(UserResponse::new("User stake updated successfully", user)))
}
