use std::{future::Future, net::TcpListener, sync::Arc, time::Duration};

use axum::{
    extract::RawQuery,
    http::{header, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use tokio::{sync::oneshot, time::timeout};
use tracing::Instrument;

use crate::browser;
use crate::config::BrowseConfig;
use crate::error::{BrowseError, Result};
use crate::parse::parse;
use crate::query::{NinjaQuery, SharedQuery};
use crate::render::{render, render_error};
use crate::url_encode_path::{target_href, url_decode_path};

/// Build the request router.  A GET gets one of three answers: a redirect
/// from `/` to the default target, a node page for `/?<target>`, or an empty
/// 404 for any other path.  Other methods get a 405.
pub fn build_router(config: Arc<BrowseConfig>, query: SharedQuery) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .fallback(handle_fallback)
        .layer(Extension(config))
        .layer(Extension(query))
}

async fn handle_root(
    config: Extension<Arc<BrowseConfig>>,
    query: Extension<SharedQuery>,
    RawQuery(raw): RawQuery,
) -> Response {
    let target = match raw {
        Some(raw) if !raw.is_empty() => url_decode_path(&raw),
        _ => {
            return (
                StatusCode::FOUND,
                [(header::LOCATION, target_href(&config.default_target))],
            )
                .into_response();
        }
    };

    let span = info_span!("browse", node = %target);
    match browse(&query.0, &target).instrument(span).await {
        Ok(html) => Html(html).into_response(),
        Err(err) => error_response(&target, err),
    }
}

async fn handle_fallback(method: Method) -> StatusCode {
    if method == Method::GET || method == Method::HEAD {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::METHOD_NOT_ALLOWED
    }
}

/// Query, parse and render one node.
pub async fn browse(query: &SharedQuery, target: &str) -> Result<String> {
    let text = query.query(target).await?;
    let record = parse(&text)?;
    debug!(
        inputs = record.inputs.len(),
        output_groups = record.outputs.len(),
        "parsed query output"
    );
    Ok(render(&record))
}

/// Turn a failure into a page scoped to this one request.
fn error_response(target: &str, err: BrowseError) -> Response {
    let (status, heading) = match &err {
        BrowseError::RouteNotFound => return StatusCode::NOT_FOUND.into_response(),
        BrowseError::UnknownTarget(_) => (StatusCode::NOT_FOUND, "unknown target"),
        BrowseError::MalformedOutput(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "could not understand the query output",
        ),
        BrowseError::QueryToolFailure { .. } => (StatusCode::BAD_GATEWAY, "query failed"),
        BrowseError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal error"),
    };
    warn!(node = target, %err, status = status.as_u16(), "request failed");

    let page = render_error(target, heading, &err.to_string());
    (status, Html(page)).into_response()
}

/// How long in-flight requests get to finish once shutdown starts.  A hung
/// query tool would otherwise keep the process alive forever.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        // Leave the prompt on a fresh line after the ^C.
        Ok(()) => println!(),
        Err(err) => {
            warn!(%err, "unable to listen for ctrl-C; serving until killed");
            std::future::pending::<()>().await;
        }
    }
}

/// Serve `app` on `listener` until `shutdown` resolves, then give in-flight
/// requests `grace` to drain before returning regardless.  Requests still
/// running at that point are dropped with the runtime, which kills their
/// query tool children.
pub async fn serve_until<S>(
    listener: TcpListener,
    app: Router,
    shutdown: S,
    grace: Duration,
) -> anyhow::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let (stopping_tx, stopping_rx) = oneshot::channel::<()>();
    let signal = async move {
        shutdown.await;
        let _ = stopping_tx.send(());
    };

    let server = axum::Server::from_tcp(listener)?
        .serve(app.into_make_service())
        .with_graceful_shutdown(signal);
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => return Ok(result?),
        _ = stopping_rx => {}
    }

    match timeout(grace, &mut server).await {
        Ok(result) => result?,
        Err(_) => warn!(
            grace_secs = grace.as_secs_f64(),
            "requests still running after shutdown grace period; exiting anyway"
        ),
    }
    Ok(())
}

/// Bind, announce, open the browser and serve until interrupted.
pub async fn serve(config: BrowseConfig) -> anyhow::Result<()> {
    let config = Arc::new(config);
    let listener = TcpListener::bind((config.hostname.as_str(), config.port))?;
    info!(addr = %listener.local_addr()?, "listening");

    let query: SharedQuery = Arc::new(NinjaQuery::new(config.clone()));
    let app = build_router(config.clone(), query);

    println!("Web server running on {}, ctrl-C to abort...", config.url());
    if config.open_browser {
        browser::open(&config.url());
    }

    serve_until(listener, app, shutdown_signal(), SHUTDOWN_GRACE).await
}
