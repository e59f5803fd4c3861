//! MCP server initialization for stdio and streamable HTTP transports.
//!
//! [`serve_stdio`] and [`serve_http`] open the database, build the engine
//! facade and hand both to the [`AnimaTools`] handler.

use anima::config::AnimaConfig;
use anima::db;
use anima::engine::Anima;
use anima::memory::keywords::STEMMER_ID;
use anyhow::Result;
use rmcp::ServiceExt;
use std::sync::{Arc, Mutex};

use crate::tools::AnimaTools;

type SharedState = (Arc<Mutex<rusqlite::Connection>>, Arc<Anima>, Arc<AnimaConfig>);

/// Open the DB and build the engine. Returns everything wrapped in Arc for sharing.
fn setup_shared_state(config: AnimaConfig) -> Result<SharedState> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    tracing::info!(db = %db_path.display(), "database ready");

    match db::migrations::get_keyword_stemmer(&conn) {
        Ok(Some(stemmer)) if stemmer != STEMMER_ID => {
            tracing::warn!(
                stored = %stemmer,
                current = STEMMER_ID,
                "stored auto_keywords were produced by a different stemmer"
            );
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "could not read keyword stemmer"),
    }

    let anima = Arc::new(Anima::new(&config));
    Ok((Arc::new(Mutex::new(conn)), anima, Arc::new(config)))
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: AnimaConfig) -> Result<()> {
    tracing::info!("starting anima MCP server on stdio");

    let (db, anima, config) = setup_shared_state(config)?;

    let tools = AnimaTools::new(db, anima, config);
    let server = tools.serve(rmcp::transport::stdio()).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}

/// Start the MCP server over Streamable HTTP, mounted at `/mcp`.
pub async fn serve_http(config: AnimaConfig) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(addr = %bind_addr, "starting anima MCP server on HTTP");

    let (db, anima, config) = setup_shared_state(config)?;

    let service = rmcp::transport::streamable_http_server::StreamableHttpService::new(
        move || Ok(AnimaTools::new(db.clone(), anima.clone(), config.clone())),
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default()
            .into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "MCP server listening at http://{bind_addr}/mcp");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
