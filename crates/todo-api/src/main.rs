//! todo-api バイナリのエントリポイント
//! MongoDB に接続して HTTP サーバを起動します。

use anyhow::{anyhow, Context};
use infrastructure::{MongoDbClient, MongoTodoRepository};
use shared::{init_tracing, Config};
use std::sync::Arc;
use todo_api::{app_with_state, cors_layer, AppState};
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env があれば読み込む（なくてもよい）
    dotenvy::dotenv().ok();

    init_tracing().map_err(|e| anyhow!("failed to initialize tracing: {e}"))?;

    let config = Config::from_env().context("failed to load configuration")?;
    tracing::info!(
        environment = %config.environment,
        database = %config.mongo_database,
        collection = %config.mongo_collection,
        "設定を読み込みました"
    );

    let client = MongoDbClient::connect(&config)
        .await
        .context("failed to connect to MongoDB")?;
    let repo = Arc::new(MongoTodoRepository::new(&client));

    let cors = cors_layer(&config.cors_origin).context("invalid CORS_ORIGIN")?;
    let router = app_with_state(AppState::new(repo)).layer(cors);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "server starting");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl+C ハンドラの登録に失敗");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM ハンドラの登録に失敗");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("シャットダウンを開始します");
}
