use crate::errors::StoreError;
use crate::models::TodoDocument;
use mongodb::{bson::doc, Client, Collection, Database, IndexModel};
use shared::Config;
use std::time::Duration;

/// 起動時の接続確認に使うタイムアウト
const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Clone)]
pub struct MongoDbClient {
    database: Database,
    collection_name: String,
}

impl MongoDbClient {
    /// 接続文字列からクライアントを作成し、ping と索引作成まで済ませる
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        tracing::debug!(database = %config.mongo_database, "MongoDB クライアントを作成します");

        let client = tokio::time::timeout(CONNECT_TIMEOUT, Client::with_uri_str(&config.mongo_uri))
            .await
            .map_err(|_| StoreError::Unavailable("mongodb connect timeout".to_string()))??;
        let database = client.database(&config.mongo_database);

        let db = Self {
            database,
            collection_name: config.mongo_collection.clone(),
        };

        tokio::time::timeout(CONNECT_TIMEOUT, db.ping())
            .await
            .map_err(|_| StoreError::Unavailable("mongodb ping timeout".to_string()))??;

        tokio::time::timeout(CONNECT_TIMEOUT, db.setup_collection())
            .await
            .map_err(|_| StoreError::Unavailable("index creation timeout".to_string()))??;

        tracing::info!(
            database = %config.mongo_database,
            collection = %config.mongo_collection,
            "MongoDB に接続しました"
        );

        Ok(db)
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }

    /// 一覧・絞り込みのソートキー `updatedAt` に降順索引を張る
    pub async fn setup_collection(&self) -> Result<(), StoreError> {
        self.todos()
            .create_index(
                IndexModel::builder().keys(doc! { "updatedAt": -1 }).build(),
                None,
            )
            .await?;
        Ok(())
    }

    pub fn todos(&self) -> Collection<TodoDocument> {
        self.database.collection(&self.collection_name)
    }
}
