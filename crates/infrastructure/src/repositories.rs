use crate::errors::StoreError;
use crate::models::{parse_object_id, patch_to_update, TodoDocument};
use crate::mongo::MongoDbClient;
use crate::pipeline::{build_filter_pipeline, parse_facet_result, sort_newest_first};
use async_trait::async_trait;
use bson::doc;
use chrono::Utc;
use domain::{FilteredTodos, NewTodo, Todo, TodoFilter, TodoId, TodoPatch};
use futures::TryStreamExt;
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::Collection;
use tracing::{debug, instrument};

/// Todo のデータアクセス抽象
///
/// 「存在しない」は `Ok(None)` で返し、ドメインエラーへの変換はサービス層が行う。
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// 新規作成（ID・タイムスタンプはここで採番）
    async fn create(&self, input: NewTodo) -> Result<Todo, StoreError>;
    /// 全件を `updatedAt` 降順で取得
    async fn find_all(&self) -> Result<Vec<Todo>, StoreError>;
    /// ID で取得。不正な形式の ID は None
    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StoreError>;
    /// 指定フィールドのみ更新し、更新後の値を返す
    async fn update(&self, id: &TodoId, patch: TodoPatch) -> Result<Option<Todo>, StoreError>;
    /// 削除し、削除した値を返す
    async fn delete(&self, id: &TodoId) -> Result<Option<Todo>, StoreError>;
    /// 絞り込み + ページング（総件数も同時に返す）
    async fn filter(&self, filter: &TodoFilter) -> Result<FilteredTodos, StoreError>;
}

/// MongoDB 実装
#[derive(Clone)]
pub struct MongoTodoRepository {
    collection: Collection<TodoDocument>,
}

impl MongoTodoRepository {
    pub fn new(db: &MongoDbClient) -> Self {
        Self {
            collection: db.todos(),
        }
    }
}

#[async_trait]
impl TodoRepository for MongoTodoRepository {
    #[instrument(skip(self, input))]
    async fn create(&self, input: NewTodo) -> Result<Todo, StoreError> {
        let document = TodoDocument::from_new(input, Utc::now());
        self.collection.insert_one(&document, None).await?;

        debug!(todo_id = %document.id, "Todo を作成しました");
        Ok(document.into_domain())
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        let options = FindOptions::builder()
            .sort(sort_newest_first())
            .build();

        let documents: Vec<TodoDocument> = self
            .collection
            .find(doc! {}, options)
            .await?
            .try_collect()
            .await?;

        Ok(documents.into_iter().map(TodoDocument::into_domain).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        let Some(oid) = parse_object_id(id) else {
            debug!(todo_id = %id, "不正な形式の ID");
            return Ok(None);
        };

        let document = self.collection.find_one(doc! { "_id": oid }, None).await?;
        Ok(document.map(TodoDocument::into_domain))
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: &TodoId, patch: TodoPatch) -> Result<Option<Todo>, StoreError> {
        let Some(oid) = parse_object_id(id) else {
            debug!(todo_id = %id, "不正な形式の ID");
            return Ok(None);
        };

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let document = self
            .collection
            .find_one_and_update(doc! { "_id": oid }, patch_to_update(&patch, Utc::now()), options)
            .await?;
        Ok(document.map(TodoDocument::into_domain))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        let Some(oid) = parse_object_id(id) else {
            debug!(todo_id = %id, "不正な形式の ID");
            return Ok(None);
        };

        let document = self
            .collection
            .find_one_and_delete(doc! { "_id": oid }, None)
            .await?;
        Ok(document.map(TodoDocument::into_domain))
    }

    #[instrument(skip(self))]
    async fn filter(&self, filter: &TodoFilter) -> Result<FilteredTodos, StoreError> {
        let mut cursor = self
            .collection
            .aggregate(build_filter_pipeline(filter), None)
            .await?;

        // $facet は常に 1 ドキュメントを返す
        let result = cursor.try_next().await?;
        Ok(parse_facet_result(filter, result)?)
    }
}
