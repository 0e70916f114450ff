//! MongoDB を使った統合テスト
//!
//! `MONGO_TEST_URI` が設定されている場合のみ実行する（例: mongodb://localhost:27017）。
//! テストごとに専用のコレクションを作成し、終了時に削除する。

use domain::{NewTodo, TodoFilter, TodoId, TodoPatch};
use infrastructure::{MongoDbClient, MongoTodoRepository, TodoRepository};
use shared::Config;
use std::collections::HashSet;
use std::time::Duration;

/// 統合テスト用のセットアップ
async fn setup_test_environment() -> Option<(MongoDbClient, MongoTodoRepository)> {
    let Ok(uri) = std::env::var("MONGO_TEST_URI") else {
        println!("MONGO_TEST_URI 未設定のためスキップ");
        return None;
    };

    let config = Config {
        mongo_uri: uri,
        mongo_database: "todoDB_test".to_string(),
        mongo_collection: format!("todos_{}", bson::oid::ObjectId::new().to_hex()),
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origin: "http://localhost:3000".to_string(),
        environment: "test".to_string(),
    };
    let client = MongoDbClient::connect(&config)
        .await
        .expect("テスト用MongoDBクライアントの作成に失敗");
    let repo = MongoTodoRepository::new(&client);

    Some((client, repo))
}

async fn teardown(client: &MongoDbClient) {
    client.todos().drop(None).await.expect("コレクション削除に失敗");
}

#[tokio::test]
async fn test_crud_round_trip() {
    let Some((client, repo)) = setup_test_environment().await else {
        return;
    };

    // 作成
    let created = repo
        .create(NewTodo::new("Buy groceries").with_description("Milk, Bread, and Eggs"))
        .await
        .unwrap();
    assert_eq!(created.title, "Buy groceries");
    assert!(!created.completed);

    // 取得
    let found = repo.find_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(found, created);

    // 部分更新
    tokio::time::sleep(Duration::from_millis(5)).await;
    let updated = repo
        .update(
            &created.id,
            TodoPatch {
                completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(updated.completed);
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.description, created.description);
    assert!(updated.updated_at > created.updated_at);

    // 削除
    let deleted = repo.delete(&created.id).await.unwrap().unwrap();
    assert_eq!(deleted.id, created.id);
    assert!(repo.find_by_id(&created.id).await.unwrap().is_none());

    teardown(&client).await;
}

#[tokio::test]
async fn test_malformed_and_unknown_ids_are_not_found() {
    let Some((client, repo)) = setup_test_environment().await else {
        return;
    };

    let malformed = TodoId::from_string("xyz".to_string());
    let unknown = TodoId::from_string(bson::oid::ObjectId::new().to_hex());

    for id in [&malformed, &unknown] {
        assert!(repo.find_by_id(id).await.unwrap().is_none());
        assert!(repo
            .update(
                id,
                TodoPatch {
                    title: Some("x".to_string()),
                    ..Default::default()
                }
            )
            .await
            .unwrap()
            .is_none());
        assert!(repo.delete(id).await.unwrap().is_none());
    }

    teardown(&client).await;
}

#[tokio::test]
async fn test_filter_facet_pagination_and_matching() {
    let Some((client, repo)) = setup_test_environment().await else {
        return;
    };

    for i in 0..15 {
        let title = if i % 3 == 0 {
            format!("Buy GROCERIES #{i}")
        } else {
            format!("Chore #{i}")
        };
        repo.create(NewTodo::new(title).with_completed(i % 2 == 0))
            .await
            .unwrap();
    }

    let first = repo.filter(&TodoFilter::new(1, 10)).await.unwrap();
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total, 15);
    assert_eq!(first.pages, 2);

    let second = repo.filter(&TodoFilter::new(2, 10)).await.unwrap();
    assert_eq!(second.items.len(), 5);

    // 同じ updatedAt が並んでもページ間で重複・欠落しない
    let ids: HashSet<&str> = first
        .items
        .iter()
        .chain(second.items.iter())
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(ids.len(), 15);

    let groceries = repo
        .filter(&TodoFilter::default().with_title("groceries"))
        .await
        .unwrap();
    assert_eq!(groceries.total, 5);
    assert!(groceries
        .items
        .iter()
        .all(|t| t.title.to_lowercase().contains("groceries")));

    let done = repo
        .filter(&TodoFilter::default().with_completed(true))
        .await
        .unwrap();
    assert_eq!(done.total, 8);
    assert!(done.items.iter().all(|t| t.completed));

    // 正規表現のメタ文字はそのまま部分文字列として扱う
    let literal = repo
        .filter(&TodoFilter::default().with_title(".*"))
        .await
        .unwrap();
    assert_eq!(literal.total, 0);

    let newest_first = repo.find_all().await.unwrap();
    assert!(newest_first.windows(2).all(|w| {
        w[0].updated_at > w[1].updated_at
            || (w[0].updated_at == w[1].updated_at && w[0].id.as_str() > w[1].id.as_str())
    }));

    teardown(&client).await;
}
