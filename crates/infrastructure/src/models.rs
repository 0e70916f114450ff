use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use bson::{doc, Document};
use chrono::{DateTime, Utc};
use domain::{NewTodo, Todo, TodoId, TodoPatch};
use serde::{Deserialize, Serialize};

/// `todos` コレクションに保存されるドキュメント
///
/// フィールド名は `_id` / `createdAt` / `updatedAt` を使う。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl TodoDocument {
    /// 新規作成用のドキュメントを組み立てる（ID とタイムスタンプをここで採番）
    pub fn from_new(input: NewTodo, now: DateTime<Utc>) -> Self {
        Self {
            id: ObjectId::new(),
            title: input.title,
            description: input.description,
            completed: input.completed.unwrap_or(false),
            created_at: truncate_to_millis(now),
            updated_at: truncate_to_millis(now),
        }
    }

    pub fn into_domain(self) -> Todo {
        Todo {
            id: TodoId::from_string(self.id.to_hex()),
            title: self.title,
            description: self.description,
            completed: self.completed,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// 文字列 ID を ObjectId に変換する。不正な形式は None
pub fn parse_object_id(id: &TodoId) -> Option<ObjectId> {
    ObjectId::parse_str(id.as_str()).ok()
}

/// 部分更新の `$set` ドキュメントを組み立てる
///
/// 指定されたフィールドと `updatedAt` のみを含む。
pub fn patch_to_update(patch: &TodoPatch, now: DateTime<Utc>) -> Document {
    let mut set = Document::new();
    if let Some(title) = &patch.title {
        set.insert("title", title.as_str());
    }
    if let Some(description) = &patch.description {
        set.insert("description", description.as_str());
    }
    if let Some(completed) = patch.completed {
        set.insert("completed", completed);
    }
    set.insert("updatedAt", bson::DateTime::from_chrono(now));

    doc! { "$set": set }
}

/// BSON の日時はミリ秒精度なので、返却値と保存値を揃える
pub fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    bson::DateTime::from_chrono(dt).to_chrono()
}
