//! 絞り込み + ページングの集計パイプライン
//!
//! `$match` の後に `$facet` で「ページ分の結果」と「総件数」を同時に求め、
//! 1 往復で `FilteredTodos` を組み立てる。

use crate::models::TodoDocument;
use bson::{doc, Bson, Document};
use domain::{FilteredTodos, TodoFilter};
use serde::Deserialize;

/// 正規表現のメタ文字をエスケープし、入力をそのまま部分文字列として扱う
pub fn escape_regex(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
                | '-' | '#'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `$match` 条件。`completed` は指定時のみ条件に含める
pub fn build_match(filter: &TodoFilter) -> Document {
    let mut predicate = Document::new();
    if let Some(title) = &filter.title {
        predicate.insert(
            "title",
            doc! { "$regex": escape_regex(title), "$options": "i" },
        );
    }
    if let Some(completed) = filter.completed {
        predicate.insert("completed", completed);
    }
    predicate
}

pub fn build_filter_pipeline(filter: &TodoFilter) -> Vec<Document> {
    vec![
        doc! { "$match": build_match(filter) },
        doc! {
            "$facet": {
                "items": [
                    { "$sort": sort_newest_first() },
                    { "$skip": to_bson_int(filter.skip()) },
                    { "$limit": to_bson_int(filter.limit) },
                ],
                "total": [
                    { "$count": "count" },
                ],
            }
        },
    ]
}

/// `updatedAt` 降順。同時刻は `_id`（採番順）の降順で順序を確定させる
pub fn sort_newest_first() -> Document {
    doc! { "updatedAt": -1, "_id": -1 }
}

fn to_bson_int(value: u64) -> Bson {
    Bson::Int64(i64::try_from(value).unwrap_or(i64::MAX))
}

#[derive(Debug, Deserialize)]
struct FacetCount {
    count: i64,
}

#[derive(Debug, Deserialize)]
struct FacetResult {
    #[serde(default)]
    items: Vec<TodoDocument>,
    #[serde(default)]
    total: Vec<FacetCount>,
}

/// `$facet` の結果ドキュメントを `FilteredTodos` に変換する
///
/// 一致 0 件のとき `total` 配列は空になるため 0 とみなす。
pub fn parse_facet_result(
    filter: &TodoFilter,
    result: Option<Document>,
) -> Result<FilteredTodos, bson::de::Error> {
    let facet = match result {
        Some(document) => bson::from_document::<FacetResult>(document)?,
        None => FacetResult {
            items: Vec::new(),
            total: Vec::new(),
        },
    };

    let total = facet
        .total
        .first()
        .map(|c| u64::try_from(c.count).unwrap_or(0))
        .unwrap_or(0);
    let items = facet
        .items
        .into_iter()
        .map(TodoDocument::into_domain)
        .collect();

    Ok(FilteredTodos::new(filter, items, total))
}
