//! サーバー応答のワイヤ表現。ドメイン型へは各ゲートウェイ実装で変換する。

use crate::domain::entities::User;
use serde::Deserialize;

/// ページングされる一覧エンドポイント共通のエンベロープ。
/// `next` / `previous` は次ページ・前ページの URL（無ければ null）。
#[derive(Debug, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// 一覧エンドポイントはページング有無で形が変わるため両方を受ける。
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Paginated(Paginated<T>),
    Plain(Vec<T>),
}

impl<T> ListResponse<T> {
    pub fn into_results(self) -> Vec<T> {
        match self {
            ListResponse::Paginated(page) => page.results,
            ListResponse::Plain(items) => items,
        }
    }
}

/// エラー応答のボディ。`{"error": "..."}` 形式。
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub refresh: String,
    pub user: User,
}

/// `POST /token/refresh/` の応答。リフレッシュトークンは据え置き。
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}
