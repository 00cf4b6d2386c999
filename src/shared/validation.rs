use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// 入力バリデーション失敗の理由。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ValidationFailureKind {
    /// 汎用的なバリデーションエラー。
    Generic,
    /// 投稿・コメント本文が空の場合。
    ContentEmpty,
    /// 投稿本文が 280 文字の上限を超過。
    ContentTooLarge,
    /// 検索キーワードが最小文字数（2 文字）未満。
    QueryTooShort,
    /// 既にフォロー済みのユーザーへの重複フォロー。
    DuplicateFollow,
}

impl ValidationFailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationFailureKind::Generic => "generic",
            ValidationFailureKind::ContentEmpty => "content_empty",
            ValidationFailureKind::ContentTooLarge => "content_too_large",
            ValidationFailureKind::QueryTooShort => "query_too_short",
            ValidationFailureKind::DuplicateFollow => "duplicate_follow",
        }
    }
}

impl fmt::Display for ValidationFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationFailureKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generic" => Ok(ValidationFailureKind::Generic),
            "content_empty" => Ok(ValidationFailureKind::ContentEmpty),
            "content_too_large" => Ok(ValidationFailureKind::ContentTooLarge),
            "query_too_short" => Ok(ValidationFailureKind::QueryTooShort),
            "duplicate_follow" => Ok(ValidationFailureKind::DuplicateFollow),
            _ => Err(()),
        }
    }
}
