use std::time::Duration;

/// 投稿本文の最大文字数。
pub const MAX_POST_CONTENT_CHARS: usize = 280;

/// ユーザー検索を発行する最小キーワード長。
pub const MIN_SEARCH_QUERY_CHARS: usize = 2;

/// ユーザー一覧のデフォルトページサイズ。
pub const DEFAULT_PER_PAGE: u32 = 20;

/// 通知一覧の再取得を抑制する間隔。
pub const NOTIFICATION_FETCH_INTERVAL: Duration = Duration::from_secs(5);
