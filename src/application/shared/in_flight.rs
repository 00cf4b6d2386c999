use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// 在途ガードの対象となるミューテーション種別。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Like,
    Unlike,
    Follow,
    Unfollow,
}

/// (対象エンティティ ID, 操作) 単位の在途セット。
///
/// 同一のミューテーションが解決する前に再発行された場合
/// （フォローボタンの連打など）、二重のカウンター加算を防ぐため
/// 後続の発行を抑止する。解放はトークンの Drop で成否に関係なく行う。
#[derive(Clone, Default)]
pub struct InFlightGuard {
    entries: Arc<Mutex<HashSet<(MutationKind, u64)>>>,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// 在途でなければ登録してトークンを返す。既に在途なら `None`。
    pub fn try_begin(&self, kind: MutationKind, id: u64) -> Option<InFlightToken> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if entries.insert((kind, id)) {
            Some(InFlightToken {
                guard: self.clone(),
                kind,
                id,
            })
        } else {
            None
        }
    }

    pub fn is_in_flight(&self, kind: MutationKind, id: u64) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&(kind, id))
    }

    fn release(&self, kind: MutationKind, id: u64) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(kind, id));
    }
}

/// Drop で在途セットから必ず削除される RAII トークン。
pub struct InFlightToken {
    guard: InFlightGuard,
    kind: MutationKind,
    id: u64,
}

impl Drop for InFlightToken {
    fn drop(&mut self) {
        self.guard.release(self.kind, self.id);
    }
}
