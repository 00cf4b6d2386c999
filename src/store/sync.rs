//! ビュー間伝播の純粋なプリミティブ。
//!
//! 確定したミューテーションの効果を、同じエンティティのコピーを持つ
//! すべてのビューへ適用する。各ビューへの適用は独立・冪等で、
//! 一致するエントリがないビューは変更されない（エラーにもしない）。

use crate::domain::entities::{Comment, FollowLink, Notification, Post, User};

/// ビュー伝播の対象になれるエンティティ。
pub trait Identifiable {
    fn entity_id(&self) -> u64;
}

impl Identifiable for Post {
    fn entity_id(&self) -> u64 {
        self.id
    }
}

impl Identifiable for User {
    fn entity_id(&self) -> u64 {
        self.id
    }
}

impl Identifiable for Comment {
    fn entity_id(&self) -> u64 {
        self.id
    }
}

impl Identifiable for Notification {
    fn entity_id(&self) -> u64 {
        self.id
    }
}

impl Identifiable for FollowLink {
    fn entity_id(&self) -> u64 {
        self.id
    }
}

/// ID が一致するエントリを変換後のコピーで置き換える。
pub fn apply_to_view<T, F>(view: &mut [T], id: u64, transform: F)
where
    T: Identifiable,
    F: Fn(&mut T),
{
    for entry in view.iter_mut().filter(|entry| entry.entity_id() == id) {
        transform(entry);
    }
}

/// ID が一致するエントリをビューから取り除く。
pub fn remove_from_view<T: Identifiable>(view: &mut Vec<T>, id: u64) {
    view.retain(|entry| entry.entity_id() != id);
}

/// 新しいエンティティをビューの先頭に置く。
pub fn prepend_to_view<T: Identifiable>(view: &mut Vec<T>, entity: T) {
    view.insert(0, entity);
}
