pub mod comment;
pub mod follow;
pub mod notification;
pub mod post;
pub mod user;

pub use comment::Comment;
pub use follow::{FollowEdge, FollowLink};
pub use notification::{Notification, NotificationKind};
pub use post::{NewPost, Post, PostCategory, PostPatch};
pub use user::{User, UserPatch, UserRole, UserStats};
