pub mod ids;
pub mod pagination;

pub use ids::{CommentId, NotificationId, PostId, UserId};
pub use pagination::{PageInfo, PageRequest};
