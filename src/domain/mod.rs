pub mod constants;
pub mod entities;
pub mod value_objects;

pub use entities::{Comment, FollowEdge, Notification, Post, User};
pub use value_objects::{PageInfo, PageRequest};
