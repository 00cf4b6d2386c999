pub mod ports;
pub mod services;
pub mod shared;

pub use services::{AuthService, NotificationService, PostService, UserService};
