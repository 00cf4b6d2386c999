pub mod auth_service;
pub mod notification_service;
pub mod post_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use notification_service::NotificationService;
pub use post_service::PostService;
pub use user_service::UserService;
