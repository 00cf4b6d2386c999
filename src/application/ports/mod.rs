pub mod gateway;
pub mod notifier;
pub mod session_store;

pub use gateway::{
    AuthGateway, AuthSession, Credentials, NotificationGateway, PostGateway, RegisterRequest,
    SocialGateway, UserGateway, UserPage,
};
pub use notifier::{Notifier, Toast, ToastLevel};
pub use session_store::{SessionHandle, SessionStore, SessionTokens};
