pub mod config;
pub mod dispatch;
pub mod polling;
pub mod router;
pub mod session;
pub mod telegram;
pub mod webhook;

pub use router::Router;
pub use session::SessionStore;
pub use telegram::TelegramClient;

/// Shared application state, one instance per process, cloned by `Arc`
/// into every concurrent dispatch.
pub struct AppState {
    pub telegram: TelegramClient,
    pub router: Router,
    /// Shared secret for webhook authentication. `None` disables the check.
    pub webhook_secret_token: Option<String>,
}
