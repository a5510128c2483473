mod auth;
mod deck;
mod links;
mod owners;
mod sessions;

pub use auth::TokenManager;
pub use deck::redeem;
pub use links::LINK_ID_LEN;
pub use links::LinkRegistry;
pub use links::MAX_ISSUE_ATTEMPTS;
pub use links::generate_link_id;
pub use owners::OwnerCredentials;
pub use owners::OwnerToken;
pub use sessions::PendingLogin;
pub use sessions::SESSION_COOKIE;
pub use sessions::Session;
pub use sessions::SessionStore;
pub use sessions::get_cookie;
