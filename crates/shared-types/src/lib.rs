pub mod error;
pub mod feature_flags;

// Portal domain
pub mod auth;
pub mod dashboard;
pub mod document;
pub mod family;
pub mod meeting;
pub mod message;
pub mod user;

pub use error::*;
pub use feature_flags::*;

pub use auth::*;
pub use dashboard::*;
pub use document::*;
pub use family::*;
pub use meeting::*;
pub use message::*;
pub use user::*;
