//! Authentication
//!
//! The client never reads tokens from ambient state; a [`TokenProvider`] is
//! injected when the client is built and asked for a token before each request.

mod file;
mod token;

pub use file::FileTokenProvider;
pub use token::AccessToken;
pub use token::NoToken;
pub use token::StaticTokenProvider;
pub use token::TokenProvider;
