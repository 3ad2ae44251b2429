//! Authentication seam
//!
//! The library never signs anyone in. The host application supplies a
//! [`TokenProvider`] and the REST client attaches the token to each request.

mod token;

pub use token::AccessToken;
pub use token::StaticTokenProvider;
pub use token::TokenProvider;
