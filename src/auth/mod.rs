pub mod authorizor;
pub mod password;
mod platform;
mod token;
mod user;

pub use platform::Platform;
pub use token::{Audience, Claims, Token, TokenKeys};
pub use user::User;
