pub mod argon2;
pub mod codec;
pub mod errors;

pub use argon2::PasswordHasher;
pub use codec::HashParams;
pub use codec::HashRecord;
pub use errors::PasswordError;
