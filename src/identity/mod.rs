//! Identity seam for permission resolution: who is logged in, and with which token.
//! Keep the public surface thin and split implementation across sub-modules.

mod principal;
mod provider;
mod session;
pub mod token;

pub use principal::{Attrs, Principal};
pub use provider::IdentityStore;
pub use session::MemoryIdentityStore;
