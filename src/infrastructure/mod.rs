pub mod credentials;
pub mod transport;

pub use credentials::{CredentialStore, MemoryCredentialStore};
pub use transport::{HttpTransport, Method, Transport};
