pub mod paperplay_client;

pub use paperplay_client::PaperPlayClient;
