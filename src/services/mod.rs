pub mod auth;
pub mod features;
pub mod providers;
pub mod recommendations;
pub mod scoring;
pub mod selector;
pub mod top_tracks;

pub use auth::{Credentials, SpotifyTokenProvider, TokenProvider};
pub use providers::{MusicProvider, SpotifyProvider};
