//! Session registry with one async actor per chat room.
//!
//! This module implements:
//! - SessionActor: Async actor owning the game of a single session
//! - SessionManager: Registry mapping session keys to live actors
//! - Message-based communication with tokio channels
//! - Registry configuration (game settings, bullet placement)
//!
//! ## Architecture
//!
//! Each live game runs in its own Tokio task with an mpsc message inbox, so
//! every command addressed to one session is applied in arrival order and
//! never interleaves with another command for the same session. Commands
//! for different sessions run independently. The SessionManager only holds
//! the key-to-handle map; creation happens under its write lock so two
//! concurrent `create` commands cannot both succeed.
//!
//! ## Example
//!
//! ```
//! use roulette::game::entities::{Command, PlayerId};
//! use roulette::session::{RegistryConfig, SessionManager};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let manager = SessionManager::new(RegistryConfig::default());
//! let alice = PlayerId::new("alice");
//!
//! manager.handle(42, &alice, Command::Create).await.unwrap();
//! assert_eq!(manager.session_count().await, 1);
//! # }
//! ```

pub mod actor;
pub mod config;
pub mod manager;
pub mod messages;

pub use actor::{SessionActor, SessionHandle};
pub use config::{BulletSource, RegistryConfig};
pub use manager::{SessionKey, SessionManager};
pub use messages::{SessionMessage, SessionResult};
