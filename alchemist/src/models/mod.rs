//! Data models shared by the chat core and its collaborators.

mod artifact;
mod message;
mod user;

pub use artifact::{ArtifactKind, ArtifactRef};
pub use message::{Message, Sender};
pub use user::User;
