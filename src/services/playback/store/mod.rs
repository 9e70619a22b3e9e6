//! Playback intent store: the shared description of what should be playing.

mod changes;
mod intent_store;
mod subscription;

pub use changes::{IntentChange, IntentFields};
pub use intent_store::IntentStore;
pub use subscription::Subscription;
