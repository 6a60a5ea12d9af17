pub mod error;
pub mod frame;
pub mod local;
pub mod models;

pub use error::ChannelError;
pub use frame::Frame;
pub use local::{LocalChannel, PeerEnd};
pub use models::{RealtimeChannel, RealtimeChannelExt, Subscription};
