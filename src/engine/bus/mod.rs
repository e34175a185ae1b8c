pub mod channel;
pub mod message;
pub mod traits;

pub use channel::ChannelBus;
pub use message::AgentRequest;
pub use traits::MessageBus;
