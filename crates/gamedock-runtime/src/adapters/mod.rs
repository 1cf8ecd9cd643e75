//! Adapters at the composition boundary: the inbound channel pump and the
//! mock engine used by tests.

pub mod channel;
pub mod mock_engine;

pub use channel::InboundChannel;
pub use mock_engine::{MockEngine, MockEngineProvider, MockLoader};
