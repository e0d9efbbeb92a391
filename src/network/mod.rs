pub mod framing;
pub mod server;

pub use framing::LineFramer;
pub use server::EmulatorServer;
