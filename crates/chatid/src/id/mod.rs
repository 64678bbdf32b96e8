mod media;
mod message;
mod node;
mod push;
mod root;

pub use media::*;
pub use message::*;
pub use node::*;
pub use push::*;
pub use root::*;
