//! stream
//! Layered packet readers and writers over `std::io`.

pub mod packet;
pub mod reader;
pub mod writer;
pub mod compressed;
pub mod literal;
pub mod config;
pub mod io;
pub mod core;

pub use packet::{Lookahead, PacketBodyReader, PacketBodyWriter, PacketRead, PacketWrite};
pub use reader::{DecryptReader, ReaderState};
pub use writer::{EncryptWriter, WriterState};
pub use compressed::{open_compressed, CompressedWriter};
pub use literal::{LiteralReader, LiteralWriter};
pub use config::StreamConfig;
pub use io::{InputSource, OutputSink};
pub use self::core::*;
