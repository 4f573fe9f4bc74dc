//! Algorithm 0: the compressed packet stores data as is.

use crate::compression::types::{CompressionError, Compressor, Decompressor};
use crate::stream::packet::{PacketRead, PacketWrite};

pub struct PassThrough;

impl Compressor for PassThrough {
    fn wrap_writer<'a>(
        &self,
        inner: Box<dyn PacketWrite + 'a>,
        _level: u32,
    ) -> Result<Box<dyn PacketWrite + 'a>, CompressionError> {
        Ok(inner)
    }
}

impl Decompressor for PassThrough {
    fn wrap_reader<'a>(
        &self,
        inner: Box<dyn PacketRead + 'a>,
    ) -> Result<Box<dyn PacketRead + 'a>, CompressionError> {
        Ok(inner)
    }
}
