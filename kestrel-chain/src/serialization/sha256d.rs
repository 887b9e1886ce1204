//! SHA256d, a.k.a. double SHA-256: `SHA-256(SHA-256(data))`.

use std::io;

use sha2::{Digest, Sha256};

/// A type that lets you write out SHA256d (double SHA-256).
#[derive(Default)]
pub struct Writer {
    hash: Sha256,
}

impl io::Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.hash.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Writer {
    /// Consume the writer and produce the hash result.
    pub fn finish(self) -> [u8; 32] {
        let first = self.hash.finalize();
        let second = Sha256::digest(&first);
        let mut output = [0u8; 32];
        output.copy_from_slice(&second);
        output
    }
}

/// Compute the SHA256d digest of a byte slice in one call.
pub fn double(data: &[u8]) -> [u8; 32] {
    use io::Write;

    let mut writer = Writer::default();
    writer
        .write_all(data)
        .expect("writing to a sha256d Writer is infallible");
    writer.finish()
}
