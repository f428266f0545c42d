//! Buffered file collaborators for the engine's byte streams

use splasher_core::io::{ByteSink, ByteSource};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Buffered file sink for read (dump) output.
pub struct FileSink {
    writer: BufWriter<File>,
}

impl FileSink {
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Flush buffered bytes out to disk.
    pub fn finish(mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl ByteSink for FileSink {
    fn push(&mut self, byte: u8) -> io::Result<()> {
        self.writer.write_all(&[byte])
    }
}

/// Buffered file source for write (program) input.
pub struct FileSource {
    reader: BufReader<File>,
    len: u64,
}

impl FileSource {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok(Self {
            reader: BufReader::new(file),
            len,
        })
    }

    /// File size in bytes at open time.
    pub fn len(&self) -> u64 {
        self.len
    }
}

impl ByteSource for FileSource {
    fn pull(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_reports_length_and_drains() {
        let dir = std::env::temp_dir();
        let path = dir.join("splasher-fileio-test.bin");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let mut source = FileSource::open(&path).unwrap();
        assert_eq!(source.len(), 3);
        assert_eq!(source.pull().unwrap(), Some(1));
        assert_eq!(source.pull().unwrap(), Some(2));
        assert_eq!(source.pull().unwrap(), Some(3));
        assert_eq!(source.pull().unwrap(), None);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn sink_round_trips_through_disk() {
        let dir = std::env::temp_dir();
        let path = dir.join("splasher-filesink-test.bin");

        let mut sink = FileSink::create(&path).unwrap();
        for byte in [0xDEu8, 0xAD, 0xBE, 0xEF] {
            sink.push(byte).unwrap();
        }
        sink.finish().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
        std::fs::remove_file(&path).unwrap();
    }
}
