use std::io::{self, BufWriter, ErrorKind, Read, Stdin, Stdout, Write};

/// The byte-level I/O an engine run performs through `.` and `,`.
///
/// The engine is generic over `ByteIo`, so it never touches the process's
/// standard streams itself. Those are bound with [`Streams::stdio`] at the
/// outermost boundary; tests hand in in-memory buffers or closures.
pub trait ByteIo {
    /// Output one byte (the `.` instruction).
    fn emit(&mut self, byte: u8) -> io::Result<()>;

    /// Input one byte (the `,` instruction). `None` means end of input.
    fn read(&mut self) -> io::Result<Option<u8>>;

    /// Push out any buffered output. Called once when a run ends.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: ByteIo + ?Sized> ByteIo for &mut T {
    fn emit(&mut self, byte: u8) -> io::Result<()> {
        (**self).emit(byte)
    }

    fn read(&mut self) -> io::Result<Option<u8>> {
        (**self).read()
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Hooks backed by any reader and writer.
pub struct Streams<R, W> {
    reader: R,
    writer: W,
}

impl Streams<Stdin, BufWriter<Stdout>> {
    /// Bind to the process's standard input and output.
    pub fn stdio() -> Self {
        Self::new(io::stdin(), BufWriter::new(io::stdout()))
    }
}

impl<R: Read, W: Write> Streams<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: Read, W: Write> ByteIo for Streams<R, W> {
    fn emit(&mut self, byte: u8) -> io::Result<()> {
        self.writer.write_all(&[byte])
    }

    fn read(&mut self) -> io::Result<Option<u8>> {
        // Prompts written so far must be visible before we block on input.
        self.writer.flush()?;
        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Hooks made of two closures: one sink, one source.
pub struct FnHooks<E, R> {
    emit: E,
    read: R,
}

impl<E, R> FnHooks<E, R>
where
    E: FnMut(u8) -> io::Result<()>,
    R: FnMut() -> io::Result<Option<u8>>,
{
    pub fn new(emit: E, read: R) -> Self {
        Self { emit, read }
    }
}

impl<E, R> ByteIo for FnHooks<E, R>
where
    E: FnMut(u8) -> io::Result<()>,
    R: FnMut() -> io::Result<Option<u8>>,
{
    fn emit(&mut self, byte: u8) -> io::Result<()> {
        (self.emit)(byte)
    }

    fn read(&mut self) -> io::Result<Option<u8>> {
        (self.read)()
    }
}
