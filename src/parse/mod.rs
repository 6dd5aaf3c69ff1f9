use log::{debug, trace};
use std::borrow::Cow;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

const BYTE_NEWLINE: u8 = b'\n';
const BYTE_RETURN: u8 = b'\r';
const BYTE_SPACE: u8 = b' ';
const BYTE_TAB: u8 = b'\t';
const BYTE_COMMENT: u8 = b'#';

const CHUNK_SIZE: usize = 8 * 1024;

/// Failure to obtain bytes from the hosts source. Malformed lines are never reported as errors,
/// they are simply skipped.
#[derive(Error, Debug)]
pub enum HostsError {
    /// The named file could not be opened for reading.
    #[error("unable to open hosts file {path:?}: {source}")]
    Open {
        #[allow(missing_docs)]
        path: PathBuf,
        #[allow(missing_docs)]
        source: std::io::Error,
    },
    /// The byte stream reported a fault before signaling end of data.
    #[error("unable to read hosts data: {0}")]
    Read(#[from] std::io::Error),
}

/// Single pass scanner over hosts file bytes.
///
/// The first whitespace delimited token of a line is the address, every following token up to a
/// `#` or the line break is a hostname and gets reported together with that address. Both `\n`
/// and `\r` end a line on their own.
///
/// State is carried across calls to [`HostsTokenizer::feed`], so input may be split into chunks
/// at arbitrary positions, including in the middle of a token.
#[derive(Debug, Default)]
pub struct HostsTokenizer {
    addr: Vec<u8>,
    token: Vec<u8>,
    skip_line: bool,
    emitted: usize,
}

impl HostsTokenizer {
    /// Creates a tokenizer positioned at the start of a line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pairs handed to callbacks so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Consumes `chunk`, invoking `cb` for every completed (address, hostname) pair.
    pub fn feed<F>(&mut self, chunk: &[u8], cb: &mut F)
    where
        F: FnMut(&str, &str),
    {
        for &byt in chunk {
            match byt {
                BYTE_NEWLINE | BYTE_RETURN => {
                    self.emit_pending(cb);
                    self.skip_line = false;
                    self.addr.clear();
                    self.token.clear();
                }
                BYTE_COMMENT => {
                    // catches `hostname# comment` as well as `hostname # comment`
                    self.emit_pending(cb);
                    self.skip_line = true;
                    self.addr.clear();
                    self.token.clear();
                }
                BYTE_SPACE | BYTE_TAB => {
                    if self.skip_line {
                        continue;
                    }
                    if self.addr.is_empty() {
                        // token becomes the address, buffers swap to keep both allocations
                        std::mem::swap(&mut self.addr, &mut self.token);
                    } else if !self.token.is_empty() {
                        self.emit(cb);
                    }
                    self.token.clear();
                }
                _ => {
                    if !self.skip_line {
                        self.token.push(byt);
                    }
                }
            }
        }
    }

    /// Signals end of input. A hostname on an unterminated last line is reported here. The
    /// tokenizer is reset afterwards and may be reused for another source.
    pub fn finish<F>(&mut self, cb: &mut F)
    where
        F: FnMut(&str, &str),
    {
        self.emit_pending(cb);
        self.skip_line = false;
        self.addr.clear();
        self.token.clear();
    }

    fn emit_pending<F>(&mut self, cb: &mut F)
    where
        F: FnMut(&str, &str),
    {
        if !self.skip_line && !self.addr.is_empty() && !self.token.is_empty() {
            self.emit(cb);
        }
    }

    fn emit<F>(&mut self, cb: &mut F)
    where
        F: FnMut(&str, &str),
    {
        self.emitted += 1;
        let addr: Cow<str> = String::from_utf8_lossy(&self.addr);
        let host: Cow<str> = String::from_utf8_lossy(&self.token);
        trace!("entry {:?} -> {:?}", addr, host);
        cb(&addr, &host);
    }
}

/// Parses hosts entries from a byte stream, reporting every (address, hostname) pair to `cb` in
/// order of appearance.
///
/// Reading stops at the first error other than [`ErrorKind::Interrupted`]. Pairs completed before
/// the fault have already been reported, no further callbacks happen afterwards.
pub fn parse_hosts_reader<R, F>(mut read: R, mut cb: F) -> Result<(), HostsError>
where
    R: Read,
    F: FnMut(&str, &str),
{
    let mut tokenizer = HostsTokenizer::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        match read.read(&mut buf) {
            Ok(0) => break,
            Ok(len) => tokenizer.feed(&buf[..len], &mut cb),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => {
                debug!(
                    "read failed after {} entries: {}",
                    tokenizer.emitted(),
                    err
                );
                return Err(HostsError::Read(err));
            }
        }
    }
    tokenizer.finish(&mut cb);
    debug!("parsed {} entries", tokenizer.emitted());
    Ok(())
}

/// Parses hosts entries from an in-memory buffer. See [`parse_hosts_reader`].
pub fn parse_hosts<F>(data: &[u8], cb: F) -> Result<(), HostsError>
where
    F: FnMut(&str, &str),
{
    parse_hosts_reader(data, cb)
}

/// Opens the file at `path` read-only and parses it. See [`parse_hosts_reader`].
pub fn parse_hosts_file<P, F>(path: P, cb: F) -> Result<(), HostsError>
where
    P: AsRef<Path>,
    F: FnMut(&str, &str),
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| HostsError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("parsing hosts file {:?}", path);
    parse_hosts_reader(file, cb)
}
