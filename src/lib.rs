#![deny(warnings)]
#![deny(missing_docs)]
//! Streaming tokenizer for hosts files common on Linux/UNIX systems (`man 5 hosts`). Every
//! (address, hostname) pair found is handed to a caller supplied callback in a single forward pass
//! over the input, without building an intermediate representation of the file.
//!
//! The address field is treated as an opaque token, it is not validated as an IP address. Lines
//! that do not form a pair (blank lines, comments, an address without hostnames) are skipped
//! silently. The only error is a byte source that cannot be opened or read.
//!
//! ```
//! let mut found = vec![];
//! hostsfile::parse_hosts(b"::1 localhost ip6-localhost # loopback\n", |addr, host| {
//!     found.push(format!("{} {}", addr, host))
//! })
//! .unwrap();
//! assert_eq!(vec!["::1 localhost", "::1 ip6-localhost"], found);
//! ```

mod parse;

pub use parse::parse_hosts;
pub use parse::parse_hosts_file;
pub use parse::parse_hosts_reader;
pub use parse::HostsError;
pub use parse::HostsTokenizer;
