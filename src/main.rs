#![deny(warnings)]
#![deny(missing_docs)]
//! Command line tool listing the address/hostname pairs of a hosts file on Linux/UNIX.
//!
//! Reads `/etc/hosts` (or the file named in the configuration or on the command line, or stdin)
//! and reports each pair either as soon as it is found, one per line, or grouped by address as
//! YAML. Selectors narrow the output down to certain addresses or hostnames.
//!
//! Set the `RUST_LOG` environment variable to control logging, `--verbose` is a shorthand for
//! `debug`.

mod config;
mod opts;

use crate::config::{HostsfileConfig, RESERVED_HOSTNAME};
use crate::opts::{OutputFormat, Selector};
use hostsfile::{parse_hosts_file, parse_hosts_reader, HostsError};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{stdin, stdout, Write};
use std::path::Path;
use structopt::StructOpt;

fn main() {
    let opts = opts::HostsArgs::from_args();
    if let Err(err) = run(opts) {
        eprintln!("hostsfile: {}", err);
        std::process::exit(1);
    }
}

fn run(opts: opts::HostsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let level = if opts.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if opts.generate_sample_config {
        let mut out = stdout();
        let mut sample = HostsfileConfig::default();
        sample.exclude.insert("somerandomhost.with.tld".into());
        serde_yaml::to_writer(&mut out, &sample)?;
        return Ok(());
    }

    let cfg = HostsfileConfig::load(opts.config.as_deref())?;
    log::debug!("config: {:?}", cfg);

    let selectors = resolve_selectors(opts.selectors)?;
    let filter = PairFilter {
        selectors,
        exclude: cfg.exclude,
    };
    let source = opts.file.unwrap_or(cfg.hosts_file);

    match opts.output {
        OutputFormat::Plain => print_plain(&source, &filter),
        OutputFormat::Yaml => print_yaml(&source, &filter),
    }
}

/// Replaces `%HOSTNAME%` in hostname selectors with the name of this machine.
fn resolve_selectors(
    selectors: Vec<Selector>,
) -> Result<Vec<Selector>, Box<dyn std::error::Error>> {
    let mut resolved = Vec::with_capacity(selectors.len());
    for selector in selectors {
        match selector {
            Selector::Hostname(host) if host == RESERVED_HOSTNAME => {
                let hostname_os_string = hostname::get()?;
                let hostname = hostname_os_string
                    .into_string()
                    .map_err(|os| format!("system hostname {:?} is not valid UTF-8", os))?;
                log::debug!("{} resolved to {:?}", RESERVED_HOSTNAME, hostname);
                resolved.push(Selector::Hostname(hostname));
            }
            other => resolved.push(other),
        }
    }
    Ok(resolved)
}

struct PairFilter {
    selectors: Vec<Selector>,
    exclude: BTreeSet<String>,
}

impl PairFilter {
    fn accepts(&self, addr: &str, host: &str) -> bool {
        if self.exclude.contains(host) {
            return false;
        }
        self.selectors.is_empty() || self.selectors.iter().any(|sel| sel.matches(addr, host))
    }
}

fn parse_source<F>(source: &Path, cb: F) -> Result<(), HostsError>
where
    F: FnMut(&str, &str),
{
    if source == Path::new("-") {
        let stdin = stdin();
        let lock = stdin.lock();
        parse_hosts_reader(lock, cb)
    } else {
        parse_hosts_file(source, cb)
    }
}

/// Streams pairs to stdout in the order they are found. The callback cannot fail, so the first
/// write error is kept aside and reported once parsing is done.
fn print_plain(source: &Path, filter: &PairFilter) -> Result<(), Box<dyn std::error::Error>> {
    let out = stdout();
    let mut out = out.lock();
    let mut opt_err: Option<std::io::Error> = None;
    parse_source(source, |addr, host| {
        if opt_err.is_some() || !filter.accepts(addr, host) {
            return;
        }
        if let Err(err) = writeln!(out, "{}\t{}", addr, host) {
            opt_err = Some(err);
        }
    })?;
    if let Some(err) = opt_err {
        return Err(err.into());
    }
    out.flush()?;
    Ok(())
}

/// Collects hostnames per address, each hostname listed once per address.
fn collect_map(
    source: &Path,
    filter: &PairFilter,
) -> Result<BTreeMap<String, Vec<String>>, HostsError> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    parse_source(source, |addr, host| {
        if !filter.accepts(addr, host) {
            return;
        }
        let hosts = map.entry(addr.to_string()).or_insert_with(Vec::new);
        if !hosts.iter().any(|known| known == host) {
            hosts.push(host.to_string());
        }
    })?;
    Ok(map)
}

fn print_yaml(source: &Path, filter: &PairFilter) -> Result<(), Box<dyn std::error::Error>> {
    let map = collect_map(source, filter)?;
    if map.is_empty() {
        log::info!("no matching entries in {:?}", source);
    }
    let mut out = stdout();
    serde_yaml::to_writer(&mut out, &map)?;
    writeln!(out)?;
    Ok(())
}
