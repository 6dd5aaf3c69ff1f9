use nom::branch::alt;
use nom::bytes::complete::{is_not, tag};
use nom::combinator::{eof, map};
use nom::sequence::{preceded, terminated};
use nom::IResult;
use std::path::PathBuf;
use std::str::FromStr;
use structopt::StructOpt;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Selector {
    Address(String),
    Hostname(String),
}

impl Selector {
    pub fn matches(&self, addr: &str, host: &str) -> bool {
        match self {
            Selector::Address(needle) => needle == addr,
            Selector::Hostname(needle) => needle == host,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputFormat {
    Plain,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(OutputFormat::Plain),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => Err(format!("unknown output format {:?}, use plain or yaml", s)),
        }
    }
}

#[derive(Debug, StructOpt)]
#[structopt(settings = & [structopt::clap::AppSettings::ColoredHelp])]
pub struct HostsArgs {
    /// Will log what is read and parsed to stderr
    #[structopt(short = "v", long = "verbose")]
    pub verbose: bool,
    /// Will generate a sample configuration on stdout
    #[structopt(long = "sample-config")]
    pub generate_sample_config: bool,
    /// Configuration in YAML format, must exist if given
    #[structopt(short = "c", long = "config", parse(from_os_str))]
    pub config: Option<PathBuf>,
    /// Hosts file to read instead of the configured one, `-` reads stdin
    #[structopt(short = "f", long = "file", parse(from_os_str))]
    pub file: Option<PathBuf>,
    /// Output format: `plain` prints one pair per line as found, `yaml` groups hostnames by address
    #[structopt(short = "o", long = "output", default_value = "plain")]
    pub output: OutputFormat,
    /// Selectors restrict which pairs are reported. With none given, all are. There are two cases:
    ///
    /// ip=ADDR   -> report pairs with exactly this address field
    /// host=NAME -> report pairs with exactly this hostname, `%HOSTNAME%` is the system hostname
    ///
    /// A pair is reported if any selector matches.
    #[structopt(parse(try_from_str = try_parse_selector),
    verbatim_doc_comment,
    help = "Restricts reported pairs. use `--help` for full description.",
    name="SELECTORS")]
    pub selectors: Vec<Selector>,
}

fn try_parse_selector(str_selector: &str) -> Result<Selector, String> {
    comb_selector(str_selector)
        .map_err(|err| format!("unable to parse selector {:?}: {}", str_selector, err))
        .map(|(_, selector)| selector)
}

fn comb_value(input: &str) -> IResult<&str, &str> {
    is_not(" \t\r\n#")(input)
}

fn comb_selector(input: &str) -> IResult<&str, Selector> {
    alt((
        map(terminated(preceded(tag("ip="), comb_value), eof), |addr: &str| {
            Selector::Address(addr.to_string())
        }),
        map(terminated(preceded(tag("host="), comb_value), eof), |host: &str| {
            Selector::Hostname(host.to_string())
        }),
    ))(input)
}
