use anyhow::bail;
use chatid::{NodeId, Root, StalenessPolicy};
use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for the `chatid` binary.
///
/// Global settings are parsed from CLI arguments or environment variables
/// (a `.env` file is loaded first), with defaults matching the library.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "chatid",
    version,
    about = "Mint, inspect and canonicalize chat identifiers"
)]
pub struct CliArgs {
    /// Age in days a root must reach before its metadata may be replaced.
    ///
    /// Environment variable: `CHATID_STALENESS_DAYS`
    #[arg(long, global = true, env = "CHATID_STALENESS_DAYS", default_value_t = 31)]
    pub staleness_days: u64,

    /// Shard ("place") stamped on newly built roots.
    ///
    /// Environment variable: `CHATID_PLACE`
    #[arg(long, global = true, env = "CHATID_PLACE", default_value_t = 0)]
    pub place: u16,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Mint new node ids, one hex id per line.
    Node {
        #[arg(short, long, default_value_t = 1)]
        count: usize,
    },
    /// Build the canonical root of the conversation between two nodes.
    Root { a: NodeId, b: NodeId },
    /// Decode a hex identifier and print its fields.
    Inspect { kind: IdKind, hex: String },
    /// Print the range-scan prefix of an encoded message or push id.
    Prefix { kind: PrefixKind, hex: String },
    /// Print the newest version of the first root's conversation.
    Latest {
        #[arg(required = true)]
        roots: Vec<Root>,
    },
    /// Report whether a root's metadata may be replaced now.
    Stale { root: Root },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Node,
    Root,
    Message,
    Media,
    MediaRef,
    Sticker,
    Push,
    Device,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixKind {
    Message,
    Push,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub policy: StalenessPolicy,
    pub place: u16,
    pub command: Command,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.staleness_days == 0 {
            bail!("CHATID_STALENESS_DAYS must be greater than 0");
        }
        if args.staleness_days > u64::from(u32::MAX) {
            bail!(
                "CHATID_STALENESS_DAYS ({}) is unreasonably large",
                args.staleness_days
            );
        }

        Ok(Self {
            policy: StalenessPolicy::from_days(args.staleness_days),
            place: args.place,
            command: args.command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn parses_roots_from_hex() {
        let a = NodeId::from_components(1000, 7);
        let b = NodeId::from_components(2000, 9);
        let (ha, hb) = (a.to_string(), b.to_string());
        let args = CliArgs::try_parse_from(["chatid", "--place", "5", "root", &*ha, &*hb])
            .expect("parse");
        let config = Config::try_from(args).expect("config");
        assert_eq!(config.place, 5);
        assert_eq!(config.policy, StalenessPolicy::from_days(31));
        match config.command {
            Command::Root { a: x, b: y } => assert_eq!((x, y), (a, b)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(CliArgs::try_parse_from(["chatid", "stale", "xyz"]).is_err());
    }

    #[test]
    fn rejects_zero_window() {
        let args = CliArgs::try_parse_from(["chatid", "--staleness-days", "0", "node"])
            .expect("parse");
        assert!(Config::try_from(args).is_err());
    }
}
