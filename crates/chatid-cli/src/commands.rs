use crate::config::{Command, Config, IdKind, PrefixKind};
use chatid::{
    DeviceId, IdFactory, MediaId, MediaReference, MessageId, NodeId, PushId, RandSource, RawId,
    Root, StickerRef, TimeSource, most_up_to_date,
};
use std::io::Write;

/// Runs the configured command, writing its results to `out`.
pub fn run<T, R, W>(config: &Config, ids: &IdFactory<T, R>, out: &mut W) -> anyhow::Result<()>
where
    T: TimeSource<i64>,
    R: RandSource<u32>,
    W: Write,
{
    match &config.command {
        Command::Node { count } => {
            for _ in 0..*count {
                writeln!(out, "{}", ids.node_id())?;
            }
        }
        Command::Root { a, b } => {
            let root = ids.root(*a, *b, config.place);
            tracing::info!(primary = %root.primary(), place = root.place(), "built root");
            writeln!(out, "{root}")?;
        }
        Command::Inspect { kind, hex } => inspect(*kind, hex, out)?,
        Command::Prefix { kind, hex } => {
            let raw = hex::decode(hex)?;
            let prefix = match kind {
                PrefixKind::Message => {
                    MessageId::decode(&raw)?;
                    hex::encode(MessageId::prefix(&raw)?)
                }
                PrefixKind::Push => {
                    PushId::decode(&raw)?;
                    hex::encode(PushId::prefix(&raw)?)
                }
            };
            writeln!(out, "{prefix}")?;
        }
        Command::Latest { roots } => {
            let Some(first) = roots.first() else {
                anyhow::bail!("at least one root is required");
            };
            let (same, other): (Vec<&Root>, Vec<&Root>) =
                roots.iter().partition(|r| first.is_homological(r));
            for r in &other {
                tracing::warn!(root = %r, "skipping root of another conversation");
            }
            if let Some(newest) = most_up_to_date(same) {
                writeln!(out, "{newest}")?;
            }
        }
        Command::Stale { root } => {
            let eligible = ids.could_update(root);
            tracing::debug!(
                root_timestamp = root.timestamp(),
                now = ids.now(),
                window_secs = ids.policy().window().as_secs(),
                "staleness check"
            );
            writeln!(out, "{}", if eligible { "stale" } else { "fresh" })?;
        }
    }
    Ok(())
}

fn inspect<W: Write>(kind: IdKind, hex: &str, out: &mut W) -> anyhow::Result<()> {
    match kind {
        IdKind::Node => writeln!(out, "{:#?}", NodeId::from_hex(hex)?)?,
        IdKind::Root => writeln!(out, "{:#?}", Root::from_hex(hex)?)?,
        IdKind::Message => writeln!(out, "{:#?}", MessageId::from_hex(hex)?)?,
        IdKind::Media => writeln!(out, "{:#?}", MediaId::from_hex(hex)?)?,
        IdKind::MediaRef => writeln!(out, "{:#?}", MediaReference::from_hex(hex)?)?,
        IdKind::Sticker => writeln!(out, "{:#?}", StickerRef::from_hex(hex)?)?,
        IdKind::Push => writeln!(out, "{:#?}", PushId::from_hex(hex)?)?,
        IdKind::Device => writeln!(out, "{:#?}", DeviceId::from_hex(hex)?)?,
    }
    Ok(())
}
