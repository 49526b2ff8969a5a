use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use idqueue::{record_file, BoundedUniqueQueue, Identifier, QueueConfig};
use rand_core::OsRng;

use crate::{Cli, Command};

pub(crate) const DEFAULT_CAPACITY: usize = 4096;

pub(crate) fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let config = match cli.config.as_deref() {
        Some(path) => Some(
            QueueConfig::from_path(path)
                .with_context(|| format!("loading config {}", path.display()))?,
        ),
        None => None,
    };

    match cli.command {
        Command::Inspect { file, hex } => inspect(&file, hex, out),
        Command::Add { file, capacity, ids } => {
            let settings = resolve(config.as_ref(), file, capacity)?;
            add(&settings, ids, out)
        }
        Command::Trim { file, capacity } => {
            let settings = resolve(config.as_ref(), file, Some(capacity))?;
            trim(&settings, out)
        }
        Command::Generate { count } => generate(count, out),
    }
}

/// Command-line flags override the config file; capacity falls back to
/// [`DEFAULT_CAPACITY`].
pub(crate) fn resolve(
    config: Option<&QueueConfig>,
    file: Option<PathBuf>,
    capacity: Option<usize>,
) -> Result<QueueConfig> {
    let Some(file) = file.or_else(|| config.and_then(|config| config.source_path.clone())) else {
        bail!("no record file given (pass --file or set source_path in --config)");
    };
    let capacity = capacity.or(config.map(|config| config.capacity)).unwrap_or(DEFAULT_CAPACITY);
    let settings = QueueConfig::new(capacity).with_source_path(file);
    settings.validate()?;
    Ok(settings)
}

fn inspect<W: Write>(file: &Path, hex: bool, out: &mut W) -> Result<()> {
    let report = record_file::read_file(file);
    for id in &report.identifiers {
        if hex {
            writeln!(out, "{}", id.to_hex_string())?;
        } else {
            writeln!(out, "{id}")?;
        }
    }
    writeln!(out, "records: {}", report.identifiers.len())?;
    writeln!(out, "trailing_bytes: {}", report.trailing_bytes)?;
    if let Some(err) = report.error {
        return Err(err).with_context(|| format!("reading {}", file.display()));
    }
    Ok(())
}

fn add<W: Write>(settings: &QueueConfig, ids: Vec<Identifier>, out: &mut W) -> Result<()> {
    let queue = BoundedUniqueQueue::from_config(settings)?;
    for id in ids {
        let status = if queue.add(id) { "added" } else { "present" };
        writeln!(out, "{status} {id}")?;
    }
    save(&queue)?;
    writeln!(out, "size: {}/{}", queue.len(), queue.capacity())?;
    Ok(())
}

fn trim<W: Write>(settings: &QueueConfig, out: &mut W) -> Result<()> {
    let queue = BoundedUniqueQueue::from_config(settings)?;
    save(&queue)?;
    writeln!(out, "kept: {}", queue.len())?;
    Ok(())
}

fn generate<W: Write>(count: usize, out: &mut W) -> Result<()> {
    for _ in 0..count {
        writeln!(out, "{}", Identifier::new_from_rand(OsRng))?;
    }
    Ok(())
}

fn save(queue: &BoundedUniqueQueue) -> Result<()> {
    let written = queue.try_save(None).with_context(|| {
        let target = queue.source_path().map(|path| path.display().to_string());
        format!("saving {}", target.unwrap_or_default())
    })?;
    log::debug!("idq: wrote {written} records");
    Ok(())
}
