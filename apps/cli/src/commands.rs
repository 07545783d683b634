use crate::cli::Command;
use anyhow::Context;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;
use stow_storage::{Backend, StorageConfig};
use tracing::info;

/// Runs one subcommand against the configured backend.
///
/// # Errors
/// Propagates backend, configuration and local I/O failures.
pub(crate) fn run(command: Command, config: &StorageConfig) -> anyhow::Result<()> {
    match command {
        Command::Save { name, input, size_hint } => {
            save(open(config)?.as_ref(), &name, input.as_deref(), size_hint)
        },
        Command::Read { name, output } => read(open(config)?.as_ref(), &name, output.as_deref()),
        Command::Stat { name } => print_json(&open(config)?.stat(&name)?),
        Command::List { prefix, suffix } => print_json(&open(config)?.list(&prefix, &suffix)?),
        Command::Copy { src, dst } => {
            open(config)?.copy(&src, &dst)?;
            info!(src, dst, "Copied");
            Ok(())
        },
        Command::Delete { name } => {
            open(config)?.delete(&name)?;
            info!(name, "Deleted");
            Ok(())
        },
        Command::Kind {} => {
            let kind = open(config)?.kind();
            writeln!(io::stdout().lock(), "{kind}")?;
            Ok(())
        },
        Command::Purge { max_age_secs } => {
            let backend = config.open_filesystem().context("Failed to open storage")?;
            print_json(&backend.purge_staging(Duration::from_secs(max_age_secs)))
        },
    }
}

fn open(config: &StorageConfig) -> anyhow::Result<Box<dyn Backend>> {
    config.open().context("Failed to open storage")
}

fn save(
    backend: &dyn Backend,
    name: &str,
    input: Option<&Path>,
    size_hint: Option<u64>,
) -> anyhow::Result<()> {
    if let Some(path) = input {
        let mut file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let hint = match size_hint {
            Some(hint) => hint,
            None => file.metadata().map(|m| m.len()).unwrap_or_default(),
        };
        backend.save(name, &mut file, hint)?;
    } else {
        let mut stdin = io::stdin().lock();
        backend.save(name, &mut stdin, size_hint.unwrap_or_default())?;
    }

    info!(name, "Saved");
    Ok(())
}

fn read(backend: &dyn Backend, name: &str, output: Option<&Path>) -> anyhow::Result<()> {
    let mut reader = backend.open_reader(name)?;

    let copied = if let Some(path) = output {
        let mut file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        let copied = io::copy(&mut reader, &mut file)?;
        file.sync_all()?;
        copied
    } else {
        let mut stdout = io::stdout().lock();
        let copied = io::copy(&mut reader, &mut stdout)?;
        stdout.flush()?;
        copied
    };

    info!(name, bytes = copied, "Read");
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
