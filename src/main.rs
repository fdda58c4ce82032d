mod cli;
mod editing;
mod platform;
mod watch;

use std::io::{Read, Write};
use std::time::Duration;

use clap::Parser;
use cli::{Backend, Cli, Command};
use editing::{AccessPolicy, ClipboardError, EditingContext, Frame, acquire_clipboard, can_paste};
use platform::BackendConfig;
use tracing_subscriber::EnvFilter;

/// Errors from one-shot commands.
#[derive(Debug, thiserror::Error)]
enum CommandError {
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let backend = match cli.backend {
        Backend::X11 => BackendConfig::X11 { xclip: cli.xclip },
        Backend::Memory => BackendConfig::Memory,
    };
    let mut frame = Frame::new(platform::open(backend));
    let mut out = std::io::stdout();

    let result = match cli.command {
        Command::CanPaste { not_editable } => {
            frame.set_editable(!not_editable);
            print_can_paste(&frame, &mut out)
        }
        Command::Types => print_types(&frame, &mut out),
        Command::Read { ty } => read(&frame, &ty, &mut out),
        Command::Write { ty, policy } => {
            let mut data = Vec::new();
            match std::io::stdin().read_to_end(&mut data) {
                Ok(_) => write(&frame, &ty, policy, &data),
                Err(e) => Err(e.into()),
            }
        }
        Command::Clear { ty, policy } => clear(&frame, ty.as_deref(), policy),
        Command::Watch {
            interval_ms,
            not_editable,
        } => {
            frame.set_editable(!not_editable);
            let config = watch::WatchConfig {
                interval: Duration::from_millis(interval_ms.max(1)),
            };
            let report =
                |enabled: bool| println!("{}", if enabled { "enabled" } else { "disabled" });
            if let Err(e) = watch::run(frame, config, report).await {
                tracing::error!(error = %e, "watch failed");
                eprintln!("clipgate watch: {e}");
                std::process::exit(1);
            }
            // An evaluation abandoned at shutdown may still hold a
            // blocking worker; exit without waiting for it.
            Ok(0)
        }
    };

    match result {
        Ok(code) => {
            let _ = out.flush();
            std::process::exit(code)
        }
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("clipgate: {e}");
            std::process::exit(1);
        }
    }
}

fn print_can_paste(frame: &Frame, out: &mut dyn Write) -> Result<i32, CommandError> {
    writeln!(out, "{}", can_paste(frame)?)?;
    Ok(0)
}

fn print_types(frame: &Frame, out: &mut dyn Write) -> Result<i32, CommandError> {
    let clipboard = acquire_clipboard(frame, AccessPolicy::ReadOnly, false)?;
    let types = clipboard.types()?;
    tracing::debug!(
        handle = %clipboard.handle_id(),
        frame = %clipboard.frame(),
        drag = clipboard.is_for_dragging(),
        count = types.len(),
        "types listed"
    );
    for ty in types.iter() {
        writeln!(out, "{ty}")?;
    }
    Ok(0)
}

fn read(frame: &Frame, ty: &str, out: &mut dyn Write) -> Result<i32, CommandError> {
    let clipboard = acquire_clipboard(frame, AccessPolicy::ReadOnly, false)?;
    match clipboard.read(ty)? {
        Some(data) => {
            out.write_all(&data)?;
            Ok(0)
        }
        None => {
            eprintln!("clipgate: clipboard has no {ty}");
            Ok(1)
        }
    }
}

fn write(frame: &Frame, ty: &str, policy: AccessPolicy, data: &[u8]) -> Result<i32, CommandError> {
    let clipboard = acquire_clipboard(frame, policy, false)?;
    if clipboard.write(ty, data)? {
        tracing::info!(frame = %frame.frame_id(), ty, bytes = data.len(), "clipboard written");
        Ok(0)
    } else {
        eprintln!("clipgate: denied by {policy} policy");
        Ok(1)
    }
}

fn clear(frame: &Frame, ty: Option<&str>, policy: AccessPolicy) -> Result<i32, CommandError> {
    let clipboard = acquire_clipboard(frame, policy, false)?;
    let cleared = match ty {
        Some(ty) => clipboard.clear(ty)?,
        None => clipboard.clear_all()?,
    };
    if cleared {
        Ok(0)
    } else if policy.allows_write() {
        eprintln!("clipgate: this clipboard backend cannot clear");
        Ok(1)
    } else {
        eprintln!("clipgate: denied by {policy} policy");
        Ok(1)
    }
}
