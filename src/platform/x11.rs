//! X11 clipboard backend: CLIPBOARD selection via `xclip`.
//!
//! Payload transfer goes through `xclip -selection clipboard`, run
//! synchronously with `std::process::Command`. When a display is
//! reachable, a shared x11rb connection asks for the selection owner
//! first: an unowned CLIPBOARD is empty and costs no process spawn.
//!
//! XDND drags are not served by xclip, so drag clipboards are in-memory.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

use x11rb::protocol::xproto::{self, Atom};
use x11rb::rust_connection::RustConnection;

use super::memory::MemoryClipboard;
use super::{
    ContentTypeSet, HandleId, PlatformClipboardHandle, PlatformClipboardProvider, PlatformError,
};

/// Targets every selection owner advertises that are not payload types.
const META_TARGETS: &[&str] = &["TARGETS", "TIMESTAMP", "MULTIPLE", "SAVE_TARGETS", "DELETE"];

/// X11 connection used to query the CLIPBOARD selection owner.
struct SelectionProbe {
    conn: RustConnection,
    clipboard: Atom,
}

impl SelectionProbe {
    fn connect() -> Result<Self, PlatformError> {
        let (conn, _screen_num) = RustConnection::connect(None)
            .map_err(|e| PlatformError::Display(format!("X11 connect failed: {e}")))?;

        let clipboard = xproto::intern_atom(&conn, false, b"CLIPBOARD")
            .map_err(|e| PlatformError::Display(format!("intern_atom: {e}")))?
            .reply()
            .map_err(|e| PlatformError::Display(format!("intern_atom reply: {e}")))?
            .atom;

        Ok(Self { conn, clipboard })
    }

    fn has_owner(&self) -> Result<bool, PlatformError> {
        let reply = xproto::get_selection_owner(&self.conn, self.clipboard)
            .map_err(|e| PlatformError::Display(format!("get_selection_owner: {e}")))?
            .reply()
            .map_err(|e| PlatformError::Display(format!("get_selection_owner reply: {e}")))?;
        Ok(reply.owner != x11rb::NONE)
    }
}

/// X11 implementation of `PlatformClipboardProvider`.
pub struct X11ClipboardProvider {
    xclip: PathBuf,
    probe: Option<Arc<SelectionProbe>>,
    drag: MemoryClipboard,
}

impl X11ClipboardProvider {
    /// Create a provider and try to open the owner probe.
    ///
    /// A missing display is not fatal: every query then goes through
    /// xclip alone.
    pub fn connect(xclip: PathBuf) -> Self {
        let probe = match SelectionProbe::connect() {
            Ok(probe) => {
                tracing::debug!("x11 clipboard: selection owner probe ready");
                Some(Arc::new(probe))
            }
            Err(e) => {
                tracing::warn!(error = %e, "x11 clipboard: no display, using xclip only");
                None
            }
        };
        Self {
            xclip,
            probe,
            drag: MemoryClipboard::new(),
        }
    }

    /// Create a provider that never opens a display connection.
    pub fn with_xclip(xclip: PathBuf) -> Self {
        Self {
            xclip,
            probe: None,
            drag: MemoryClipboard::new(),
        }
    }
}

impl PlatformClipboardProvider for X11ClipboardProvider {
    fn name(&self) -> &'static str {
        "x11"
    }

    fn create_general_clipboard(&self) -> Result<Box<dyn PlatformClipboardHandle>, PlatformError> {
        let id = HandleId::next();
        tracing::trace!(handle = %id, "x11 clipboard: acquired");
        Ok(Box::new(X11Handle {
            id,
            xclip: self.xclip.clone(),
            probe: self.probe.clone(),
        }))
    }

    fn create_drag_clipboard(&self) -> Result<Box<dyn PlatformClipboardHandle>, PlatformError> {
        self.drag.create_drag_clipboard()
    }
}

struct X11Handle {
    id: HandleId,
    xclip: PathBuf,
    probe: Option<Arc<SelectionProbe>>,
}

impl X11Handle {
    fn program(&self) -> String {
        self.xclip.display().to_string()
    }

    /// Run `xclip -selection clipboard <args>` and capture stdout.
    ///
    /// A non-zero exit means the selection (or the requested target) is
    /// not available and maps to `None`.
    fn output(&self, args: &[&str]) -> Result<Option<Vec<u8>>, PlatformError> {
        let output = xclip_command(&self.xclip)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|source| PlatformError::Spawn {
                program: self.program(),
                source,
            })?;

        if output.status.success() {
            Ok(Some(output.stdout))
        } else {
            tracing::trace!(status = %output.status, ?args, "xclip: nothing to read");
            Ok(None)
        }
    }

    fn owned(&self) -> bool {
        match &self.probe {
            Some(probe) => probe.has_owner().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "x11 clipboard: owner probe failed");
                true
            }),
            None => true,
        }
    }
}

impl PlatformClipboardHandle for X11Handle {
    fn id(&self) -> HandleId {
        self.id
    }

    fn types(&self) -> Result<ContentTypeSet, PlatformError> {
        if !self.owned() {
            return Ok(ContentTypeSet::new());
        }
        Ok(self
            .output(&["-o", "-t", "TARGETS"])?
            .map(|stdout| parse_targets(&stdout))
            .unwrap_or_default())
    }

    fn read(&self, ty: &str) -> Result<Option<Vec<u8>>, PlatformError> {
        if !self.owned() {
            return Ok(None);
        }
        self.output(&["-o", "-t", ty])
    }

    fn write(&self, ty: &str, data: &[u8]) -> Result<(), PlatformError> {
        let mut child = xclip_command(&self.xclip)
            .args(["-t", ty, "-i"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| PlatformError::Spawn {
                program: self.program(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(source) = stdin.write_all(data) {
                drop(stdin);
                // Reap the child so a failed copy leaves no zombie behind.
                let _ = child.kill();
                let _ = child.wait();
                return Err(PlatformError::Pipe {
                    program: self.program(),
                    source,
                });
            }
            // Drop stdin to close the pipe so xclip can finish.
        }

        let status = child.wait().map_err(|source| PlatformError::Pipe {
            program: self.program(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(PlatformError::Exit {
                program: self.program(),
                status: status.to_string(),
            })
        }
    }

    fn clear(&self, ty: &str) -> Result<bool, PlatformError> {
        tracing::debug!(ty, "x11 clipboard: clearing a single target is unsupported");
        Ok(false)
    }

    fn clear_all(&self) -> Result<bool, PlatformError> {
        tracing::debug!("x11 clipboard: clearing the selection is unsupported");
        Ok(false)
    }
}

impl Drop for X11Handle {
    fn drop(&mut self) {
        tracing::trace!(handle = %self.id, "x11 clipboard: released");
    }
}

fn xclip_command(xclip: &Path) -> Command {
    let mut cmd = Command::new(xclip);
    cmd.args(["-selection", "clipboard"]);
    cmd
}

/// Parse `xclip -t TARGETS` output into payload types.
fn parse_targets(stdout: &[u8]) -> ContentTypeSet {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(str::trim)
        .filter(|t| !t.is_empty() && !META_TARGETS.contains(t))
        .collect()
}
