//! Acquiring clipboard references for copy/cut/paste commands.

use super::{AccessPolicy, ClipboardError, ClipboardReference, EditingContext, platform_client};

/// Acquire a clipboard reference for `context` under `policy`.
///
/// `is_drag` selects the ephemeral drag-and-drop clipboard instead of
/// the persistent system clipboard. The handle is fresh for every call
/// and the returned reference carries exactly the requested policy.
///
/// # Errors
///
/// `NoPlatformClient` if the context has no platform client, `Platform`
/// if the backend cannot hand out a handle.
pub fn acquire_clipboard(
    context: &dyn EditingContext,
    policy: AccessPolicy,
    is_drag: bool,
) -> Result<ClipboardReference, ClipboardError> {
    let client = platform_client(context)?;

    let handle = if is_drag {
        client.create_drag_clipboard()?
    } else {
        client.create_general_clipboard()?
    };

    tracing::debug!(
        frame = %context.frame_id(),
        backend = client.name(),
        handle = %handle.id(),
        %policy,
        is_drag,
        "clipboard acquired"
    );

    Ok(ClipboardReference::new(
        handle,
        policy,
        is_drag,
        context.frame_id(),
    ))
}
