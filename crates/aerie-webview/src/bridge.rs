//! Command channel between host and content.
//!
//! Inbound commands are plain strings; results travel back as JSON text
//! the content-side callback can `JSON.parse`. The content signals the end
//! of its bootstrap by sending the reserved sentinel command, which never
//! carries a payload and never returns a result.

use std::path::Path;

use serde_json::Value;
use tracing::warn;

use aerie_common::{BridgeError, Result};

/// The bootstrap sentinel. Sent once per document load, after the channel
/// glue has run; flips the surface ready and triggers a queue drain.
pub const READY_SENTINEL: &str = "domDone";

/// Host-side handler for inbound commands that no hook subscriber claimed.
///
/// Errors are caught at the dispatch boundary and converted into a null
/// result, so the content-side callback always fires.
pub type CommandHandler = Box<dyn FnMut(&str) -> Result<Value>>;

/// Channel glue injected into every document at document-ready.
///
/// Installs `bridgeCommand(arg, cb)` on top of the engine's channel
/// transport and sends the bootstrap sentinel. Results arrive as JSON text
/// and are parsed before reaching the user-provided callback.
pub const BRIDGE_GLUE: &str = r#"
var bridgeCommand;
new HostChannel(window.hostChannelTransport, function (channel) {
    bridgeCommand = function (arg, cb) {
        var resultCB = function (res) {
            // pass result back to user-provided callback
            if (cb) {
                cb(JSON.parse(res));
            }
        };

        channel.objects.host.cmd(arg, resultCB);
        return false;
    };
    bridgeCommand("domDone");
});
"#;

/// Prepend the engine's channel prelude (the script defining
/// `HostChannel`) to the bridge glue.
pub fn compose_bootstrap_script(channel_prelude: &str) -> String {
    format!("{channel_prelude}\n{BRIDGE_GLUE}")
}

/// Read the channel prelude shipped with the engine.
pub fn read_channel_prelude(asset: &Path) -> Result<String> {
    std::fs::read_to_string(asset)
        .map_err(|_| BridgeError::BootstrapAssetMissing(asset.to_path_buf()))
}

/// Load the full bootstrap script, degrading to glue-only when the prelude
/// asset is missing: content -> host messaging is then dead, but console
/// logging still works.
pub fn load_bootstrap_script(asset: &Path) -> String {
    match read_channel_prelude(asset) {
        Ok(prelude) => compose_bootstrap_script(&prelude),
        Err(err) => {
            warn!(%err, "bridge bootstrap degraded");
            BRIDGE_GLUE.to_string()
        }
    }
}
