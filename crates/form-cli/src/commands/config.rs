use form_config::FormConfig;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `formctl config`.
pub fn handle(config: &FormConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(config, flags.format)
}
