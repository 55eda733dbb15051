use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `formctl descriptor-schema`.
pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&form_core::descriptor_schema(), flags.format)
}
