//! Algorithm registry listing

use anyhow::Result;

use zip_deflate::{CapabilityFlags, Diagnostics, algorithms};

use crate::utils::{add_table_row, create_table};

pub fn execute() -> Result<()> {
    let diagnostics = Diagnostics::new();
    let mut table = create_table(&["Method", "Name", "Mode", "Capabilities"]);

    for descriptor in algorithms() {
        let algorithm = descriptor.allocate(0, &diagnostics)?;
        let flags = algorithm.query_flags();
        descriptor.deallocate(algorithm);

        add_table_row(
            &mut table,
            vec![
                descriptor.method.to_string(),
                descriptor.name.to_string(),
                descriptor.mode.to_string(),
                describe_flags(flags),
            ],
        );
    }

    table.printstd();
    Ok(())
}

/// Render capability flags as a comma separated list
fn describe_flags(flags: CapabilityFlags) -> String {
    if flags.is_empty() {
        return "-".to_string();
    }
    flags
        .iter_names()
        .map(|(name, _)| name.to_lowercase().replace('_', "-"))
        .collect::<Vec<_>>()
        .join(", ")
}
