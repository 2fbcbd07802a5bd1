//! Standalone single-file executables.

use std::path::PathBuf;

use strata_config::LoneGroupConfig;

use crate::error::BuildError;
use crate::layout::BuildLayout;
use crate::staleness::is_stale;
use crate::toolchain::{Invocation, Toolchain};

/// Builds every lone unit of `groups` whose executable is missing or older
/// than its source, in declared order. Returns the executables built.
///
/// Lone units sit outside the primary graph and never touch session state.
pub fn build_lone_units(
    layout: &BuildLayout,
    groups: &[LoneGroupConfig],
    toolchain: &mut dyn Toolchain,
) -> Result<Vec<PathBuf>, BuildError> {
    let mut built = Vec::new();
    for group in groups {
        for unit in layout.lone_units(group) {
            if !is_stale(&unit.source, &unit.executable)? {
                continue;
            }
            toolchain.invoke(&Invocation::BuildExecutable {
                source: unit.source,
                executable: unit.executable.clone(),
            })?;
            built.push(unit.executable);
        }
    }
    Ok(built)
}
