//! Precompiling external header modules into the module cache.

use crate::error::BuildError;
use crate::layout::BuildLayout;
use crate::toolchain::{Invocation, Toolchain};

/// Compiles each header in `modules` whose interface is not yet in the
/// module cache. Returns the headers compiled.
///
/// Only existence is checked: a cached interface is never considered stale.
pub fn bootstrap_modules(
    layout: &BuildLayout,
    modules: &[String],
    toolchain: &mut dyn Toolchain,
) -> Result<Vec<String>, BuildError> {
    let mut compiled = Vec::new();
    for module in modules {
        let interface = layout.header_interface_path(module);
        if interface.exists() {
            tracing::debug!(module = %module, "header module cached");
            continue;
        }
        toolchain.invoke(&Invocation::CompileHeaderModule {
            header: module.clone(),
            interface,
        })?;
        compiled.push(module.clone());
    }
    Ok(compiled)
}
