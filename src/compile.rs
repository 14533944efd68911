//! Optional external rule-set compiler invocation.
//!
//! The text artifact can be handed to an external compiler binary (mihomo
//! style: `<bin> convert-ruleset domain text <src> <dst>`) to produce a
//! binary-encoded rule set. The compiler is invoked only if present; any
//! failure here is logged and never invalidates the text artifact.

use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

/// Compile a text rule set into a binary artifact.
///
/// Returns `true` when the compiler ran and exited successfully. A missing
/// binary is a silent skip; a failed invocation is logged as an error.
pub fn compile_ruleset(bin: &str, text_path: &Path, out_path: &Path) -> bool {
    let result = Command::new(bin)
        .arg("convert-ruleset")
        .arg("domain")
        .arg("text")
        .arg(text_path)
        .arg(out_path)
        .status();

    match result {
        Ok(status) if status.success() => {
            log::info!("compiled {:?} -> {:?}", text_path, out_path);
            true
        }
        Ok(status) => {
            log::error!("compiler {} exited with {} for {:?}", bin, status, text_path);
            false
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("compiler {} not found, skipping binary artifact", bin);
            false
        }
        Err(e) => {
            log::error!("failed to run compiler {}: {}", bin, e);
            false
        }
    }
}
