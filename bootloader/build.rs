//! Embeds the kernel image into the boot stage.
//!
//! The path of the kernel ELF is read from `STAGE2_KERNEL`. Without it, an empty
//! image is embedded and booting fails cleanly with `NotElf`.
#![forbid(unsafe_code)]
use std::{env::var, fs, path::PathBuf};

/// A macro to print cargo instructions.
macro_rules! cargo {
    ($param:expr, $value:expr) => {
        println!("cargo:{param}={value}", param = $param, value = $value);
    };
}

fn main() {
    cargo!("rerun-if-changed", "./build.rs");
    cargo!("rerun-if-env-changed", "STAGE2_KERNEL");

    let kernel_path = if let Ok(path) = var("STAGE2_KERNEL") {
        cargo!("rerun-if-changed", &path);
        PathBuf::from(path)
    } else {
        let out_dir = PathBuf::from(var("OUT_DIR").expect("OUT_DIR is set by cargo"));
        let placeholder = out_dir.join("kernel.placeholder");
        fs::write(&placeholder, []).expect("Failed to write placeholder kernel image");
        cargo!("warning", "STAGE2_KERNEL is not set, embedding an empty kernel image");
        placeholder
    };

    cargo!("rustc-env", format!("KERNEL_IMAGE_PATH={}", kernel_path.display()));
}
