//! Puts `memory.x` on the linker search path and adds the cortex-m-rt and defmt linker scripts
//! when building the firmware.
use std::{env, fs, path::PathBuf};

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let target = env::var("TARGET").unwrap_or_default();

    fs::write(out_dir.join("memory.x"), include_bytes!("memory.x")).expect("unable to write memory.x");
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Host builds only run the library tests
    if target.starts_with("thumbv") {
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}
