use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    // Put the CH32V203 memory layout where riscv-rt's link.x can include it
    let out = PathBuf::from(env::var_os("OUT_DIR").unwrap());
    fs::copy("memory.x", out.join("memory.x")).unwrap();
    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rerun-if-changed=memory.x");
}
