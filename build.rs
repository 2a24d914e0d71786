use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/ffi.rs");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set"));
    let header = crate_dir.join("include").join("diamond.h");

    let config = match cbindgen::Config::from_file(crate_dir.join("cbindgen.toml")) {
        Ok(c) => c,
        Err(e) => {
            println!("cargo:warning=skipping C header: {e}");
            return;
        }
    };

    // The header only matters to C consumers.
    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            if let Some(dir) = header.parent() {
                if let Err(e) = std::fs::create_dir_all(dir) {
                    println!("cargo:warning=cannot create {}: {e}", dir.display());
                    return;
                }
            }
            // `false` means the header on disk was already up to date.
            let written = bindings.write_to_file(&header);
            if !written && !header.exists() {
                println!("cargo:warning=C header {} was not written", header.display());
            }
        }
        Err(e) => println!("cargo:warning=cbindgen failed, C header not updated: {e}"),
    }
}
