//! Regenerates `include/character_ffi.h` from the `extern "C"` surface.

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=build.rs");

    let Ok(crate_dir) = std::env::var("CARGO_MANIFEST_DIR") else {
        println!("cargo:warning=CARGO_MANIFEST_DIR not set, skipping header generation");
        return;
    };

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("CHARACTER_FFI_H")
        .with_pragma_once(true)
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(format!("{crate_dir}/include/character_ffi.h"));
        }
        Err(e) => println!("cargo:warning=cbindgen failed, header not updated: {e}"),
    }
}
