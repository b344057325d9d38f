use cfg_aliases::cfg_aliases;

fn main() {
    // The script doesn't depend on our code
    println!("cargo:rerun-if-changed=build.rs");
    // But it *does* depend on cfgs!
    println!("cargo:rerun-if-env-changed=RUSTFLAGS");
    println!("cargo:rerun-if-env-changed=RUSTDOCFLAGS");

    cfg_aliases! {
        // Win32 hook is requested and available at compile time or documenting.
        // (ie, enabling "win32" shouldn't compile err on Linux.)
        win32_hook: { all(feature = "win32", any(docsrs, target_os = "windows")) },
    }
}
