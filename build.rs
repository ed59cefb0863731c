#[cfg(target_os = "windows")]
fn main() {
    use winresource::WindowsResource;

    const ICON: &str = "res/rglucologger.ico";
    println!("cargo:rerun-if-changed={ICON}");

    let mut res = WindowsResource::new();
    if std::path::Path::new(ICON).exists() {
        res.set_icon(ICON);
    }
    res.set("FileDescription", "rGlucoLogger CLI")
        .set("ProductName", "rGlucoLogger")
        .set("OriginalFilename", "rglucologger.exe")
        .set("FileVersion", env!("CARGO_PKG_VERSION"))
        .set("ProductVersion", env!("CARGO_PKG_VERSION"))
        .compile()
        .expect("Failed to embed version resource");
}

#[cfg(not(target_os = "windows"))]
fn main() {}
