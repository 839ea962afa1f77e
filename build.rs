fn main() {
    // Embed Windows resources (version info)
    #[cfg(windows)]
    {
        let mut res = winres::WindowsResource::new();
        res.set("ProductName", "JumpListManager");
        res.set("FileDescription", "Jump List inspector for Windows");
        res.set("CompanyName", "JumpListManager Contributors");
        res.set("OriginalFilename", "jumplist-manager.exe");
        res.set("FileVersion", env!("CARGO_PKG_VERSION"));
        res.set("ProductVersion", env!("CARGO_PKG_VERSION"));
        res.compile().unwrap();
    }
}
