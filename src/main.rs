fn main() {
    if let Err(err) = treeflow::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
