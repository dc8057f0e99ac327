fn main() {
    if let Err(err) = stx_node_map::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
