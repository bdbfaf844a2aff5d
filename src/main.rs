fn main() {
    if let Err(e) = desktop_pet::run() {
        tracing::error!("desktop-pet exited: {e}");
        std::process::exit(1);
    }
}
