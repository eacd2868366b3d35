fn main() {
    tessera::cli::run();
}
