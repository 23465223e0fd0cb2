fn main() {
    force_categorizer::cli::run();
}
