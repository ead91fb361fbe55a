fn main() -> Result<(), Box<dyn std::error::Error>> {
    tutor::cli::main()
}
