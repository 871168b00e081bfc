use progressive_dinner::{cli, logging};

fn main() {
    logging::init_logging();
    std::process::exit(cli::run());
}
