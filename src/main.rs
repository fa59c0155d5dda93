use storetree::ui::output;

fn main() {
    if let Err(err) = storetree::cli::run() {
        output::error(format!("{err:#}"));
        std::process::exit(1);
    }
}
