mod console;
mod progress;

pub use console::{ConsoleReporter, print_error};
pub use progress::format_bar;
