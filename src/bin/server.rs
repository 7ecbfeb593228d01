//! chatlog server binary.
//! Run with: cargo run --bin chatlog-server

use std::process::ExitCode;

use chatlog::start_chatlog;

fn main() -> ExitCode {
    start_chatlog::run()
}
