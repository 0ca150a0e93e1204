// Adapters layer: concrete implementations for the OS process table, the PID record and the terminal.

pub mod pid_file;
pub mod system;
pub mod terminal;

pub use pid_file::FilePidStore;
pub use system::SystemProcessControl;
pub use terminal::TerminalConsole;
