use crate::domain::ports::Console;
use crate::utils::error::{LauncherError, Result};
use async_trait::async_trait;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{BufRead, IsTerminal, Write};

/// Operator console on the launcher's own stdout/stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConsole;

#[async_trait]
impl Console for TerminalConsole {
    fn say(&self, line: &str) {
        println!("{}", line);
    }

    async fn wait_for_acknowledgement(&self) -> Result<()> {
        print!("Press any key to exit...");
        std::io::stdout().flush()?;

        tokio::task::spawn_blocking(wait_for_key)
            .await
            .map_err(|e| LauncherError::ConsoleError {
                message: format!("stdin reader stopped: {}", e),
            })??;

        println!();
        Ok(())
    }
}

fn wait_for_key() -> std::io::Result<()> {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        return read_acknowledgement(stdin.lock());
    }

    enable_raw_mode()?;
    let result = loop {
        match event::read() {
            Ok(event) if is_acknowledgement(&event) => break Ok(()),
            Ok(_) => continue,
            Err(e) => break Err(e),
        }
    };
    disable_raw_mode()?;
    result
}

/// Any key press ends the pause. In raw mode Ctrl+C arrives here as an
/// ordinary key, so it closes the launcher too.
pub fn is_acknowledgement(event: &Event) -> bool {
    matches!(event, Event::Key(key) if key.kind == KeyEventKind::Press)
}

/// Non-interactive stdin: one line or EOF is enough.
pub fn read_acknowledgement<R: BufRead>(mut reader: R) -> std::io::Result<()> {
    let mut line = String::new();
    reader.read_line(&mut line).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::io::Cursor;

    #[test]
    fn test_any_key_press_acknowledges() {
        let plain = KeyEvent::new_with_kind(KeyCode::Char('q'), KeyModifiers::NONE, KeyEventKind::Press);
        let space = KeyEvent::new_with_kind(KeyCode::Char(' '), KeyModifiers::NONE, KeyEventKind::Press);
        let escape = KeyEvent::new_with_kind(KeyCode::Esc, KeyModifiers::NONE, KeyEventKind::Press);
        assert!(is_acknowledgement(&Event::Key(plain)));
        assert!(is_acknowledgement(&Event::Key(space)));
        assert!(is_acknowledgement(&Event::Key(escape)));
    }

    #[test]
    fn test_ctrl_c_acknowledges() {
        let ctrl_c =
            KeyEvent::new_with_kind(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press);
        assert!(is_acknowledgement(&Event::Key(ctrl_c)));
    }

    #[test]
    fn test_release_and_resize_do_not_acknowledge() {
        let release =
            KeyEvent::new_with_kind(KeyCode::Char('q'), KeyModifiers::NONE, KeyEventKind::Release);
        assert!(!is_acknowledgement(&Event::Key(release)));
        assert!(!is_acknowledgement(&Event::Resize(80, 24)));
        assert!(!is_acknowledgement(&Event::FocusGained));
    }

    #[test]
    fn test_eof_acknowledges_when_not_a_terminal() {
        assert!(read_acknowledgement(Cursor::new(Vec::<u8>::new())).is_ok());
        assert!(read_acknowledgement(Cursor::new(b"\n".to_vec())).is_ok());
    }
}
