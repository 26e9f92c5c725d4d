//! Keyboard stand-in for the panel buttons
//!
//! Reads stdin line by line: `l` presses learn, `t` presses tap. Several
//! letters on one line are pressed in order.
//!
//! Stdin is read on a plain OS thread; a blocking read must not keep the
//! tokio runtime from shutting down.

use std::io::BufRead;
use std::thread::JoinHandle;

use tracing::{debug, info, warn};

use super::VirtualButtons;

/// Apply one line of key presses, returning how many were recognised
pub fn apply_keys(buttons: &VirtualButtons, line: &str) -> usize {
    let mut pressed = 0;
    for key in line.chars().filter(|c| !c.is_whitespace()) {
        match key.to_ascii_lowercase() {
            'l' => buttons.press_learn(),
            't' => buttons.press_tap(),
            other => {
                warn!("Unknown key '{}' (use 'l' for learn, 't' for tap)", other);
                continue;
            }
        }
        pressed += 1;
    }
    pressed
}

/// Spawn a thread feeding stdin key presses into `buttons`
pub fn spawn_keyboard_reader(buttons: VirtualButtons) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("keyboard-buttons".to_string())
        .spawn(move || {
            info!("Keyboard buttons enabled: 'l' + Enter = learn, 't' + Enter = tap");
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        apply_keys(&buttons, &line);
                    }
                    Err(e) => {
                        warn!("Failed to read stdin: {}", e);
                        return;
                    }
                }
            }
            debug!("stdin closed, keyboard buttons disabled");
        })
}
