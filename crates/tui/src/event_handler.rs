//! Keyboard handling for the progress dashboard.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use pt_core::channel::LocalChannel;
use tracing::info;

/// Handle a keyboard event from the user.
///
/// Keys:
/// - `q` / `Esc`: quit
/// - `↑` / `↓`: move the selection
/// - `x`: drop the push connection, as a submitting request would
/// - `f`: make the next reconnect attempt fail
///
/// Returns `true` if the application should exit, `false` otherwise.
pub fn handle_keyboard_event(
    key_event: KeyEvent,
    selected_index: &mut usize,
    row_count: usize,
    channel: &LocalChannel,
) -> bool {
    if key_event.kind != KeyEventKind::Press {
        return false;
    }

    match key_event.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            return true;
        }
        KeyCode::Up => {
            *selected_index = selected_index.saturating_sub(1);
        }
        KeyCode::Down => {
            if *selected_index < row_count.saturating_sub(1) {
                *selected_index += 1;
            }
        }
        KeyCode::Char('x') => {
            let fired = channel.close();
            info!(fired, "closed push channel from keyboard");
        }
        KeyCode::Char('f') => {
            channel.fail_next_reconnect("reconnect refused from keyboard");
        }
        _ => {}
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        let channel = LocalChannel::new();
        let mut selected = 0;

        assert!(handle_keyboard_event(
            KeyEvent::from(KeyCode::Char('q')),
            &mut selected,
            0,
            &channel
        ));
        assert!(handle_keyboard_event(
            KeyEvent::from(KeyCode::Esc),
            &mut selected,
            0,
            &channel
        ));
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let channel = LocalChannel::new();
        let mut selected = 0;

        handle_keyboard_event(KeyEvent::from(KeyCode::Up), &mut selected, 2, &channel);
        assert_eq!(selected, 0);

        handle_keyboard_event(KeyEvent::from(KeyCode::Down), &mut selected, 2, &channel);
        handle_keyboard_event(KeyEvent::from(KeyCode::Down), &mut selected, 2, &channel);
        assert_eq!(selected, 1);
    }

    #[test]
    fn test_x_closes_channel() {
        let channel = LocalChannel::new();
        let mut selected = 0;

        let exit = handle_keyboard_event(
            KeyEvent::from(KeyCode::Char('x')),
            &mut selected,
            0,
            &channel,
        );

        assert!(!exit);
        assert!(!channel.is_connected());
        assert_eq!(channel.stats().closes, 1);
    }
}
