use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Estimate the typed city
    Lookup,
    /// Re-read the route sheet
    Reload,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Down, Enter, Esc, Left, Right, Tab, Up};

    // Global shortcuts
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    if key.code == Char('r') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Reload;
    }
    if key.code == Tab {
        app.screen = match app.screen {
            Screen::Lookup => Screen::Routes,
            Screen::Routes => Screen::Lookup,
        };
        return Action::None;
    }

    let mut action = Action::None;

    match app.screen {
        Screen::Lookup => match key.code {
            Char(character) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT)
                {
                    app.city_input.push(character);
                }
            }
            Backspace => {
                app.city_input.pop();
            }
            Enter => {
                action = Action::Lookup;
            }
            Esc => {
                if app.city_input.is_empty() {
                    action = Action::Quit;
                } else {
                    app.city_input.clear();
                    app.lookup = None;
                }
            }
            _ => {}
        },

        Screen::Routes => match key.code {
            Up | Char('k') => {
                app.route_list_index = app.route_list_index.saturating_sub(1);
            }
            Down | Char('j') => {
                if app.route_list_index + 1 < app.visible_routes().len() {
                    app.route_list_index += 1;
                }
            }
            Left | Right | Char('t') => {
                app.toggle_route_table();
            }
            Char('r') => {
                action = Action::Reload;
            }
            Char('q') | Esc => {
                action = Action::Quit;
            }
            _ => {}
        },
    }
    action
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use aqualan_core::{CycleKind, SharedScheduler};

    use super::*;

    fn press(app: &mut App, code: KeyCode) -> Action {
        handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), app)
    }

    fn app() -> App {
        App::new(Arc::new(SharedScheduler::builtin()), None)
    }

    #[test]
    fn typing_then_enter_looks_up() {
        let mut app = app();
        for ch in "Getxoq".chars() {
            assert_eq!(press(&mut app, KeyCode::Char(ch)), Action::None);
        }
        assert_eq!(press(&mut app, KeyCode::Backspace), Action::None);
        assert_eq!(app.city_input, "Getxo");
        assert_eq!(press(&mut app, KeyCode::Enter), Action::Lookup);
    }

    #[test]
    fn escape_clears_then_quits() {
        let mut app = app();
        app.city_input = "Bil".to_owned();
        assert_eq!(press(&mut app, KeyCode::Esc), Action::None);
        assert!(app.city_input.is_empty());
        assert_eq!(press(&mut app, KeyCode::Esc), Action::Quit);
    }

    #[test]
    fn routes_screen_navigation() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.screen, Screen::Routes);

        press(&mut app, KeyCode::Up);
        assert_eq!(app.route_list_index, 0);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.route_list_index, 2);

        press(&mut app, KeyCode::Right);
        assert_eq!(app.route_table, CycleKind::Weekly);
        assert_eq!(app.route_list_index, 0);

        assert_eq!(press(&mut app, KeyCode::Char('r')), Action::Reload);
        assert_eq!(press(&mut app, KeyCode::Char('q')), Action::Quit);
    }

    #[test]
    fn ctrl_shortcuts_work_everywhere() {
        let mut app = app();
        let ctrl = |code| KeyEvent::new(code, KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(ctrl(KeyCode::Char('r')), &mut app), Action::Reload);
        assert_eq!(handle_key_event(ctrl(KeyCode::Char('c')), &mut app), Action::Quit);
        assert!(app.city_input.is_empty());
    }
}
