use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Terminal input the quiz reacts to
#[derive(Clone, Debug)]
pub enum Input {
    Key(KeyEvent),
    Resize,
}

/// Anything that can hand over terminal input, waiting at most `timeout`.
pub trait InputSource {
    fn next_input(&self, timeout: Duration) -> Option<Input>;
}

/// Queued input, as fed by the crossterm reader thread or by tests
impl InputSource for Receiver<Input> {
    fn next_input(&self, timeout: Duration) -> Option<Input> {
        self.recv_timeout(timeout).ok()
    }
}

/// Spawn a thread forwarding crossterm key and resize events.
pub fn terminal_input() -> Receiver<Input> {
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || loop {
        let input = match event::read() {
            Ok(Event::Key(key)) => Input::Key(key),
            Ok(Event::Resize(_, _)) => Input::Resize,
            Ok(_) => continue,
            Err(_) => break,
        };
        if tx.send(input).is_err() {
            break;
        }
    });

    rx
}

/// What the app loop should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Act(Action),
    Redraw,
    /// Nothing arrived in time, or the key means nothing on this screen
    Idle,
}

/// Turns raw input into per-screen actions, one step at a time.
pub struct Runner<S: InputSource> {
    input: S,
    poll: Duration,
}

impl<S: InputSource> Runner<S> {
    pub fn new(input: S, poll: Duration) -> Self {
        Self { input, poll }
    }

    /// Wait up to the poll interval for input and interpret it for `state`.
    pub fn step(&self, state: AppState) -> Step {
        match self.input.next_input(self.poll) {
            Some(Input::Key(key)) => action_for_key(state, key).map_or(Step::Idle, Step::Act),
            Some(Input::Resize) => Step::Redraw,
            None => Step::Idle,
        }
    }
}

/// Which screen the app is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Start,
    Quiz,
    Results,
}

/// What a key press asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    PrevLimit,
    NextLimit,
    ToggleMode,
    Start,
    SelectOption(usize),
    Advance,
    ScrollUp,
    ScrollDown,
    /// Back to the start screen, discarding the session
    Restart,
    /// New session with the same settings
    Replay,
    Quit,
}

/// Options are picked by letter (`a` is the first) or by digit (`1` is the first).
fn option_index(c: char) -> Option<usize> {
    match c {
        'a'..='z' => Some(c as usize - 'a' as usize),
        'A'..='Z' => Some(c as usize - 'A' as usize),
        '1'..='9' => Some(c as usize - '1' as usize),
        _ => None,
    }
}

pub fn action_for_key(state: AppState, key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }
    if key.code == KeyCode::Esc {
        return Some(Action::Quit);
    }

    match state {
        AppState::Start => match key.code {
            KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => Some(Action::PrevLimit),
            KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => Some(Action::NextLimit),
            KeyCode::Tab | KeyCode::Char('m') => Some(Action::ToggleMode),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Start),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        },
        AppState::Quiz => match key.code {
            KeyCode::Enter | KeyCode::Right => Some(Action::Advance),
            KeyCode::Char(c) => option_index(c).map(Action::SelectOption),
            _ => None,
        },
        AppState::Results => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollDown),
            KeyCode::Char('r') => Some(Action::Restart),
            KeyCode::Char('n') => Some(Action::Replay),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn runner_with(inputs: Vec<Input>) -> Runner<Receiver<Input>> {
        let (tx, rx) = mpsc::channel();
        for input in inputs {
            tx.send(input).unwrap();
        }
        Runner::new(rx, Duration::from_millis(1))
    }

    #[test]
    fn step_is_idle_without_input() {
        let runner = runner_with(vec![]);
        assert_eq!(runner.step(AppState::Quiz), Step::Idle);
    }

    #[test]
    fn step_interprets_keys_for_the_screen() {
        let runner = runner_with(vec![
            Input::Key(press(KeyCode::Char('b'))),
            Input::Key(press(KeyCode::Char('n'))),
            Input::Key(press(KeyCode::Char('n'))),
            Input::Resize,
        ]);
        assert_eq!(runner.step(AppState::Quiz), Step::Act(Action::SelectOption(1)));
        assert_eq!(runner.step(AppState::Results), Step::Act(Action::Replay));
        // no binding on the start screen
        assert_eq!(runner.step(AppState::Start), Step::Idle);
        assert_eq!(runner.step(AppState::Start), Step::Redraw);
        assert_eq!(runner.step(AppState::Start), Step::Idle);
    }

    #[test]
    fn option_keys_map_to_indices() {
        let cases = [('a', 0), ('b', 1), ('D', 3), ('1', 0), ('4', 3)];
        for (c, idx) in cases {
            assert_eq!(
                action_for_key(AppState::Quiz, press(KeyCode::Char(c))),
                Some(Action::SelectOption(idx)),
                "key {c}"
            );
        }
        assert_eq!(action_for_key(AppState::Quiz, press(KeyCode::Char('?'))), None);
    }

    #[test]
    fn quiz_keys() {
        assert_eq!(
            action_for_key(AppState::Quiz, press(KeyCode::Enter)),
            Some(Action::Advance)
        );
        assert_eq!(
            action_for_key(AppState::Quiz, press(KeyCode::Right)),
            Some(Action::Advance)
        );
        // letters are options during a quiz, so 'q' does not quit
        assert_eq!(
            action_for_key(AppState::Quiz, press(KeyCode::Char('q'))),
            Some(Action::SelectOption(16))
        );
    }

    #[test]
    fn start_keys() {
        assert_eq!(
            action_for_key(AppState::Start, press(KeyCode::Down)),
            Some(Action::NextLimit)
        );
        assert_eq!(
            action_for_key(AppState::Start, press(KeyCode::Up)),
            Some(Action::PrevLimit)
        );
        assert_eq!(
            action_for_key(AppState::Start, press(KeyCode::Tab)),
            Some(Action::ToggleMode)
        );
        assert_eq!(
            action_for_key(AppState::Start, press(KeyCode::Enter)),
            Some(Action::Start)
        );
    }

    #[test]
    fn results_keys() {
        assert_eq!(
            action_for_key(AppState::Results, press(KeyCode::Char('r'))),
            Some(Action::Restart)
        );
        assert_eq!(
            action_for_key(AppState::Results, press(KeyCode::Char('n'))),
            Some(Action::Replay)
        );
        assert_eq!(
            action_for_key(AppState::Results, press(KeyCode::Down)),
            Some(Action::ScrollDown)
        );
    }

    #[test]
    fn quit_keys_work_everywhere() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for state in [AppState::Start, AppState::Quiz, AppState::Results] {
            assert_eq!(action_for_key(state, press(KeyCode::Esc)), Some(Action::Quit));
            assert_eq!(action_for_key(state, ctrl_c), Some(Action::Quit));
        }
    }

    #[test]
    fn key_releases_are_ignored() {
        let mut key = press(KeyCode::Enter);
        key.kind = KeyEventKind::Release;
        assert_eq!(action_for_key(AppState::Quiz, key), None);
    }
}
