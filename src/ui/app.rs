// Screen state and key handling

use crate::list::moved;
use crate::state::TaskState;
use crate::task::Task;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

/// What the keyboard is currently driving
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Add-task input row is shown and focused
    Adding,
    /// Row with `id` is being edited in place
    Editing { id: String },
    /// Row with `id` is grabbed; `order` is the previewed arrangement
    Dragging { id: String, order: Vec<String> },
}

/// Everything the single screen needs
pub struct App {
    state: TaskState,
    mode: Mode,
    selected: usize,
    input: String,
    edit_text: String,
    should_quit: bool,
}

impl App {
    pub fn new(state: TaskState) -> Self {
        Self {
            state,
            mode: Mode::Normal,
            selected: 0,
            input: String::new(),
            edit_text: String::new(),
            should_quit: false,
        }
    }

    pub fn state(&self) -> &TaskState {
        &self.state
    }

    pub fn into_state(self) -> TaskState {
        self.state
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Text typed into the add-task row
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn edit_text(&self) -> &str {
        &self.edit_text
    }

    pub fn show_input(&self) -> bool {
        self.mode == Mode::Adding
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Tasks in display order, following the drag preview while one is active
    pub fn visible_tasks(&self) -> Vec<&Task> {
        let list = self.state.tasks();
        match &self.mode {
            Mode::Dragging { order, .. } => order.iter().filter_map(|id| list.get(id)).collect(),
            _ => list.iter().collect(),
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            self.handle_key(key);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.mode.clone() {
            Mode::Normal => self.normal_key(key.code),
            Mode::Adding => self.adding_key(key.code),
            Mode::Editing { id } => self.editing_key(key.code, &id),
            Mode::Dragging { id, order } => self.dragging_key(key.code, id, order),
        }
    }

    fn normal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('a') => self.mode = Mode::Adding,
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.state.tasks().len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('x') => {
                if let Some(id) = self.selected_id() {
                    self.state.toggle_complete(&id);
                }
            }
            KeyCode::Char('e') => {
                if let Some(task) = self.state.tasks().as_slice().get(self.selected) {
                    self.edit_text = task.text.clone();
                    self.mode = Mode::Editing { id: task.id.clone() };
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.state.delete(&id);
                    self.clamp_selection();
                }
            }
            KeyCode::Char('m') => {
                if let Some(id) = self.selected_id() {
                    debug!(id = %id, "Grabbed task");
                    self.mode = Mode::Dragging {
                        id,
                        order: self.state.tasks().ids(),
                    };
                }
            }
            _ => {}
        }
    }

    fn adding_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                if self.state.add(&self.input).is_some() {
                    self.input.clear();
                    self.selected = 0;
                    self.mode = Mode::Normal;
                }
            }
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    fn editing_key(&mut self, code: KeyCode, id: &str) {
        match code {
            KeyCode::Enter => {
                self.state.edit(id, &self.edit_text);
                self.edit_text.clear();
                self.mode = Mode::Normal;
            }
            KeyCode::Esc => {
                self.edit_text.clear();
                self.mode = Mode::Normal;
            }
            KeyCode::Backspace => {
                self.edit_text.pop();
            }
            KeyCode::Char(c) => self.edit_text.push(c),
            _ => {}
        }
    }

    fn dragging_key(&mut self, code: KeyCode, id: String, order: Vec<String>) {
        let Some(from) = order.iter().position(|o| *o == id) else {
            self.mode = Mode::Normal;
            return;
        };

        match code {
            KeyCode::Up | KeyCode::Char('k') if from > 0 => {
                if let Some(order) = moved(&order, from, from - 1) {
                    self.selected = from - 1;
                    self.mode = Mode::Dragging { id, order };
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(order) = moved(&order, from, from + 1) {
                    self.selected = from + 1;
                    self.mode = Mode::Dragging { id, order };
                }
            }
            KeyCode::Enter | KeyCode::Char('m') => {
                debug!(id = %id, position = from, "Dropped task");
                self.state.reorder(&order);
                self.selected = from;
                self.mode = Mode::Normal;
            }
            KeyCode::Esc => {
                self.selected = self.state.tasks().position(&id).unwrap_or(0);
                self.mode = Mode::Normal;
            }
            _ => {}
        }
    }

    fn selected_id(&self) -> Option<String> {
        self.state
            .tasks()
            .as_slice()
            .get(self.selected)
            .map(|t| t.id.clone())
    }

    fn clamp_selection(&mut self) {
        let len = self.state.tasks().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use crate::state::load;

    fn app() -> (App, MemoryStore) {
        let store = MemoryStore::new();
        let state = TaskState::open(store.clone()).unwrap();
        (App::new(state), store)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn add(app: &mut App, text: &str) {
        press(app, KeyCode::Char('a'));
        type_text(app, text);
        press(app, KeyCode::Enter);
    }

    fn texts(app: &App) -> Vec<String> {
        app.visible_tasks().iter().map(|t| t.text.clone()).collect()
    }

    #[test]
    fn test_toggle_add_input() {
        let (mut app, _) = app();
        assert!(!app.show_input());

        press(&mut app, KeyCode::Char('a'));
        assert!(app.show_input());

        press(&mut app, KeyCode::Esc);
        assert!(!app.show_input());
        assert!(!app.should_quit());
    }

    #[test]
    fn test_add_via_input_row() {
        let (mut app, store) = app();
        add(&mut app, "Buy milk");

        assert_eq!(texts(&app), vec!["Buy milk"]);
        assert!(!app.show_input());
        assert_eq!(app.input(), "");

        app.state().flush();
        assert_eq!(load(&store).len(), 1);
    }

    #[test]
    fn test_blank_add_keeps_input_open() {
        let (mut app, _) = app();
        add(&mut app, "   ");

        assert!(app.state().tasks().is_empty());
        assert!(app.show_input());
    }

    #[test]
    fn test_toggle_and_delete_selected() {
        let (mut app, _) = app();
        add(&mut app, "one");
        add(&mut app, "two");

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.visible_tasks()[1].completed);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(texts(&app), vec!["two"]);
        assert_eq!(app.selected(), 0);
    }

    #[test]
    fn test_edit_in_place() {
        let (mut app, _) = app();
        add(&mut app, "Buy milk");

        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.edit_text(), "Buy milk");
        for _ in 0.."milk".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "bread");
        press(&mut app, KeyCode::Enter);

        assert_eq!(texts(&app), vec!["Buy bread"]);
        assert_eq!(*app.mode(), Mode::Normal);
    }

    #[test]
    fn test_edit_cancel() {
        let (mut app, _) = app();
        add(&mut app, "keep");

        press(&mut app, KeyCode::Char('e'));
        type_text(&mut app, " changed");
        press(&mut app, KeyCode::Esc);

        assert_eq!(texts(&app), vec!["keep"]);
    }

    #[test]
    fn test_drag_previews_then_commits() {
        let (mut app, store) = app();
        add(&mut app, "c");
        add(&mut app, "b");
        add(&mut app, "a");

        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);

        // Preview moves, stored order does not
        assert_eq!(texts(&app), vec!["b", "c", "a"]);
        assert_eq!(app.state().tasks().first().unwrap().text, "a");
        assert_eq!(app.selected(), 2);

        press(&mut app, KeyCode::Enter);
        assert_eq!(texts(&app), vec!["b", "c", "a"]);

        app.state().flush();
        let stored: Vec<String> = load(&store).iter().map(|t| t.text.clone()).collect();
        assert_eq!(stored, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_drag_cancel_restores_order() {
        let (mut app, _) = app();
        add(&mut app, "b");
        add(&mut app, "a");

        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Esc);

        assert_eq!(texts(&app), vec!["a", "b"]);
        assert_eq!(app.selected(), 0);
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, _) = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());

        let (mut app, _) = self::app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }

    #[test]
    fn test_esc_never_quits() {
        let (mut app, _) = app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Esc);

        assert!(!app.should_quit());
        assert_eq!(*app.mode(), Mode::Normal);
    }

    #[test]
    fn test_typing_q_while_adding_does_not_quit() {
        let (mut app, _) = app();
        add(&mut app, "quit smoking");

        assert!(!app.should_quit());
        assert_eq!(texts(&app), vec!["quit smoking"]);
    }
}
