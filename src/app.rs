//! Application state: which screen is shown, the active form, and the
//! result/copy slots of the mode page.

use std::path::PathBuf;
use std::sync::mpsc::TryRecvError;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tracing::{debug, info, warn};

use crate::clipboard::{CopyOutcome, CopyStatus, CopyWorker};
use crate::config::ConfigLoadStatus;
use crate::engine;
use crate::form::FormState;
use crate::modes::{FieldKind, ModeId, mode_config};
use crate::random::RandomSource;

/// Shown in the result panel until the first generation.
pub const RESULT_PLACEHOLDER: &str = "填写完成后，点下按钮，让这一段故事继续发光 ✨";

/// Session details shown in the stage gate footer.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub session_id: Option<String>,
    pub log_directory: Option<PathBuf>,
    pub logging_error: Option<String>,
    pub config_path: PathBuf,
    pub config_status: ConfigLoadStatus,
}

impl Default for SessionInfo {
    fn default() -> Self {
        Self {
            session_id: None,
            log_directory: None,
            logging_error: None,
            config_path: PathBuf::from("config.toml"),
            config_status: ConfigLoadStatus::Loaded,
        }
    }
}

/// Focusable element on the mode page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(usize),
    Action(usize),
    Copy,
}

/// The mode page: form, buttons, and the latest result.
#[derive(Debug)]
pub struct ModePage {
    pub form: FormState,
    pub focus: Focus,
    pub result: Option<String>,
    pub result_scroll: u16,
}

impl ModePage {
    fn new(mode: ModeId) -> Self {
        Self {
            form: FormState::for_mode(mode),
            focus: Focus::Field(0),
            result: None,
            result_scroll: 0,
        }
    }

    pub fn mode(&self) -> ModeId {
        self.form.mode()
    }

    /// Text currently in the result panel.
    pub fn result_text(&self) -> &str {
        self.result.as_deref().unwrap_or(RESULT_PLACEHOLDER)
    }

    fn action_count(&self) -> usize {
        mode_config(self.mode()).actions.len()
    }

    pub fn focus_next(&mut self) {
        let fields = self.form.len();
        let actions = self.action_count();
        self.focus = match self.focus {
            Focus::Field(i) if i + 1 < fields => Focus::Field(i + 1),
            Focus::Field(_) if actions > 0 => Focus::Action(0),
            Focus::Field(_) => Focus::Copy,
            Focus::Action(i) if i + 1 < actions => Focus::Action(i + 1),
            Focus::Action(_) => Focus::Copy,
            Focus::Copy if fields > 0 => Focus::Field(0),
            Focus::Copy if actions > 0 => Focus::Action(0),
            Focus::Copy => Focus::Copy,
        };
    }

    pub fn focus_prev(&mut self) {
        let fields = self.form.len();
        let actions = self.action_count();
        self.focus = match self.focus {
            Focus::Field(0) => Focus::Copy,
            Focus::Field(i) => Focus::Field(i - 1),
            Focus::Action(0) if fields > 0 => Focus::Field(fields - 1),
            Focus::Action(0) => Focus::Copy,
            Focus::Action(i) => Focus::Action(i - 1),
            Focus::Copy if actions > 0 => Focus::Action(actions - 1),
            Focus::Copy if fields > 0 => Focus::Field(fields - 1),
            Focus::Copy => Focus::Copy,
        };
    }
}

/// Which screen is shown.
#[derive(Debug)]
pub enum Screen {
    StageGate,
    ModePage(ModePage),
}

/// Main application state.
pub struct App {
    pub screen: Screen,
    /// Highlighted choice on the stage gate.
    pub stage_selected: usize,
    pub copy_status: CopyStatus,
    /// Started on first copy and kept for the session.
    pub copy_worker: Option<CopyWorker>,
    /// Id of the copy whose outcome the button is waiting for.
    pub pending_copy: Option<u64>,
    next_copy_id: u64,
    pub copy_status_duration: Duration,
    pub session: SessionInfo,
    pub should_quit: bool,
    /// Result panel size from the last draw, for scroll limits.
    pub result_pane_height: u16,
    pub result_pane_width: u16,
    rng: Box<dyn RandomSource>,
}

impl App {
    pub fn new(
        session: SessionInfo,
        rng: Box<dyn RandomSource>,
        copy_status_duration: Duration,
    ) -> Self {
        Self {
            screen: Screen::StageGate,
            stage_selected: 0,
            copy_status: CopyStatus::Idle,
            copy_worker: None,
            pending_copy: None,
            next_copy_id: 0,
            copy_status_duration,
            session,
            should_quit: false,
            result_pane_height: 0,
            result_pane_width: 0,
            rng,
        }
    }

    /// The active mode, if a mode page is shown.
    pub fn active_mode(&self) -> Option<ModeId> {
        match &self.screen {
            Screen::StageGate => None,
            Screen::ModePage(page) => Some(page.mode()),
        }
    }

    pub fn mode_page(&self) -> Option<&ModePage> {
        match &self.screen {
            Screen::ModePage(page) => Some(page),
            Screen::StageGate => None,
        }
    }

    pub fn select_mode(&mut self, mode: ModeId) {
        info!(mode = mode.tag(), "mode_selected");
        self.screen = Screen::ModePage(ModePage::new(mode));
        self.reset_copy();
    }

    /// Return to the stage gate, discarding the form.
    pub fn back_to_stage_gate(&mut self) {
        if let Some(mode) = self.active_mode() {
            info!(mode = mode.tag(), "mode_left");
        }
        self.screen = Screen::StageGate;
        self.reset_copy();
    }

    fn reset_copy(&mut self) {
        self.copy_status = CopyStatus::Idle;
        self.pending_copy = None;
    }

    /// Run the generation for the action button at `index` and replace the result.
    pub fn invoke_action(&mut self, index: usize) {
        let Screen::ModePage(page) = &mut self.screen else {
            return;
        };
        let mode = page.mode();
        let Some(spec) = mode_config(mode).actions.get(index) else {
            return;
        };
        let text = engine::generate(mode, spec.action, &page.form, self.rng.as_mut());
        info!(
            mode = mode.tag(),
            action = spec.action.tag(),
            chars = text.chars().count(),
            "generate"
        );
        page.result = Some(text);
        page.result_scroll = 0;
    }

    /// Hand the displayed result to the clipboard worker.
    pub fn request_copy(&mut self) {
        let Some(page) = self.mode_page() else {
            return;
        };
        let text = page.result_text().to_string();
        let id = self.next_copy_id;
        self.next_copy_id += 1;
        debug!(id, chars = text.chars().count(), "copy_requested");

        let worker = self.copy_worker.get_or_insert_with(CopyWorker::spawn);
        if worker.request(id, text) {
            self.pending_copy = Some(id);
        } else {
            warn!("clipboard_worker_gone");
            self.copy_worker = None;
            self.pending_copy = None;
            let outcome = CopyOutcome::Failed("clipboard worker stopped".to_string());
            self.copy_status = CopyStatus::from_outcome(&outcome, Instant::now());
        }
    }

    /// Pick up finished copies and expire a stale status. Outcomes for copies
    /// the page no longer waits on are dropped.
    pub fn poll_copy(&mut self, now: Instant) {
        let mut worker_gone = false;
        if let Some(worker) = &self.copy_worker {
            loop {
                match worker.try_outcome() {
                    Ok((id, outcome)) if self.pending_copy == Some(id) => {
                        self.copy_status = CopyStatus::from_outcome(&outcome, now);
                        self.pending_copy = None;
                    }
                    Ok((id, _)) => debug!(id, "copy_outcome_discarded"),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        worker_gone = true;
                        break;
                    }
                }
            }
        }
        if worker_gone {
            warn!("clipboard_worker_gone");
            self.copy_worker = None;
            if self.pending_copy.take().is_some() {
                self.copy_status = CopyStatus::Failed(now);
            }
        }
        self.copy_status = self.copy_status.expire(now, self.copy_status_duration);
    }

    pub fn result_visual_lines(&self) -> u16 {
        let Some(page) = self.mode_page() else {
            return 0;
        };
        if self.result_pane_width == 0 {
            return 0;
        }
        let content: Vec<Line> = page.result_text().lines().map(Line::raw).collect();
        let paragraph = Paragraph::new(content)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: false });
        paragraph.line_count(self.result_pane_width) as u16
    }

    fn max_result_scroll(&self) -> u16 {
        self.result_visual_lines()
            .saturating_sub(self.result_pane_height)
    }

    pub fn scroll_result(&mut self, delta: i32) {
        let max = self.max_result_scroll();
        if let Screen::ModePage(page) = &mut self.screen {
            let next = (page.result_scroll as i32 + delta).clamp(0, max as i32);
            page.result_scroll = next as u16;
        }
    }

    /// Insert pasted text into the focused text field.
    pub fn handle_paste(&mut self, text: &str) {
        if let Screen::ModePage(page) = &mut self.screen
            && let Focus::Field(i) = page.focus
        {
            page.form.insert_str(i, text);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        match self.screen {
            Screen::StageGate => self.handle_stage_gate_key(key),
            Screen::ModePage(_) => self.handle_mode_page_key(key),
        }
    }

    fn handle_stage_gate_key(&mut self, key: KeyEvent) {
        let count = ModeId::ALL.len();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
                self.stage_selected = (self.stage_selected + count - 1) % count;
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                self.stage_selected = (self.stage_selected + 1) % count;
            }
            KeyCode::Char(c @ '1'..='3') => {
                let index = (c as u8 - b'1') as usize;
                self.stage_selected = index;
                self.select_mode(ModeId::ALL[index]);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.select_mode(ModeId::ALL[self.stage_selected]);
            }
            _ => {}
        }
    }

    fn handle_mode_page_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return self.back_to_stage_gate(),
            KeyCode::F(n @ 5..=7) => return self.invoke_action((n - 5) as usize),
            KeyCode::Char('y') if ctrl => return self.request_copy(),
            KeyCode::PageUp => return self.scroll_result(-(self.result_pane_height.max(1) as i32)),
            KeyCode::PageDown => return self.scroll_result(self.result_pane_height.max(1) as i32),
            _ => {}
        }

        let Screen::ModePage(page) = &mut self.screen else {
            return;
        };
        match key.code {
            KeyCode::Tab => return page.focus_next(),
            KeyCode::BackTab => return page.focus_prev(),
            _ => {}
        }

        match page.focus {
            Focus::Field(i) => {
                let kind = page.form.entries()[i].spec.kind;
                match (key.code, kind) {
                    (KeyCode::Left, FieldKind::Choice(_)) => page.form.cycle_choice(i, false),
                    (KeyCode::Right | KeyCode::Char(' '), FieldKind::Choice(_)) => {
                        page.form.cycle_choice(i, true)
                    }
                    (KeyCode::Enter, FieldKind::MultiLine) => page.form.insert_char(i, '\n'),
                    (KeyCode::Enter | KeyCode::Down, _) => page.focus_next(),
                    (KeyCode::Up, _) => page.focus_prev(),
                    (KeyCode::Char(c), FieldKind::Text | FieldKind::MultiLine) if !ctrl => {
                        page.form.insert_char(i, c)
                    }
                    (KeyCode::Backspace, _) => page.form.delete_char_before(i),
                    (KeyCode::Delete, _) => page.form.delete_char_at(i),
                    (KeyCode::Left, _) => page.form.cursor_left(i),
                    (KeyCode::Right, _) => page.form.cursor_right(i),
                    (KeyCode::Home, _) => page.form.cursor_home(i),
                    (KeyCode::End, _) => page.form.cursor_end(i),
                    _ => {}
                }
            }
            Focus::Action(i) => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => self.invoke_action(i),
                KeyCode::Left | KeyCode::Up => page.focus_prev(),
                KeyCode::Right | KeyCode::Down => page.focus_next(),
                _ => {}
            },
            Focus::Copy => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => self.request_copy(),
                KeyCode::Left | KeyCode::Up => page.focus_prev(),
                KeyCode::Right | KeyCode::Down => page.focus_next(),
                _ => {}
            },
        }
    }
}
