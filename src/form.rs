//! Form state for the active mode and the field accessor the engine reads.

use crate::modes::{FieldKind, FieldSpec, ModeId, mode_config};

/// Read access to the current field values.
pub trait FieldValues {
    /// Trimmed value of the field, or an empty string when absent or blank.
    fn val(&self, key: &str) -> String;
}

/// A single field's live value plus its editing cursor.
#[derive(Debug, Clone)]
pub struct FieldEntry {
    pub spec: FieldSpec,
    pub value: String,
    /// Cursor position in chars, not bytes.
    pub cursor: usize,
    /// Selected option index for choice fields.
    pub choice: usize,
}

impl FieldEntry {
    fn new(spec: FieldSpec) -> Self {
        let value = match spec.kind {
            FieldKind::Choice(options) => options.first().copied().unwrap_or_default().to_string(),
            _ => String::new(),
        };
        Self {
            spec,
            value,
            cursor: 0,
            choice: 0,
        }
    }

    pub fn is_text(&self) -> bool {
        !matches!(self.spec.kind, FieldKind::Choice(_))
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }
}

/// Field values of the currently displayed mode. Dropped when the user goes
/// back to the stage gate.
#[derive(Debug, Clone)]
pub struct FormState {
    mode: ModeId,
    entries: Vec<FieldEntry>,
}

impl FormState {
    pub fn for_mode(mode: ModeId) -> Self {
        let entries = mode_config(mode)
            .fields
            .iter()
            .copied()
            .map(FieldEntry::new)
            .collect();
        Self { mode, entries }
    }

    pub fn mode(&self) -> ModeId {
        self.mode
    }

    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Overwrite a field's value, moving its cursor to the end. Choice fields
    /// only accept one of their options. Returns false if nothing changed.
    #[cfg(test)]
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.spec.key == key) else {
            return false;
        };
        match entry.spec.kind {
            FieldKind::Choice(options) => match options.iter().position(|o| *o == value) {
                Some(index) => {
                    entry.choice = index;
                    entry.value = value.to_string();
                    true
                }
                None => false,
            },
            _ => {
                entry.value = value.to_string();
                entry.cursor = entry.char_len();
                true
            }
        }
    }

    pub fn insert_char(&mut self, index: usize, c: char) {
        let Some(entry) = self.entries.get_mut(index).filter(|e| e.is_text()) else {
            return;
        };
        let at = entry.byte_index(entry.cursor);
        entry.value.insert(at, c);
        entry.cursor += 1;
    }

    /// Insert pasted text. Single-line fields flatten newlines to spaces.
    pub fn insert_str(&mut self, index: usize, text: &str) {
        let Some(entry) = self.entries.get_mut(index).filter(|e| e.is_text()) else {
            return;
        };
        let text: String = match entry.spec.kind {
            FieldKind::Text => text
                .chars()
                .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                .collect(),
            _ => text.replace("\r\n", "\n").replace('\r', "\n"),
        };
        let at = entry.byte_index(entry.cursor);
        entry.value.insert_str(at, &text);
        entry.cursor += text.chars().count();
    }

    pub fn delete_char_before(&mut self, index: usize) {
        let Some(entry) = self.entries.get_mut(index).filter(|e| e.is_text()) else {
            return;
        };
        if entry.cursor == 0 {
            return;
        }
        let at = entry.byte_index(entry.cursor - 1);
        entry.value.remove(at);
        entry.cursor -= 1;
    }

    pub fn delete_char_at(&mut self, index: usize) {
        let Some(entry) = self.entries.get_mut(index).filter(|e| e.is_text()) else {
            return;
        };
        if entry.cursor < entry.char_len() {
            let at = entry.byte_index(entry.cursor);
            entry.value.remove(at);
        }
    }

    pub fn cursor_left(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index)
            && entry.cursor > 0
        {
            entry.cursor -= 1;
        }
    }

    pub fn cursor_right(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index)
            && entry.cursor < entry.char_len()
        {
            entry.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.cursor = 0;
        }
    }

    pub fn cursor_end(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.cursor = entry.char_len();
        }
    }

    /// Step a choice field to the next or previous option, wrapping around.
    pub fn cycle_choice(&mut self, index: usize, forward: bool) {
        let Some(entry) = self.entries.get_mut(index) else {
            return;
        };
        let FieldKind::Choice(options) = entry.spec.kind else {
            return;
        };
        if options.is_empty() {
            return;
        }
        entry.choice = if forward {
            (entry.choice + 1) % options.len()
        } else {
            (entry.choice + options.len() - 1) % options.len()
        };
        entry.value = options[entry.choice].to_string();
    }
}

impl FieldValues for FormState {
    fn val(&self, key: &str) -> String {
        self.entries
            .iter()
            .find(|e| e.spec.key == key)
            .map(|e| e.value.trim().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
impl FieldValues for std::collections::HashMap<&str, &str> {
    fn val(&self, key: &str) -> String {
        self.get(key).map(|v| v.trim().to_string()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_val_trims_whitespace() {
        let mut form = FormState::for_mode(ModeId::Start);
        form.set("seed", "  一封信 \n");
        assert_eq!(form.val("seed"), "一封信");
    }

    #[test]
    fn test_val_blank_is_empty() {
        let mut form = FormState::for_mode(ModeId::Start);
        form.set("lead", "   \t ");
        assert_eq!(form.val("lead"), "");
    }

    #[test]
    fn test_val_unknown_key_is_empty() {
        let form = FormState::for_mode(ModeId::Restart);
        assert_eq!(form.val("seed"), "");
        assert_eq!(form.val("nope"), "");
    }

    #[test]
    fn test_choice_defaults_to_first_option() {
        let form = FormState::for_mode(ModeId::Push);
        assert_eq!(form.val("blockType"), "推进");
    }

    #[test]
    fn test_set_choice_rejects_unknown_option() {
        let mut form = FormState::for_mode(ModeId::Push);
        assert!(form.set("blockType", "对话"));
        assert_eq!(form.val("blockType"), "对话");
        assert!(!form.set("blockType", "别的"));
        assert_eq!(form.val("blockType"), "对话");
    }

    #[test]
    fn test_cycle_choice_wraps() {
        let mut form = FormState::for_mode(ModeId::Push);
        let index = 3; // blockType
        form.cycle_choice(index, false);
        assert_eq!(form.val("blockType"), "对话");
        form.cycle_choice(index, true);
        assert_eq!(form.val("blockType"), "推进");
        form.cycle_choice(index, true);
        assert_eq!(form.val("blockType"), "冲突");
    }

    #[test]
    fn test_insert_and_delete_multibyte() {
        let mut form = FormState::for_mode(ModeId::Start);
        for c in "雨夜信".chars() {
            form.insert_char(0, c);
        }
        assert_eq!(form.val("seed"), "雨夜信");
        form.cursor_left(0);
        form.delete_char_before(0);
        assert_eq!(form.val("seed"), "雨信");
        assert_eq!(form.entries()[0].cursor, 1);
        form.delete_char_at(0);
        assert_eq!(form.val("seed"), "雨");
        form.cursor_home(0);
        form.insert_char(0, '夜');
        assert_eq!(form.val("seed"), "夜雨");
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut form = FormState::for_mode(ModeId::Start);
        form.cursor_left(0);
        assert_eq!(form.entries()[0].cursor, 0);
        form.insert_char(0, 'a');
        form.cursor_right(0);
        form.cursor_right(0);
        assert_eq!(form.entries()[0].cursor, 1);
        form.delete_char_at(0);
        assert_eq!(form.val("seed"), "a");
    }

    #[test]
    fn test_paste_flattens_newlines_in_single_line_field() {
        let mut form = FormState::for_mode(ModeId::Start);
        form.insert_str(1, "第一行\n第二行");
        assert_eq!(form.val("lead"), "第一行 第二行");
        form.insert_str(0, "a\r\nb");
        assert_eq!(form.val("seed"), "a\nb");
        assert_eq!(form.entries()[0].cursor, 3);
    }

    #[test]
    fn test_typing_into_choice_is_ignored() {
        let mut form = FormState::for_mode(ModeId::Push);
        form.insert_char(3, 'x');
        form.delete_char_before(3);
        assert_eq!(form.val("blockType"), "推进");
    }
}
