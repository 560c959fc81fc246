//! Input widget state: keys, the free-text editor and the picker cursor

/// Keys the controller understands, independent of the terminal backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    /// Ctrl+U
    ClearLine,
    /// Ctrl+C
    Quit,
}

/// Which pane receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Transcript,
}

impl Focus {
    pub fn toggled(self) -> Self {
        match self {
            Focus::Input => Focus::Transcript,
            Focus::Transcript => Focus::Input,
        }
    }
}

/// Single-line text editor with a character cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    /// Cursor position in chars, not bytes
    cursor: usize,
}

impl TextInput {
    pub fn value(&self) -> &str {
        &self.value
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(offset, _)| offset)
    }

    pub fn insert(&mut self, c: char) {
        let offset = self.byte_offset(self.cursor);
        self.value.insert(offset, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let offset = self.byte_offset(self.cursor);
        self.value.remove(offset);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let offset = self.byte_offset(self.cursor);
            self.value.remove(offset);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Text left of the cursor, for placing the terminal cursor
    pub fn before_cursor(&self) -> &str {
        let offset = self.byte_offset(self.cursor);
        self.value.get(..offset).unwrap_or_default()
    }

    /// Apply an editing key; returns false for keys the editor ignores
    pub fn handle(&mut self, key: Key) -> bool {
        match key {
            Key::Char(c) => self.insert(c),
            Key::Backspace => self.backspace(),
            Key::Delete => self.delete(),
            Key::Left => self.left(),
            Key::Right => self.right(),
            Key::Home => self.home(),
            Key::End => self.end(),
            Key::ClearLine => self.clear(),
            _ => return false,
        }
        true
    }
}

/// Selected row of the picker list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCursor {
    selected: usize,
}

impl ListCursor {
    pub fn selected(self) -> usize {
        self.selected
    }

    pub fn reset(&mut self) {
        self.selected = 0;
    }

    /// Move within `len` rows; no wrap-around
    pub fn handle(&mut self, key: Key, len: usize) -> bool {
        let last = len.saturating_sub(1);
        match key {
            Key::Up => self.selected = self.selected.saturating_sub(1),
            Key::Down => self.selected = (self.selected + 1).min(last),
            Key::Home => self.selected = 0,
            Key::End => self.selected = last,
            // 1-9 jump straight to a row
            Key::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if index < len {
                    self.selected = index;
                }
            }
            _ => return false,
        }
        true
    }
}

/// Transcript scroll position, counted in rows up from the bottom
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scroll {
    from_bottom: usize,
}

/// Rows moved by page up / page down
const PAGE_ROWS: usize = 10;

impl Scroll {
    pub fn from_bottom(self) -> usize {
        self.from_bottom
    }

    pub fn to_bottom(&mut self) {
        self.from_bottom = 0;
    }

    pub fn clamp(&mut self, max: usize) {
        self.from_bottom = self.from_bottom.min(max);
    }

    pub fn handle(&mut self, key: Key) -> bool {
        match key {
            Key::Up => self.from_bottom = self.from_bottom.saturating_add(1),
            Key::Down => self.from_bottom = self.from_bottom.saturating_sub(1),
            Key::PageUp => self.from_bottom = self.from_bottom.saturating_add(PAGE_ROWS),
            Key::PageDown => self.from_bottom = self.from_bottom.saturating_sub(PAGE_ROWS),
            Key::End => self.from_bottom = 0,
            Key::Home => self.from_bottom = usize::MAX,
            _ => return false,
        }
        true
    }
}
