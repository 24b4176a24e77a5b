//! Editable form state for the workflow views.

use creovate_core::requests::{
    BRAND_TONES, CONTENT_TONES, CONTENT_TYPES, DEFAULT_LOGO_COLOR,
};
use creovate_core::Workflow;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Single-line text input with a character cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
    cursor: usize,
}

impl TextField {
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.value, self.cursor);
        self.value.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.value, self.cursor);
            self.value.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let byte_pos = char_to_byte_index(&self.value, self.cursor);
            self.value.remove(byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }
}

/// A field restricted to a fixed vocabulary, cycled with the arrow keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionField {
    options: &'static [&'static str],
    index: usize,
}

impl OptionField {
    pub fn new(options: &'static [&'static str]) -> Self {
        Self { options, index: 0 }
    }

    pub fn value(&self) -> &'static str {
        self.options.get(self.index).copied().unwrap_or_default()
    }

    pub fn next(&mut self) {
        if !self.options.is_empty() {
            self.index = (self.index + 1) % self.options.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.options.is_empty() {
            self.index = (self.index + self.options.len() - 1) % self.options.len();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    Text(TextField),
    Choice(OptionField),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub required: bool,
    pub input: FieldInput,
}

impl Field {
    fn text(label: &'static str, required: bool) -> Self {
        Self {
            label,
            required,
            input: FieldInput::Text(TextField::default()),
        }
    }

    fn choice(label: &'static str, options: &'static [&'static str]) -> Self {
        Self {
            label,
            required: false,
            input: FieldInput::Choice(OptionField::new(options)),
        }
    }

    pub fn value(&self) -> &str {
        match &self.input {
            FieldInput::Text(text) => text.value(),
            FieldInput::Choice(choice) => choice.value(),
        }
    }
}

/// The ordered fields of one generation form and which one has focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    fields: Vec<Field>,
    focus: usize,
}

impl Form {
    /// Form for a single-shot workflow. Chat has no form (`None`); its input
    /// line is a bare [`TextField`].
    pub fn for_workflow(workflow: Workflow) -> Option<Self> {
        let fields = match workflow {
            Workflow::Brand => vec![
                Field::text("Industry", true),
                Field::text("Keywords", false),
                Field::choice("Tone", BRAND_TONES),
            ],
            Workflow::Content => vec![
                Field::text("Description", true),
                Field::choice("Tone", CONTENT_TONES),
                Field::choice("Content type", CONTENT_TYPES),
            ],
            Workflow::Sentiment => vec![Field::text("Text", true)],
            Workflow::Logo => {
                let mut color = Field::text("Color", false);
                color.input = FieldInput::Text(TextField::with_value(DEFAULT_LOGO_COLOR));
                vec![
                    Field::text("Brand name", true),
                    Field::text("Industry", true),
                    Field::text("Keywords", false),
                    color,
                ]
            }
            Workflow::Chat => return None,
        };
        Some(Self { fields, focus: 0 })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_mut(&mut self) -> Option<&mut Field> {
        self.fields.get_mut(self.focus)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Value of the field labelled `label`, or `""` if the form has none.
    pub fn value(&self, label: &str) -> &str {
        self.fields
            .iter()
            .find(|field| field.label == label)
            .map(Field::value)
            .unwrap_or_default()
    }
}
