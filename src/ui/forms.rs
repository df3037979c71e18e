use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::ALL_LANGUAGES;

/// Every focusable widget on the memo screen, in Tab order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum Field {
    Language,
    NewLanguage,
    #[default]
    English,
    Foreign,
    Keyword,
    SearchLanguage,
}

impl Field {
    const ORDER: [Field; 6] = [
        Field::Language,
        Field::NewLanguage,
        Field::English,
        Field::Foreign,
        Field::Keyword,
        Field::SearchLanguage,
    ];

    /// Prefix shown before the value. Also used to place the cursor.
    pub(crate) fn label(self) -> &'static str {
        match self {
            Field::Language => "Language: ",
            Field::NewLanguage => "New Language: ",
            Field::English => "English Sentence: ",
            Field::Foreign => "Foreign Sentence: ",
            Field::Keyword => "Search Keyword: ",
            Field::SearchLanguage => "Filter by Language: ",
        }
    }

    pub(crate) fn is_selector(self) -> bool {
        matches!(self, Field::Language | Field::SearchLanguage)
    }

    fn offset(self, step: isize) -> Field {
        let len = Self::ORDER.len() as isize;
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0) as isize;
        Self::ORDER[(idx + step).rem_euclid(len) as usize]
    }
}

/// A fixed list of choices with at most one selected, cycled with the arrow
/// keys.
#[derive(Default, Clone, Debug)]
pub(crate) struct Selector {
    options: Vec<String>,
    selected: Option<usize>,
}

impl Selector {
    pub(crate) fn new(options: Vec<String>, selected: Option<&str>) -> Self {
        let mut selector = Self {
            options,
            selected: None,
        };
        if let Some(value) = selected {
            selector.select(value);
        }
        selector
    }

    pub(crate) fn value(&self) -> Option<&str> {
        self.selected
            .and_then(|idx| self.options.get(idx))
            .map(String::as_str)
    }

    /// Select the option with this exact text. Returns false if it is absent.
    pub(crate) fn select(&mut self, value: &str) -> bool {
        match self.options.iter().position(|option| option == value) {
            Some(idx) => {
                self.selected = Some(idx);
                true
            }
            None => false,
        }
    }

    /// Move the selection, wrapping at both ends. An empty selection starts at
    /// the first option going forward and the last going back.
    pub(crate) fn cycle(&mut self, step: isize) {
        if self.options.is_empty() {
            return;
        }
        let len = self.options.len() as isize;
        let next = match self.selected {
            Some(idx) => (idx as isize + step).rem_euclid(len),
            None if step >= 0 => 0,
            None => len - 1,
        };
        self.selected = Some(next as usize);
    }

    /// Swap in a new option list, keeping the current choice if it survives.
    pub(crate) fn set_options(&mut self, options: Vec<String>) {
        let previous = self.value().map(str::to_string);
        self.options = options;
        self.selected = None;
        if let Some(value) = previous {
            self.select(&value);
        }
    }
}

/// Input state for the whole memo screen.
#[derive(Default, Clone, Debug)]
pub(crate) struct MemoForm {
    pub(crate) language: Selector,
    pub(crate) new_language: String,
    pub(crate) english: String,
    pub(crate) foreign: String,
    pub(crate) keyword: String,
    pub(crate) search_language: Selector,
    pub(crate) active: Field,
}

impl MemoForm {
    /// Build the form for the given languages. Nothing is preselected for
    /// saving; the search filter starts at "All".
    pub(crate) fn new(languages: &[String]) -> Self {
        Self {
            language: Selector::new(languages.to_vec(), None),
            search_language: Selector::new(filter_options(languages), Some(ALL_LANGUAGES)),
            ..Self::default()
        }
    }

    pub(crate) fn set_languages(&mut self, languages: &[String]) {
        self.language.set_options(languages.to_vec());
        self.search_language.set_options(filter_options(languages));
        if self.search_language.value().is_none() {
            self.search_language.select(ALL_LANGUAGES);
        }
    }

    pub(crate) fn focus(&mut self, field: Field) {
        self.active = field;
    }

    pub(crate) fn next_field(&mut self) {
        self.active = self.active.offset(1);
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = self.active.offset(-1);
    }

    /// Append a character to the active text input. Selectors and control
    /// characters are ignored.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.text_mut(self.active) {
            Some(value) => {
                value.push(ch);
                true
            }
            None => false,
        }
    }

    pub(crate) fn backspace(&mut self) {
        if let Some(value) = self.text_mut(self.active) {
            value.pop();
        }
    }

    /// Arrow keys on a selector change its value.
    pub(crate) fn cycle_selector(&mut self, step: isize) {
        match self.active {
            Field::Language => self.language.cycle(step),
            Field::SearchLanguage => self.search_language.cycle(step),
            _ => {}
        }
    }

    /// Terminal columns taken by the field's text. Wide characters count
    /// twice.
    pub(crate) fn value_width(&self, field: Field) -> usize {
        self.text(field).map(|value| Span::raw(value).width()).unwrap_or(0)
    }

    /// Render a single line for the given widget.
    pub(crate) fn build_line(&self, field: Field) -> Line<'static> {
        let is_active = self.active == field;

        let (display, empty) = if field.is_selector() {
            let selector = match field {
                Field::Language => &self.language,
                _ => &self.search_language,
            };
            match selector.value() {
                Some(value) => (format!("< {value} >"), false),
                None if selector.options.is_empty() => ("<add a language first>".to_string(), true),
                None => ("< choose with \u{2190}/\u{2192} >".to_string(), true),
            }
        } else {
            let value = self.text(field).unwrap_or_default();
            (value.to_string(), value.is_empty())
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if empty {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        let label_style = if is_active {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::styled(field.label(), label_style),
            Span::styled(display, style),
        ])
    }

    fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::NewLanguage => Some(&self.new_language),
            Field::English => Some(&self.english),
            Field::Foreign => Some(&self.foreign),
            Field::Keyword => Some(&self.keyword),
            Field::Language | Field::SearchLanguage => None,
        }
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::NewLanguage => Some(&mut self.new_language),
            Field::English => Some(&mut self.english),
            Field::Foreign => Some(&mut self.foreign),
            Field::Keyword => Some(&mut self.keyword),
            Field::Language | Field::SearchLanguage => None,
        }
    }
}

/// Options for the search filter: "All" followed by every language.
fn filter_options(languages: &[String]) -> Vec<String> {
    std::iter::once(ALL_LANGUAGES.to_string())
        .chain(languages.iter().cloned())
        .collect()
}
