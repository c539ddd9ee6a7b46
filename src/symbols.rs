// Classifier label → spell token.
// Labels follow the training set order; anything else (including the
// "no result" sentinel) is dropped without an error.

use std::collections::HashMap;
use std::fmt;

/// Label reserved for "nothing to classify" (blank canvas).
pub const NO_RESULT_LABEL: i64 = -1;

/// The four spell shapes the engine can emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureToken {
    /// `O`: freeze
    Circle,
    /// `/`: fire
    Slash,
    /// `|`: block
    Bar,
    /// `\`: normal attack
    Backslash,
}

impl GestureToken {
    pub const ALL: [GestureToken; 4] = [
        GestureToken::Circle,
        GestureToken::Slash,
        GestureToken::Bar,
        GestureToken::Backslash,
    ];

    pub fn symbol(self) -> char {
        match self {
            GestureToken::Circle => 'O',
            GestureToken::Slash => '/',
            GestureToken::Bar => '|',
            GestureToken::Backslash => '\\',
        }
    }

    pub fn spell_name(self) -> &'static str {
        match self {
            GestureToken::Circle => "freeze",
            GestureToken::Slash => "fire",
            GestureToken::Bar => "block",
            GestureToken::Backslash => "normal",
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.symbol() == c)
    }
}

impl fmt::Display for GestureToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Clone, Debug)]
pub struct SymbolMapper {
    table: HashMap<i64, GestureToken>,
}

impl Default for SymbolMapper {
    fn default() -> Self {
        Self::new([
            (1, GestureToken::Circle),
            (2, GestureToken::Slash),
            (3, GestureToken::Bar),
            (4, GestureToken::Backslash),
        ])
    }
}

impl SymbolMapper {
    pub fn new(entries: impl IntoIterator<Item = (i64, GestureToken)>) -> Self {
        let mut table: HashMap<_, _> = entries.into_iter().collect();
        table.remove(&NO_RESULT_LABEL);
        Self { table }
    }

    pub fn map(&self, label: i64) -> Option<GestureToken> {
        let token = self.table.get(&label).copied();
        if token.is_none() {
            log::debug!("classifier label {label} has no spell; dropping");
        }
        token
    }
}
