//! Principal variation lines and the reason each one ends.

use std::fmt;

use cchess_core::Move;

/// Why a line of play stopped where it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CutoffKind {
    /// Ran to the horizon, or a book move.
    #[default]
    None,
    /// Cut by a transposition table hit.
    Hash,
    /// Cut by null-move pruning.
    Null,
    /// The side to move was checkmated.
    Mate,
    /// The previous move was illegal (its general was left capturable).
    Misc,
}

impl CutoffKind {
    /// Tag appended to the rendered line.
    pub fn tag(self) -> &'static str {
        match self {
            CutoffKind::None => "",
            CutoffKind::Hash => "{HT}",
            CutoffKind::Null => "{NM}",
            CutoffKind::Mate => "{MATE}",
            CutoffKind::Misc => "{MC}",
        }
    }
}

/// One move of a line and how the line ends after it.
///
/// The cutoff is only meaningful on the last entry of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PvEntry {
    pub mv: Move,
    pub cutoff: CutoffKind,
}

impl PvEntry {
    pub fn new(mv: Move, cutoff: CutoffKind) -> Self {
        Self { mv, cutoff }
    }
}

/// An ordered line of play.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrincipalVariation {
    entries: Vec<PvEntry>,
}

impl PrincipalVariation {
    /// Empty line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Line starting with `mv`, not yet tagged.
    pub fn starting_with(mv: Move) -> Self {
        Self {
            entries: vec![PvEntry::new(mv, CutoffKind::None)],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn push(&mut self, entry: PvEntry) {
        self.entries.push(entry);
    }

    /// Splice `tail` onto the end of this line.
    pub fn append(&mut self, tail: PrincipalVariation) {
        self.entries.extend(tail.entries);
    }

    /// Tag the last entry. An empty line is left untouched.
    pub fn mark(&mut self, cutoff: CutoffKind) {
        if let Some(last) = self.entries.last_mut() {
            last.cutoff = cutoff;
        }
    }

    /// First move of the line, if any.
    pub fn first_move(&self) -> Option<Move> {
        self.entries.first().map(|e| e.mv)
    }

    /// How the line ends.
    pub fn cutoff(&self) -> CutoffKind {
        self.entries.last().map_or(CutoffKind::None, |e| e.cutoff)
    }

    /// Moves of the line in order.
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.entries.iter().map(|e| e.mv)
    }

    pub fn entries(&self) -> &[PvEntry] {
        &self.entries
    }
}

impl fmt::Display for PrincipalVariation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", entry.mv)?;
        }
        let tag = self.cutoff().tag();
        if !tag.is_empty() {
            write!(f, " {tag}")?;
        }
        Ok(())
    }
}
