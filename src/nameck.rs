//! The name to atom index.
//!
//! Scope checking and proof verification need to compare math symbols and
//! statement labels constantly; comparing interned ids is much cheaper than
//! comparing byte strings, and it makes expressions plain `[Atom]` slices
//! with structural equality.  The `Nameset` owns the atom table for one
//! verification session.

use crate::statement::{Token, TokenPtr};
use crate::util::HashMap;

/// Opacified number representing a single math symbol or statement label.
///
/// An `Atom` is assigned for every name the parser encounters; atoms are
/// never reused, so they are efficient to handle, but a session is limited
/// to 2^32-1 distinct names.  Atoms are only meaningful relative to the
/// `Nameset` that issued them.
#[derive(Copy, Clone, Debug, PartialOrd, Ord, PartialEq, Eq, Default, Hash)]
pub struct Atom(u32);

/// Issues and resolves [`Atom`]s for one session.
#[derive(Default, Debug)]
pub struct Nameset {
    atoms: HashMap<Token, Atom>,
    reverse: Vec<Token>,
}

impl Nameset {
    /// Returns the atom for a name, issuing a fresh one on first sight.
    pub fn intern(&mut self, name: TokenPtr<'_>) -> Atom {
        if let Some(&atom) = self.atoms.get(name) {
            return atom;
        }
        let atom = Atom(u32::try_from(self.reverse.len()).expect("more than u32::MAX names"));
        self.reverse.push(name.into());
        self.atoms.insert(name.into(), atom);
        atom
    }

    /// Returns the atom for a name, or `None` if it has never been seen.
    ///
    /// A name with no atom is necessarily undeclared, which lets reference
    /// checks skip the string-keyed table in the common case.
    pub fn lookup(&self, name: TokenPtr<'_>) -> Option<Atom> {
        self.atoms.get(name).copied()
    }

    /// Gets the name associated to an atom.
    pub fn atom_name(&self, atom: Atom) -> TokenPtr<'_> {
        &self.reverse[atom.0 as usize]
    }
}
