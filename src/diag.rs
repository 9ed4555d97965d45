//! Datatypes to represent diagnostics emitted by the verifier.
//!
//! This is an enum-based representation suited for programmatic
//! interpretation and testing; the `Display` implementation provides the
//! human-readable form, phrased the way `checkmm` reports the same
//! conditions.  Every hard error aborts the session, so at most one
//! error-severity diagnostic is produced per run, possibly preceded by
//! incomplete-proof warnings.

use crate::statement::{as_str, Token};
use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Level {
    /// Verification failed.
    Error,
    /// Verification continues; the final verdict is unaffected.
    Warning,
}

/// List of all diagnostic codes.  For the wording of each, see the source of
/// the `Display` implementation.
///
/// `Token` payloads name the offending token or the label of the statement
/// being processed when the condition was detected.
#[derive(Debug, Clone, Eq, PartialEq)]
#[allow(missing_docs)]
pub enum Diagnostic {
    BadCharacter(u8),
    BadFloating(Token, Token),
    BadIncludeEnd(Token),
    CommentMarker(Token),
    ConstantNotTopLevel,
    ConstantRedeclaredAsVariable(Token),
    DisjointSingle,
    DjNotActiveVariable(Token),
    DjRepeatedVariable(Token),
    DuplicateLabel(Token),
    EmptyDeclaration(Token),
    ExprNotConstantPrefix(Token, Token),
    FilenameDollar(Token),
    FloatNotConstant(Token, Token),
    FloatNotVariable(Token, Token),
    FloatRedeclared(Token, Token),
    IoError(String),
    LabelDuplicatesSymbol(Token),
    MandatoryHypInRoster(Token, Token),
    MissingProof(Token),
    NotActiveSymbol(Token, Token),
    NotMathSymbol(Token),
    ProofBadCharacter(Token),
    ProofDvViolation(Token),
    ProofExcessEnd(Token),
    ProofIncomplete(Token),
    ProofInvalidSave(Token),
    ProofMalformedNumber(Token),
    ProofNumberOverflow(Token),
    ProofSelfReference(Token),
    ProofUnderflow(Token),
    ProofWrongExprEnd(Token),
    StepEssenWrong(Token),
    StepFloatWrongType(Token),
    StepMissing(Token, Token),
    StepOutOfRange(Token),
    SymbolDuplicatesLabel(Token),
    SymbolRedeclared(Token),
    UnclosedBeforeEof,
    UnclosedComment,
    UnclosedInclude,
    UnfinishedStatement(Token),
    UnknownKeyword(Token),
    UnmatchedCloseGroup,
    VariableRedeclaredAsConstant(Token),
}
use self::Diagnostic::*;

impl Diagnostic {
    /// Severity of this diagnostic.  Only incomplete proofs are warnings.
    pub const fn level(&self) -> Level {
        match *self {
            ProofIncomplete(_) => Level::Warning,
            _ => Level::Error,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            BadCharacter(byte) => {
                write!(f, "invalid character read with code 0x{byte:02x}")
            }
            BadFloating(ref label, ref tok) => write!(
                f,
                "expected end of $f statement {} but found {}",
                as_str(label),
                as_str(tok)
            ),
            BadIncludeEnd(ref tok) => write!(
                f,
                "found {} instead of closing file inclusion delimiter $]",
                as_str(tok)
            ),
            CommentMarker(ref tok) => {
                write!(f, "characters $( or $) found in comment in {}", as_str(tok))
            }
            ConstantNotTopLevel => write!(f, "$c statement occurs in inner block"),
            ConstantRedeclaredAsVariable(ref tok) => write!(
                f,
                "attempt to redeclare constant {} as a variable",
                as_str(tok)
            ),
            DisjointSingle => write!(f, "not enough items in $d statement"),
            DjNotActiveVariable(ref tok) => write!(
                f,
                "token {} is not an active variable, but was found in a $d statement",
                as_str(tok)
            ),
            DjRepeatedVariable(ref tok) => {
                write!(f, "$d statement mentions {} twice", as_str(tok))
            }
            DuplicateLabel(ref label) => {
                write!(f, "attempt to reuse label {}", as_str(label))
            }
            EmptyDeclaration(ref kw) => write!(f, "empty {} statement", as_str(kw)),
            ExprNotConstantPrefix(ref label, ref tok) => write!(
                f,
                "first symbol in statement {} is {} which is not a constant",
                as_str(label),
                as_str(tok)
            ),
            FilenameDollar(ref tok) => {
                write!(f, "filename {} contains a $", as_str(tok))
            }
            FloatNotConstant(ref label, ref tok) => write!(
                f,
                "first symbol in $f statement {} is {} which is not a constant",
                as_str(label),
                as_str(tok)
            ),
            FloatNotVariable(ref label, ref tok) => write!(
                f,
                "second symbol in $f statement {} is {} which is not an active variable",
                as_str(label),
                as_str(tok)
            ),
            FloatRedeclared(ref label, ref var) => write!(
                f,
                "the variable {} appears in a second $f statement {}",
                as_str(var),
                as_str(label)
            ),
            IoError(ref err) => write!(f, "{err}"),
            LabelDuplicatesSymbol(ref label) => write!(
                f,
                "attempt to reuse math symbol {} as a label",
                as_str(label)
            ),
            MandatoryHypInRoster(ref label, ref hyp) => write!(
                f,
                "compressed proof of theorem {} has mandatory hypothesis {} in label list",
                as_str(label),
                as_str(hyp)
            ),
            MissingProof(ref label) => {
                write!(f, "theorem {} has no proof", as_str(label))
            }
            NotActiveSymbol(ref label, ref tok) => write!(
                f,
                "in statement {} token {} found which is not a constant or \
                 variable in an active $f statement",
                as_str(label),
                as_str(tok)
            ),
            NotMathSymbol(ref tok) => {
                write!(f, "attempt to declare {} as a math symbol", as_str(tok))
            }
            ProofBadCharacter(ref label) => write!(
                f,
                "bogus character found in compressed proof of {}",
                as_str(label)
            ),
            ProofDvViolation(ref label) => write!(
                f,
                "in proof of theorem {} disjoint variable restriction violated",
                as_str(label)
            ),
            ProofExcessEnd(ref label) => write!(
                f,
                "proof of theorem {} does not end with only one item on the stack",
                as_str(label)
            ),
            ProofIncomplete(ref label) => {
                write!(f, "proof of theorem {} is incomplete", as_str(label))
            }
            ProofInvalidSave(ref label) => {
                write!(f, "stray Z found in compressed proof of {}", as_str(label))
            }
            ProofMalformedNumber(ref label) => write!(
                f,
                "compressed proof of theorem {} ends in unfinished number",
                as_str(label)
            ),
            ProofNumberOverflow(ref label) => write!(
                f,
                "overflow computing numbers in compressed proof of {}",
                as_str(label)
            ),
            ProofSelfReference(ref label) => {
                write!(f, "proof of theorem {} refers to itself", as_str(label))
            }
            ProofUnderflow(ref label) => write!(
                f,
                "in proof of theorem {} not enough items found on stack",
                as_str(label)
            ),
            ProofWrongExprEnd(ref label) => {
                write!(f, "proof of theorem {} proves wrong statement", as_str(label))
            }
            StepEssenWrong(ref label) | StepFloatWrongType(ref label) => {
                write!(f, "in proof of theorem {} unification failed", as_str(label))
            }
            StepMissing(ref label, ref step) => write!(
                f,
                "proof of theorem {} refers to {} which is not an active statement",
                as_str(label),
                as_str(step)
            ),
            StepOutOfRange(ref label) => write!(
                f,
                "number in compressed proof of {} is too high",
                as_str(label)
            ),
            SymbolDuplicatesLabel(ref tok) => {
                write!(f, "attempt to reuse label {} as a math symbol", as_str(tok))
            }
            SymbolRedeclared(ref tok) => {
                write!(f, "attempt to redeclare {}", as_str(tok))
            }
            UnclosedBeforeEof => write!(f, "${{ without corresponding $}}"),
            UnclosedComment => write!(f, "unclosed comment"),
            UnclosedInclude => write!(f, "unfinished file inclusion command"),
            UnfinishedStatement(ref label) => {
                write!(f, "unfinished statement {}", as_str(label))
            }
            UnknownKeyword(ref tok) => {
                write!(f, "unexpected token {} encountered", as_str(tok))
            }
            UnmatchedCloseGroup => write!(f, "$}} without corresponding ${{"),
            VariableRedeclaredAsConstant(ref tok) => write!(
                f,
                "attempt to redeclare variable {} as a constant",
                as_str(tok)
            ),
        }
    }
}
