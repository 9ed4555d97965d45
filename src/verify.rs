//! The proof checker itself.
//!
//! A proof is a program for a stack machine: each step pushes a hypothesis'
//! math string or pops the operands of a previously stored assertion,
//! unifies them against that assertion's mandatory hypotheses, and pushes
//! the substituted conclusion.  A proof is accepted when the machine halts
//! with exactly the theorem's math string on the stack.
//!
//! Two front-ends feed the machine.  An uncompressed proof is a plain label
//! sequence.  A compressed proof declares a label roster up front, then
//! encodes step indices in a base-20/base-5 letter code over the
//! concatenation (mandatory hypotheses ∥ roster ∥ saved steps), with `Z`
//! marking "save the current top for reuse".  Both front-ends accept the
//! `?` marker for an unfinished proof, which downgrades the whole check to
//! a warning.
//!
//! `checkmm` merely prints a complaint when a proof's final expression
//! differs from the declared theorem; here that is a hard error.

use crate::diag::Diagnostic;
use crate::nameck::{Atom, Nameset};
use crate::parser::State;
use crate::scopeck::ScopeSet;
use crate::statement::{Frame, Hyp, Token, TokenPtr};
use crate::util::HashMap;
use std::collections::VecDeque;

type Result<T> = std::result::Result<T, Diagnostic>;

// Proofs are very fragile and there are very few situations where errors are
// recoverable, so we bail out using Result on any error.
macro_rules! try_assert {
    ( $cond:expr , $($arg:tt)+ ) => {
        if !$cond {
            return Err($($arg)+)
        }
    }
}

/// Parses and checks the proof of a `$p` statement whose frame has just been
/// stored.  The token queue is positioned right after `$=`.
pub(crate) fn check_proof(state: &mut State, label_tok: TokenPtr<'_>, frame: &Frame) -> Result<()> {
    let State {
        names,
        scopes,
        tokens,
        warnings,
    } = state;

    if tokens.front().is_some_and(|tok| &**tok == b"(") {
        compressed(names, scopes, tokens, warnings, label_tok, frame)
    } else {
        regular(names, scopes, tokens, warnings, label_tok, frame)
    }
}

fn next_of(
    tokens: &mut VecDeque<Token>,
    label_tok: TokenPtr<'_>,
) -> Result<Token> {
    tokens
        .pop_front()
        .ok_or_else(|| Diagnostic::UnfinishedStatement(label_tok.into()))
}

/// An uncompressed proof: a sequence of labels, each an active hypothesis or
/// a stored assertion, terminated by `$.`.
fn regular(
    names: &Nameset,
    scopes: &ScopeSet,
    tokens: &mut VecDeque<Token>,
    warnings: &mut Vec<Diagnostic>,
    label_tok: TokenPtr<'_>,
    frame: &Frame,
) -> Result<()> {
    let mut steps: Vec<Atom> = Vec::new();
    let mut incomplete = false;
    loop {
        let tok = next_of(tokens, label_tok)?;
        if &*tok == b"$." {
            break;
        }
        if &*tok == b"?" {
            incomplete = true;
            continue;
        }
        try_assert!(
            &*tok != label_tok,
            Diagnostic::ProofSelfReference(label_tok.into())
        );
        let step = names
            .lookup(&tok)
            .filter(|&step| scopes.frame(step).is_some() || scopes.is_active_hyp(step));
        let Some(step) = step else {
            return Err(Diagnostic::StepMissing(label_tok.into(), tok));
        };
        steps.push(step);
    }

    try_assert!(
        !steps.is_empty() || incomplete,
        Diagnostic::MissingProof(label_tok.into())
    );
    if incomplete {
        warnings.push(Diagnostic::ProofIncomplete(label_tok.into()));
        return Ok(());
    }

    let mut stack: Vec<Vec<Atom>> = Vec::new();
    for &step in &steps {
        execute_step(names, scopes, label_tok, step, &mut stack)?;
    }
    finalize(label_tok, frame, &stack)
}

/// A compressed proof: `( roster ) LETTERS $.`.
fn compressed(
    names: &Nameset,
    scopes: &ScopeSet,
    tokens: &mut VecDeque<Token>,
    warnings: &mut Vec<Diagnostic>,
    label_tok: TokenPtr<'_>,
    frame: &Frame,
) -> Result<()> {
    tokens.pop_front(); // the ( token

    let mut roster: Vec<Atom> = Vec::new();
    loop {
        let tok = next_of(tokens, label_tok)?;
        if &*tok == b")" {
            break;
        }
        try_assert!(
            &*tok != label_tok,
            Diagnostic::ProofSelfReference(label_tok.into())
        );
        let Some(step) = names.lookup(&tok) else {
            return Err(Diagnostic::StepMissing(label_tok.into(), tok));
        };
        try_assert!(
            !frame.hypotheses.contains(&step),
            Diagnostic::MandatoryHypInRoster(label_tok.into(), tok)
        );
        try_assert!(
            scopes.frame(step).is_some() || scopes.is_active_hyp(step),
            Diagnostic::StepMissing(label_tok.into(), tok)
        );
        roster.push(step);
    }

    let mut letters: Vec<u8> = Vec::new();
    loop {
        let tok = next_of(tokens, label_tok)?;
        if &*tok == b"$." {
            break;
        }
        try_assert!(
            tok.iter().all(|&ch| ch.is_ascii_uppercase() || ch == b'?'),
            Diagnostic::ProofBadCharacter(label_tok.into())
        );
        letters.extend_from_slice(&tok);
    }

    try_assert!(
        !letters.is_empty(),
        Diagnostic::MissingProof(label_tok.into())
    );
    if letters.contains(&b'?') {
        warnings.push(Diagnostic::ProofIncomplete(label_tok.into()));
        return Ok(());
    }

    let numbers = proof_numbers(label_tok, &letters)?;

    let mand = frame.hypotheses.len();
    let known = mand + roster.len();
    let mut stack: Vec<Vec<Atom>> = Vec::new();
    let mut saved: Vec<Vec<Atom>> = Vec::new();
    for &num in &numbers {
        if num == 0 {
            // save the current top for later recall
            let top = stack
                .last()
                .expect("a save always follows a step that pushed")
                .clone();
            saved.push(top);
        } else if num <= mand {
            let hyp = scopes
                .hypothesis(frame.hypotheses[num - 1])
                .expect("frame hypotheses are recorded hypotheses");
            stack.push(hyp.to_expression());
        } else if num <= known {
            execute_step(names, scopes, label_tok, roster[num - mand - 1], &mut stack)?;
        } else if num <= known + saved.len() {
            stack.push(saved[num - known - 1].clone());
        } else {
            return Err(Diagnostic::StepOutOfRange(label_tok.into()));
        }
    }
    finalize(label_tok, frame, &stack)
}

/// Decodes the letter string of a compressed proof into raw step numbers.
/// `Z` save markers decode as 0.  The caller has already rejected every
/// character outside `A..Z`.
pub(crate) fn proof_numbers(label_tok: TokenPtr<'_>, letters: &[u8]) -> Result<Vec<usize>> {
    let mut numbers = Vec::with_capacity(letters.len());
    let mut num = 0usize;
    let mut just_got_num = false;
    for &ch in letters {
        if ch <= b'T' {
            let add = usize::from(ch - (b'A' - 1));
            num = num
                .checked_mul(20)
                .and_then(|n| n.checked_add(add))
                .ok_or_else(|| Diagnostic::ProofNumberOverflow(label_tok.into()))?;
            numbers.push(num);
            num = 0;
            just_got_num = true;
        } else if ch <= b'Y' {
            let add = usize::from(ch - b'T');
            num = num
                .checked_mul(5)
                .and_then(|n| n.checked_add(add))
                .ok_or_else(|| Diagnostic::ProofNumberOverflow(label_tok.into()))?;
            just_got_num = false;
        } else {
            // must be Z
            try_assert!(
                just_got_num,
                Diagnostic::ProofInvalidSave(label_tok.into())
            );
            numbers.push(0);
            just_got_num = false;
        }
    }

    try_assert!(
        num == 0,
        Diagnostic::ProofMalformedNumber(label_tok.into())
    );
    Ok(numbers)
}

/// Executes one proof step: pushes a hypothesis, or applies a stored
/// assertion.
fn execute_step(
    names: &Nameset,
    scopes: &ScopeSet,
    label_tok: TokenPtr<'_>,
    step: Atom,
    stack: &mut Vec<Vec<Atom>>,
) -> Result<()> {
    if let Some(hyp) = scopes.hypothesis(step) {
        stack.push(hyp.to_expression());
        return Ok(());
    }
    match scopes.frame(step) {
        Some(frame) => apply_frame(scopes, label_tok, frame, stack),
        None => Err(Diagnostic::StepMissing(
            label_tok.into(),
            names.atom_name(step).into(),
        )),
    }
}

/// Applies a referenced assertion: pops one operand per mandatory
/// hypothesis, builds the substitution from the floating ones, checks the
/// essential ones unify, enforces the disjoint-variable conditions, and
/// pushes the substituted conclusion.
fn apply_frame(
    scopes: &ScopeSet,
    label_tok: TokenPtr<'_>,
    frame: &Frame,
    stack: &mut Vec<Vec<Atom>>,
) -> Result<()> {
    let base = stack
        .len()
        .checked_sub(frame.hypotheses.len())
        .ok_or_else(|| Diagnostic::ProofUnderflow(label_tok.into()))?;

    let mut subst: HashMap<Atom, Vec<Atom>> = HashMap::default();
    for (i, &hyp_label) in frame.hypotheses.iter().enumerate() {
        let op = &stack[base + i];
        let hyp = scopes
            .hypothesis(hyp_label)
            .expect("frame hypotheses are recorded hypotheses");
        match *hyp {
            Hyp::Floating { typecode, var } => {
                try_assert!(
                    op.first() == Some(&typecode),
                    Diagnostic::StepFloatWrongType(label_tok.into())
                );
                subst.insert(var, op[1..].to_vec());
            }
            Hyp::Essential { ref expr } => {
                try_assert!(
                    substitute(expr, &subst) == *op,
                    Diagnostic::StepEssenWrong(label_tok.into())
                );
            }
        }
    }

    for &(x, y) in &*frame.mandatory_dv {
        let (Some(ex), Some(ey)) = (subst.get(&x), subst.get(&y)) else {
            continue;
        };
        for &vx in ex.iter().filter(|&&sym| scopes.is_variable(sym)) {
            for &vy in ey.iter().filter(|&&sym| scopes.is_variable(sym)) {
                try_assert!(
                    scopes.is_dvr(vx, vy),
                    Diagnostic::ProofDvViolation(label_tok.into())
                );
            }
        }
    }

    let conclusion = substitute(&frame.target, &subst);
    stack.truncate(base);
    stack.push(conclusion);
    Ok(())
}

/// Rewrites an expression under a substitution map.  Symbols outside the
/// map's domain (constants, and variables it does not mention) pass through
/// unchanged.
pub(crate) fn substitute(expr: &[Atom], subst: &HashMap<Atom, Vec<Atom>>) -> Vec<Atom> {
    let mut out = Vec::with_capacity(expr.len());
    for sym in expr {
        match subst.get(sym) {
            Some(replacement) => out.extend_from_slice(replacement),
            None => out.push(*sym),
        }
    }
    out
}

/// The machine has halted; it must hold exactly the theorem's statement.
fn finalize(label_tok: TokenPtr<'_>, frame: &Frame, stack: &[Vec<Atom>]) -> Result<()> {
    try_assert!(
        stack.len() == 1,
        Diagnostic::ProofExcessEnd(label_tok.into())
    );
    try_assert!(
        stack[0][..] == frame.target[..],
        Diagnostic::ProofWrongExprEnd(label_tok.into())
    );
    Ok(())
}
