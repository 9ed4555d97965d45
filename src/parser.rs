//! The statement parser, which is also the driver of the whole pass.
//!
//! The parser pops tokens off the queue the scanner filled, dispatches on the
//! statement keywords, and updates the symbol table as it goes.  There is no
//! AST and no backtracking; the only durable outputs are the hypotheses and
//! frames recorded in the [`ScopeSet`], and `$p` proofs are checked by
//! `verify` the moment they are read, so a statement is fully processed
//! before the next one is looked at.

use crate::diag::Diagnostic;
use crate::nameck::{Atom, Nameset};
use crate::scopeck::ScopeSet;
use crate::statement::{Hyp, Token, TokenPtr};
use crate::verify;
use std::collections::VecDeque;

type Result<T> = std::result::Result<T, Diagnostic>;

/// Determines if a token is a valid statement label.
pub fn is_label_token(tok: TokenPtr<'_>) -> bool {
    !tok.is_empty()
        && tok
            .iter()
            .all(|&byte| byte.is_ascii_alphanumeric() || byte == b'.' || byte == b'-' || byte == b'_')
}

/// Determines if a token can be declared as a math symbol.
pub fn is_math_symbol_token(tok: TokenPtr<'_>) -> bool {
    !tok.contains(&b'$')
}

/// Mutable working state for one verification run.
#[derive(Debug)]
pub(crate) struct State {
    pub(crate) names: Nameset,
    pub(crate) scopes: ScopeSet,
    pub(crate) tokens: VecDeque<Token>,
    pub(crate) warnings: Vec<Diagnostic>,
}

/// Top-level loop: processes statements until the token queue runs dry.
pub(crate) fn parse_database(state: &mut State) -> Result<()> {
    while let Some(tok) = state.tokens.pop_front() {
        match &*tok {
            b"${" => state.scopes.open_scope(),
            b"$}" => {
                if !state.scopes.close_scope() {
                    return Err(Diagnostic::UnmatchedCloseGroup);
                }
            }
            b"$c" => constants(state)?,
            b"$v" => variables(state)?,
            b"$d" => disjoint(state)?,
            _ if is_label_token(&tok) => labeled(state, &tok)?,
            _ => return Err(Diagnostic::UnknownKeyword(tok)),
        }
    }

    if state.scopes.in_nested_scope() {
        return Err(Diagnostic::UnclosedBeforeEof);
    }
    Ok(())
}

fn next_of(state: &mut State, what: TokenPtr<'_>) -> Result<Token> {
    state
        .tokens
        .pop_front()
        .ok_or_else(|| Diagnostic::UnfinishedStatement(what.into()))
}

/// `$c`: declare constants.  Only allowed in the outer scope.
fn constants(state: &mut State) -> Result<()> {
    if state.scopes.in_nested_scope() {
        return Err(Diagnostic::ConstantNotTopLevel);
    }

    let mut list_empty = true;
    loop {
        let tok = next_of(state, b"$c")?;
        if &*tok == b"$." {
            break;
        }
        list_empty = false;

        if !is_math_symbol_token(&tok) {
            return Err(Diagnostic::NotMathSymbol(tok));
        }
        let sym = state.names.intern(&tok);
        if state.scopes.is_variable(sym) {
            return Err(Diagnostic::VariableRedeclaredAsConstant(tok));
        }
        if state.scopes.label_used(sym) {
            return Err(Diagnostic::SymbolDuplicatesLabel(tok));
        }
        if state.scopes.is_constant(sym) {
            return Err(Diagnostic::SymbolRedeclared(tok));
        }
        state.scopes.declare_constant(sym);
    }

    if list_empty {
        return Err(Diagnostic::EmptyDeclaration(Token::from(&b"$c"[..])));
    }
    Ok(())
}

/// `$v`: declare variables and activate them in the current scope.  A
/// variable may be re-declared once its previous scope has closed, but not
/// while it is still active.
fn variables(state: &mut State) -> Result<()> {
    let mut list_empty = true;
    loop {
        let tok = next_of(state, b"$v")?;
        if &*tok == b"$." {
            break;
        }
        list_empty = false;

        if !is_math_symbol_token(&tok) {
            return Err(Diagnostic::NotMathSymbol(tok));
        }
        let sym = state.names.intern(&tok);
        if state.scopes.is_constant(sym) {
            return Err(Diagnostic::ConstantRedeclaredAsVariable(tok));
        }
        if state.scopes.label_used(sym) {
            return Err(Diagnostic::SymbolDuplicatesLabel(tok));
        }
        if state.scopes.is_active_variable(sym) {
            return Err(Diagnostic::SymbolRedeclared(tok));
        }
        state.scopes.declare_variable(sym);
    }

    if list_empty {
        return Err(Diagnostic::EmptyDeclaration(Token::from(&b"$v"[..])));
    }
    Ok(())
}

/// `$d`: a disjoint-variable group over at least two distinct active
/// variables.
fn disjoint(state: &mut State) -> Result<()> {
    let mut group: Vec<Atom> = Vec::new();
    loop {
        let tok = next_of(state, b"$d")?;
        if &*tok == b"$." {
            break;
        }

        let sym = state.names.lookup(&tok);
        let Some(var) = sym.filter(|&var| state.scopes.is_active_variable(var)) else {
            return Err(Diagnostic::DjNotActiveVariable(tok));
        };
        if group.contains(&var) {
            return Err(Diagnostic::DjRepeatedVariable(tok));
        }
        group.push(var);
    }

    if group.len() < 2 {
        return Err(Diagnostic::DisjointSingle);
    }
    state.scopes.add_disjoint_group(group);
    Ok(())
}

/// A labeled statement: `label $f|$e|$a|$p ...`.
fn labeled(state: &mut State, label_tok: TokenPtr<'_>) -> Result<()> {
    let label = state.names.intern(label_tok);
    if state.scopes.is_constant(label) || state.scopes.is_variable(label) {
        return Err(Diagnostic::LabelDuplicatesSymbol(label_tok.into()));
    }
    if state.scopes.label_used(label) {
        return Err(Diagnostic::DuplicateLabel(label_tok.into()));
    }

    let kind = next_of(state, label_tok)?;
    match &*kind {
        b"$f" => floating(state, label_tok, label),
        b"$e" => essential(state, label_tok, label),
        b"$a" => axiom(state, label_tok, label),
        b"$p" => provable(state, label_tok, label),
        _ => Err(Diagnostic::UnknownKeyword(kind)),
    }
}

/// Reads a math string up to `terminator`.  The first symbol must be a
/// declared constant; every later symbol must be a constant or a variable
/// with an active floating hypothesis.
fn read_expression(
    state: &mut State,
    label_tok: TokenPtr<'_>,
    terminator: &[u8],
) -> Result<Vec<Atom>> {
    let first = next_of(state, label_tok)?;
    let typecode = state
        .names
        .lookup(&first)
        .filter(|&sym| state.scopes.is_constant(sym));
    let Some(typecode) = typecode else {
        return Err(Diagnostic::ExprNotConstantPrefix(label_tok.into(), first));
    };

    let mut expr = vec![typecode];
    loop {
        let tok = next_of(state, label_tok)?;
        if &*tok == terminator {
            break;
        }
        let sym = state.names.lookup(&tok).filter(|&sym| {
            state.scopes.is_constant(sym) || state.scopes.floating_hyp(sym).is_some()
        });
        let Some(sym) = sym else {
            return Err(Diagnostic::NotActiveSymbol(label_tok.into(), tok));
        };
        expr.push(sym);
    }
    Ok(expr)
}

/// `$f`: exactly a typecode and an active variable which does not have a
/// floating hypothesis yet.
fn floating(state: &mut State, label_tok: TokenPtr<'_>, label: Atom) -> Result<()> {
    let type_tok = next_of(state, label_tok)?;
    let typecode = state
        .names
        .lookup(&type_tok)
        .filter(|&sym| state.scopes.is_constant(sym));
    let Some(typecode) = typecode else {
        return Err(Diagnostic::FloatNotConstant(label_tok.into(), type_tok));
    };

    let var_tok = next_of(state, label_tok)?;
    let var = state
        .names
        .lookup(&var_tok)
        .filter(|&sym| state.scopes.is_active_variable(sym));
    let Some(var) = var else {
        return Err(Diagnostic::FloatNotVariable(label_tok.into(), var_tok));
    };
    if state.scopes.floating_hyp(var).is_some() {
        return Err(Diagnostic::FloatRedeclared(label_tok.into(), var_tok));
    }

    let end = next_of(state, label_tok)?;
    if &*end != b"$." {
        return Err(Diagnostic::BadFloating(label_tok.into(), end));
    }

    state.scopes.add_hypothesis(label, Hyp::Floating { typecode, var });
    Ok(())
}

/// `$e`: an essential hypothesis.
fn essential(state: &mut State, label_tok: TokenPtr<'_>, label: Atom) -> Result<()> {
    let expr = read_expression(state, label_tok, b"$.")?;
    state
        .scopes
        .add_hypothesis(label, Hyp::Essential { expr: expr.into() });
    Ok(())
}

/// `$a`: construct and store the frame; axioms carry no proof.
fn axiom(state: &mut State, label_tok: TokenPtr<'_>, label: Atom) -> Result<()> {
    let expr = read_expression(state, label_tok, b"$.")?;
    state.scopes.build_frame(label, expr);
    Ok(())
}

/// `$p`: construct the frame, then check the proof immediately.
fn provable(state: &mut State, label_tok: TokenPtr<'_>, label: Atom) -> Result<()> {
    let expr = read_expression(state, label_tok, b"$=")?;
    let frame = state.scopes.build_frame(label, expr);
    verify::check_proof(state, label_tok, &frame)
}
