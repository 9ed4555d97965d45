//! The tokenizer: source text in, token queue out.
//!
//! Metamath lexing is trivial (maximal runs of printable ASCII between
//! whitespace), but the token layer is also where `$( $)` comments are
//! stripped and `$[ $]` file inclusions are expanded, because both constructs
//! are defined on raw tokens rather than statements.  Inclusions are fetched
//! through a caller-supplied [`FileResolver`], so the scanner itself performs
//! no I/O; the set of already-included names is threaded through the
//! recursion, which makes a repeated or cyclic inclusion a silent no-op
//! exactly as the Metamath specification requires.

use crate::diag::Diagnostic;
use crate::statement::{as_str, Token, TokenPtr};
use crate::util::HashMap;
use crate::util::HashSet;
use log::debug;
use std::collections::VecDeque;
use std::fs;
use std::io;

type Result<T> = std::result::Result<T, Diagnostic>;

/// Capability used by the scanner to fetch the text of an included database
/// file (and of the root file, when no initial text is supplied).
pub trait FileResolver {
    /// Fetches the contents of a database file by name.
    fn resolve(&mut self, name: &str) -> io::Result<Vec<u8>>;
}

/// Resolves names against the process working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsResolver;

impl FileResolver for FsResolver {
    fn resolve(&mut self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(name)
    }
}

/// Resolves names against a fixed in-memory file set.
#[derive(Debug, Clone, Default)]
pub struct MemResolver {
    files: HashMap<String, Vec<u8>>,
}

impl MemResolver {
    /// Creates an empty file set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named file, replacing any previous content under that name.
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<Vec<u8>>) {
        self.files.insert(name.into(), text.into());
    }
}

impl FileResolver for MemResolver {
    fn resolve(&mut self, name: &str) -> io::Result<Vec<u8>> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no such file {name}")))
    }
}

/// A resolver that refuses every request, for hermetic runs of a database
/// supplied entirely in memory.  With this resolver any `$[` directive is a
/// hard error.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIncludes;

impl FileResolver for NoIncludes {
    fn resolve(&mut self, name: &str) -> io::Result<Vec<u8>> {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("file inclusion is disabled, cannot read {name}"),
        ))
    }
}

/// Whitespace per the Metamath specification.  Vertical tab is deliberately
/// not included.
const fn is_mm_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\x0c' | b'\r')
}

/// Gets a single whitespace-delimited token, advancing `pos` past it.
/// Returns `None` at end of buffer.  Any non-printable, non-whitespace byte
/// is an error.
fn next_token<'a>(buffer: &'a [u8], pos: &mut usize) -> Result<Option<TokenPtr<'a>>> {
    while *pos < buffer.len() && is_mm_space(buffer[*pos]) {
        *pos += 1;
    }
    let start = *pos;
    while *pos < buffer.len() && !is_mm_space(buffer[*pos]) {
        let byte = buffer[*pos];
        if !(0x21..=0x7e).contains(&byte) {
            return Err(Diagnostic::BadCharacter(byte));
        }
        *pos += 1;
    }
    Ok(if start == *pos {
        None
    } else {
        Some(&buffer[start..*pos])
    })
}

fn contains(haystack: TokenPtr<'_>, needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|win| win == needle)
}

/// Tokenizes one file into `queue`, expanding inclusions recursively.
///
/// The caller supplies `text` for the root file when the database is already
/// in memory; included files always go through the resolver.  A name already
/// present in `included` is skipped entirely.
pub(crate) fn read_tokens<R: FileResolver>(
    name: &str,
    text: Option<&[u8]>,
    resolver: &mut R,
    included: &mut HashSet<String>,
    queue: &mut VecDeque<Token>,
) -> Result<()> {
    if !included.insert(name.to_owned()) {
        debug!("skipping {name}, already included");
        return Ok(());
    }

    let owned;
    let buffer = match text {
        Some(text) => text,
        None => {
            owned = resolver
                .resolve(name)
                .map_err(|err| Diagnostic::IoError(format!("could not read {name}: {err}")))?;
            &*owned
        }
    };
    debug!("tokenizing {name} ({} bytes)", buffer.len());

    let mut pos = 0;
    let mut in_comment = false;
    let mut in_include = false;
    let mut filename: Option<Token> = None;

    while let Some(tok) = next_token(buffer, &mut pos)? {
        if in_comment {
            if tok == b"$)" {
                in_comment = false;
            } else if contains(tok, b"$(") || contains(tok, b"$)") {
                return Err(Diagnostic::CommentMarker(tok.into()));
            }
            continue;
        }

        // comments are recognized even in the middle of an inclusion
        // directive
        if tok == b"$(" {
            in_comment = true;
            continue;
        }

        if in_include {
            if let Some(fname) = filename.take() {
                if tok != b"$]" {
                    return Err(Diagnostic::BadIncludeEnd(tok.into()));
                }
                read_tokens(as_str(&fname), None, resolver, included, queue)?;
                in_include = false;
            } else {
                if tok.contains(&b'$') {
                    return Err(Diagnostic::FilenameDollar(tok.into()));
                }
                filename = Some(tok.into());
            }
            continue;
        }

        if tok == b"$[" {
            in_include = true;
            continue;
        }

        queue.push_back(tok.into());
    }

    if in_comment {
        return Err(Diagnostic::UnclosedComment);
    }
    if in_include {
        return Err(Diagnostic::UnclosedInclude);
    }
    Ok(())
}
