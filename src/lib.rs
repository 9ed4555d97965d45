//! A verifier for [Metamath](http://us.metamath.org/#faq) databases.  The
//! entry point for all API operations is the `Session` type in the `database`
//! module.
//!
//! A database is checked in a single pass: the `scanner` turns the source
//! text (plus any `$[ $]` inclusions, fetched through a caller-supplied
//! [`FileResolver`]) into a token queue, the `parser` consumes the queue
//! statement by statement while `scopeck` maintains the active symbols and
//! hypotheses, and `verify` replays each `$p` proof on a stack machine as
//! soon as it is read.  The first hard error aborts the run; incomplete
//! proofs (`?`) only produce warnings.

// rust lints we want
#![warn(
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_docs,
    missing_copy_implementations,
    missing_debug_implementations,
    future_incompatible,
    rust_2018_idioms,
    trivial_numeric_casts,
    variant_size_differences,
    unreachable_pub,
    unused
)]
// all the clippy
#![warn(clippy::all, clippy::pedantic)]
// clippy lints we don't want
#![allow(
    clippy::enum_glob_use,
    clippy::if_not_else,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::redundant_pub_crate,
    clippy::too_many_lines
)]

mod util;

pub mod database;
pub mod diag;
pub mod nameck;
pub mod parser;
pub mod scanner;
pub mod scopeck;
pub mod statement;
pub mod verify;

#[cfg(test)]
mod verify_tests;

pub use database::Session;
pub use diag::{Diagnostic, Level};
pub use scanner::{FileResolver, FsResolver, MemResolver, NoIncludes};
pub use statement::{as_str, Token, TokenPtr};
