//! Shared fact identifiers and statement classification.

use serde::{Deserialize, Serialize};

/// Statement numbers are assigned by the parser as positive integers and
/// serialized as text for lookup keys; they are unique program-wide and
/// never reused.
pub type StmtNo = String;
pub type VarName = String;
pub type ProcName = String;

/// The statement kinds of SIMPLE. Every statement has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementType {
    Assign,
    If,
    While,
    Call,
    Read,
    Print,
    /// A statement the populator classified but no query vocabulary targets.
    Raw,
}
