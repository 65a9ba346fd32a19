//! Caller-supplied inputs that the search core carries but never interprets.
//!
//! Both are handed on untouched to whatever relevance filtering sits
//! downstream of the search.

use serde::{Deserialize, Serialize};

/// Free-text guidance on which listings the user considers relevant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevancyInstructions {
    pub instructions: String,
}

/// The user's resume as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeInput {
    pub resume: String,
}
