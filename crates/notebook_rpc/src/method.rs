//! Closed table of callable RPC methods.

use std::fmt::{Display, Formatter};

/// Every method the notebook service answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcMethod {
    /// `Note` in, assigned id out.
    CreateNote,
    /// `NoteSelector` in, list of notes out.
    GetNotes,
    /// `Note` with id in, affected row count out.
    UpdateNote,
    /// `NoteSelector` in, deleted note count out.
    DeleteNotes,
    /// Reachability check.
    Hello,
}

impl RpcMethod {
    pub const ALL: [RpcMethod; 5] = [
        Self::CreateNote,
        Self::GetNotes,
        Self::UpdateNote,
        Self::DeleteNotes,
        Self::Hello,
    ];

    /// Resolves a wire method name; `None` for unknown names.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateNote => "create_note",
            Self::GetNotes => "get_notes",
            Self::UpdateNote => "update_note",
            Self::DeleteNotes => "delete_notes",
            Self::Hello => "hello",
        }
    }
}

impl Display for RpcMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
