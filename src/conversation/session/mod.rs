
use serde::{Deserialize, Serialize};
use std::fmt;

use super::transcript::Transcript;
use crate::indexer::VectorIndex;

/// What happens to the transcript when a new batch of documents is indexed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebuildPolicy {
    #[default]
    KeepTranscript,
    ClearTranscript,
}

impl fmt::Display for RebuildPolicy {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeepTranscript => write!(f, "keep_transcript"),
            Self::ClearTranscript => write!(f, "clear_transcript"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No documents have been indexed yet
    Idle,
    /// An index is available for questions
    Ready,
}

/// Per-user state: the active index and the conversation so far
#[derive(Debug, Clone, Default)]
pub struct Session {
    index: Option<VectorIndex>,
    transcript: Transcript,
}

impl Session {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        if self.index.is_some() {
            SessionState::Ready
        } else {
            SessionState::Idle
        }
    }

    #[inline]
    pub fn index(&self) -> Option<&VectorIndex> {
        self.index.as_ref()
    }

    #[inline]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[inline]
    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    /// Replace the active index, returning the one it replaced
    #[inline]
    pub fn install_index(
        &mut self,
        index: VectorIndex,
        policy: RebuildPolicy,
    ) -> Option<VectorIndex> {
        if policy == RebuildPolicy::ClearTranscript {
            self.transcript.clear();
        }
        self.index.replace(index)
    }
}
