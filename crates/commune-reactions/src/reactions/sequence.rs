// Copyright 2025 The Commune Project Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::atomic::{AtomicU64, Ordering};

/// Issues monotonically increasing sequence numbers for requests.
///
/// Requests are numbered when they are issued, not when they resolve, so a
/// response can be checked against the slice it wants to update: if a newer
/// request already wrote to that slice, the stale response is dropped.
#[derive(Debug, Default)]
pub(super) struct SequenceGuard {
    next: AtomicU64,
}

impl SequenceGuard {
    pub(super) fn issue(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Tracks which sequence number last wrote to one slice of state.
#[derive(Debug, Default)]
pub(super) struct SliceSequence {
    applied: AtomicU64,
}

impl SliceSequence {
    /// Returns `true` when `seq` is newer than everything applied so far, and
    /// marks it applied. A stale or duplicate sequence number returns `false`.
    pub(super) fn try_apply(&self, seq: u64) -> bool {
        self.applied.fetch_max(seq, Ordering::AcqRel) < seq
    }
}
