//! HIR node ids.

use std::fmt;

/// Identifier of a HIR node, unique within one module.
///
/// Ids are handed out monotonically by [`HirIdGenerator`]; passes that
/// synthesize nodes mint new ids above [`crate::HirModule::max_id`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[repr(transparent)]
pub struct HirId(u64);

impl HirId {
    /// Sentinel for nodes that were never assigned an id.
    pub const INVALID: HirId = HirId(0);

    #[inline]
    pub const fn new(raw: u64) -> Self {
        HirId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Debug for HirId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HirId({})", self.0)
    }
}

impl fmt::Display for HirId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id source. Ids start at 1 so that 0 stays reserved for
/// [`HirId::INVALID`].
#[derive(Debug, Clone)]
pub struct HirIdGenerator {
    next: u64,
}

impl Default for HirIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl HirIdGenerator {
    #[must_use]
    pub const fn new() -> Self {
        HirIdGenerator { next: 1 }
    }

    /// Generator whose first id is `after + 1`, saturating at `u64::MAX`.
    #[must_use]
    pub const fn starting_after(after: HirId) -> Self {
        HirIdGenerator {
            next: after.0.saturating_add(1),
        }
    }

    /// Once the id space is exhausted every call returns `u64::MAX`.
    pub fn next_id(&mut self) -> HirId {
        let id = HirId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    /// The id the next call to [`Self::next_id`] will return.
    #[must_use]
    pub const fn peek(&self) -> HirId {
        HirId(self.next)
    }
}
