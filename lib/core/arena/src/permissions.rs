//! Access permissions attached to every [`Miniblock`][m].
//!
//! [m]: crate::Miniblock

use core::{
    fmt,
    ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign},
};

/// A set of {Read, Write, Execute} access flags.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Permissions(u8);

impl Permissions {
    /// No access is allowed.
    pub const NONE: Self = Self(0);
    /// The region may be read.
    pub const READ: Self = Self(1 << 2);
    /// The region may be written.
    pub const WRITE: Self = Self(1 << 1);
    /// The region may be executed.
    pub const EXEC: Self = Self(1 << 0);

    /// The permissions every freshly allocated region starts with.
    pub const DEFAULT: Self = Self(Self::READ.0 | Self::WRITE.0);

    /// Bitmask of the valid flags.
    pub const VALID: Self = Self(Self::READ.0 | Self::WRITE.0 | Self::EXEC.0);

    /// Returns `true` if the flags in `other` are set in `self`.
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no flags are set.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Parses a protection specification such as `PROT_READ | PROT_WRITE`.
    ///
    /// Tokens are separated by `|` and whitespace. Recognised tokens are combined by union, while
    /// `PROT_NONE` clears everything accumulated before it. Unrecognised tokens are skipped.
    pub fn parse(spec: &str) -> Self {
        let mut permissions = Self::NONE;

        for token in spec
            .split(|c: char| c == '|' || c.is_whitespace())
            .filter(|token| !token.is_empty())
        {
            match ProtectionToken::recognise(token) {
                Some(ProtectionToken::None) => permissions = Self::NONE,
                Some(ProtectionToken::Flag(flag)) => permissions |= flag,
                None => log::warn!("ignoring unrecognised protection token {token:?}"),
            }
        }

        permissions
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |flag: Self, symbol: char| if self.contains(flag) { symbol } else { '-' };

        write!(
            f,
            "{}{}{}",
            flag(Self::READ, 'R'),
            flag(Self::WRITE, 'W'),
            flag(Self::EXEC, 'X')
        )
    }
}

impl BitOr for Permissions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Permissions {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

impl BitAnd for Permissions {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for Permissions {
    fn bitand_assign(&mut self, rhs: Self) {
        *self = *self & rhs;
    }
}

/// A single recognised token of a protection specification.
enum ProtectionToken {
    /// `PROT_NONE`.
    None,
    /// `PROT_READ`, `PROT_WRITE` or `PROT_EXEC`.
    Flag(Permissions),
}

impl ProtectionToken {
    /// Returns the [`ProtectionToken`] spelled by `token`.
    fn recognise(token: &str) -> Option<Self> {
        let token = match token {
            "PROT_NONE" => Self::None,
            "PROT_READ" => Self::Flag(Permissions::READ),
            "PROT_WRITE" => Self::Flag(Permissions::WRITE),
            "PROT_EXEC" => Self::Flag(Permissions::EXEC),
            _ => return None,
        };

        Some(token)
    }
}
