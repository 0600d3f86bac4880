//! Permission tier classification values.

/// A named permission classification derived from a role's granted
/// capabilities.
///
/// Tiers are evaluated independently: a role may qualify for several at
/// once. The mapping from tier to concrete platform capabilities lives in
/// the platform integration crate; this enum only names the tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PermissionTier {
    /// Roles trusted with message and audit moderation.
    Moderation,
    /// Cosmetic roles with no qualifying capabilities. Never matches.
    Vanity,
    /// Roles holding full administrative control.
    Administration,
}
