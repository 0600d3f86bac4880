//! Role classification into permission tiers.
//!
//! Classification is pure set arithmetic over a role's granted capability
//! bits; there is no error path. The tier table is static: moderation asks
//! for audit log and message management, administration asks for the
//! administrator bit, and vanity names roles with no qualifying
//! capabilities at all.

use crate::model::RoleInfo;
use serenity::model::permissions::Permissions;
use ticketry_core::PermissionTier;

/// Full thread-interaction rights granted to classified roles.
pub const ALL_THREAD: Permissions = Permissions::CREATE_PUBLIC_THREADS
    .union(Permissions::CREATE_PRIVATE_THREADS)
    .union(Permissions::MANAGE_THREADS)
    .union(Permissions::SEND_MESSAGES_IN_THREADS);

/// Full channel-interaction rights granted to elevated (named) roles.
pub const ALL_CHANNEL: Permissions = Permissions::VIEW_CHANNEL
    .union(Permissions::MANAGE_CHANNELS)
    .union(Permissions::MANAGE_ROLES)
    .union(Permissions::MANAGE_WEBHOOKS)
    .union(Permissions::SEND_MESSAGES)
    .union(Permissions::MANAGE_MESSAGES)
    .union(Permissions::READ_MESSAGE_HISTORY)
    .union(Permissions::ADD_REACTIONS)
    .union(Permissions::EMBED_LINKS)
    .union(Permissions::ATTACH_FILES);

/// The capability set a role must hold to qualify for a tier.
///
/// Vanity is deliberately empty; per the classification contract an empty
/// requirement never matches.
pub fn required_capabilities(tier: PermissionTier) -> Permissions {
    match tier {
        PermissionTier::Moderation => {
            Permissions::VIEW_AUDIT_LOG.union(Permissions::MANAGE_MESSAGES)
        }
        PermissionTier::Vanity => Permissions::empty(),
        PermissionTier::Administration => Permissions::ADMINISTRATOR,
    }
}

/// True if the role's capability set is a superset of the requirement for
/// any of the given tiers. An empty tier list never matches, and neither
/// does a tier with an empty requirement.
pub fn classify(role: &RoleInfo, tiers: &[PermissionTier]) -> bool {
    tiers.iter().any(|tier| {
        let required = required_capabilities(*tier);
        !required.is_empty() && role.permissions.contains(required)
    })
}

/// Roles qualifying for any of the given tiers, in input order.
pub fn filter_roles_by_tier<'a>(
    roles: &'a [RoleInfo],
    tiers: &[PermissionTier],
) -> Vec<&'a RoleInfo> {
    roles.iter().filter(|r| classify(r, tiers)).collect()
}

/// Roles whose name matches one of the given names, in input order.
///
/// Platform-managed roles are excluded: their names are controlled by
/// integrations, not by guild staff.
pub fn filter_roles_by_name<'a>(roles: &'a [RoleInfo], names: &[String]) -> Vec<&'a RoleInfo> {
    roles
        .iter()
        .filter(|r| !r.managed && names.iter().any(|n| n == &r.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(id: u64, name: &str, permissions: Permissions, managed: bool) -> RoleInfo {
        RoleInfo {
            id,
            name: name.to_string(),
            permissions,
            managed,
        }
    }

    fn moderation_bits() -> Permissions {
        Permissions::VIEW_AUDIT_LOG | Permissions::MANAGE_MESSAGES
    }

    #[test]
    fn classifies_superset_roles() {
        let mod_role = role(1, "Mods", moderation_bits() | Permissions::KICK_MEMBERS, false);
        assert!(classify(&mod_role, &[PermissionTier::Moderation]));
        assert!(!classify(&mod_role, &[PermissionTier::Administration]));
    }

    #[test]
    fn partial_capability_set_does_not_qualify() {
        let partial = role(2, "Helpers", Permissions::MANAGE_MESSAGES, false);
        assert!(!classify(&partial, &[PermissionTier::Moderation]));
    }

    #[test]
    fn empty_capability_set_never_qualifies() {
        let bare = role(3, "Members", Permissions::empty(), false);
        assert!(!classify(
            &bare,
            &[PermissionTier::Moderation, PermissionTier::Administration]
        ));
    }

    #[test]
    fn full_superset_qualifies_for_multiple_tiers() {
        let everything = role(4, "Owner", Permissions::all(), false);
        assert!(classify(&everything, &[PermissionTier::Moderation]));
        assert!(classify(&everything, &[PermissionTier::Administration]));
    }

    #[test]
    fn empty_tier_list_never_matches() {
        let everything = role(5, "Owner", Permissions::all(), false);
        assert!(!classify(&everything, &[]));
    }

    #[test]
    fn vanity_tier_never_matches() {
        let everything = role(6, "Sparkles", Permissions::all(), false);
        assert!(!classify(&everything, &[PermissionTier::Vanity]));
    }

    #[test]
    fn tier_filter_keeps_input_order() {
        let roles = vec![
            role(1, "Admins", Permissions::ADMINISTRATOR, false),
            role(2, "Members", Permissions::empty(), false),
            role(3, "Mods", moderation_bits(), false),
        ];
        let filtered = filter_roles_by_tier(
            &roles,
            &[PermissionTier::Moderation, PermissionTier::Administration],
        );
        let ids: Vec<u64> = filtered.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn name_filter_skips_managed_roles() {
        let roles = vec![
            role(1, "Ticketry", Permissions::empty(), true),
            role(2, "Ticketry", Permissions::empty(), false),
        ];
        let filtered = filter_roles_by_name(&roles, &["Ticketry".to_string()]);
        let ids: Vec<u64> = filtered.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2]);
    }
}
