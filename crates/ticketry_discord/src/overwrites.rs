//! Permission overwrite construction for the support channel.
//!
//! The built list establishes "channel visible, only threads are
//! interactive": ordinary members can see the channel and write inside
//! existing threads, classified roles get full thread rights, and elevated
//! (named) roles get full channel and thread rights.

use crate::api::SupportApi;
use crate::model::{Overwrite, OverwriteSubject, RoleInfo};
use crate::permissions::{ALL_CHANNEL, ALL_THREAD, filter_roles_by_name, filter_roles_by_tier};
use serenity::model::permissions::Permissions;
use ticketry_core::PermissionTier;
use tracing::{debug, warn};

/// The guild-default rule: the channel itself is read-only with invisible
/// history for ordinary members; only existing threads are usable.
pub fn everyone_overwrite(guild_id: u64) -> Overwrite {
    Overwrite {
        subject: OverwriteSubject::Everyone(guild_id),
        allow: Permissions::SEND_MESSAGES_IN_THREADS
            | Permissions::VIEW_CHANNEL
            | Permissions::READ_MESSAGE_HISTORY,
        deny: Permissions::READ_MESSAGE_HISTORY
            | Permissions::MANAGE_THREADS
            | Permissions::CREATE_PUBLIC_THREADS
            | Permissions::CREATE_PRIVATE_THREADS
            | Permissions::SEND_MESSAGES,
    }
}

/// Assemble the overwrite list for a known role set.
///
/// Order is deterministic: tier-classified roles first, then elevated named
/// roles, then the single guild-default entry. A role matching both filters
/// appears once; the elevated grant wins since it is a superset.
pub fn assemble_overwrites(
    roles: &[RoleInfo],
    tiers: &[PermissionTier],
    elevated_names: &[String],
    guild_id: u64,
) -> Vec<Overwrite> {
    let mut overwrites: Vec<Overwrite> = Vec::new();

    for role in filter_roles_by_tier(roles, tiers) {
        debug!(role = %role.name, role_id = role.id, "Granting thread rights to classified role");
        overwrites.push(Overwrite::allow_role(role.id, ALL_THREAD));
    }

    for role in filter_roles_by_name(roles, elevated_names) {
        debug!(role = %role.name, role_id = role.id, "Granting channel rights to elevated role");
        let elevated = Overwrite::allow_role(role.id, ALL_CHANNEL | ALL_THREAD);
        match overwrites
            .iter_mut()
            .find(|o| o.subject == OverwriteSubject::Role(role.id))
        {
            Some(existing) => *existing = elevated,
            None => overwrites.push(elevated),
        }
    }

    overwrites.push(everyone_overwrite(guild_id));
    overwrites
}

/// Build the support channel overwrite list for a guild.
///
/// Role listing failure is logged and yields an empty list: callers treat
/// that as "no restriction change", never as a hard error.
pub async fn build_support_overwrites(
    api: &dyn SupportApi,
    guild_id: u64,
    tiers: &[PermissionTier],
    elevated_names: &[String],
) -> Vec<Overwrite> {
    let roles = match api.guild_roles(guild_id).await {
        Ok(roles) => roles,
        Err(e) => {
            warn!(guild_id, error = %e, "Failed to list roles; leaving overwrites unchanged");
            return Vec::new();
        }
    };
    assemble_overwrites(&roles, tiers, elevated_names, guild_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OverwriteSubject;

    fn role(id: u64, name: &str, permissions: Permissions) -> RoleInfo {
        RoleInfo {
            id,
            name: name.to_string(),
            permissions,
            managed: false,
        }
    }

    fn sample_roles() -> Vec<RoleInfo> {
        vec![
            role(10, "Mods", Permissions::VIEW_AUDIT_LOG | Permissions::MANAGE_MESSAGES),
            role(20, "Members", Permissions::empty()),
            role(30, "Ticketry", Permissions::empty()),
        ]
    }

    #[test]
    fn contains_exactly_one_everyone_entry() {
        let overwrites = assemble_overwrites(
            &sample_roles(),
            &[PermissionTier::Moderation],
            &["Ticketry".to_string()],
            999,
        );
        let defaults: Vec<_> = overwrites
            .iter()
            .filter(|o| matches!(o.subject, OverwriteSubject::Everyone(_)))
            .collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].subject, OverwriteSubject::Everyone(999));
        // The default entry is last.
        assert!(matches!(
            overwrites.last().unwrap().subject,
            OverwriteSubject::Everyone(_)
        ));
    }

    #[test]
    fn everyone_entry_locks_the_channel_but_not_threads() {
        let o = everyone_overwrite(1);
        assert!(o.allow.contains(Permissions::VIEW_CHANNEL));
        assert!(o.allow.contains(Permissions::SEND_MESSAGES_IN_THREADS));
        assert!(o.deny.contains(Permissions::SEND_MESSAGES));
        assert!(o.deny.contains(Permissions::CREATE_PUBLIC_THREADS));
        assert!(o.deny.contains(Permissions::CREATE_PRIVATE_THREADS));
        assert!(o.deny.contains(Permissions::MANAGE_THREADS));
    }

    #[test]
    fn classified_roles_get_thread_rights() {
        let overwrites = assemble_overwrites(
            &sample_roles(),
            &[PermissionTier::Moderation],
            &[],
            999,
        );
        let mods = overwrites
            .iter()
            .find(|o| o.subject == OverwriteSubject::Role(10))
            .unwrap();
        assert_eq!(mods.allow, ALL_THREAD);
        assert_eq!(mods.deny, Permissions::empty());
        // Unclassified roles get no entry.
        assert!(!overwrites
            .iter()
            .any(|o| o.subject == OverwriteSubject::Role(20)));
    }

    #[test]
    fn at_most_one_entry_per_role() {
        // "Mods" qualifies by tier and by name; the elevated grant wins.
        let roles = vec![role(
            10,
            "Mods",
            Permissions::VIEW_AUDIT_LOG | Permissions::MANAGE_MESSAGES,
        )];
        let overwrites = assemble_overwrites(
            &roles,
            &[PermissionTier::Moderation],
            &["Mods".to_string()],
            999,
        );
        let entries: Vec<_> = overwrites
            .iter()
            .filter(|o| o.subject == OverwriteSubject::Role(10))
            .collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].allow, ALL_CHANNEL | ALL_THREAD);
    }

    #[test]
    fn identical_inputs_yield_identical_lists() {
        let roles = sample_roles();
        let tiers = [PermissionTier::Moderation];
        let names = ["Ticketry".to_string()];
        let first = assemble_overwrites(&roles, &tiers, &names, 999);
        let second = assemble_overwrites(&roles, &tiers, &names, 999);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn role_listing_failure_yields_empty_list() {
        use crate::testing::InMemoryApi;

        let api = InMemoryApi::new(1);
        api.fail_next("get guild roles");
        let overwrites =
            build_support_overwrites(&api, 42, &[PermissionTier::Moderation], &[]).await;
        assert!(overwrites.is_empty());
    }
}
