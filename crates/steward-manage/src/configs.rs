//! Versioned member-config routines.
//!
//! Config files are immutable; an update creates the next version and
//! repoints the member's slot with a compare-and-swap, then deletes the
//! superseded file best-effort. Anything the delete leaves behind is
//! garbage the sweep can collect later.

use std::collections::HashSet;

use tracing::{info, warn};

use steward_core::{ConfigFile, MemberConfig, ServiceMember};
use steward_state::{config_file_version, gen_member_config_file_id, MetaStore};

use crate::error::{Error, Result};

/// Rewrite the config file in `member.configs[slot_index]` to `new_content`.
///
/// Creates the next file version, CAS-updates the member slot, and
/// deletes the old version best-effort. Returns the updated member
/// record so callers can keep walking its slots.
pub fn update_member_config(
    store: &MetaStore,
    member: &ServiceMember,
    slot_index: usize,
    new_content: &str,
) -> Result<ServiceMember> {
    let slot = member
        .configs
        .get(slot_index)
        .ok_or_else(|| Error::Internal(format!("config slot {slot_index} out of range")))?;

    let old_file = store
        .get_config_file(&member.service_uuid, &slot.file_id)?
        .ok_or_else(|| Error::Internal(format!("config file {} missing", slot.file_id)))?;

    let next_version = config_file_version(&old_file.file_id)? + 1;
    let new_file_id =
        gen_member_config_file_id(&member.member_name, &old_file.file_name, next_version);
    let new_file = store.create_config_file(
        &member.service_uuid,
        &new_file_id,
        &old_file.file_name,
        old_file.file_mode,
        new_content,
    )?;

    info!(
        member = %member.member_name,
        file = %new_file.file_id,
        md5 = %new_file.file_md5,
        "created new config file version"
    );

    let mut new_configs = member.configs.clone();
    new_configs[slot_index] = MemberConfig {
        file_name: new_file.file_name.clone(),
        file_id: new_file.file_id.clone(),
        file_md5: new_file.file_md5.clone(),
    };
    let new_member = ServiceMember {
        configs: new_configs,
        ..member.clone()
    };
    store.update_service_member(member, &new_member)?;

    // Best-effort: a failure here only leaves a garbage file for the sweep.
    if let Err(err) = store.delete_config_file(&old_file.service_uuid, &old_file.file_id) {
        warn!(
            file = %old_file.file_id,
            error = %err,
            "failed to delete superseded config file"
        );
    }

    Ok(new_member)
}

/// Add a new config file slot to a member (version 0 of a new file name).
///
/// The file must not already have a slot on the member; callers probe
/// first. Returns the updated member record.
pub fn append_member_config(
    store: &MetaStore,
    member: &ServiceMember,
    file_name: &str,
    file_mode: u32,
    content: &str,
) -> Result<ServiceMember> {
    let file_id = gen_member_config_file_id(&member.member_name, file_name, 0);
    let file = store.create_config_file(
        &member.service_uuid,
        &file_id,
        file_name,
        file_mode,
        content,
    )?;

    let mut new_configs = member.configs.clone();
    new_configs.push(MemberConfig {
        file_name: file.file_name.clone(),
        file_id: file.file_id.clone(),
        file_md5: file.file_md5.clone(),
    });
    let new_member = ServiceMember {
        configs: new_configs,
        ..member.clone()
    };
    store.update_service_member(member, &new_member)?;

    info!(
        member = %member.member_name,
        file = %file.file_id,
        "appended config slot to member"
    );
    Ok(new_member)
}

/// Config files of the service no member slot references anymore.
pub fn find_unreferenced_config_files(
    store: &MetaStore,
    service_uuid: &str,
) -> Result<Vec<ConfigFile>> {
    let referenced: HashSet<String> = store
        .list_service_members(service_uuid)?
        .into_iter()
        .flat_map(|m| m.configs.into_iter().map(|c| c.file_id))
        .collect();

    let orphans = store
        .list_config_files(service_uuid)?
        .into_iter()
        .filter(|f| !referenced.contains(&f.file_id))
        .collect();
    Ok(orphans)
}

/// Delete all unreferenced config files of the service. Returns how many
/// were removed.
pub fn sweep_config_files(store: &MetaStore, service_uuid: &str) -> Result<u32> {
    let orphans = find_unreferenced_config_files(store, service_uuid)?;
    let mut removed = 0;
    for file in orphans {
        if store.delete_config_file(service_uuid, &file.file_id)? {
            removed += 1;
        }
    }
    if removed > 0 {
        info!(%service_uuid, removed, "swept unreferenced config files");
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use steward_state::md5_hex;

    fn seeded_member(store: &MetaStore) -> ServiceMember {
        let file_id = gen_member_config_file_id("db-0", "app.conf", 0);
        let file = store
            .create_config_file("u1", &file_id, "app.conf", 0o600, "key=old\n")
            .unwrap();
        let member = ServiceMember {
            service_uuid: "u1".to_string(),
            member_name: "db-0".to_string(),
            availability_zone: "a".to_string(),
            static_ip: "172.31.64.0".to_string(),
            volumes: vec![],
            configs: vec![MemberConfig {
                file_name: file.file_name.clone(),
                file_id: file.file_id.clone(),
                file_md5: file.file_md5.clone(),
            }],
        };
        store.create_service_member(&member).unwrap()
    }

    #[test]
    fn update_bumps_version_and_removes_old_file() {
        let store = MetaStore::open_in_memory().unwrap();
        let member = seeded_member(&store);

        let updated = update_member_config(&store, &member, 0, "key=new\n").unwrap();

        assert_eq!(updated.configs[0].file_id, "db-0-app.conf-v1");
        assert_eq!(updated.configs[0].file_md5, md5_hex("key=new\n"));

        // Old version is gone, new one is stored.
        assert!(store.get_config_file("u1", "db-0-app.conf-v0").unwrap().is_none());
        let file = store.get_config_file("u1", "db-0-app.conf-v1").unwrap().unwrap();
        assert_eq!(file.content, "key=new\n");

        // The stored member points at the new version.
        let stored = store.get_service_member("u1", "db-0").unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[test]
    fn update_from_stale_member_image_fails() {
        let store = MetaStore::open_in_memory().unwrap();
        let member = seeded_member(&store);

        update_member_config(&store, &member, 0, "key=new\n").unwrap();
        // Re-running from the pre-update image must fail loud, not clobber.
        let err = update_member_config(&store, &member, 0, "key=other\n").unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[test]
    fn append_adds_a_slot() {
        let store = MetaStore::open_in_memory().unwrap();
        let member = seeded_member(&store);

        let updated = append_member_config(&store, &member, "cluster.info", 0o600, "n0\n").unwrap();
        assert_eq!(updated.configs.len(), 2);
        assert_eq!(updated.configs[1].file_id, "db-0-cluster.info-v0");
    }

    #[test]
    fn sweep_collects_orphans_only() {
        let store = MetaStore::open_in_memory().unwrap();
        let member = seeded_member(&store);

        // An orphan left behind by a crashed update.
        store
            .create_config_file("u1", "db-0-app.conf-v9", "app.conf", 0o600, "zombie\n")
            .unwrap();

        let orphans = find_unreferenced_config_files(&store, "u1").unwrap();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].file_id, "db-0-app.conf-v9");

        assert_eq!(sweep_config_files(&store, "u1").unwrap(), 1);
        assert!(store.get_config_file("u1", "db-0-app.conf-v9").unwrap().is_none());

        // The referenced file survives.
        assert!(store
            .get_config_file("u1", &member.configs[0].file_id)
            .unwrap()
            .is_some());
    }
}
