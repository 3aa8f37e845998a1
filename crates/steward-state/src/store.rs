//! MetaStore — redb-backed persistence for the control plane.
//!
//! Provides typed operations over services, service attributes, service
//! members, and config files. All values are JSON-serialized into redb's
//! `&[u8]` value columns. The store supports both on-disk and in-memory
//! backends (the latter for testing and standalone mode).
//!
//! Write-path guarantees:
//! - `create_*` operations are keyed inserts that return the stored record
//!   when one already exists, so the create protocol can replay safely.
//! - `create_config_file` is content-addressed: same id + same MD5 returns
//!   the existing file, same id + different MD5 fails.
//! - `update_service_member` is a compare-and-swap against the caller's
//!   expected previous image.
//! - `set_service_status` only moves forward in the lifecycle order.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use steward_core::{ConfigFile, Service, ServiceAttr, ServiceMember, ServiceStatus};

use crate::error::{StateError, StateResult};
use crate::ids::md5_hex;
use crate::tables::*;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Thread-safe metadata store backed by redb.
#[derive(Clone)]
pub struct MetaStore {
    db: Arc<Database>,
}

impl MetaStore {
    /// Open (or create) a persistent store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "metadata store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory store.
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory metadata store opened");
        Ok(store)
    }

    /// Create all tables if they don't exist yet.
    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(SERVICES).map_err(map_err!(Table))?;
        txn.open_table(SERVICE_ATTRS).map_err(map_err!(Table))?;
        txn.open_table(MEMBERS).map_err(map_err!(Table))?;
        txn.open_table(CONFIG_FILES).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    fn service_key(cluster: &str, service_name: &str) -> String {
        format!("{cluster}/{service_name}")
    }

    fn member_key(service_uuid: &str, member_name: &str) -> String {
        format!("{service_uuid}:{member_name}")
    }

    fn config_key(service_uuid: &str, file_id: &str) -> String {
        format!("{service_uuid}:{file_id}")
    }

    // ── Services ───────────────────────────────────────────────────

    /// Insert the service record if absent. Returns the stored record,
    /// which is the existing one when the key was already taken.
    pub fn create_service(&self, service: &Service) -> StateResult<Service> {
        let key = Self::service_key(&service.cluster, &service.service_name);
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let stored;
        {
            let mut table = txn.open_table(SERVICES).map_err(map_err!(Table))?;
            let existing = match table.get(key.as_str()).map_err(map_err!(Read))? {
                Some(guard) => Some(
                    serde_json::from_slice::<Service>(guard.value())
                        .map_err(map_err!(Deserialize))?,
                ),
                None => None,
            };
            match existing {
                Some(found) => stored = found,
                None => {
                    let value = serde_json::to_vec(service).map_err(map_err!(Serialize))?;
                    table
                        .insert(key.as_str(), value.as_slice())
                        .map_err(map_err!(Write))?;
                    stored = service.clone();
                }
            }
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, uuid = %stored.service_uuid, "service record ensured");
        Ok(stored)
    }

    /// Get a service by (cluster, serviceName).
    pub fn get_service(&self, cluster: &str, service_name: &str) -> StateResult<Option<Service>> {
        let key = Self::service_key(cluster, service_name);
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(SERVICES).map_err(map_err!(Table))?;
        match table.get(key.as_str()).map_err(map_err!(Read))? {
            Some(guard) => {
                let service: Service =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(service))
            }
            None => Ok(None),
        }
    }

    /// List all services of a cluster.
    pub fn list_services(&self, cluster: &str) -> StateResult<Vec<Service>> {
        let prefix = format!("{cluster}/");
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(SERVICES).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (key, value) = entry.map_err(map_err!(Read))?;
            if key.value().starts_with(&prefix) {
                let service: Service =
                    serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
                results.push(service);
            }
        }
        Ok(results)
    }

    /// Delete a service record. Returns true if it existed.
    pub fn delete_service(&self, cluster: &str, service_name: &str) -> StateResult<bool> {
        let key = Self::service_key(cluster, service_name);
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(SERVICES).map_err(map_err!(Table))?;
            existed = table.remove(key.as_str()).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, existed, "service record deleted");
        Ok(existed)
    }

    // ── Service attributes ─────────────────────────────────────────

    /// Insert the attr record if absent. Returns the stored record.
    pub fn create_service_attr(&self, attr: &ServiceAttr) -> StateResult<ServiceAttr> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let stored;
        {
            let mut table = txn.open_table(SERVICE_ATTRS).map_err(map_err!(Table))?;
            let existing = match table
                .get(attr.service_uuid.as_str())
                .map_err(map_err!(Read))?
            {
                Some(guard) => Some(
                    serde_json::from_slice::<ServiceAttr>(guard.value())
                        .map_err(map_err!(Deserialize))?,
                ),
                None => None,
            };
            match existing {
                Some(found) => stored = found,
                None => {
                    let value = serde_json::to_vec(attr).map_err(map_err!(Serialize))?;
                    table
                        .insert(attr.service_uuid.as_str(), value.as_slice())
                        .map_err(map_err!(Write))?;
                    stored = attr.clone();
                }
            }
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(stored)
    }

    /// Get the attributes of a service by UUID.
    pub fn get_service_attr(&self, service_uuid: &str) -> StateResult<Option<ServiceAttr>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(SERVICE_ATTRS).map_err(map_err!(Table))?;
        match table.get(service_uuid).map_err(map_err!(Read))? {
            Some(guard) => {
                let attr: ServiceAttr =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(attr))
            }
            None => Ok(None),
        }
    }

    /// Move a service's status forward in the lifecycle order.
    ///
    /// Setting the current status again is a no-op; moving backward fails
    /// with `ConditionFailed`. Returns the resulting status.
    pub fn set_service_status(
        &self,
        service_uuid: &str,
        status: ServiceStatus,
    ) -> StateResult<ServiceStatus> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(SERVICE_ATTRS).map_err(map_err!(Table))?;
            let mut attr = match table.get(service_uuid).map_err(map_err!(Read))? {
                Some(guard) => serde_json::from_slice::<ServiceAttr>(guard.value())
                    .map_err(map_err!(Deserialize))?,
                None => {
                    return Err(StateError::NotFound(format!(
                        "service attr {service_uuid}"
                    )))
                }
            };
            if status.rank() < attr.service_status.rank() {
                return Err(StateError::ConditionFailed(format!(
                    "status may not move from {} back to {}",
                    attr.service_status, status
                )));
            }
            attr.service_status = status;
            let value = serde_json::to_vec(&attr).map_err(map_err!(Serialize))?;
            table
                .insert(service_uuid, value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%service_uuid, %status, "service status set");
        Ok(status)
    }

    /// Delete the attr record. Returns true if it existed.
    pub fn delete_service_attr(&self, service_uuid: &str) -> StateResult<bool> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(SERVICE_ATTRS).map_err(map_err!(Table))?;
            existed = table.remove(service_uuid).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(existed)
    }

    // ── Service members ────────────────────────────────────────────

    /// Insert the member record if absent. Returns the stored record, so
    /// replayed creates keep the originally pinned IP and AZ.
    pub fn create_service_member(&self, member: &ServiceMember) -> StateResult<ServiceMember> {
        let key = Self::member_key(&member.service_uuid, &member.member_name);
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let stored;
        {
            let mut table = txn.open_table(MEMBERS).map_err(map_err!(Table))?;
            let existing = match table.get(key.as_str()).map_err(map_err!(Read))? {
                Some(guard) => Some(
                    serde_json::from_slice::<ServiceMember>(guard.value())
                        .map_err(map_err!(Deserialize))?,
                ),
                None => None,
            };
            match existing {
                Some(found) => stored = found,
                None => {
                    let value = serde_json::to_vec(member).map_err(map_err!(Serialize))?;
                    table
                        .insert(key.as_str(), value.as_slice())
                        .map_err(map_err!(Write))?;
                    stored = member.clone();
                }
            }
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(stored)
    }

    /// Get one member of a service.
    pub fn get_service_member(
        &self,
        service_uuid: &str,
        member_name: &str,
    ) -> StateResult<Option<ServiceMember>> {
        let key = Self::member_key(service_uuid, member_name);
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(MEMBERS).map_err(map_err!(Table))?;
        match table.get(key.as_str()).map_err(map_err!(Read))? {
            Some(guard) => {
                let member: ServiceMember =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(member))
            }
            None => Ok(None),
        }
    }

    /// List all members of a service, in replica-index order.
    pub fn list_service_members(&self, service_uuid: &str) -> StateResult<Vec<ServiceMember>> {
        let prefix = format!("{service_uuid}:");
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(MEMBERS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (key, value) = entry.map_err(map_err!(Read))?;
            if key.value().starts_with(&prefix) {
                let member: ServiceMember =
                    serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
                results.push(member);
            }
        }
        // Lexicographic order would put "svc-10" before "svc-2"; sort by
        // name length first to restore numeric replica order.
        results.sort_by(|a, b| {
            (a.member_name.len(), &a.member_name).cmp(&(b.member_name.len(), &b.member_name))
        });
        Ok(results)
    }

    /// Compare-and-swap a member record.
    ///
    /// Fails with `ConditionFailed` when the stored record no longer
    /// matches `old`, so concurrent mutators cannot silently lose updates.
    pub fn update_service_member(
        &self,
        old: &ServiceMember,
        new: &ServiceMember,
    ) -> StateResult<()> {
        let key = Self::member_key(&old.service_uuid, &old.member_name);
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(MEMBERS).map_err(map_err!(Table))?;
            let stored = match table.get(key.as_str()).map_err(map_err!(Read))? {
                Some(guard) => serde_json::from_slice::<ServiceMember>(guard.value())
                    .map_err(map_err!(Deserialize))?,
                None => return Err(StateError::NotFound(format!("member {key}"))),
            };
            if stored != *old {
                return Err(StateError::ConditionFailed(format!(
                    "member {key} diverged from expected image"
                )));
            }
            let value = serde_json::to_vec(new).map_err(map_err!(Serialize))?;
            table
                .insert(key.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, "member updated");
        Ok(())
    }

    /// Delete one member record. Returns true if it existed.
    pub fn delete_service_member(
        &self,
        service_uuid: &str,
        member_name: &str,
    ) -> StateResult<bool> {
        let key = Self::member_key(service_uuid, member_name);
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(MEMBERS).map_err(map_err!(Table))?;
            existed = table.remove(key.as_str()).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(existed)
    }

    // ── Config files ───────────────────────────────────────────────

    /// Content-addressed config file creation.
    ///
    /// Idempotent on (serviceUUID, fileID): an existing file with matching
    /// MD5 is returned as-is; a different MD5 under the same id fails with
    /// `ConfigMismatch`.
    pub fn create_config_file(
        &self,
        service_uuid: &str,
        file_id: &str,
        file_name: &str,
        file_mode: u32,
        content: &str,
    ) -> StateResult<ConfigFile> {
        let key = Self::config_key(service_uuid, file_id);
        let checksum = md5_hex(content);
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let stored;
        {
            let mut table = txn.open_table(CONFIG_FILES).map_err(map_err!(Table))?;
            let existing = match table.get(key.as_str()).map_err(map_err!(Read))? {
                Some(guard) => Some(
                    serde_json::from_slice::<ConfigFile>(guard.value())
                        .map_err(map_err!(Deserialize))?,
                ),
                None => None,
            };
            match existing {
                Some(found) => {
                    if found.file_md5 != checksum {
                        return Err(StateError::ConfigMismatch(format!(
                            "file {file_id} exists with md5 {}, new content has {checksum}",
                            found.file_md5
                        )));
                    }
                    stored = found;
                }
                None => {
                    let file = ConfigFile {
                        service_uuid: service_uuid.to_string(),
                        file_id: file_id.to_string(),
                        file_name: file_name.to_string(),
                        file_mode,
                        file_md5: checksum,
                        content: content.to_string(),
                    };
                    let value = serde_json::to_vec(&file).map_err(map_err!(Serialize))?;
                    table
                        .insert(key.as_str(), value.as_slice())
                        .map_err(map_err!(Write))?;
                    stored = file;
                }
            }
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, md5 = %stored.file_md5, "config file ensured");
        Ok(stored)
    }

    /// Get a config file by id.
    pub fn get_config_file(
        &self,
        service_uuid: &str,
        file_id: &str,
    ) -> StateResult<Option<ConfigFile>> {
        let key = Self::config_key(service_uuid, file_id);
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(CONFIG_FILES).map_err(map_err!(Table))?;
        match table.get(key.as_str()).map_err(map_err!(Read))? {
            Some(guard) => {
                let file: ConfigFile =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(file))
            }
            None => Ok(None),
        }
    }

    /// List all config files of a service.
    pub fn list_config_files(&self, service_uuid: &str) -> StateResult<Vec<ConfigFile>> {
        let prefix = format!("{service_uuid}:");
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(CONFIG_FILES).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (key, value) = entry.map_err(map_err!(Read))?;
            if key.value().starts_with(&prefix) {
                let file: ConfigFile =
                    serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
                results.push(file);
            }
        }
        Ok(results)
    }

    /// Delete a config file. Returns true if it existed.
    pub fn delete_config_file(&self, service_uuid: &str, file_id: &str) -> StateResult<bool> {
        let key = Self::config_key(service_uuid, file_id);
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(CONFIG_FILES).map_err(map_err!(Table))?;
            existed = table.remove(key.as_str()).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steward_core::{CatalogKind, MemberConfig};

    fn test_store() -> MetaStore {
        MetaStore::open_in_memory().unwrap()
    }

    fn test_service(cluster: &str, name: &str, uuid: &str) -> Service {
        Service {
            cluster: cluster.to_string(),
            service_name: name.to_string(),
            service_uuid: uuid.to_string(),
        }
    }

    fn test_attr(uuid: &str, name: &str) -> ServiceAttr {
        ServiceAttr {
            service_uuid: uuid.to_string(),
            service_name: name.to_string(),
            cluster: "c1".to_string(),
            region: "local-1".to_string(),
            catalog: CatalogKind::MongoDB,
            service_status: ServiceStatus::Creating,
            replicas: 3,
            domain_name: "c1-steward.local".to_string(),
            user_options: serde_json::Value::Null,
        }
    }

    fn test_member(uuid: &str, name: &str) -> ServiceMember {
        ServiceMember {
            service_uuid: uuid.to_string(),
            member_name: name.to_string(),
            availability_zone: "zone-a".to_string(),
            static_ip: "172.31.64.5".to_string(),
            volumes: vec![],
            configs: vec![],
        }
    }

    // ── Services ───────────────────────────────────────────────────

    #[test]
    fn service_create_is_keyed_insert() {
        let store = test_store();
        let first = store
            .create_service(&test_service("c1", "db", "uuid-1"))
            .unwrap();
        assert_eq!(first.service_uuid, "uuid-1");

        // Replay with a different uuid returns the original record.
        let replay = store
            .create_service(&test_service("c1", "db", "uuid-2"))
            .unwrap();
        assert_eq!(replay.service_uuid, "uuid-1");
    }

    #[test]
    fn service_get_and_delete() {
        let store = test_store();
        store
            .create_service(&test_service("c1", "db", "uuid-1"))
            .unwrap();

        assert!(store.get_service("c1", "db").unwrap().is_some());
        assert!(store.get_service("c1", "nope").unwrap().is_none());

        assert!(store.delete_service("c1", "db").unwrap());
        assert!(!store.delete_service("c1", "db").unwrap());
    }

    #[test]
    fn service_list_scopes_to_cluster() {
        let store = test_store();
        store
            .create_service(&test_service("c1", "a", "u1"))
            .unwrap();
        store
            .create_service(&test_service("c1", "b", "u2"))
            .unwrap();
        store
            .create_service(&test_service("c2", "c", "u3"))
            .unwrap();

        assert_eq!(store.list_services("c1").unwrap().len(), 2);
        assert_eq!(store.list_services("c2").unwrap().len(), 1);
    }

    // ── Status transitions ─────────────────────────────────────────

    #[test]
    fn status_moves_forward_only() {
        let store = test_store();
        store.create_service_attr(&test_attr("u1", "db")).unwrap();

        store
            .set_service_status("u1", ServiceStatus::Initializing)
            .unwrap();
        store
            .set_service_status("u1", ServiceStatus::Active)
            .unwrap();

        // Same status is an idempotent no-op.
        store
            .set_service_status("u1", ServiceStatus::Active)
            .unwrap();

        // Backward is rejected.
        let err = store
            .set_service_status("u1", ServiceStatus::Initializing)
            .unwrap_err();
        assert!(matches!(err, StateError::ConditionFailed(_)));

        let attr = store.get_service_attr("u1").unwrap().unwrap();
        assert_eq!(attr.service_status, ServiceStatus::Active);
    }

    #[test]
    fn status_on_missing_attr_is_not_found() {
        let store = test_store();
        let err = store
            .set_service_status("ghost", ServiceStatus::Active)
            .unwrap_err();
        assert!(matches!(err, StateError::NotFound(_)));
    }

    // ── Members ────────────────────────────────────────────────────

    #[test]
    fn member_create_keeps_pinned_ip_on_replay() {
        let store = test_store();
        store.create_service_member(&test_member("u1", "db-0")).unwrap();

        let mut replay = test_member("u1", "db-0");
        replay.static_ip = "172.31.64.99".to_string();
        let stored = store.create_service_member(&replay).unwrap();
        assert_eq!(stored.static_ip, "172.31.64.5");
    }

    #[test]
    fn member_list_orders_by_replica_index() {
        let store = test_store();
        for i in [0u32, 10, 2, 1] {
            store
                .create_service_member(&test_member("u1", &format!("db-{i}")))
                .unwrap();
        }

        let names: Vec<String> = store
            .list_service_members("u1")
            .unwrap()
            .into_iter()
            .map(|m| m.member_name)
            .collect();
        assert_eq!(names, vec!["db-0", "db-1", "db-2", "db-10"]);
    }

    #[test]
    fn member_cas_update() {
        let store = test_store();
        let old = store.create_service_member(&test_member("u1", "db-0")).unwrap();

        let mut new = old.clone();
        new.configs.push(MemberConfig {
            file_name: "cluster.info".to_string(),
            file_id: "db-0-cluster.info-v0".to_string(),
            file_md5: "0".repeat(32),
        });
        store.update_service_member(&old, &new).unwrap();

        // Re-applying from the stale image fails loud.
        let mut newer = old.clone();
        newer.availability_zone = "zone-b".to_string();
        let err = store.update_service_member(&old, &newer).unwrap_err();
        assert!(matches!(err, StateError::ConditionFailed(_)));

        let stored = store.get_service_member("u1", "db-0").unwrap().unwrap();
        assert_eq!(stored.configs.len(), 1);
    }

    #[test]
    fn member_cas_on_missing_member_is_not_found() {
        let store = test_store();
        let ghost = test_member("u1", "db-9");
        let err = store.update_service_member(&ghost, &ghost).unwrap_err();
        assert!(matches!(err, StateError::NotFound(_)));
    }

    // ── Config files ───────────────────────────────────────────────

    #[test]
    fn config_file_is_content_addressed() {
        let store = test_store();
        let file = store
            .create_config_file("u1", "db-0-redis.conf-v0", "redis.conf", 0o600, "port 6379\n")
            .unwrap();
        assert_eq!(file.file_md5, md5_hex("port 6379\n"));

        // Same id + same content succeeds and returns the stored file.
        let again = store
            .create_config_file("u1", "db-0-redis.conf-v0", "redis.conf", 0o600, "port 6379\n")
            .unwrap();
        assert_eq!(again, file);

        // Same id + different content fails.
        let err = store
            .create_config_file("u1", "db-0-redis.conf-v0", "redis.conf", 0o600, "port 6380\n")
            .unwrap_err();
        assert!(matches!(err, StateError::ConfigMismatch(_)));
    }

    #[test]
    fn config_file_get_list_delete() {
        let store = test_store();
        store
            .create_config_file("u1", "db-0-a.conf-v0", "a.conf", 0o600, "a")
            .unwrap();
        store
            .create_config_file("u1", "db-0-b.conf-v0", "b.conf", 0o600, "b")
            .unwrap();
        store
            .create_config_file("u2", "x-0-c.conf-v0", "c.conf", 0o600, "c")
            .unwrap();

        assert_eq!(store.list_config_files("u1").unwrap().len(), 2);
        assert!(store
            .get_config_file("u1", "db-0-a.conf-v0")
            .unwrap()
            .is_some());

        assert!(store.delete_config_file("u1", "db-0-a.conf-v0").unwrap());
        assert!(!store.delete_config_file("u1", "db-0-a.conf-v0").unwrap());
        assert_eq!(store.list_config_files("u1").unwrap().len(), 1);
    }

    // ── Persistence ────────────────────────────────────────────────

    #[test]
    fn persistence_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.redb");

        {
            let store = MetaStore::open(&db_path).unwrap();
            store
                .create_service(&test_service("prod", "db", "u1"))
                .unwrap();
            store.create_service_attr(&test_attr("u1", "db")).unwrap();
        }

        // Reopen the same database file.
        let store = MetaStore::open(&db_path).unwrap();
        let service = store.get_service("prod", "db").unwrap();
        assert!(service.is_some());
        assert_eq!(store.get_service_attr("u1").unwrap().unwrap().replicas, 3);
    }

    #[test]
    fn empty_store_operations() {
        let store = test_store();
        assert!(store.list_services("c1").unwrap().is_empty());
        assert!(store.list_service_members("u1").unwrap().is_empty());
        assert!(store.list_config_files("u1").unwrap().is_empty());
        assert!(!store.delete_service("c1", "nope").unwrap());
        assert!(!store.delete_service_attr("nope").unwrap());
        assert!(!store.delete_service_member("u1", "nope").unwrap());
    }
}
