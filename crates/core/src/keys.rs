//! Key naming for the local cache and the per-user remote store.

/// Prefix of every local cache key.
pub const LOCAL_KEY_PREFIX: &str = "project:";

/// Default namespace of remote keys.
pub const DEFAULT_NAMESPACE: &str = "architecture_visualizer";

/// Local cache key: `project:{id}`.
pub fn local_project_key(id: &str) -> String {
    format!("{LOCAL_KEY_PREFIX}{id}")
}

/// Remote key prefix owned by one user: `{namespace}_{user_id}_`.
pub fn remote_user_prefix(namespace: &str, user_id: &str) -> String {
    format!("{namespace}_{user_id}_")
}

/// Remote key of one project: `{namespace}_{user_id}_{id}`.
pub fn remote_project_key(namespace: &str, user_id: &str, id: &str) -> String {
    format!("{}{id}", remote_user_prefix(namespace, user_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_key() {
        assert_eq!(local_project_key("p1"), "project:p1");
    }

    #[test]
    fn remote_key_is_under_user_prefix() {
        let key = remote_project_key(DEFAULT_NAMESPACE, "u1", "p1");
        assert_eq!(key, "architecture_visualizer_u1_p1");
        assert!(key.starts_with(&remote_user_prefix(DEFAULT_NAMESPACE, "u1")));
    }
}
