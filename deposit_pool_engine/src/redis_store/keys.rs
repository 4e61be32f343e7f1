const POOL_KEY: &str = "u_pool";
const PLACEHOLDER_PREFIX: &str = "u:";
const CREATED_INDEX_KEY: &str = "u_created";
const MEMBER_SEPARATOR: char = '|';

#[derive(Debug, Clone, Default)]
pub struct RedisKeys {
    namespace: String,
}

impl RedisKeys {
    /// Prefixes every key with `namespace`. The default (empty) namespace uses the bare key names.
    pub fn with_namespace<S: Into<String>>(namespace: S) -> Self {
        Self { namespace: namespace.into() }
    }

    pub fn pool(&self) -> String {
        format!("{}{POOL_KEY}", self.namespace)
    }

    pub fn placeholders(&self, address: &str) -> String {
        format!("{}{PLACEHOLDER_PREFIX}{address}", self.namespace)
    }

    /// A `SCAN` pattern matching every placeholder set.
    pub fn placeholders_pattern(&self) -> String {
        format!("{}{PLACEHOLDER_PREFIX}*", self.namespace)
    }

    /// The address a placeholder set belongs to, or `None` if `key` is not a placeholder set.
    pub fn address_of<'a>(&self, key: &'a str) -> Option<&'a str> {
        key.strip_prefix(self.namespace.as_str())?.strip_prefix(PLACEHOLDER_PREFIX).filter(|a| !a.is_empty())
    }

    pub fn created_index(&self) -> String {
        format!("{}{CREATED_INDEX_KEY}", self.namespace)
    }

    pub fn index_member(address: &str, order_id: &str) -> String {
        format!("{address}{MEMBER_SEPARATOR}{order_id}")
    }

    /// Splits a creation-index member back into `(address, order_id)`. Addresses are base58, so the first separator
    /// always ends the address even if the order id contains one.
    pub fn split_index_member(member: &str) -> Option<(&str, &str)> {
        member.split_once(MEMBER_SEPARATOR)
    }
}
