/// Claims a placeholder slot if no other order is waiting on the address for an amount in range.
///
/// KEYS: `[placeholders, created_index]`
/// ARGV: `[order_id, score, min, max, created_ms, index_member]`
///
/// Returns 1 if the placeholder was written, 0 if another order is in the way.
pub const RESERVE_PLACEHOLDER: &str = r#"
local members = redis.call('ZRANGEBYSCORE', KEYS[1], ARGV[3], ARGV[4])
for _, member in ipairs(members) do
    if member ~= ARGV[1] then
        return 0
    end
end
redis.call('ZADD', KEYS[1], ARGV[2], ARGV[1])
redis.call('ZADD', KEYS[2], 'NX', ARGV[5], ARGV[6])
return 1
"#;
