use super::args::PassArgs;

pub const KEY_SUFFIX: &str = "processed-up-to";

/// Builds the watermark key for one source and argument set.
///
/// `orders_sync` with `tenant=7` becomes `orders-sync-tenant-7-processed-up-to`.
pub fn tracking_key(source: &str, args: &PassArgs) -> String {
    let mut parts = vec![dasherize(source)];
    for (k, v) in args.iter() {
        parts.push(k.to_string());
        parts.push(v.to_string());
    }
    parts.push(KEY_SUFFIX.to_string());
    parts.join("-")
}

fn dasherize(name: &str) -> String {
    name.replace('_', "-")
}
