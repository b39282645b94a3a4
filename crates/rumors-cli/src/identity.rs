//! User identity resolution for CLI commands.
//!
//! The resolution chain: `--user` flag > `RUMORS_USER_ID` env > `[user] id` in config.
//! Every command works without an identity; only the `REPLIED_BY_ME` filter
//! needs one, and it is silently dropped when none resolves.

use std::env;

/// Environment reader trait for dependency injection in tests.
trait EnvReader {
    fn get(&self, key: &str) -> Option<String>;
}

/// Real environment reader.
struct RealEnv;

impl EnvReader for RealEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.is_empty())
    }
}

/// Core resolution logic, parameterized by environment reader.
fn resolve_user_with(
    cli_flag: Option<&str>,
    configured: Option<&str>,
    env: &dyn EnvReader,
) -> Option<String> {
    if let Some(user) = cli_flag.filter(|u| !u.is_empty()) {
        return Some(user.to_string());
    }

    if let Some(val) = env.get("RUMORS_USER_ID") {
        return Some(val);
    }

    configured.filter(|u| !u.is_empty()).map(str::to_string)
}

/// Resolve the current user id, or `None` for an anonymous session.
pub fn resolve_user(cli_flag: Option<&str>, configured: Option<&str>) -> Option<String> {
    resolve_user_with(cli_flag, configured, &RealEnv)
}
