use std::env;
use std::str::FromStr;
use tracing::warn;

/// Retrieves an environment variable and splits it into a vector of strings based on a delimiter.
///
/// # Arguments
/// - `var`: The name of the environment variable.
/// - `delimiter`: The character to split the environment variable's value by.
///
/// # Returns
/// - `Vec<String>` with empty items removed.
pub fn get_env_var_as_vec(var: &str, delimiter: char) -> Vec<String> {
    env::var(var)
        .unwrap_or_default()
        .split(delimiter)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Returns the trimmed value of `var`, or `None` when unset or blank.
pub fn get_env_var(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses `var` into `T`, falling back to `default` when it is unset or invalid.
pub fn get_env_var_parsed<T>(var: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    match get_env_var(var) {
        Some(raw) => match raw.parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    "Invalid value {:?} for {}, using default {:?}",
                    raw, var, default
                );
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_falls_back_on_garbage() {
        env::set_var("SMEDASH_TEST_PARSED_GARBAGE", "twenty");
        assert_eq!(get_env_var_parsed("SMEDASH_TEST_PARSED_GARBAGE", 20u32), 20);
        env::set_var("SMEDASH_TEST_PARSED_GARBAGE", " 35 ");
        assert_eq!(get_env_var_parsed("SMEDASH_TEST_PARSED_GARBAGE", 20u32), 35);
    }

    #[test]
    fn test_vec_skips_blank_items() {
        env::set_var("SMEDASH_TEST_VEC", "a; b ;;c");
        assert_eq!(get_env_var_as_vec("SMEDASH_TEST_VEC", ';'), vec!["a", "b", "c"]);
        assert!(get_env_var_as_vec("SMEDASH_TEST_VEC_UNSET", ';').is_empty());
    }
}
