use rayon::ThreadPoolBuilder;
use std::env;
use std::sync::OnceLock;

/// Environment variable consulted when no explicit thread count is given.
pub const CPU_THREADS_ENV: &str = "BFMATCH_CPU_THREADS";

static THREAD_POOL_INIT: OnceLock<Result<(), String>> = OnceLock::new();

/// Initialize the global Rayon thread pool used by the matchers.
///
/// Priority:
/// 1. `num_threads` argument
/// 2. `BFMATCH_CPU_THREADS` environment variable
/// 3. Rayon default
///
/// Only the first call has any effect; later calls return its result.
pub fn init_global_thread_pool(num_threads: Option<usize>) -> Result<(), String> {
    THREAD_POOL_INIT
        .get_or_init(|| {
            let env_value = env::var(CPU_THREADS_ENV).ok();
            let threads = resolve_thread_count(num_threads, env_value.as_deref())?;
            threads
                .into_iter()
                .fold(ThreadPoolBuilder::new(), |builder, n| builder.num_threads(n))
                .build_global()
                .map_err(|e| e.to_string())
        })
        .clone()
}

/// An explicit count wins over the environment; `None` leaves sizing to rayon.
fn resolve_thread_count(
    explicit: Option<usize>,
    env_value: Option<&str>,
) -> Result<Option<usize>, String> {
    match explicit {
        Some(0) => Err("thread count must be >= 1".to_string()),
        Some(n) => Ok(Some(n)),
        None => parse_cpu_threads(env_value),
    }
}

pub fn current_cpu_threads() -> usize {
    rayon::current_num_threads()
}

fn parse_cpu_threads(raw: Option<&str>) -> Result<Option<usize>, String> {
    let raw = match raw {
        Some(v) => v.trim(),
        None => return Ok(None),
    };

    let parsed: usize = raw
        .parse()
        .map_err(|_| format!("{CPU_THREADS_ENV} must be a positive integer, got '{raw}'"))?;
    if parsed == 0 {
        return Err(format!("{CPU_THREADS_ENV} must be >= 1"));
    }
    Ok(Some(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variable_means_rayon_default() {
        assert_eq!(parse_cpu_threads(None), Ok(None));
    }

    #[test]
    fn parses_positive_counts() {
        assert_eq!(parse_cpu_threads(Some("4")), Ok(Some(4)));
        assert_eq!(parse_cpu_threads(Some(" 2 ")), Ok(Some(2)));
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert!(parse_cpu_threads(Some("0")).is_err());
        let err = parse_cpu_threads(Some("many")).unwrap_err();
        assert!(err.contains("'many'"));
    }

    #[test]
    fn explicit_count_overrides_environment() {
        assert_eq!(resolve_thread_count(Some(3), Some("8")), Ok(Some(3)));
        assert_eq!(resolve_thread_count(None, Some("8")), Ok(Some(8)));
        assert_eq!(resolve_thread_count(None, None), Ok(None));
        assert!(resolve_thread_count(Some(0), None).is_err());
        assert!(resolve_thread_count(None, Some("0")).is_err());
    }

    #[test]
    fn current_threads_is_positive() {
        assert!(current_cpu_threads() >= 1);
    }
}
