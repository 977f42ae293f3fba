//! Logger set-up for the binary and tests.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Level used when `RUST_LOG` is unset.
#[must_use]
pub const fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs `env_logger` as the global logger.
///
/// `RUST_LOG` takes precedence over `verbose`. Records carry the module
/// path so each loop's output can be told apart. Calling this again after
/// a logger is installed does nothing.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_level(verbose).as_str());
    let installed = Builder::from_env(env)
        .format_target(false)
        .format_module_path(true)
        .try_init()
        .is_ok();
    if installed {
        log::debug!("logging initialised at {}", default_level(verbose));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::quiet(false, LevelFilter::Info)]
    #[case::verbose(true, LevelFilter::Debug)]
    fn verbosity_selects_level(#[case] verbose: bool, #[case] expected: LevelFilter) {
        assert_eq!(default_level(verbose), expected);
    }

    #[rstest]
    fn repeated_init_is_harmless() {
        init(false);
        init(true);
    }
}
