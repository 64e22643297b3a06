//! Wyrt API - Program entry layer
//!
//! Provides the surface an embedding program links against:
//! - Configuration abstraction (RunConfig)
//! - Explicit initializer chain (InitChain)
//! - Program entry (`run_program`)
//! - Unified error handling (WyrtError, ErrorReport, `fatal`)
//!
//! For CLI convenience, this crate provides a global singleton config.
//! For library use, prefer the explicit `run_program(&config, chain, main)` API.
//!
//! ```
//! use wyrt_api::{run_program, InitChain, RunConfig, TypeTag};
//!
//! let config = RunConfig::default();
//! let len = run_program(&config, InitChain::new(), |rt, _| {
//!     let set = rt.set_new(TypeTag::Int);
//!     for n in [1, 2, 3, 2] {
//!         rt.set_add(&set, &rt.box_int(n))?;
//!     }
//!     Ok(rt.length_of(&set)?.as_int())
//! })
//! .unwrap();
//! assert_eq!(len, Some(3));
//! ```

use wyrt_core::{Runtime, RuntimeError};
use wyrt_log::info;

pub mod config;
pub use config::{config as get_config, init as init_config, is_initialized, RunConfig};

pub mod display;
pub mod error;
pub mod init;
pub use display::{println, to_display_string, write_line};
pub use error::{fatal, report_failure, ErrorReport, WyrtError};
pub use init::{InitChain, Initializer};

// Re-export config types from wyrt_config
pub use wyrt_config::{Component, DebugConfig, ListConfig, RuntimeConfig};

// Re-export core types
pub use wyrt_core;
pub use wyrt_core::{ErrorKind, Payload, TypeTag, Value};

/// Build a runtime, run the initializer chain, then call `main`
///
/// `main` receives the runtime and the boxed system object (Int 1).
pub fn run_program<T, F>(config: &RunConfig, chain: InitChain, main: F) -> Result<T, WyrtError>
where
    F: FnOnce(&mut Runtime, Value) -> Result<T, RuntimeError>,
{
    let target = Component::Runtime.target();
    let mut runtime = Runtime::new(config.runtime.clone(), config.logger.clone());
    info!(
        config.logger,
        target: target,
        "starting program ({} initializers)",
        chain.len()
    );

    chain.run(&mut runtime)?;

    let sys = runtime.box_int(1);
    let result = main(&mut runtime, sys)?;

    info!(config.logger, target: target, "program finished");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wyrt_log::{Level, LogConfig};

    #[test]
    fn test_sys_object_is_int_one() {
        let config = RunConfig::default();
        let sys = run_program(&config, InitChain::new(), |_, sys| Ok(sys.as_int())).unwrap();
        assert_eq!(sys, Some(1));
    }

    #[test]
    fn test_init_runs_before_main() {
        let config = RunConfig::default();
        let chain = InitChain::new().with("tune", |rt| {
            rt.set_new(TypeTag::Int);
            Ok(())
        });
        let seen = run_program(&config, chain, |rt, _| {
            let list = rt.list_new(2)?;
            rt.list_append(&list, &rt.box_string("x"))?;
            Ok(rt.length_of(&list)?.as_int())
        })
        .unwrap();
        assert_eq!(seen, Some(1));
    }

    #[test]
    fn test_main_error_propagates() {
        let config = RunConfig::default();
        let err = run_program(&config, InitChain::new(), |rt, _| {
            let map = rt.map_new(TypeTag::String);
            rt.index_of(&map, &rt.box_string("missing"))
        })
        .unwrap_err();
        assert_eq!(err, WyrtError::Runtime(RuntimeError::EmptyMap));
        assert_eq!(err.exit_code(), -3);
    }

    #[test]
    fn test_program_logged() {
        let config = RunConfig::with_logging(
            RuntimeConfig::default(),
            LogConfig::new(Level::Info).with_ring_buffer(16),
        );
        run_program(&config, InitChain::new(), |_, _| Ok(())).unwrap();

        let ring = config.ring.as_ref().unwrap();
        let messages: Vec<String> = ring.dump_records().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, ["starting program (0 initializers)", "program finished"]);
    }
}
