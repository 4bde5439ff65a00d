//! CLI flags shared by snapshop subcommands.

mod globals;
pub use globals::GlobalArgs;

mod provider;
pub use provider::ProviderArgs;

mod registry;
pub use registry::RegistryArgs;

mod values;
pub use values::{parse_block, parse_word};
