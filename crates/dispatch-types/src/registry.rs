//! Registry trait for self-registering implementations.
//!
//! Storage backends and distance providers each expose a `Registry` type that
//! names the configuration key it answers to and hands out its factory.

/// Base trait for implementation registries.
pub trait ImplementationRegistry {
	/// Key used under `[<section>.implementations.<NAME>]` in the config file,
	/// e.g. `"mysql"` or `"google_maps"`.
	const NAME: &'static str;

	/// Factory function type of the component family.
	type Factory;

	/// Returns the factory that builds this implementation from its TOML table.
	fn factory() -> Self::Factory;
}
