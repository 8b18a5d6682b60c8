// Command-line surface of the simulation binary

mod args;

pub use args::CliArgs;

use clap::Parser;

/// Read the simulation options from the process arguments.
///
/// Unknown flags, malformed numbers and `--help` are handled by clap, which
/// prints the message and exits. Out-of-range values that parse fine are
/// corrected later by [`CliArgs::to_simulation_config`].
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
