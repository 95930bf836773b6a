//! Derive Api for `combarg` schemas.
//!
//! ### Getting Started
//! Instrument a struct `S` of named fields with `#[derive(Args)]`.
//! This implements [`Args`](../trait.Args.html) for `S`, so that `S::parser()` builds the [`nonpositional`](../fn.nonpositional.html) parser of its fields.
//! The derive only generates [`Schema`](../struct.Schema.html) builder calls; everything it does may be written by hand.
//!
//! ```no_run
#![doc = include_str!("../demos/demo_derived.rs")]
//! ```
//!
//! ```console
//! $ builder -h
//! usage: builder
//!        [--verbose]
//!        [--jobs JOBS]
//!        [--no-tests]
//!        [--report REPORT]
//!        PROJECT
//!
//! Build a project.
//!
//! positional arguments:
//!  PROJECT               The project to build.
//!
//! options:
//!  --help, -h            Show this help message and exit.
//!  --verbose, -v         Describe the work as it happens. (default: false)
//!  --jobs, -j JOBS       How many workers. (default: 4)
//!  --no-tests            Run the tests afterwards. (default: true)
//!  --report, -r REPORT   Where to write the report.
//!
//! $ builder --no-tests core
//! tests: false
//! project: core
//! verbose: false
//! jobs: 4
//! ```
//!
//! ### Field Configuration
//! Fields map onto the schema by type:
//! ```console
//! Type        | Field
//! -----------------------------------------------------------------------
//! bool        | Field::flag(..)                  (required, unless it has a default)
//! Option<T>   | Field::option(.., T).optional()
//! T           | Field::option(.., T)             (required, unless it has a default)
//! ```
//!
//! `T` is converted via [`std::str::FromStr`] and must convert into a [`Value`](../enum.Value.html).
//! The following field attributes may be combined as necessary:
//! * `#[combarg(help = "..")]` documents the field.
//! * `#[combarg(default = V)]` binds `V` when the field is absent (not applicable to `Option<T>`).
//! * `#[combarg(short = false)]` disables the short spelling (ex: `-v` for `verbose`).
//! * `#[combarg(positional)]` makes the field an argument rather than an option (not applicable to `bool`).
//! * `#[combarg(parser = P)]` parses the field with the custom [`Parser`](../struct.Parser.html) `P`.
//!
//! The following struct attributes configure the schema:
//! * `#[combarg(prefix = "..")]` nests every field under the prefix.
//! * `#[combarg(flip_bools = false)]` spells flags defaulting to `true` as `--name` rather than `--no-name`.
//! * `#[combarg(repeated = P)]` allows the parser `P` any number of times between the fields.
//!
//! A partial example of these rules is provided as follows:
//! ```ignore
//! #[derive(Args)]
//! #[combarg(prefix = "cfg")]
//! struct Parameters {
//!     #[combarg(default = 1)]
//!     level: u32,
//!     // the above generates:
//!     //  .field(Field::option("level", Converter::parse::<u32>()).default(1))
//!
//!     #[combarg(short = false)]
//!     fast: bool,
//!     // the above generates:
//!     //  .field(Field::flag("fast").short(false))
//!
//!     #[combarg(positional)]
//!     target: Option<String>,
//!     // the above generates:
//!     //  .field(Field::argument("target", Converter::parse::<String>()).optional())
//! }
//! ```

pub use combarg_derive::*;
