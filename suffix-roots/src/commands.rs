use clap::arg;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("generate_suffix_root_allowlist")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("generate_suffix_root_allowlist")
        .about(
            "Generate an allowlist of public-suffix root domains that look like HTML pages, \
            suitable for treating as \"always navigate\" candidates.",
        )
        .styles(CLAP_STYLING)
        .arg(
            arg!(--"psl" <PATH>)
                .required(true)
                .help("Path to public_suffix_list.dat"),
        )
        .arg(
            arg!(--"rust-out" <PATH>)
                .required(false)
                .help("Output Rust file (generated module)"),
        )
        .arg(
            arg!(--"json-out" <PATH>)
                .required(false)
                .help("Output JSON file (allowlist)"),
        )
        .arg(
            arg!(--"debug-out" <PATH>)
                .required(false)
                .help("Debug JSON mapping every probed domain to its probe outcome"),
        )
        .arg(
            arg!(-w --"max-workers" <NUM_WORKERS>)
                .required(false)
                .help("Number of domains probed concurrently (default: 16)")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Per-request timeout in seconds (default: 3)")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            arg!(--"limit" <N>)
                .required(false)
                .help("Only probe the first N candidates")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(--"config" <PATH>)
                .required(false)
                .help("JSON file with timeout_seconds, max_workers and user_agent"),
        )
        .arg(
            arg!(--"keep-unicode")
                .required(false)
                .help("Emit lowercased Unicode domains instead of IDNA ASCII (punycode)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(--"no-progress")
                .required(false)
                .help("Disable the progress bar")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(arg!(-q --"quiet" "Only log warnings and errors").required(false))
}
