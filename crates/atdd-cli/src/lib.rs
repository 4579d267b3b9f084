//! ATDD command-line front end
//!
//! ```text
//! atdd parse <PLAN> [--json]
//! atdd generate <PLAN> [--codeunit-id N] [--codeunit-name NAME]
//!               [--library-codeunit NAME] [--config FILE] [-o FILE] [--check]
//! atdd validate <FILE> [--json] [--fail-on-warnings] [--config FILE]
//! atdd rules [--json]
//! atdd conventions
//! ```
//!
//! [`run`] returns `Ok(false)` when a check did not pass; the binary maps
//! that to exit code 1 and errors to exit code 2.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod logging;

use anyhow::Context;
use atdd_core::{
    applied_conventions, rule_catalog, AtddConfig, AtddError, AtddToolkit, ParsedDocument,
    StepContext, Summary, ValidationReport,
};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Command-line definition
#[must_use]
pub fn command() -> Command {
    Command::new("atdd")
        .version(atdd_core::VERSION)
        .about("ATDD test plans to AL test codeunits, and convention checks")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("More log output on stderr (-v info, -vv debug)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a markdown test plan")
                .arg(plan_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate an AL test codeunit from a test plan")
                .arg(plan_arg())
                .arg(
                    Arg::new("codeunit-id")
                        .long("codeunit-id")
                        .value_parser(value_parser!(u32))
                        .help("Object id of the codeunit"),
                )
                .arg(
                    Arg::new("codeunit-name")
                        .long("codeunit-name")
                        .help("Codeunit name (derived from the work item when omitted)"),
                )
                .arg(
                    Arg::new("library-codeunit")
                        .long("library-codeunit")
                        .help("Library codeunit declared as a global"),
                )
                .arg(config_arg())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the codeunit here instead of stdout"),
                )
                .arg(
                    Arg::new("check")
                        .long("check")
                        .action(ArgAction::SetTrue)
                        .help("Validate the generated code and fail on errors"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Check an AL test codeunit against the conventions")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("AL source file"),
                )
                .arg(json_arg())
                .arg(
                    Arg::new("fail-on-warnings")
                        .long("fail-on-warnings")
                        .action(ArgAction::SetTrue)
                        .help("Treat warnings as failures"),
                )
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("rules")
                .about("List the rule catalog")
                .arg(json_arg()),
        )
        .subcommand(Command::new("conventions").about("List the conventions generated code follows"))
}

fn plan_arg() -> Arg {
    Arg::new("plan")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Markdown test plan")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_parser(value_parser!(PathBuf))
        .help("TOML configuration file")
}

/// Run the selected subcommand
///
/// # Errors
/// Unreadable inputs, invalid configuration or options, failed writes.
pub fn run(matches: &ArgMatches, out: &mut dyn Write, err: &mut dyn Write) -> anyhow::Result<bool> {
    match matches.subcommand() {
        Some(("parse", args)) => parse(args, out),
        Some(("generate", args)) => generate(args, out, err),
        Some(("validate", args)) => validate(args, out),
        Some(("rules", args)) => rules(args.get_flag("json"), out),
        Some(("conventions", _)) => conventions(out),
        _ => anyhow::bail!("no subcommand given"),
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).map_err(|source| AtddError::io(path, source).into())
}

fn load_config(args: &ArgMatches) -> anyhow::Result<AtddConfig> {
    match args.get_one::<PathBuf>("config") {
        Some(path) => AtddConfig::load(path).context("loading configuration"),
        None => Ok(AtddConfig::default()),
    }
}

fn parse(args: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<bool> {
    let path = required_path(args, "plan")?;
    let doc = AtddToolkit::default().parse(&read(path)?);

    if args.get_flag("json") {
        serde_json::to_writer_pretty(&mut *out, &doc).map_err(AtddError::from)?;
        writeln!(out)?;
    } else {
        write_document(&doc, out)?;
    }
    Ok(true)
}

fn write_document(doc: &ParsedDocument, out: &mut dyn Write) -> std::io::Result<()> {
    let meta = &doc.metadata;
    for (label, value) in [
        ("Test plan", &meta.test_plan_id),
        ("Work item", &meta.work_item),
        ("Project", &meta.project),
        ("Feature", &meta.feature),
    ] {
        if !value.is_empty() {
            writeln!(out, "{label}: {value}")?;
        }
    }
    writeln!(out, "Scenarios: {}", doc.len())?;
    for scenario in &doc.scenarios {
        writeln!(
            out,
            "  [{}] {} ({})",
            scenario.id, scenario.title, scenario.priority
        )?;
        for context in StepContext::ALL {
            for step in scenario.group(context) {
                writeln!(out, "      {:<5} {step}", context.tag())?;
            }
        }
    }
    Ok(())
}

fn generate(args: &ArgMatches, out: &mut dyn Write, err: &mut dyn Write) -> anyhow::Result<bool> {
    let path = required_path(args, "plan")?;
    let mut config = load_config(args)?;
    if let Some(id) = args.get_one::<u32>("codeunit-id") {
        config = config.with_codeunit_id(*id);
    }
    if let Some(name) = args.get_one::<String>("codeunit-name") {
        config = config.with_codeunit_name(name.clone());
    }
    if let Some(library) = args.get_one::<String>("library-codeunit") {
        config = config.with_library_codeunit(library.clone());
    }

    let toolkit = AtddToolkit::new(config);
    let markdown = read(path)?;
    let doc = toolkit.parse(&markdown);
    let code = toolkit
        .generate(&doc)
        .with_context(|| format!("generating from {}", path.display()))?;

    match args.get_one::<PathBuf>("output") {
        Some(target) => {
            std::fs::write(target, &code).map_err(|source| AtddError::io(target, source))?;
            tracing::info!(path = %target.display(), "codeunit written");
        }
        None => out.write_all(code.as_bytes())?,
    }

    if !args.get_flag("check") {
        return Ok(true);
    }
    let report = toolkit.validate(&code);
    write_issues(&report, err)?;
    Ok(report.summary.passed)
}

fn validate(args: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<bool> {
    let path = required_path(args, "file")?;
    let mut config = load_config(args)?;
    if args.get_flag("fail-on-warnings") {
        config = config.with_fail_on_warnings(true);
    }

    let report = AtddToolkit::new(config).validate(&read(path)?);
    if args.get_flag("json") {
        serde_json::to_writer_pretty(&mut *out, &report).map_err(AtddError::from)?;
        writeln!(out)?;
    } else {
        write_issues(&report, out)?;
    }
    Ok(report.accepted)
}

fn write_issues(report: &ValidationReport, out: &mut dyn Write) -> std::io::Result<()> {
    for issue in &report.summary.issues {
        writeln!(out, "{issue}")?;
    }
    write_summary(&report.summary, out)
}

fn write_summary(summary: &Summary, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        out,
        "{}: {} issue(s), {} error(s), {} warning(s)",
        if summary.passed { "PASSED" } else { "FAILED" },
        summary.total_issues,
        summary.errors,
        summary.warnings
    )
}

fn rules(json: bool, out: &mut dyn Write) -> anyhow::Result<bool> {
    let catalog = rule_catalog();
    if json {
        serde_json::to_writer_pretty(&mut *out, catalog).map_err(AtddError::from)?;
        writeln!(out)?;
        return Ok(true);
    }
    for rule in catalog.values() {
        writeln!(out, "{} ({}, {})", rule.id, rule.severity, rule.category)?;
        writeln!(out, "    {}", rule.description)?;
        writeln!(out, "    e.g. {}", rule.example)?;
    }
    Ok(true)
}

fn conventions(out: &mut dyn Write) -> anyhow::Result<bool> {
    for convention in applied_conventions() {
        writeln!(out, "{:<36} {}", convention.id, convention.summary)?;
    }
    Ok(true)
}

fn required_path<'a>(args: &'a ArgMatches, id: &str) -> anyhow::Result<&'a Path> {
    args.get_one::<PathBuf>(id)
        .map(PathBuf::as_path)
        .with_context(|| format!("missing <{id}> argument"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        command().debug_assert();
    }

    #[test]
    fn flags_parse() {
        let matches = command()
            .try_get_matches_from(["atdd", "-vv", "generate", "plan.md", "--codeunit-id", "50200", "--check"])
            .unwrap();
        assert_eq!(matches.get_count("verbose"), 2);
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "generate");
        assert_eq!(args.get_one::<u32>("codeunit-id"), Some(&50200));
        assert!(args.get_flag("check"));
    }

    #[test]
    fn bad_codeunit_id_is_rejected_by_clap() {
        let result = command().try_get_matches_from(["atdd", "generate", "plan.md", "--codeunit-id", "x"]);
        assert!(result.is_err());
    }
}
