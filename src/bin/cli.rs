use anyhow::{anyhow, Result};
use colored::*;
use std::io::{stdout, Write};
use structopt::StructOpt;
use strum::{EnumString, IntoEnumIterator};
use xbrlus::xbrl::{Operation, Output, ParamValue, Params, QueryOutput, XbrlClient};
use xbrlus::Settings;

#[derive(Debug, Clone, Copy, EnumString)]
#[strum(ascii_case_insensitive)]
enum Format {
    Csv,
    Json,
}

#[derive(StructOpt, Debug)]
#[structopt(name = "xbrlus-cli", about = "Query the XBRL US data service")]
enum Command {
    /// List the available operations and their parameters
    Operations,
    /// Run one operation and print the result
    Run {
        /// Operation name, e.g. facts or base-element
        operation: Operation,
        /// Parameter as NAME=VALUE; comma separated values form a list
        #[structopt(short = "p", long = "param", parse(try_from_str = parse_param))]
        params: Vec<(String, ParamValue)>,
        /// Output format: csv or json
        #[structopt(short, long, default_value = "csv")]
        format: Format,
        /// Print the parsed documents instead of the merged table
        #[structopt(long)]
        raw: bool,
    },
}

fn parse_param(raw: &str) -> Result<(String, ParamValue)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Parameter must look like NAME=VALUE: {}", raw))?;
    Ok((name.trim().to_string(), ParamValue::parse(value)))
}

/// Repeating `-p NAME=...` adds to the values of NAME.
fn merge_params(pairs: Vec<(String, ParamValue)>) -> Params {
    let mut params = Params::new();
    for (name, value) in pairs {
        params.append(name, value);
    }
    params
}

fn list_operations() {
    for operation in Operation::iter() {
        let spec = operation.spec();
        let params = spec
            .params
            .iter()
            .map(|p| format!("{} ({:?})", p.name, p.policy))
            .collect::<Vec<_>>()
            .join(", ");
        println!("{} [{}]: {}", operation.to_string().bold(), spec.task, params);
    }
}

fn run(operation: Operation, params: Params, format: Format, raw: bool) -> Result<()> {
    let client = XbrlClient::from_settings(&Settings::from_env()?)?;
    let output = if raw { Output::Raw } else { Output::Table };

    let mut out = stdout().lock();
    match client.run(operation, &params, output)? {
        QueryOutput::Table(table) => match format {
            Format::Csv => table.write_csv(&mut out)?,
            Format::Json => {
                serde_json::to_writer_pretty(&mut out, &table)?;
                writeln!(out)?;
            }
        },
        QueryOutput::Documents(documents) => {
            serde_json::to_writer_pretty(&mut out, &documents)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let result = match Command::from_args() {
        Command::Operations => {
            list_operations();
            Ok(())
        }
        Command::Run {
            operation,
            params,
            format,
            raw,
        } => run(operation, merge_params(params), format, raw),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
