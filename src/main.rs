use std::process;

use clap::{Parser, Subcommand};
use qformula::{
    check_convertibility, classify_answer_type,
    error::Error,
    interpreter::evaluator::core::{Evaluator, ScopeLayer},
    latexify, latexify_unit, parse, parse_unit, split_number_and_unit,
};
use rand::{SeedableRng, rngs::StdRng};

/// qformula checks, evaluates and renders the formulas and units of
/// mathematical answers.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluates statements and prints the value of the last one.
    Eval {
        /// Definitions of random variables, e.g. "a = {1:10}; p = shuffle([1, 2, 3])".
        #[arg(short, long)]
        random: Option<String>,

        /// Definitions shared by all parts, evaluated after the random
        /// variables are instantiated.
        #[arg(short, long)]
        global: Option<String>,

        /// Seed for instantiating random variables.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Prints the value of every statement instead of the last one.
        #[arg(short, long)]
        all: bool,

        /// Prints the instantiated random variables as re-parsable text.
        #[arg(long)]
        export: bool,

        text: String,
    },
    /// Prints the lowest answer type accepting the text.
    Classify {
        /// Comma separated names that are always read as variables.
        #[arg(short, long, value_delimiter = ',')]
        known: Vec<String>,

        text: String,
    },
    /// Splits an answer into its number and unit.
    Split { text: String },
    /// Normalizes a unit, and checks conversion to a second unit.
    Unit {
        from: String,
        to:   Option<String>,
    },
    /// Renders a formula, or a unit with `--unit`, as LaTeX.
    Latex {
        /// Reads the text as a unit.
        #[arg(short, long)]
        unit: bool,

        /// Comma separated names that are always read as variables.
        #[arg(short, long, value_delimiter = ',')]
        known: Vec<String>,

        text: String,
    },
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{message}");
    process::exit(1);
}

fn run_eval(random: Option<&str>, global: Option<&str>, seed: Option<u64>, text: &str) -> Result<(Evaluator, Vec<String>), Error> {
    let mut evaluator = seed.map_or_else(Evaluator::new, Evaluator::with_seed);
    let mut rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

    if let Some(random) = random {
        evaluator.evaluate_text(random)?;
        evaluator.instantiate_random_variables(&mut rng);
    }

    evaluator.push_scope(ScopeLayer::Global);
    if let Some(global) = global {
        evaluator.evaluate_text(global)?;
    }

    evaluator.push_scope(ScopeLayer::Local);
    let results = evaluator.evaluate_text(text)?
                           .iter()
                           .map(ToString::to_string)
                           .collect();

    Ok((evaluator, results))
}

fn main() {
    let args = Args::parse();

    match args.command {
        Command::Eval { random,
                        global,
                        seed,
                        all,
                        export,
                        text, } => {
            let (evaluator, results) =
                run_eval(random.as_deref(), global.as_deref(), seed, &text).unwrap_or_else(|e| fail(e));

            if export {
                println!("{}", evaluator.export_randomvars_for_storage());
            }
            if all {
                results.iter().for_each(|r| println!("{r}"));
            } else if let Some(last) = results.last() {
                println!("{last}");
            }
        },
        Command::Classify { known, text } => {
            let known = known.iter().map(String::as_str).collect::<Vec<_>>();
            let parsed = parse(&text, &known).unwrap_or_else(|e| fail(e));

            match classify_answer_type(&parsed) {
                Some(answer_type) => println!("{answer_type}"),
                None => fail("The text is not acceptable as an answer."),
            }
        },
        Command::Split { text } => {
            let (number, unit) = split_number_and_unit(&text);
            println!("number: {number}");
            println!("unit: {unit}");
        },
        Command::Unit { from, to } => {
            let from_unit = parse_unit(&from).unwrap_or_else(|| fail(format!("Invalid unit: '{from}'.")));
            println!("{from_unit}");

            if let Some(to) = to {
                let to_unit = parse_unit(&to).unwrap_or_else(|| fail(format!("Invalid unit: '{to}'.")));
                let result = check_convertibility(&from_unit, &to_unit);
                if result.convertible {
                    println!("1 {from} = {} {to}", result.cfactor);
                } else {
                    fail(format!("'{from}' cannot be converted to '{to}'."));
                }
            }
        },
        Command::Latex { unit: true, text, .. } => {
            let unit = parse_unit(&text).unwrap_or_else(|| fail(format!("Invalid unit: '{text}'.")));
            println!("{}", latexify_unit(&unit));
        },
        Command::Latex { known, text, .. } => {
            let known = known.iter().map(String::as_str).collect::<Vec<_>>();
            let rendered = parse(&text, &known).and_then(|parsed| latexify(&parsed))
                                               .unwrap_or_else(|e| fail(e));
            println!("{rendered}");
        },
    }
}
